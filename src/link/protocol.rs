//! Host link framing.
//!
//! Frame layout (both directions):
//! ```text
//! Byte 0:     code
//! Byte 1:     0xFF separator
//! Byte 2..n:  value (ASCII / UTF-8, never '\n')
//! Byte n+1:   '\n'
//! ```
//! A bare one-byte line (code only) is accepted from the host with an
//! empty value.

use core::fmt::Write;

use crate::config::MAX_PUSHED_IMAGES;
use crate::error::Error;
use crate::hunt::Probe;
use crate::motion::gesture::Acceleration;
use crate::ui::frames::{Bitmap, MAX_BRIGHTNESS, SIZE};
use crate::ui::{ButtonEvent, Text};
use heapless::{String, Vec};

pub const SEPARATOR: u8 = 0xFF;
pub const TERMINATOR: u8 = b'\n';

/// Frame codes shared with the hunt host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Code {
    Ready = 0x01,
    IdQuery = 0x08,
    IdReturn = 0x09,
    Input = 0x10,
    Accel = 0x11,
    Pixel = 0x12,
    Image = 0x13,
    Reset = 0x14,
    ToggleAccel = 0x15,
    Data = 0x18,
    Radar = 0x30,
    EctoScope = 0x31,
    Telegraph = 0x32,
    SpiritSign = 0x33,
    GMeter = 0x35,
}

impl Code {
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            0x01 => Code::Ready,
            0x08 => Code::IdQuery,
            0x09 => Code::IdReturn,
            0x10 => Code::Input,
            0x11 => Code::Accel,
            0x12 => Code::Pixel,
            0x13 => Code::Image,
            0x14 => Code::Reset,
            0x15 => Code::ToggleAccel,
            0x18 => Code::Data,
            0x30 => Code::Radar,
            0x31 => Code::EctoScope,
            0x32 => Code::Telegraph,
            0x33 => Code::SpiritSign,
            0x35 => Code::GMeter,
            _ => return None,
        })
    }
}

impl From<Probe> for Code {
    fn from(p: Probe) -> Self {
        match p {
            Probe::Ecto => Code::EctoScope,
            Probe::GMeter => Code::GMeter,
            Probe::Radar => Code::Radar,
        }
    }
}

/// Value of an input report for a button event.
pub fn input_value(event: ButtonEvent) -> &'static [u8] {
    match event {
        ButtonEvent::A => b"1",
        ButtonEvent::B => b"2",
        ButtonEvent::Chord => b"3",
    }
}

/// `"-32768,-32768,-32768"`
pub const ACCEL_VALUE_LEN: usize = 20;

/// Value of an accelerometer stream frame: `x,y,z` in milli-g.
pub fn accel_value(sample: Acceleration) -> String<ACCEL_VALUE_LEN> {
    let mut out = String::new();
    // cannot overflow: three i16s and two commas fit exactly
    let _ = write!(out, "{},{},{}", sample.x, sample.y, sample.z);
    out
}

/// Write one frame into `out`. Returns the number of bytes used.
pub fn encode(code: Code, value: &[u8], out: &mut [u8]) -> Result<usize, Error> {
    if value.contains(&TERMINATOR) {
        return Err(Error::Protocol);
    }
    let len = value.len() + 3;
    if out.len() < len {
        return Err(Error::BufferOverflow);
    }
    out[0] = code as u8;
    out[1] = SEPARATOR;
    out[2..len - 1].copy_from_slice(value);
    out[len - 1] = TERMINATOR;
    Ok(len)
}

/// A frame from the host, borrowed from the receive buffer.
#[derive(Debug, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// Answer to the request in flight.
    Data(&'a [u8]),
    Reset,
    IdQuery,
    /// `"<delay_ms>;;<img>,<img>,..."` - not yet parsed.
    Images(&'a [u8]),
    /// Change one LED on whatever is showing.
    Pixel { x: usize, y: usize, brightness: u8 },
    /// Start (`true`) or stop streaming accelerometer samples.
    ToggleAccel(bool),
    /// A code this firmware does not act on.
    Ignored(u8),
}

/// Split one line (terminator already stripped) into code and value.
pub fn decode(line: &[u8]) -> Result<Inbound<'_>, Error> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let (&code, rest) = line.split_first().ok_or(Error::Protocol)?;
    let value = match rest.split_first() {
        None => rest,
        Some((&SEPARATOR, value)) => value,
        Some(_) => return Err(Error::Protocol),
    };

    Ok(match Code::from_byte(code) {
        Some(Code::Data) => Inbound::Data(value),
        Some(Code::Reset) => Inbound::Reset,
        Some(Code::IdQuery) => Inbound::IdQuery,
        Some(Code::Image) => Inbound::Images(value),
        Some(Code::Pixel) => parse_pixel(value)?,
        Some(Code::ToggleAccel) => Inbound::ToggleAccel(parse_int(value)? != 0),
        _ => Inbound::Ignored(code),
    })
}

/// `"x,y,brightness"`, all on the grid.
fn parse_pixel(value: &[u8]) -> Result<Inbound<'static>, Error> {
    let mut fields = value.split(|&b| b == b',').map(parse_int);
    let (Some(x), Some(y), Some(brightness), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::Protocol);
    };
    let on_grid = |v: i32| usize::try_from(v).ok().filter(|&v| v < SIZE);
    Ok(Inbound::Pixel {
        x: on_grid(x?).ok_or(Error::Protocol)?,
        y: on_grid(y?).ok_or(Error::Protocol)?,
        brightness: u8::try_from(brightness?)
            .ok()
            .filter(|&b| b <= MAX_BRIGHTNESS)
            .ok_or(Error::Protocol)?,
    })
}

/// Parse an image push: frame delay and up to `MAX_PUSHED_IMAGES` frames.
pub fn parse_images(value: &[u8]) -> Result<(u32, Vec<Bitmap, MAX_PUSHED_IMAGES>), Error> {
    let split = value
        .windows(2)
        .position(|w| w == b";;")
        .ok_or(Error::Protocol)?;
    let delay_ms = parse_int(&value[..split])?;
    if delay_ms < 0 {
        return Err(Error::Protocol);
    }

    let mut images = Vec::new();
    for chunk in value[split + 2..].split(|&b| b == b',') {
        images
            .push(Bitmap::parse(chunk)?)
            .map_err(|_| Error::BufferOverflow)?;
    }
    Ok((delay_ms as u32, images))
}

/// Parse a sensor reading (signed decimal integer).
pub fn parse_reading(value: &[u8]) -> Result<i32, Error> {
    parse_int(value)
}

/// Decode a text reply, truncated to what the display can scroll.
pub fn parse_text(value: &[u8]) -> Result<Text, Error> {
    let s = core::str::from_utf8(value).map_err(|_| Error::Protocol)?;
    let mut text = Text::new();
    for c in s.chars() {
        if text.push(c).is_err() {
            break;
        }
    }
    Ok(text)
}

fn parse_int(digits: &[u8]) -> Result<i32, Error> {
    let s = core::str::from_utf8(digits).map_err(|_| Error::Protocol)?;
    s.trim().parse::<i32>().map_err(|_| Error::Protocol)
}

/// Reassembles newline-terminated frames from a byte stream.
///
/// An over-long line is discarded up to its terminator and reported once
/// as `BufferOverflow`.
pub struct LineBuffer<const N: usize> {
    buf: Vec<u8, N>,
    overflowed: bool,
    complete: bool,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
            complete: false,
        }
    }

    /// Feed one byte; yields a finished line (without terminator).
    pub fn push(&mut self, byte: u8) -> Option<Result<&[u8], Error>> {
        if self.complete {
            self.buf.clear();
            self.complete = false;
        }

        if byte == TERMINATOR {
            if self.overflowed {
                self.overflowed = false;
                self.buf.clear();
                return Some(Err(Error::BufferOverflow));
            }
            self.complete = true;
            return Some(Ok(self.buf.as_slice()));
        }

        if !self.overflowed && self.buf.push(byte).is_err() {
            self.overflowed = true;
        }
        None
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
