//! Fixed 5×5 display frames and the reading → frame mapping.
//!
//! A [`Bitmap`] stores one brightness value (0-9) per LED, row-major,
//! row 0 at the top. Built-in frames are written as `#`/`.` art and parsed
//! at compile time; frames pushed by the host use the digit form
//! `"00900:09990:00900:00900:09990"`.

use crate::config::{GMETER_MAX, SCAN_THRESHOLDS};
use crate::error::Error;

/// Matrix edge length.
pub const SIZE: usize = 5;

/// Brightest LED level.
pub const MAX_BRIGHTNESS: u8 = 9;

/// One full-screen image.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bitmap(pub [[u8; SIZE]; SIZE]);

impl Bitmap {
    /// All LEDs off.
    pub const BLANK: Bitmap = Bitmap([[0; SIZE]; SIZE]);

    /// Build from five rows of `#` (lit) / `.` (off) art.
    ///
    /// Any byte other than `#` is treated as off; short rows pad with off.
    pub const fn art(rows: [&str; SIZE]) -> Self {
        let mut px = [[0u8; SIZE]; SIZE];
        let mut y = 0;
        while y < SIZE {
            let row = rows[y].as_bytes();
            let mut x = 0;
            while x < SIZE && x < row.len() {
                if row[x] == b'#' {
                    px[y][x] = MAX_BRIGHTNESS;
                }
                x += 1;
            }
            y += 1;
        }
        Bitmap(px)
    }

    /// Parse the host image format: five rows of five digits, `:`-separated.
    pub fn parse(text: &[u8]) -> Result<Self, Error> {
        let mut px = [[0u8; SIZE]; SIZE];
        let mut rows = text.split(|&b| b == b':');
        for row in px.iter_mut() {
            let digits = rows.next().ok_or(Error::Protocol)?;
            if digits.len() != SIZE {
                return Err(Error::Protocol);
            }
            for (cell, &d) in row.iter_mut().zip(digits) {
                if !d.is_ascii_digit() {
                    return Err(Error::Protocol);
                }
                *cell = d - b'0';
            }
        }
        if rows.next().is_some() {
            return Err(Error::Protocol);
        }
        Ok(Bitmap(px))
    }

    /// Brightness at (x, y); out-of-bounds reads as off.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x < SIZE && y < SIZE {
            self.0[y][x]
        } else {
            0
        }
    }

    /// Set brightness at (x, y), clamped to 0-9. Out-of-bounds is ignored.
    pub fn set(&mut self, x: usize, y: usize, brightness: u8) {
        if x < SIZE && y < SIZE {
            self.0[y][x] = brightness.min(MAX_BRIGHTNESS);
        }
    }

    /// Number of LEDs that are not off.
    pub fn lit(&self) -> usize {
        self.0.iter().flatten().filter(|&&b| b > 0).count()
    }

    /// Light the first `count` LEDs row-major from the top-left.
    pub fn fill_from_top(count: usize) -> Self {
        let mut bm = Bitmap::BLANK;
        for i in 0..count.min(SIZE * SIZE) {
            bm.0[i / SIZE][i % SIZE] = MAX_BRIGHTNESS;
        }
        bm
    }
}

// Scan levels

/// The five ordered scan-strength frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    L0,
    L1,
    L2,
    L3,
    L4,
}

const LEVELS: [Level; 5] = [Level::L0, Level::L1, Level::L2, Level::L3, Level::L4];

impl Level {
    pub fn bitmap(self) -> Bitmap {
        match self {
            Level::L0 => Bitmap::art([".....", ".....", ".....", ".....", "..#.."]),
            Level::L1 => Bitmap::art([".....", ".....", ".....", "..#..", "..#.."]),
            Level::L2 => Bitmap::art([".....", ".....", ".###.", "..#..", "..#.."]),
            Level::L3 => Bitmap::art([".....", "#####", ".###.", "..#..", "..#.."]),
            Level::L4 => Bitmap::art(["#####", "#####", ".###.", "..#..", "..#.."]),
        }
    }
}

/// Map a reading onto its scan level, rejecting values outside 0..=10.
pub fn classify(reading: i32) -> Result<Level, Error> {
    SCAN_THRESHOLDS
        .iter()
        .position(|&upper| reading <= upper)
        .filter(|_| reading >= 0)
        .map(|i| LEVELS[i])
        .ok_or(Error::OutOfRangeReading(reading))
}

/// Total version of [`classify`]: below range is `L0`, above range is `L4`.
pub fn bucket(reading: i32) -> Level {
    match classify(reading) {
        Ok(level) => level,
        Err(_) if reading < 0 => Level::L0,
        Err(_) => Level::L4,
    }
}

/// Radar proximity (0-100 %) as a count of lit LEDs, at least one.
pub fn radar_leds(percent: i32) -> usize {
    let pct = percent.clamp(0, 100) as usize;
    let total = SIZE * SIZE;
    ((pct * total + 99) / 100).max(1)
}

/// Sixteenths of full scale; the graph has three steps per row.
const BAR_STEPS: i64 = 16;

/// Bar graph of `value` against `max`. Grows from the bottom centre LED
/// out to the edges, then up a row. Zero still lights the bottom centre.
pub fn bar_graph(value: i32, max: i32) -> Bitmap {
    let max = i64::from(if max <= 0 { GMETER_MAX } else { max });
    let value = i64::from(value).abs();
    let centre = SIZE / 2;
    let mut bm = Bitmap::BLANK;
    let mut step = 0i64;
    for y in (0..SIZE).rev() {
        for dx in 0..=centre {
            if step * max <= BAR_STEPS * value {
                bm.set(centre - dx, y, MAX_BRIGHTNESS);
                bm.set(centre + dx, y, MAX_BRIGHTNESS);
            }
            step += 1;
        }
    }
    bm
}

// Icons

/// Named static frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    /// Ecto-scope idle: a full-strength lamp.
    Lamp,
    /// Telegraph idle: an antenna mast.
    Mast,
    StickFigure,
    Diamond,
    SmallDiamond,
    Target,
    Sad,
    /// Cross shown when the host rejects a request.
    No,
    Clock12,
    Clock3,
    Clock6,
    Clock9,
}

impl Icon {
    pub fn bitmap(self) -> Bitmap {
        match self {
            Icon::Lamp => Level::L4.bitmap(),
            Icon::Mast => Bitmap::art(["#.#.#", ".###.", "#.#.#", "..#..", "..#.."]),
            Icon::StickFigure => Bitmap::art(["..#..", "#####", "..#..", ".#.#.", "#...#"]),
            Icon::Diamond => Bitmap::art(["..#..", ".#.#.", "#...#", ".#.#.", "..#.."]),
            Icon::SmallDiamond => Bitmap::art([".....", "..#..", ".#.#.", "..#..", "....."]),
            Icon::Target => Bitmap::art(["..#..", ".###.", "##.##", ".###.", "..#.."]),
            Icon::Sad => Bitmap::art([".....", ".#.#.", ".....", ".###.", "#...#"]),
            Icon::No => Bitmap::art(["#...#", ".#.#.", "..#..", ".#.#.", "#...#"]),
            Icon::Clock12 => Bitmap::art(["..#..", "..#..", "..#..", ".....", "....."]),
            Icon::Clock3 => Bitmap::art([".....", ".....", "..###", ".....", "....."]),
            Icon::Clock6 => Bitmap::art([".....", ".....", "..#..", "..#..", "..#.."]),
            Icon::Clock9 => Bitmap::art([".....", ".....", "###..", ".....", "....."]),
        }
    }
}

/// G-meter "searching" sequence.
pub const SEARCHING: [Icon; 3] = [Icon::SmallDiamond, Icon::Target, Icon::Diamond];

/// Radar sweep sequence.
pub const SWEEP: [Icon; 4] = [Icon::Clock12, Icon::Clock3, Icon::Clock6, Icon::Clock9];
