//! UARTE transport for the host protocol.
//!
//! TX is shared behind an async mutex: the hunt loop sends requests and
//! input reports, the motion task streams samples, the receive task
//! answers id queries. Data frames from
//! the host are answers to the request in flight and are handed back
//! through [`REPLIES`].

use core::fmt::Write;

use defmt::{debug, info, warn};
use embassy_nrf::peripherals::{TIMER0, UARTE0};
use embassy_nrf::uarte::{UarteRxWithIdle, UarteTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_time::{with_timeout, Duration};
use heapless::{String, Vec};
use hunterbit::config::{DEVICE_ID, HOST_LINE_CAPACITY, HOST_REPLY_TIMEOUT_MS};
use hunterbit::error::Error;
use hunterbit::link::protocol::{self, Code, Inbound, LineBuffer};
use hunterbit::ui::job::Job;

use crate::motion::accel;
use crate::ui::display;

pub type Tx = UarteTx<'static, UARTE0>;
pub type Rx = UarteRxWithIdle<'static, UARTE0, TIMER0>;

/// Value bytes of one host data frame.
pub type Payload = Vec<u8, HOST_LINE_CAPACITY>;

/// Answers to the request in flight.
pub static REPLIES: Channel<CriticalSectionRawMutex, Payload, 2> = Channel::new();

/// Encoded frame: code, separator, value, terminator.
const FRAME_CAPACITY: usize = HOST_LINE_CAPACITY + 3;

/// Bytes per DMA read; a read also ends when the line goes idle.
const RX_CHUNK: usize = 32;

#[derive(Clone, Copy)]
pub struct HostLink {
    tx: &'static Mutex<CriticalSectionRawMutex, Tx>,
}

impl HostLink {
    pub fn new(tx: &'static Mutex<CriticalSectionRawMutex, Tx>) -> Self {
        Self { tx }
    }

    /// Write one frame.
    pub async fn send(&self, code: Code, value: &[u8]) -> Result<(), Error> {
        let mut frame = [0u8; FRAME_CAPACITY];
        let len = protocol::encode(code, value, &mut frame)?;
        self.tx
            .lock()
            .await
            .write(&frame[..len])
            .await
            .map_err(|_| Error::Serial)
    }

    /// Send a request and wait for the host's data frame.
    pub async fn request(&self, code: Code, value: &[u8]) -> Result<Payload, Error> {
        // a reply that arrived after its request timed out is stale
        while REPLIES.try_receive().is_ok() {}

        self.send(code, value).await?;
        with_timeout(
            Duration::from_millis(HOST_REPLY_TIMEOUT_MS),
            REPLIES.receive(),
        )
        .await
        .map_err(|_| Error::Timeout)
    }
}

/// Receive host frames forever.
pub async fn rx_task(mut rx: Rx, link: HostLink) -> ! {
    let mut lines: LineBuffer<HOST_LINE_CAPACITY> = LineBuffer::new();
    let mut chunk = [0u8; RX_CHUNK];

    loop {
        let n = match rx.read_until_idle(&mut chunk).await {
            Ok(n) => n,
            Err(e) => {
                warn!("Link: rx error {:?}", e);
                continue;
            }
        };

        for &byte in &chunk[..n] {
            match lines.push(byte) {
                None => {}
                Some(Ok(line)) => match protocol::decode(line) {
                    Ok(frame) => handle(frame, link).await,
                    Err(e) => warn!("Link: bad frame: {:?}", e),
                },
                Some(Err(e)) => warn!("Link: line dropped: {:?}", e),
            }
        }
    }
}

async fn handle(frame: Inbound<'_>, link: HostLink) {
    match frame {
        Inbound::Data(value) => match Payload::from_slice(value) {
            Ok(payload) => {
                if REPLIES.try_send(payload).is_err() {
                    warn!("Link: reply dropped, nobody waiting");
                }
            }
            Err(()) => warn!("Link: reply too long"),
        },
        Inbound::Reset => {
            info!("Link: reset requested");
            cortex_m::peripheral::SCB::sys_reset();
        }
        Inbound::IdQuery => {
            let mut id: String<4> = String::new();
            let _ = write!(id, "{}", DEVICE_ID);
            if let Err(e) = link.send(Code::IdReturn, id.as_bytes()).await {
                warn!("Link: id reply failed: {:?}", e);
            }
        }
        Inbound::Images(value) => match protocol::parse_images(value) {
            Ok((delay_ms, frames)) => {
                info!("Link: {} images, {} ms apart", frames.len(), delay_ms);
                display::play(Job::Sequence {
                    frames,
                    step_ms: delay_ms as u64,
                });
            }
            Err(e) => warn!("Link: bad image push: {:?}", e),
        },
        Inbound::Pixel { x, y, brightness } => {
            if display::set_pixel(x, y, brightness) {
                debug!("Link: pixel ({}, {}) = {}", x, y, brightness);
            }
        }
        Inbound::ToggleAccel(on) => {
            info!("Link: accel streaming {}", if on { "on" } else { "off" });
            accel::stream(on);
        }
        Inbound::Ignored(code) => debug!("Link: ignoring code {=u8:#x}", code),
    }
}
