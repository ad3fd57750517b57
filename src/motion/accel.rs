//! LSM303AGR accelerometer driver and motion polling.
//!
//! Only the accelerometer half of the chip is used: 100 Hz, ±2 g,
//! high-resolution mode (12 bit, 1 mg/LSB).

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{debug, info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use embedded_hal_async::i2c::I2c;
use hunterbit::config::{
    ACCEL_STREAM_EVERY, MOTION_POLL_MS, SHAKE_QUIET_SAMPLES, SHAKE_THRESHOLD_MG,
    TILT_THRESHOLD_MG,
};
use hunterbit::error::Error;
use hunterbit::hunt::Event;
use hunterbit::link::protocol::{self, Code};
use hunterbit::motion::gesture::{tilt, Acceleration, ShakeDetector, Tilt};

use crate::link::serial::HostLink;

const ADDRESS: u8 = 0x19;

const WHO_AM_I_A: u8 = 0x0F;
const CTRL_REG1_A: u8 = 0x20;
const CTRL_REG4_A: u8 = 0x23;
const OUT_X_L_A: u8 = 0x28;

const WHO_AM_I_VALUE: u8 = 0x33;

/// ODR 100 Hz, normal power, X/Y/Z enabled.
const CTRL_REG1_100HZ_XYZ: u8 = 0x57;
/// Block data update, ±2 g, high resolution.
const CTRL_REG4_BDU_HR: u8 = 0x88;

/// Register auto-increment on multi-byte reads.
const AUTO_INCREMENT: u8 = 0x80;

/// Latest lean direction, read by the hunt loop on demand.
pub static TILT: Signal<CriticalSectionRawMutex, Tilt> = Signal::new();

/// Host asked for raw samples.
static STREAMING: AtomicBool = AtomicBool::new(false);

/// Turn sample streaming to the host on or off.
pub fn stream(on: bool) {
    STREAMING.store(on, Ordering::Relaxed);
}

pub struct Accelerometer<I> {
    i2c: I,
}

impl<I: I2c> Accelerometer<I> {
    /// Probe and configure the sensor.
    pub async fn new(mut i2c: I) -> Result<Self, Error> {
        let mut id = [0u8; 1];
        i2c.write_read(ADDRESS, &[WHO_AM_I_A], &mut id)
            .await
            .map_err(|_| Error::Accelerometer)?;
        if id[0] != WHO_AM_I_VALUE {
            warn!("Accel: unexpected WHO_AM_I {=u8:#x}", id[0]);
            return Err(Error::Accelerometer);
        }

        for (reg, value) in [
            (CTRL_REG1_A, CTRL_REG1_100HZ_XYZ),
            (CTRL_REG4_A, CTRL_REG4_BDU_HR),
        ] {
            i2c.write(ADDRESS, &[reg, value])
                .await
                .map_err(|_| Error::Accelerometer)?;
        }
        info!("Accel: LSM303AGR ready");
        Ok(Self { i2c })
    }

    /// One sample in milli-g.
    pub async fn read(&mut self) -> Result<Acceleration, Error> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(ADDRESS, &[OUT_X_L_A | AUTO_INCREMENT], &mut raw)
            .await
            .map_err(|_| Error::Accelerometer)?;
        Ok(Acceleration::new(
            axis(raw[0], raw[1]),
            axis(raw[2], raw[3]),
            axis(raw[4], raw[5]),
        ))
    }
}

/// Left-justified 12-bit sample to mg.
fn axis(lo: u8, hi: u8) -> i16 {
    i16::from_le_bytes([lo, hi]) >> 4
}

/// Poll the sensor forever: shakes go to the event channel, the lean is
/// published in [`TILT`], and while streaming is on every
/// `ACCEL_STREAM_EVERY`th sample goes to the host.
pub async fn motion_task<I: I2c, const N: usize>(
    mut accel: Accelerometer<I>,
    tx: Sender<'static, CriticalSectionRawMutex, Event, N>,
    link: HostLink,
) -> ! {
    let mut shake = ShakeDetector::new(SHAKE_THRESHOLD_MG, SHAKE_QUIET_SAMPLES);
    let mut ticker = Ticker::every(Duration::from_millis(MOTION_POLL_MS));
    let mut failing = false;
    let mut since_stream = 0u32;

    loop {
        ticker.next().await;
        let sample = match accel.read().await {
            Ok(s) => s,
            Err(e) => {
                if !failing {
                    warn!("Accel: read failed: {:?}", e);
                    failing = true;
                }
                continue;
            }
        };
        if failing {
            info!("Accel: recovered");
            failing = false;
        }

        TILT.signal(tilt(sample, TILT_THRESHOLD_MG));
        if shake.update(sample) {
            info!("Accel: shake");
            tx.send(Event::Shake).await;
        }

        if !STREAMING.load(Ordering::Relaxed) {
            since_stream = 0;
            continue;
        }
        since_stream += 1;
        if since_stream >= ACCEL_STREAM_EVERY {
            since_stream = 0;
            let value = protocol::accel_value(sample);
            if let Err(e) = link.send(Code::Accel, value.as_bytes()).await {
                debug!("Accel: stream frame dropped: {:?}", e);
            }
        }
    }
}
