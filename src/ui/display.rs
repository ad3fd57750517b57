//! LED matrix driver and job player.
//!
//! The micro:bit v2 matrix is 5 rows (active high) by 5 columns (active
//! low). One row is lit at a time; within a row's slot the columns are
//! pulse-width modulated in `MAX_BRIGHTNESS` sub-slots so each pixel's
//! on-time follows its 0-9 brightness.
//!
//! Two tasks share the [`FRAMEBUFFER`]: the refresh loop only reads it,
//! the job player only writes it.

use core::cell::RefCell;

use defmt::debug;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use embedded_hal::digital::OutputPin;
use hunterbit::ui::framebuffer::Framebuffer;
use hunterbit::ui::frames::{Bitmap, MAX_BRIGHTNESS, SIZE};
use hunterbit::ui::job::Job;

/// One PWM sub-slot. A full frame takes `SIZE * MAX_BRIGHTNESS` slots.
const SLOT_US: u64 = 200;

pub static FRAMEBUFFER: Mutex<CriticalSectionRawMutex, RefCell<Framebuffer>> =
    Mutex::new(RefCell::new(Framebuffer::new()));

/// Latest display job. A new job pre-empts the one playing.
pub static JOBS: Signal<CriticalSectionRawMutex, Job> = Signal::new();

/// Hand a job to the player.
pub fn play(job: Job) {
    JOBS.signal(job);
}

/// Change one LED on whatever is showing. A job still playing draws
/// over it with its next frame.
pub fn set_pixel(x: usize, y: usize, brightness: u8) -> bool {
    FRAMEBUFFER.lock(|fb| fb.borrow_mut().set_pixel(x, y, brightness))
}

fn show(bitmap: Bitmap) -> bool {
    FRAMEBUFFER.lock(|fb| fb.borrow_mut().show(bitmap))
}

fn snapshot() -> Framebuffer {
    FRAMEBUFFER.lock(|fb| *fb.borrow())
}

pub struct LedMatrix<R, C> {
    rows: [R; SIZE],
    cols: [C; SIZE],
}

impl<R: OutputPin, C: OutputPin> LedMatrix<R, C> {
    /// Take the pins and switch every LED off.
    pub fn new(rows: [R; SIZE], cols: [C; SIZE]) -> Self {
        let mut matrix = Self { rows, cols };
        for row in &mut matrix.rows {
            let _ = row.set_low();
        }
        matrix.blank_columns();
        matrix
    }

    fn blank_columns(&mut self) {
        for col in &mut self.cols {
            let _ = col.set_high();
        }
    }

    /// Scan one full frame out.
    pub async fn scan(&mut self, frame: &Framebuffer) {
        for y in 0..SIZE {
            let levels = frame.row(y);
            if levels.iter().all(|&b| b == 0) {
                Timer::after_micros(SLOT_US * MAX_BRIGHTNESS as u64).await;
                continue;
            }
            let _ = self.rows[y].set_high();
            for slot in 0..MAX_BRIGHTNESS {
                for (col, &level) in self.cols.iter_mut().zip(&levels) {
                    let _ = if level > slot {
                        col.set_low()
                    } else {
                        col.set_high()
                    };
                }
                Timer::after_micros(SLOT_US).await;
            }
            self.blank_columns();
            let _ = self.rows[y].set_low();
        }
    }
}

/// Refresh the matrix from the framebuffer forever.
pub async fn refresh_task<R: OutputPin, C: OutputPin>(mut matrix: LedMatrix<R, C>) -> ! {
    loop {
        let frame = snapshot();
        matrix.scan(&frame).await;
    }
}

/// Play jobs as they arrive.
pub async fn job_task() -> ! {
    let mut job = JOBS.wait().await;
    loop {
        job = match run(&job).await {
            Some(next) => next,
            None => JOBS.wait().await,
        };
    }
}

/// Play one job to the end, or until pre-empted by the next one.
async fn run(job: &Job) -> Option<Job> {
    let step = Duration::from_millis(job.step_ms());
    let mut index = 0;

    while let Some(frame) = job.frame(index) {
        show(frame);
        if let Either::Second(next) = select(Timer::after(step), JOBS.wait()).await {
            debug!("Display: job pre-empted at frame {}", index);
            return Some(next);
        }
        index += 1;
    }
    show(job.final_frame());
    None
}
