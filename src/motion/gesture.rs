//! Tilt and shake classification from raw accelerometer samples.
//!
//! Axes follow the micro:bit convention with the board face up: +x
//! towards the right edge, +y towards the bottom edge (USB connector at
//! the top), values in milli-g.

/// One accelerometer sample in milli-g.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Acceleration {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    fn magnitude_sq(&self) -> i64 {
        let (x, y, z) = (self.x as i64, self.y as i64, self.z as i64);
        x * x + y * y + z * z
    }
}

/// Direction the board is leaning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tilt {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

impl Tilt {
    /// Cursor step for this lean.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Tilt::None => (0, 0),
            Tilt::Left => (-1, 0),
            Tilt::Right => (1, 0),
            Tilt::Up => (0, -1),
            Tilt::Down => (0, 1),
        }
    }
}

/// Classify a sample into a lean. When both axes exceed the threshold the
/// steeper one wins; ties go to the vertical axis.
pub fn tilt(acc: Acceleration, threshold_mg: i16) -> Tilt {
    let (ax, ay) = (acc.x.unsigned_abs(), acc.y.unsigned_abs());
    let limit = threshold_mg.unsigned_abs();
    let horizontal = ax >= limit;
    let vertical = ay >= limit;

    match (horizontal, vertical) {
        (false, false) => Tilt::None,
        (true, false) => horizontal_tilt(acc.x),
        (false, true) => vertical_tilt(acc.y),
        (true, true) if ax > ay => horizontal_tilt(acc.x),
        (true, true) => vertical_tilt(acc.y),
    }
}

fn horizontal_tilt(x: i16) -> Tilt {
    if x < 0 {
        Tilt::Left
    } else {
        Tilt::Right
    }
}

fn vertical_tilt(y: i16) -> Tilt {
    if y < 0 {
        Tilt::Up
    } else {
        Tilt::Down
    }
}

/// Reports a shake once, then stays quiet until the board has been calm
/// for `quiet_samples` consecutive samples.
#[derive(Clone, Copy, Debug)]
pub struct ShakeDetector {
    threshold_mg: i32,
    quiet_samples: u8,
    calm_run: u8,
    armed: bool,
}

const ONE_G_MG: i32 = 1000;

impl ShakeDetector {
    pub const fn new(threshold_mg: i32, quiet_samples: u8) -> Self {
        Self {
            threshold_mg,
            quiet_samples,
            calm_run: 0,
            armed: true,
        }
    }

    /// Feed one sample; `true` exactly once per shake.
    pub fn update(&mut self, acc: Acceleration) -> bool {
        let high = (ONE_G_MG + self.threshold_mg) as i64;
        let low = (ONE_G_MG - self.threshold_mg).max(0) as i64;
        let mag_sq = acc.magnitude_sq();
        let shaking = mag_sq > high * high || mag_sq < low * low;

        if shaking {
            self.calm_run = 0;
            if self.armed {
                self.armed = false;
                return true;
            }
            return false;
        }

        if !self.armed {
            self.calm_run = self.calm_run.saturating_add(1);
            if self.calm_run >= self.quiet_samples {
                self.armed = true;
            }
        }
        false
    }
}
