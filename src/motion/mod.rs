//! Motion sensing - LSM303AGR accelerometer on the internal I²C bus.

pub mod accel;
