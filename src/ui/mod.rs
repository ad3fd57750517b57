//! User interface subsystem - 5×5 LED matrix + two buttons.
//!
//! ## Components
//!
//! - **Buttons**: A and B, polled and debounced into clicks and chords
//! - **Display**: row/column multiplexed LEDs with 10 brightness levels,
//!   fed from a shared framebuffer by a job player (text scrolls,
//!   animations, host-pushed images)

pub mod buttons;
pub mod display;
