//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, thresholds and
//! protocol constants live here so they can be tuned in one place.

use crate::hunt::Variant;

// Device

/// Which ghost-hunting tool this board is flashed as.
pub const VARIANT: Variant = Variant::EctoScope;

/// Identifier reported to the host in reply to an id query.
pub const DEVICE_ID: u8 = 1;

// Host link

/// UART baud rate towards the hunt host.
pub const HOST_BAUD: u32 = 115_200;

/// Value sent with the one-off ready frame on startup.
pub const HANDSHAKE: &str = "Ready";

/// How long a probe / transmit / decode request waits for the host (ms).
pub const HOST_REPLY_TIMEOUT_MS: u64 = 1_000;

/// Longest frame (code + separator + value) we accept from the host.
pub const HOST_LINE_CAPACITY: usize = 192;

// GPIO pin assignments (micro:bit v2)
//
// These are logical names; the actual `embassy_nrf::peripherals::*` are
// taken in `main.rs`.
//
//   Button A        → P0.14
//   Button B        → P0.23
//   UART TX / RX    → P0.06 / P1.08 (USB interface chip)
//   I²C SDA / SCL   → P0.16 / P0.08 (internal bus, LSM303AGR)
//   LED rows 1..5   → P0.21 P0.22 P0.15 P0.24 P0.19
//   LED cols 1..5   → P0.28 P0.11 P0.31 P1.05 P0.30

// Main loop timing

/// Pause between loop iterations while Idle or Composing (ms).
pub const LOOP_DELAY_MS: u64 = 100;

/// Pause between samples while scanning (ms).
pub const SCAN_INTERVAL_MS: u64 = 500;

/// Pause between tilt reads while drawing a sigil (ms).
pub const TILT_INTERVAL_MS: u64 = 300;

// Input

/// How often the buttons are sampled (ms).
pub const INPUT_POLL_MS: u64 = 5;

/// A raw level must hold this long before it counts as a press/release (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 30;

/// Accelerometer sample period (ms).
pub const MOTION_POLL_MS: u64 = 20;

/// Lean threshold in milli-g before a tilt registers.
pub const TILT_THRESHOLD_MG: i16 = 200;

/// Deviation of |a| from 1 g (milli-g) that counts as shaking.
pub const SHAKE_THRESHOLD_MG: i32 = 900;

/// Calm samples required before another shake can fire.
pub const SHAKE_QUIET_SAMPLES: u8 = 10;

/// While the host has streaming on, one `x,y,z` frame per this many
/// samples (100 ms at the poll rate above).
pub const ACCEL_STREAM_EVERY: u32 = 5;

// Display

/// Upper bounds of the five scan levels, lowest first.
pub const SCAN_THRESHOLDS: [i32; 5] = [0, 3, 5, 7, 10];

/// Full-scale value of the g-meter bar graph.
pub const GMETER_MAX: i32 = 10;

/// Scroll step for text (ms per column).
pub const SCROLL_STEP_MS: u64 = 150;

/// Frame period for icon animations (ms).
pub const ANIMATION_STEP_MS: u64 = 200;

/// Longest text the display will scroll.
pub const TEXT_CAPACITY: usize = 32;

/// Longest image sequence the host can push in one frame.
pub const MAX_PUSHED_IMAGES: usize = 8;

// Message buffer

/// Maximum Morse symbols held before a flush.
pub const MESSAGE_CAPACITY: usize = 24;
