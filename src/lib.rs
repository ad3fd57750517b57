//! Host-testable core of the hunterbit firmware.
//!
//! Everything here is pure logic: button debouncing and click
//! classification, LED frames and fonts, gesture detection, the modal
//! hunt controller and the host link codec. None of it touches hardware,
//! so it builds for the host and runs under `cargo test --lib`.
//!
//! The embedded binary (`src/main.rs`, `--features embedded`) wires these
//! types to the micro:bit v2 peripherals.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;

// ═══════════════════════════════════════════════════════════════════════════
// User interface: buttons in, LED matrix out
// ═══════════════════════════════════════════════════════════════════════════

pub mod ui {
    pub mod font;
    pub mod framebuffer;
    pub mod frames;
    pub mod input_logic;
    pub mod job;

    /// Text that fits one scroll job or one host reply.
    pub type Text = heapless::String<{ crate::config::TEXT_CAPACITY }>;

    /// Classified button input (after debouncing).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum ButtonEvent {
        A,
        B,
        /// A and B held together.
        Chord,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Motion: tilt and shake
// ═══════════════════════════════════════════════════════════════════════════

pub mod motion {
    pub mod gesture;
}

// ═══════════════════════════════════════════════════════════════════════════
// Hunt: the modal loop and its per-variant state
// ═══════════════════════════════════════════════════════════════════════════

pub mod hunt {
    pub mod cadence;
    pub mod controller;
    pub mod morse;
    pub mod sigil;

    pub use controller::{Controller, Effect, Event, Mode, Probe, Reading, Variant};
}

// ═══════════════════════════════════════════════════════════════════════════
// Host link
// ═══════════════════════════════════════════════════════════════════════════

pub mod link {
    pub mod protocol;
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
