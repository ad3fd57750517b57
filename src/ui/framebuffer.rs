//! Shared LED matrix contents.
//!
//! The display task scans this out row by row; everything else only
//! writes it. Writes report whether the visible state changed so callers
//! can skip redundant work.

use super::frames::{Bitmap, SIZE};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Framebuffer {
    current: Bitmap,
}

impl Framebuffer {
    pub const fn new() -> Self {
        Self {
            current: Bitmap::BLANK,
        }
    }

    /// Draw a full frame. Returns `false` if it was already showing.
    pub fn show(&mut self, bitmap: Bitmap) -> bool {
        if self.current == bitmap {
            return false;
        }
        self.current = bitmap;
        true
    }

    /// Turn every LED off.
    pub fn clear(&mut self) -> bool {
        self.show(Bitmap::BLANK)
    }

    /// Change one LED.
    pub fn set_pixel(&mut self, x: usize, y: usize, brightness: u8) -> bool {
        let mut next = self.current;
        next.set(x, y, brightness);
        self.show(next)
    }

    pub fn bitmap(&self) -> Bitmap {
        self.current
    }

    /// Per-row brightness, as the matrix scans it out.
    pub fn row(&self, y: usize) -> [u8; SIZE] {
        self.current.0[y % SIZE]
    }
}
