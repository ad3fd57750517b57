//! Spirit-sign drawing canvas.
//!
//! The user steers a cursor by tilting the board and marks pixels with
//! button A. The finished drawing is sent to the host in image format,
//! marks only.

use crate::motion::gesture::Tilt;
use crate::ui::frames::{Bitmap, MAX_BRIGHTNESS, SIZE};
use heapless::String;

/// Brightness of the cursor over an unmarked pixel.
pub const CURSOR_BRIGHTNESS: u8 = 5;

/// `"ddddd:ddddd:ddddd:ddddd:ddddd"`
pub const SIGN_LEN: usize = SIZE * SIZE + SIZE - 1;

pub type Sign = String<SIGN_LEN>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sigil {
    marks: [[bool; SIZE]; SIZE],
    x: usize,
    y: usize,
}

impl Sigil {
    pub const fn new() -> Self {
        Self {
            marks: [[false; SIZE]; SIZE],
            x: 0,
            y: 0,
        }
    }

    /// Move one step in the lean direction, staying on the grid. Returns
    /// whether the cursor moved.
    pub fn steer(&mut self, tilt: Tilt) -> bool {
        let (dx, dy) = tilt.delta();
        let nx = step(self.x, dx);
        let ny = step(self.y, dy);
        let moved = (nx, ny) != (self.x, self.y);
        self.x = nx;
        self.y = ny;
        moved
    }

    /// Mark the pixel under the cursor.
    pub fn mark(&mut self) {
        self.marks[self.y][self.x] = true;
    }

    /// Marks at full brightness plus the cursor.
    pub fn bitmap(&self) -> Bitmap {
        let mut bm = self.marks_bitmap();
        if !self.marks[self.y][self.x] {
            bm.set(self.x, self.y, CURSOR_BRIGHTNESS);
        }
        bm
    }

    fn marks_bitmap(&self) -> Bitmap {
        let mut bm = Bitmap::BLANK;
        for (y, row) in self.marks.iter().enumerate() {
            for (x, &marked) in row.iter().enumerate() {
                if marked {
                    bm.set(x, y, MAX_BRIGHTNESS);
                }
            }
        }
        bm
    }

    /// Host image string of the marks, cursor excluded.
    pub fn encode(&self) -> Sign {
        let bm = self.marks_bitmap();
        let mut out = Sign::new();
        for (y, row) in bm.0.iter().enumerate() {
            if y > 0 {
                let _ = out.push(':');
            }
            for &b in row {
                let _ = out.push((b'0' + b) as char);
            }
        }
        out
    }
}

fn step(pos: usize, delta: i8) -> usize {
    match delta {
        d if d < 0 => pos.saturating_sub(1),
        d if d > 0 => (pos + 1).min(SIZE - 1),
        _ => pos,
    }
}
