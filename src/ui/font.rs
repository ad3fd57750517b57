//! 5×5 glyphs and horizontal text scrolling for the LED matrix.
//!
//! Each glyph is five row masks, bit 4 = leftmost column. Glyph width is
//! derived from the rightmost lit column so narrow characters scroll
//! tightly, with one blank column between characters.

use super::frames::{Bitmap, MAX_BRIGHTNESS, SIZE};

type Glyph = [u8; SIZE];

const SPACE: Glyph = [0; SIZE];
const UNKNOWN: Glyph = [0x0C, 0x12, 0x04, 0x00, 0x04];

const LETTERS: [Glyph; 26] = [
    [0x0C, 0x12, 0x1E, 0x12, 0x12], // A
    [0x1C, 0x12, 0x1C, 0x12, 0x1C], // B
    [0x0E, 0x10, 0x10, 0x10, 0x0E], // C
    [0x1C, 0x12, 0x12, 0x12, 0x1C], // D
    [0x1E, 0x10, 0x1C, 0x10, 0x1E], // E
    [0x1E, 0x10, 0x1C, 0x10, 0x10], // F
    [0x0E, 0x10, 0x16, 0x12, 0x0E], // G
    [0x12, 0x12, 0x1E, 0x12, 0x12], // H
    [0x1C, 0x08, 0x08, 0x08, 0x1C], // I
    [0x1E, 0x04, 0x04, 0x14, 0x08], // J
    [0x12, 0x14, 0x18, 0x14, 0x12], // K
    [0x10, 0x10, 0x10, 0x10, 0x1E], // L
    [0x11, 0x1B, 0x15, 0x11, 0x11], // M
    [0x11, 0x19, 0x15, 0x13, 0x11], // N
    [0x0C, 0x12, 0x12, 0x12, 0x0C], // O
    [0x1C, 0x12, 0x1C, 0x10, 0x10], // P
    [0x0C, 0x12, 0x12, 0x0C, 0x06], // Q
    [0x1C, 0x12, 0x1C, 0x12, 0x11], // R
    [0x0E, 0x10, 0x0C, 0x02, 0x1C], // S
    [0x1F, 0x04, 0x04, 0x04, 0x04], // T
    [0x12, 0x12, 0x12, 0x12, 0x0C], // U
    [0x11, 0x11, 0x11, 0x0A, 0x04], // V
    [0x11, 0x11, 0x15, 0x1B, 0x11], // W
    [0x12, 0x12, 0x0C, 0x12, 0x12], // X
    [0x11, 0x0A, 0x04, 0x04, 0x04], // Y
    [0x1E, 0x04, 0x08, 0x10, 0x1E], // Z
];

const DIGITS: [Glyph; 10] = [
    [0x08, 0x14, 0x14, 0x14, 0x08], // 0
    [0x08, 0x18, 0x08, 0x08, 0x1C], // 1
    [0x1C, 0x02, 0x0C, 0x10, 0x1E], // 2
    [0x1E, 0x02, 0x04, 0x12, 0x0C], // 3
    [0x04, 0x0C, 0x14, 0x1E, 0x04], // 4
    [0x1E, 0x10, 0x1C, 0x02, 0x1C], // 5
    [0x02, 0x04, 0x0E, 0x12, 0x0C], // 6
    [0x1E, 0x02, 0x04, 0x08, 0x08], // 7
    [0x0C, 0x12, 0x0C, 0x12, 0x0C], // 8
    [0x0E, 0x12, 0x0E, 0x04, 0x08], // 9
];

fn glyph(c: char) -> Glyph {
    match c.to_ascii_uppercase() {
        ' ' => SPACE,
        '.' => [0x00, 0x00, 0x00, 0x00, 0x08],
        '-' => [0x00, 0x00, 0x1C, 0x00, 0x00],
        '!' => [0x08, 0x08, 0x08, 0x00, 0x08],
        ':' => [0x00, 0x08, 0x00, 0x08, 0x00],
        '?' => UNKNOWN,
        c @ 'A'..='Z' => LETTERS[(c as u8 - b'A') as usize],
        c @ '0'..='9' => DIGITS[(c as u8 - b'0') as usize],
        _ => UNKNOWN,
    }
}

/// Columns occupied by a glyph (space is three wide).
fn width(g: &Glyph) -> usize {
    let mask = g.iter().fold(0u8, |acc, row| acc | row);
    if mask == 0 {
        return 3;
    }
    SIZE - mask.trailing_zeros() as usize
}

fn column_lit(g: &Glyph, col: usize) -> [bool; SIZE] {
    let bit = 1u8 << (SIZE - 1 - col);
    core::array::from_fn(|y| g[y] & bit != 0)
}

/// Iterator over the frames of a text scrolling in from the right and
/// out to the left, one column per frame.
pub struct Scroll<'a> {
    chars: core::str::Chars<'a>,
    current: Option<(Glyph, usize, usize)>,
    window: Bitmap,
    trailing: usize,
}

impl<'a> Scroll<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
            current: None,
            window: Bitmap::BLANK,
            trailing: SIZE,
        }
    }

    /// Next column entering on the right, or `None` once text and the
    /// trailing blank run-out are exhausted.
    fn next_column(&mut self) -> Option<[bool; SIZE]> {
        loop {
            if let Some((g, w, col)) = self.current.as_mut() {
                if *col < *w {
                    let lit = column_lit(g, *col);
                    *col += 1;
                    return Some(lit);
                }
                if *col == *w {
                    // inter-character gap
                    *col += 1;
                    return Some([false; SIZE]);
                }
                self.current = None;
            }
            match self.chars.next() {
                Some(c) => {
                    let g = glyph(c);
                    self.current = Some((g, width(&g), 0));
                }
                None if self.trailing > 0 => {
                    self.trailing -= 1;
                    return Some([false; SIZE]);
                }
                None => return None,
            }
        }
    }
}

impl Iterator for Scroll<'_> {
    type Item = Bitmap;

    fn next(&mut self) -> Option<Bitmap> {
        let column = self.next_column()?;
        for (y, row) in self.window.0.iter_mut().enumerate() {
            row.copy_within(1.., 0);
            row[SIZE - 1] = if column[y] { MAX_BRIGHTNESS } else { 0 };
        }
        Some(self.window)
    }
}

/// Scroll frames for `text`.
pub fn scroll(text: &str) -> Scroll<'_> {
    Scroll::new(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_glyphs_are_narrow() {
        assert_eq!(width(&glyph('.')), 2);
        assert_eq!(width(&glyph('-')), 3);
        assert_eq!(width(&glyph('M')), 5);
        assert_eq!(width(&glyph(' ')), 3);
    }

    #[test]
    fn lowercase_maps_to_uppercase() {
        assert_eq!(glyph('b'), glyph('B'));
        assert_eq!(glyph('~'), UNKNOWN);
    }

    #[test]
    fn scroll_frame_count() {
        // "." is 2 wide + 1 gap, then five blank columns push it out.
        assert_eq!(scroll(".").count(), 3 + SIZE);
        // empty text still clears the window
        assert_eq!(scroll("").count(), SIZE);
    }

    #[test]
    fn scroll_ends_blank() {
        let last = scroll("BOO!").last().unwrap();
        assert_eq!(last, Bitmap::BLANK);
    }

    #[test]
    fn dot_enters_on_the_right() {
        let mut frames = scroll(".");
        // first column of '.' is blank
        assert_eq!(frames.next().unwrap(), Bitmap::BLANK);
        let second = frames.next().unwrap();
        assert_eq!(second.get(4, 4), MAX_BRIGHTNESS);
        assert_eq!(second.lit(), 1);
    }
}
