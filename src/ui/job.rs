//! Work items for the display task.

use super::font;
use super::frames::Bitmap;
use super::Text;
use crate::config::{ANIMATION_STEP_MS, MAX_PUSHED_IMAGES, SCROLL_STEP_MS};
use heapless::Vec;

pub type Frames = Vec<Bitmap, MAX_PUSHED_IMAGES>;

/// What the display should do until told otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Job {
    /// Hold one frame.
    Still(Bitmap),
    /// Scroll text through once, ending blank.
    Scroll(Text),
    /// Play frames once at a fixed pace, leaving the last one up.
    Sequence { frames: Frames, step_ms: u64 },
}

impl Job {
    /// An animation at the default pace.
    pub fn animation(frames: impl IntoIterator<Item = Bitmap>) -> Self {
        Job::Sequence {
            frames: frames.into_iter().take(MAX_PUSHED_IMAGES).collect(),
            step_ms: ANIMATION_STEP_MS,
        }
    }

    /// Delay between frames.
    pub fn step_ms(&self) -> u64 {
        match self {
            Job::Still(_) => 0,
            Job::Scroll(_) => SCROLL_STEP_MS,
            Job::Sequence { step_ms, .. } => *step_ms,
        }
    }

    /// Frame `index` of the job, `None` past the end.
    pub fn frame(&self, index: usize) -> Option<Bitmap> {
        match self {
            Job::Still(bm) => (index == 0).then_some(*bm),
            Job::Scroll(text) => font::scroll(text.as_str()).nth(index),
            Job::Sequence { frames, .. } => frames.get(index).copied(),
        }
    }

    /// Frame left on screen once the job has played out.
    pub fn final_frame(&self) -> Bitmap {
        match self {
            Job::Still(bm) => *bm,
            Job::Scroll(_) => Bitmap::BLANK,
            Job::Sequence { frames, .. } => frames.last().copied().unwrap_or(Bitmap::BLANK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::frames::{Icon, SEARCHING};

    #[test]
    fn still_has_one_frame() {
        let job = Job::Still(Icon::Sad.bitmap());
        assert_eq!(job.frame(0), Some(Icon::Sad.bitmap()));
        assert_eq!(job.frame(1), None);
    }

    #[test]
    fn animation_leaves_last_frame() {
        let job = Job::animation(SEARCHING.iter().map(|i| i.bitmap()));
        assert_eq!(job.step_ms(), ANIMATION_STEP_MS);
        assert_eq!(job.final_frame(), Icon::Diamond.bitmap());
        assert_eq!(job.frame(3), None);
    }

    #[test]
    fn scroll_ends_blank() {
        let mut text = Text::new();
        text.push_str("HI").unwrap();
        let job = Job::Scroll(text);
        assert_eq!(job.final_frame(), Bitmap::BLANK);
        assert!(job.frame(0).is_some());
    }
}
