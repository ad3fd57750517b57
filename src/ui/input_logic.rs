//! Button edge detection and click/chord classification.
//!
//! Raw levels are sampled at a fixed rate. [`Debouncer`] turns one
//! button's bouncy level into clean press/release edges; a
//! [`ClickClassifier`] combines both buttons' edges into the events the
//! hunt loop consumes.

use crate::ui::ButtonEvent;

/// Which physical button an edge belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    A,
    B,
}

/// A debounced level change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Time-based debouncer for one button.
///
/// A new raw level must hold for `debounce_ms` before it is accepted.
/// Each accepted change yields exactly one [`Edge`], so a press is
/// reported once no matter how often the pin is polled.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    stable: bool,
    candidate: bool,
    since_ms: u64,
    debounce_ms: u64,
}

impl Debouncer {
    /// Start in the released state.
    pub const fn new(debounce_ms: u64) -> Self {
        Self {
            stable: false,
            candidate: false,
            since_ms: 0,
            debounce_ms,
        }
    }

    /// Feed one sample (`pressed` = logical level). Returns the edge, if
    /// this sample completes one.
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<Edge> {
        if pressed != self.candidate {
            self.candidate = pressed;
            self.since_ms = now_ms;
            return None;
        }
        if pressed == self.stable {
            return None;
        }
        if now_ms.wrapping_sub(self.since_ms) < self.debounce_ms {
            return None;
        }
        self.stable = pressed;
        Some(if pressed { Edge::Pressed } else { Edge::Released })
    }

    /// Last accepted level.
    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}

/// Combines A/B edges into clicks and chords.
///
/// A single click is committed on release. If the second button goes
/// down while the first is held, one `Chord` is emitted immediately and
/// neither release produces a click. The chord latch clears once both
/// buttons are up.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClickClassifier {
    a_down: bool,
    b_down: bool,
    chorded: bool,
}

impl ClickClassifier {
    pub const fn new() -> Self {
        Self {
            a_down: false,
            b_down: false,
            chorded: false,
        }
    }

    pub fn on_edge(&mut self, button: Button, edge: Edge) -> Option<ButtonEvent> {
        let (this, other) = match button {
            Button::A => (&mut self.a_down, self.b_down),
            Button::B => (&mut self.b_down, self.a_down),
        };

        match edge {
            Edge::Pressed => {
                *this = true;
                if other && !self.chorded {
                    self.chorded = true;
                    return Some(ButtonEvent::Chord);
                }
                None
            }
            Edge::Released => {
                if !*this {
                    return None;
                }
                *this = false;
                if self.chorded {
                    if !self.a_down && !self.b_down {
                        self.chorded = false;
                    }
                    return None;
                }
                Some(match button {
                    Button::A => ButtonEvent::A,
                    Button::B => ButtonEvent::B,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DB: u64 = 30;

    /// Feed `(level, ms)` samples and collect edges.
    fn run(d: &mut Debouncer, samples: &[(bool, u64)]) -> heapless::Vec<Edge, 16> {
        let mut out = heapless::Vec::new();
        for &(level, t) in samples {
            if let Some(e) = d.update(level, t) {
                out.push(e).unwrap();
            }
        }
        out
    }

    #[test]
    fn bouncy_press_yields_one_edge_each_way() {
        let mut d = Debouncer::new(DB);
        let samples = [
            (true, 0),
            (false, 2),
            (true, 4),
            (false, 6),
            (true, 8),
            (true, 20),
            (true, 40),
            (true, 60),
            (true, 80),
            (false, 100),
            (true, 102),
            (false, 104),
            (false, 140),
            (false, 200),
        ];
        let edges = run(&mut d, &samples);
        assert_eq!(edges.as_slice(), &[Edge::Pressed, Edge::Released]);
        assert!(!d.is_pressed());
    }

    #[test]
    fn poll_rate_does_not_change_edge_count() {
        for step in [1u64, 5, 10] {
            let mut d = Debouncer::new(DB);
            let mut edges = 0;
            let mut t = 0;
            while t < 400 {
                let pressed = (100..250).contains(&t);
                if d.update(pressed, t) == Some(Edge::Pressed) {
                    edges += 1;
                }
                t += step;
            }
            assert_eq!(edges, 1, "step {step}");
        }
    }

    #[test]
    fn glitch_shorter_than_debounce_is_ignored() {
        let mut d = Debouncer::new(DB);
        let edges = run(&mut d, &[(true, 0), (true, 10), (false, 20), (false, 80)]);
        assert!(edges.is_empty());
    }

    #[test]
    fn single_click_commits_on_release() {
        let mut c = ClickClassifier::new();
        assert_eq!(c.on_edge(Button::A, Edge::Pressed), None);
        assert_eq!(c.on_edge(Button::A, Edge::Released), Some(ButtonEvent::A));
        assert_eq!(c.on_edge(Button::B, Edge::Pressed), None);
        assert_eq!(c.on_edge(Button::B, Edge::Released), Some(ButtonEvent::B));
    }

    #[test]
    fn staggered_chord_emits_once_and_swallows_releases() {
        let mut c = ClickClassifier::new();
        assert_eq!(c.on_edge(Button::A, Edge::Pressed), None);
        assert_eq!(c.on_edge(Button::B, Edge::Pressed), Some(ButtonEvent::Chord));
        assert_eq!(c.on_edge(Button::A, Edge::Released), None);
        // re-pressing A while B is still held does not chord again
        assert_eq!(c.on_edge(Button::A, Edge::Pressed), None);
        assert_eq!(c.on_edge(Button::A, Edge::Released), None);
        assert_eq!(c.on_edge(Button::B, Edge::Released), None);
        // latch cleared
        assert_eq!(c.on_edge(Button::B, Edge::Pressed), None);
        assert_eq!(c.on_edge(Button::B, Edge::Released), Some(ButtonEvent::B));
    }

    #[test]
    fn stray_release_is_ignored() {
        let mut c = ClickClassifier::new();
        assert_eq!(c.on_edge(Button::B, Edge::Released), None);
    }
}
