//! Button polling.
//!
//! Both buttons are active-low with external pull-ups (A = P0.14,
//! B = P0.23). Levels are sampled every `INPUT_POLL_MS`; each button has
//! its own time-based debouncer and the click classifier turns the two
//! edge streams into `A`, `B` and `Chord` events for the hunt loop.

use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Instant, Ticker};
use embedded_hal::digital::InputPin;
use hunterbit::config::{BUTTON_DEBOUNCE_MS, INPUT_POLL_MS};
use hunterbit::hunt::Event;
use hunterbit::ui::input_logic::{Button, ClickClassifier, Debouncer};
use hunterbit::ui::ButtonEvent;

/// Both buttons plus their edge state.
pub struct Buttons<A, B> {
    a: A,
    b: B,
    debounce_a: Debouncer,
    debounce_b: Debouncer,
    clicks: ClickClassifier,
}

impl<A: InputPin, B: InputPin> Buttons<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self {
            a,
            b,
            debounce_a: Debouncer::new(BUTTON_DEBOUNCE_MS),
            debounce_b: Debouncer::new(BUTTON_DEBOUNCE_MS),
            clicks: ClickClassifier::new(),
        }
    }

    /// Sample both pins once. At most one event per button per sample.
    pub fn poll(&mut self, now_ms: u64) -> [Option<ButtonEvent>; 2] {
        let a = pressed(&mut self.a);
        let b = pressed(&mut self.b);
        [
            self.debounce_a
                .update(a, now_ms)
                .and_then(|edge| self.clicks.on_edge(Button::A, edge)),
            self.debounce_b
                .update(b, now_ms)
                .and_then(|edge| self.clicks.on_edge(Button::B, edge)),
        ]
    }
}

/// A pin read error counts as released.
fn pressed(pin: &mut impl InputPin) -> bool {
    match pin.is_low() {
        Ok(low) => low,
        Err(_) => {
            warn!("Button: pin read failed");
            false
        }
    }
}

/// Poll forever, forwarding classified clicks to the hunt loop.
pub async fn button_task<A: InputPin, B: InputPin, const N: usize>(
    mut buttons: Buttons<A, B>,
    tx: Sender<'static, CriticalSectionRawMutex, Event, N>,
) -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(INPUT_POLL_MS));

    loop {
        for event in buttons.poll(Instant::now().as_millis()).into_iter().flatten() {
            info!("Button: {}", event);
            tx.send(Event::Button(event)).await;
        }
        ticker.next().await;
    }
}
