//! The modal hunt loop.
//!
//! [`Controller`] owns all loop state and never touches hardware. The
//! firmware feeds it one [`Event`] at a time and carries out the single
//! [`Effect`] it returns, then feeds back the outcome (a reading, a tilt,
//! a host reply) as the next event.

use super::morse::{Message, MessageBuffer, Symbol};
use super::sigil::{Sigil, Sign};
use crate::config::{GMETER_MAX, LOOP_DELAY_MS, SCAN_INTERVAL_MS, TILT_INTERVAL_MS};
use crate::error::Error;
use crate::motion::gesture::Tilt;
use crate::ui::frames::{self, Bitmap, Icon};
use crate::ui::job::Job;
use crate::ui::{ButtonEvent, Text};

/// A sensor sample as reported by the host.
pub type Reading = i32;

/// Which tool the board is flashed as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// Continuous ecto-plasm scan, five-level lamp.
    EctoScope,
    /// Morse key, transmits to the host.
    Telegraph,
    /// One-shot bar graph reading.
    GMeter,
    /// One-shot proximity ping.
    Radar,
    /// Tilt-drawn sigil, decoded by the host.
    SpiritSign,
}

impl Variant {
    pub fn idle_icon(self) -> Icon {
        match self {
            Variant::EctoScope => Icon::Lamp,
            Variant::Telegraph => Icon::Mast,
            Variant::GMeter => Icon::Target,
            Variant::Radar => Icon::Diamond,
            Variant::SpiritSign => Icon::StickFigure,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Idle,
    Scanning,
    Composing,
}

/// Sensor requests the host can answer with a [`Reading`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Probe {
    Ecto,
    GMeter,
    Radar,
}

/// Everything the loop reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Button(ButtonEvent),
    Shake,
    /// Loop cadence; see [`Controller::tick_interval_ms`].
    Tick,
    Reading(Result<Reading, Error>),
    Tilt(Tilt),
    /// Host answer to a transmit or decode.
    Reply(Result<Text, Error>),
}

/// The one action the firmware should carry out next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Show(Bitmap),
    ShowText(Text),
    Clear,
    BarGraph { value: Reading, max: Reading },
    Animate(&'static [Icon]),
    Sample(Probe),
    ReadTilt,
    Transmit(Message),
    Decode(Sign),
}

impl Effect {
    /// The display work this effect asks for, if it is a display effect.
    pub fn display_job(&self) -> Option<Job> {
        match self {
            Effect::Show(bm) => Some(Job::Still(*bm)),
            Effect::Clear => Some(Job::Still(Bitmap::BLANK)),
            Effect::BarGraph { value, max } => Some(Job::Still(frames::bar_graph(*value, *max))),
            Effect::ShowText(text) => Some(Job::Scroll(text.clone())),
            Effect::Animate(icons) => Some(Job::animation(icons.iter().map(|i| i.bitmap()))),
            Effect::Sample(_) | Effect::ReadTilt | Effect::Transmit(_) | Effect::Decode(_) => None,
        }
    }
}

/// Outstanding request, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    None,
    Reading,
    Reply,
}

pub struct Controller {
    variant: Variant,
    mode: Mode,
    pending: Pending,
    /// One-shot probe to fire on the next tick.
    queued: Option<Probe>,
    message: MessageBuffer,
    in_flight: Option<Message>,
    sigil: Sigil,
    last_decoded: Text,
}

impl Controller {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            mode: Mode::Idle,
            pending: Pending::None,
            queued: None,
            message: MessageBuffer::new(),
            in_flight: None,
            sigil: Sigil::new(),
            last_decoded: Text::new(),
        }
    }

    /// What to draw at power-on.
    pub fn startup(&self) -> Effect {
        Effect::Show(self.variant.idle_icon().bitmap())
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn message(&self) -> &MessageBuffer {
        &self.message
    }

    /// `true` while a host request is outstanding.
    pub fn is_waiting(&self) -> bool {
        self.pending != Pending::None
    }

    /// Pause before the next [`Event::Tick`].
    pub fn tick_interval_ms(&self) -> u64 {
        match (self.mode, self.variant) {
            (Mode::Scanning, Variant::EctoScope) => SCAN_INTERVAL_MS,
            (Mode::Composing, Variant::SpiritSign) => TILT_INTERVAL_MS,
            _ => LOOP_DELAY_MS,
        }
    }

    pub fn handle(&mut self, event: Event) -> Option<Effect> {
        match self.mode {
            Mode::Idle => self.idle(event),
            Mode::Scanning => self.scanning(event),
            Mode::Composing => match self.variant {
                Variant::SpiritSign => self.drawing(event),
                _ => self.keying(event),
            },
        }
    }

    fn go_idle(&mut self) {
        self.mode = Mode::Idle;
        self.pending = Pending::None;
        self.queued = None;
    }

    fn idle(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::Button(ButtonEvent::A) => Some(self.enter()),
            Event::Shake if self.variant == Variant::SpiritSign && !self.last_decoded.is_empty() => {
                Some(Effect::ShowText(self.last_decoded.clone()))
            }
            _ => None,
        }
    }

    fn enter(&mut self) -> Effect {
        self.pending = Pending::None;
        match self.variant {
            Variant::EctoScope => {
                self.mode = Mode::Scanning;
                Effect::Clear
            }
            Variant::GMeter => {
                self.mode = Mode::Scanning;
                self.queued = Some(Probe::GMeter);
                Effect::Animate(&frames::SEARCHING)
            }
            Variant::Radar => {
                self.mode = Mode::Scanning;
                self.queued = Some(Probe::Radar);
                Effect::Animate(&frames::SWEEP)
            }
            Variant::Telegraph => {
                self.mode = Mode::Composing;
                self.message.clear();
                Effect::Clear
            }
            Variant::SpiritSign => {
                self.mode = Mode::Composing;
                self.sigil = Sigil::new();
                Effect::Show(self.sigil.bitmap())
            }
        }
    }

    fn scanning(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::Button(ButtonEvent::B) | Event::Shake => {
                self.go_idle();
                Some(Effect::Clear)
            }
            Event::Tick if self.pending == Pending::None => {
                let probe = match self.variant {
                    Variant::EctoScope => Probe::Ecto,
                    _ => self.queued.take()?,
                };
                self.pending = Pending::Reading;
                Some(Effect::Sample(probe))
            }
            Event::Reading(result) if self.pending == Pending::Reading => {
                self.pending = Pending::None;
                match result {
                    Ok(reading) => Some(self.render_reading(reading)),
                    Err(_) => {
                        self.go_idle();
                        Some(Effect::Show(self.variant.idle_icon().bitmap()))
                    }
                }
            }
            _ => None,
        }
    }

    fn render_reading(&mut self, reading: Reading) -> Effect {
        match self.variant {
            Variant::GMeter => {
                self.go_idle();
                if reading > 0 {
                    Effect::BarGraph {
                        value: reading,
                        max: GMETER_MAX,
                    }
                } else {
                    Effect::Clear
                }
            }
            Variant::Radar => {
                self.go_idle();
                if reading <= 0 {
                    Effect::Show(Icon::Sad.bitmap())
                } else {
                    Effect::Show(Bitmap::fill_from_top(frames::radar_leds(reading)))
                }
            }
            _ => Effect::Show(frames::bucket(reading).bitmap()),
        }
    }

    /// Telegraph composing.
    fn keying(&mut self, event: Event) -> Option<Effect> {
        if self.pending == Pending::Reply {
            return match event {
                Event::Reply(Ok(text)) => {
                    self.in_flight = None;
                    self.go_idle();
                    Some(Effect::ShowText(text))
                }
                Event::Reply(Err(_)) => {
                    self.pending = Pending::None;
                    if let Some(msg) = self.in_flight.take() {
                        self.message.restore(msg);
                    }
                    Some(Effect::Show(Icon::No.bitmap()))
                }
                _ => None,
            };
        }

        match event {
            Event::Button(ButtonEvent::A) => self.key(Symbol::Dot),
            Event::Button(ButtonEvent::B) => self.key(Symbol::Dash),
            Event::Button(ButtonEvent::Chord) | Event::Shake => {
                if self.message.is_empty() {
                    self.go_idle();
                    return Some(Effect::Clear);
                }
                let msg = self.message.take();
                self.in_flight = Some(msg.clone());
                self.pending = Pending::Reply;
                Some(Effect::Transmit(msg))
            }
            _ => None,
        }
    }

    /// A full buffer refuses the key and shows `No`; flushing still works.
    fn key(&mut self, symbol: Symbol) -> Option<Effect> {
        match self.message.push(symbol) {
            Ok(()) => Some(Effect::ShowText(self.message.render())),
            Err(_) => Some(Effect::Show(Icon::No.bitmap())),
        }
    }

    /// Spirit-sign composing.
    fn drawing(&mut self, event: Event) -> Option<Effect> {
        if self.pending == Pending::Reply {
            return match event {
                Event::Reply(Ok(text)) => {
                    self.last_decoded = text.clone();
                    self.sigil = Sigil::new();
                    self.go_idle();
                    Some(Effect::ShowText(text))
                }
                Event::Reply(Err(_)) => {
                    self.pending = Pending::None;
                    Some(Effect::Show(Icon::No.bitmap()))
                }
                _ => None,
            };
        }

        match event {
            Event::Tick => Some(Effect::ReadTilt),
            Event::Tilt(tilt) => {
                if self.sigil.steer(tilt) {
                    Some(Effect::Show(self.sigil.bitmap()))
                } else {
                    None
                }
            }
            Event::Button(ButtonEvent::A) => {
                self.sigil.mark();
                Some(Effect::Show(self.sigil.bitmap()))
            }
            Event::Button(ButtonEvent::B) | Event::Button(ButtonEvent::Chord) => {
                self.pending = Pending::Reply;
                Some(Effect::Decode(self.sigil.encode()))
            }
            _ => None,
        }
    }
}
