//! Integration tests for hunterbit host-testable logic.
//!
//! A small bench stands in for the firmware: it applies display effects
//! to a framebuffer and answers host requests by running real frames
//! through the link codec.

use hunterbit::error::Error;
use hunterbit::hunt::morse;
use hunterbit::hunt::{Controller, Effect, Event, Mode, Variant};
use hunterbit::link::protocol::{self, Code, Inbound, LineBuffer};
use hunterbit::ui::framebuffer::Framebuffer;
use hunterbit::ui::frames::{Bitmap, Icon, Level};
use hunterbit::ui::input_logic::{Button, ClickClassifier, Debouncer};
use hunterbit::ui::job::Job;
use hunterbit::ui::{ButtonEvent, Text};

struct Bench {
    controller: Controller,
    screen: Framebuffer,
    /// Raw bytes the device wrote, most recent request last.
    sent: Vec<u8>,
    /// What the host answers to the next request, `None` for silence.
    host_reply: Option<&'static [u8]>,
    scrolled: Option<Text>,
}

impl Bench {
    fn new(variant: Variant) -> Self {
        let controller = Controller::new(variant);
        let mut bench = Self {
            controller,
            screen: Framebuffer::new(),
            sent: Vec::new(),
            host_reply: None,
            scrolled: None,
        };
        let boot = bench.controller.startup();
        bench.apply(Some(boot));
        bench
    }

    fn press(&mut self, button: ButtonEvent) {
        self.feed(Event::Button(button));
    }

    fn feed(&mut self, event: Event) {
        let effect = self.controller.handle(event);
        self.apply(effect);
    }

    fn apply(&mut self, mut next: Option<Effect>) {
        while let Some(effect) = next.take() {
            if let Some(job) = effect.display_job() {
                if let Job::Scroll(text) = &job {
                    self.scrolled = Some(text.clone());
                }
                self.screen.show(job.final_frame());
                continue;
            }
            let outcome = match effect {
                Effect::Sample(probe) => Event::Reading(
                    self.request(Code::from(probe), b"0")
                        .and_then(|v| protocol::parse_reading(&v))
                        .map_err(Error::as_probe_failure),
                ),
                Effect::Transmit(message) => {
                    let text = morse::encode(&message);
                    Event::Reply(
                        self.request(Code::Telegraph, text.as_bytes())
                            .and_then(|v| protocol::parse_text(&v))
                            .map_err(Error::as_transmit_failure),
                    )
                }
                Effect::Decode(sign) => Event::Reply(
                    self.request(Code::SpiritSign, sign.as_bytes())
                        .and_then(|v| protocol::parse_text(&v))
                        .map_err(Error::as_transmit_failure),
                ),
                other => panic!("bench cannot perform {:?}", other),
            };
            next = self.controller.handle(outcome);
        }
    }

    /// Send a request frame and read the host's answer back off the wire.
    fn request(&mut self, code: Code, value: &[u8]) -> Result<Vec<u8>, Error> {
        let mut frame = [0u8; 64];
        let n = protocol::encode(code, value, &mut frame)?;
        self.sent.clear();
        self.sent.extend_from_slice(&frame[..n]);

        let wire = self.host_reply.ok_or(Error::Timeout)?;
        let mut lines: LineBuffer<64> = LineBuffer::new();
        for &b in wire {
            if let Some(line) = lines.push(b) {
                return match protocol::decode(line?)? {
                    Inbound::Data(value) => Ok(value.to_vec()),
                    _ => Err(Error::Protocol),
                };
            }
        }
        Err(Error::Timeout)
    }
}

#[test]
fn ecto_scan_over_the_wire() {
    let mut bench = Bench::new(Variant::EctoScope);
    assert_eq!(bench.screen.bitmap(), Icon::Lamp.bitmap());

    bench.press(ButtonEvent::A);
    assert_eq!(bench.controller.mode(), Mode::Scanning);
    assert_eq!(bench.screen.bitmap(), Bitmap::BLANK);

    bench.host_reply = Some(b"\x18\xFF6\n");
    bench.feed(Event::Tick);
    assert_eq!(bench.sent, b"\x31\xFF0\n");
    assert_eq!(bench.screen.bitmap(), Level::L3.bitmap());

    bench.host_reply = Some(b"\x18\xFF10\r\n");
    bench.feed(Event::Tick);
    assert_eq!(bench.screen.bitmap(), Level::L4.bitmap());

    bench.press(ButtonEvent::B);
    assert_eq!(bench.controller.mode(), Mode::Idle);
    assert_eq!(bench.screen.bitmap(), Bitmap::BLANK);
}

#[test]
fn ecto_scan_host_silence_returns_to_idle() {
    let mut bench = Bench::new(Variant::EctoScope);
    bench.press(ButtonEvent::A);
    bench.host_reply = None;
    bench.feed(Event::Tick);
    assert_eq!(bench.controller.mode(), Mode::Idle);
    assert_eq!(bench.screen.bitmap(), Icon::Lamp.bitmap());
}

#[test]
fn telegraph_round_trip() {
    let mut bench = Bench::new(Variant::Telegraph);
    bench.press(ButtonEvent::A);
    bench.press(ButtonEvent::A);
    bench.press(ButtonEvent::B);
    assert_eq!(bench.scrolled.as_deref(), Some(".-"));

    bench.host_reply = Some(b"\x18\xFFA\n");
    bench.press(ButtonEvent::Chord);
    assert_eq!(bench.sent, b"\x32\xFF.-\n");
    assert_eq!(bench.scrolled.as_deref(), Some("A"));
    assert_eq!(bench.controller.mode(), Mode::Idle);
    assert!(bench.controller.message().is_empty());
}

#[test]
fn telegraph_transmit_failure_keeps_buffer() {
    let mut bench = Bench::new(Variant::Telegraph);
    bench.press(ButtonEvent::A);
    bench.press(ButtonEvent::B);
    bench.press(ButtonEvent::B);

    bench.host_reply = Some(b"\x18:garbled\n");
    bench.feed(Event::Shake);
    assert_eq!(bench.controller.mode(), Mode::Composing);
    assert_eq!(bench.screen.bitmap(), Icon::No.bitmap());
    assert_eq!(bench.controller.message().render().as_str(), "--");

    bench.host_reply = Some(b"\x18\xFFM\n");
    bench.feed(Event::Shake);
    assert_eq!(bench.sent, b"\x32\xFF--\n");
    assert_eq!(bench.controller.mode(), Mode::Idle);
}

#[test]
fn gmeter_bar_graph() {
    let mut bench = Bench::new(Variant::GMeter);
    bench.press(ButtonEvent::A);
    assert_eq!(bench.screen.bitmap(), Icon::Diamond.bitmap());

    bench.host_reply = Some(b"\x18\xFF5\n");
    bench.feed(Event::Tick);
    assert_eq!(bench.sent, b"\x35\xFF0\n");
    assert_eq!(bench.controller.mode(), Mode::Idle);
    // half of ten: the bottom three rows
    assert_eq!(bench.screen.bitmap().lit(), 15);
    assert_eq!(bench.screen.bitmap().get(0, 2), 9);
    assert_eq!(bench.screen.bitmap().get(0, 1), 0);
}

#[test]
fn radar_ping() {
    let mut bench = Bench::new(Variant::Radar);
    bench.press(ButtonEvent::A);
    bench.host_reply = Some(b"\x18\xFF100\n");
    bench.feed(Event::Tick);
    assert_eq!(bench.sent, b"\x30\xFF0\n");
    assert_eq!(bench.screen.bitmap().lit(), 25);

    bench.press(ButtonEvent::A);
    bench.host_reply = Some(b"\x18\xFF0\n");
    bench.feed(Event::Tick);
    assert_eq!(bench.screen.bitmap(), Icon::Sad.bitmap());
}

#[test]
fn spirit_sign_decode() {
    use hunterbit::motion::gesture::Tilt;

    let mut bench = Bench::new(Variant::SpiritSign);
    bench.press(ButtonEvent::A);
    bench.feed(Event::Tilt(Tilt::Down));
    bench.press(ButtonEvent::A);
    bench.feed(Event::Tilt(Tilt::Right));
    bench.press(ButtonEvent::A);

    bench.host_reply = Some(b"\x18\xFFBOO\n");
    bench.press(ButtonEvent::B);
    assert_eq!(bench.sent, b"\x33\xFF00000:99000:00000:00000:00000\n");
    assert_eq!(bench.scrolled.as_deref(), Some("BOO"));
    assert_eq!(bench.controller.mode(), Mode::Idle);

    bench.scrolled = None;
    bench.feed(Event::Shake);
    assert_eq!(bench.scrolled.as_deref(), Some("BOO"));
}

#[test]
fn raw_button_levels_drive_the_loop() {
    let mut bench = Bench::new(Variant::Telegraph);
    let mut a = Debouncer::new(30);
    let mut b = Debouncer::new(30);
    let mut clicks = ClickClassifier::new();

    // (t, a pressed, b pressed): click A, click B, then chord
    let timeline = [
        (0, true, false),
        (40, true, false),
        (60, false, false),
        (100, false, false),
        (120, false, true),
        (160, false, true),
        (180, false, false),
        (220, false, false),
        (240, true, false),
        (280, true, true),
        (320, true, true),
        (340, false, false),
        (380, false, false),
    ];
    bench.host_reply = Some(b"\x18\xFFN\n");
    let mut events = Vec::new();
    for (t, la, lb) in timeline {
        let edges = [
            a.update(la, t).map(|e| (Button::A, e)),
            b.update(lb, t).map(|e| (Button::B, e)),
        ];
        for (button, edge) in edges.into_iter().flatten() {
            if let Some(event) = clicks.on_edge(button, edge) {
                events.push(event);
                bench.press(event);
            }
        }
    }

    assert_eq!(
        events,
        [ButtonEvent::A, ButtonEvent::B, ButtonEvent::Chord]
    );
    // first A entered composing, B keyed a dash, chord sent it
    assert_eq!(bench.sent, b"\x32\xFF-\n");
    assert_eq!(bench.controller.mode(), Mode::Idle);
}

#[test]
fn host_image_push_plays_to_last_frame() {
    let mut lines: LineBuffer<128> = LineBuffer::new();
    let wire = b"\x13\xFF100;;90009:09090:00900:09090:90009,00000:00000:00900:00000:00000\n";
    let mut screen = Framebuffer::new();
    for &byte in wire.iter() {
        if let Some(line) = lines.push(byte) {
            let Ok(Inbound::Images(value)) = protocol::decode(line.unwrap()) else {
                panic!("expected an image push");
            };
            let (delay, frames) = protocol::parse_images(value).unwrap();
            let job = Job::Sequence {
                frames,
                step_ms: delay as u64,
            };
            assert_eq!(job.step_ms(), 100);
            assert_eq!(job.frame(0).unwrap().lit(), 9);
            screen.show(job.final_frame());
        }
    }
    assert_eq!(screen.bitmap().lit(), 1);
    assert_eq!(screen.bitmap().get(2, 2), 9);
}

#[test]
fn host_pixel_command_edits_what_is_showing() {
    let mut screen = Framebuffer::new();
    screen.show(Icon::Lamp.bitmap());
    let mut lines: LineBuffer<64> = LineBuffer::new();
    for &byte in b"\x12\xFF4,0,3\n\x12\xFF9,9,9\n".iter() {
        if let Some(line) = lines.push(byte) {
            if let Ok(Inbound::Pixel { x, y, brightness }) = protocol::decode(line.unwrap()) {
                screen.set_pixel(x, y, brightness);
            }
        }
    }
    assert_eq!(screen.bitmap().get(4, 0), 3);
    assert_eq!(screen.row(0)[..4], Icon::Lamp.bitmap().0[0][..4]);
}
