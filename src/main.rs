//! hunterbit firmware for the micro:bit v2 (nRF52833).
//!
//! Tasks:
//! - `input_task`: polls buttons A/B into clicks and chords
//! - `motion_task`: accelerometer shake and tilt detection, sample streaming
//! - `refresh_task` / `job_task`: LED matrix multiplexing and display jobs
//! - `link_rx_task`: host frames from the USB serial bridge
//! - main: the hunt controller loop

#![no_std]
#![no_main]

mod link;
mod motion;
mod ui;

use defmt::{debug, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{AnyPin, Input, Level, Output, OutputDrive, Pin, Pull};
use embassy_nrf::peripherals::{TWISPI0, UARTE0};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::uarte::{self, Uarte};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_time::{Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hunterbit::config::{HANDSHAKE, HOST_BAUD, VARIANT};
use hunterbit::error::Error;
use hunterbit::hunt::cadence::Cadence;
use hunterbit::hunt::{morse, Controller, Effect, Event, Variant};
use hunterbit::link::protocol::{self, Code};
use hunterbit::ui::{frames, Text};

use crate::link::serial::{self, HostLink, Rx, Tx};
use crate::motion::accel::{self, Accelerometer};
use crate::ui::buttons::{self, Buttons};
use crate::ui::display::{self, LedMatrix};

bind_interrupts!(struct Irqs {
    UARTE0_UART0 => uarte::InterruptHandler<UARTE0>;
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<TWISPI0>;
});

/// Buttons and shakes, in arrival order.
static EVENTS: Channel<CriticalSectionRawMutex, Event, 8> = Channel::new();

static HOST_TX: StaticCell<Mutex<CriticalSectionRawMutex, Tx>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("hunterbit starting as {:?}", VARIANT);

    let p = embassy_nrf::init(Default::default());

    // LED matrix: rows P0.21 P0.22 P0.15 P0.24 P0.19, cols P0.28 P0.11 P0.31 P1.05 P0.30
    let row = |pin: AnyPin| Output::new(pin, Level::Low, OutputDrive::Standard);
    let col = |pin: AnyPin| Output::new(pin, Level::High, OutputDrive::Standard);
    let matrix = LedMatrix::new(
        [
            row(p.P0_21.degrade()),
            row(p.P0_22.degrade()),
            row(p.P0_15.degrade()),
            row(p.P0_24.degrade()),
            row(p.P0_19.degrade()),
        ],
        [
            col(p.P0_28.degrade()),
            col(p.P0_11.degrade()),
            col(p.P0_31.degrade()),
            col(p.P1_05.degrade()),
            col(p.P0_30.degrade()),
        ],
    );
    unwrap!(spawner.spawn(refresh_task(matrix)));
    unwrap!(spawner.spawn(job_task()));

    // Buttons A = P0.14, B = P0.23
    let buttons = Buttons::new(Input::new(p.P0_14, Pull::Up), Input::new(p.P0_23, Pull::Up));
    unwrap!(spawner.spawn(input_task(buttons)));

    // Host link: RX P1.08, TX P0.06
    let mut uart_config = uarte::Config::default();
    uart_config.parity = uarte::Parity::EXCLUDED;
    uart_config.baudrate = uarte::Baudrate::BAUD115200;
    let uart = Uarte::new(p.UARTE0, Irqs, p.P1_08, p.P0_06, uart_config);
    let (tx, rx) = uart.split_with_idle(p.TIMER0, p.PPI_CH0, p.PPI_CH1);
    let link = HostLink::new(HOST_TX.init(Mutex::new(tx)));
    unwrap!(spawner.spawn(link_rx_task(rx, link)));
    info!("Link: UARTE0 at {} baud", HOST_BAUD);

    // Internal I²C: SDA P0.16, SCL P0.08
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_16, p.P0_08, twim::Config::default());
    match Accelerometer::new(i2c).await {
        Ok(accel) => unwrap!(spawner.spawn(motion_task(accel, link))),
        Err(e) => warn!("Accel: unavailable ({:?}), running without shake/tilt", e),
    }

    let mut controller = Controller::new(VARIANT);
    let boot = controller.startup();
    apply(&mut controller, boot, link).await;

    if let Err(e) = link.send(Code::Ready, HANDSHAKE.as_bytes()).await {
        warn!("Link: handshake failed: {:?}", e);
    }

    let mut cadence = Cadence::new(controller.tick_interval_ms(), now_ms());
    loop {
        let tick = Timer::at(Instant::from_millis(cadence.deadline_ms()));
        let event = match select(EVENTS.receive(), tick).await {
            Either::First(event) => event,
            Either::Second(()) => {
                cadence.fire(now_ms());
                Event::Tick
            }
        };

        if let Event::Button(button) = event {
            if let Err(e) = link.send(Code::Input, protocol::input_value(button)).await {
                debug!("Link: input report failed: {:?}", e);
            }
        }

        let before = controller.mode();
        if let Some(effect) = controller.handle(event) {
            apply(&mut controller, effect, link).await;
        }
        if controller.mode() != before {
            info!("Hunt: {:?} -> {:?}", before, controller.mode());
        }
        cadence.retime(controller.tick_interval_ms(), now_ms());
    }
}

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Carry out an effect, feeding any outcome back into the controller
/// until it settles.
async fn apply(controller: &mut Controller, effect: Effect, link: HostLink) {
    let mut next = Some(effect);
    while let Some(effect) = next.take() {
        if let Some(job) = effect.display_job() {
            display::play(job);
            continue;
        }
        if let Some(outcome) = perform(controller.variant(), effect, link).await {
            next = controller.handle(outcome);
        }
    }
}

/// Run a non-display effect and report its outcome as an event.
async fn perform(variant: Variant, effect: Effect, link: HostLink) -> Option<Event> {
    match effect {
        Effect::Sample(probe) => {
            let reading = link
                .request(Code::from(probe), b"0")
                .await
                .and_then(|payload| protocol::parse_reading(&payload));
            match reading {
                Ok(r) if variant == Variant::EctoScope => {
                    if let Err(e) = frames::classify(r) {
                        warn!("Hunt: {:?}, clamping", e);
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("Hunt: {:?} sampling {:?}", e, probe),
            }
            Some(Event::Reading(reading.map_err(Error::as_probe_failure)))
        }
        Effect::ReadTilt => Some(Event::Tilt(accel::TILT.try_take().unwrap_or_default())),
        Effect::Transmit(message) => {
            let text = morse::encode(&message);
            let reply = host_text(link, Code::Telegraph, text.as_bytes()).await;
            Some(Event::Reply(reply))
        }
        Effect::Decode(sign) => {
            let reply = host_text(link, Code::SpiritSign, sign.as_bytes()).await;
            Some(Event::Reply(reply))
        }
        _ => None,
    }
}

async fn host_text(link: HostLink, code: Code, value: &[u8]) -> Result<Text, Error> {
    let reply = link
        .request(code, value)
        .await
        .and_then(|payload| protocol::parse_text(&payload));
    if let Err(e) = reply {
        warn!("Hunt: {:?} on {:?}", e, code);
    }
    reply.map_err(Error::as_transmit_failure)
}

#[embassy_executor::task]
async fn refresh_task(matrix: LedMatrix<Output<'static>, Output<'static>>) {
    display::refresh_task(matrix).await
}

#[embassy_executor::task]
async fn job_task() {
    display::job_task().await
}

#[embassy_executor::task]
async fn input_task(buttons: Buttons<Input<'static>, Input<'static>>) {
    buttons::button_task(buttons, EVENTS.sender()).await
}

#[embassy_executor::task]
async fn motion_task(accel: Accelerometer<Twim<'static, peripherals::TWISPI0>>, link: HostLink) {
    accel::motion_task(accel, EVENTS.sender(), link).await
}

#[embassy_executor::task]
async fn link_rx_task(rx: Rx, link: HostLink) {
    serial::rx_task(rx, link).await
}
