//! Host link - UART to the micro:bit interface chip (USB serial).

pub mod serial;
