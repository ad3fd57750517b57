//! Telegraph message buffer.

use crate::config::MESSAGE_CAPACITY;
use crate::error::Error;
use crate::ui::Text;
use heapless::Vec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    pub fn as_char(self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }
}

/// A complete message as handed to the transmitter.
pub type Message = Vec<Symbol, MESSAGE_CAPACITY>;

/// Symbols keyed in so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageBuffer {
    symbols: Message,
}

impl MessageBuffer {
    pub const fn new() -> Self {
        Self {
            symbols: Vec::new(),
        }
    }

    pub fn push(&mut self, symbol: Symbol) -> Result<(), Error> {
        self.symbols.push(symbol).map_err(|_| Error::BufferOverflow)
    }

    /// Flush: hand out everything keyed so far and leave the buffer empty.
    pub fn take(&mut self) -> Message {
        core::mem::take(&mut self.symbols)
    }

    /// Put a message that could not be delivered back in front of
    /// anything keyed since. Symbols that no longer fit are dropped from
    /// the tail.
    pub fn restore(&mut self, message: Message) {
        let newer = core::mem::replace(&mut self.symbols, message);
        for s in newer {
            if self.symbols.push(s).is_err() {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The buffer as dots and dashes, for display.
    pub fn render(&self) -> Text {
        encode(&self.symbols)
    }
}

/// Dots and dashes as sent to the host.
pub fn encode(symbols: &[Symbol]) -> Text {
    let mut text = Text::new();
    for s in symbols {
        if text.push(s.as_char()).is_err() {
            break;
        }
    }
    text
}
