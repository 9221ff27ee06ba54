//! Firmware error type and fatal-error handling.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

use defmt::{error, Format};

/// Top-level error type of the firmware.
#[derive(Debug, Format)]
pub enum Error {
    // UI / Display
    /// I²C transaction to the display failed.
    Display,

    // Storage
    /// Flash read/write/erase failed.
    Storage,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,

    // Menu
    /// A menu collaborator reported a failure.
    Menu(menunav::Error),
}

// Convenience conversions

impl From<menunav::Error> for Error {
    fn from(e: menunav::Error) -> Self {
        Error::Menu(e)
    }
}

/// Log `e` and park the CPU. Used when bring-up fails.
pub fn halt(e: Error) -> ! {
    error!("Bring-up failed: {}", e);
    loop {
        cortex_m::asm::wfe();
    }
}
