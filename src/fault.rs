use crate::error::SHTError;
use log::error;
use std::fmt;

/// Stops the system when the sensor can no longer be trusted
pub trait FaultHandler {
    fn hard_fault(&mut self, message: &str) -> !;
}

/// Logs the fault and panics with its message
#[derive(Default, Copy, Clone, Debug)]
pub struct PanicOnFault;

impl FaultHandler for PanicOnFault {
    fn hard_fault(&mut self, message: &str) -> ! {
        error!("{}", message);
        panic!("{}", message)
    }
}

/// The physical quantity an accessor was asked for
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum Quantity {
    Temperature,
    Humidity,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Temperature => write!(f, "TEMPERATURE"),
            Quantity::Humidity => write!(f, "HUMIDITY"),
        }
    }
}

impl Quantity {
    /// The message handed to the fault handler when reading this quantity failed.
    /// Names the quantity requested, not the word whose checksum broke.
    pub fn fault_message(self, error: &SHTError) -> String {
        if error.is_checksum_error() {
            format!("SHT31 {} CRC FAIL", self)
        } else {
            format!("SHT31 {} BUS FAIL", self)
        }
    }
}
