//! Hardware capabilities the classifier loop needs.
//!
//! Backends implement these traits for real pins and converters, or for the
//! scripted [`SimulatedHardware`](crate::sim::SimulatedHardware).

use crate::display::DisplayState;
use crate::oscillation::EdgeHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// TTL/CMOS selector input
    FamilySelect,
    /// The line being classified
    Probe,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::FamilySelect => "family-select",
            Channel::Probe => "probe",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub trait AnalogSampler {
    /// Blocking single conversion, 0..=1023 against the supply rail.
    fn sample(&mut self, channel: Channel) -> Result<u16, HardwareError>;
}

/// The pull line next to the probe input.
pub trait LineDriver {
    fn drive_high(&mut self) -> Result<(), HardwareError>;

    fn drive_low(&mut self) -> Result<(), HardwareError>;

    /// Back to high impedance
    fn release(&mut self) -> Result<(), HardwareError>;

    /// Instantaneous digital level of the probe line
    fn read_level(&mut self) -> Result<bool, HardwareError>;
}

pub trait EdgeCapture {
    /// Install the handler fired on every edge while capture is armed.
    fn attach(&mut self, handler: EdgeHandler);

    /// Discard a notification left over from before arming
    fn clear_pending(&mut self) -> Result<(), HardwareError>;

    fn arm(&mut self, channel: Channel) -> Result<(), HardwareError>;

    fn disarm(&mut self, channel: Channel) -> Result<(), HardwareError>;
}

pub trait Indicator {
    fn show(&mut self, state: DisplayState) -> Result<(), HardwareError>;
}

/// Busy-wait delays. Nothing but the edge handler runs while waiting.
pub trait Delay {
    fn delay_us(&mut self, micros: u32);
}

/// Everything a [`LogicProbe`](crate::probe::LogicProbe) drives, in one backend.
pub trait ProbeHardware: AnalogSampler + LineDriver + EdgeCapture + Indicator + Delay {}

impl<T: AnalogSampler + LineDriver + EdgeCapture + Indicator + Delay> ProbeHardware for T {}
