//! # LogicProbe RS
//!
//! Signal classification core for a single-channel handheld logic probe.
//!
//! The probe samples one analog line over and over and reports whether it is
//! logic HIGH, logic LOW, FLOATING (undriven) or OSCILLATING, driving an
//! indicator with the result. A second analog input selects between the TTL
//! and CMOS threshold profiles.
//!
//! ## Features
//!
//! - **Threshold selection**: TTL (0.8V / 2.0V) and CMOS (1.5V / 3.5V) at a 5V supply
//! - **Edge capture**: a 1ms window catches anything toggling faster than ~500 Hz
//! - **Floating detection**: the line is pulled up then down and checked for resistance
//! - **Slow oscillation**: HIGH/LOW flips between consecutive cycles re-arm the OS indication
//! - **Hardware agnostic**: pins, ADC, edge capture and indicator are traits
//! - **Simulation and traces**: a scripted backend plus `polars` based cycle recording
//!
//! ## Examples
//!
//! ### Running the loop against the simulated backend
//!
//! ```rust
//! use logicprobe_rs::{DisplayState, LogicProbe, SimFrame, SimulatedHardware};
//!
//! // TTL selected, line actively held at ~2.9V
//! let hw = SimulatedHardware::new(vec![SimFrame::driven(900, 600, true)]);
//! let mut probe = LogicProbe::new(hw);
//!
//! let report = probe.step()?;
//! assert_eq!(report.display, DisplayState::High);
//! # Ok::<(), logicprobe_rs::ProbeError>(())
//! ```
//!
//! ### Resolving a display state directly
//!
//! ```rust
//! use logicprobe_rs::{resolve, DisplayState};
//!
//! // Floating always shows alone
//! assert_eq!(resolve(true, true, false, true), DisplayState::Floating);
//! // Oscillation is layered on top of the level
//! assert_eq!(resolve(false, false, true, true), DisplayState::OscillatingLow);
//! ```
//!
//! ### Recording a trace
//!
//! ```rust,no_run
//! use logicprobe_rs::{LogicProbe, ProbeTrace, SimFrame, SimulatedHardware};
//!
//! let hw = SimulatedHardware::new(vec![
//!     SimFrame::driven(900, 600, true),
//!     SimFrame::driven(900, 50, false),
//! ]);
//! let mut probe = LogicProbe::new(hw);
//!
//! let mut trace = ProbeTrace::new();
//! trace.extend(probe.run_for(100)?);
//! trace.write_csv("probe_trace.csv")?;
//! println!("{}", trace.display_summary()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod detector;
pub mod display;
pub mod hardware;
pub mod oscillation;
pub mod probe;
pub mod sim;
pub mod threshold;
pub mod trace;

// Re-export the main types for convenience
pub use threshold::{LogicFamily, ThresholdProfile, ThresholdSelector};

pub use detector::{
    ClassificationState, EdgeOscillationDetector, FloatingDetector, Level, LevelClassifier,
};

pub use oscillation::{EdgeHandler, HistoryState, OscillationTimer, TransitionTracker, OSC_DUR};

pub use display::{resolve, DisplayState};

pub use hardware::{
    AnalogSampler, Channel, Delay, EdgeCapture, HardwareError, Indicator, LineDriver,
    ProbeHardware,
};

pub use probe::{CycleReport, LogicProbe, ProbeError};

pub use sim::{LineBehavior, SimFrame, SimulatedHardware};

pub use trace::{ProbeTrace, TraceError};
