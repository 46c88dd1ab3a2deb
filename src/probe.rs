use std::convert::Infallible;
use std::sync::Arc;

use crate::detector::{
    ClassificationState, EdgeOscillationDetector, FloatingDetector, Level, LevelClassifier,
};
use crate::display::{resolve, DisplayState};
use crate::hardware::{Channel, HardwareError, ProbeHardware};
use crate::oscillation::{EdgeHandler, OscillationTimer, TransitionTracker};
use crate::threshold::{LogicFamily, ThresholdSelector, ADC_MAX};

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    #[error("Sample {value} on {channel} channel exceeds the 10-bit ADC range")]
    SampleOutOfRange { channel: Channel, value: u16 },
}

/// Everything observed and decided during one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub iteration: u64,
    pub family: LogicFamily,
    pub probe_code: u16,
    pub level: Level,
    /// Result of the pull-up/pull-down test before the oscillation override
    pub floating_raw: bool,
    /// Floating status after the oscillation override
    pub floating: bool,
    /// Timer value once this iteration's display has been rendered
    pub oscillation_remaining: u8,
    pub display: DisplayState,
}

/// The sampling and classification loop for one probe channel.
pub struct LogicProbe<H: ProbeHardware> {
    hw: H,
    timer: Arc<OscillationTimer>,
    tracker: TransitionTracker,
    family: Option<LogicFamily>,
    iteration: u64,
}

impl<H: ProbeHardware> LogicProbe<H> {
    /// Take ownership of the backend and install the edge handler on it
    pub fn new(mut hw: H) -> Self {
        let timer = Arc::new(OscillationTimer::new());
        hw.attach(EdgeHandler::new(Arc::clone(&timer)));

        Self {
            hw,
            timer,
            tracker: TransitionTracker::new(),
            family: None,
            iteration: 0,
        }
    }

    fn sample(&mut self, channel: Channel) -> Result<u16, ProbeError> {
        let value = self.hw.sample(channel)?;
        if value > ADC_MAX {
            return Err(ProbeError::SampleOutOfRange { channel, value });
        }
        Ok(value)
    }

    /// Run one full iteration: thresholds, edge window, floating test, level,
    /// transition check, display.
    pub fn step(&mut self) -> Result<CycleReport, ProbeError> {
        let span = tracing::trace_span!("cycle", iteration = self.iteration);
        let _enter = span.enter();

        let select_code = self.sample(Channel::FamilySelect)?;
        let (family, profile) = ThresholdSelector::select(select_code);
        if self.family != Some(family) {
            log::debug!(
                "Logic family {} selected (low {:.2}V, high {:.2}V)",
                family,
                profile.low_volts(),
                profile.high_volts()
            );
            self.family = Some(family);
        }

        EdgeOscillationDetector::run_window(&mut self.hw)?;
        let floating_raw = FloatingDetector::probe(&mut self.hw)?;

        let probe_code = self.sample(Channel::Probe)?;
        let level = LevelClassifier::classify(probe_code, &profile);

        if self.tracker.observe(level, floating_raw, &self.timer) {
            log::debug!("Level flip to {} re-armed oscillation", level.as_str());
        }

        // An oscillating line can pass the pull test by accident, OS wins over FL
        let oscillating = self.timer.is_active();
        let state = ClassificationState {
            level,
            is_floating: floating_raw && !oscillating,
        };

        let display = resolve(state.is_floating, state.is_high(), state.is_low(), oscillating);
        self.hw.show(display)?;
        if !state.is_floating && oscillating {
            self.timer.tick();
        }

        let report = CycleReport {
            iteration: self.iteration,
            family,
            probe_code,
            level,
            floating_raw,
            floating: state.is_floating,
            oscillation_remaining: self.timer.remaining(),
            display,
        };
        log::trace!("{:?}", report);

        self.iteration += 1;
        Ok(report)
    }

    /// Run `cycles` iterations and collect their reports
    pub fn run_for(&mut self, cycles: usize) -> Result<Vec<CycleReport>, ProbeError> {
        (0..cycles).map(|_| self.step()).collect()
    }

    /// Loop until the backend fails
    pub fn run(&mut self) -> Result<Infallible, ProbeError> {
        loop {
            self.step()?;
        }
    }

    /// Shared handle to the oscillation countdown
    pub fn oscillation_timer(&self) -> Arc<OscillationTimer> {
        Arc::clone(&self.timer)
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn into_hardware(self) -> H {
        self.hw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillation::OSC_DUR;
    use crate::sim::{PullState, SimFrame, SimulatedHardware};

    fn probe_with(frames: Vec<SimFrame>) -> LogicProbe<SimulatedHardware> {
        LogicProbe::new(SimulatedHardware::new(frames))
    }

    #[test]
    fn test_out_of_range_sample_is_rejected() {
        let mut probe = probe_with(vec![SimFrame::driven(2000, 600, true)]);
        match probe.step() {
            Err(ProbeError::SampleOutOfRange { channel, value }) => {
                assert_eq!(channel, Channel::FamilySelect);
                assert_eq!(value, 2000);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_oscillation_overrides_floating_for_display() {
        let mut probe = probe_with(vec![SimFrame::floating(900, 300).toggling()]);
        let report = probe.step().unwrap();
        assert!(report.floating_raw);
        assert!(!report.floating);
        assert_eq!(report.display, DisplayState::Oscillating);
        assert_eq!(report.oscillation_remaining, OSC_DUR - 1);
    }

    #[test]
    fn test_iteration_counter_and_family() {
        let mut probe = probe_with(vec![
            SimFrame::driven(900, 600, true),
            SimFrame::driven(100, 600, true),
        ]);
        let reports = probe.run_for(3).unwrap();
        assert_eq!(probe.iteration(), 3);
        assert_eq!(reports[0].family, LogicFamily::Ttl);
        assert_eq!(reports[1].family, LogicFamily::Cmos);
        assert_eq!(reports[2].family, LogicFamily::Cmos);
        assert_eq!(reports[1].level, Level::Indeterminate);
    }

    #[test]
    fn test_display_reaches_indicator() {
        let mut probe = probe_with(vec![SimFrame::driven(900, 50, false)]);
        probe.step().unwrap();
        let hw = probe.into_hardware();
        assert_eq!(hw.shown(), &[DisplayState::Low]);
        assert_eq!(hw.pull(), PullState::Released);
        assert!(!hw.is_armed());
    }
}
