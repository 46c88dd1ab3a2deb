use crate::hardware::{Channel, Delay, EdgeCapture, HardwareError, LineDriver};
use crate::threshold::ThresholdProfile;

/// Settle time after every change of the pull line, in microseconds.
pub const SETTLE_US: u32 = 10;

/// Edge observation window. Anything toggling faster than ~500 Hz produces
/// at least one edge inside it.
pub const EDGE_WINDOW_US: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    High,
    Low,
    /// Inside the dead band between the thresholds
    Indeterminate,
}

impl Level {
    pub fn is_high(&self) -> bool {
        matches!(self, Level::High)
    }

    pub fn is_low(&self) -> bool {
        matches!(self, Level::Low)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Low => "low",
            Level::Indeterminate => "indeterminate",
        }
    }
}

/// Per-cycle classification, rebuilt every iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationState {
    pub level: Level,
    pub is_floating: bool,
}

impl ClassificationState {
    pub fn is_high(&self) -> bool {
        self.level.is_high()
    }

    pub fn is_low(&self) -> bool {
        self.level.is_low()
    }
}

/// Arms edge capture on the probe line for one fixed window.
///
/// Edges inside the window reach the oscillation timer through the attached
/// handler; this detector never touches the timer itself. The line is left
/// pulled up and settled for the floating test.
pub struct EdgeOscillationDetector;

impl EdgeOscillationDetector {
    pub fn run_window<H>(hw: &mut H) -> Result<(), HardwareError>
    where
        H: LineDriver + EdgeCapture + Delay,
    {
        hw.drive_high()?;
        hw.delay_us(SETTLE_US);
        hw.clear_pending()?;
        hw.arm(Channel::Probe)?;
        hw.delay_us(EDGE_WINDOW_US);
        hw.disarm(Channel::Probe)?;
        Ok(())
    }
}

/// Decides whether the probe line is undriven by forcing it both ways.
pub struct FloatingDetector;

impl FloatingDetector {
    /// Floating iff the line followed the pull-up and then the pull-down.
    pub fn is_floating(level_pulled_up: bool, level_pulled_down: bool) -> bool {
        level_pulled_up && !level_pulled_down
    }

    /// Expects the line already pulled up and settled. Leaves it released
    /// and settled for the analog measurement.
    pub fn probe<H>(hw: &mut H) -> Result<bool, HardwareError>
    where
        H: LineDriver + Delay,
    {
        let pulled_up = hw.read_level()?;
        hw.drive_low()?;
        hw.delay_us(SETTLE_US);
        let pulled_down = hw.read_level()?;
        hw.release()?;
        hw.delay_us(SETTLE_US);

        Ok(Self::is_floating(pulled_up, pulled_down))
    }
}

pub struct LevelClassifier;

impl LevelClassifier {
    pub fn classify(sample: u16, profile: &ThresholdProfile) -> Level {
        if profile.is_high(sample) {
            Level::High
        } else if profile.is_low(sample) {
            Level::Low
        } else {
            Level::Indeterminate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Op {
        High,
        Low,
        Release,
        Read,
        Wait(u32),
        Clear,
        Arm,
        Disarm,
    }

    struct Recorder {
        ops: Vec<Op>,
        levels: Vec<bool>,
    }

    impl LineDriver for Recorder {
        fn drive_high(&mut self) -> Result<(), HardwareError> {
            self.ops.push(Op::High);
            Ok(())
        }
        fn drive_low(&mut self) -> Result<(), HardwareError> {
            self.ops.push(Op::Low);
            Ok(())
        }
        fn release(&mut self) -> Result<(), HardwareError> {
            self.ops.push(Op::Release);
            Ok(())
        }
        fn read_level(&mut self) -> Result<bool, HardwareError> {
            self.ops.push(Op::Read);
            Ok(self.levels.remove(0))
        }
    }

    impl EdgeCapture for Recorder {
        fn attach(&mut self, _handler: crate::oscillation::EdgeHandler) {}
        fn clear_pending(&mut self) -> Result<(), HardwareError> {
            self.ops.push(Op::Clear);
            Ok(())
        }
        fn arm(&mut self, channel: Channel) -> Result<(), HardwareError> {
            assert_eq!(channel, Channel::Probe);
            self.ops.push(Op::Arm);
            Ok(())
        }
        fn disarm(&mut self, _channel: Channel) -> Result<(), HardwareError> {
            self.ops.push(Op::Disarm);
            Ok(())
        }
    }

    impl Delay for Recorder {
        fn delay_us(&mut self, micros: u32) {
            self.ops.push(Op::Wait(micros));
        }
    }

    #[test]
    fn test_edge_window_sequence() {
        let mut hw = Recorder {
            ops: Vec::new(),
            levels: Vec::new(),
        };
        EdgeOscillationDetector::run_window(&mut hw).unwrap();
        assert_eq!(
            hw.ops,
            vec![
                Op::High,
                Op::Wait(SETTLE_US),
                Op::Clear,
                Op::Arm,
                Op::Wait(EDGE_WINDOW_US),
                Op::Disarm
            ]
        );
    }

    #[test]
    fn test_floating_probe_sequence() {
        let mut hw = Recorder {
            ops: Vec::new(),
            levels: vec![true, false],
        };
        assert!(FloatingDetector::probe(&mut hw).unwrap());
        assert_eq!(
            hw.ops,
            vec![
                Op::Read,
                Op::Low,
                Op::Wait(SETTLE_US),
                Op::Read,
                Op::Release,
                Op::Wait(SETTLE_US)
            ]
        );
    }

    #[test]
    fn test_floating_truth_table() {
        assert!(FloatingDetector::is_floating(true, false));
        assert!(!FloatingDetector::is_floating(true, true));
        assert!(!FloatingDetector::is_floating(false, false));
        assert!(!FloatingDetector::is_floating(false, true));
    }

    #[test]
    fn test_classify() {
        let ttl = ThresholdProfile::TTL;
        assert_eq!(LevelClassifier::classify(600, &ttl), Level::High);
        assert_eq!(LevelClassifier::classify(50, &ttl), Level::Low);
        assert_eq!(LevelClassifier::classify(300, &ttl), Level::Indeterminate);

        let cmos = ThresholdProfile::CMOS;
        assert_eq!(LevelClassifier::classify(600, &cmos), Level::Indeterminate);
        assert_eq!(LevelClassifier::classify(300, &cmos), Level::Low);
    }
}
