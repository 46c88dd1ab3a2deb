/// What the indicator shows for one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayState {
    High,
    Low,
    Floating,
    OscillatingHigh,
    OscillatingLow,
    Oscillating,
    /// Driven, inside the dead band, not oscillating
    Off,
}

impl DisplayState {
    // Indicator line bits of the three charlieplexed outputs
    const LINE_0: u8 = 0b001;
    const LINE_1: u8 = 0b010;
    const LINE_2: u8 = 0b100;

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayState::High => "HI",
            DisplayState::Low => "LO",
            DisplayState::Floating => "FL",
            DisplayState::OscillatingHigh => "OS+HI",
            DisplayState::OscillatingLow => "OS+LO",
            DisplayState::Oscillating => "OS",
            DisplayState::Off => "--",
        }
    }

    pub fn is_oscillating(&self) -> bool {
        matches!(
            self,
            DisplayState::OscillatingHigh | DisplayState::OscillatingLow | DisplayState::Oscillating
        )
    }

    pub fn shows_high(&self) -> bool {
        matches!(self, DisplayState::High | DisplayState::OscillatingHigh)
    }

    pub fn shows_low(&self) -> bool {
        matches!(self, DisplayState::Low | DisplayState::OscillatingLow)
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, DisplayState::Floating)
    }

    /// Output line levels realising this state on the multiplexed indicator.
    ///
    /// FL owns line 2 alone. OS drops line 2 and raises line 0 on top of
    /// whatever HI/LO already set.
    pub fn line_pattern(&self) -> u8 {
        if self.is_floating() {
            return Self::LINE_2;
        }

        let mut lines = 0;
        if self.shows_low() {
            lines |= Self::LINE_1;
        }
        if self.shows_high() {
            lines |= Self::LINE_0 | Self::LINE_2;
        }
        if self.is_oscillating() {
            lines &= !Self::LINE_2;
            lines |= Self::LINE_0;
        }
        lines
    }
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-priority resolution of one iteration's signals.
///
/// `floating` must already have the oscillation override applied. Floating
/// wins outright; otherwise the level is shown, with OS layered on top while
/// the oscillation timer runs.
pub fn resolve(floating: bool, is_high: bool, is_low: bool, oscillating: bool) -> DisplayState {
    if floating {
        return DisplayState::Floating;
    }

    match (is_high, is_low, oscillating) {
        (true, _, false) => DisplayState::High,
        (true, _, true) => DisplayState::OscillatingHigh,
        (false, true, false) => DisplayState::Low,
        (false, true, true) => DisplayState::OscillatingLow,
        (false, false, true) => DisplayState::Oscillating,
        (false, false, false) => DisplayState::Off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floating_always_alone() {
        for is_high in [false, true] {
            for is_low in [false, true] {
                for oscillating in [false, true] {
                    let state = resolve(true, is_high, is_low, oscillating);
                    assert_eq!(state, DisplayState::Floating);
                    assert!(!state.shows_high() && !state.shows_low() && !state.is_oscillating());
                }
            }
        }
    }

    #[test]
    fn test_resolve_levels() {
        assert_eq!(resolve(false, true, false, false), DisplayState::High);
        assert_eq!(resolve(false, false, true, false), DisplayState::Low);
        assert_eq!(resolve(false, false, false, false), DisplayState::Off);
    }

    #[test]
    fn test_oscillation_keeps_level() {
        assert_eq!(resolve(false, true, false, true), DisplayState::OscillatingHigh);
        assert_eq!(resolve(false, false, true, true), DisplayState::OscillatingLow);
        assert_eq!(resolve(false, false, false, true), DisplayState::Oscillating);
    }

    #[test]
    fn test_line_patterns() {
        assert_eq!(DisplayState::Floating.line_pattern(), 0b100);
        assert_eq!(DisplayState::Low.line_pattern(), 0b010);
        assert_eq!(DisplayState::High.line_pattern(), 0b101);
        assert_eq!(DisplayState::OscillatingLow.line_pattern(), 0b011);
        assert_eq!(DisplayState::OscillatingHigh.line_pattern(), 0b001);
        assert_eq!(DisplayState::Oscillating.line_pattern(), 0b001);
        assert_eq!(DisplayState::Off.line_pattern(), 0);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(DisplayState::High.as_str(), "HI");
        assert_eq!(DisplayState::OscillatingLow.to_string(), "OS+LO");
    }
}
