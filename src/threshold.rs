/// Full-scale code of the 10-bit ADC.
pub const ADC_MAX: u16 = 1023;

/// Reference voltage of the ADC (the supply rail).
pub const ADC_REFERENCE_VOLTS: f64 = 5.0;

/// Family-select samples below this code pick the CMOS profile.
/// The select switch divides the supply, so CMOS sits below ~75% of full range.
pub const FAMILY_SELECT_MIDPOINT: u16 = 768;

/// Convert a raw ADC code to volts against the 5V reference
pub fn code_to_volts(code: u16) -> f64 {
    f64::from(code) * ADC_REFERENCE_VOLTS / f64::from(ADC_MAX + 1)
}

/// Convert a voltage to the ADC code it would produce, clamped to the ADC range
pub fn volts_to_code(volts: f64) -> u16 {
    let code = (volts * f64::from(ADC_MAX + 1) / ADC_REFERENCE_VOLTS + 0.5).floor();
    code.clamp(0.0, f64::from(ADC_MAX)) as u16
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicFamily {
    Ttl,
    Cmos,
}

impl LogicFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicFamily::Ttl => "TTL",
            LogicFamily::Cmos => "CMOS",
        }
    }

    pub fn profile(&self) -> ThresholdProfile {
        match self {
            LogicFamily::Ttl => ThresholdProfile::TTL,
            LogicFamily::Cmos => ThresholdProfile::CMOS,
        }
    }

    /// Pick the family from a raw family-select sample
    pub fn from_select_sample(sample: u16) -> Self {
        if sample < FAMILY_SELECT_MIDPOINT {
            LogicFamily::Cmos
        } else {
            LogicFamily::Ttl
        }
    }
}

impl std::fmt::Display for LogicFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pair of ADC codes bounding the logic-low and logic-high bands.
///
/// Samples strictly between `low` and `high` fall into the dead band and are
/// classified as neither level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdProfile {
    pub low: u16,
    pub high: u16,
}

impl ThresholdProfile {
    /// 0.8V / 2.0V at 5V supply
    pub const TTL: Self = Self {
        low: 164,
        high: 409,
    };

    /// 1.5V / 3.5V at 5V supply
    pub const CMOS: Self = Self {
        low: 307,
        high: 716,
    };

    pub fn is_high(&self, sample: u16) -> bool {
        sample > self.high
    }

    pub fn is_low(&self, sample: u16) -> bool {
        sample < self.low
    }

    pub fn low_volts(&self) -> f64 {
        code_to_volts(self.low)
    }

    pub fn high_volts(&self) -> f64 {
        code_to_volts(self.high)
    }
}

const _: () = assert!(ThresholdProfile::TTL.low < ThresholdProfile::TTL.high);
const _: () = assert!(ThresholdProfile::CMOS.low < ThresholdProfile::CMOS.high);

/// Reads the family-select input and yields the matching threshold profile.
pub struct ThresholdSelector;

impl ThresholdSelector {
    pub fn select(select_sample: u16) -> (LogicFamily, ThresholdProfile) {
        let family = LogicFamily::from_select_sample(select_sample);
        (family, family.profile())
    }
}
