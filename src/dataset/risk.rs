//! Health risk banding by daily screen time.

use serde::Serialize;

use crate::config::{RISK_HIGH_BELOW_HOURS, RISK_LOW_BELOW_HOURS, RISK_MODERATE_BELOW_HOURS};

/// Risk band a child falls into based on average daily screen time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RiskCategory {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Very High Risk")]
    VeryHigh,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Low,
        RiskCategory::Moderate,
        RiskCategory::High,
        RiskCategory::VeryHigh,
    ];

    /// Band for the given hours of screen time per day.
    ///
    /// NaN falls through every comparison and lands in `VeryHigh`.
    pub fn from_screen_time(hours: f64) -> Self {
        if hours < RISK_LOW_BELOW_HOURS {
            RiskCategory::Low
        } else if hours < RISK_MODERATE_BELOW_HOURS {
            RiskCategory::Moderate
        } else if hours < RISK_HIGH_BELOW_HOURS {
            RiskCategory::High
        } else {
            RiskCategory::VeryHigh
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk",
            RiskCategory::Moderate => "Moderate Risk",
            RiskCategory::High => "High Risk",
            RiskCategory::VeryHigh => "Very High Risk",
        }
    }

    /// Chart colour for this band
    pub fn color(self) -> &'static str {
        match self {
            RiskCategory::Low => "green",
            RiskCategory::Moderate => "yellow",
            RiskCategory::High => "orange",
            RiskCategory::VeryHigh => "red",
        }
    }

    /// High and very high bands count towards the "high risk" metric.
    pub fn is_elevated(self) -> bool {
        matches!(self, RiskCategory::High | RiskCategory::VeryHigh)
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
