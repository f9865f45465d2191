//! Risk classification types shared by the scorer, storage, and API layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Risk level
// ---------------------------------------------------------------------------

/// Coarse flight-risk bucket derived from a 0–100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[serde(alias = "low", alias = "Low")]
    Low,
    #[serde(alias = "medium", alias = "Medium")]
    Medium,
    #[serde(alias = "high", alias = "High")]
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MEDIUM" => Ok(RiskLevel::Medium),
            "HIGH" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Risk trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskTrend {
    Improving,
    #[default]
    Stable,
    Deteriorating,
}

// ---------------------------------------------------------------------------
// Factor breakdown
// ---------------------------------------------------------------------------

/// Per-factor risk values, each normalised to [0, 1] before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    pub performance: f64,
    pub tenure: f64,
    pub engagement: f64,
    pub compensation: f64,
    pub skills: f64,
}

impl RiskFactors {
    /// Factor names in the same order as [`RiskFactors::as_array`].
    pub const NAMES: [&'static str; 5] =
        ["performance", "tenure", "engagement", "compensation", "skills"];

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.performance,
            self.tenure,
            self.engagement,
            self.compensation,
            self.skills,
        ]
    }
}
