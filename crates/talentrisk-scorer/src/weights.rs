//! Weight vector for flight-risk scoring.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use talentrisk_common::TalentRiskError;
use talentrisk_config::WeightsConfig;

/// The 5-component weight vector W.
/// Weights sum to 1.0 once normalised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightVector {
    /// Low performance rating
    pub performance: f64,
    /// Short tenure
    pub tenure: f64,
    /// Low engagement survey score
    pub engagement: f64,
    /// Pay below market (compensation ratio)
    pub compensation: f64,
    /// Open skill gaps
    pub skills: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self {
            performance:  0.30,
            tenure:       0.20,
            engagement:   0.25,
            compensation: 0.15,
            skills:       0.10,
        }
    }
}

impl WeightVector {
    fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Validate that all weights sum to ~1.0
    pub fn validate(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-6
    }

    /// Renormalise weights so they sum to 1.0
    pub fn normalise(&mut self) {
        let sum = self.sum();
        if sum > 0.0 {
            self.performance  /= sum;
            self.tenure       /= sum;
            self.engagement   /= sum;
            self.compensation /= sum;
            self.skills       /= sum;
        }
    }

    /// Convert to array for iteration, in `RiskFactors::NAMES` order.
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

impl From<WeightsConfig> for WeightVector {
    fn from(w: WeightsConfig) -> Self {
        Self {
            performance: w.performance,
            tenure: w.tenure,
            engagement: w.engagement,
            compensation: w.compensation,
            skills: w.skills,
        }
    }
}

/// Named weight sets tuned for different populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightProfile {
    #[default]
    Balanced,
    TechFocused,
    SalesFocused,
    Leadership,
}

impl WeightProfile {
    pub const ALL: [WeightProfile; 4] = [
        WeightProfile::Balanced,
        WeightProfile::TechFocused,
        WeightProfile::SalesFocused,
        WeightProfile::Leadership,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightProfile::Balanced => "balanced",
            WeightProfile::TechFocused => "tech_focused",
            WeightProfile::SalesFocused => "sales_focused",
            WeightProfile::Leadership => "leadership",
        }
    }

    pub fn weights(&self) -> WeightVector {
        match self {
            WeightProfile::Balanced => WeightVector::default(),
            // Skills decay fastest in technical roles.
            WeightProfile::TechFocused => WeightVector {
                performance: 0.25,
                tenure: 0.10,
                engagement: 0.15,
                compensation: 0.10,
                skills: 0.40,
            },
            WeightProfile::SalesFocused => WeightVector {
                performance: 0.45,
                tenure: 0.15,
                engagement: 0.25,
                compensation: 0.15,
                skills: 0.00,
            },
            WeightProfile::Leadership => WeightVector {
                performance: 0.30,
                tenure: 0.25,
                engagement: 0.25,
                compensation: 0.10,
                skills: 0.10,
            },
        }
    }
}

impl fmt::Display for WeightProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightProfile {
    type Err = TalentRiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "balanced" | "default" => Ok(WeightProfile::Balanced),
            "tech_focused" | "tech" => Ok(WeightProfile::TechFocused),
            "sales_focused" | "sales" => Ok(WeightProfile::SalesFocused),
            "leadership" => Ok(WeightProfile::Leadership),
            _ => Err(TalentRiskError::UnknownProfile(s.to_string())),
        }
    }
}
