//! Composite flight-risk score computation.
//!
//! S(e) = 100 × Σ(w_i × f_i),  clamped to [0, 100]
//! level(S) = HIGH if S ≥ high, MEDIUM if S ≥ medium, else LOW

use serde::{Deserialize, Serialize};
use talentrisk_common::employee::{
    DEFAULT_COMP_RATIO, DEFAULT_ENGAGEMENT_SCORE, DEFAULT_PERFORMANCE_RATING,
};
use talentrisk_common::{Employee, NewEmployee, RiskFactors, RiskLevel, RiskTrend, TalentRiskError};
use talentrisk_config::ScoringConfig;

use crate::normalise::{
    compensation_risk, engagement_risk, performance_risk, skills_risk, tenure_risk, BucketTable,
};
use crate::recommend::recommendations;
use crate::weights::{WeightProfile, WeightVector};

/// Raw attributes the model reads from an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInputs {
    #[serde(default = "default_rating")]
    pub performance_rating: f64,
    #[serde(default, alias = "tenure")]
    pub tenure_months: u32,
    #[serde(default = "default_engagement")]
    pub engagement_score: f64,
    #[serde(default = "default_comp_ratio", alias = "compensationRatio")]
    pub comp_ratio: f64,
    #[serde(default)]
    pub skill_gaps: usize,
    #[serde(default)]
    pub performance_trend: Option<f64>,
}

fn default_rating()     -> f64 { DEFAULT_PERFORMANCE_RATING }
fn default_engagement() -> f64 { DEFAULT_ENGAGEMENT_SCORE }
fn default_comp_ratio() -> f64 { DEFAULT_COMP_RATIO }

impl Default for RiskInputs {
    fn default() -> Self {
        Self {
            performance_rating: DEFAULT_PERFORMANCE_RATING,
            tenure_months: 0,
            engagement_score: DEFAULT_ENGAGEMENT_SCORE,
            comp_ratio: DEFAULT_COMP_RATIO,
            skill_gaps: 0,
            performance_trend: None,
        }
    }
}

impl From<&Employee> for RiskInputs {
    fn from(e: &Employee) -> Self {
        Self {
            performance_rating: e.performance_rating,
            tenure_months: e.tenure_months,
            engagement_score: e.engagement_score,
            comp_ratio: e.comp_ratio,
            skill_gaps: e.skill_gaps.len(),
            performance_trend: e.performance_trend,
        }
    }
}

impl From<&NewEmployee> for RiskInputs {
    fn from(e: &NewEmployee) -> Self {
        Self {
            performance_rating: e.performance_rating.unwrap_or(DEFAULT_PERFORMANCE_RATING),
            tenure_months: e.tenure_months,
            engagement_score: e.engagement_score.unwrap_or(DEFAULT_ENGAGEMENT_SCORE),
            comp_ratio: e.comp_ratio.unwrap_or(DEFAULT_COMP_RATIO),
            skill_gaps: e.skill_gaps.len(),
            performance_trend: e.performance_trend,
        }
    }
}

/// Score cut-offs for the risk levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self { high: 70.0, medium: 40.0 }
    }
}

impl RiskThresholds {
    pub fn level(&self, score: f64) -> RiskLevel {
        if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// A factor's share of the final score, in score points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDriver {
    pub factor: String,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
    pub factors: RiskFactors,
    pub trend: RiskTrend,
    /// Largest contributors first; zero contributions omitted.
    pub drivers: Vec<RiskDriver>,
    pub weights: WeightVector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<WeightProfile>,
    /// Retention actions, level-driven ones first.
    pub recommendations: Vec<String>,
}

/// Weights, thresholds and bucket tables in one place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskModel {
    weights: WeightVector,
    /// `None` when weights were given explicitly.
    profile: Option<WeightProfile>,
    thresholds: RiskThresholds,
    tenure_buckets: BucketTable,
    compensation_buckets: BucketTable,
    skill_gap_saturation: f64,
    /// |performanceTrend| at or below this is "stable".
    trend_band: f64,
}

impl Default for RiskModel {
    fn default() -> Self {
        Self {
            weights: WeightVector::default(),
            profile: Some(WeightProfile::Balanced),
            thresholds: RiskThresholds::default(),
            tenure_buckets: BucketTable::tenure_default(),
            compensation_buckets: BucketTable::compensation_default(),
            skill_gap_saturation: 3.0,
            trend_band: 0.1,
        }
    }
}

impl RiskModel {
    pub fn from_config(cfg: &ScoringConfig) -> Result<Self, TalentRiskError> {
        let (weights, profile) = match cfg.weights {
            Some(w) => (WeightVector::from(w), None),
            None => {
                let profile: WeightProfile = cfg.profile.parse()?;
                (profile.weights(), Some(profile))
            }
        };

        let model = Self {
            thresholds: RiskThresholds {
                high: cfg.high_threshold,
                medium: cfg.medium_threshold,
            },
            skill_gap_saturation: cfg.skill_gap_saturation,
            ..Self::default()
        };
        let mut model = model.with_weights(weights);
        model.profile = profile;
        Ok(model)
    }

    /// Copy of this model using explicit weights (renormalised if needed).
    pub fn with_weights(&self, mut weights: WeightVector) -> Self {
        if !weights.validate() {
            tracing::debug!(?weights, "renormalising weight vector");
            weights.normalise();
        }
        Self { weights, profile: None, ..self.clone() }
    }

    /// Copy of this model using a named profile's weights.
    pub fn with_profile(&self, profile: WeightProfile) -> Self {
        Self {
            weights: profile.weights(),
            profile: Some(profile),
            ..self.clone()
        }
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn profile(&self) -> Option<WeightProfile> {
        self.profile
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    pub fn factors(&self, inputs: &RiskInputs) -> RiskFactors {
        RiskFactors {
            performance: performance_risk(inputs.performance_rating),
            tenure: tenure_risk(&self.tenure_buckets, inputs.tenure_months),
            engagement: engagement_risk(inputs.engagement_score),
            compensation: compensation_risk(&self.compensation_buckets, inputs.comp_ratio),
            skills: skills_risk(inputs.skill_gaps, self.skill_gap_saturation),
        }
    }

    /// Weighted sum scaled to 0–100, rounded to two decimals.
    pub fn composite(&self, factors: &RiskFactors) -> f64 {
        let weighted_sum: f64 = factors
            .as_array()
            .iter()
            .zip(self.weights.as_array().iter())
            .map(|(f, w)| f * w)
            .sum();

        round2((weighted_sum * 100.0).clamp(0.0, 100.0))
    }

    pub fn level(&self, score: f64) -> RiskLevel {
        self.thresholds.level(score)
    }

    pub fn trend(&self, inputs: &RiskInputs) -> RiskTrend {
        match inputs.performance_trend {
            Some(delta) if delta > self.trend_band => RiskTrend::Improving,
            Some(delta) if delta < -self.trend_band => RiskTrend::Deteriorating,
            _ => RiskTrend::Stable,
        }
    }

    pub fn assess(&self, inputs: &RiskInputs) -> RiskAssessment {
        let factors = self.factors(inputs);
        let score = self.composite(&factors);
        let level = self.level(score);
        let drivers = self.drivers(&factors);

        RiskAssessment {
            score,
            level,
            factors,
            trend: self.trend(inputs),
            recommendations: recommendations(level, &factors, &drivers),
            drivers,
            weights: self.weights,
            profile: self.profile,
        }
    }

    /// Assess `employee` and store the result on it.
    pub fn score_employee(&self, employee: &mut Employee) -> RiskAssessment {
        let assessment = self.assess(&RiskInputs::from(&*employee));
        employee.apply_risk(
            assessment.score,
            assessment.level,
            assessment.factors,
            assessment.trend,
        );
        assessment
    }

    fn drivers(&self, factors: &RiskFactors) -> Vec<RiskDriver> {
        let mut drivers: Vec<RiskDriver> = RiskFactors::NAMES
            .iter()
            .zip(factors.as_array())
            .zip(self.weights.as_array())
            .map(|((name, f), w)| RiskDriver {
                factor: name.to_string(),
                contribution: round2(f * w * 100.0),
            })
            .filter(|d| d.contribution > 0.0)
            .collect();

        drivers.sort_by(|a, b| {
            b.contribution
                .partial_cmp(&a.contribution)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        drivers
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
