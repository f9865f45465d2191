//! Factor normalisation: raw employee attributes → risk values in [0, 1].

use serde::{Deserialize, Serialize};
use talentrisk_common::employee::{
    DEFAULT_COMP_RATIO, DEFAULT_ENGAGEMENT_SCORE, DEFAULT_PERFORMANCE_RATING,
};

/// One step of a piecewise-constant lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub upper: f64,
    /// Whether `upper` itself falls into this bucket.
    pub inclusive: bool,
    pub risk: f64,
}

impl Bucket {
    const fn below(upper: f64, risk: f64) -> Self {
        Self { upper, inclusive: false, risk }
    }

    const fn up_to(upper: f64, risk: f64) -> Self {
        Self { upper, inclusive: true, risk }
    }

    fn contains(&self, value: f64) -> bool {
        if self.inclusive { value <= self.upper } else { value < self.upper }
    }
}

/// Ordered buckets; the first bucket containing the value wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketTable {
    pub buckets: Vec<Bucket>,
    pub otherwise: f64,
}

impl BucketTable {
    pub fn lookup(&self, value: f64) -> f64 {
        self.buckets
            .iter()
            .find(|b| b.contains(value))
            .map(|b| b.risk)
            .unwrap_or(self.otherwise)
    }

    /// Tenure in months. New hires leave most often.
    pub fn tenure_default() -> Self {
        Self {
            buckets: vec![
                Bucket::below(6.0, 0.80),
                Bucket::below(12.0, 0.60),
                Bucket::below(24.0, 0.30),
                Bucket::below(60.0, 0.15),
            ],
            otherwise: 0.05,
        }
    }

    /// Market-relative compensation ratio.
    pub fn compensation_default() -> Self {
        Self {
            buckets: vec![
                Bucket::below(0.7, 0.90),
                Bucket::below(0.8, 0.70),
                Bucket::below(0.9, 0.50),
                Bucket::up_to(1.1, 0.20),
                Bucket::up_to(1.3, 0.10),
            ],
            otherwise: 0.05,
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// `(5 - rating) / 4`, rating clamped to [1, 5].
pub fn performance_risk(rating: f64) -> f64 {
    let rating = finite_or(rating, DEFAULT_PERFORMANCE_RATING).clamp(1.0, 5.0);
    (5.0 - rating) / 4.0
}

/// `1 - engagement`, engagement clamped to [0, 1].
pub fn engagement_risk(engagement: f64) -> f64 {
    1.0 - finite_or(engagement, DEFAULT_ENGAGEMENT_SCORE).clamp(0.0, 1.0)
}

pub fn compensation_risk(table: &BucketTable, ratio: f64) -> f64 {
    table.lookup(finite_or(ratio, DEFAULT_COMP_RATIO)).clamp(0.0, 1.0)
}

pub fn tenure_risk(table: &BucketTable, tenure_months: u32) -> f64 {
    table.lookup(f64::from(tenure_months)).clamp(0.0, 1.0)
}

/// `gaps / saturation`, capped at 1.0.
pub fn skills_risk(skill_gaps: usize, saturation: f64) -> f64 {
    if saturation <= 0.0 {
        return if skill_gaps > 0 { 1.0 } else { 0.0 };
    }
    (skill_gaps as f64 / saturation).min(1.0)
}
