//! Workforce-level aggregates over scored employees.
//!
//! Counts use the stored `riskLevel`, not a fresh assessment, so the numbers
//! match what the employee endpoints return.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use talentrisk_common::{Employee, RiskLevel};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RiskDistribution {
    fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::High => self.high += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    pub department: String,
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub avg_risk_score: f64,
    /// Fraction of the department at HIGH risk, in [0, 1].
    pub high_risk_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_employees: usize,
    pub avg_risk_score: f64,
    pub high_risk_employees: usize,
    pub risk_distribution: RiskDistribution,
    pub departments: Vec<DepartmentSummary>,
    pub generated_at: DateTime<Utc>,
}

pub fn summarize(employees: &[Employee]) -> DashboardMetrics {
    let mut distribution = RiskDistribution::default();
    for e in employees {
        distribution.record(e.risk_level);
    }

    DashboardMetrics {
        total_employees: employees.len(),
        avg_risk_score: average(employees.iter().map(|e| e.risk_score)),
        high_risk_employees: distribution.high,
        risk_distribution: distribution,
        departments: department_breakdown(employees),
        generated_at: Utc::now(),
    }
}

pub fn department_breakdown(employees: &[Employee]) -> Vec<DepartmentSummary> {
    let mut groups: BTreeMap<&str, (RiskDistribution, f64)> = BTreeMap::new();
    for e in employees {
        let entry = groups.entry(e.department.as_str()).or_default();
        entry.0.record(e.risk_level);
        entry.1 += e.risk_score;
    }

    let mut summaries: Vec<DepartmentSummary> = groups
        .into_iter()
        .map(|(department, (dist, score_sum))| {
            let total = dist.total();
            DepartmentSummary {
                department: department.to_string(),
                total,
                high: dist.high,
                medium: dist.medium,
                low: dist.low,
                avg_risk_score: round2(score_sum / total as f64),
                high_risk_share: round2(dist.high as f64 / total as f64),
            }
        })
        .collect();

    // BTreeMap already yields names in order, so a stable sort keeps ties by name.
    summaries.sort_by(|a, b| {
        b.avg_risk_score
            .partial_cmp(&a.avg_risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { round2(sum / n as f64) }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
