//! Retention actions attached to an assessment.
//!
//! Level-driven actions come first, then one action per leading driver whose
//! factor is at least [`FACTOR_FLOOR`].

use talentrisk_common::{RiskFactors, RiskLevel};

use crate::scorer::RiskDriver;

/// A driver only earns its own action when its factor is this high.
pub const FACTOR_FLOOR: f64 = 0.5;

/// How many leading drivers are turned into actions.
pub const MAX_DRIVER_ACTIONS: usize = 2;

pub const NO_ACTION: &str = "Continue current engagement strategy";

fn level_actions(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::High => &[
            "Immediate retention strategy required",
            "Schedule urgent manager check-in",
        ],
        RiskLevel::Medium => &["Schedule career development discussion"],
        RiskLevel::Low => &[],
    }
}

fn factor_action(factor: &str) -> Option<&'static str> {
    match factor {
        "performance" => Some("Create performance improvement plan"),
        "tenure" => Some("Assign mentor for guidance"),
        "engagement" => Some("Conduct feedback session to address concerns"),
        "compensation" => Some("Review compensation package"),
        "skills" => Some("Provide targeted training opportunities"),
        _ => None,
    }
}

fn factor_value(factors: &RiskFactors, name: &str) -> f64 {
    RiskFactors::NAMES
        .iter()
        .zip(factors.as_array())
        .find(|(n, _)| **n == name)
        .map(|(_, v)| v)
        .unwrap_or(0.0)
}

/// `drivers` must already be sorted by contribution, largest first.
pub fn recommendations(level: RiskLevel, factors: &RiskFactors, drivers: &[RiskDriver]) -> Vec<String> {
    let mut actions: Vec<String> = level_actions(level).iter().map(|s| s.to_string()).collect();

    actions.extend(
        drivers
            .iter()
            .take(MAX_DRIVER_ACTIONS)
            .filter(|d| factor_value(factors, &d.factor) >= FACTOR_FLOOR)
            .filter_map(|d| factor_action(&d.factor))
            .map(str::to_string),
    );

    if actions.is_empty() {
        actions.push(NO_ACTION.to_string());
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn driver(factor: &str, contribution: f64) -> RiskDriver {
        RiskDriver { factor: factor.into(), contribution }
    }

    #[test]
    fn test_every_factor_has_an_action() {
        for name in RiskFactors::NAMES {
            assert!(factor_action(name).is_some(), "no action for {}", name);
        }
    }

    #[test]
    fn test_low_with_weak_drivers_keeps_course() {
        let factors = RiskFactors { tenure: 0.05, compensation: 0.05, ..Default::default() };
        let drivers = [driver("tenure", 1.0), driver("compensation", 0.75)];
        assert_eq!(
            recommendations(RiskLevel::Low, &factors, &drivers),
            vec![NO_ACTION.to_string()]
        );
    }

    #[test]
    fn test_only_leading_drivers_count() {
        let factors = RiskFactors {
            performance: 0.75,
            tenure: 0.8,
            engagement: 0.6,
            compensation: 0.9,
            skills: 1.0,
        };
        let drivers = [
            driver("performance", 22.5),
            driver("tenure", 16.0),
            driver("engagement", 15.0),
            driver("compensation", 13.5),
            driver("skills", 10.0),
        ];
        assert_eq!(
            recommendations(RiskLevel::High, &factors, &drivers),
            vec![
                "Immediate retention strategy required".to_string(),
                "Schedule urgent manager check-in".to_string(),
                "Create performance improvement plan".to_string(),
                "Assign mentor for guidance".to_string(),
            ]
        );
    }
}
