//! Built-in roster served when the store cannot be reached.

use chrono::{DateTime, Utc};
use talentrisk_common::{Employee, NewEmployee};
use talentrisk_scorer::RiskModel;

/// 2024-01-15T00:00:00Z, so fallback responses are stable across calls.
const SAMPLE_TIMESTAMP: i64 = 1_705_276_800;

struct Sample {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    department: &'static str,
    role: &'static str,
    location: &'static str,
    tenure_months: u32,
    rating: f64,
    engagement: f64,
    comp_ratio: f64,
    critical_skills: &'static [&'static str],
    skill_gaps: &'static [&'static str],
    trend: f64,
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "sample-001",
        name: "Sarah Johnson",
        email: "sarah.johnson@company.com",
        department: "Engineering",
        role: "Senior Software Engineer",
        location: "San Francisco",
        tenure_months: 8,
        rating: 2.0,
        engagement: 0.3,
        comp_ratio: 0.75,
        critical_skills: &["JavaScript", "React", "Node.js"],
        skill_gaps: &["Kubernetes", "System Design"],
        trend: -0.3,
    },
    Sample {
        id: "sample-002",
        name: "Michael Chen",
        email: "michael.chen@company.com",
        department: "Product",
        role: "Product Manager",
        location: "New York",
        tenure_months: 44,
        rating: 4.2,
        engagement: 0.82,
        comp_ratio: 1.05,
        critical_skills: &["Product Strategy", "User Research"],
        skill_gaps: &[],
        trend: 0.2,
    },
    Sample {
        id: "sample-003",
        name: "Emily Rodriguez",
        email: "emily.rodriguez@company.com",
        department: "Engineering",
        role: "Junior Developer",
        location: "Remote",
        tenure_months: 14,
        rating: 3.0,
        engagement: 0.55,
        comp_ratio: 0.88,
        critical_skills: &["Python", "Django"],
        skill_gaps: &["PostgreSQL"],
        trend: 0.0,
    },
    Sample {
        id: "sample-004",
        name: "David Kim",
        email: "david.kim@company.com",
        department: "Sales",
        role: "Sales Executive",
        location: "Chicago",
        tenure_months: 4,
        rating: 1.8,
        engagement: 0.2,
        comp_ratio: 0.68,
        critical_skills: &["B2B Sales", "Negotiation"],
        skill_gaps: &["CRM", "Forecasting", "Account Management"],
        trend: -0.45,
    },
    Sample {
        id: "sample-005",
        name: "Lisa Thompson",
        email: "lisa.thompson@company.com",
        department: "HR",
        role: "HR Manager",
        location: "Boston",
        tenure_months: 62,
        rating: 4.5,
        engagement: 0.9,
        comp_ratio: 1.15,
        critical_skills: &["Employee Relations", "Compliance"],
        skill_gaps: &[],
        trend: 0.05,
    },
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The sample workforce, scored with `model`, highest risk first like every
/// store listing.
pub fn sample_roster(model: &RiskModel) -> Vec<Employee> {
    let stamp = DateTime::<Utc>::from_timestamp(SAMPLE_TIMESTAMP, 0).unwrap_or_default();

    let mut roster: Vec<Employee> = SAMPLES
        .iter()
        .map(|s| {
            let new = NewEmployee {
                employee_id: None,
                name: s.name.to_string(),
                email: Some(s.email.to_string()),
                department: s.department.to_string(),
                role: s.role.to_string(),
                location: Some(s.location.to_string()),
                tenure_months: s.tenure_months,
                performance_rating: Some(s.rating),
                engagement_score: Some(s.engagement),
                comp_ratio: Some(s.comp_ratio),
                critical_skills: strings(s.critical_skills),
                skill_gaps: strings(s.skill_gaps),
                performance_trend: Some(s.trend),
            };
            let mut employee = Employee::from_new(s.id.to_string(), new, stamp);
            model.score_employee(&mut employee);
            employee
        })
        .collect();
    roster.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentrisk_common::RiskLevel;

    #[test]
    fn test_roster_is_valid_and_mixed() {
        let roster = sample_roster(&RiskModel::default());
        assert_eq!(roster.len(), 5);
        for e in &roster {
            e.validate().unwrap();
        }
        let levels: Vec<RiskLevel> = roster.iter().map(|e| e.risk_level).collect();
        assert!(levels.contains(&RiskLevel::High));
        assert!(levels.contains(&RiskLevel::Medium));
        assert!(levels.contains(&RiskLevel::Low));
    }

    #[test]
    fn test_roster_is_ordered_by_score() {
        let roster = sample_roster(&RiskModel::default());
        for pair in roster.windows(2) {
            assert!(pair[0].risk_score >= pair[1].risk_score);
        }
        assert_eq!(roster[0].name, "David Kim");
    }

    #[test]
    fn test_roster_is_stable() {
        let model = RiskModel::default();
        assert_eq!(sample_roster(&model), sample_roster(&model));
    }
}
