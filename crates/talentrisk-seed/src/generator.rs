//! Randomised-but-bucketed employee generator.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use talentrisk_common::{NewEmployee, RiskLevel};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Invalid risk mix: {0}")]
    InvalidMix(String),
}

/// Target share of each risk level in a generated batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMix {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for RiskMix {
    fn default() -> Self {
        Self { high: 0.20, medium: 0.30, low: 0.50 }
    }
}

impl RiskMix {
    pub fn new(high: f64, medium: f64, low: f64) -> Result<Self, GeneratorError> {
        let mix = Self { high, medium, low };
        mix.validate()?;
        Ok(mix)
    }

    pub fn validate(&self) -> Result<(), GeneratorError> {
        let shares = [self.high, self.medium, self.low];
        if shares.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(GeneratorError::InvalidMix("shares must be non-negative".into()));
        }
        let sum: f64 = shares.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(GeneratorError::InvalidMix(format!("shares sum to {}, expected 1.0", sum)));
        }
        Ok(())
    }

    /// Split `count` into (high, medium, low); low absorbs rounding.
    pub fn allocate(&self, count: usize) -> (usize, usize, usize) {
        let high = ((count as f64 * self.high).round() as usize).min(count);
        let medium = ((count as f64 * self.medium).round() as usize).min(count - high);
        (high, medium, count - high - medium)
    }
}

/// Attribute ranges that keep the default model's score inside one level.
struct Profile {
    rating: RangeInclusive<f64>,
    tenure: RangeInclusive<u32>,
    engagement: RangeInclusive<f64>,
    comp_ratio: RangeInclusive<f64>,
    skill_gaps: RangeInclusive<usize>,
    trend: RangeInclusive<f64>,
}

fn profile(level: RiskLevel) -> Profile {
    match level {
        // minimum score 72.5
        RiskLevel::High => Profile {
            rating: 1.0..=2.0,
            tenure: 0..=11,
            engagement: 0.05..=0.30,
            comp_ratio: 0.60..=0.79,
            skill_gaps: 3..=4,
            trend: -0.5..=-0.11,
        },
        // 44.25 to 63.4
        RiskLevel::Medium => Profile {
            rating: 2.2..=3.2,
            tenure: 6..=11,
            engagement: 0.35..=0.55,
            comp_ratio: 0.80..=0.89,
            skill_gaps: 0..=2,
            trend: -0.15..=0.15,
        },
        // at most 25.8
        RiskLevel::Low => Profile {
            rating: 3.8..=5.0,
            tenure: 24..=120,
            engagement: 0.70..=1.0,
            comp_ratio: 0.95..=1.25,
            skill_gaps: 0..=1,
            trend: 0.0..=0.4,
        },
    }
}

const FIRST_NAMES: &[&str] = &[
    "Sarah", "Michael", "Emily", "David", "Lisa", "James", "Priya", "Carlos", "Aisha", "Tom",
    "Mei", "Daniel", "Olivia", "Ravi", "Sofia", "Marcus", "Hannah", "Kenji", "Fatima", "Lucas",
    "Grace", "Omar", "Chloe", "Andre", "Nina",
];

const LAST_NAMES: &[&str] = &[
    "Johnson", "Chen", "Rodriguez", "Kim", "Thompson", "Patel", "Garcia", "Nguyen", "Okafor",
    "Smith", "Müller", "Rossi", "Haddad", "Silva", "Kowalski", "Brown", "Tanaka", "Ali",
    "Dubois", "Walker",
];

const LOCATIONS: &[&str] = &["San Francisco", "New York", "Chicago", "Boston", "Austin", "Remote"];

struct Department {
    name: &'static str,
    roles: &'static [&'static str],
    skills: &'static [&'static str],
}

const DEPARTMENTS: &[Department] = &[
    Department {
        name: "Engineering",
        roles: &["Software Engineer", "Senior Software Engineer", "Staff Engineer", "Engineering Manager"],
        skills: &["Rust", "Kubernetes", "System Design", "React", "PostgreSQL", "Go", "Terraform"],
    },
    Department {
        name: "Product",
        roles: &["Product Manager", "Senior Product Manager", "Product Designer"],
        skills: &["Product Strategy", "User Research", "Roadmapping", "Data Analysis", "Figma"],
    },
    Department {
        name: "Marketing",
        roles: &["Marketing Specialist", "Content Strategist", "Growth Manager"],
        skills: &["SEO", "Campaign Analytics", "Copywriting", "Brand Strategy", "Paid Media"],
    },
    Department {
        name: "Sales",
        roles: &["Account Executive", "Sales Development Rep", "Sales Manager"],
        skills: &["B2B Sales", "Negotiation", "CRM", "Forecasting", "Account Management"],
    },
    Department {
        name: "HR",
        roles: &["HR Generalist", "Recruiter", "HR Manager"],
        skills: &["Recruitment", "Employee Relations", "HRIS", "Compliance", "Compensation"],
    },
    Department {
        name: "Finance",
        roles: &["Financial Analyst", "Accountant", "Controller"],
        skills: &["Financial Modeling", "Excel", "FP&A", "Audit", "Tax"],
    },
];

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Deterministic when built with [`WorkforceGenerator::seeded`].
pub struct WorkforceGenerator {
    rng: StdRng,
    mix: RiskMix,
    used_names: HashSet<String>,
    email_counts: HashMap<String, usize>,
    next_number: usize,
}

impl WorkforceGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            mix: RiskMix::default(),
            used_names: HashSet::new(),
            email_counts: HashMap::new(),
            next_number: 1,
        }
    }

    pub fn with_mix(mut self, mix: RiskMix) -> Self {
        self.mix = mix;
        self
    }

    /// Generate `count` employees in shuffled order, paired with the level
    /// each was drawn for.
    pub fn generate(&mut self, count: usize) -> Vec<(RiskLevel, NewEmployee)> {
        let (high, medium, low) = self.mix.allocate(count);
        let mut levels: Vec<RiskLevel> = std::iter::repeat(RiskLevel::High)
            .take(high)
            .chain(std::iter::repeat(RiskLevel::Medium).take(medium))
            .chain(std::iter::repeat(RiskLevel::Low).take(low))
            .collect();
        levels.shuffle(&mut self.rng);

        levels
            .into_iter()
            .map(|level| (level, self.employee(level)))
            .collect()
    }

    /// One employee whose attributes fall in `level`'s ranges.
    pub fn employee(&mut self, level: RiskLevel) -> NewEmployee {
        let p = profile(level);
        let dept = pick(&mut self.rng, DEPARTMENTS);
        let (name, email) = self.unique_identity();

        let mut skills: Vec<&str> = dept.skills.to_vec();
        skills.shuffle(&mut self.rng);
        let gaps = self.rng.gen_range(p.skill_gaps.clone()).min(skills.len());
        let (gap_skills, held) = skills.split_at(gaps);
        let critical = held.iter().take(3).map(|s| s.to_string()).collect();

        let number = self.next_number;
        self.next_number += 1;

        NewEmployee {
            employee_id: Some(format!("EMP-{:04}", number)),
            name,
            email: Some(email),
            department: dept.name.to_string(),
            role: pick(&mut self.rng, dept.roles).to_string(),
            location: Some(pick(&mut self.rng, LOCATIONS).to_string()),
            tenure_months: self.rng.gen_range(p.tenure),
            performance_rating: Some(round_to(self.rng.gen_range(p.rating), 1)),
            engagement_score: Some(round_to(self.rng.gen_range(p.engagement), 2)),
            comp_ratio: Some(round_to(self.rng.gen_range(p.comp_ratio), 2)),
            critical_skills: critical,
            skill_gaps: gap_skills.iter().map(|s| s.to_string()).collect(),
            performance_trend: Some(round_to(self.rng.gen_range(p.trend), 2)),
        }
    }

    fn unique_identity(&mut self) -> (String, String) {
        let combos = FIRST_NAMES.len() * LAST_NAMES.len();
        let mut name = String::new();
        for _ in 0..combos {
            let first = *pick(&mut self.rng, FIRST_NAMES);
            let last = *pick(&mut self.rng, LAST_NAMES);
            name = format!("{} {}", first, last);
            if !self.used_names.contains(&name) {
                break;
            }
        }
        // Pool exhausted: disambiguate with a numeric suffix.
        if self.used_names.contains(&name) {
            let base = name.clone();
            let mut n = 2;
            while self.used_names.contains(&name) {
                name = format!("{} {}", base, n);
                n += 1;
            }
        }
        self.used_names.insert(name.clone());

        let local: String = name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
            .collect();
        let seen = self.email_counts.entry(local.clone()).or_insert(0);
        *seen += 1;
        let email = if *seen == 1 {
            format!("{}@company.com", local)
        } else {
            format!("{}{}@company.com", local, seen)
        };
        (name, email)
    }
}
