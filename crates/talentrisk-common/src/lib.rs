//! talentrisk-common: Shared types, errors, and validation used across all Talent Risk crates.

pub mod error;
pub mod employee;
pub mod risk;

// Re-export commonly used types
pub use employee::{Employee, EmployeeUpdate, NewEmployee};
pub use error::{ApiError, Result, TalentRiskError};
pub use risk::{RiskFactors, RiskLevel, RiskTrend};
