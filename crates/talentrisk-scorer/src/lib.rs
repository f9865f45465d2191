//! talentrisk-scorer: Employee flight-risk scoring engine.
//!
//! A weighted sum of five normalised factors (performance, tenure,
//! engagement, compensation ratio, skill gaps), scaled to 0–100 and bucketed
//! into LOW / MEDIUM / HIGH.

pub mod weights;
pub mod normalise;
pub mod scorer;
pub mod analytics;
pub mod recommend;

pub use scorer::{RiskAssessment, RiskDriver, RiskInputs, RiskModel, RiskThresholds};
pub use weights::{WeightProfile, WeightVector};
