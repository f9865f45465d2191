//! talentrisk-seed: synthetic workforce data.
//!
//! [`WorkforceGenerator`] draws employee attributes from ranges chosen per
//! target risk level, so a generated batch lands on the requested
//! HIGH / MEDIUM / LOW mix when scored with the default model.

pub mod generator;

pub use generator::{GeneratorError, RiskMix, WorkforceGenerator};
