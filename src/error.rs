//! Error types for naming operations.
//!
//! Validation violations are data (see `ValidationVerdict`), not errors.
//! Everything here indicates misuse and is never retried.

use thiserror::Error;

use crate::registry::ResourceCategory;

#[derive(Debug, Error)]
pub enum NamingError {
    #[error("Unknown resource category: {0}")]
    UnknownCategory(String),

    #[error("Missing naming component: {0}")]
    MissingComponent(&'static str),

    #[error("Components insufficient for {category}: derived '{derived}' is shorter than {min_length} characters")]
    ComponentsInsufficient {
        category: ResourceCategory,
        derived: String,
        min_length: usize,
    },

    #[error("Derived name '{name}' for {category} starts with reserved prefix '{prefix}'")]
    ReservedPrefix {
        category: ResourceCategory,
        name: String,
        prefix: &'static str,
    },

    #[error("Derived name '{name}' for {category} failed validation: {violations}")]
    InconsistentDerivation {
        category: ResourceCategory,
        name: String,
        violations: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
