//! CloudNaming Core - Resource Naming Engine
//!
//! # The Four Rules (Non-Negotiable)
//! 1. The Registry Is Truth
//! 2. Derived Names Always Validate
//! 3. Validation Judges, Never Repairs
//! 4. Governance Tags Cannot Be Overridden

pub mod error;
pub mod registry;
pub mod validation;
pub mod deriver;
pub mod plan;
pub mod hashing;
pub mod tags;

pub use error::NamingError;
pub use registry::{lookup, lookup_by_name, Charset, Constraint, ResourceCategory};
pub use validation::{validate, NameValidator, NameViolation, ValidationVerdict};
pub use deriver::{derive, NameDeriver, NamingComponents};
pub use plan::{derive_plan, validate_plan, NamingPlan, PlanVerdict};
pub use hashing::{canonical_json, compute_plan_fingerprint};
pub use tags::{compose, missing_mandatory, Clock, FixedClock, GovernanceInputs, SystemClock, TagComposer, TagDrift, TagSet};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
