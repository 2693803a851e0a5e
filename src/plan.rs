//! Naming Plan - Every Name for a Deployment in One Pass
//!
//! A deployment needs one name per category from the same components. The
//! plan derives them together and carries a fingerprint so automation can
//! tell whether a rerun would rename anything.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::deriver::{NameDeriver, NamingComponents};
use crate::error::NamingError;
use crate::hashing::compute_plan_fingerprint;
use crate::registry::ResourceCategory;
use crate::validation::{NameValidator, ValidationVerdict};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingPlan {
    pub components: NamingComponents,
    pub names: BTreeMap<ResourceCategory, String>,
    pub fingerprint: String,
}

impl NamingPlan {
    pub fn get(&self, category: ResourceCategory) -> Option<&str> {
        self.names.get(&category).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceCategory, &str)> {
        self.names.iter().map(|(c, n)| (*c, n.as_str()))
    }
}

/// Aggregate verdict over a set of externally chosen names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanVerdict {
    valid: bool,
    verdicts: Vec<ValidationVerdict>,
}

impl PlanVerdict {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn verdicts(&self) -> &[ValidationVerdict] {
        &self.verdicts
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationVerdict> {
        self.verdicts.iter().filter(|v| !v.is_valid())
    }
}

/// Derive a name for every category. The first category that cannot be
/// named fails the whole plan.
pub fn derive_plan(components: &NamingComponents) -> Result<NamingPlan, NamingError> {
    let deriver = NameDeriver::new();

    let mut names = BTreeMap::new();
    for category in ResourceCategory::ALL {
        names.insert(category, deriver.derive(category, components)?);
    }

    let fingerprint = compute_plan_fingerprint(&names)?;
    debug!(fingerprint = %fingerprint, count = names.len(), "derived naming plan");

    Ok(NamingPlan {
        components: components.clone(),
        names,
        fingerprint,
    })
}

/// Validate every supplied name; the plan is valid only if all of them are.
pub fn validate_plan(names: &BTreeMap<ResourceCategory, String>) -> PlanVerdict {
    let validator = NameValidator::new();
    let verdicts: Vec<_> = names
        .iter()
        .map(|(category, name)| validator.validate(*category, name))
        .collect();

    PlanVerdict {
        valid: verdicts.iter().all(ValidationVerdict::is_valid),
        verdicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_covers_every_category() {
        let plan = derive_plan(&NamingComponents::new("tf", "dev", "naming-test", "01")).unwrap();
        assert_eq!(plan.names.len(), ResourceCategory::ALL.len());
        assert_eq!(plan.get(ResourceCategory::StorageAccount), Some("tfdevnamingtest01"));
        assert_eq!(plan.get(ResourceCategory::KeyVault), Some("tf-dev-naming-test-01"));
    }

    #[test]
    fn test_plan_fails_on_unnameable_category() {
        let err = derive_plan(&NamingComponents::new("windows", "dev", "app", "01")).unwrap_err();
        assert!(matches!(err, NamingError::ReservedPrefix { category: ResourceCategory::WebApp, .. }));
    }

    #[test]
    fn test_validate_plan_single_bad_name_fails_all() {
        let mut names = BTreeMap::new();
        names.insert(ResourceCategory::ResourceGroup, "valid-rg-name".to_string());
        names.insert(ResourceCategory::StorageAccount, "thisstorageaccountnameistoolongandwillfail".to_string());
        names.insert(ResourceCategory::KeyVault, "valid-kv-name".to_string());

        let verdict = validate_plan(&names);
        assert!(!verdict.is_valid());
        assert_eq!(verdict.verdicts().len(), 3);
        let failed: Vec<_> = verdict.failures().map(|v| v.category()).collect();
        assert_eq!(failed, vec![ResourceCategory::StorageAccount]);
    }

    #[test]
    fn test_validate_empty_plan_is_valid() {
        assert!(validate_plan(&BTreeMap::new()).is_valid());
    }
}
