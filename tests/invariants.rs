//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use cloudnaming_core::{
    derive, derive_plan, lookup, lookup_by_name, validate, FixedClock, GovernanceInputs,
    NamingComponents, NamingError, ResourceCategory, TagComposer,
    tags::{ENVIRONMENT, MANDATORY_TAG_KEYS},
};

fn governance() -> GovernanceInputs {
    GovernanceInputs {
        environment: "prod".to_string(),
        project: "p".to_string(),
        owner: "o".to_string(),
        cost_center: "1".to_string(),
        terraform_version: "v1".to_string(),
    }
}

#[test]
fn invariant_derived_names_validate_for_every_category() {
    let components = NamingComponents::new("tf", "dev", "naming-test", "01");

    for category in ResourceCategory::ALL {
        let name = derive(category, &components).unwrap();
        let verdict = validate(category, &name);
        assert!(verdict.is_valid(), "{} derived '{}': {}", category, name, verdict.summary());
    }
}

#[test]
fn invariant_truncation_keeps_suffix() {
    let components = NamingComponents::new("tf", "production", "infrastructuremodernization", "ab12cd");
    let max = lookup(ResourceCategory::StorageAccount).max_length;

    let name = derive(ResourceCategory::StorageAccount, &components).unwrap();

    assert!(name.ends_with("ab12cd"));
    assert!(name.len() <= max);
}

#[test]
fn invariant_suffix_survives_in_every_category() {
    let components = NamingComponents::new(
        "contoso",
        "production",
        "infrastructure-modernization-programme-phase-two-with-extra-words",
        "ab12cd",
    );

    for category in ResourceCategory::ALL {
        let name = derive(category, &components).unwrap();
        assert!(name.ends_with("ab12cd"), "{} lost its suffix: {}", category, name);
        assert!(name.len() <= lookup(category).max_length);
    }
}

#[test]
fn invariant_governance_tags_win() {
    let user = BTreeMap::from([("Environment".to_string(), "malicious".to_string())]);
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

    let tags = TagComposer::with_clock(clock).compose(&user, &governance());

    assert_eq!(tags.get(ENVIRONMENT), Some("prod"));
    for key in MANDATORY_TAG_KEYS {
        assert!(tags.contains_key(key), "missing {}", key);
    }
}

#[test]
fn invariant_validator_reports_all_violations() {
    let verdict = validate(ResourceCategory::StorageAccount, "AB");

    assert!(!verdict.is_valid());
    assert!(verdict.violations().len() >= 2);
    let rules = verdict.violated_rules();
    assert!(rules.contains(&"length"));
    assert!(rules.contains(&"casing"));
}

#[test]
fn invariant_verdict_never_partially_populated() {
    for name in ["", "AB", "valid-kv-name", "--", "a".repeat(100).as_str()] {
        for category in ResourceCategory::ALL {
            let verdict = validate(category, name);
            assert_eq!(verdict.is_valid(), verdict.violations().is_empty());
        }
    }
}

#[test]
fn invariant_validation_is_idempotent() {
    let first = validate(ResourceCategory::KeyVault, "-Key--Vault");
    let second = validate(ResourceCategory::KeyVault, "-Key--Vault");
    assert_eq!(first, second);
}

#[test]
fn invariant_validation_does_not_normalize() {
    let verdict = validate(ResourceCategory::WebApp, "Tf-Dev-App");
    assert_eq!(verdict.name(), "Tf-Dev-App");
    assert!(!verdict.is_valid());
}

#[test]
fn invariant_unknown_category_error() {
    for _ in 0..3 {
        let err = lookup_by_name("cosmos_account").unwrap_err();
        assert!(matches!(err, NamingError::UnknownCategory(_)));
        assert!(err.to_string().contains("Unknown resource category"));
    }
}

#[test]
fn invariant_insufficient_components_not_padded() {
    let components = NamingComponents::new("a", "-", "-", "b");
    let err = derive(ResourceCategory::StorageAccount, &components).unwrap_err();
    assert!(matches!(err, NamingError::ComponentsInsufficient { .. }));
}

#[test]
fn invariant_plan_fingerprint_stable() {
    let components = NamingComponents::new("tf", "test", "compliance-test", "01");

    let plan1 = derive_plan(&components).unwrap();
    let plan2 = derive_plan(&components).unwrap();

    assert_eq!(plan1.fingerprint, plan2.fingerprint);
    assert_eq!(plan1.names, plan2.names);

    let other = derive_plan(&NamingComponents::new("tf", "test", "compliance-test", "02")).unwrap();
    assert_ne!(plan1.fingerprint, other.fingerprint);
}
