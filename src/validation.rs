//! Name Validator - Rule/Verdict Separation
//!
//! Rules produce structured violations.
//! The verdict is derived from the full violation list, never set on its own.

use serde::Serialize;
use tracing::debug;

use crate::registry::{lookup, Constraint, ResourceCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameViolation {
    pub rule: String,
    pub detail: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// Outcome of validating one name. `valid` is true iff `violations` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    category: ResourceCategory,
    name: String,
    valid: bool,
    violations: Vec<NameViolation>,
}

impl ValidationVerdict {
    pub fn from_violations(
        category: ResourceCategory,
        name: impl Into<String>,
        violations: Vec<NameViolation>,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            valid: violations.is_empty(),
            violations,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn violations(&self) -> &[NameViolation] {
        &self.violations
    }

    pub fn category(&self) -> ResourceCategory {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn violated_rules(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.rule.as_str()).collect()
    }

    /// One line per violation, `rule: detail`.
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{}: {}", v.rule, v.detail))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation rule trait - produces violations
pub trait NameRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, name: &str, constraint: &Constraint) -> Vec<NameViolation>;
}

// --- Concrete Rules ---

pub struct LengthRule;

impl NameRule for LengthRule {
    fn name(&self) -> &'static str { "length" }

    fn check(&self, name: &str, constraint: &Constraint) -> Vec<NameViolation> {
        let len = name.chars().count();
        if len >= constraint.min_length && len <= constraint.max_length {
            return vec![];
        }

        let detail = if len < constraint.min_length {
            format!("Name is too short for {}", constraint.category)
        } else {
            format!("Name is too long for {}", constraint.category)
        };

        vec![NameViolation {
            rule: self.name().to_string(),
            detail,
            expected: Some(format!("{}-{} characters", constraint.min_length, constraint.max_length)),
            actual: Some(format!("{} characters", len)),
        }]
    }
}

pub struct CharsetRule;

impl NameRule for CharsetRule {
    fn name(&self) -> &'static str { "charset" }

    fn check(&self, name: &str, constraint: &Constraint) -> Vec<NameViolation> {
        let mut offending: Vec<char> = vec![];
        for c in name.chars() {
            if !constraint.charset.allows(c) && !offending.contains(&c) {
                offending.push(c);
            }
        }

        if offending.is_empty() {
            return vec![];
        }

        vec![NameViolation {
            rule: self.name().to_string(),
            detail: "Name contains disallowed characters".to_string(),
            expected: Some(constraint.charset.describe().to_string()),
            actual: Some(offending.iter().map(|c| format!("'{}'", c)).collect::<Vec<_>>().join(", ")),
        }]
    }
}

pub struct CasingRule;

impl NameRule for CasingRule {
    fn name(&self) -> &'static str { "casing" }

    fn check(&self, name: &str, constraint: &Constraint) -> Vec<NameViolation> {
        if !constraint.must_be_lowercase || !name.chars().any(char::is_uppercase) {
            return vec![];
        }

        vec![NameViolation {
            rule: self.name().to_string(),
            detail: "Name must be lowercase".to_string(),
            expected: Some(name.to_lowercase()),
            actual: Some(name.to_string()),
        }]
    }
}

pub struct EdgeCharacterRule;

impl NameRule for EdgeCharacterRule {
    fn name(&self) -> &'static str { "edge_characters" }

    fn check(&self, name: &str, constraint: &Constraint) -> Vec<NameViolation> {
        let mut violations = vec![];

        let edges = [("start", name.chars().next()), ("end", name.chars().last())];
        for (position, edge) in edges {
            if let Some(c) = edge.filter(|c| constraint.is_edge_forbidden(*c)) {
                violations.push(NameViolation {
                    rule: self.name().to_string(),
                    detail: format!("Name cannot {} with '{}'", position, c),
                    expected: Some(format!("no {:?} at {}", constraint.forbidden_edge_chars, position)),
                    actual: Some(c.to_string()),
                });
            }
        }

        violations
    }
}

pub struct ConsecutiveHyphenRule;

impl NameRule for ConsecutiveHyphenRule {
    fn name(&self) -> &'static str { "consecutive_hyphens" }

    fn check(&self, name: &str, constraint: &Constraint) -> Vec<NameViolation> {
        if !constraint.no_consecutive_hyphens || !name.contains("--") {
            return vec![];
        }

        vec![NameViolation {
            rule: self.name().to_string(),
            detail: "Name cannot contain consecutive hyphens".to_string(),
            expected: None,
            actual: Some(name.to_string()),
        }]
    }
}

pub struct ReservedPrefixRule;

impl NameRule for ReservedPrefixRule {
    fn name(&self) -> &'static str { "reserved_prefix" }

    fn check(&self, name: &str, constraint: &Constraint) -> Vec<NameViolation> {
        match constraint.reserved_prefix_of(name) {
            Some(prefix) => vec![NameViolation {
                rule: self.name().to_string(),
                detail: format!("Name cannot start with reserved word '{}'", prefix),
                expected: None,
                actual: Some(prefix.to_string()),
            }],
            None => vec![],
        }
    }
}

/// Validator runs every rule; no short-circuit.
pub struct NameValidator {
    rules: Vec<Box<dyn NameRule>>,
}

impl NameValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(LengthRule),
                Box::new(CharsetRule),
                Box::new(CasingRule),
                Box::new(EdgeCharacterRule),
                Box::new(ConsecutiveHyphenRule),
                Box::new(ReservedPrefixRule),
            ],
        }
    }

    pub fn validate(&self, category: ResourceCategory, name: &str) -> ValidationVerdict {
        let constraint = lookup(category);

        let mut all_violations = vec![];
        for rule in &self.rules {
            all_violations.extend(rule.check(name, constraint));
        }

        let verdict = ValidationVerdict::from_violations(category, name, all_violations);
        debug!(
            category = %category,
            name,
            valid = verdict.is_valid(),
            violations = verdict.violations().len(),
            "validated name"
        );
        verdict
    }
}

impl Default for NameValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Check `name` against the registry entry for `category`.
pub fn validate(category: ResourceCategory, name: &str) -> ValidationVerdict {
    NameValidator::new().validate(category, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names_from_fixtures() {
        let cases = [
            (ResourceCategory::ResourceGroup, "valid-rg-name"),
            (ResourceCategory::StorageAccount, "validstorageaccount"),
            (ResourceCategory::KeyVault, "valid-kv-name"),
            (ResourceCategory::WebApp, "valid-webapp-name"),
            (ResourceCategory::VirtualNetwork, "valid-vnet-name"),
            (ResourceCategory::Subnet, "valid-subnet-name"),
            (ResourceCategory::NetworkSecurityGroup, "valid-nsg-name"),
            (ResourceCategory::StorageContainer, "valid-container"),
            (ResourceCategory::AppServicePlan, "valid-plan-name"),
        ];
        for (category, name) in cases {
            let verdict = validate(category, name);
            assert!(verdict.is_valid(), "{} should accept {}: {}", category, name, verdict.summary());
        }
    }

    #[test]
    fn test_storage_account_too_long() {
        let verdict = validate(ResourceCategory::StorageAccount, "thisstorageaccountnameistoolongandwillfail");
        assert!(!verdict.is_valid());
        assert_eq!(verdict.violated_rules(), vec!["length"]);
    }

    #[test]
    fn test_reports_every_violation() {
        let verdict = validate(ResourceCategory::KeyVault, "-Bad--Vault_");
        assert_eq!(
            verdict.violated_rules(),
            vec!["charset", "casing", "edge_characters", "consecutive_hyphens"]
        );
    }

    #[test]
    fn test_hyphen_only_name_flags_both_edges() {
        let verdict = validate(ResourceCategory::Subnet, "-");
        let edges: Vec<_> = verdict.violations().iter()
            .filter(|v| v.rule == "edge_characters")
            .collect();
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_mixed_case_allowed_where_not_lowercase() {
        assert!(validate(ResourceCategory::ResourceGroup, "RG-Prod_01").is_valid());
        assert!(!validate(ResourceCategory::WebApp, "Web-Prod").is_valid());
    }

    #[test]
    fn test_reserved_prefix_flagged() {
        let verdict = validate(ResourceCategory::WebApp, "windows-portal");
        assert_eq!(verdict.violated_rules(), vec!["reserved_prefix"]);
    }

    #[test]
    fn test_empty_name_is_too_short() {
        let verdict = validate(ResourceCategory::ResourceGroup, "");
        assert_eq!(verdict.violated_rules(), vec!["length"]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 'é' is two bytes but one character; charset still rejects it.
        let verdict = validate(ResourceCategory::StorageAccount, "caf\u{e9}");
        assert_eq!(verdict.violated_rules(), vec!["charset"]);
    }
}
