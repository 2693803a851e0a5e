//! Tag Composer - Governance Tags Are Non-Negotiable
//!
//! Caller tags pass through untouched unless they collide with a mandatory
//! key, in which case the governance value wins. The creation timestamp is
//! read from an injectable clock so composition stays deterministic in tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const ENVIRONMENT: &str = "Environment";
pub const PROJECT: &str = "Project";
pub const OWNER: &str = "Owner";
pub const COST_CENTER: &str = "CostCenter";
pub const CREATION_DATE_TIME: &str = "CreationDateTime";
pub const TERRAFORM_VERSION: &str = "TerraformVersion";

pub const MANDATORY_TAG_KEYS: [&str; 6] = [
    ENVIRONMENT,
    PROJECT,
    OWNER,
    COST_CENTER,
    CREATION_DATE_TIME,
    TERRAFORM_VERSION,
];

/// UTC, second precision, sorts lexicographically in time order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Time source for `CreationDateTime`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceInputs {
    pub environment: String,
    pub project: String,
    pub owner: String,
    pub cost_center: String,
    pub terraform_version: String,
}

/// Tag key -> value. Keys are unique and case-sensitive; equality ignores
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }

    /// Compare the tags this set expects against tags observed on a resource.
    /// `CreationDateTime` differs on every composition and is never reported
    /// as changed.
    pub fn drift(&self, observed: &TagSet) -> TagDrift {
        let mut drift = TagDrift::default();

        for (key, expected) in &self.0 {
            match observed.0.get(key) {
                None => {
                    drift.missing.insert(key.clone(), expected.clone());
                }
                Some(actual) if actual != expected && key != CREATION_DATE_TIME => {
                    drift.changed.insert(
                        key.clone(),
                        TagChange {
                            expected: expected.clone(),
                            actual: actual.clone(),
                        },
                    );
                }
                Some(_) => {}
            }
        }

        for (key, actual) in &observed.0 {
            if !self.0.contains_key(key) {
                drift.unexpected.insert(key.clone(), actual.clone());
            }
        }

        drift
    }
}

impl From<BTreeMap<String, String>> for TagSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagChange {
    pub expected: String,
    pub actual: String,
}

/// Difference between expected and observed tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TagDrift {
    pub missing: BTreeMap<String, String>,
    pub changed: BTreeMap<String, TagChange>,
    pub unexpected: BTreeMap<String, String>,
}

impl TagDrift {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.changed.is_empty() && self.unexpected.is_empty()
    }
}

pub struct TagComposer<C: Clock = SystemClock> {
    clock: C,
}

impl TagComposer<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl Default for TagComposer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TagComposer<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Merge caller tags with the mandatory governance tags.
    pub fn compose(&self, user_tags: &BTreeMap<String, String>, governance: &GovernanceInputs) -> TagSet {
        let created = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        let mandatory = [
            (ENVIRONMENT, governance.environment.as_str()),
            (PROJECT, governance.project.as_str()),
            (OWNER, governance.owner.as_str()),
            (COST_CENTER, governance.cost_center.as_str()),
            (CREATION_DATE_TIME, created.as_str()),
            (TERRAFORM_VERSION, governance.terraform_version.as_str()),
        ];

        let mut tags = user_tags.clone();
        for (key, value) in mandatory {
            if let Some(overridden) = tags.insert(key.to_string(), value.to_string()) {
                if overridden != value {
                    warn!(key, overridden = %overridden, "user tag overridden by governance tag");
                }
            }
        }

        for key in user_tags.keys() {
            if let Some(mandatory_key) = MANDATORY_TAG_KEYS
                .iter()
                .find(|m| m.eq_ignore_ascii_case(key) && **m != key.as_str())
            {
                warn!(key = %key, mandatory_key, "user tag differs from a governance key only by case");
            }
        }

        debug!(count = tags.len(), created = %created, "composed tags");
        TagSet(tags)
    }
}

/// Compose with the system clock.
pub fn compose(user_tags: &BTreeMap<String, String>, governance: &GovernanceInputs) -> TagSet {
    TagComposer::new().compose(user_tags, governance)
}

/// Mandatory keys absent from tags observed on a provisioned resource.
pub fn missing_mandatory(observed: &TagSet) -> Vec<&'static str> {
    MANDATORY_TAG_KEYS
        .iter()
        .copied()
        .filter(|key| !observed.contains_key(key))
        .collect()
}
