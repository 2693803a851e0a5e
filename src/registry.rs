//! Constraint Registry - Per-Category Naming Contracts
//!
//! One static entry per resource category. Derivation and validation both
//! read from here, so they can never disagree on what a valid name is.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NamingError;

/// Closed set of resource categories the engine knows how to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    ResourceGroup,
    StorageAccount,
    KeyVault,
    WebApp,
    VirtualNetwork,
    Subnet,
    NetworkSecurityGroup,
    AppServicePlan,
    StorageContainer,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 9] = [
        ResourceCategory::ResourceGroup,
        ResourceCategory::StorageAccount,
        ResourceCategory::KeyVault,
        ResourceCategory::WebApp,
        ResourceCategory::VirtualNetwork,
        ResourceCategory::Subnet,
        ResourceCategory::NetworkSecurityGroup,
        ResourceCategory::AppServicePlan,
        ResourceCategory::StorageContainer,
    ];

    /// Canonical snake_case identifier, identical to the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::ResourceGroup => "resource_group",
            ResourceCategory::StorageAccount => "storage_account",
            ResourceCategory::KeyVault => "key_vault",
            ResourceCategory::WebApp => "web_app",
            ResourceCategory::VirtualNetwork => "virtual_network",
            ResourceCategory::Subnet => "subnet",
            ResourceCategory::NetworkSecurityGroup => "network_security_group",
            ResourceCategory::AppServicePlan => "app_service_plan",
            ResourceCategory::StorageContainer => "storage_container",
        }
    }

    /// Conventional short code, for display only. Never part of a derived name.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            ResourceCategory::ResourceGroup => "rg",
            ResourceCategory::StorageAccount => "st",
            ResourceCategory::KeyVault => "kv",
            ResourceCategory::WebApp => "app",
            ResourceCategory::VirtualNetwork => "vnet",
            ResourceCategory::Subnet => "snet",
            ResourceCategory::NetworkSecurityGroup => "nsg",
            ResourceCategory::AppServicePlan => "asp",
            ResourceCategory::StorageContainer => "container",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceCategory {
    type Err = NamingError;

    /// Accepts the snake_case form, the kebab-case form and the short code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ResourceCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized || c.abbreviation() == normalized)
            .ok_or_else(|| NamingError::UnknownCategory(s.to_string()))
    }
}

/// Character classes a name may be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    /// `[a-z0-9]`
    LowercaseAlphanumeric,
    /// `[A-Za-z0-9-]`
    AlphanumericHyphen,
    /// `[A-Za-z0-9_-]`
    AlphanumericHyphenUnderscore,
}

impl Charset {
    pub fn allows(&self, c: char) -> bool {
        match self {
            Charset::LowercaseAlphanumeric => c.is_ascii_lowercase() || c.is_ascii_digit(),
            Charset::AlphanumericHyphen => c.is_ascii_alphanumeric() || c == '-',
            Charset::AlphanumericHyphenUnderscore => {
                c.is_ascii_alphanumeric() || c == '-' || c == '_'
            }
        }
    }

    pub fn allows_hyphen(&self) -> bool {
        self.allows('-')
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Charset::LowercaseAlphanumeric => "lowercase letters and digits",
            Charset::AlphanumericHyphen => "letters, digits and hyphens",
            Charset::AlphanumericHyphenUnderscore => "letters, digits, hyphens and underscores",
        }
    }
}

/// Naming rules for a single resource category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub category: ResourceCategory,
    /// Inclusive, counted in characters.
    pub min_length: usize,
    /// Inclusive, counted in characters.
    pub max_length: usize,
    pub charset: Charset,
    pub must_be_lowercase: bool,
    pub forbidden_edge_chars: &'static [char],
    pub no_consecutive_hyphens: bool,
    /// Matched case-insensitively against the start of the name.
    pub reserved_prefixes: &'static [&'static str],
}

impl Constraint {
    pub fn is_edge_forbidden(&self, c: char) -> bool {
        self.forbidden_edge_chars.contains(&c)
    }

    /// Reserved prefix the name starts with, if any.
    pub fn reserved_prefix_of(&self, name: &str) -> Option<&'static str> {
        let lowered = name.to_ascii_lowercase();
        self.reserved_prefixes
            .iter()
            .copied()
            .find(|prefix| lowered.starts_with(prefix))
    }
}

const HYPHEN: &[char] = &['-'];
const NONE: &[char] = &[];

static RESOURCE_GROUP: Constraint = Constraint {
    category: ResourceCategory::ResourceGroup,
    min_length: 1,
    max_length: 90,
    charset: Charset::AlphanumericHyphenUnderscore,
    must_be_lowercase: false,
    forbidden_edge_chars: HYPHEN,
    no_consecutive_hyphens: false,
    reserved_prefixes: &[],
};

static STORAGE_ACCOUNT: Constraint = Constraint {
    category: ResourceCategory::StorageAccount,
    min_length: 3,
    max_length: 24,
    charset: Charset::LowercaseAlphanumeric,
    must_be_lowercase: true,
    forbidden_edge_chars: NONE,
    no_consecutive_hyphens: false,
    reserved_prefixes: &[],
};

static KEY_VAULT: Constraint = Constraint {
    category: ResourceCategory::KeyVault,
    min_length: 3,
    max_length: 24,
    charset: Charset::AlphanumericHyphen,
    must_be_lowercase: true,
    forbidden_edge_chars: HYPHEN,
    no_consecutive_hyphens: true,
    reserved_prefixes: &[],
};

static WEB_APP: Constraint = Constraint {
    category: ResourceCategory::WebApp,
    min_length: 2,
    max_length: 60,
    charset: Charset::AlphanumericHyphen,
    must_be_lowercase: true,
    forbidden_edge_chars: HYPHEN,
    no_consecutive_hyphens: false,
    reserved_prefixes: &["microsoft", "windows"],
};

static VIRTUAL_NETWORK: Constraint = Constraint {
    category: ResourceCategory::VirtualNetwork,
    min_length: 2,
    max_length: 64,
    charset: Charset::AlphanumericHyphenUnderscore,
    must_be_lowercase: false,
    forbidden_edge_chars: HYPHEN,
    no_consecutive_hyphens: false,
    reserved_prefixes: &[],
};

static SUBNET: Constraint = Constraint {
    category: ResourceCategory::Subnet,
    min_length: 1,
    max_length: 80,
    charset: Charset::AlphanumericHyphenUnderscore,
    must_be_lowercase: false,
    forbidden_edge_chars: HYPHEN,
    no_consecutive_hyphens: false,
    reserved_prefixes: &[],
};

static NETWORK_SECURITY_GROUP: Constraint = Constraint {
    category: ResourceCategory::NetworkSecurityGroup,
    min_length: 1,
    max_length: 80,
    charset: Charset::AlphanumericHyphenUnderscore,
    must_be_lowercase: false,
    forbidden_edge_chars: HYPHEN,
    no_consecutive_hyphens: false,
    reserved_prefixes: &[],
};

static APP_SERVICE_PLAN: Constraint = Constraint {
    category: ResourceCategory::AppServicePlan,
    min_length: 1,
    max_length: 40,
    charset: Charset::AlphanumericHyphen,
    must_be_lowercase: false,
    forbidden_edge_chars: HYPHEN,
    no_consecutive_hyphens: false,
    reserved_prefixes: &[],
};

static STORAGE_CONTAINER: Constraint = Constraint {
    category: ResourceCategory::StorageContainer,
    min_length: 3,
    max_length: 63,
    charset: Charset::AlphanumericHyphen,
    must_be_lowercase: true,
    forbidden_edge_chars: HYPHEN,
    no_consecutive_hyphens: true,
    reserved_prefixes: &[],
};

/// Constraint for a category. Exhaustive: a new category does not compile
/// until it has an entry here.
pub fn lookup(category: ResourceCategory) -> &'static Constraint {
    match category {
        ResourceCategory::ResourceGroup => &RESOURCE_GROUP,
        ResourceCategory::StorageAccount => &STORAGE_ACCOUNT,
        ResourceCategory::KeyVault => &KEY_VAULT,
        ResourceCategory::WebApp => &WEB_APP,
        ResourceCategory::VirtualNetwork => &VIRTUAL_NETWORK,
        ResourceCategory::Subnet => &SUBNET,
        ResourceCategory::NetworkSecurityGroup => &NETWORK_SECURITY_GROUP,
        ResourceCategory::AppServicePlan => &APP_SERVICE_PLAN,
        ResourceCategory::StorageContainer => &STORAGE_CONTAINER,
    }
}

/// String-facing lookup for callers holding an untyped category name.
pub fn lookup_by_name(name: &str) -> Result<&'static Constraint, NamingError> {
    let category: ResourceCategory = name.parse()?;
    Ok(lookup(category))
}

/// Every registry entry, in category order.
pub fn list() -> Vec<&'static Constraint> {
    ResourceCategory::ALL.iter().map(|c| lookup(*c)).collect()
}
