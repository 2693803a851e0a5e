//! Name Deriver - Components In, Compliant Name Out
//!
//! CRITICAL: every derived name is run through the validator before it is
//! returned. A name that fails is an engine bug and surfaces as an error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::NamingError;
use crate::registry::{lookup, Constraint, ResourceCategory};
use crate::validation::NameValidator;

/// Caller-supplied naming fragments. All four are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingComponents {
    pub prefix: String,
    pub environment: String,
    pub project: String,
    pub suffix: String,
}

impl NamingComponents {
    pub fn new(
        prefix: impl Into<String>,
        environment: impl Into<String>,
        project: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            environment: environment.into(),
            project: project.into(),
            suffix: suffix.into(),
        }
    }

    /// Components in composition order, rejecting blanks.
    fn ordered(&self) -> Result<[(SegmentKind, &str); 4], NamingError> {
        let ordered = [
            (SegmentKind::Prefix, self.prefix.as_str()),
            (SegmentKind::Environment, self.environment.as_str()),
            (SegmentKind::Project, self.project.as_str()),
            (SegmentKind::Suffix, self.suffix.as_str()),
        ];
        for (kind, value) in &ordered {
            if value.trim().is_empty() {
                return Err(NamingError::MissingComponent(kind.field()));
            }
        }
        Ok(ordered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    Prefix,
    Environment,
    Project,
    Suffix,
}

impl SegmentKind {
    fn field(&self) -> &'static str {
        match self {
            SegmentKind::Prefix => "prefix",
            SegmentKind::Environment => "environment",
            SegmentKind::Project => "project",
            SegmentKind::Suffix => "suffix",
        }
    }
}

/// Order in which segments give up characters when a name is too long.
/// The suffix carries uniqueness and is not in this list.
const SHRINK_ORDER: [SegmentKind; 3] = [
    SegmentKind::Project,
    SegmentKind::Prefix,
    SegmentKind::Environment,
];

#[derive(Debug)]
struct Segment {
    kind: SegmentKind,
    text: String,
}

pub struct NameDeriver {
    validator: NameValidator,
}

impl NameDeriver {
    pub fn new() -> Self {
        Self {
            validator: NameValidator::new(),
        }
    }

    /// Derive a compliant name for `category` from `components`.
    pub fn derive(
        &self,
        category: ResourceCategory,
        components: &NamingComponents,
    ) -> Result<String, NamingError> {
        let constraint = lookup(category);
        let separator = if constraint.charset.allows_hyphen() { "-" } else { "" };

        let mut segments = vec![];
        for (kind, raw) in components.ordered()? {
            let text = normalize_segment(raw, constraint);
            if text.is_empty() {
                if kind == SegmentKind::Suffix {
                    return Err(NamingError::ComponentsInsufficient {
                        category,
                        derived: join(&segments, separator),
                        min_length: constraint.min_length,
                    });
                }
                debug!(category = %category, component = kind.field(), "component empty after normalization, dropped");
                continue;
            }
            segments.push(Segment { kind, text });
        }

        fit_to_length(&mut segments, constraint, separator.len());

        let name = join(&segments, separator);
        if name.chars().count() < constraint.min_length {
            return Err(NamingError::ComponentsInsufficient {
                category,
                derived: name,
                min_length: constraint.min_length,
            });
        }

        if let Some(prefix) = constraint.reserved_prefix_of(&name) {
            return Err(NamingError::ReservedPrefix { category, name, prefix });
        }

        // MANDATORY: derived names must pass the same checks as external ones.
        let verdict = self.validator.validate(category, &name);
        if !verdict.is_valid() {
            return Err(NamingError::InconsistentDerivation {
                category,
                name,
                violations: verdict.summary(),
            });
        }

        debug!(category = %category, name = %name, "derived name");
        Ok(name)
    }
}

impl Default for NameDeriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a compliant name for `category` from `components`.
pub fn derive(category: ResourceCategory, components: &NamingComponents) -> Result<String, NamingError> {
    NameDeriver::new().derive(category, components)
}

/// Lowercase if required, drop disallowed characters, collapse hyphen runs
/// and trim characters that may not sit at a segment boundary.
fn normalize_segment(raw: &str, constraint: &Constraint) -> String {
    let cased = if constraint.must_be_lowercase {
        raw.to_lowercase()
    } else {
        raw.to_string()
    };

    let mut out = String::with_capacity(cased.len());
    for c in cased.chars() {
        if !constraint.charset.allows(c) {
            continue;
        }
        if c == '-' && constraint.no_consecutive_hyphens && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }

    out.trim_matches(|c| is_boundary_forbidden(c, constraint)).to_string()
}

fn is_boundary_forbidden(c: char, constraint: &Constraint) -> bool {
    constraint.is_edge_forbidden(c) || (c == '-' && constraint.no_consecutive_hyphens)
}

fn joined_len(segments: &[Segment], separator_len: usize) -> usize {
    let text: usize = segments.iter().map(|s| s.text.chars().count()).sum();
    text + separator_len * segments.len().saturating_sub(1)
}

fn join(segments: &[Segment], separator: &str) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

fn trim_trailing(text: &mut String, constraint: &Constraint) {
    while text.ends_with(|c| is_boundary_forbidden(c, constraint)) {
        text.pop();
    }
}

/// Shrink segments in `SHRINK_ORDER` until the name fits. Only if the suffix
/// alone is over the limit does it lose characters, from the right.
fn fit_to_length(segments: &mut Vec<Segment>, constraint: &Constraint, separator_len: usize) {
    let max = constraint.max_length;

    for kind in SHRINK_ORDER {
        while joined_len(segments, separator_len) > max {
            let Some(idx) = segments.iter().position(|s| s.kind == kind) else {
                break;
            };
            let segment = &mut segments[idx];
            segment.text.pop();
            trim_trailing(&mut segment.text, constraint);
            if segment.text.is_empty() {
                segments.remove(idx);
            }
        }
    }

    if joined_len(segments, separator_len) > max {
        if let Some(suffix) = segments.iter_mut().find(|s| s.kind == SegmentKind::Suffix) {
            suffix.text = suffix.text.chars().take(max).collect();
            trim_trailing(&mut suffix.text, constraint);
        }
        segments.retain(|s| !s.text.is_empty());
    }
}
