//! Hashing System - SHA-256 Fingerprints for Naming Plans
//!
//! Same names in, same fingerprint out, regardless of map ordering.

use sha2::{Sha256, Digest};
use serde::Serialize;
use serde_json::{Value, to_string};

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(sort_value).collect())
        }
        _ => v.clone()
    }
}

/// Fingerprint of a category -> name mapping.
/// fingerprint = sha256(engine_version + ":" + canonical_names)
pub fn compute_plan_fingerprint<T: Serialize>(names: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(names)?;
    let combined = format!("{}:{}", crate::ENGINE_VERSION, canonical);
    Ok(sha256_hex(combined.as_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"web_app": "b", "key_vault": "a", "subnet": "c"});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"key_vault":"a","subnet":"c","web_app":"b"}"#);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_fingerprint_ignores_key_order() {
        let a = json!({"resource_group": "tf-dev-01", "storage_account": "tfdev01"});
        let b = json!({"storage_account": "tfdev01", "resource_group": "tf-dev-01"});
        assert_eq!(compute_plan_fingerprint(&a).unwrap(), compute_plan_fingerprint(&b).unwrap());
    }

    #[test]
    fn test_fingerprint_changes_with_names() {
        let a = json!({"resource_group": "tf-dev-01"});
        let b = json!({"resource_group": "tf-dev-02"});
        assert_ne!(compute_plan_fingerprint(&a).unwrap(), compute_plan_fingerprint(&b).unwrap());
    }
}
