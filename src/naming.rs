//! Key and value naming for filetable
//!
//! Every record and every index entry lives in a file named by the hash of
//! the value it stands for. The mapping is one-way: a filename cannot be
//! turned back into its key.
//!
//! # Collisions
//!
//! Two distinct keys that hash to the same 64-bit value share one primary
//! file, and the later `put` silently replaces the earlier record. Index
//! files guard against this by storing the base64 of the literal value
//! inside the file, but primary files do not. Callers that need a stronger
//! guarantee must store the key inside the record and check it on read.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Extension used for every file the store writes.
pub const FILE_EXTENSION: &str = "json";

/// Returns the string form a value is coerced to before hashing.
///
/// JSON strings contribute their raw contents; every other value
/// contributes its compact JSON text (`42`, `true`, `null`, `{"a":1}`).
pub fn value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Hashes the string form of `value` to a stable 64-bit integer.
///
/// The first eight bytes of SHA-256, read big-endian. Stable across runs,
/// platforms and builds.
pub fn hash_value(value: &Value) -> u64 {
    hash_str(&value_string(value))
}

/// Hashes a string to a stable 64-bit integer.
pub fn hash_str(s: &str) -> u64 {
    let digest = Sha256::digest(s.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// Lowercase hex rendering of the hash of `value`, without padding.
pub fn hash_hex(value: &Value) -> String {
    format!("{:x}", hash_value(value))
}

/// Filename (`<hex>.json`) that stores `value`'s record or index entry.
pub fn file_name(value: &Value) -> String {
    format!("{}.{}", hash_hex(value), FILE_EXTENSION)
}

/// Base64 of the string form of `value`; the entry key inside index files.
pub fn value64(value: &Value) -> String {
    STANDARD.encode(value_string(value).as_bytes())
}

/// Decodes an index entry key back to the string it was made from.
///
/// Returns `None` if the entry key is not valid base64 or not UTF-8.
pub fn decode_value64(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_is_deterministic() {
        let a = hash_value(&json!("user-1"));
        let b = hash_value(&json!("user-1"));
        assert_eq!(a, b);
        assert_ne!(a, hash_value(&json!("user-2")));
    }

    #[test]
    fn test_string_and_json_forms() {
        assert_eq!(value_string(&json!("open")), "open");
        assert_eq!(value_string(&json!(42)), "42");
        assert_eq!(value_string(&json!(true)), "true");
        assert_eq!(value_string(&json!(null)), "null");
    }

    #[test]
    fn test_number_and_numeric_string_share_a_name() {
        // Both coerce to "7" before hashing.
        assert_eq!(file_name(&json!(7)), file_name(&json!("7")));
    }

    #[test]
    fn test_file_name_is_lowercase_hex() {
        let name = file_name(&json!("key"));
        let stem = name.strip_suffix(".json").unwrap();
        assert!(!stem.is_empty());
        assert!(stem.len() <= 16);
        assert!(stem.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_value64_round_trip_hashes_to_file() {
        let value = json!("closed");
        let decoded = decode_value64(&value64(&value)).unwrap();
        assert_eq!(format!("{:x}", hash_str(&decoded)), hash_hex(&value));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_value64("not base64!").is_none());
    }
}
