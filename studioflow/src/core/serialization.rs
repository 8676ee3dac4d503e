use super::error::{CoreError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Compute a stable fingerprint of serialized bytes.
///
/// Uses SeaHash, which is stable across compiler versions, process restarts
/// and machines. Two snapshots with equal exports always share a
/// fingerprint, so the UI can skip redrawing when nothing changed.
///
/// Not cryptographically secure.
pub fn fingerprint(bytes: &[u8]) -> u64 {
    seahash::hash(bytes)
}

/// Serializes a value to JSON bytes.
///
/// # Errors
/// Returns `CoreError::Serialization` if the value cannot be serialized.
pub fn serialize_value<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(CoreError::Serialization)
}

/// Serializes a value to indented JSON text, the format offered for download.
pub fn serialize_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(CoreError::Serialization)
}

/// Deserializes JSON bytes to a value.
///
/// # Errors
/// Returns `CoreError::Deserialization` if the bytes cannot be deserialized.
pub fn deserialize_value<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(CoreError::Deserialization)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        let some_val: Option<String> = Some("photography".to_string());
        let none_val: Option<String> = None;

        let some_bytes = serialize_value(&some_val).unwrap();
        let none_bytes = serialize_value(&none_val).unwrap();

        assert_ne!(fingerprint(&some_bytes), fingerprint(&none_bytes));

        let some_bytes2 = serialize_value(&some_val).unwrap();
        assert_eq!(fingerprint(&some_bytes), fingerprint(&some_bytes2));
    }

    #[test]
    fn test_deserialize_reports_source() {
        let err = deserialize_value::<Vec<u32>>(b"[1, 2,").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let text = serialize_pretty(&vec![1, 2]).unwrap();
        assert!(text.contains('\n'));
    }
}
