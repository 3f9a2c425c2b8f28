//! Error types for umi-core.
//!
//! One unified enum with a variant per failure kind. Every error is
//! surfaced at the call site of the failing getter or setter; nothing is
//! wrapped across components and nothing is retried. Signature
//! verification failure is NOT an error: `verify` returns `false` once
//! it has everything it needs to run the check.

/// Unified error type for all umi-core operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UmiError {
    /// A buffer, string, seed, signature, or name has the wrong length.
    #[error("invalid length: {0}")]
    InvalidLength(String),

    /// A setter received a value that fails its semantic type rule.
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// A numeric value is outside its declared interval.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A field was accessed that the current transaction version lacks.
    #[error("invalid field: {0}")]
    InvalidField(String),

    /// A getter ran before the field was written.
    #[error("field not set: {0}")]
    FieldNotSet(String),

    /// The version field was written twice.
    #[error("field already set: {0}")]
    FieldAlreadySet(String),

    /// Prefix character out of range, wrong length, or reserved bit set.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    /// Mixed case, missing separator, empty prefix, short data, bad
    /// checksum, or bad padding in a Bech32 string.
    #[error("invalid bech32: {0}")]
    InvalidBech32(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_carries_detail() {
        let err = UmiError::InvalidLength("address must be 34 bytes".into());
        assert_eq!(err.to_string(), "invalid length: address must be 34 bytes");

        let err = UmiError::FieldAlreadySet("version".into());
        assert_eq!(err.to_string(), "field already set: version");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UmiError>();
    }

    #[test]
    fn error_is_comparable() {
        assert_eq!(
            UmiError::InvalidPrefix("x".into()),
            UmiError::InvalidPrefix("x".into())
        );
        assert_ne!(
            UmiError::InvalidPrefix("x".into()),
            UmiError::InvalidBech32("x".into())
        );
    }
}
