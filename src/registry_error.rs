use thiserror::Error;

/// Errors reported by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum KvoError {
    /// A notification for `key` reached matching observers, but the observable
    /// the registry is bound to has already been dropped.
    #[error("observable released before notifying observers of key `{key}`")]
    ObservableReleased { key: String },

    /// Raw option bits contained flags other than `NEW` and `OLD`.
    #[error("unknown observing option bits: {bits:#b}")]
    UnknownOptionBits { bits: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observable_released_display() {
        let err = KvoError::ObservableReleased {
            key: "value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "observable released before notifying observers of key `value`"
        );
    }

    #[test]
    fn test_unknown_option_bits_display() {
        let err = KvoError::UnknownOptionBits { bits: 0b100 };
        assert_eq!(err.to_string(), "unknown observing option bits: 0b100");
    }

    #[test]
    fn test_error_trait() {
        let err: &dyn std::error::Error = &KvoError::UnknownOptionBits { bits: 8 };
        assert!(err.source().is_none());
    }

    #[test]
    fn test_equality() {
        assert_eq!(
            KvoError::UnknownOptionBits { bits: 4 },
            KvoError::UnknownOptionBits { bits: 4 }
        );
        assert_ne!(
            KvoError::UnknownOptionBits { bits: 4 },
            KvoError::ObservableReleased { key: "a".into() }
        );
    }
}
