//! Error taxonomy for plant care tracking
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial taxonomy (invalid argument, tracked context, delivery, store)

/// Errors raised by the care tracker, the store and the reminder scheduler.
#[derive(Debug, thiserror::Error)]
pub enum CareError {
    /// A caller supplied a value the tracker refuses (e.g. a non-positive interval).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A care command was invoked outside of a plant thread.
    #[error("command must be used inside a plant thread")]
    NotInTrackedContext,

    /// Discord could not be reached, or a reminder send failed or timed out.
    #[error("delivery failed: {0}")]
    DeliveryFailure(String),

    /// The persistence layer could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<sqlite::Error> for CareError {
    fn from(err: sqlite::Error) -> Self {
        CareError::StoreUnavailable(err.to_string())
    }
}

/// Convenience result type.
pub type CareResult<T> = std::result::Result<T, CareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CareError::InvalidArgument("days must be positive".to_string());
        assert_eq!(err.to_string(), "invalid argument: days must be positive");

        let err = CareError::NotInTrackedContext;
        assert!(err.to_string().contains("plant thread"));
    }

    #[test]
    fn test_converts_into_anyhow() {
        fn fails() -> anyhow::Result<()> {
            Err(CareError::DeliveryFailure("timed out".to_string()).into())
        }

        let err = fails().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CareError>(),
            Some(CareError::DeliveryFailure(_))
        ));
    }
}
