//! Error types for Coin Critters.

use rust_decimal::Decimal;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// Profile store errors.
///
/// "No profile yet" is not an error; stores report it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// User input errors raised by a single onboarding step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter an amount greater than zero")]
    EmptyOrNonPositive,

    #[error("Amount must be {max} or less")]
    TooLarge { max: Decimal },

    #[error("Unknown pet: {0}")]
    UnknownPet(String),
}

impl ValidationError {
    /// Stable machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyOrNonPositive => "empty_or_non_positive",
            Self::TooLarge { .. } => "too_large",
            Self::UnknownPet(_) => "unknown_pet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn validation_messages_are_user_facing() {
        let err = ValidationError::TooLarge { max: dec!(10000) };
        assert_eq!(err.to_string(), "Amount must be 10000 or less");
        assert_eq!(err.kind(), "too_large");
        assert_eq!(
            ValidationError::EmptyOrNonPositive.kind(),
            "empty_or_non_positive"
        );
    }

    #[test]
    fn io_errors_convert_into_store_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
