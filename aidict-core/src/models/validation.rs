//! Validation error types

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Field exceeds maximum length
    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "original word",
            max: 128,
        };
        assert_eq!(
            err.to_string(),
            "original word exceeds maximum length of 128 characters"
        );

        let err = ValidationError::Empty { field: "sender" };
        assert_eq!(err.to_string(), "sender cannot be empty");
    }
}
