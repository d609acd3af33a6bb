//! Routing error definitions.

use thiserror::Error;

use crate::providers::ProviderError;
use crate::routing::pathname::PatternError;

/// Errors surfaced by matchers and the matcher manager.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// A route pattern could not be compiled.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The compiled snapshot and the registered providers disagree.
    /// Indicates a registration that was not followed by a reload.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A locale-aware matcher was queried without locale context.
    #[error("locale-aware route {identity} was matched without locale context")]
    LocaleContract { identity: String },

    /// A provider failed while listing its matchers.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RoutingError::InvariantViolation("expected version 2, found 3".into());
        assert_eq!(err.to_string(), "invariant violation: expected version 2, found 3");

        let err = RoutingError::LocaleContract {
            identity: "/about?__locale=en".into(),
        };
        assert!(err.to_string().contains("/about?__locale=en"));

        let err = RoutingError::from(PatternError::EmptyName("/[]".into()));
        assert!(matches!(err, RoutingError::Pattern(_)));
    }
}
