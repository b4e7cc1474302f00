//! Error types for classification requests.

use std::time::Duration;

use genrewise_spec::FactError;
use thiserror::Error;

/// A failure while answering one classification request.
///
/// An empty result is not an error; it is reported as
/// [`Outcome::NoMatch`](crate::session::Outcome::NoMatch).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The request's facts could not be assembled.
    #[error("invalid request: {0}")]
    Facts(#[from] FactError),

    /// The request named a preset the rule book does not define.
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    /// Rule evaluation ran past the session's time budget.
    #[error("time budget of {budget:?} exceeded after {evaluated} of {total} rules")]
    TimeBudgetExceeded {
        /// The configured budget.
        budget: Duration,
        /// Rules evaluated before the deadline passed.
        evaluated: usize,
        /// Rules in the rule book.
        total: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_display() {
        let err = QueryError::UnknownPreset("Disco Inferno".to_string());
        assert_eq!(err.to_string(), "unknown preset 'Disco Inferno'");

        let err: QueryError = FactError::UnknownAttribute("mood".to_string()).into();
        assert!(err.to_string().starts_with("invalid request: unknown attribute 'mood'"));

        let err = QueryError::TimeBudgetExceeded {
            budget: Duration::from_millis(5),
            evaluated: 3,
            total: 17,
        };
        assert_eq!(err.to_string(), "time budget of 5ms exceeded after 3 of 17 rules");
    }
}
