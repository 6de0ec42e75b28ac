//! Explicit outcome of a degradable fetch

/// Outcome of a fetch whose failures degrade to an empty value instead of
/// propagating.
///
/// Both variants carry a usable value, so callers that do not care can call
/// [`Fetched::into_inner`]; callers that do can tell "the source failed" apart
/// from "the source is genuinely empty".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    /// The fetch succeeded
    Complete(T),

    /// The fetch failed and `value` is the fallback
    Degraded {
        /// Fallback value
        value: T,
        /// Why the fetch failed
        reason: String,
    },
}

impl<T> Fetched<T> {
    /// Degraded outcome with the given fallback
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Fetched::Degraded {
            value,
            reason: reason.into(),
        }
    }

    /// True when the fetch failed
    pub fn is_degraded(&self) -> bool {
        matches!(self, Fetched::Degraded { .. })
    }

    /// Failure reason, if degraded
    pub fn reason(&self) -> Option<&str> {
        match self {
            Fetched::Complete(_) => None,
            Fetched::Degraded { reason, .. } => Some(reason),
        }
    }

    /// Borrow the value
    pub fn value(&self) -> &T {
        match self {
            Fetched::Complete(value) | Fetched::Degraded { value, .. } => value,
        }
    }

    /// Take the value, discarding the outcome
    pub fn into_inner(self) -> T {
        match self {
            Fetched::Complete(value) | Fetched::Degraded { value, .. } => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete() {
        let fetched = Fetched::Complete(vec![1, 2]);
        assert!(!fetched.is_degraded());
        assert_eq!(fetched.reason(), None);
        assert_eq!(fetched.into_inner(), vec![1, 2]);
    }

    #[test]
    fn test_degraded() {
        let fetched: Fetched<Vec<u8>> = Fetched::degraded(Vec::new(), "HTTP 500");
        assert!(fetched.is_degraded());
        assert_eq!(fetched.reason(), Some("HTTP 500"));
        assert!(fetched.value().is_empty());
    }
}
