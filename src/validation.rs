//! Error-accumulating validation results
//!
//! A guard returns on the first failed predicate. When every failure should
//! be reported at once (form input, API payloads), run the guards through
//! [`check_all`](crate::check_all) instead and get a `Validation` holding all
//! violations.
//!
//! # Example
//!
//! ```
//! use plainguard::{check_all, ErrorKind, Expr, ExprExt};
//!
//! let result = check_all([
//!     (Expr::named("Width", 0).gt(0), ErrorKind::ArgumentOutOfRange),
//!     (Expr::named("Height", 0).gt(0), ErrorKind::ArgumentOutOfRange),
//! ])
//! .unwrap();
//!
//! assert!(result.is_failure());
//! assert_eq!(result.errors().map(Vec::len), Some(2));
//! ```

/// Either a success value or accumulated errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T, E> {
    /// Every check passed.
    Success(T),
    /// At least one check failed.
    Failure(E),
}

impl<T, E> Validation<T, E> {
    /// Create a successful validation.
    #[inline]
    pub fn success(value: T) -> Self {
        Validation::Success(value)
    }

    /// Create a failed validation.
    #[inline]
    pub fn failure(error: E) -> Self {
        Validation::Failure(error)
    }

    /// Returns true on success.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Validation::Success(_))
    }

    /// Returns true on failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Validation::Failure(_))
    }

    /// The errors, if this is a failure.
    pub fn errors(&self) -> Option<&E> {
        match self {
            Validation::Success(_) => None,
            Validation::Failure(error) => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        let v = Validation::<i32, Vec<&str>>::success(1);
        assert!(v.is_success());
        assert!(!v.is_failure());
        assert_eq!(v.errors(), None);
    }

    #[test]
    fn test_failure() {
        let v = Validation::<i32, Vec<&str>>::failure(vec!["too small"]);
        assert!(v.is_failure());
        assert_eq!(v.errors(), Some(&vec!["too small"]));
    }
}
