//! Assertion macros for guard tests
//!
//! ```rust
//! use plainguard::{assert_guard_fails, assert_guard_passes, Expr, ExprExt};
//!
//! assert_guard_passes!(Expr::named("Age", 30).ge(18));
//! assert_guard_fails!(
//!     Expr::named("Age", 12).ge(18),
//!     "Age : 12 should be greater than or equal to 18"
//! );
//! ```

/// Assert that a guard expression holds.
///
/// Panics with the rendered message if it does not.
#[macro_export]
macro_rules! assert_guard_passes {
    ($expr:expr) => {
        match $crate::guard(&$expr) {
            Ok(()) => {}
            Err(e) => panic!("Expected guard to pass, got: {}", e),
        }
    };
}

/// Assert that a guard expression fails with exactly this message.
#[macro_export]
macro_rules! assert_guard_fails {
    ($expr:expr, $message:expr) => {
        match $crate::guard(&$expr) {
            Err($crate::GuardError::Violation(v)) => {
                assert_eq!(v.message(), $message);
            }
            other => panic!("Expected violation {:?}, got {:?}", $message, other),
        }
    };
}

/// Assert that a guard result is a violation of `kind` with this message.
///
/// ```rust
/// use plainguard::{assert_violation, guard_as, ErrorKind, Expr, ExprExt};
///
/// let result = guard_as(&Expr::named("Port", 0).gt(0), ErrorKind::ArgumentOutOfRange);
/// assert_violation!(result, ErrorKind::ArgumentOutOfRange, "Port : 0 should be greater than 0");
/// ```
#[macro_export]
macro_rules! assert_violation {
    ($result:expr, $kind:expr, $message:expr) => {
        match $result {
            Err($crate::GuardError::Violation(v)) => {
                assert_eq!(v.kind(), &$kind);
                assert_eq!(v.message(), $message);
            }
            Err(other) => panic!("Expected violation {:?}, got error {:?}", $message, other),
            Ok(_) => panic!("Expected violation {:?}, got success", $message),
        }
    };
}
