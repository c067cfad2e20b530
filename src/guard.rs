//! Guard functions
//!
//! A guard evaluates a predicate expression and, when it is false, renders
//! the expression into an English message and returns it as an error:
//!
//! ```rust
//! use plainguard::{guard, Expr, ExprExt};
//!
//! let cost_price = 15;
//! let err = guard(&Expr::named("CostPrice", cost_price).gt(25)).unwrap_err();
//! assert_eq!(err.to_string(), "CostPrice : 15 should be greater than 25");
//! ```
//!
//! With the `tracing` feature enabled, passing guards emit a `trace` event,
//! violations a `debug` event and evaluation errors a `warn` event.

use crate::error::{ErrorKind, EvalError, GuardError, Violation};
use crate::eval::evaluate_predicate;
use crate::expr::Expr;
use crate::render::{render_with, RenderContext};
use crate::validation::Validation;
use crate::value::Value;

/// Check a predicate, failing with [`ErrorKind::Argument`].
pub fn guard(expr: &Expr) -> Result<(), GuardError> {
    guard_as(expr, ErrorKind::Argument)
}

/// Check a predicate, failing with the given kind.
///
/// ```rust
/// use plainguard::{guard_as, ErrorKind, Expr, ExprExt};
///
/// let err = guard_as(&Expr::named("Quantity", 0).gt(0), ErrorKind::ArgumentOutOfRange)
///     .unwrap_err();
/// assert_eq!(err.kind(), Some(&ErrorKind::ArgumentOutOfRange));
/// ```
pub fn guard_as(expr: &Expr, kind: ErrorKind) -> Result<(), GuardError> {
    guard_with(expr, kind, |kind, message| {
        GuardError::Violation(Violation::new(kind, message))
    })
}

/// Check a predicate, building the failure with a caller-supplied factory.
///
/// The factory receives the kind and the rendered message. Evaluation
/// errors are converted with `From<EvalError>`.
///
/// ```rust
/// use plainguard::{guard_with, ErrorKind, EvalError, Expr, ExprExt};
///
/// #[derive(Debug, PartialEq)]
/// enum AppError {
///     BadInput(String),
///     Bug(EvalError),
/// }
///
/// impl From<EvalError> for AppError {
///     fn from(e: EvalError) -> Self {
///         AppError::Bug(e)
///     }
/// }
///
/// let result = guard_with(
///     &Expr::named("Port", 0).gt(0),
///     ErrorKind::Argument,
///     |_, message| AppError::BadInput(message),
/// );
/// assert_eq!(
///     result,
///     Err(AppError::BadInput("Port : 0 should be greater than 0".to_string()))
/// );
/// ```
pub fn guard_with<E, F>(expr: &Expr, kind: ErrorKind, factory: F) -> Result<(), E>
where
    F: FnOnce(ErrorKind, String) -> E,
    E: From<EvalError>,
{
    match inspect(expr, kind)? {
        None => Ok(()),
        Some(violation) => {
            let (kind, message) = violation.into_parts();
            Err(factory(kind, message))
        }
    }
}

/// Evaluate a predicate and describe its failure without raising it.
///
/// Returns `Ok(None)` when the predicate holds. A violation's message is
/// never empty; a predicate that renders to nothing reports `False`.
pub fn inspect(expr: &Expr, kind: ErrorKind) -> Result<Option<Violation>, EvalError> {
    let passed = match evaluate_predicate(expr) {
        Ok(passed) => passed,
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "guard expression could not be evaluated");
            return Err(e);
        }
    };

    if passed {
        #[cfg(feature = "tracing")]
        tracing::trace!("guard passed");
        return Ok(None);
    }

    let context = match expr {
        Expr::Named(named) => RenderContext::from_named(named),
        _ => RenderContext::default(),
    };
    let mut message = render_with(expr, &context)?;
    if message.is_empty() {
        message = Value::Bool(false).to_string();
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(kind = %kind, rendered = %message, "guard violated");

    Ok(Some(Violation::new(kind, message)))
}

/// Run every guard and collect all violations.
///
/// An expression that cannot be evaluated aborts the whole check.
///
/// ```rust
/// use plainguard::{check_all, ErrorKind, Expr, ExprExt};
///
/// let age = Expr::named("Age", 12);
/// let name = Expr::named("Name", "");
/// let result = check_all([
///     (age.clone().ge(18), ErrorKind::ArgumentOutOfRange),
///     (age.le(130), ErrorKind::ArgumentOutOfRange),
///     (Expr::is_null_or_whitespace(name).not(), ErrorKind::Argument),
/// ])
/// .unwrap();
///
/// let messages: Vec<_> = result.errors().unwrap().iter().map(|v| v.message()).collect();
/// assert_eq!(
///     messages,
///     vec![
///         "Age : 12 should be greater than or equal to 18",
///         "Name : \"\" should not be null or whitespace ",
///     ]
/// );
/// ```
pub fn check_all<I>(guards: I) -> Result<Validation<(), Vec<Violation>>, EvalError>
where
    I: IntoIterator<Item = (Expr, ErrorKind)>,
{
    let mut violations = Vec::new();
    for (expr, kind) in guards {
        if let Some(violation) = inspect(&expr, kind)? {
            violations.push(violation);
        }
    }

    if violations.is_empty() {
        Ok(Validation::success(()))
    } else {
        Ok(Validation::failure(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprExt;
    use crate::value::ValueKind;
    use rust_decimal_macros::dec;

    #[test]
    fn test_passing_guard() {
        assert_eq!(guard(&Expr::named("CostPrice", dec!(30)).gt(dec!(25))), Ok(()));
    }

    #[test]
    fn test_failing_guard_default_kind() {
        let err = guard(&Expr::named("CostPrice", dec!(55)).le(dec!(45))).unwrap_err();
        assert_eq!(
            err,
            GuardError::Violation(Violation::new(
                ErrorKind::Argument,
                "CostPrice : 55 should be less than or equal to 45"
            ))
        );
    }

    #[test]
    fn test_folded_constant_reports_false() {
        let err = guard(&Expr::constant(false)).unwrap_err();
        assert_eq!(err.message(), Some("False"));
    }

    #[test]
    fn test_bare_named_bool_describes_itself() {
        let err = guard(&Expr::named("Enabled", false)).unwrap_err();
        assert_eq!(err.message(), Some("Enabled : False"));
    }

    #[test]
    fn test_message_is_never_empty() {
        let err = guard(&Expr::named("", false)).unwrap_err();
        assert_eq!(err.message(), Some("False"));

        let hidden = Expr::typed_constant(false, ValueKind::Object);
        let err = guard(&hidden).unwrap_err();
        assert_eq!(err.message(), Some("False"));
    }

    #[test]
    fn test_eval_errors_propagate() {
        let err = guard(&Expr::named("Name", "x").gt(3)).unwrap_err();
        assert!(matches!(err, GuardError::Eval(EvalError::TypeMismatch { .. })));

        let err = guard(&Expr::constant(5)).unwrap_err();
        assert!(matches!(err, GuardError::Eval(EvalError::NotBoolean { .. })));
    }

    #[derive(Debug, PartialEq)]
    enum AppError {
        Rejected(String),
        Broken(EvalError),
    }

    impl From<EvalError> for AppError {
        fn from(e: EvalError) -> Self {
            AppError::Broken(e)
        }
    }

    #[test]
    fn test_guard_with_factory_receives_kind() {
        let result = guard_with(
            &Expr::named("Count", 3).eq(4),
            ErrorKind::custom("Inventory"),
            |kind, message| AppError::Rejected(format!("[{}] {}", kind, message)),
        );
        assert_eq!(
            result,
            Err(AppError::Rejected("[Inventory] Count : 3 should be equal to 4".to_string()))
        );
    }

    #[test]
    fn test_guard_with_factory_not_called_on_success() {
        let result = guard_with(&Expr::named("Count", 4).eq(4), ErrorKind::Argument, |_, _| {
            AppError::Rejected("factory must not run for a passing guard".to_string())
        });
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_guard_with_converts_eval_errors() {
        let result = guard_with(
            &Expr::named("Count", "four").eq(4),
            ErrorKind::Argument,
            |_, message| AppError::Rejected(message),
        );
        assert!(matches!(result, Err(AppError::Broken(EvalError::TypeMismatch { .. }))));
    }

    #[test]
    fn test_inspect() {
        assert_eq!(inspect(&Expr::constant(true), ErrorKind::Argument), Ok(None));
        let violation = inspect(&Expr::named("X", 1).gt(2), ErrorKind::NullReference)
            .unwrap()
            .unwrap();
        assert_eq!(violation.kind(), &ErrorKind::NullReference);
        assert_eq!(violation.message(), "X : 1 should be greater than 2");
    }

    #[test]
    fn test_check_all_passes() {
        let result = check_all([
            (Expr::named("A", 1).lt(2), ErrorKind::Argument),
            (Expr::named("B", 2).lt(3), ErrorKind::Argument),
        ]);
        assert_eq!(result, Ok(Validation::success(())));
    }

    #[test]
    fn test_check_all_aborts_on_eval_error() {
        let result = check_all([
            (Expr::named("A", 1).lt(0), ErrorKind::Argument),
            (Expr::constant(1).div(0).gt(0), ErrorKind::Argument),
        ]);
        assert_eq!(result, Err(EvalError::DivideByZero));
    }

    #[cfg(feature = "tracing")]
    mod tracing_tests {
        use super::*;
        use tracing_test::traced_test;

        #[test]
        #[traced_test]
        fn test_violation_is_logged() {
            let _ = guard(&Expr::named("Limit", 9).lt(3));
            assert!(logs_contain("guard violated"));
            assert!(logs_contain("Limit : 9 should be less than 3"));
        }

        #[test]
        #[traced_test]
        fn test_eval_error_is_logged() {
            let _ = guard(&Expr::constant("x").lt(3));
            assert!(logs_contain("could not be evaluated"));
        }
    }
}
