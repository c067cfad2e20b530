//! Fluent guards on a single named value
//!
//! ```rust
//! use plainguard::{ErrorKind, ExprExt, IsExt};
//!
//! fn set_price(price: i64) -> Result<i64, plainguard::GuardError> {
//!     let price = price
//!         .is("Price")
//!         .in_range(1, 100)?
//!         .check(|p| p.ne(13))?
//!         .into_inner();
//!     Ok(price)
//! }
//!
//! assert_eq!(set_price(42), Ok(42));
//!
//! let err = set_price(150).unwrap_err();
//! assert_eq!(err.kind(), Some(&ErrorKind::ArgumentOutOfRange));
//! assert_eq!(
//!     err.to_string(),
//!     "Price : 150 should be greater than or equal to 1 and also Price : 150 should be less than or equal to 100"
//! );
//! ```

use crate::error::{ErrorKind, EvalError, GuardError, Violation};
use crate::expr::{Expr, ExprExt};
use crate::guard::{check_all, guard_as};
use crate::validation::Validation;
use crate::value::Value;

/// A value under guard, with the name it is reported as.
///
/// Every check consumes the condition and hands it back on success so
/// checks chain with `?`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition<T> {
    name: String,
    value: T,
}

impl<T> Condition<T>
where
    T: Clone + Into<Value>,
{
    /// Put `value` under guard as `name`.
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Condition {
            name: name.into(),
            value,
        }
    }

    /// The name used in messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The guarded value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Release the guarded value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// The value as a named expression, the operand every check starts from.
    pub fn subject(&self) -> Expr {
        Expr::named(self.name.clone(), self.value.clone())
    }

    /// Guard a predicate over the subject, failing with [`ErrorKind::Argument`].
    ///
    /// ```rust
    /// use plainguard::{ExprExt, IsExt};
    ///
    /// let err = 7i32.is("Retries").check(|r| r.le(5)).unwrap_err();
    /// assert_eq!(err.to_string(), "Retries : 7 should be less than or equal to 5");
    /// ```
    pub fn check<F>(self, predicate: F) -> Result<Self, GuardError>
    where
        F: FnOnce(Expr) -> Expr,
    {
        self.check_as(ErrorKind::Argument, predicate)
    }

    /// Guard a predicate over the subject, failing with `kind`.
    pub fn check_as<F>(self, kind: ErrorKind, predicate: F) -> Result<Self, GuardError>
    where
        F: FnOnce(Expr) -> Expr,
    {
        guard_as(&predicate(self.subject()), kind)?;
        Ok(self)
    }

    /// Require `min <= value <= max`.
    pub fn in_range(self, min: T, max: T) -> Result<Self, GuardError> {
        self.check_as(ErrorKind::ArgumentOutOfRange, |x| {
            x.clone()
                .ge(Expr::constant(min))
                .and_also(x.le(Expr::constant(max)))
        })
    }

    /// Require the value to be present.
    ///
    /// ```rust
    /// use plainguard::{ErrorKind, IsExt};
    ///
    /// let err = None::<i32>.is("Owner").not_null().unwrap_err();
    /// assert_eq!(err.kind(), Some(&ErrorKind::NullReference));
    /// assert_eq!(err.to_string(), "Owner : null should not be equal to null");
    /// ```
    pub fn not_null(self) -> Result<Self, GuardError> {
        self.check_as(ErrorKind::NullReference, |x| x.ne(Expr::null()))
    }

    /// Require the value to equal `other`.
    pub fn equal_to(self, other: T) -> Result<Self, GuardError> {
        self.check(|x| x.eq(Expr::constant(other)))
    }

    /// Require the value to differ from `other`.
    pub fn not_equal_to(self, other: T) -> Result<Self, GuardError> {
        self.check(|x| x.ne(Expr::constant(other)))
    }

    /// Require text that is not null, empty or whitespace.
    ///
    /// Fails with a type mismatch when the value is not text.
    ///
    /// ```rust
    /// use plainguard::IsExt;
    ///
    /// let err = "   ".is("Name").not_null_or_whitespace().unwrap_err();
    /// assert_eq!(err.to_string(), "Name : \"   \" should not be null or whitespace ");
    /// ```
    pub fn not_null_or_whitespace(self) -> Result<Self, GuardError> {
        self.check(|x| Expr::is_null_or_whitespace(x).not())
    }

    /// Collect several checks and report every violation instead of
    /// stopping at the first.
    ///
    /// ```rust
    /// use plainguard::{ErrorKind, ExprExt, IsExt};
    ///
    /// let result = 0i32
    ///     .is("Quantity")
    ///     .validate()
    ///     .check_as(ErrorKind::ArgumentOutOfRange, |q| q.gt(0))
    ///     .check(|q| q.rem(2).eq(1))
    ///     .finish()
    ///     .unwrap();
    ///
    /// assert_eq!(result.errors().map(Vec::len), Some(2));
    /// ```
    pub fn validate(&self) -> Checks<'_, T> {
        Checks {
            condition: self,
            guards: Vec::new(),
        }
    }
}

/// Checks gathered by [`Condition::validate`].
#[derive(Debug)]
pub struct Checks<'a, T> {
    condition: &'a Condition<T>,
    guards: Vec<(Expr, ErrorKind)>,
}

impl<T> Checks<'_, T>
where
    T: Clone + Into<Value>,
{
    /// Add a check failing with [`ErrorKind::Argument`].
    pub fn check<F>(self, predicate: F) -> Self
    where
        F: FnOnce(Expr) -> Expr,
    {
        self.check_as(ErrorKind::Argument, predicate)
    }

    /// Add a check failing with `kind`.
    pub fn check_as<F>(mut self, kind: ErrorKind, predicate: F) -> Self
    where
        F: FnOnce(Expr) -> Expr,
    {
        let expr = predicate(self.condition.subject());
        self.guards.push((expr, kind));
        self
    }

    /// Run every check.
    pub fn finish(self) -> Result<Validation<(), Vec<Violation>>, EvalError> {
        check_all(self.guards)
    }
}

/// Put any value under guard with `.is(name)`.
pub trait IsExt: Clone + Into<Value> {
    /// Start a [`Condition`] on this value, reported as `name`.
    fn is(self, name: impl Into<String>) -> Condition<Self> {
        Condition::new(name, self)
    }
}

impl<T: Clone + Into<Value>> IsExt for T {}
