//! Error types for guard evaluation and guard failures
//!
//! Two different things can go wrong when a guard runs:
//!
//! - the predicate is **false**: this is the intended outcome the guard
//!   exists to report, surfaced as a [`Violation`] carrying the rendered
//!   message and an [`ErrorKind`];
//! - the expression itself is **ill-formed** (comparing a string to a number,
//!   reading a missing field, dividing by zero): an [`EvalError`], which is a
//!   programming mistake and is never retried.
//!
//! [`GuardError`] is the union of both.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use crate::value::ValueKind;

/// Errors raised while evaluating or rendering an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// An operator was applied to values it does not support.
    TypeMismatch {
        /// Name of the operator or function.
        operation: &'static str,
        /// Kind of the left (or only) operand.
        left: ValueKind,
        /// Kind of the right operand, for binary operators.
        right: Option<ValueKind>,
    },
    /// The evaluated target has no member with this name.
    MemberNotFound {
        /// Requested member.
        member: String,
        /// Type of the target that was searched.
        type_name: String,
    },
    /// A member was read off a null target.
    NullTarget {
        /// Requested member.
        member: String,
    },
    /// Division or remainder by zero.
    DivideByZero,
    /// Integer or decimal arithmetic overflowed.
    Overflow {
        /// Name of the operator.
        operation: &'static str,
    },
    /// The outermost expression did not produce a boolean.
    NotBoolean {
        /// What it produced instead.
        kind: ValueKind,
    },
}

impl EvalError {
    pub(crate) fn mismatch(operation: &'static str, left: ValueKind, right: ValueKind) -> Self {
        EvalError::TypeMismatch {
            operation,
            left,
            right: Some(right),
        }
    }

    pub(crate) fn unary_mismatch(operation: &'static str, operand: ValueKind) -> Self {
        EvalError::TypeMismatch {
            operation,
            left: operand,
            right: None,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::TypeMismatch {
                operation,
                left,
                right: Some(right),
            } => write!(f, "type mismatch: cannot apply {} to {} and {}", operation, left, right),
            EvalError::TypeMismatch {
                operation,
                left,
                right: None,
            } => write!(f, "type mismatch: cannot apply {} to {}", operation, left),
            EvalError::MemberNotFound { member, type_name } => {
                write!(f, "member `{}` not found on {}", member, type_name)
            }
            EvalError::NullTarget { member } => {
                write!(f, "cannot read member `{}` of null", member)
            }
            EvalError::DivideByZero => f.write_str("attempted to divide by zero"),
            EvalError::Overflow { operation } => write!(f, "arithmetic overflow in {}", operation),
            EvalError::NotBoolean { kind } => {
                write!(f, "guard expression must evaluate to bool, got {}", kind)
            }
        }
    }
}

impl StdError for EvalError {}

/// Category of a guard failure.
///
/// The default is [`ErrorKind::Argument`]. Callers that need their own
/// category use [`ErrorKind::custom`].
///
/// # Example
///
/// ```rust
/// use plainguard::ErrorKind;
///
/// assert_eq!(ErrorKind::default(), ErrorKind::Argument);
/// assert_eq!(ErrorKind::custom("Pricing").as_str(), "Pricing");
/// assert_eq!(ErrorKind::ArgumentOutOfRange.to_string(), "ArgumentOutOfRange");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// An argument failed its precondition.
    #[default]
    Argument,
    /// An argument fell outside its allowed range.
    ArgumentOutOfRange,
    /// A required value was null.
    NullReference,
    /// A caller-defined category.
    Custom(Cow<'static, str>),
}

impl ErrorKind {
    /// Create a caller-defined kind.
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        ErrorKind::Custom(name.into())
    }

    /// Name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::Argument => "Argument",
            ErrorKind::ArgumentOutOfRange => "ArgumentOutOfRange",
            ErrorKind::NullReference => "NullReference",
            ErrorKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed guard: its kind and the rendered English message.
///
/// `Display` prints the message verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Violation {
    kind: ErrorKind,
    message: String,
}

impl Violation {
    /// Create a violation.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Violation {
            kind,
            message: message.into(),
        }
    }

    /// The failure category.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The rendered message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Split into kind and message.
    pub fn into_parts(self) -> (ErrorKind, String) {
        (self.kind, self.message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Violation {}

/// Error returned by the guard functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// The predicate evaluated to false.
    Violation(Violation),
    /// The predicate could not be evaluated.
    Eval(EvalError),
}

impl GuardError {
    /// Returns true if the predicate was false.
    pub fn is_violation(&self) -> bool {
        matches!(self, GuardError::Violation(_))
    }

    /// The violation, if the predicate was false.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            GuardError::Violation(v) => Some(v),
            GuardError::Eval(_) => None,
        }
    }

    /// Consume into the violation, if the predicate was false.
    pub fn into_violation(self) -> Option<Violation> {
        match self {
            GuardError::Violation(v) => Some(v),
            GuardError::Eval(_) => None,
        }
    }

    /// The rendered message, if the predicate was false.
    pub fn message(&self) -> Option<&str> {
        self.violation().map(Violation::message)
    }

    /// The failure kind, if the predicate was false.
    pub fn kind(&self) -> Option<&ErrorKind> {
        self.violation().map(Violation::kind)
    }
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardError::Violation(v) => write!(f, "{}", v),
            GuardError::Eval(e) => write!(f, "guard could not be evaluated: {}", e),
        }
    }
}

impl StdError for GuardError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            GuardError::Violation(_) => None,
            GuardError::Eval(e) => Some(e),
        }
    }
}

impl From<EvalError> for GuardError {
    fn from(e: EvalError) -> Self {
        GuardError::Eval(e)
    }
}

impl From<Violation> for GuardError {
    fn from(v: Violation) -> Self {
        GuardError::Violation(v)
    }
}
