//! # Plainguard
//!
//! Guard clauses that explain themselves.
//!
//! A guard is a predicate built as an expression tree. When the predicate
//! holds nothing happens. When it fails, the tree is rendered as an English
//! sentence and handed back as the error, so the failure reads like the
//! condition that was written:
//!
//! ```rust
//! use plainguard::prelude::*;
//!
//! let cost_price = 15;
//! let err = guard(&named!(cost_price).gt(25)).unwrap_err();
//! assert_eq!(err.to_string(), "cost_price : 15 should be greater than 25");
//! ```
//!
//! ## Quick Example
//!
//! ```rust
//! use plainguard::prelude::*;
//!
//! fn reserve(seats: i32, name: &str) -> Result<(), GuardError> {
//!     seats.is("Seats").in_range(1, 8)?;
//!     name.is("Name").not_null_or_whitespace()?;
//!     Ok(())
//! }
//!
//! assert!(reserve(2, "Ada").is_ok());
//!
//! let err = reserve(2, " ").unwrap_err();
//! assert_eq!(err.kind(), Some(&ErrorKind::Argument));
//! assert_eq!(err.to_string(), "Name : \" \" should not be null or whitespace ");
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the dynamic values guards operate on
//! - [`expr`]: the expression tree and its builders
//! - [`eval`]: evaluating a tree to a value
//! - [`render`]: rendering a tree as English
//! - [`guard`]: checking predicates and raising violations
//! - [`condition`]: fluent checks on a single named value
//! - [`validation`]: collecting every violation instead of the first
//!
//! ## Features
//!
//! - `tracing`: emit events for passed, violated and broken guards
//! - `serde`: serialize [`Violation`] and [`ErrorKind`]
//! - `proptest`: `Arbitrary` for [`Value`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod condition;
pub mod error;
pub mod eval;
pub mod expr;
pub mod guard;
pub mod render;
pub mod testing;
pub mod validation;
pub mod value;

// Re-exports
pub use condition::{Checks, Condition, IsExt};
pub use error::{ErrorKind, EvalError, GuardError, Violation};
pub use eval::{evaluate, evaluate_predicate};
pub use expr::{
    Accessor, Binary, BinaryOp, Call, Constant, Expr, ExprExt, Function, Member, NamedValue,
    StaticMember,
};
pub use guard::{check_all, guard, guard_as, guard_with, inspect};
pub use render::{render, render_with, RenderContext};
pub use validation::Validation;
pub use value::{Record, Value, ValueKind};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::condition::{Condition, IsExt};
    pub use crate::error::{ErrorKind, GuardError, Violation};
    pub use crate::expr::{Expr, ExprExt};
    pub use crate::guard::{check_all, guard, guard_as, guard_with};
    pub use crate::named;
    pub use crate::validation::Validation;
    pub use crate::value::Value;
}
