//! The predicate expression model
//!
//! An [`Expr`] is an immutable tree describing a predicate. The same tree is
//! both evaluated (see [`evaluate`](crate::evaluate)) and walked by the
//! renderer (see [`render`](crate::render)) to explain a failure, which is
//! why predicates are data here rather than opaque closures.
//!
//! # Example
//!
//! ```rust
//! use plainguard::{Expr, ExprExt};
//!
//! let cost_price = 15;
//! let predicate = Expr::named("CostPrice", cost_price).gt(25);
//!
//! assert!(!plainguard::evaluate_predicate(&predicate).unwrap());
//! assert_eq!(
//!     plainguard::render(&predicate).unwrap(),
//!     "CostPrice : 15 should be greater than 25"
//! );
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::error::EvalError;
use crate::value::{Value, ValueKind};

/// Type name of the reserved null-or-whitespace call.
pub(crate) const STRING_TYPE: &str = "String";
/// Method name of the reserved null-or-whitespace call.
pub(crate) const NULL_OR_WHITESPACE: &str = "IsNullOrWhiteSpace";

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Logical and, both sides evaluated.
    And,
    /// Logical or, both sides evaluated.
    Or,
    /// Logical and, right side skipped when the left is false.
    AndAlso,
    /// Logical or, right side skipped when the left is true.
    OrElse,
    /// Logical exclusive or.
    ExclusiveOr,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterOrEqual,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
}

impl BinaryOp {
    /// Operator name as used in messages and errors.
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::And => "And",
            BinaryOp::Or => "Or",
            BinaryOp::AndAlso => "AndAlso",
            BinaryOp::OrElse => "OrElse",
            BinaryOp::ExclusiveOr => "ExclusiveOr",
            BinaryOp::Equal => "Equal",
            BinaryOp::NotEqual => "NotEqual",
            BinaryOp::LessThan => "LessThan",
            BinaryOp::LessOrEqual => "LessThanOrEqual",
            BinaryOp::GreaterThan => "GreaterThan",
            BinaryOp::GreaterOrEqual => "GreaterThanOrEqual",
            BinaryOp::Add => "Add",
            BinaryOp::Subtract => "Subtract",
            BinaryOp::Multiply => "Multiply",
            BinaryOp::Divide => "Divide",
            BinaryOp::Modulo => "Modulo",
        }
    }

    /// English phrase placed between the two rendered operands.
    ///
    /// Operators without a dedicated phrase fall back to their name
    /// surrounded by spaces.
    ///
    /// ```rust
    /// use plainguard::BinaryOp;
    ///
    /// assert_eq!(BinaryOp::LessOrEqual.phrase(), " should be less than or equal to ");
    /// assert_eq!(BinaryOp::Modulo.phrase(), " Modulo ");
    /// ```
    pub fn phrase(self) -> Cow<'static, str> {
        let phrase = match self {
            BinaryOp::And => " and ",
            BinaryOp::Or => " or ",
            BinaryOp::AndAlso => " and also ",
            BinaryOp::Equal => " should be equal to ",
            BinaryOp::NotEqual => " should not be equal to ",
            BinaryOp::LessThan => " should be less than ",
            BinaryOp::LessOrEqual => " should be less than or equal to ",
            BinaryOp::GreaterThan => " should be greater than ",
            BinaryOp::GreaterOrEqual => " should be greater than or equal to ",
            BinaryOp::Add => " plus ",
            BinaryOp::Subtract => " subtract ",
            BinaryOp::Multiply => " multiply by ",
            BinaryOp::Divide => " divide by ",
            BinaryOp::OrElse | BinaryOp::ExclusiveOr | BinaryOp::Modulo => {
                return Cow::Owned(format!(" {} ", self.name()));
            }
        };
        Cow::Borrowed(phrase)
    }

    /// `Equal` through `GreaterOrEqual`.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::LessThan
                | BinaryOp::LessOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterOrEqual
        )
    }

    /// `And`, `Or`, `AndAlso`, `OrElse`, `ExclusiveOr`.
    pub fn is_logical(self) -> bool {
        matches!(
            self,
            BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::AndAlso
                | BinaryOp::OrElse
                | BinaryOp::ExclusiveOr
        )
    }
}

/// Resolved reader for a member, supplied when the tree is built.
#[derive(Clone)]
pub struct Accessor(Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>);

impl Accessor {
    /// Wrap a reader function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        Accessor(Arc::new(f))
    }

    pub(crate) fn read(&self, target: &Value) -> Option<Value> {
        (self.0)(target)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

/// The function behind a [`Call`] node.
#[derive(Clone)]
pub enum Function {
    /// True when the single argument is null, empty or only whitespace.
    NullOrWhiteSpace,
    /// A caller-supplied pure function of the evaluated arguments.
    Pure(Arc<dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync>),
}

impl Function {
    /// Wrap a pure function.
    pub fn pure<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Function::Pure(Arc::new(f))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::NullOrWhiteSpace => f.write_str("NullOrWhiteSpace"),
            Function::Pure(_) => f.write_str("Pure(..)"),
        }
    }
}

/// A literal with its declared type.
#[derive(Debug, Clone)]
pub struct Constant {
    pub(crate) value: Value,
    pub(crate) kind: ValueKind,
}

impl Constant {
    /// The literal.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The declared type.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

/// A captured value and the name it is reported under.
#[derive(Debug, Clone)]
pub struct NamedValue {
    pub(crate) name: String,
    pub(crate) value: Value,
}

impl NamedValue {
    /// Create a named value. An empty name means no name is available.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        NamedValue {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Display name, possibly empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Captured value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Read of a member off a target expression.
#[derive(Debug, Clone)]
pub struct Member {
    pub(crate) target: Box<Expr>,
    pub(crate) member: String,
    pub(crate) accessor: Option<Accessor>,
}

impl Member {
    /// The expression the member is read from.
    pub fn target(&self) -> &Expr {
        &self.target
    }

    /// Member name.
    pub fn member(&self) -> &str {
        &self.member
    }
}

/// A static field, read without a target object.
#[derive(Debug, Clone)]
pub struct StaticMember {
    pub(crate) field_type: String,
    pub(crate) member: String,
    pub(crate) value: Value,
}

impl StaticMember {
    /// Type of the field, possibly empty.
    pub fn field_type(&self) -> &str {
        &self.field_type
    }

    /// Field name.
    pub fn member(&self) -> &str {
        &self.member
    }

    /// The field's value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// A binary operation.
#[derive(Debug, Clone)]
pub struct Binary {
    pub(crate) op: BinaryOp,
    pub(crate) left: Box<Expr>,
    pub(crate) right: Box<Expr>,
}

impl Binary {
    /// The operator.
    pub fn op(&self) -> BinaryOp {
        self.op
    }

    /// Left operand.
    pub fn left(&self) -> &Expr {
        &self.left
    }

    /// Right operand.
    pub fn right(&self) -> &Expr {
        &self.right
    }
}

/// A pure function call.
#[derive(Debug, Clone)]
pub struct Call {
    pub(crate) type_name: Option<String>,
    pub(crate) method: String,
    pub(crate) args: Vec<Expr>,
    pub(crate) function: Function,
}

impl Call {
    /// Declaring type, if any.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Arguments in call order.
    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    /// Whether this is the reserved "string is null or whitespace" check.
    pub fn is_null_or_whitespace(&self) -> bool {
        self.type_name.as_deref() == Some(STRING_TYPE) && self.method == NULL_OR_WHITESPACE
    }
}

/// A predicate expression.
///
/// The set of variants is closed; build trees with the constructors on
/// `Expr` and the operator methods of [`ExprExt`].
#[derive(Debug, Clone)]
pub enum Expr {
    /// A literal.
    Constant(Constant),
    /// A captured, named value.
    Named(NamedValue),
    /// A member read.
    Member(Member),
    /// A static field read.
    Static(StaticMember),
    /// A binary operation.
    Binary(Binary),
    /// A function call.
    Call(Call),
    /// Logical negation. Transparent in rendered messages.
    Not(Box<Expr>),
}

impl Expr {
    /// A literal whose declared type is the type of the value.
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        let kind = value.kind();
        Expr::Constant(Constant { value, kind })
    }

    /// A literal with an explicit declared type.
    ///
    /// Constants declared as [`ValueKind::Object`] evaluate normally but
    /// render as nothing.
    pub fn typed_constant(value: impl Into<Value>, kind: ValueKind) -> Self {
        Expr::Constant(Constant {
            value: value.into(),
            kind,
        })
    }

    /// The null literal.
    pub fn null() -> Self {
        Expr::Constant(Constant {
            value: Value::Null,
            kind: ValueKind::Null,
        })
    }

    /// A captured value reported as `name`.
    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Expr::Named(NamedValue::new(name, value))
    }

    /// A member read through a resolved accessor.
    ///
    /// The accessor returns `None` when the target has no such member.
    pub fn member<F>(target: Expr, member: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        Expr::Member(Member {
            target: Box::new(target),
            member: member.into(),
            accessor: Some(Accessor::new(accessor)),
        })
    }

    /// A member read looked up by name on a [`Record`](crate::Record).
    pub fn field(target: Expr, member: impl Into<String>) -> Self {
        Expr::Member(Member {
            target: Box::new(target),
            member: member.into(),
            accessor: None,
        })
    }

    /// A static field of type `field_type`, such as a configured limit.
    ///
    /// Renders as `"<field_type> <member> : <value>"`. With an empty
    /// `field_type` only the value is rendered.
    ///
    /// ```rust
    /// use plainguard::{render, Expr, ExprExt};
    ///
    /// let max = Expr::static_member("Int32", "MaxSeats", 8);
    /// assert_eq!(
    ///     render(&Expr::named("Seats", 9).le(max)).unwrap(),
    ///     "Seats : 9 should be less than or equal to Int32 MaxSeats : 8"
    /// );
    /// ```
    pub fn static_member(
        field_type: impl Into<String>,
        member: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Expr::Static(StaticMember {
            field_type: field_type.into(),
            member: member.into(),
            value: value.into(),
        })
    }

    /// A binary operation.
    pub fn binary(op: BinaryOp, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Expr::Binary(Binary {
            op,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        })
    }

    /// A call to a free function.
    pub fn call<F>(method: impl Into<String>, args: Vec<Expr>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Expr::Call(Call {
            type_name: None,
            method: method.into(),
            args,
            function: Function::pure(f),
        })
    }

    /// A call to a function declared on `type_name`.
    pub fn method_call<F>(
        type_name: impl Into<String>,
        method: impl Into<String>,
        args: Vec<Expr>,
        f: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Expr::Call(Call {
            type_name: Some(type_name.into()),
            method: method.into(),
            args,
            function: Function::pure(f),
        })
    }

    /// True when `arg` is null, empty or whitespace only.
    ///
    /// Usually wrapped in [`ExprExt::not`] to require text.
    pub fn is_null_or_whitespace(arg: impl Into<Expr>) -> Self {
        Expr::Call(Call {
            type_name: Some(STRING_TYPE.to_string()),
            method: NULL_OR_WHITESPACE.to_string(),
            args: vec![arg.into()],
            function: Function::NullOrWhiteSpace,
        })
    }

    /// Logical negation of `operand`.
    pub fn negate(operand: impl Into<Expr>) -> Self {
        Expr::Not(Box::new(operand.into()))
    }
}

/// Operator methods for building expressions fluently.
///
/// # Example
///
/// ```rust
/// use plainguard::{Expr, ExprExt};
///
/// let price = Expr::named("Price", 30);
/// let in_range = price.clone().ge(25).and_also(price.le(45));
///
/// assert!(plainguard::evaluate_predicate(&in_range).unwrap());
/// ```
pub trait ExprExt: Into<Expr> + Sized {
    /// `self == rhs`
    fn eq(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Equal, self, rhs)
    }

    /// `self != rhs`
    fn ne(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::NotEqual, self, rhs)
    }

    /// `self < rhs`
    fn lt(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::LessThan, self, rhs)
    }

    /// `self <= rhs`
    fn le(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::LessOrEqual, self, rhs)
    }

    /// `self > rhs`
    fn gt(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::GreaterThan, self, rhs)
    }

    /// `self >= rhs`
    fn ge(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::GreaterOrEqual, self, rhs)
    }

    /// Eager logical and.
    fn and(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::And, self, rhs)
    }

    /// Eager logical or.
    fn or(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Or, self, rhs)
    }

    /// Short-circuit logical and (`&&`).
    fn and_also(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::AndAlso, self, rhs)
    }

    /// Short-circuit logical or (`||`).
    fn or_else(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::OrElse, self, rhs)
    }

    /// Logical exclusive or.
    fn xor(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::ExclusiveOr, self, rhs)
    }

    /// `self + rhs`
    fn add(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Add, self, rhs)
    }

    /// `self - rhs`
    fn sub(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Subtract, self, rhs)
    }

    /// `self * rhs`
    fn mul(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Multiply, self, rhs)
    }

    /// `self / rhs`
    fn div(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Divide, self, rhs)
    }

    /// `self % rhs`
    fn rem(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Modulo, self, rhs)
    }

    /// `!self`
    fn not(self) -> Expr {
        Expr::negate(self)
    }
}

impl ExprExt for Expr {}

impl From<NamedValue> for Expr {
    fn from(named: NamedValue) -> Self {
        Expr::Named(named)
    }
}

macro_rules! impl_constant_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Expr {
                fn from(value: $t) -> Self {
                    Expr::constant(value)
                }
            }
        )*
    };
}

impl_constant_from!(
    Value, bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, Decimal, char, &str, String
);

/// Capture a local variable as a named value, using the variable's own
/// identifier as the display name.
///
/// The variable is cloned into the expression.
///
/// # Example
///
/// ```rust
/// use plainguard::{named, ExprExt};
///
/// let quantity = 0;
/// let predicate = named!(quantity).gt(0);
///
/// assert_eq!(
///     plainguard::render(&predicate).unwrap(),
///     "quantity : 0 should be greater than 0"
/// );
/// ```
#[macro_export]
macro_rules! named {
    ($var:ident) => {
        $crate::Expr::named(stringify!($var), $var.clone())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_table() {
        assert_eq!(BinaryOp::And.phrase(), " and ");
        assert_eq!(BinaryOp::Or.phrase(), " or ");
        assert_eq!(BinaryOp::AndAlso.phrase(), " and also ");
        assert_eq!(BinaryOp::Equal.phrase(), " should be equal to ");
        assert_eq!(BinaryOp::NotEqual.phrase(), " should not be equal to ");
        assert_eq!(BinaryOp::LessThan.phrase(), " should be less than ");
        assert_eq!(BinaryOp::GreaterOrEqual.phrase(), " should be greater than or equal to ");
        assert_eq!(BinaryOp::Add.phrase(), " plus ");
        assert_eq!(BinaryOp::Subtract.phrase(), " subtract ");
        assert_eq!(BinaryOp::Multiply.phrase(), " multiply by ");
        assert_eq!(BinaryOp::Divide.phrase(), " divide by ");
    }

    #[test]
    fn test_fallback_phrase_uses_operator_name() {
        assert_eq!(BinaryOp::OrElse.phrase(), " OrElse ");
        assert_eq!(BinaryOp::ExclusiveOr.phrase(), " ExclusiveOr ");
    }

    #[test]
    fn test_operator_categories() {
        assert!(BinaryOp::LessOrEqual.is_comparison());
        assert!(!BinaryOp::Add.is_comparison());
        assert!(BinaryOp::AndAlso.is_logical());
        assert!(!BinaryOp::Equal.is_logical());
    }

    #[test]
    fn test_constant_kind_follows_value() {
        match Expr::constant(2.5) {
            Expr::Constant(c) => assert_eq!(c.kind(), ValueKind::Float),
            other => panic!("expected constant, got {:?}", other),
        }
        match Expr::null() {
            Expr::Constant(c) => assert!(c.value().is_null()),
            other => panic!("expected constant, got {:?}", other),
        }
    }

    #[test]
    fn test_fluent_builds_binary_tree() {
        let expr = Expr::named("x", 1).lt(2).and_also(Expr::named("y", 3).ne(4));
        match expr {
            Expr::Binary(b) => {
                assert_eq!(b.op(), BinaryOp::AndAlso);
                assert!(matches!(b.left(), Expr::Binary(l) if l.op() == BinaryOp::LessThan));
                assert!(matches!(b.right(), Expr::Binary(r) if r.op() == BinaryOp::NotEqual));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_reserved_call_shape() {
        match Expr::is_null_or_whitespace(Expr::named("Name", None::<String>)) {
            Expr::Call(call) => {
                assert!(call.is_null_or_whitespace());
                assert_eq!(call.args().len(), 1);
            }
            other => panic!("expected call, got {:?}", other),
        }

        match Expr::method_call("String", "Trim", vec![], |_| Ok(Value::Null)) {
            Expr::Call(call) => assert!(!call.is_null_or_whitespace()),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_named_macro_uses_identifier() {
        let total = 12;
        match named!(total) {
            Expr::Named(n) => {
                assert_eq!(n.name(), "total");
                assert_eq!(n.value(), &Value::Int(12));
            }
            other => panic!("expected named value, got {:?}", other),
        }
    }
}
