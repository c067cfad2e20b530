//! Runtime values seen by guard expressions
//!
//! Every leaf of an [`Expr`](crate::Expr) eventually produces a [`Value`]. The
//! domain is deliberately small and closed: the evaluator and the renderer
//! match on it exhaustively.
//!
//! # Example
//!
//! ```rust
//! use plainguard::{Value, ValueKind};
//! use rust_decimal::Decimal;
//!
//! let price = Value::from(Decimal::new(1550, 2));
//! assert_eq!(price.kind(), ValueKind::Decimal);
//! assert_eq!(price.to_string(), "15.50");
//!
//! assert_eq!(Value::from("Alice").describe(), "\"Alice\"");
//! assert_eq!(Value::from(None::<i32>).describe(), "null");
//! assert_eq!(Value::from(true).to_string(), "True");
//! ```

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

/// An object whose fields can be read by name.
///
/// Implement this for domain types that guards drill into with
/// [`Expr::field`](crate::Expr::field).
///
/// # Example
///
/// ```rust
/// use plainguard::{Record, Value};
///
/// #[derive(Debug)]
/// struct Order {
///     quantity: i64,
/// }
///
/// impl Record for Order {
///     fn type_name(&self) -> &str {
///         "Order"
///     }
///
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "quantity" => Some(Value::from(self.quantity)),
///             _ => None,
///         }
///     }
/// }
///
/// let order = Value::object(Order { quantity: 3 });
/// assert_eq!(order.to_string(), "Order");
/// ```
pub trait Record: fmt::Debug + Send + Sync {
    /// Name used when the object itself has to be printed.
    fn type_name(&self) -> &str;

    /// Read a field by name, `None` when the record has no such field.
    fn field(&self, name: &str) -> Option<Value>;
}

/// Declared type of a value or constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The null literal.
    Null,
    /// `bool`.
    Bool,
    /// Signed integers.
    Int,
    /// Arbitrary-precision decimals.
    Decimal,
    /// Binary floating point.
    Float,
    /// A single character.
    Char,
    /// Text.
    Str,
    /// An opaque [`Record`].
    Object,
}

impl ValueKind {
    /// Whether values of this kind take part in arithmetic.
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::Decimal | ValueKind::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Decimal => "decimal",
            ValueKind::Float => "float",
            ValueKind::Char => "char",
            ValueKind::Str => "string",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// A runtime value.
///
/// `Display` gives the plain textual form used inside failure messages:
/// booleans print as `True`/`False`, strings print unquoted, `Null` prints
/// as `null` and objects print their type name. Use [`Value::describe`]
/// for the quoted form.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A decimal, printed with its scale preserved.
    Decimal(Decimal),
    /// A float.
    Float(f64),
    /// A character.
    Char(char),
    /// Text.
    Str(String),
    /// An opaque object with named fields.
    Object(Arc<dyn Record>),
}

impl Value {
    /// Wrap a [`Record`] as an object value.
    pub fn object<R: Record + 'static>(record: R) -> Self {
        Value::Object(Arc::new(record))
    }

    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Float(_) => ValueKind::Float,
            Value::Char(_) => ValueKind::Char,
            Value::Str(_) => ValueKind::Str,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The boolean inside, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The text inside, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form with strings wrapped in double quotes.
    pub fn describe(&self) -> String {
        match self {
            Value::Str(s) => format!("\"{}\"", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Float(x) => write!(f, "{}", x),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => f.write_str(s),
            Value::Object(record) => f.write_str(record.type_name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl<R: Record + 'static> From<Arc<R>> for Value {
    fn from(record: Arc<R>) -> Self {
        Value::Object(record)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for Value {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            (any::<i64>(), 0u32..10).prop_map(|(n, scale)| Value::Decimal(Decimal::new(n, scale))),
            any::<f64>()
                .prop_filter("finite", |x| x.is_finite())
                .prop_map(Value::Float),
            any::<char>().prop_map(Value::Char),
            ".*".prop_map(Value::Str),
        ]
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Invoice {
        total: i64,
    }

    impl Record for Invoice {
        fn type_name(&self) -> &str {
            "Invoice"
        }

        fn field(&self, name: &str) -> Option<Value> {
            (name == "total").then(|| Value::from(self.total))
        }
    }

    #[test]
    fn test_plain_form() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(false).to_string(), "False");
        assert_eq!(Value::from(15).to_string(), "15");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from('x').to_string(), "x");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::object(Invoice { total: 1 }).to_string(), "Invoice");
    }

    #[test]
    fn test_decimal_keeps_scale() {
        assert_eq!(Value::from(Decimal::new(15, 0)).to_string(), "15");
        assert_eq!(Value::from(Decimal::new(1550, 2)).to_string(), "15.50");
    }

    #[test]
    fn test_describe_quotes_strings_only() {
        assert_eq!(Value::from("Bob").describe(), "\"Bob\"");
        assert_eq!(Value::from(42).describe(), "42");
        assert_eq!(Value::Null.describe(), "null");
    }

    #[test]
    fn test_option_maps_none_to_null() {
        assert!(Value::from(None::<String>).is_null());
        assert_eq!(Value::from(Some(7)), Value::Int(7));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::from(1u8).kind(), ValueKind::Int);
        assert_eq!(Value::from(1.0f32).kind(), ValueKind::Float);
        assert_eq!(Value::from(String::new()).kind(), ValueKind::Str);
        assert!(ValueKind::Decimal.is_numeric());
        assert!(!ValueKind::Char.is_numeric());
    }

    #[test]
    fn test_objects_equal_by_identity() {
        let a = Arc::new(Invoice { total: 5 });
        let same = Value::from(a.clone());
        let other = Value::object(Invoice { total: 5 });

        assert_eq!(Value::from(a), same);
        assert_ne!(same, other);
    }

    #[test]
    fn test_mixed_kinds_are_not_equal() {
        assert_ne!(Value::from(1), Value::from(1.0));
        assert_ne!(Value::from("1"), Value::from(1));
    }
}
