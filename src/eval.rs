//! Expression evaluator
//!
//! Reduces an [`Expr`] to a [`Value`]. Evaluation is pure: the tree is only
//! read, so evaluating the same tree twice gives the same answer.
//!
//! Semantics worth knowing:
//!
//! - numbers compare and combine across `Int`, `Decimal` and `Float` by
//!   promoting the narrower side (`Int` → `Decimal` → `Float`);
//! - `null` is equal only to `null`; an ordering comparison with a `null`
//!   operand is simply `false`; arithmetic with a `null` operand is `null`;
//! - `And`, `Or` and `ExclusiveOr` evaluate both operands, `AndAlso` and
//!   `OrElse` skip the right operand when the left decides the result;
//! - dividing by zero is an error for every numeric kind.

use std::cmp::Ordering;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::EvalError;
use crate::expr::{Binary, BinaryOp, Call, Expr, Function, Member};
use crate::value::Value;

/// Evaluate an expression to a value.
///
/// # Example
///
/// ```rust
/// use plainguard::{evaluate, Expr, ExprExt, Value};
///
/// let total = Expr::named("Price", 20).mul(3);
/// assert_eq!(evaluate(&total).unwrap(), Value::Int(60));
/// ```
pub fn evaluate(expr: &Expr) -> Result<Value, EvalError> {
    match expr {
        Expr::Constant(c) => Ok(c.value.clone()),
        Expr::Named(n) => Ok(n.value.clone()),
        Expr::Member(m) => member(m),
        Expr::Static(s) => Ok(s.value.clone()),
        Expr::Binary(b) => binary(b),
        Expr::Call(c) => call(c),
        Expr::Not(operand) => match evaluate(operand)? {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            other => Err(EvalError::unary_mismatch("Not", other.kind())),
        },
    }
}

/// Evaluate an expression that must produce a boolean.
///
/// Fails with [`EvalError::NotBoolean`] otherwise.
///
/// ```rust
/// use plainguard::{evaluate_predicate, EvalError, Expr, ValueKind};
///
/// assert_eq!(evaluate_predicate(&Expr::constant(false)), Ok(false));
/// assert_eq!(
///     evaluate_predicate(&Expr::constant(1)),
///     Err(EvalError::NotBoolean { kind: ValueKind::Int })
/// );
/// ```
pub fn evaluate_predicate(expr: &Expr) -> Result<bool, EvalError> {
    match evaluate(expr)? {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::NotBoolean { kind: other.kind() }),
    }
}

fn member(m: &Member) -> Result<Value, EvalError> {
    let target = evaluate(&m.target)?;
    if target.is_null() {
        return Err(EvalError::NullTarget {
            member: m.member.clone(),
        });
    }

    let found = match (&m.accessor, &target) {
        (Some(accessor), _) => accessor.read(&target),
        (None, Value::Object(record)) => record.field(&m.member),
        (None, _) => None,
    };

    found.ok_or_else(|| EvalError::MemberNotFound {
        member: m.member.clone(),
        type_name: match &target {
            Value::Object(record) => record.type_name().to_string(),
            other => other.kind().to_string(),
        },
    })
}

fn binary(b: &Binary) -> Result<Value, EvalError> {
    match b.op {
        BinaryOp::AndAlso => {
            if !boolean(b.op, &b.left)? {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(boolean(b.op, &b.right)?))
        }
        BinaryOp::OrElse => {
            if boolean(b.op, &b.left)? {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(boolean(b.op, &b.right)?))
        }
        BinaryOp::And | BinaryOp::Or | BinaryOp::ExclusiveOr => {
            let left = evaluate(&b.left)?;
            let right = evaluate(&b.right)?;
            match (&left, &right) {
                (Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(match b.op {
                    BinaryOp::And => *l & *r,
                    BinaryOp::Or => *l | *r,
                    _ => *l ^ *r,
                })),
                _ => Err(EvalError::mismatch(b.op.name(), left.kind(), right.kind())),
            }
        }
        op if op.is_comparison() => {
            let left = evaluate(&b.left)?;
            let right = evaluate(&b.right)?;
            compare(op, &left, &right).map(Value::Bool)
        }
        op => {
            let left = evaluate(&b.left)?;
            let right = evaluate(&b.right)?;
            arithmetic(op, left, right)
        }
    }
}

fn boolean(op: BinaryOp, expr: &Expr) -> Result<bool, EvalError> {
    match evaluate(expr)? {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::unary_mismatch(op.name(), other.kind())),
    }
}

fn call(c: &Call) -> Result<Value, EvalError> {
    let args = c.args.iter().map(evaluate).collect::<Result<Vec<_>, _>>()?;
    match &c.function {
        Function::NullOrWhiteSpace => match args.first() {
            None | Some(Value::Null) => Ok(Value::Bool(true)),
            Some(Value::Str(s)) => Ok(Value::Bool(s.chars().all(char::is_whitespace))),
            Some(other) => Err(EvalError::unary_mismatch("IsNullOrWhiteSpace", other.kind())),
        },
        Function::Pure(f) => f(args.as_slice()),
    }
}

/// Numeric operands after promotion to a common kind.
enum Pair {
    Int(i64, i64),
    Decimal(Decimal, Decimal),
    Float(f64, f64),
}

fn to_decimal(v: &Value) -> Option<Decimal> {
    match v {
        Value::Int(n) => Some(Decimal::from(*n)),
        Value::Decimal(d) => Some(*d),
        _ => None,
    }
}

fn to_float(v: &Value) -> Option<f64> {
    match v {
        Value::Int(n) => Some(*n as f64),
        Value::Decimal(d) => d.to_f64(),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

fn promote(left: &Value, right: &Value) -> Option<Pair> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Some(Pair::Int(*l, *r)),
        (Value::Float(_), _) | (_, Value::Float(_)) => {
            Some(Pair::Float(to_float(left)?, to_float(right)?))
        }
        _ => Some(Pair::Decimal(to_decimal(left)?, to_decimal(right)?)),
    }
}

/// Ordering of two non-null values, `None` when unordered (NaN).
fn ordering(op: BinaryOp, left: &Value, right: &Value) -> Result<Option<Ordering>, EvalError> {
    let mismatch = || EvalError::mismatch(op.name(), left.kind(), right.kind());
    match (left, right) {
        (Value::Str(l), Value::Str(r)) => Ok(Some(l.cmp(r))),
        (Value::Char(l), Value::Char(r)) => Ok(Some(l.cmp(r))),
        (Value::Bool(l), Value::Bool(r)) => Ok(Some(l.cmp(r))),
        _ if left.kind().is_numeric() && right.kind().is_numeric() => {
            match promote(left, right).ok_or_else(mismatch)? {
                Pair::Int(l, r) => Ok(Some(l.cmp(&r))),
                Pair::Decimal(l, r) => Ok(Some(l.cmp(&r))),
                Pair::Float(l, r) => Ok(l.partial_cmp(&r)),
            }
        }
        _ => Err(mismatch()),
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    if left.is_null() || right.is_null() {
        let both = left.is_null() && right.is_null();
        return Ok(match op {
            BinaryOp::Equal => both,
            BinaryOp::NotEqual => !both,
            _ => false,
        });
    }

    if let (BinaryOp::Equal | BinaryOp::NotEqual, Value::Object(_), Value::Object(_)) =
        (op, left, right)
    {
        let equal = left == right;
        return Ok(if op == BinaryOp::Equal { equal } else { !equal });
    }

    let ord = ordering(op, left, right)?;
    Ok(match op {
        BinaryOp::Equal => ord == Some(Ordering::Equal),
        BinaryOp::NotEqual => ord != Some(Ordering::Equal),
        BinaryOp::LessThan => ord == Some(Ordering::Less),
        BinaryOp::LessOrEqual => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        BinaryOp::GreaterThan => ord == Some(Ordering::Greater),
        BinaryOp::GreaterOrEqual => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
        _ => unreachable!("compare called with non-comparison operator"),
    })
}

fn arithmetic(op: BinaryOp, left: Value, right: Value) -> Result<Value, EvalError> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }

    if let (BinaryOp::Add, Value::Str(l), Value::Str(r)) = (op, &left, &right) {
        return Ok(Value::Str(format!("{}{}", l, r)));
    }

    let mismatch = || EvalError::mismatch(op.name(), left.kind(), right.kind());
    if !left.kind().is_numeric() || !right.kind().is_numeric() {
        return Err(mismatch());
    }
    let overflow = EvalError::Overflow {
        operation: op.name(),
    };

    match promote(&left, &right).ok_or_else(mismatch)? {
        Pair::Int(l, r) => {
            if matches!(op, BinaryOp::Divide | BinaryOp::Modulo) && r == 0 {
                return Err(EvalError::DivideByZero);
            }
            let result = match op {
                BinaryOp::Add => l.checked_add(r),
                BinaryOp::Subtract => l.checked_sub(r),
                BinaryOp::Multiply => l.checked_mul(r),
                BinaryOp::Divide => l.checked_div(r),
                _ => l.checked_rem(r),
            };
            result.map(Value::Int).ok_or(overflow)
        }
        Pair::Decimal(l, r) => {
            if matches!(op, BinaryOp::Divide | BinaryOp::Modulo) && r.is_zero() {
                return Err(EvalError::DivideByZero);
            }
            let result = match op {
                BinaryOp::Add => l.checked_add(r),
                BinaryOp::Subtract => l.checked_sub(r),
                BinaryOp::Multiply => l.checked_mul(r),
                BinaryOp::Divide => l.checked_div(r),
                _ => l.checked_rem(r),
            };
            result.map(Value::Decimal).ok_or(overflow)
        }
        Pair::Float(l, r) => {
            if matches!(op, BinaryOp::Divide | BinaryOp::Modulo) && r == 0.0 {
                return Err(EvalError::DivideByZero);
            }
            Ok(Value::Float(match op {
                BinaryOp::Add => l + r,
                BinaryOp::Subtract => l - r,
                BinaryOp::Multiply => l * r,
                BinaryOp::Divide => l / r,
                _ => l % r,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprExt;
    use crate::value::{Record, ValueKind};
    use rust_decimal_macros::dec;

    #[derive(Debug)]
    struct Product {
        price: Decimal,
    }

    impl Record for Product {
        fn type_name(&self) -> &str {
            "Product"
        }

        fn field(&self, name: &str) -> Option<Value> {
            match name {
                "Price" => Some(Value::from(self.price)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_leaves() {
        assert_eq!(evaluate(&Expr::constant(3)), Ok(Value::Int(3)));
        assert_eq!(evaluate(&Expr::null()), Ok(Value::Null));
        assert_eq!(evaluate(&Expr::named("n", "x")), Ok(Value::from("x")));
    }

    #[test]
    fn test_boundaries_are_inclusive_only_for_or_equal() {
        let v = || Expr::named("v", 10);
        assert_eq!(evaluate_predicate(&v().le(10)), Ok(true));
        assert_eq!(evaluate_predicate(&v().ge(10)), Ok(true));
        assert_eq!(evaluate_predicate(&v().lt(10)), Ok(false));
        assert_eq!(evaluate_predicate(&v().gt(10)), Ok(false));
        assert_eq!(evaluate_predicate(&v().eq(10)), Ok(true));
        assert_eq!(evaluate_predicate(&v().ne(10)), Ok(false));
    }

    #[test]
    fn test_numeric_promotion() {
        let d = Expr::named("d", dec!(15.5));
        assert_eq!(evaluate_predicate(&d.clone().gt(15)), Ok(true));
        assert_eq!(evaluate_predicate(&d.clone().lt(15.6)), Ok(true));
        assert_eq!(evaluate(&d.add(1)), Ok(Value::Decimal(dec!(16.5))));
        assert_eq!(
            evaluate(&Expr::constant(1).add(0.5)),
            Ok(Value::Float(1.5))
        );
    }

    #[test]
    fn test_string_and_char_comparison() {
        assert_eq!(evaluate_predicate(&Expr::constant("abc").lt("abd")), Ok(true));
        assert_eq!(evaluate_predicate(&Expr::constant('z').gt('a')), Ok(true));
        assert_eq!(evaluate_predicate(&Expr::constant("a").eq("a")), Ok(true));
    }

    #[test]
    fn test_bool_ordering() {
        assert_eq!(evaluate_predicate(&Expr::constant(false).lt(true)), Ok(true));
        assert_eq!(evaluate_predicate(&Expr::constant(true).le(true)), Ok(true));
        assert_eq!(evaluate_predicate(&Expr::constant(false).gt(true)), Ok(false));
        assert_eq!(evaluate_predicate(&Expr::constant(true).ne(false)), Ok(true));
    }

    #[test]
    fn test_null_comparisons_are_lifted() {
        let missing = || Expr::named("x", None::<i32>);
        assert_eq!(evaluate_predicate(&missing().eq(Expr::null())), Ok(true));
        assert_eq!(evaluate_predicate(&missing().ne(Expr::null())), Ok(false));
        assert_eq!(evaluate_predicate(&missing().ne(5)), Ok(true));
        assert_eq!(evaluate_predicate(&missing().ge(5)), Ok(false));
        assert_eq!(evaluate_predicate(&missing().lt(5)), Ok(false));
        assert_eq!(evaluate(&missing().add(5)), Ok(Value::Null));
    }

    #[test]
    fn test_mismatched_kinds_fail() {
        let err = evaluate(&Expr::constant("15").gt(10)).unwrap_err();
        assert_eq!(
            err,
            EvalError::TypeMismatch {
                operation: "GreaterThan",
                left: ValueKind::Str,
                right: Some(ValueKind::Int),
            }
        );

        assert!(evaluate(&Expr::constant(true).lt(1)).is_err());
        assert!(evaluate(&Expr::constant(1).and(true)).is_err());
        assert!(evaluate(&Expr::constant("a").mul(2)).is_err());
        assert!(evaluate(&Expr::constant(1).not()).is_err());
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(evaluate(&Expr::constant(1).div(0)), Err(EvalError::DivideByZero));
        assert_eq!(evaluate(&Expr::constant(dec!(1)).div(dec!(0))), Err(EvalError::DivideByZero));
        assert_eq!(evaluate(&Expr::constant(1.0).div(0.0)), Err(EvalError::DivideByZero));
        assert_eq!(evaluate(&Expr::constant(7).rem(0)), Err(EvalError::DivideByZero));
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(evaluate(&Expr::constant(7).div(2)), Ok(Value::Int(3)));
        assert_eq!(evaluate(&Expr::constant(7).rem(2)), Ok(Value::Int(1)));
        assert_eq!(evaluate(&Expr::constant(7).sub(9)), Ok(Value::Int(-2)));
        assert_eq!(
            evaluate(&Expr::constant(i64::MAX).add(1)),
            Err(EvalError::Overflow { operation: "Add" })
        );
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            evaluate(&Expr::constant("ab").add("cd")),
            Ok(Value::from("abcd"))
        );
    }

    #[test]
    fn test_short_circuit_skips_right_operand() {
        let broken = Expr::constant(1).div(0).gt(0);
        assert_eq!(
            evaluate_predicate(&Expr::constant(false).and_also(broken.clone())),
            Ok(false)
        );
        assert_eq!(
            evaluate_predicate(&Expr::constant(true).or_else(broken.clone())),
            Ok(true)
        );
        assert_eq!(
            evaluate_predicate(&Expr::constant(false).and(broken)),
            Err(EvalError::DivideByZero)
        );
    }

    #[test]
    fn test_logical_operators() {
        let t = || Expr::constant(true);
        let f = || Expr::constant(false);
        assert_eq!(evaluate_predicate(&t().and(f())), Ok(false));
        assert_eq!(evaluate_predicate(&t().or(f())), Ok(true));
        assert_eq!(evaluate_predicate(&t().xor(t())), Ok(false));
        assert_eq!(evaluate_predicate(&f().or_else(t())), Ok(true));
        assert_eq!(evaluate_predicate(&f().not()), Ok(true));
    }

    #[test]
    fn test_member_lookup() {
        let product = Expr::constant(Value::object(Product { price: dec!(9.99) }));
        assert_eq!(
            evaluate(&Expr::field(product.clone(), "Price")),
            Ok(Value::Decimal(dec!(9.99)))
        );
        assert_eq!(
            evaluate(&Expr::field(product, "Weight")),
            Err(EvalError::MemberNotFound {
                member: "Weight".to_string(),
                type_name: "Product".to_string(),
            })
        );
    }

    #[test]
    fn test_member_accessor() {
        let len = Expr::member(Expr::constant("hello"), "Length", |v| {
            v.as_str().map(|s| Value::from(s.len() as i64))
        });
        assert_eq!(evaluate(&len), Ok(Value::Int(5)));

        let on_int = Expr::member(Expr::constant(3), "Length", |v| {
            v.as_str().map(|s| Value::from(s.len() as i64))
        });
        assert!(matches!(evaluate(&on_int), Err(EvalError::MemberNotFound { .. })));
    }

    #[test]
    fn test_member_of_null_fails() {
        assert_eq!(
            evaluate(&Expr::field(Expr::null(), "Price")),
            Err(EvalError::NullTarget {
                member: "Price".to_string()
            })
        );
    }

    #[test]
    fn test_null_or_whitespace() {
        let check = |v: Value| evaluate_predicate(&Expr::is_null_or_whitespace(Expr::named("s", v)));
        assert_eq!(check(Value::Null), Ok(true));
        assert_eq!(check(Value::from("")), Ok(true));
        assert_eq!(check(Value::from(" \t\n")), Ok(true));
        assert_eq!(check(Value::from(" x ")), Ok(false));
        assert!(check(Value::from(3)).is_err());
    }

    #[test]
    fn test_pure_call() {
        let max = Expr::method_call(
            "Math",
            "Max",
            vec![Expr::constant(3), Expr::constant(8)],
            |args| match args {
                [Value::Int(a), Value::Int(b)] => Ok(Value::Int(*a.max(b))),
                _ => Err(EvalError::unary_mismatch("Max", ValueKind::Null)),
            },
        );
        assert_eq!(evaluate(&max), Ok(Value::Int(8)));
    }

    #[test]
    fn test_not_boolean() {
        assert_eq!(
            evaluate_predicate(&Expr::constant("yes")),
            Err(EvalError::NotBoolean {
                kind: ValueKind::Str
            })
        );
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let expr = Expr::named("CostPrice", dec!(55)).le(dec!(45));
        let first = evaluate(&expr);
        let second = evaluate(&expr);
        assert_eq!(first, second);
        assert_eq!(first, Ok(Value::Bool(false)));
    }
}
