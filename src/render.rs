//! English rendering of predicate expressions
//!
//! The renderer walks an [`Expr`] in the order it reads (left operand,
//! operator phrase, right operand) and writes a sentence describing it,
//! substituting the runtime values of named operands:
//!
//! ```text
//! CostPrice : 15 should be greater than or equal to 25 and also CostPrice : 15 should be less than or equal to 45
//! ```
//!
//! Member reads and function calls are re-evaluated while rendering so their
//! values can be embedded, which is why rendering can fail with an
//! [`EvalError`].

use crate::error::EvalError;
use crate::eval::evaluate;
use crate::expr::{Binary, Call, Expr, Member, NamedValue, StaticMember};
use crate::value::{Value, ValueKind};

/// The outer name and value a render call runs under.
///
/// A [`NamedValue`] node without its own name is reported under the
/// context name; with a context value set, that value is shown in place of
/// the node's.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    name: String,
    value: Option<Value>,
}

impl RenderContext {
    /// Context with an outer name only.
    pub fn new(name: impl Into<String>) -> Self {
        RenderContext {
            name: name.into(),
            value: None,
        }
    }

    /// Set the outer value.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Context describing a named value.
    pub fn from_named(named: &NamedValue) -> Self {
        RenderContext::new(named.name()).with_value(named.value().clone())
    }

    /// The outer name, possibly empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The outer value, if one was set.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

/// Render an expression with no outer context.
///
/// # Example
///
/// ```rust
/// use plainguard::{render, Expr, ExprExt};
/// use rust_decimal::Decimal;
///
/// let expr = Expr::named("CostPrice", Decimal::from(55)).le(Decimal::from(45));
/// assert_eq!(
///     render(&expr).unwrap(),
///     "CostPrice : 55 should be less than or equal to 45"
/// );
///
/// // A predicate folded down to a single constant has nothing to describe.
/// assert_eq!(render(&Expr::constant(false)).unwrap(), "False");
/// ```
pub fn render(expr: &Expr) -> Result<String, EvalError> {
    render_with(expr, &RenderContext::default())
}

/// Render an expression under an outer name and value.
///
/// ```rust
/// use plainguard::{render_with, Expr, ExprExt, RenderContext};
///
/// let subject = Expr::named("", 3);
/// let ctx = RenderContext::new("Quantity");
/// assert_eq!(
///     render_with(&subject.gt(5), &ctx).unwrap(),
///     "Quantity : 3 should be greater than 5"
/// );
/// ```
pub fn render_with(expr: &Expr, context: &RenderContext) -> Result<String, EvalError> {
    let mut renderer = Renderer {
        out: String::new(),
        context,
    };
    renderer.visit(expr)?;
    Ok(renderer.out)
}

struct Renderer<'a> {
    out: String,
    context: &'a RenderContext,
}

impl Renderer<'_> {
    fn visit(&mut self, expr: &Expr) -> Result<(), EvalError> {
        match expr {
            Expr::Constant(c) => {
                self.constant(&c.value, c.kind);
                Ok(())
            }
            Expr::Named(n) => {
                self.named(n);
                Ok(())
            }
            Expr::Member(m) => self.member(expr, m),
            Expr::Static(s) => {
                self.static_member(s);
                Ok(())
            }
            Expr::Binary(b) => self.binary(b),
            Expr::Call(c) => self.call(expr, c),
            Expr::Not(operand) => self.visit(operand),
        }
    }

    /// Kinds outside the printable set are dropped silently.
    fn constant(&mut self, value: &Value, kind: ValueKind) {
        if value.is_null() {
            self.out.push_str("null");
            return;
        }
        match kind {
            ValueKind::Object => {}
            ValueKind::Str => {
                self.out.push('"');
                self.out.push_str(&value.to_string());
                self.out.push('"');
            }
            _ => self.out.push_str(&value.to_string()),
        }
    }

    fn named(&mut self, n: &NamedValue) {
        let context = self.context;
        let (name, value) = if n.name.is_empty() {
            (context.name.as_str(), context.value.as_ref().unwrap_or(&n.value))
        } else {
            (n.name.as_str(), &n.value)
        };
        if name.is_empty() {
            self.out.push_str(&value.describe());
            return;
        }
        self.out.push_str(name);
        self.out.push_str(" : ");
        self.out.push_str(&value.describe());
    }

    /// Reads off a constant, another member or a static field report their
    /// value; reads off a named value are described by the name alone.
    fn member(&mut self, expr: &Expr, m: &Member) -> Result<(), EvalError> {
        self.visit(&m.target)?;
        if let Expr::Constant(_) | Expr::Member(_) | Expr::Static(_) = *m.target {
            let value = evaluate(expr)?;
            self.out.push_str(&m.member);
            self.out.push_str(" : ");
            self.constant(&value, value.kind());
        }
        Ok(())
    }

    fn static_member(&mut self, s: &StaticMember) {
        if !s.field_type.is_empty() {
            self.out.push_str(&s.field_type);
            self.out.push(' ');
            self.out.push_str(&s.member);
            self.out.push_str(" : ");
        }
        self.out.push_str(&s.value.describe());
    }

    fn binary(&mut self, b: &Binary) -> Result<(), EvalError> {
        self.visit(&b.left)?;
        self.out.push_str(&b.op.phrase());
        self.visit(&b.right)
    }

    fn call(&mut self, expr: &Expr, c: &Call) -> Result<(), EvalError> {
        if c.is_null_or_whitespace() {
            if let Some(arg) = c.args.first() {
                self.visit(arg)?;
            }
            self.out.push_str(" should not be null or whitespace ");
            return Ok(());
        }

        if let Some(type_name) = &c.type_name {
            self.out.push_str(type_name);
            self.out.push(' ');
        }
        self.out.push_str(&c.method);
        self.out.push_str(" (");
        for arg in &c.args {
            self.visit(arg)?;
        }
        let result = evaluate(expr)?;
        self.out.push_str(") returned ");
        self.out.push_str(&result.to_string());
        Ok(())
    }
}
