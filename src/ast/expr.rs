use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::PrimitiveType;
use crate::visit::ExprVisitor;

/// Value-producing syntax. Results are never returned from `accept`; the
/// visitor carries them on its own result channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Literal(Literal),
    Grouping(Grouping),
    Unary(Unary),
    Binary(Binary),
    Logical(Logical),
    Variable(VariableAccess),
    Assignment(Assignment),
    Call(Call),
}

impl Expr {
    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Expr::Literal(e) => e.accept(visitor),
            Expr::Grouping(e) => e.accept(visitor),
            Expr::Unary(e) => e.accept(visitor),
            Expr::Binary(e) => e.accept(visitor),
            Expr::Logical(e) => e.accept(visitor),
            Expr::Variable(e) => e.accept(visitor),
            Expr::Assignment(e) => e.accept(visitor),
            Expr::Call(e) => e.accept(visitor),
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Expr::Literal(e) => e.line(),
            Expr::Grouping(e) => e.line(),
            Expr::Unary(e) => e.line(),
            Expr::Binary(e) => e.line(),
            Expr::Logical(e) => e.line(),
            Expr::Variable(e) => e.line(),
            Expr::Assignment(e) => e.line(),
            Expr::Call(e) => e.line(),
        }
    }
}

/// A constant written directly in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Integer(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    Null,
}

impl Value {
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Value::Integer(_) => PrimitiveType::Integer,
            Value::Double(_) => PrimitiveType::Double,
            Value::Boolean(_) => PrimitiveType::Boolean,
            Value::String(_) => PrimitiveType::String,
            Value::Null => PrimitiveType::Null,
        }
    }
}

/// Renders as Pulsar source: doubles always carry a decimal point, and
/// non-finite doubles become the division that produces them.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Double(d) if d.is_nan() => f.write_str("(0.0 / 0.0)"),
            Value::Double(d) if d.is_infinite() => {
                f.write_str(if *d > 0.0 { "(1.0 / 0.0)" } else { "(-1.0 / 0.0)" })
            }
            Value::Double(d) => {
                let s = d.to_string();
                f.write_str(&s)?;
                if !s.contains('.') {
                    f.write_str(".0")?;
                }
                Ok(())
            }
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Value::Null => f.write_str("null"),
        }
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    value: Value,
    line: u32,
}

impl Literal {
    pub fn new(value: Value, line: u32) -> Self {
        Self { value, line }
    }

    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_literal_expression(self)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        self.value.primitive_type()
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// A parenthesized expression, kept so printers can reproduce the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grouping {
    expression: Box<Expr>,
    line: u32,
}

impl Grouping {
    pub fn new(expression: Expr, line: u32) -> Self {
        Self { expression: Box::new(expression), line }
    }

    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_grouping_expression(self)
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// A prefix operator applied to a single operand.
///
/// The operator symbol is recorded exactly as written. Which symbols are legal
/// is decided by the parser, and what they mean is decided by each visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unary {
    operator: String,
    operand: Box<Expr>,
    line: u32,
}

impl Unary {
    pub fn new(operator: impl Into<String>, operand: Expr, line: u32) -> Self {
        Self { operator: operator.into(), operand: Box::new(operand), line }
    }

    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_unary_expression(self)
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn operand(&self) -> &Expr {
        &self.operand
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// An infix arithmetic or comparison operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    left: Box<Expr>,
    operator: String,
    right: Box<Expr>,
    line: u32,
}

impl Binary {
    pub fn new(left: Expr, operator: impl Into<String>, right: Expr, line: u32) -> Self {
        Self {
            left: Box::new(left),
            operator: operator.into(),
            right: Box::new(right),
            line,
        }
    }

    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_binary_expression(self)
    }

    pub fn left(&self) -> &Expr {
        &self.left
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn right(&self) -> &Expr {
        &self.right
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// A short-circuiting `&&` / `||` operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logical {
    left: Box<Expr>,
    operator: String,
    right: Box<Expr>,
    line: u32,
}

impl Logical {
    pub fn new(left: Expr, operator: impl Into<String>, right: Expr, line: u32) -> Self {
        Self {
            left: Box::new(left),
            operator: operator.into(),
            right: Box::new(right),
            line,
        }
    }

    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_logical_expression(self)
    }

    pub fn left(&self) -> &Expr {
        &self.left
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn right(&self) -> &Expr {
        &self.right
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableAccess {
    name: String,
    line: u32,
}

impl VariableAccess {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self { name: name.into(), line }
    }

    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_variable_expression(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    name: String,
    value: Box<Expr>,
    line: u32,
}

impl Assignment {
    pub fn new(name: impl Into<String>, value: Expr, line: u32) -> Self {
        Self { name: name.into(), value: Box::new(value), line }
    }

    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_assignment_expression(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Expr {
        &self.value
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// A call of a named function. Arguments are positional and matched against
/// the callee's parameters in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    callee: String,
    arguments: Vec<Expr>,
    line: u32,
}

impl Call {
    pub fn new(callee: impl Into<String>, arguments: Vec<Expr>, line: u32) -> Self {
        Self { callee: callee.into(), arguments, line }
    }

    pub fn accept<V: ExprVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_call_expression(self)
    }

    pub fn callee(&self) -> &str {
        &self.callee
    }

    pub fn arguments(&self) -> &[Expr] {
        &self.arguments
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}
