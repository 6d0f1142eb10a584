//! Constant folding over expression trees.
//!
//! Every expression pushes `Some(value)` when it is a compile-time constant
//! and `None` otherwise. Unknown operators, division by zero, overflow and
//! operands of mismatched types all yield `None`.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::ast::*;
use crate::passes::printer::print_expr;
use crate::visit::channel::{ChannelVisitor, ResultChannel};
use crate::visit::{ExprVisitor, StmtResult, StmtVisitor};

/// A statement-level expression that folded to a constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Folded {
    pub line: u32,
    /// The expression as written.
    pub expression: String,
    pub value: Value,
}

impl fmt::Display for Folded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} => {}", self.line, self.expression, self.value)
    }
}

/// Evaluate `expr` if it is constant.
pub fn fold_expr(expr: &Expr) -> Option<Value> {
    let mut folder = ConstantFolder::new();
    folder.value(expr)
}

/// Fold every statement-level expression in `unit`.
///
/// Bare literals are already constant and are not listed.
pub fn fold(unit: &TranslationUnit) -> Vec<Folded> {
    let mut folder = ConstantFolder::new();
    unit.accept_all(&mut folder);
    debug!(folded = folder.folded.len(), "constant folding complete");
    folder.folded
}

#[derive(Default)]
pub struct ConstantFolder {
    folded: Vec<Folded>,
    channel: ResultChannel<Option<Value>>,
}

impl ConstantFolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folded(&self) -> &[Folded] {
        &self.folded
    }

    fn value(&mut self, expr: &Expr) -> Option<Value> {
        match self.evaluate(expr) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "constant folder result channel out of balance");
                None
            }
        }
    }

    /// Fold a statement-level expression and record it if it folded.
    /// Returns how many expressions were recorded (0 or 1).
    fn root(&mut self, expr: &Expr) -> usize {
        let Some(value) = self.value(expr) else { return 0 };
        if matches!(expr, Expr::Literal(_)) {
            return 0;
        }
        trace!(line = expr.line(), %value, "folded expression");
        self.folded.push(Folded { line: expr.line(), expression: print_expr(expr), value });
        1
    }

    fn nested(&mut self, stmt: &Stmt) -> usize {
        stmt.accept(self).downcast::<usize>().unwrap_or(0)
    }

    fn block(&mut self, block: &Block) -> usize {
        block.statements().iter().map(|s| self.nested(s)).sum()
    }
}

impl ChannelVisitor for ConstantFolder {
    type Value = Option<Value>;

    fn channel(&mut self) -> &mut ResultChannel<Option<Value>> {
        &mut self.channel
    }
}

// Statement results carry the number of folded expressions in the subtree.
impl StmtVisitor for ConstantFolder {
    fn visit_function_statement(&mut self, stmt: &FunctionDecl) -> StmtResult {
        StmtResult::new(self.block(stmt.body()))
    }

    fn visit_block_statement(&mut self, stmt: &Block) -> StmtResult {
        StmtResult::new(self.block(stmt))
    }

    fn visit_expression_statement(&mut self, stmt: &ExpressionStmt) -> StmtResult {
        StmtResult::new(self.root(stmt.expression()))
    }

    fn visit_if_statement(&mut self, stmt: &If) -> StmtResult {
        let mut count = self.root(stmt.condition());
        count += self.nested(stmt.then_branch());
        if let Some(else_branch) = stmt.else_branch() {
            count += self.nested(else_branch);
        }
        StmtResult::new(count)
    }

    fn visit_print_statement(&mut self, stmt: &Print) -> StmtResult {
        StmtResult::new(self.root(stmt.expression()))
    }

    fn visit_variable_statement(&mut self, stmt: &Variable) -> StmtResult {
        StmtResult::new(stmt.initializer().map_or(0, |init| self.root(init)))
    }

    fn visit_while_statement(&mut self, stmt: &While) -> StmtResult {
        let count = self.root(stmt.condition()) + self.block(stmt.body());
        StmtResult::new(count)
    }

    fn visit_return_statement(&mut self, stmt: &Return) -> StmtResult {
        StmtResult::new(stmt.value().map_or(0, |value| self.root(value)))
    }
}

impl ExprVisitor for ConstantFolder {
    fn visit_literal_expression(&mut self, expr: &Literal) {
        self.channel.push(Some(expr.value().clone()));
    }

    fn visit_grouping_expression(&mut self, expr: &Grouping) {
        let inner = self.value(expr.expression());
        self.channel.push(inner);
    }

    fn visit_unary_expression(&mut self, expr: &Unary) {
        let operand = self.value(expr.operand());
        let result = operand.and_then(|v| unary(expr.operator(), v));
        self.channel.push(result);
    }

    fn visit_binary_expression(&mut self, expr: &Binary) {
        let left = self.value(expr.left());
        let right = self.value(expr.right());
        let result = match (left, right) {
            (Some(l), Some(r)) => binary(expr.operator(), l, r),
            _ => None,
        };
        self.channel.push(result);
    }

    fn visit_logical_expression(&mut self, expr: &Logical) {
        let left = self.value(expr.left());
        let right = self.value(expr.right());
        let result = match (expr.operator(), left) {
            ("&&", Some(Value::Boolean(false))) => Some(Value::Boolean(false)),
            ("||", Some(Value::Boolean(true))) => Some(Value::Boolean(true)),
            ("&&" | "||", Some(Value::Boolean(_))) => match right {
                Some(Value::Boolean(b)) => Some(Value::Boolean(b)),
                _ => None,
            },
            _ => None,
        };
        self.channel.push(result);
    }

    fn visit_variable_expression(&mut self, _expr: &VariableAccess) {
        self.channel.push(None);
    }

    fn visit_assignment_expression(&mut self, _expr: &Assignment) {
        self.channel.push(None);
    }

    fn visit_call_expression(&mut self, _expr: &Call) {
        self.channel.push(None);
    }
}

// ── Value semantics ─────────────────────────────────────────────────────────

fn unary(op: &str, operand: Value) -> Option<Value> {
    match (op, operand) {
        ("-", Value::Integer(n)) => n.checked_neg().map(Value::Integer),
        ("-", Value::Double(d)) => Some(Value::Double(-d)),
        ("!", Value::Boolean(b)) => Some(Value::Boolean(!b)),
        _ => None,
    }
}

fn binary(op: &str, left: Value, right: Value) -> Option<Value> {
    match op {
        "+" | "-" | "*" | "/" | "%" => arithmetic(op, left, right),
        "==" => same_type(&left, &right).then(|| Value::Boolean(left == right)),
        "!=" => same_type(&left, &right).then(|| Value::Boolean(left != right)),
        "<" | "<=" | ">" | ">=" => {
            let ordering = compare(&left, &right)?;
            let holds = match op {
                "<" => ordering == Ordering::Less,
                "<=" => ordering != Ordering::Greater,
                ">" => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Some(Value::Boolean(holds))
        }
        _ => None,
    }
}

fn arithmetic(op: &str, left: Value, right: Value) -> Option<Value> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            let n = match op {
                "+" => a.checked_add(b),
                "-" => a.checked_sub(b),
                "*" => a.checked_mul(b),
                "/" => a.checked_div(b),
                _ => a.checked_rem(b),
            }?;
            Some(Value::Integer(n))
        }
        (Value::Double(a), Value::Double(b)) => {
            let d = match op {
                "+" => a + b,
                "-" => a - b,
                "*" => a * b,
                "/" if b != 0.0 => a / b,
                "%" if b != 0.0 => a % b,
                _ => return None,
            };
            Some(Value::Double(d))
        }
        (Value::String(a), Value::String(b)) if op == "+" => Some(Value::String(a + &b)),
        _ => None,
    }
}

/// Equality across types is not constant.
fn same_type(left: &Value, right: &Value) -> bool {
    left.primitive_type() == right.primitive_type()
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
