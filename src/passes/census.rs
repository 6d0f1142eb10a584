//! Node census: how many of each node kind a tree holds, and how deeply its
//! statements nest.
//!
//! Expressions report their subtree size on a result channel; statements
//! return the size of their whole subtree (statements and expressions) as a
//! `usize` in their `StmtResult`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::ast::*;
use crate::visit::channel::{ChannelVisitor, ResultChannel};
use crate::visit::{ExprVisitor, StmtResult, StmtVisitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Function,
    Block,
    ExpressionStmt,
    If,
    Print,
    Variable,
    While,
    Return,
    Literal,
    Grouping,
    Unary,
    Binary,
    Logical,
    VariableAccess,
    Assignment,
    Call,
}

impl NodeKind {
    pub fn of_stmt(stmt: &Stmt) -> Self {
        match stmt {
            Stmt::Function(_) => NodeKind::Function,
            Stmt::Block(_) => NodeKind::Block,
            Stmt::Expression(_) => NodeKind::ExpressionStmt,
            Stmt::If(_) => NodeKind::If,
            Stmt::Print(_) => NodeKind::Print,
            Stmt::Variable(_) => NodeKind::Variable,
            Stmt::While(_) => NodeKind::While,
            Stmt::Return(_) => NodeKind::Return,
        }
    }

    pub fn of_expr(expr: &Expr) -> Self {
        match expr {
            Expr::Literal(_) => NodeKind::Literal,
            Expr::Grouping(_) => NodeKind::Grouping,
            Expr::Unary(_) => NodeKind::Unary,
            Expr::Binary(_) => NodeKind::Binary,
            Expr::Logical(_) => NodeKind::Logical,
            Expr::Variable(_) => NodeKind::VariableAccess,
            Expr::Assignment(_) => NodeKind::Assignment,
            Expr::Call(_) => NodeKind::Call,
        }
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Function
                | NodeKind::Block
                | NodeKind::ExpressionStmt
                | NodeKind::If
                | NodeKind::Print
                | NodeKind::Variable
                | NodeKind::While
                | NodeKind::Return
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Function => "function",
            NodeKind::Block => "block",
            NodeKind::ExpressionStmt => "expression_stmt",
            NodeKind::If => "if",
            NodeKind::Print => "print",
            NodeKind::Variable => "variable",
            NodeKind::While => "while",
            NodeKind::Return => "return",
            NodeKind::Literal => "literal",
            NodeKind::Grouping => "grouping",
            NodeKind::Unary => "unary",
            NodeKind::Binary => "binary",
            NodeKind::Logical => "logical",
            NodeKind::VariableAccess => "variable_access",
            NodeKind::Assignment => "assignment",
            NodeKind::Call => "call",
        }
    }
}

/// Result of a census run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CensusReport {
    pub counts: BTreeMap<NodeKind, usize>,
    /// Deepest statement nesting; top-level statements are at depth 1.
    pub max_depth: usize,
    /// Largest single expression tree, in nodes.
    pub largest_expression: usize,
}

impl CensusReport {
    pub fn count(&self, kind: NodeKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn statements(&self) -> usize {
        self.counts.iter().filter(|(k, _)| k.is_statement()).map(|(_, n)| n).sum()
    }

    pub fn expressions(&self) -> usize {
        self.counts.iter().filter(|(k, _)| !k.is_statement()).map(|(_, n)| n).sum()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl fmt::Display for CensusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, count) in &self.counts {
            writeln!(f, "{:<16} {count}", kind.name())?;
        }
        writeln!(f, "{:<16} {}", "statements", self.statements())?;
        writeln!(f, "{:<16} {}", "expressions", self.expressions())?;
        write!(f, "{:<16} {}", "max depth", self.max_depth)
    }
}

/// Count every node in `unit`.
pub fn census(unit: &TranslationUnit) -> CensusReport {
    let mut counter = Census::new();
    let sizes = unit.accept_all(&mut counter);
    let total: usize = sizes.into_iter().filter_map(|r| r.downcast::<usize>().ok()).sum();
    let report = counter.finish();
    debug!(total, max_depth = report.max_depth, "census complete");
    report
}

pub struct Census {
    report: CensusReport,
    depth: usize,
    channel: ResultChannel<usize>,
}

impl Default for Census {
    fn default() -> Self {
        Self::new()
    }
}

impl Census {
    pub fn new() -> Self {
        Self { report: CensusReport::default(), depth: 0, channel: ResultChannel::new() }
    }

    pub fn finish(self) -> CensusReport {
        self.report
    }

    fn tally(&mut self, kind: NodeKind) {
        *self.report.counts.entry(kind).or_insert(0) += 1;
    }

    /// Size of a nested expression.
    fn sub(&mut self, expr: &Expr) -> usize {
        match self.evaluate(expr) {
            Ok(size) => size,
            Err(err) => {
                warn!(%err, "census result channel out of balance");
                0
            }
        }
    }

    /// Size of a top-level expression.
    fn root(&mut self, expr: &Expr) -> usize {
        let size = self.sub(expr);
        self.report.largest_expression = self.report.largest_expression.max(size);
        size
    }

    /// Visit a statement one level deeper, returning its subtree size.
    fn nested(&mut self, stmt: &Stmt) -> usize {
        stmt.accept(self).downcast::<usize>().unwrap_or(0)
    }

    /// Enter a statement: count it, track depth, and run `body` to size its
    /// children.
    fn enter(&mut self, kind: NodeKind, body: impl FnOnce(&mut Self) -> usize) -> StmtResult {
        self.tally(kind);
        self.depth += 1;
        self.report.max_depth = self.report.max_depth.max(self.depth);
        let children = body(self);
        self.depth -= 1;
        StmtResult::new(1 + children)
    }

    fn block_children(&mut self, block: &Block) -> usize {
        block.statements().iter().map(|s| self.nested(s)).sum()
    }
}

impl ChannelVisitor for Census {
    type Value = usize;

    fn channel(&mut self) -> &mut ResultChannel<usize> {
        &mut self.channel
    }
}

impl StmtVisitor for Census {
    fn visit_function_statement(&mut self, stmt: &FunctionDecl) -> StmtResult {
        self.enter(NodeKind::Function, |c| c.block_children(stmt.body()))
    }

    fn visit_block_statement(&mut self, stmt: &Block) -> StmtResult {
        self.enter(NodeKind::Block, |c| c.block_children(stmt))
    }

    fn visit_expression_statement(&mut self, stmt: &ExpressionStmt) -> StmtResult {
        self.enter(NodeKind::ExpressionStmt, |c| c.root(stmt.expression()))
    }

    fn visit_if_statement(&mut self, stmt: &If) -> StmtResult {
        self.enter(NodeKind::If, |c| {
            let mut size = c.root(stmt.condition());
            size += c.nested(stmt.then_branch());
            if let Some(else_branch) = stmt.else_branch() {
                size += c.nested(else_branch);
            }
            size
        })
    }

    fn visit_print_statement(&mut self, stmt: &Print) -> StmtResult {
        self.enter(NodeKind::Print, |c| c.root(stmt.expression()))
    }

    fn visit_variable_statement(&mut self, stmt: &Variable) -> StmtResult {
        self.enter(NodeKind::Variable, |c| stmt.initializer().map_or(0, |init| c.root(init)))
    }

    fn visit_while_statement(&mut self, stmt: &While) -> StmtResult {
        self.enter(NodeKind::While, |c| c.root(stmt.condition()) + c.block_children(stmt.body()))
    }

    fn visit_return_statement(&mut self, stmt: &Return) -> StmtResult {
        self.enter(NodeKind::Return, |c| stmt.value().map_or(0, |value| c.root(value)))
    }
}

impl ExprVisitor for Census {
    fn visit_literal_expression(&mut self, _expr: &Literal) {
        self.tally(NodeKind::Literal);
        self.channel.push(1);
    }

    fn visit_grouping_expression(&mut self, expr: &Grouping) {
        self.tally(NodeKind::Grouping);
        let inner = self.sub(expr.expression());
        self.channel.push(1 + inner);
    }

    fn visit_unary_expression(&mut self, expr: &Unary) {
        self.tally(NodeKind::Unary);
        let operand = self.sub(expr.operand());
        self.channel.push(1 + operand);
    }

    fn visit_binary_expression(&mut self, expr: &Binary) {
        self.tally(NodeKind::Binary);
        let size = self.sub(expr.left()) + self.sub(expr.right());
        self.channel.push(1 + size);
    }

    fn visit_logical_expression(&mut self, expr: &Logical) {
        self.tally(NodeKind::Logical);
        let size = self.sub(expr.left()) + self.sub(expr.right());
        self.channel.push(1 + size);
    }

    fn visit_variable_expression(&mut self, _expr: &VariableAccess) {
        self.tally(NodeKind::VariableAccess);
        self.channel.push(1);
    }

    fn visit_assignment_expression(&mut self, expr: &Assignment) {
        self.tally(NodeKind::Assignment);
        let value = self.sub(expr.value());
        self.channel.push(1 + value);
    }

    fn visit_call_expression(&mut self, expr: &Call) {
        self.tally(NodeKind::Call);
        let args: usize = expr.arguments().iter().map(|arg| self.sub(arg)).sum();
        self.channel.push(1 + args);
    }
}
