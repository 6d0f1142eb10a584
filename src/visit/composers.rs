//! Composition utilities for common visitor patterns.
//!
//! These helpers cover the find / count / collect passes that would otherwise
//! need a full `StmtVisitor` + `ExprVisitor` implementation each. They run a
//! private walker that visits every statement and expression in source order
//! and feeds them to a closure.
//!
//! ```rust
//! use pulsar::ast::*;
//! use pulsar::visit::composers::{collect_exprs, count_stmts};
//!
//! let stmts = vec![Stmt::Print(Print::new(
//!     Expr::Variable(VariableAccess::new("total", 1)),
//!     1,
//! ))];
//!
//! let names = collect_exprs(&stmts, |e| match e {
//!     Expr::Variable(v) => Some(v.name().to_string()),
//!     _ => None,
//! });
//! assert_eq!(names, vec!["total"]);
//! assert_eq!(count_stmts(&stmts, |s| matches!(s, Stmt::Print(_))), 1);
//! ```

use crate::ast::*;
use crate::visit::{ExprVisitor, StmtResult, StmtVisitor};

// ============================================================================
// Walker
// ============================================================================

/// What the walker does after showing a node to its hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Descend,
    Stop,
}

/// Visits every node, calling the hooks on the enclosing `Stmt` / `Expr`
/// before dispatching into it. It produces no expression results, so it keeps
/// no result channel.
struct Walker<S, E> {
    on_stmt: S,
    on_expr: E,
    stopped: bool,
}

impl<S, E> Walker<S, E>
where
    S: FnMut(&Stmt) -> Flow,
    E: FnMut(&Expr) -> Flow,
{
    fn new(on_stmt: S, on_expr: E) -> Self {
        Self { on_stmt, on_expr, stopped: false }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        if self.stopped {
            return;
        }
        if (self.on_stmt)(stmt) == Flow::Stop {
            self.stopped = true;
            return;
        }
        stmt.accept(self);
    }

    fn expr(&mut self, expr: &Expr) {
        if self.stopped {
            return;
        }
        if (self.on_expr)(expr) == Flow::Stop {
            self.stopped = true;
            return;
        }
        expr.accept(self);
    }

    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }
}

impl<S, E> StmtVisitor for Walker<S, E>
where
    S: FnMut(&Stmt) -> Flow,
    E: FnMut(&Expr) -> Flow,
{
    fn visit_function_statement(&mut self, stmt: &FunctionDecl) -> StmtResult {
        self.stmts(stmt.body().statements());
        StmtResult::empty()
    }

    fn visit_block_statement(&mut self, stmt: &Block) -> StmtResult {
        self.stmts(stmt.statements());
        StmtResult::empty()
    }

    fn visit_expression_statement(&mut self, stmt: &ExpressionStmt) -> StmtResult {
        self.expr(stmt.expression());
        StmtResult::empty()
    }

    fn visit_if_statement(&mut self, stmt: &If) -> StmtResult {
        self.expr(stmt.condition());
        self.stmt(stmt.then_branch());
        if let Some(else_branch) = stmt.else_branch() {
            self.stmt(else_branch);
        }
        StmtResult::empty()
    }

    fn visit_print_statement(&mut self, stmt: &Print) -> StmtResult {
        self.expr(stmt.expression());
        StmtResult::empty()
    }

    fn visit_variable_statement(&mut self, stmt: &Variable) -> StmtResult {
        if let Some(init) = stmt.initializer() {
            self.expr(init);
        }
        StmtResult::empty()
    }

    fn visit_while_statement(&mut self, stmt: &While) -> StmtResult {
        self.expr(stmt.condition());
        self.stmts(stmt.body().statements());
        StmtResult::empty()
    }

    fn visit_return_statement(&mut self, stmt: &Return) -> StmtResult {
        if let Some(value) = stmt.value() {
            self.expr(value);
        }
        StmtResult::empty()
    }
}

impl<S, E> ExprVisitor for Walker<S, E>
where
    S: FnMut(&Stmt) -> Flow,
    E: FnMut(&Expr) -> Flow,
{
    fn visit_literal_expression(&mut self, _expr: &Literal) {}

    fn visit_grouping_expression(&mut self, expr: &Grouping) {
        self.expr(expr.expression());
    }

    fn visit_unary_expression(&mut self, expr: &Unary) {
        self.expr(expr.operand());
    }

    fn visit_binary_expression(&mut self, expr: &Binary) {
        self.expr(expr.left());
        self.expr(expr.right());
    }

    fn visit_logical_expression(&mut self, expr: &Logical) {
        self.expr(expr.left());
        self.expr(expr.right());
    }

    fn visit_variable_expression(&mut self, _expr: &VariableAccess) {}

    fn visit_assignment_expression(&mut self, expr: &Assignment) {
        self.expr(expr.value());
    }

    fn visit_call_expression(&mut self, expr: &Call) {
        for arg in expr.arguments() {
            self.expr(arg);
        }
    }
}

fn descend_stmt(_: &Stmt) -> Flow {
    Flow::Descend
}

fn descend_expr(_: &Expr) -> Flow {
    Flow::Descend
}

// ============================================================================
// Detection / Predicate Helpers
// ============================================================================

/// Check if any expression under `stmts` matches a predicate.
///
/// Short-circuits on the first match.
pub fn contains_expr<F>(stmts: &[Stmt], predicate: F) -> bool
where
    F: Fn(&Expr) -> bool,
{
    let mut found = false;
    let mut walker = Walker::new(descend_stmt, |e: &Expr| {
        if predicate(e) {
            found = true;
            Flow::Stop
        } else {
            Flow::Descend
        }
    });
    walker.stmts(stmts);
    found
}

// ============================================================================
// Counting Helpers
// ============================================================================

/// Count expressions matching a predicate under `stmts`.
pub fn count_exprs<F>(stmts: &[Stmt], predicate: F) -> usize
where
    F: Fn(&Expr) -> bool,
{
    let mut count = 0;
    let mut walker = Walker::new(descend_stmt, |e: &Expr| {
        if predicate(e) {
            count += 1;
        }
        Flow::Descend
    });
    walker.stmts(stmts);
    count
}

/// Count statements matching a predicate under `stmts`, including nested ones.
///
/// Function bodies and `while` bodies are blocks owned by their statement, so
/// only the statements inside them are counted.
pub fn count_stmts<F>(stmts: &[Stmt], predicate: F) -> usize
where
    F: Fn(&Stmt) -> bool,
{
    let mut count = 0;
    let mut walker = Walker::new(
        |s: &Stmt| {
            if predicate(s) {
                count += 1;
            }
            Flow::Descend
        },
        descend_expr,
    );
    walker.stmts(stmts);
    count
}

// ============================================================================
// Collection Helpers
// ============================================================================

/// Collect a value from every expression the mapper accepts, in source order.
pub fn collect_exprs<T, F>(stmts: &[Stmt], mapper: F) -> Vec<T>
where
    F: Fn(&Expr) -> Option<T>,
{
    let mut collected = Vec::new();
    let mut walker = Walker::new(descend_stmt, |e: &Expr| {
        if let Some(value) = mapper(e) {
            collected.push(value);
        }
        Flow::Descend
    });
    walker.stmts(stmts);
    collected
}

/// Collect a value from every statement the mapper accepts, in source order.
pub fn collect_stmts<T, F>(stmts: &[Stmt], mapper: F) -> Vec<T>
where
    F: Fn(&Stmt) -> Option<T>,
{
    let mut collected = Vec::new();
    let mut walker = Walker::new(
        |s: &Stmt| {
            if let Some(value) = mapper(s) {
                collected.push(value);
            }
            Flow::Descend
        },
        descend_expr,
    );
    walker.stmts(stmts);
    collected
}
