//! Double-dispatch visitor infrastructure
//!
//! This module defines the two capability sets every pass is written against:
//!
//! - `StmtVisitor`: one method per statement variant, each returning a
//!   type-erased `StmtResult`
//! - `ExprVisitor`: one method per expression variant, returning nothing. The
//!   visitor keeps its own result channel (see `channel`)
//!
//! A node's `accept` calls exactly one of these methods, chosen by the node's
//! concrete kind, and does nothing else. Nodes never store or reference a
//! visitor, so any number of passes can walk the same tree.
//!
//! ## Usage
//!
//! Every method is required. Adding a node variant adds a method here, and the
//! compiler then points at every pass that has to handle it. Inside a method,
//! call the matching `walk_*` function to recurse into children with the
//! default order, or visit children by hand to control the order.
//!
//! ```rust
//! use pulsar::ast::*;
//! use pulsar::visit::{ExprVisitor, walk_binary, walk_unary};
//!
//! struct NameCollector {
//!     names: Vec<String>,
//! }
//!
//! impl ExprVisitor for NameCollector {
//!     fn visit_literal_expression(&mut self, _expr: &Literal) {}
//!     fn visit_grouping_expression(&mut self, expr: &Grouping) {
//!         expr.expression().accept(self);
//!     }
//!     fn visit_unary_expression(&mut self, expr: &Unary) {
//!         walk_unary(self, expr);
//!     }
//!     fn visit_binary_expression(&mut self, expr: &Binary) {
//!         walk_binary(self, expr);
//!     }
//!     fn visit_logical_expression(&mut self, expr: &Logical) {
//!         expr.left().accept(self);
//!         expr.right().accept(self);
//!     }
//!     fn visit_variable_expression(&mut self, expr: &VariableAccess) {
//!         self.names.push(expr.name().to_string());
//!     }
//!     fn visit_assignment_expression(&mut self, expr: &Assignment) {
//!         expr.value().accept(self);
//!     }
//!     fn visit_call_expression(&mut self, expr: &Call) {
//!         for arg in expr.arguments() {
//!             arg.accept(self);
//!         }
//!     }
//! }
//! ```

pub mod channel;
pub mod composers;
pub mod scope_tracker;

use std::any::Any;
use std::fmt;

use crate::ast::*;

// ============================================================================
// Statement results
// ============================================================================

/// The value a statement visit hands back through `accept`.
///
/// Holds any pass-specific value (a checked declaration record, a code handle)
/// or nothing for passes that only have side effects.
#[derive(Default)]
pub struct StmtResult(Option<Box<dyn Any>>);

impl StmtResult {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn new<T: Any>(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Borrow the payload if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_ref().and_then(|value| value.downcast_ref::<T>())
    }

    /// Take the payload out if it is a `T`, otherwise give the result back.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        match self.0 {
            Some(value) => value.downcast::<T>().map(|b| *b).map_err(|v| Self(Some(v))),
            None => Err(Self(None)),
        }
    }
}

impl fmt::Debug for StmtResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(_) => f.write_str("StmtResult(..)"),
            None => f.write_str("StmtResult(empty)"),
        }
    }
}

// ============================================================================
// Visitor traits
// ============================================================================

/// Statement pass. One method per statement variant.
pub trait StmtVisitor {
    fn visit_function_statement(&mut self, stmt: &FunctionDecl) -> StmtResult;
    fn visit_block_statement(&mut self, stmt: &Block) -> StmtResult;
    fn visit_expression_statement(&mut self, stmt: &ExpressionStmt) -> StmtResult;
    fn visit_if_statement(&mut self, stmt: &If) -> StmtResult;
    fn visit_print_statement(&mut self, stmt: &Print) -> StmtResult;
    fn visit_variable_statement(&mut self, stmt: &Variable) -> StmtResult;
    fn visit_while_statement(&mut self, stmt: &While) -> StmtResult;
    fn visit_return_statement(&mut self, stmt: &Return) -> StmtResult;
}

/// Expression pass. One method per expression variant.
///
/// Implementations must leave exactly one net value on their result channel
/// per expression visited, or enclosing expressions read the wrong operands.
pub trait ExprVisitor {
    fn visit_literal_expression(&mut self, expr: &Literal);
    fn visit_grouping_expression(&mut self, expr: &Grouping);
    fn visit_unary_expression(&mut self, expr: &Unary);
    fn visit_binary_expression(&mut self, expr: &Binary);
    fn visit_logical_expression(&mut self, expr: &Logical);
    fn visit_variable_expression(&mut self, expr: &VariableAccess);
    fn visit_assignment_expression(&mut self, expr: &Assignment);
    fn visit_call_expression(&mut self, expr: &Call);
}

// ============================================================================
// Walk functions (statements)
// ============================================================================
//
// Statement results produced while walking are dropped. Passes that need the
// child results iterate the children themselves.

pub fn walk_function<V: StmtVisitor + ?Sized>(v: &mut V, func: &FunctionDecl) {
    func.body().accept(v);
}

pub fn walk_block<V: StmtVisitor + ?Sized>(v: &mut V, block: &Block) {
    for stmt in block.statements() {
        stmt.accept(v);
    }
}

pub fn walk_expression_stmt<V: ExprVisitor + ?Sized>(v: &mut V, stmt: &ExpressionStmt) {
    stmt.expression().accept(v);
}

pub fn walk_if<V: StmtVisitor + ExprVisitor + ?Sized>(v: &mut V, stmt: &If) {
    stmt.condition().accept(v);
    stmt.then_branch().accept(v);
    if let Some(else_branch) = stmt.else_branch() {
        else_branch.accept(v);
    }
}

pub fn walk_print<V: ExprVisitor + ?Sized>(v: &mut V, stmt: &Print) {
    stmt.expression().accept(v);
}

pub fn walk_variable<V: ExprVisitor + ?Sized>(v: &mut V, stmt: &Variable) {
    if let Some(init) = stmt.initializer() {
        init.accept(v);
    }
}

pub fn walk_while<V: StmtVisitor + ExprVisitor + ?Sized>(v: &mut V, stmt: &While) {
    stmt.condition().accept(v);
    stmt.body().accept(v);
}

pub fn walk_return<V: ExprVisitor + ?Sized>(v: &mut V, stmt: &Return) {
    if let Some(value) = stmt.value() {
        value.accept(v);
    }
}

// ============================================================================
// Walk functions (expressions)
// ============================================================================

pub fn walk_grouping<V: ExprVisitor + ?Sized>(v: &mut V, expr: &Grouping) {
    expr.expression().accept(v);
}

pub fn walk_unary<V: ExprVisitor + ?Sized>(v: &mut V, expr: &Unary) {
    expr.operand().accept(v);
}

/// Left operand first, then right.
pub fn walk_binary<V: ExprVisitor + ?Sized>(v: &mut V, expr: &Binary) {
    expr.left().accept(v);
    expr.right().accept(v);
}

pub fn walk_logical<V: ExprVisitor + ?Sized>(v: &mut V, expr: &Logical) {
    expr.left().accept(v);
    expr.right().accept(v);
}

pub fn walk_assignment<V: ExprVisitor + ?Sized>(v: &mut V, expr: &Assignment) {
    expr.value().accept(v);
}

/// Arguments in positional order.
pub fn walk_call<V: ExprVisitor + ?Sized>(v: &mut V, expr: &Call) {
    for arg in expr.arguments() {
        arg.accept(v);
    }
}
