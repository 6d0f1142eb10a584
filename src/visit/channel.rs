//! Result channels for expression visitors.
//!
//! `Expr::accept` returns nothing, so an expression pass keeps its results on
//! an operand stack it owns. Visiting a subtree must leave exactly one new
//! value on that stack. `ChannelVisitor::evaluate` visits one subtree, checks
//! that, and hands the value back.
//!
//! ```rust
//! use pulsar::visit::channel::ResultChannel;
//!
//! let mut channel = ResultChannel::new();
//! channel.push(1);
//! channel.push(2);
//! assert_eq!(channel.pop(), Some(2));
//! assert_eq!(channel.depth(), 1);
//! ```

use thiserror::Error;

use crate::ast::Expr;
use crate::visit::ExprVisitor;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The subtree left a net `delta` values instead of exactly one.
    #[error("result channel unbalanced after expression on line {line}: expected 1 value, got {delta}")]
    Unbalanced { line: u32, delta: isize },
}

/// An operand stack owned by one expression visitor.
#[derive(Debug, Clone)]
pub struct ResultChannel<T> {
    stack: Vec<T>,
    /// Pops attempted on an empty stack.
    underflow: usize,
}

impl<T> Default for ResultChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultChannel<T> {
    pub fn new() -> Self {
        Self { stack: Vec::new(), underflow: 0 }
    }

    pub fn push(&mut self, value: T) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Option<T> {
        let value = self.stack.pop();
        if value.is_none() {
            self.underflow += 1;
        }
        value
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Net number of values left behind, counting pops past empty.
    fn delta(&self) -> isize {
        self.stack.len() as isize - self.underflow as isize
    }
}

/// An expression visitor whose results travel on a `ResultChannel`.
pub trait ChannelVisitor: ExprVisitor {
    type Value;

    fn channel(&mut self) -> &mut ResultChannel<Self::Value>;

    /// Visit `expr` and take its single result off the channel.
    ///
    /// The subtree runs on a fresh frame, so it can neither see nor consume
    /// values pushed before the call. Whatever it does, the channel is left
    /// exactly as it was before the visit. If the subtree pushed anything
    /// other than one value (or popped past its own frame) an error is
    /// returned.
    fn evaluate(&mut self, expr: &Expr) -> Result<Self::Value, ChannelError> {
        let outer = std::mem::take(self.channel());
        expr.accept(self);
        let mut frame = std::mem::replace(self.channel(), outer);
        let delta = frame.delta();
        match frame.stack.pop() {
            Some(value) if frame.stack.is_empty() && frame.underflow == 0 => Ok(value),
            _ => Err(ChannelError::Unbalanced { line: expr.line(), delta }),
        }
    }
}
