use serde::{Deserialize, Serialize};

use super::expr::Expr;
use super::types::{Parameter, PrimitiveType};
use crate::visit::{StmtResult, StmtVisitor};

/// Syntax executed for effect. `accept` hands back whatever the visitor
/// produced, type-erased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    Function(FunctionDecl),
    Block(Block),
    Expression(ExpressionStmt),
    If(If),
    Print(Print),
    Variable(Variable),
    While(While),
    Return(Return),
}

impl Stmt {
    pub fn accept<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> StmtResult {
        match self {
            Stmt::Function(s) => s.accept(visitor),
            Stmt::Block(s) => s.accept(visitor),
            Stmt::Expression(s) => s.accept(visitor),
            Stmt::If(s) => s.accept(visitor),
            Stmt::Print(s) => s.accept(visitor),
            Stmt::Variable(s) => s.accept(visitor),
            Stmt::While(s) => s.accept(visitor),
            Stmt::Return(s) => s.accept(visitor),
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Stmt::Function(s) => s.line(),
            Stmt::Block(s) => s.line(),
            Stmt::Expression(s) => s.line(),
            Stmt::If(s) => s.line(),
            Stmt::Print(s) => s.line(),
            Stmt::Variable(s) => s.line(),
            Stmt::While(s) => s.line(),
            Stmt::Return(s) => s.line(),
        }
    }
}

/// A named function declaration.
///
/// Name uniqueness within the enclosing scope is checked by a later pass.
/// The parameter order is significant: call sites match arguments by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    name: String,
    return_type: PrimitiveType,
    parameters: Vec<Parameter>,
    body: Block,
    line: u32,
}

impl FunctionDecl {
    pub fn new(
        name: impl Into<String>,
        return_type: PrimitiveType,
        parameters: Vec<Parameter>,
        body: Block,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters,
            body,
            line,
        }
    }

    pub fn accept<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> StmtResult {
        visitor.visit_function_statement(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> PrimitiveType {
        self.return_type
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Number of parameters. Always derived from the parameter list.
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn body(&self) -> &Block {
        &self.body
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// A braced sequence of statements. Opens a new scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    statements: Vec<Stmt>,
    line: u32,
}

impl Block {
    pub fn new(statements: Vec<Stmt>, line: u32) -> Self {
        Self { statements, line }
    }

    pub fn accept<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> StmtResult {
        visitor.visit_block_statement(self)
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// An expression evaluated for its side effects; the value is discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStmt {
    expression: Expr,
    line: u32,
}

impl ExpressionStmt {
    pub fn new(expression: Expr, line: u32) -> Self {
        Self { expression, line }
    }

    pub fn accept<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> StmtResult {
        visitor.visit_expression_statement(self)
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    condition: Expr,
    then_branch: Box<Stmt>,
    else_branch: Option<Box<Stmt>>,
    line: u32,
}

impl If {
    pub fn new(condition: Expr, then_branch: Stmt, else_branch: Option<Stmt>, line: u32) -> Self {
        Self {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
            line,
        }
    }

    pub fn accept<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> StmtResult {
        visitor.visit_if_statement(self)
    }

    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    pub fn then_branch(&self) -> &Stmt {
        &self.then_branch
    }

    pub fn else_branch(&self) -> Option<&Stmt> {
        self.else_branch.as_deref()
    }

    pub fn has_else(&self) -> bool {
        self.else_branch.is_some()
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Print {
    expression: Expr,
    line: u32,
}

impl Print {
    pub fn new(expression: Expr, line: u32) -> Self {
        Self { expression, line }
    }

    pub fn accept<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> StmtResult {
        visitor.visit_print_statement(self)
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

/// A typed variable declaration, optionally initialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    var_type: PrimitiveType,
    initializer: Option<Expr>,
    line: u32,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        var_type: PrimitiveType,
        initializer: Option<Expr>,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            var_type,
            initializer,
            line,
        }
    }

    pub fn accept<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> StmtResult {
        visitor.visit_variable_statement(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> PrimitiveType {
        self.var_type
    }

    pub fn initializer(&self) -> Option<&Expr> {
        self.initializer.as_ref()
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct While {
    condition: Expr,
    body: Block,
    line: u32,
}

impl While {
    pub fn new(condition: Expr, body: Block, line: u32) -> Self {
        Self { condition, body, line }
    }

    pub fn accept<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> StmtResult {
        visitor.visit_while_statement(self)
    }

    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    pub fn body(&self) -> &Block {
        &self.body
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Return {
    value: Option<Expr>,
    line: u32,
}

impl Return {
    pub fn new(value: Option<Expr>, line: u32) -> Self {
        Self { value, line }
    }

    pub fn accept<V: StmtVisitor + ?Sized>(&self, visitor: &mut V) -> StmtResult {
        visitor.visit_return_statement(self)
    }

    pub fn value(&self) -> Option<&Expr> {
        self.value.as_ref()
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}
