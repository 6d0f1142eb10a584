//! Declaration checking: every name used is declared somewhere visible.
//!
//! Each scope is checked in two phases. First the functions declared directly
//! in the scope are registered, so calls may refer to functions declared later
//! in the same block. Then the statements are visited in order; variables are
//! only visible after their declaration.

use tracing::{debug, warn};

use crate::ast::*;
use crate::config::CheckConfig;
use crate::diagnostics::Diagnostic;
use crate::visit::channel::{ChannelVisitor, ResultChannel};
use crate::visit::scope_tracker::ScopeTracker;
use crate::visit::{ExprVisitor, StmtResult, StmtVisitor};

/// What `visit_function_statement` hands back for each function it checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedFunction {
    pub name: String,
    pub arity: usize,
    pub return_type: PrimitiveType,
    pub line: u32,
    /// Diagnostics reported inside this function, nested functions included.
    pub errors: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub functions: Vec<CheckedFunction>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Check every declaration and use in `unit`.
pub fn check(unit: &TranslationUnit, config: CheckConfig) -> CheckReport {
    let mut checker = DeclarationChecker::new(config);
    checker.register_functions(unit.statements());
    let functions = unit
        .accept_all(&mut checker)
        .into_iter()
        .filter_map(|r| r.downcast::<CheckedFunction>().ok())
        .collect::<Vec<_>>();
    debug!(
        functions = functions.len(),
        errors = checker.diagnostics().len(),
        "declaration check complete"
    );
    CheckReport { functions, diagnostics: checker.into_diagnostics() }
}

#[derive(Debug, Clone, Copy)]
struct FunctionSig {
    arity: usize,
    line: u32,
}

pub struct DeclarationChecker {
    config: CheckConfig,
    functions: ScopeTracker<FunctionSig>,
    /// Declared type of each visible variable.
    variables: ScopeTracker<PrimitiveType>,
    /// Nesting of function bodies currently being checked.
    function_depth: usize,
    diagnostics: Vec<Diagnostic>,
    channel: ResultChannel<()>,
}

impl DeclarationChecker {
    pub fn new(config: CheckConfig) -> Self {
        Self {
            config,
            functions: ScopeTracker::new(),
            variables: ScopeTracker::new(),
            function_depth: 0,
            diagnostics: Vec::new(),
            channel: ResultChannel::new(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn error(&mut self, diag: Diagnostic) {
        debug!(line = diag.line, message = %diag.message, "declaration error");
        self.diagnostics.push(diag);
    }

    /// Phase one: register the functions declared directly in `stmts`.
    pub fn register_functions(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            let Stmt::Function(func) = stmt else { continue };
            let sig = FunctionSig { arity: func.arity(), line: func.line() };
            if let Err(first) = self.functions.declare(func.name(), sig) {
                let first_line = first.line;
                self.error(
                    Diagnostic::error(format!("duplicate function '{}' in this scope", func.name()), func.line())
                        .with_note(format!("'{}' first declared here", func.name()), first_line),
                );
            }
        }
    }

    fn push_scope(&mut self) {
        self.functions.push_scope();
        self.variables.push_scope();
    }

    fn pop_scope(&mut self) {
        self.functions.pop_scope();
        self.variables.pop_scope();
    }

    /// Check `stmts` in a fresh scope.
    fn scoped(&mut self, stmts: &[Stmt]) {
        self.push_scope();
        self.register_functions(stmts);
        for stmt in stmts {
            stmt.accept(self);
        }
        self.pop_scope();
    }

    /// Check a branch or loop body. A lone statement gets its own scope too.
    fn branch(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.scoped(block.statements()),
            other => self.scoped(std::slice::from_ref(other)),
        }
    }

    fn expr(&mut self, expr: &Expr) {
        if let Err(err) = self.evaluate(expr) {
            warn!(%err, "declaration checker result channel out of balance");
        }
    }
}

impl ChannelVisitor for DeclarationChecker {
    type Value = ();

    fn channel(&mut self) -> &mut ResultChannel<()> {
        &mut self.channel
    }
}

impl StmtVisitor for DeclarationChecker {
    fn visit_function_statement(&mut self, stmt: &FunctionDecl) -> StmtResult {
        let errors_before = self.diagnostics.len();

        if stmt.arity() > self.config.max_parameters {
            self.error(Diagnostic::error(
                format!(
                    "function '{}' has {} parameters; at most {} are allowed",
                    stmt.name(),
                    stmt.arity(),
                    self.config.max_parameters
                ),
                stmt.line(),
            ));
        }

        self.push_scope();
        for param in stmt.parameters() {
            if self.variables.declare(param.name(), param.param_type()).is_err() {
                self.error(Diagnostic::error(
                    format!("duplicate parameter '{}' in function '{}'", param.name(), stmt.name()),
                    param.line(),
                ));
            }
        }

        self.function_depth += 1;
        self.scoped(stmt.body().statements());
        self.function_depth -= 1;
        self.pop_scope();

        StmtResult::new(CheckedFunction {
            name: stmt.name().to_string(),
            arity: stmt.arity(),
            return_type: stmt.return_type(),
            line: stmt.line(),
            errors: self.diagnostics.len() - errors_before,
        })
    }

    fn visit_block_statement(&mut self, stmt: &Block) -> StmtResult {
        self.scoped(stmt.statements());
        StmtResult::empty()
    }

    fn visit_expression_statement(&mut self, stmt: &ExpressionStmt) -> StmtResult {
        self.expr(stmt.expression());
        StmtResult::empty()
    }

    fn visit_if_statement(&mut self, stmt: &If) -> StmtResult {
        self.expr(stmt.condition());
        self.branch(stmt.then_branch());
        if let Some(else_branch) = stmt.else_branch() {
            self.branch(else_branch);
        }
        StmtResult::empty()
    }

    fn visit_print_statement(&mut self, stmt: &Print) -> StmtResult {
        self.expr(stmt.expression());
        StmtResult::empty()
    }

    fn visit_variable_statement(&mut self, stmt: &Variable) -> StmtResult {
        // The initializer cannot see the variable it initializes.
        if let Some(init) = stmt.initializer() {
            self.expr(init);
        }
        // Redeclaring in the same scope keeps the first binding.
        let _ = self.variables.declare(stmt.name(), stmt.var_type());
        StmtResult::empty()
    }

    fn visit_while_statement(&mut self, stmt: &While) -> StmtResult {
        self.expr(stmt.condition());
        self.scoped(stmt.body().statements());
        StmtResult::empty()
    }

    fn visit_return_statement(&mut self, stmt: &Return) -> StmtResult {
        if self.function_depth == 0 {
            self.error(Diagnostic::error("'return' outside of a function", stmt.line()));
        }
        if let Some(value) = stmt.value() {
            self.expr(value);
        }
        StmtResult::empty()
    }
}

impl ExprVisitor for DeclarationChecker {
    fn visit_literal_expression(&mut self, _expr: &Literal) {
        self.channel.push(());
    }

    fn visit_grouping_expression(&mut self, expr: &Grouping) {
        self.expr(expr.expression());
        self.channel.push(());
    }

    fn visit_unary_expression(&mut self, expr: &Unary) {
        self.expr(expr.operand());
        self.channel.push(());
    }

    fn visit_binary_expression(&mut self, expr: &Binary) {
        self.expr(expr.left());
        self.expr(expr.right());
        self.channel.push(());
    }

    fn visit_logical_expression(&mut self, expr: &Logical) {
        self.expr(expr.left());
        self.expr(expr.right());
        self.channel.push(());
    }

    fn visit_variable_expression(&mut self, expr: &VariableAccess) {
        if !self.variables.contains(expr.name()) {
            self.error(Diagnostic::error(format!("undefined variable '{}'", expr.name()), expr.line()));
        }
        self.channel.push(());
    }

    fn visit_assignment_expression(&mut self, expr: &Assignment) {
        self.expr(expr.value());
        if !self.variables.contains(expr.name()) {
            self.error(Diagnostic::error(
                format!("assignment to undeclared variable '{}'", expr.name()),
                expr.line(),
            ));
        }
        self.channel.push(());
    }

    fn visit_call_expression(&mut self, expr: &Call) {
        for arg in expr.arguments() {
            self.expr(arg);
        }
        match self.functions.lookup(expr.callee()).copied() {
            None => {
                self.error(Diagnostic::error(format!("call to unknown function '{}'", expr.callee()), expr.line()));
            }
            Some(sig) if sig.arity != expr.argument_count() => {
                self.error(
                    Diagnostic::error(
                        format!(
                            "function '{}' expects {} argument(s), got {}",
                            expr.callee(),
                            sig.arity,
                            expr.argument_count()
                        ),
                        expr.line(),
                    )
                    .with_note(format!("'{}' declared here", expr.callee()), sig.line),
                );
            }
            Some(_) => {}
        }
        self.channel.push(());
    }
}
