use tracing::{debug, warn};

use crate::ast::*;
use crate::config::PrinterConfig;
use crate::visit::channel::{ChannelVisitor, ResultChannel};
use crate::visit::{ExprVisitor, StmtResult, StmtVisitor};

/// Pretty-print a translation unit back into Pulsar source text.
pub fn pretty_print(unit: &TranslationUnit, config: PrinterConfig) -> String {
    debug!(statements = unit.statements().len(), "pretty printing translation unit");
    let mut pp = Printer::new(config);
    let mut prev_was_function = false;

    for (i, stmt) in unit.statements().iter().enumerate() {
        let is_function = matches!(stmt, Stmt::Function(_));
        // Blank line around top-level functions
        if i > 0 && (is_function || prev_was_function) {
            pp.newline();
        }
        stmt.accept(&mut pp);
        prev_was_function = is_function;
    }

    while pp.buf.ends_with('\n') {
        pp.buf.pop();
    }
    if !pp.buf.is_empty() {
        pp.newline();
    }
    pp.finish()
}

/// Render a single expression.
pub fn print_expr(expr: &Expr) -> String {
    let mut pp = Printer::new(PrinterConfig::default());
    pp.sub(expr)
}

/// Statements append whole lines to `buf`; expressions push their text onto
/// the channel and the enclosing node pops it.
pub struct Printer {
    buf: String,
    indent: usize,
    width: usize,
    channel: ResultChannel<String>,
}

impl Printer {
    pub fn new(config: PrinterConfig) -> Self {
        Self {
            buf: String::new(),
            indent: 0,
            width: config.indent_width,
            channel: ResultChannel::new(),
        }
    }

    pub fn finish(self) -> String {
        self.buf
    }

    fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn newline(&mut self) {
        self.buf.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent * self.width {
            self.buf.push(' ');
        }
    }

    fn line(&mut self, s: &str) {
        self.write_indent();
        self.write(s);
        self.newline();
    }

    /// Text of a child expression.
    fn sub(&mut self, expr: &Expr) -> String {
        match self.evaluate(expr) {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "printer result channel out of balance");
                String::new()
            }
        }
    }

    /// Text of an operand, parenthesized when it binds looser than `min`.
    fn operand(&mut self, expr: &Expr, min: u8) -> String {
        let text = self.sub(expr);
        if precedence(expr) < min { format!("({text})") } else { text }
    }

    /// Binary operators are left-associative.
    fn infix(&mut self, left: &Expr, op: &str, right: &Expr) -> String {
        let prec = binary_precedence(op);
        let left = self.operand(left, prec);
        let right = self.operand(right, prec + 1);
        format!("{left} {op} {right}")
    }

    fn emit_statements(&mut self, stmts: &[Stmt]) {
        self.indent += 1;
        for stmt in stmts {
            stmt.accept(self);
        }
        self.indent -= 1;
    }

    /// Emit ` {` ... `}` with no trailing newline.
    fn emit_braced(&mut self, block: &Block) {
        self.write(" {");
        self.newline();
        self.emit_statements(block.statements());
        self.write_indent();
        self.write("}");
    }

    /// Emit an `if` / `else` branch. Returns true when the output ends
    /// mid-line (after a closing brace).
    fn emit_branch(&mut self, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::Block(block) => {
                self.emit_braced(block);
                true
            }
            other => {
                self.newline();
                self.indent += 1;
                other.accept(self);
                self.indent -= 1;
                false
            }
        }
    }
}

const ASSIGNMENT: u8 = 0;
const UNARY: u8 = 8;
const PRIMARY: u8 = 9;

fn binary_precedence(op: &str) -> u8 {
    match op {
        "||" => 2,
        "&&" => 3,
        "==" | "!=" => 4,
        "<" | "<=" | ">" | ">=" => 5,
        "+" | "-" => 6,
        "*" | "/" | "%" => 7,
        _ => 1,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Assignment(_) => ASSIGNMENT,
        Expr::Binary(e) => binary_precedence(e.operator()),
        Expr::Logical(e) => binary_precedence(e.operator()),
        Expr::Unary(_) => UNARY,
        Expr::Literal(_) | Expr::Grouping(_) | Expr::Variable(_) | Expr::Call(_) => PRIMARY,
    }
}

impl ChannelVisitor for Printer {
    type Value = String;

    fn channel(&mut self) -> &mut ResultChannel<String> {
        &mut self.channel
    }
}

impl StmtVisitor for Printer {
    fn visit_function_statement(&mut self, stmt: &FunctionDecl) -> StmtResult {
        let params = stmt
            .parameters()
            .iter()
            .map(|p| format!("{}: {}", p.name(), p.param_type()))
            .collect::<Vec<_>>()
            .join(", ");
        self.write_indent();
        self.write(&format!("func {}({params}) -> {}", stmt.name(), stmt.return_type()));
        self.emit_braced(stmt.body());
        self.newline();
        StmtResult::empty()
    }

    fn visit_block_statement(&mut self, stmt: &Block) -> StmtResult {
        self.line("{");
        self.emit_statements(stmt.statements());
        self.line("}");
        StmtResult::empty()
    }

    fn visit_expression_statement(&mut self, stmt: &ExpressionStmt) -> StmtResult {
        let text = self.sub(stmt.expression());
        self.line(&format!("{text};"));
        StmtResult::empty()
    }

    fn visit_if_statement(&mut self, stmt: &If) -> StmtResult {
        let cond = self.sub(stmt.condition());
        self.write_indent();
        self.write(&format!("if ({cond})"));
        let mut open_line = self.emit_branch(stmt.then_branch());
        if let Some(else_branch) = stmt.else_branch() {
            if open_line {
                self.write(" else");
            } else {
                self.write_indent();
                self.write("else");
            }
            open_line = self.emit_branch(else_branch);
        }
        if open_line {
            self.newline();
        }
        StmtResult::empty()
    }

    fn visit_print_statement(&mut self, stmt: &Print) -> StmtResult {
        let text = self.sub(stmt.expression());
        self.line(&format!("print {text};"));
        StmtResult::empty()
    }

    fn visit_variable_statement(&mut self, stmt: &Variable) -> StmtResult {
        let decl = format!("var {}: {}", stmt.name(), stmt.var_type());
        match stmt.initializer() {
            Some(init) => {
                let value = self.sub(init);
                self.line(&format!("{decl} = {value};"));
            }
            None => self.line(&format!("{decl};")),
        }
        StmtResult::empty()
    }

    fn visit_while_statement(&mut self, stmt: &While) -> StmtResult {
        let cond = self.sub(stmt.condition());
        self.write_indent();
        self.write(&format!("while ({cond})"));
        self.emit_braced(stmt.body());
        self.newline();
        StmtResult::empty()
    }

    fn visit_return_statement(&mut self, stmt: &Return) -> StmtResult {
        match stmt.value() {
            Some(value) => {
                let text = self.sub(value);
                self.line(&format!("return {text};"));
            }
            None => self.line("return;"),
        }
        StmtResult::empty()
    }
}

impl ExprVisitor for Printer {
    fn visit_literal_expression(&mut self, expr: &Literal) {
        self.channel.push(expr.value().to_string());
    }

    fn visit_grouping_expression(&mut self, expr: &Grouping) {
        let inner = self.sub(expr.expression());
        self.channel.push(format!("({inner})"));
    }

    fn visit_unary_expression(&mut self, expr: &Unary) {
        let op = expr.operator();
        let operand = self.operand(expr.operand(), UNARY);
        let sep = match op.chars().last() {
            Some(c @ ('-' | '+')) if operand.starts_with(c) => " ",
            _ => "",
        };
        self.channel.push(format!("{op}{sep}{operand}"));
    }

    fn visit_binary_expression(&mut self, expr: &Binary) {
        let text = self.infix(expr.left(), expr.operator(), expr.right());
        self.channel.push(text);
    }

    fn visit_logical_expression(&mut self, expr: &Logical) {
        let text = self.infix(expr.left(), expr.operator(), expr.right());
        self.channel.push(text);
    }

    fn visit_variable_expression(&mut self, expr: &VariableAccess) {
        self.channel.push(expr.name().to_string());
    }

    fn visit_assignment_expression(&mut self, expr: &Assignment) {
        let value = self.sub(expr.value());
        self.channel.push(format!("{} = {value}", expr.name()));
    }

    fn visit_call_expression(&mut self, expr: &Call) {
        let args = expr
            .arguments()
            .iter()
            .map(|arg| self.sub(arg))
            .collect::<Vec<_>>()
            .join(", ");
        self.channel.push(format!("{}({args})", expr.callee()));
    }
}
