/// Tests for the double-dispatch protocol
///
/// These build small trees by hand and check that `accept` reaches exactly the
/// visitor method for the node's variant, with no other effect.
use pulsar::ast::*;
use pulsar::visit::{ExprVisitor, StmtResult, StmtVisitor, walk_unary};

// ==============================================================================
// Recording visitor: one counter per method, never recurses
// ==============================================================================

#[derive(Default, Debug, PartialEq, Eq)]
struct Calls {
    function: usize,
    block: usize,
    expression: usize,
    if_: usize,
    print: usize,
    variable: usize,
    while_: usize,
    return_: usize,
    literal: usize,
    grouping: usize,
    unary: usize,
    binary: usize,
    logical: usize,
    variable_access: usize,
    assignment: usize,
    call: usize,
}

impl Calls {
    fn get(&self, method: &str) -> usize {
        match method {
            "function" => self.function,
            "block" => self.block,
            "expression" => self.expression,
            "if" => self.if_,
            "print" => self.print,
            "variable" => self.variable,
            "while" => self.while_,
            "return" => self.return_,
            "literal" => self.literal,
            "grouping" => self.grouping,
            "unary" => self.unary,
            "binary" => self.binary,
            "logical" => self.logical,
            "variable_access" => self.variable_access,
            "assignment" => self.assignment,
            "call" => self.call,
            other => panic!("no such method: {other}"),
        }
    }

    fn total(&self) -> usize {
        self.function
            + self.block
            + self.expression
            + self.if_
            + self.print
            + self.variable
            + self.while_
            + self.return_
            + self.literal
            + self.grouping
            + self.unary
            + self.binary
            + self.logical
            + self.variable_access
            + self.assignment
            + self.call
    }
}

#[derive(Default)]
struct Recorder {
    calls: Calls,
}

impl StmtVisitor for Recorder {
    fn visit_function_statement(&mut self, _stmt: &FunctionDecl) -> StmtResult {
        self.calls.function += 1;
        StmtResult::new("function")
    }
    fn visit_block_statement(&mut self, _stmt: &Block) -> StmtResult {
        self.calls.block += 1;
        StmtResult::new("block")
    }
    fn visit_expression_statement(&mut self, _stmt: &ExpressionStmt) -> StmtResult {
        self.calls.expression += 1;
        StmtResult::new("expression")
    }
    fn visit_if_statement(&mut self, _stmt: &If) -> StmtResult {
        self.calls.if_ += 1;
        StmtResult::new("if")
    }
    fn visit_print_statement(&mut self, _stmt: &Print) -> StmtResult {
        self.calls.print += 1;
        StmtResult::new("print")
    }
    fn visit_variable_statement(&mut self, _stmt: &Variable) -> StmtResult {
        self.calls.variable += 1;
        StmtResult::new("variable")
    }
    fn visit_while_statement(&mut self, _stmt: &While) -> StmtResult {
        self.calls.while_ += 1;
        StmtResult::new("while")
    }
    fn visit_return_statement(&mut self, _stmt: &Return) -> StmtResult {
        self.calls.return_ += 1;
        StmtResult::new("return")
    }
}

impl ExprVisitor for Recorder {
    fn visit_literal_expression(&mut self, _expr: &Literal) {
        self.calls.literal += 1;
    }
    fn visit_grouping_expression(&mut self, _expr: &Grouping) {
        self.calls.grouping += 1;
    }
    fn visit_unary_expression(&mut self, _expr: &Unary) {
        self.calls.unary += 1;
    }
    fn visit_binary_expression(&mut self, _expr: &Binary) {
        self.calls.binary += 1;
    }
    fn visit_logical_expression(&mut self, _expr: &Logical) {
        self.calls.logical += 1;
    }
    fn visit_variable_expression(&mut self, _expr: &VariableAccess) {
        self.calls.variable_access += 1;
    }
    fn visit_assignment_expression(&mut self, _expr: &Assignment) {
        self.calls.assignment += 1;
    }
    fn visit_call_expression(&mut self, _expr: &Call) {
        self.calls.call += 1;
    }
}

fn int(n: i64) -> Expr {
    Expr::Literal(Literal::new(Value::Integer(n), 1))
}

fn var(name: &str) -> Expr {
    Expr::Variable(VariableAccess::new(name, 1))
}

fn add_function() -> FunctionDecl {
    // func add(a: int, b: int) -> int { -a; }
    FunctionDecl::new(
        "add",
        PrimitiveType::Integer,
        vec![
            Parameter::new("a", PrimitiveType::Integer, 1),
            Parameter::new("b", PrimitiveType::Integer, 1),
        ],
        Block::new(
            vec![Stmt::Expression(ExpressionStmt::new(Expr::Unary(Unary::new("-", var("a"), 2)), 2))],
            1,
        ),
        1,
    )
}

// ==============================================================================
// Dispatch reaches exactly one method
// ==============================================================================

#[test]
fn test_each_statement_dispatches_once() {
    let cases: Vec<(Stmt, &str)> = vec![
        (Stmt::Function(add_function()), "function"),
        (Stmt::Block(Block::new(vec![Stmt::Print(Print::new(int(1), 1))], 1)), "block"),
        (Stmt::Expression(ExpressionStmt::new(int(1), 1)), "expression"),
        (Stmt::If(If::new(var("c"), Stmt::Print(Print::new(int(1), 1)), None, 1)), "if"),
        (Stmt::Print(Print::new(int(1), 1)), "print"),
        (Stmt::Variable(Variable::new("x", PrimitiveType::Double, None, 1)), "variable"),
        (Stmt::While(While::new(var("c"), Block::new(vec![], 1), 1)), "while"),
        (Stmt::Return(Return::new(Some(int(0)), 1)), "return"),
    ];

    for (stmt, tag) in cases {
        let mut recorder = Recorder::default();
        let result = stmt.accept(&mut recorder);
        assert_eq!(recorder.calls.get(tag), 1, "{tag}");
        assert_eq!(recorder.calls.total(), 1, "{tag} called other methods: {:?}", recorder.calls);
        assert_eq!(result.downcast_ref::<&'static str>().copied(), Some(tag));
    }
}

#[test]
fn test_each_expression_dispatches_once() {
    let cases: Vec<(Expr, &str)> = vec![
        (int(1), "literal"),
        (Expr::Grouping(Grouping::new(int(1), 1)), "grouping"),
        (Expr::Unary(Unary::new("!", var("b"), 1)), "unary"),
        (Expr::Binary(Binary::new(int(1), "*", int(2), 1)), "binary"),
        (Expr::Logical(Logical::new(var("a"), "||", var("b"), 1)), "logical"),
        (var("x"), "variable_access"),
        (Expr::Assignment(Assignment::new("x", int(3), 1)), "assignment"),
        (Expr::Call(Call::new("f", vec![int(1), int(2)], 1)), "call"),
    ];

    for (expr, tag) in cases {
        let mut recorder = Recorder::default();
        expr.accept(&mut recorder);
        assert_eq!(recorder.calls.get(tag), 1, "{tag}");
        assert_eq!(recorder.calls.total(), 1, "{tag} called other methods: {:?}", recorder.calls);
    }
}

#[test]
fn test_variant_struct_accept_matches_enum_accept() {
    let func = add_function();
    let mut via_struct = Recorder::default();
    func.accept(&mut via_struct);

    let mut via_enum = Recorder::default();
    Stmt::Function(func).accept(&mut via_enum);

    assert_eq!(via_struct.calls, via_enum.calls);
}

// ==============================================================================
// Scenario: the "add" function
// ==============================================================================

#[test]
fn test_add_function_statement_visitor() {
    struct FunctionSpy {
        calls: usize,
        arity: Option<usize>,
    }

    impl StmtVisitor for FunctionSpy {
        fn visit_function_statement(&mut self, stmt: &FunctionDecl) -> StmtResult {
            self.calls += 1;
            self.arity = Some(stmt.arity());
            StmtResult::empty()
        }
        fn visit_block_statement(&mut self, _stmt: &Block) -> StmtResult {
            panic!("block visited")
        }
        fn visit_expression_statement(&mut self, _stmt: &ExpressionStmt) -> StmtResult {
            panic!("expression statement visited")
        }
        fn visit_if_statement(&mut self, _stmt: &If) -> StmtResult {
            panic!("if visited")
        }
        fn visit_print_statement(&mut self, _stmt: &Print) -> StmtResult {
            panic!("print visited")
        }
        fn visit_variable_statement(&mut self, _stmt: &Variable) -> StmtResult {
            panic!("variable visited")
        }
        fn visit_while_statement(&mut self, _stmt: &While) -> StmtResult {
            panic!("while visited")
        }
        fn visit_return_statement(&mut self, _stmt: &Return) -> StmtResult {
            panic!("return visited")
        }
    }

    let func = add_function();
    let mut spy = FunctionSpy { calls: 0, arity: None };
    let result = func.accept(&mut spy);

    assert!(result.is_empty());
    assert_eq!(spy.calls, 1);
    assert_eq!(spy.arity, Some(2));
    assert_eq!(func.name(), "add");
    assert_eq!(func.return_type(), PrimitiveType::Integer);
}

#[test]
fn test_add_function_unary_expression_visitor() {
    #[derive(Default)]
    struct UnarySpy {
        unary_calls: usize,
        operators: Vec<String>,
        operand_visits: usize,
        operand_seen_before_return: bool,
    }

    impl ExprVisitor for UnarySpy {
        fn visit_literal_expression(&mut self, _expr: &Literal) {
            self.operand_visits += 1;
        }
        fn visit_grouping_expression(&mut self, _expr: &Grouping) {}
        fn visit_unary_expression(&mut self, expr: &Unary) {
            self.unary_calls += 1;
            self.operators.push(expr.operator().to_string());
            let before = self.operand_visits;
            walk_unary(self, expr);
            self.operand_seen_before_return = self.operand_visits == before + 1;
        }
        fn visit_binary_expression(&mut self, _expr: &Binary) {}
        fn visit_logical_expression(&mut self, _expr: &Logical) {}
        fn visit_variable_expression(&mut self, _expr: &VariableAccess) {
            self.operand_visits += 1;
        }
        fn visit_assignment_expression(&mut self, _expr: &Assignment) {}
        fn visit_call_expression(&mut self, _expr: &Call) {}
    }

    let func = add_function();
    let Stmt::Expression(stmt) = &func.body().statements()[0] else {
        panic!("expected an expression statement");
    };

    let mut spy = UnarySpy::default();
    stmt.expression().accept(&mut spy);

    assert_eq!(spy.unary_calls, 1);
    assert_eq!(spy.operators, vec!["-"]);
    assert!(spy.operand_seen_before_return);
}

// ==============================================================================
// No validation, no hidden state
// ==============================================================================

#[test]
fn test_empty_unary_operator_is_accepted() {
    let unary = Unary::new("", int(7), 3);
    assert_eq!(unary.operator(), "");
    assert_eq!(unary.line(), 3);

    let mut recorder = Recorder::default();
    Expr::Unary(unary).accept(&mut recorder);
    assert_eq!(recorder.calls.unary, 1);
}

#[test]
fn test_zero_parameter_function() {
    let func = FunctionDecl::new("main", PrimitiveType::Void, vec![], Block::new(vec![], 1), 1);
    assert_eq!(func.arity(), 0);
    assert!(func.parameters().is_empty());
    assert!(func.body().is_empty());
}

#[test]
fn test_accessors_are_idempotent() {
    let func = add_function();
    let first: Vec<String> = func.parameters().iter().map(|p| p.name().to_string()).collect();
    let second: Vec<String> = func.parameters().iter().map(|p| p.name().to_string()).collect();
    assert_eq!(first, second);
    assert_eq!(func.arity(), func.arity());
    assert!(std::ptr::eq(func.body(), func.body()));

    let unary = Unary::new("-", var("a"), 1);
    assert!(std::ptr::eq(unary.operand(), unary.operand()));
    assert_eq!(unary.operator(), unary.operator());

    // Dispatch after the getters ran is the same as on a fresh node.
    let mut after_getters = Recorder::default();
    let result = func.accept(&mut after_getters);
    assert_eq!(after_getters.calls.function, 1);
    assert_eq!(after_getters.calls.total(), 1);
    assert_eq!(result.downcast_ref::<&'static str>().copied(), Some("function"));
    assert_eq!(func.arity(), 2);

    unary.accept(&mut after_getters);
    assert_eq!(after_getters.calls.unary, 1);
    assert_eq!(after_getters.calls.variable_access, 0);
    assert_eq!(after_getters.calls.total(), 2);
}

#[test]
fn test_independent_visitors_over_same_tree() {
    let unit = TranslationUnit::new(vec![
        Stmt::Function(add_function()),
        Stmt::Print(Print::new(Expr::Call(Call::new("add", vec![int(1), int(2)], 3)), 3)),
    ]);
    let snapshot = unit.clone();

    let mut first = Recorder::default();
    let first_results = unit.accept_all(&mut first);

    let mut second = Recorder::default();
    let second_results = unit.accept_all(&mut second);

    assert_eq!(first.calls, second.calls);
    assert_eq!(first.calls.function, 1);
    assert_eq!(first.calls.print, 1);
    assert_eq!(first_results.len(), 2);
    assert_eq!(second_results[1].downcast_ref::<&str>(), Some(&"print"));
    assert_eq!(unit, snapshot, "visiting must not change the tree");
}

#[test]
fn test_visitor_as_trait_object() {
    let stmt = Stmt::Print(Print::new(int(1), 1));
    let mut recorder = Recorder::default();
    {
        let dynamic: &mut dyn StmtVisitor = &mut recorder;
        stmt.accept(dynamic);
    }
    assert_eq!(recorder.calls.print, 1);
}
