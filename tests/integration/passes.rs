/// End-to-end tests for the reference passes over one realistic tree
use pulsar::ast::*;
use pulsar::config::{CheckConfig, PrinterConfig};
use pulsar::passes::census::Census;
use pulsar::passes::{NodeKind, census, check, fold, pretty_print};

fn int(n: i64, line: u32) -> Expr {
    Expr::Literal(Literal::new(Value::Integer(n), line))
}

fn var(name: &str, line: u32) -> Expr {
    Expr::Variable(VariableAccess::new(name, line))
}

fn bin(left: Expr, op: &str, right: Expr, line: u32) -> Expr {
    Expr::Binary(Binary::new(left, op, right, line))
}

/// ```text
/// 1  func add(a: int, b: int) -> int {
/// 2      return a + b;
/// 3  }
/// 4
/// 5  var total: int = add(1, 2);
/// 6  if (total > 2) {
/// 7      print "big";
/// 8  } else {
/// 9      print -total;
/// 10 }
/// 11 while (total < 10) {
/// 12     total = total + 1;
/// 13 }
/// 14 print 2 * (3 + 4);
/// ```
fn sample_unit() -> TranslationUnit {
    TranslationUnit::new(vec![
        Stmt::Function(FunctionDecl::new(
            "add",
            PrimitiveType::Integer,
            vec![Parameter::new("a", PrimitiveType::Integer, 1), Parameter::new("b", PrimitiveType::Integer, 1)],
            Block::new(vec![Stmt::Return(Return::new(Some(bin(var("a", 2), "+", var("b", 2), 2)), 2))], 1),
            1,
        )),
        Stmt::Variable(Variable::new(
            "total",
            PrimitiveType::Integer,
            Some(Expr::Call(Call::new("add", vec![int(1, 5), int(2, 5)], 5))),
            5,
        )),
        Stmt::If(If::new(
            bin(var("total", 6), ">", int(2, 6), 6),
            Stmt::Block(Block::new(
                vec![Stmt::Print(Print::new(Expr::Literal(Literal::new(Value::String("big".into()), 7)), 7))],
                6,
            )),
            Some(Stmt::Block(Block::new(
                vec![Stmt::Print(Print::new(Expr::Unary(Unary::new("-", var("total", 9), 9)), 9))],
                8,
            ))),
            6,
        )),
        Stmt::While(While::new(
            bin(var("total", 11), "<", int(10, 11), 11),
            Block::new(
                vec![Stmt::Expression(ExpressionStmt::new(
                    Expr::Assignment(Assignment::new("total", bin(var("total", 12), "+", int(1, 12), 12), 12)),
                    12,
                ))],
                11,
            ),
            11,
        )),
        Stmt::Print(Print::new(
            bin(int(2, 14), "*", Expr::Grouping(Grouping::new(bin(int(3, 14), "+", int(4, 14), 14), 14)), 14),
            14,
        )),
    ])
}

// ==============================================================================
// Printer
// ==============================================================================

#[test]
fn test_pretty_print_sample() {
    let out = pretty_print(&sample_unit(), PrinterConfig::default());
    insta::assert_snapshot!(out, @r#"
    func add(a: int, b: int) -> int {
        return a + b;
    }

    var total: int = add(1, 2);
    if (total > 2) {
        print "big";
    } else {
        print -total;
    }
    while (total < 10) {
        total = total + 1;
    }
    print 2 * (3 + 4);
    "#);
}

#[test]
fn test_pretty_print_narrow_indent() {
    let unit = TranslationUnit::new(vec![Stmt::Block(Block::new(
        vec![Stmt::Block(Block::new(vec![Stmt::Return(Return::new(None, 3))], 2))],
        1,
    ))]);
    let out = pretty_print(&unit, PrinterConfig { indent_width: 1 });
    assert_eq!(out, "{\n {\n  return;\n }\n}\n");
}

#[test]
fn test_pretty_print_survives_json_roundtrip() {
    let unit = sample_unit();
    let json = unit.to_json().unwrap();
    let back = TranslationUnit::from_json(&json).unwrap();
    assert_eq!(
        pretty_print(&back, PrinterConfig::default()),
        pretty_print(&unit, PrinterConfig::default())
    );
}

// ==============================================================================
// Census
// ==============================================================================

#[test]
fn test_census_sample() {
    let report = census(&sample_unit());
    assert_eq!(report.count(NodeKind::Function), 1);
    assert_eq!(report.count(NodeKind::Print), 3);
    assert_eq!(report.count(NodeKind::Block), 2);
    assert_eq!(report.count(NodeKind::Binary), 6);
    assert_eq!(report.count(NodeKind::Call), 1);
    assert_eq!(report.count(NodeKind::Logical), 0);
    // function/if/while bodies sit one level below the top; the if branches
    // are blocks, so their prints are two levels down.
    assert_eq!(report.max_depth, 3);
    // 2 * (3 + 4)
    assert_eq!(report.largest_expression, 6);
}

#[test]
fn test_census_statement_results_sum_to_total() {
    let unit = sample_unit();
    let mut counter = Census::new();
    let total: usize = unit
        .accept_all(&mut counter)
        .into_iter()
        .map(|r| r.downcast::<usize>().unwrap())
        .sum();
    assert_eq!(total, counter.finish().total());
}

#[test]
fn test_census_json_shape() {
    let report = census(&sample_unit());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["counts"]["function"], 1);
    assert_eq!(json["max_depth"], 3);
}

// ==============================================================================
// Declaration checker
// ==============================================================================

#[test]
fn test_check_sample_is_clean() {
    let report = check(&sample_unit(), CheckConfig::default());
    assert!(report.is_ok(), "unexpected diagnostics: {:?}", report.diagnostics);
    assert_eq!(report.functions.len(), 1);
    assert_eq!(report.functions[0].name, "add");
    assert_eq!(report.functions[0].return_type, PrimitiveType::Integer);
}

#[test]
fn test_check_reports_in_source_order() {
    let unit = TranslationUnit::new(vec![
        Stmt::Print(Print::new(var("missing", 1), 1)),
        Stmt::Expression(ExpressionStmt::new(Expr::Call(Call::new("nope", vec![int(1, 2)], 2)), 2)),
        Stmt::Return(Return::new(Some(int(0, 3)), 3)),
    ]);
    let report = check(&unit, CheckConfig::default());
    let lines: Vec<u32> = report.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 2, 3]);
    insta::assert_snapshot!(
        report.diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>().join("\n"),
        @r"
    error[line 1]: undefined variable 'missing'
    error[line 2]: call to unknown function 'nope'
    error[line 3]: 'return' outside of a function
    "
    );
}

#[test]
fn test_check_arity_mismatch_points_at_declaration() {
    let mut stmts = sample_unit().statements().to_vec();
    stmts.push(Stmt::Print(Print::new(Expr::Call(Call::new("add", vec![int(1, 15)], 15)), 15)));
    let report = check(&TranslationUnit::new(stmts), CheckConfig::default());
    assert_eq!(report.diagnostics.len(), 1);
    let diag = &report.diagnostics[0];
    assert_eq!(diag.message, "function 'add' expects 2 argument(s), got 1");
    assert_eq!(diag.line, 15);
    assert_eq!(diag.note.as_ref().map(|n| n.line), Some(1));
}

// ==============================================================================
// Constant folder
// ==============================================================================

#[test]
fn test_fold_sample() {
    let folded = fold(&sample_unit());
    let rendered: Vec<String> = folded.iter().map(|f| f.to_string()).collect();
    assert_eq!(rendered, vec!["line 14: 2 * (3 + 4) => 14"]);
}

#[test]
fn test_fold_inside_function_bodies() {
    let unit = TranslationUnit::new(vec![Stmt::Function(FunctionDecl::new(
        "greeting",
        PrimitiveType::String,
        vec![],
        Block::new(
            vec![Stmt::Return(Return::new(
                Some(bin(
                    Expr::Literal(Literal::new(Value::String("hello, ".into()), 2)),
                    "+",
                    Expr::Literal(Literal::new(Value::String("world".into()), 2)),
                    2,
                )),
                2,
            ))],
            1,
        ),
        1,
    ))]);
    let folded = fold(&unit);
    assert_eq!(folded.len(), 1);
    assert_eq!(folded[0].value, Value::String("hello, world".into()));
    assert_eq!(folded[0].line, 2);
}
