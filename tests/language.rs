use std::fs;

use rill::{
    error::InterpreterError,
    execute,
    interpreter::{
        builtins,
        environment::Environment,
        evaluator::test_runner::run_tests,
        lexer,
        parser,
        value::core::Value,
    },
};
use walkdir::WalkDir;

fn eval_source(source: &str) -> Result<Value, InterpreterError> {
    execute(source, "test")
}

fn eval(source: &str) -> Value {
    eval_source(source).unwrap_or_else(|e| panic!("script failed:\n{source}\nerror: {e}"))
}

fn assert_success(source: &str) {
    if let Err(e) = eval_source(source) {
        panic!("script failed:\n{source}\nerror: {e}");
    }
}

fn assert_failure(source: &str, needle: &str) {
    match eval_source(source) {
        Ok(value) => panic!("script succeeded with {value} but was expected to fail:\n{source}"),
        Err(e) => {
            let message = e.to_string();
            assert!(message.contains(needle),
                    "error {message:?} does not mention {needle:?}");
        },
    }
}

fn assert_int(source: &str, expected: i64) {
    assert_eq!(eval(source), Value::Int(expected), "source:\n{source}");
}

fn assert_float(source: &str, expected: f64) {
    assert_eq!(eval(source), Value::Float(expected), "source:\n{source}");
}

fn assert_bool(source: &str, expected: bool) {
    assert_eq!(eval(source), Value::Bool(expected), "source:\n{source}");
}

fn assert_str(source: &str, expected: &str) {
    assert_eq!(eval(source), Value::Str(expected.to_string()), "source:\n{source}");
}

// ---------------------------------------------------------------------
// Arithmetic and operators
// ---------------------------------------------------------------------

#[test]
fn arithmetic_precedence() {
    assert_int("2 + 3 * 4", 14);
    assert_int("(2 + 3) * 4", 20);
    assert_int("10 - 2 - 3", 5);
    assert_int("2 * 3 + 4 * 5", 26);
}

#[test]
fn integer_division_truncates_toward_zero() {
    assert_int("10 / 3", 3);
    assert_int("-7 / 2", -3);
    assert_int("7 % 3", 1);
}

#[test]
fn mixed_numerics_promote_to_float() {
    assert_float("1 + 2.5", 3.5);
    assert_float("2.0 * 3", 6.0);
    assert_float("7.0 / 2", 3.5);
    assert_bool("1 == 1.0", true);
    assert_bool("1.5 > 1", true);
}

#[test]
fn division_and_modulo_by_zero_are_errors() {
    assert_failure("1 / 0", "division by zero");
    assert_failure("1 % 0", "modulo by zero");
    assert_failure("1.0 / 0.0", "division by zero");
}

#[test]
fn unsupported_operand_types_are_errors() {
    assert_failure(r#""a" - "b""#, "unsupported operator");
    assert_failure("1.5 % 2", "unsupported operator");
    assert_failure("[1] + [2]", "unsupported operator");
}

#[test]
fn comparisons_and_equality() {
    assert_bool("2 < 3", true);
    assert_bool("3 <= 3", true);
    assert_bool("2 != 3", true);
    assert_bool(r#""apple" < "banana""#, true);
    assert_bool(r#""a" + "b" == "ab""#, true);
    assert_bool("[1, 2] == [1, 2]", true);
    assert_bool("[1, 2] == [1, 3]", false);
    assert_bool("none == none", true);
    assert_bool("1 == none", false);
}

#[test]
fn logical_operators_short_circuit() {
    // The right side would be an undefined-variable error if evaluated.
    assert_bool("false && missing", false);
    assert_bool("true || missing", true);
    assert_int("0 || 7", 7);
    assert_int("3 && 7", 7);
    assert_bool("!true", false);
    assert_bool("!0.0", true);
}

#[test]
fn unary_negation() {
    assert_int("-5", -5);
    assert_float("-2.5", -2.5);
    assert_int("--3", 3);
    assert_failure(r#"-"x""#, "cannot negate");
}

// ---------------------------------------------------------------------
// Bindings and scoping
// ---------------------------------------------------------------------

#[test]
fn let_and_mut_bindings() {
    assert_int("let x = 1 + 2\nx", 3);
    assert_int("mut x = 1\nx = x + 41\nx", 42);
}

#[test]
fn immutable_reassignment_fails() {
    assert_failure("let x = 1\nx = 2", "immutable");
}

#[test]
fn assignment_to_undefined_fails() {
    assert_failure("ghost = 1", "undefined variable");
}

#[test]
fn redefinition_in_same_scope_fails() {
    assert_failure("let x = 1\nlet x = 2", "already defined");
}

#[test]
fn blocks_enforce_scoping() {
    assert_success("let x = 1\nif true { let x = 2\nassert(x == 2) }\nassert(x == 1)");
    assert_failure("if true { let inner = 1 }\ninner", "undefined variable");
}

#[test]
fn semicolons_separate_statements() {
    assert_int("let a = 1; let b = 2; a + b", 3);
}

// ---------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------

#[test]
fn if_elif_else_produce_values() {
    assert_int("if true { 1 } else { 2 }", 1);
    assert_int("if false { 1 } elif true { 2 } else { 3 }", 2);
    assert_int("if false { 1 } elif false { 2 } else { 3 }", 3);
    assert_eq!(eval("if false { 1 }"), Value::None);
}

#[test]
fn empty_map_condition_is_falsy() {
    assert_int("if {} { 1 } else { 2 }", 2);
}

#[test]
fn conditional_loop_runs_until_falsy() {
    assert_int("mut sum = 0\nmut i = 0\nloop i < 5 { sum = sum + i; i = i + 1 }\nsum", 10);
}

#[test]
fn infinite_loop_exits_via_break() {
    assert_int("mut i = 0\nloop { i = i + 1\nif i == 5 { break } }\ni", 5);
}

#[test]
fn for_in_loop_over_array_and_range() {
    assert_int("mut sum = 0\nloop x in [2, 3, 4] { sum = sum + x }\nsum", 9);
    assert_int("mut sum = 0\nloop i in 1..5 { sum = sum + i }\nsum", 10);
}

#[test]
fn break_and_continue_interact() {
    // Odd numbers below 7: 1 + 3 + 5.
    let source = "mut sum = 0\n\
                  loop i in 0..10 {\n\
                    if i % 2 == 0 { continue }\n\
                    if i == 7 { break }\n\
                    sum = sum + i\n\
                  }\n\
                  sum";
    assert_int(source, 9);
}

#[test]
fn break_only_exits_the_inner_loop() {
    let source = "mut count = 0\n\
                  loop i in 0..3 {\n\
                    loop j in 0..10 {\n\
                      if j == 2 { break }\n\
                      count = count + 1\n\
                    }\n\
                  }\n\
                  count";
    assert_int(source, 6);
}

#[test]
fn loop_iterations_have_their_own_scope() {
    assert_success("loop i in 0..3 { let tmp = i * 2\nassert(tmp == i * 2) }");
    assert_failure("loop i in 0..3 { }\ni", "undefined variable");
}

#[test]
fn signals_outside_their_consumers_are_errors() {
    assert_failure("break", "break outside loop");
    assert_failure("continue", "continue outside loop");
    assert_failure("return 1", "return outside function");
}

// ---------------------------------------------------------------------
// Functions and closures
// ---------------------------------------------------------------------

#[test]
fn function_declaration_and_call() {
    assert_int("fn add(a, b) { return a + b }\nadd(2, 5)", 7);
    assert_int("fn square(x) => x * x\nsquare(3)", 9);
}

#[test]
fn function_body_without_return_yields_last_value() {
    assert_int("fn f() { 1 + 1 }\nf()", 2);
}

#[test]
fn bare_return_yields_none() {
    assert_eq!(eval("fn f() { return }\nf()"), Value::None);
}

#[test]
fn multiple_return_values_become_an_array() {
    assert_int("fn f() { return 1, 2, 3 }\nf()[1]", 2);
    assert_int("fn f() { return 10, 20 }\nlen(f())", 2);
}

#[test]
fn wrong_arity_is_an_error() {
    assert_failure("fn f(x, y) => x + y\nf(3)", "takes exactly 2 arguments");
}

#[test]
fn calling_a_non_function_is_an_error() {
    assert_failure("let x = 1\nx(2)", "not callable");
}

#[test]
fn recursion_works() {
    let source = "fn fib(n) {\n\
                    if n < 2 { return n }\n\
                    return fib(n - 1) + fib(n - 2)\n\
                  }\n\
                  fib(10)";
    assert_int(source, 55);
}

#[test]
fn closures_capture_mutable_bindings() {
    let source = "fn counter() {\n\
                    mut x = 0\n\
                    fn() { x = x + 1; x }\n\
                  }\n\
                  let c = counter()\n\
                  c(); c(); c()";
    assert_int(source, 3);
}

#[test]
fn each_closure_gets_its_own_captured_scope() {
    let source = "fn counter() {\n\
                    mut x = 0\n\
                    fn() { x = x + 1; x }\n\
                  }\n\
                  let a = counter()\n\
                  let b = counter()\n\
                  a(); a()\n\
                  b()";
    assert_int(source, 1);
}

#[test]
fn function_literals_are_first_class() {
    assert_int("let twice = fn(f, x) => f(f(x))\ntwice(fn(n) => n + 1, 5)", 7);
}

// ---------------------------------------------------------------------
// Arrays, maps, strings, ranges
// ---------------------------------------------------------------------

#[test]
fn array_literals_and_indexing() {
    assert_int("let a = [1, 2, 3]\na[0] + a[2]", 4);
    assert_failure("[1, 2][5]", "out of bounds");
    assert_failure("[1, 2][-1]", "out of bounds");
    assert_failure(r#"[1, 2]["x"]"#, "must be an integer");
}

#[test]
fn index_assignment_mutates_in_place() {
    assert_int("let a = [1, 2, 3]\na[1] = 9\na[1]", 9);
    assert_failure("let a = [1]\na[3] = 0", "out of bounds");
}

#[test]
fn arrays_have_reference_semantics() {
    assert_int("let a = [1]\nlet b = a\npush(a, 2)\nlen(b)", 2);
    assert_int("let a = [1, 2]\nlet b = a\nb[0] = 9\na[0]", 9);
}

#[test]
fn push_and_pop() {
    assert_int("let a = [1]\npush(a, 5)\npop(a) + len(a)", 6);
    assert_failure("pop([])", "empty array");
}

#[test]
fn map_literals_and_access() {
    assert_int("let m = {\"a\": 1, \"b\": 2}\nm[\"a\"] + m.b", 3);
    assert_eq!(eval("{\"a\": 1}[\"z\"]"), Value::None);
    assert_int("len({\"a\": 1, \"b\": 2})", 2);
}

#[test]
fn map_dot_access_returns_none_on_miss() {
    assert_eq!(eval("let m = {\"a\": 1}\nm.b"), Value::None);
    assert_eq!(eval("let m = {\"a\": 1}\nm?.b"), Value::None);
    assert_int("let m = {\"a\": 1}\nm.a + 1", 2);
}

#[test]
fn map_index_assignment_inserts() {
    assert_int("let m = {\"a\": 1}\nm[\"b\"] = 2\nlen(m)", 2);
    assert_bool("let m = {}\nm[\"k\"] = 1\nhas(m, \"k\")", true);
    assert_failure("let m = {}\nm[1] = 2", "must be a string");
}

#[test]
fn non_string_map_keys_are_errors() {
    assert_failure("{1: 2}", "must be a string");
}

#[test]
fn dot_access_on_non_map_is_an_error() {
    assert_failure("let x = 1\nx.field", "cannot access field");
    assert_failure("let x = 1\nx?.field", "cannot safe-access");
}

#[test]
fn safe_access_on_none_yields_none() {
    assert_eq!(eval("none?.anything"), Value::None);
}

#[test]
fn string_indexing_and_length() {
    assert_str("\"abc\"[1]", "b");
    assert_int("len(\"hello\")", 5);
    assert_failure("\"abc\"[10]", "out of bounds");
}

#[test]
fn ranges_are_lazy_and_indexable() {
    assert_int("len(0..10)", 10);
    assert_int("len(0..10 step 2)", 5);
    assert_int("(0..10 step 2)[2]", 4);
    assert_int("len(10..0 step -2)", 5);
    assert_bool("0..3 == 0..3", true);
    assert_bool("0..3 == 0..4", false);
    assert_failure("(0..3)[7]", "out of bounds");
}

#[test]
fn range_bounds_and_step_must_be_integers() {
    assert_failure("1.5..3", "must be integers");
    assert_failure("0..5 step 0", "cannot be zero");
}

#[test]
fn chained_ranges_are_parse_errors() {
    assert_failure("1..5..9", "chained");
}

// ---------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------

#[test]
fn match_on_literals() {
    assert_str("match 2 { 1 => \"one\"; 2 => \"two\"; _ => \"many\" }", "two");
    assert_str("match \"hi\" { \"hi\" => \"greeting\"; _ => \"other\" }", "greeting");
    assert_str("match true { true => \"yes\"; false => \"no\" }", "yes");
    assert_str("match none { none => \"nothing\"; _ => \"something\" }", "nothing");
    assert_str("match 2.5 { 2.5 => \"exact\"; _ => \"other\" }", "exact");
}

#[test]
fn match_range_patterns_are_half_open() {
    let source = |x: i64| {
        format!("let x = {x}\nmatch x {{ 0..3 => \"low\"; 3..7 => \"mid\"; _ => \"other\" }}")
    };
    assert_str(&source(5), "mid");
    assert_str(&source(3), "mid");
    assert_str(&source(7), "other");
    assert_str(&source(0), "low");
}

#[test]
fn match_without_matching_arm_yields_none() {
    assert_eq!(eval("match 9 { 1 => \"one\" }"), Value::None);
}

#[test]
fn match_guards_filter_arms() {
    let source = "let x = 10\nmatch x { n if n > 5 => \"big\"; _ => \"small\" }";
    assert_str(source, "big");
    let source = "let x = 2\nmatch x { n if n > 5 => \"big\"; _ => \"small\" }";
    assert_str(source, "small");
}

#[test]
fn match_bindings_do_not_leak() {
    assert_int("let x = 1\nmatch x { n => n + 1 }", 2);
    assert_failure("let x = 1\nmatch x { n => n }\nn", "undefined variable");
}

#[test]
fn match_arms_can_have_block_bodies() {
    let source = "match 1 { 1 => { let a = 40\na + 2 }; _ => 0 }";
    assert_int(source, 42);
}

// ---------------------------------------------------------------------
// Pipelines, coalescing, interpolation
// ---------------------------------------------------------------------

#[test]
fn pipeline_prepends_the_piped_value() {
    assert_int("fn add(a, b) => a + b\n5 |> add(3)", 8);
    assert_int("fn add(a, b) => a + b\n5 |> add(1) |> add(2)", 8);
    assert_int("fn inc(x) => x + 1\n1 |> inc()", 2);
}

#[test]
fn pipeline_into_builtins() {
    assert_int("[3, 1, 2] |> len()", 3);
    assert_bool("([3, 1, 2] |> sort()) == [1, 2, 3]", true);
}

#[test]
fn pipeline_right_side_must_be_a_call() {
    assert_failure("5 |> 3", "must be a function call");
}

#[test]
fn coalesce_picks_the_first_non_none() {
    assert_int("none ?? 5", 5);
    assert_int("3 ?? 5", 3);
    assert_str("let m = {\"a\": 1}\nm.missing ?? \"default\"", "default");
    assert_int("let x = 7\nx ?? 0", 7);
    assert_bool("false ?? 1", false);
}

#[test]
fn string_interpolation_concatenates_parts() {
    assert_str("let name = \"world\"\n\"hello ${name}\"", "hello world");
    assert_str("\"${1 + 2}\"", "3");
    assert_str("let a = 1\nlet b = 2\n\"a${a}b${b}c\"", "a1b2c");
    assert_str("let m = {\"n\": 5}\n\"value: ${m.n}\"", "value: 5");
}

#[test]
fn interpolation_requires_a_closing_brace() {
    assert_failure("\"broken ${oops\"", "parse error");
}

// ---------------------------------------------------------------------
// Built-ins
// ---------------------------------------------------------------------

#[test]
fn type_reports_short_names() {
    assert_str("type(1)", "int");
    assert_str("type(1.5)", "float");
    assert_str("type(\"s\")", "string");
    assert_str("type(none)", "none");
    assert_str("type([1])", "array");
    assert_str("type({})", "map");
    assert_str("type(0..1)", "range");
    assert_str("fn f() => 1\ntype(f)", "fn");
    assert_str("type(len)", "builtin");
}

#[test]
fn str_int_float_conversions() {
    assert_str("str(42)", "42");
    assert_str("str(none)", "none");
    assert_int("int(\"42\")", 42);
    assert_int("int(3.9)", 3);
    assert_int("int(true)", 1);
    assert_float("float(2)", 2.0);
    assert_float("float(\"3.5\")", 3.5);
    assert_failure("int(\"abc\")", "cannot convert");
}

#[test]
fn int_str_round_trip() {
    for n in [0i64, 1, -1, 41, -123_456_789, 9_223_372_036_854_775_807] {
        assert_int(&format!("int(str({n}))"), n);
    }
}

#[test]
fn assert_builtin() {
    assert_success("assert(1 == 1)");
    assert_failure("assert(1 == 2)", "assertion failed");
    assert_failure("assert(false, \"boom\")", "boom");
}

#[test]
fn array_materializes_ranges() {
    assert_bool("array(0..3) == [0, 1, 2]", true);
    assert_bool("array(3..0 step -1) == [3, 2, 1]", true);
    assert_failure("array([1])", "must be a range");
}

#[test]
fn higher_order_builtins() {
    assert_bool("filter([1, 2, 3, 4], fn(x) => x % 2 == 0) == [2, 4]", true);
    assert_bool("map([1, 2, 3], fn(x) => x * 10) == [10, 20, 30]", true);
    assert_int("reduce([1, 2, 3, 4], 0, fn(acc, x) => acc + x)", 10);
    assert_bool("reverse([1, 2, 3]) == [3, 2, 1]", true);
}

#[test]
fn sort_orders_naturally_and_with_comparators() {
    assert_bool("sort([3, 1, 2]) == [1, 2, 3]", true);
    assert_bool("sort([\"b\", \"a\"]) == [\"a\", \"b\"]", true);
    assert_bool("sort([3, 1, 2], fn(a, b) => b - a) == [3, 2, 1]", true);
    assert_failure("sort([1, \"a\"])", "cannot compare");
}

#[test]
fn sort_reverse_sort_law() {
    assert_bool("let a = [5, 3, 9, 1]\nsort(reverse(sort(a))) == sort(a)", true);
}

#[test]
fn keys_and_values_are_key_sorted() {
    assert_bool("keys({\"b\": 2, \"a\": 1}) == [\"a\", \"b\"]", true);
    assert_bool("values({\"b\": 2, \"a\": 1}) == [1, 2]", true);
    assert_bool("has({\"a\": 1}, \"a\")", true);
    assert_bool("has({\"a\": 1}, \"z\")", false);
}

#[test]
fn builtins_compose_with_pipelines() {
    let source = "array(1..6) |> filter(fn(x) => x % 2 == 1) |> map(fn(x) => x * x) \
                  |> reduce(0, fn(acc, x) => acc + x)";
    // 1 + 9 + 25
    assert_int(source, 35);
}

// ---------------------------------------------------------------------
// Parsing and diagnostics
// ---------------------------------------------------------------------

#[test]
fn parse_errors_are_reported_not_panicked() {
    assert_failure("let = 5", "parse error");
    assert_failure("1 +", "parse error");
    assert_failure("x = ", "parse error");
}

#[test]
fn parser_recovers_and_reports_multiple_diagnostics() {
    let tokens = lexer::scan("let = 1\nmut = 2\nlet ok = 3", "test");
    let (program, diagnostics) = parser::core::parse(tokens);
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn illegal_characters_are_parse_errors() {
    assert_failure("let x = 1 @ 2", "illegal character");
}

#[test]
fn test_blocks_are_noops_under_run() {
    assert_int("test \"never runs here\" { assert(false) }\n42", 42);
}

// ---------------------------------------------------------------------
// Test runner
// ---------------------------------------------------------------------

fn run_test_blocks(source: &str) -> Vec<rill::interpreter::evaluator::test_runner::TestOutcome> {
    let tokens = lexer::scan(source, "test");
    let (program, diagnostics) = parser::core::parse(tokens);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");

    let env = Environment::new();
    builtins::register(&env);
    run_tests(&program, &env).expect("setup statements failed")
}

#[test]
fn test_runner_reports_pass_and_fail() {
    let source = "fn double(x) => x * 2\n\
                  test \"doubling works\" { assert(double(21) == 42) }\n\
                  test \"this one fails\" { assert(double(1) == 3, \"bad double\") }";
    let outcomes = run_test_blocks(source);
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].passed);
    assert!(!outcomes[1].passed);
    assert_eq!(outcomes[1].message.as_deref(), Some("bad double"));
}

#[test]
fn test_bodies_run_in_their_own_scope() {
    let source = "test \"a\" { let local = 1\nassert(local == 1) }\n\
                  test \"b\" { let local = 2\nassert(local == 2) }";
    let outcomes = run_test_blocks(source);
    assert!(outcomes.iter().all(|outcome| outcome.passed));
}

#[test]
fn return_escaping_a_test_body_fails_that_test() {
    let outcomes = run_test_blocks("test \"stray return\" { return 1 }");
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].passed);
    assert_eq!(outcomes[0].message.as_deref(), Some("return outside function"));
}

// ---------------------------------------------------------------------
// Example scripts
// ---------------------------------------------------------------------

#[test]
fn example_scripts_run_clean() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| {
                                         e.path().extension().is_some_and(|ext| ext == "rill")
                                     })
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"));
        count += 1;
        if let Err(e) = execute(&source, &path.to_string_lossy()) {
            panic!("script {path:?} failed: {e}");
        }
    }

    assert!(count > 0, "no example scripts found in tests/scripts");
}
