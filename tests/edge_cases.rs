//! Boundary conditions, malformed input, and uncommon syntax combinations
//! that might expose parser or type-checker bugs.

use staticlang_parser::parse;

// ===== Boundary conditions =====

#[test]
fn minimal_valid_programs() {
    let programs = ["", ";", "long x = 0;", "true;"];
    for source in programs {
        let result = parse(source);
        assert!(result.program.is_some(), "`{source}` should parse");
    }
}

#[test]
fn numeric_literal_edge_cases() {
    let programs = [
        "long x = 0;",
        "long x = 1ah;",  // hex via the 'h' suffix
        "float x = 0f;",
        "float x = 0.0;",
        "float x = 123f;",
    ];
    for source in programs {
        let result = parse(source);
        assert!(result.program.is_some(), "`{source}` should parse");
    }
}

#[test]
fn empty_array_literal_stays_auto_until_indexed_use() {
    // An empty array literal never concretizes its `auto` element type from
    // an element, but an explicit `array<long>` declared type still seeds it.
    let result = parse("array<long> xs = [];");
    assert!(result.program.is_some());
}

#[test]
fn deeply_nested_parentheses_in_an_expression() {
    let source = "long x = (((((1 + 2)))));";
    let result = parse(source);
    assert!(result.program.is_some());
}

#[test]
fn chained_postfix_operations_on_a_call_result() {
    let source = "auto make = proc<>() return array<long> { return [1, 2, 3]; }; long x = make()[0];";
    let result = parse(source);
    assert!(result.program.is_some(), "{:?}", result.diagnostics);
}

// ===== Malformed input =====

#[test]
fn unclosed_brace_is_rejected() {
    let result = parse("if (true) { long x = 1;");
    assert!(result.program.is_none());
}

#[test]
fn unclosed_paren_in_call_is_rejected() {
    let source = "auto f = proc<>() return nothing {}; f(;";
    let result = parse(source);
    assert!(result.program.is_none());
}

#[test]
fn missing_semicolon_is_rejected() {
    let result = parse("long x = 1");
    assert!(result.program.is_none());
}

#[test]
fn missing_initializer_is_rejected() {
    let result = parse("long x;");
    assert!(result.program.is_none());
}

#[test]
fn unterminated_string_literal_is_rejected() {
    let result = parse("array<char> s = \"abc;");
    assert!(result.program.is_none());
}

// ===== Uncommon but legal syntax =====

#[test]
fn less_than_after_a_non_generic_value_is_a_comparison_not_an_instantiation() {
    let result = parse("long x = 1; bool lt = x < 2;");
    assert!(result.program.is_some(), "{:?}", result.diagnostics);
}

#[test]
fn generic_proc_without_explicit_type_args_is_an_error() {
    let source = "auto id = proc<T>(T x) return T { return x; }; long r = id(5);";
    let result = parse(source);
    assert!(result.program.is_none());
}

#[test]
fn non_generic_proc_literal_omits_the_angle_brackets() {
    let source = "auto add = proc(long a, long b) return long { return a + b; }; long r = add(1, 2);";
    let result = parse(source);
    assert!(result.program.is_some(), "{:?}", result.diagnostics);
}

#[test]
fn procedure_parameters_are_readonly() {
    let source = "auto f = proc<>(long x) return long { x = x + 1; return x; };";
    let result = parse(source);
    assert!(result.program.is_none());
}

#[test]
fn thisproc_inside_a_nested_non_recursive_literal_binds_to_the_inner_literal() {
    // `thisproc` always resolves against the nearest enclosing procedure
    // literal's own binding, never an outer one.
    let source = "auto outer = proc<>() return long { auto inner = proc<>() return long { return 1; }; return inner(); };";
    let result = parse(source);
    assert!(result.program.is_some(), "{:?}", result.diagnostics);
}

#[test]
fn shadowing_a_parameter_in_a_nested_block_is_allowed() {
    let source = "auto f = proc<>(long x) return long { long x = x + 1; return x; };";
    let result = parse(source);
    assert!(result.program.is_some(), "{:?}", result.diagnostics);
}

#[test]
fn comments_are_ignored_between_tokens() {
    let source = "// leading comment\nlong x /* inline */ = 1; // trailing\n";
    let result = parse(source);
    assert!(result.program.is_some());
}

#[test]
fn unary_operators_compose() {
    let result = parse("long x = 1; bool b = !(x == 1); long n = -x; long l = #([1, 2, 3]);");
    assert!(result.program.is_some(), "{:?}", result.diagnostics);
}

#[test]
fn operator_precedence_is_respected_across_all_tiers() {
    // `**` > `* / %` > `+ -` > comparisons > `&& ||`
    let result = parse("bool b = 1 + 2 * 3 > 5 && 2 ** 2 == 4 || false;");
    assert!(result.program.is_some(), "{:?}", result.diagnostics);
}

// ===== Reserved-word enforcement =====

#[test]
fn thisproc_cannot_be_used_as_a_declaration_name() {
    // `thisproc` is a keyword (not `Identifier`), so it can never be
    // declared as a variable name.
    let result = parse("long thisproc = 1;");
    assert!(result.program.is_none());
}

#[test]
fn type_keywords_cannot_be_used_as_identifiers() {
    let result = parse("long long = 1;");
    assert!(result.program.is_none());
}
