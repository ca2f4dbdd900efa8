use serpent_core::{translate_source, Config, ErrorKind, Script, TranslateError};

fn translate(src: &str) -> Result<String, TranslateError> {
    let script = Script::from_source("test.py", src);
    translate_source(&script, &Config::default())
}

fn body(src: &str) -> String {
    let cpp = translate(src).expect("translate");
    let (_, body) = cpp.split_once("\n\n").expect("separator");
    body.trim_start_matches('\n').to_string()
}

#[test]
fn print_parenthesizes_compound_arguments_only() {
    let cpp = translate("print(\"x:\", 1 + 2)\n").expect("translate");
    assert_eq!(cpp, "#include <iostream>\n\n\nstd::cout << \"x:\" << (1 + 2) << \"\\n\";\n");
}

#[test]
fn print_without_arguments_emits_newline() {
    assert_eq!(body("print()\n"), "std::cout << \"\\n\";\n");
}

#[test]
fn printing_boolean_literals_switches_to_boolalpha() {
    assert_eq!(
        body("print(True, 1)\n"),
        "std::cout << std::boolalpha << true << 1 << \"\\n\";\n"
    );
    assert_eq!(body("print(1.5)\n"), "std::cout << 1.5 << \"\\n\";\n");
}

#[test]
fn chained_comparison_expands_to_conjunction() {
    assert_eq!(body("r = a < b < c\n"), "auto r = (a < b) && (b < c);\n");
}

#[test]
fn single_comparison_is_bare() {
    assert_eq!(body("r = a >= b\n"), "auto r = a >= b;\n");
}

#[test]
fn nested_operators_keep_grouping() {
    assert_eq!(body("r = (1 + 2) * 3\n"), "auto r = (1 + 2) * 3;\n");
    assert_eq!(body("r = a and b or c\n"), "auto r = (a && b) || c;\n");
    assert_eq!(body("r = not (a or b)\n"), "auto r = !(a || b);\n");
    assert_eq!(body("r = -x\n"), "auto r = -x;\n");
    assert_eq!(body("r = x & 1 == 0\n"), "auto r = (x & 1) == 0;\n");
}

#[test]
fn division_variants_share_the_cpp_operator() {
    assert_eq!(body("r = 7 // 3\n"), "auto r = 7 / 3;\n");
    assert_eq!(body("r = 4.5 / 2\n"), "auto r = 4.5 / 2;\n");
}

#[test]
fn power_operator_is_unknown() {
    let err = translate("r = 2 ** 8\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownOperator);
    assert_eq!(err.root_cause().to_string(), "** is an unsupported operator");
}

#[test]
fn membership_test_is_unknown() {
    let err = translate("r = a in b\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownOperator);
}

#[test]
fn constants_render_as_cpp_literals() {
    assert_eq!(body("a = True\n"), "auto a = true;\n");
    assert_eq!(body("a = 2.0\n"), "auto a = 2.0;\n");
    assert_eq!(body("a = None\n"), "auto a = nullptr;\n");
    assert_eq!(body("a = \"say \\\"hi\\\"\"\n"), "auto a = \"say \\\"hi\\\"\";\n");
}

#[test]
fn first_assignment_declares_once() {
    assert_eq!(body("x = 1\nx = 2\n"), "auto x = 1;\nx = 2;\n");
}

#[test]
fn annotated_assignment_always_spells_the_type() {
    let cpp = translate("x = 1\nx: int = 2\ny: float\n").expect("translate");
    assert_eq!(cpp, "\n\nauto x = 1;\nint x = 2;\ndouble y;\n");
}

#[test]
fn sequences_become_braced_initializers() {
    assert_eq!(body("xs = [1, 2]\n"), "auto xs = {\n    1,\n    2\n};\n");
    assert_eq!(body("t = (1, 0)\n"), "auto t = {\n    1,\n    0\n};\n");
}

#[test]
fn annotated_empty_list() {
    let cpp = translate("names: List[str] = []\n").expect("translate");
    assert_eq!(
        cpp,
        "#include <string>\n#include <vector>\n\n\nstd::vector<std::string> names = {\n};\n"
    );
}

#[test]
fn subscripts_read_and_assign_without_declaring() {
    assert_eq!(body("xs[0] = 5\ny = xs[1]\n"), "xs[0] = 5;\nauto y = xs[1];\n");
}

#[test]
fn attribute_access_outside_receiver() {
    assert_eq!(body("n = p.x\np.x = 2\n"), "auto n = p.x;\np.x = 2;\n");
}

#[test]
fn calls_to_known_types_are_rewritten() {
    assert_eq!(body("n = int(3.5)\n"), "auto n = int(3.5);\n");
    let cpp = translate("s = str()\n").expect("translate");
    assert_eq!(cpp, "#include <string>\n\n\nauto s = std::string();\n");
}

#[test]
fn plain_calls_keep_their_arguments() {
    assert_eq!(body("run(a, 1)\nobj.go()\n"), "run(a, 1);\nobj.go();\n");
}

#[test]
fn keyword_arguments_are_rejected() {
    let err = translate("run(a, flag=True)\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Translation);
    assert_eq!(err.root_cause().to_string(), "C++ does not support named arguments");
}

#[test]
fn chained_and_tuple_assignments_are_rejected() {
    assert_eq!(translate("a = b = 1\n").unwrap_err().kind(), ErrorKind::Translation);
    assert_eq!(translate("a, b = 1, 2\n").unwrap_err().kind(), ErrorKind::Translation);
}

#[test]
fn imports_and_pass_emit_nothing() {
    assert_eq!(body("import os\nfrom typing import List\npass\n"), "");
}
