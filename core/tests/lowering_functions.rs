use serpent_core::{translate_source, Config, ErrorKind, Script, TranslateError};

fn translate(src: &str) -> Result<String, TranslateError> {
    let script = Script::from_source("test.py", src);
    translate_source(&script, &Config::default())
}

#[test]
fn add_function_lowers_to_int_function() {
    let cpp = translate("def add(a: int, b: int) -> int:\n    return a + b\n").expect("translate");
    assert_eq!(cpp, "\n\nint add (int a, int b) {\n    return a + b;\n}\n");
}

#[test]
fn string_parameters_pull_in_string_header() {
    let cpp = translate("def greet(name: str) -> str:\n    return name\n").expect("translate");
    assert_eq!(
        cpp,
        "#include <string>\n\n\nstd::string greet (std::string name) {\n    return name;\n}\n"
    );
}

#[test]
fn generic_annotations_render_template_arguments() {
    let cpp = translate("def total(xs: List[int]) -> int:\n    return 0\n").expect("translate");
    assert!(cpp.starts_with("#include <vector>\n\n\n"));
    assert!(cpp.contains("int total (std::vector<int> xs) {\n"));
}

#[test]
fn heterogeneous_tuple_annotation_is_rejected() {
    let err = translate("def pair(p: Tuple[int, str]) -> int:\n    return 0\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownType);
}

#[test]
fn type_arguments_only_fit_sequence_types() {
    let err = translate("def f(x: int[str]) -> int:\n    return 0\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownType);
    assert!(err.to_string().ends_with("No conversion for int[str] is known: int takes no type arguments"));

    let err = translate("def f(xs: List[int, int]) -> int:\n    return 0\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownType);
    assert!(err.to_string().ends_with("List takes exactly one type argument"));

    let cpp = translate("def f(p: Tuple[int, int]) -> int:\n    return 0\n").expect("translate");
    assert!(cpp.contains("int f (std::vector<int> p) {\n"));
}

#[test]
fn missing_return_annotation_is_a_function_type_error() {
    let err = translate("def f(x: int):\n    return x\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FunctionType);
    assert!(err.to_string().starts_with("<File \"test.py\", line 1> failed to compile due to: "));
}

#[test]
fn unannotated_parameter_is_rejected() {
    let err = translate("def f(x) -> int:\n    return 1\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Translation);
    assert_eq!(err.root_cause().to_string(), "Unknown type for x");
}

#[test]
fn bare_return_and_return_none_emit_empty_return() {
    let cpp = translate("def f() -> None:\n    return\n\ndef g() -> None:\n    return None\n")
        .expect("translate");
    assert_eq!(cpp, "\n\nvoid f () {\n    return;\n}\nvoid g () {\n    return;\n}\n");
}

#[test]
fn class_with_base_and_constructor() {
    let src = "\
class Point(Base):
    x: int

    def __init__(self, x: int):
        self.x = x

    def get(self) -> int:
        return self.x
";
    let cpp = translate(src).expect("translate");
    assert_eq!(
        cpp,
        "\n\nstruct Point : Base {\n    int x;\n    Point (int x) {\n        this->x = x;\n    }\n    int get () {\n        return this->x;\n    }\n};\n"
    );
}

#[test]
fn method_named_after_class_is_a_constructor() {
    let src = "class Counter:\n    def Counter(self):\n        self.n = 0\n";
    let cpp = translate(src).expect("translate");
    assert_eq!(cpp, "\n\nstruct Counter {\n    Counter () {\n        this->n = 0;\n    }\n};\n");
}

#[test]
fn init_ignores_return_annotation() {
    let src = "class A:\n    def __init__(self) -> None:\n        pass\n";
    let cpp = translate(src).expect("translate");
    assert_eq!(cpp, "\n\nstruct A {\n    A () {\n    }\n};\n");
}

#[test]
fn multiple_bases_are_comma_joined_and_exceptions_mapped() {
    let src = "class Failure(RuntimeError, Mixin):\n    pass\n";
    let cpp = translate(src).expect("translate");
    assert_eq!(cpp, "#include <stdexcept>\n\n\nstruct Failure : std::runtime_error, Mixin {\n};\n");
}

#[test]
fn receiver_is_only_elided_inside_classes() {
    let src = "class A:\n    pass\n\ndef helper(self: int) -> int:\n    return self\n";
    let cpp = translate(src).expect("translate");
    assert!(cpp.contains("int helper (int self) {\n"));
}

#[test]
fn custom_receiver_name_from_config() {
    let script = Script::from_source("test.py", "class A:\n    def get(me) -> int:\n        return me.v\n");
    let config = Config {
        receiver: "me".to_string(),
        ..Config::default()
    };
    let cpp = translate_source(&script, &config).expect("translate");
    assert!(cpp.contains("    int get () {\n        return this->v;\n    }\n"));
}

#[test]
fn indent_width_comes_from_config() {
    let script = Script::from_source("test.py", "def f() -> int:\n    return 1\n");
    let config = Config {
        indent_width: 2,
        ..Config::default()
    };
    let cpp = translate_source(&script, &config).expect("translate");
    assert_eq!(cpp, "\n\nint f () {\n  return 1;\n}\n");
}
