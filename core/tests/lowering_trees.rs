use serpent_core::ast::{AstNode, AstNodeKind, CompareOperator, Constant, Param, TypeExpr};
use serpent_core::lower::Lowerer;
use serpent_core::{Config, ErrorKind, Location, Script, SerpentErrorExt};

fn name(id: &str) -> AstNode {
    AstNode::bare(AstNodeKind::Name { id: id.to_string() })
}

fn int(value: i64) -> AstNode {
    AstNode::bare(AstNodeKind::Constant { value: Constant::Int(value) })
}

fn assign(target: &str, value: AstNode) -> AstNode {
    AstNode::bare(AstNodeKind::Assign {
        targets: vec![name(target)],
        value: Box::new(value),
    })
}

fn module(body: Vec<AstNode>) -> AstNode {
    AstNode::bare(AstNodeKind::Module { body })
}

fn lower(tree: &AstNode) -> Result<String, serpent_core::TranslateError> {
    Lowerer::detached("built.py", &Config::default()).lower(tree)
}

#[test]
fn chained_compare_from_hand_built_tree() {
    let compare = AstNode::bare(AstNodeKind::Compare {
        left: Box::new(name("a")),
        ops: vec![CompareOperator::Lt, CompareOperator::Lt],
        comparators: vec![name("b"), name("c")],
    });
    let cpp = lower(&module(vec![assign("r", compare)])).expect("lower");
    assert_eq!(cpp, "\n\nauto r = (a < b) && (b < c);\n");
}

#[test]
fn declarations_persist_across_sibling_branches() {
    let tree = module(vec![
        AstNode::bare(AstNodeKind::If {
            test: Box::new(name("flag")),
            body: vec![assign("v", int(1))],
            orelse: vec![assign("v", int(2))],
        }),
        assign("v", int(3)),
    ]);
    let cpp = lower(&tree).expect("lower");
    assert_eq!(
        cpp,
        "\n\nif (flag)\n{\n    auto v = 1;\n} else {\n    v = 2;\n}\nv = 3;\n"
    );
}

#[test]
fn try_with_finally_fails_without_output() {
    let tree = module(vec![AstNode::bare(AstNodeKind::Try {
        body: vec![assign("x", int(1))],
        handlers: vec![],
        orelse: vec![],
        finalbody: vec![AstNode::bare(AstNodeKind::Pass)],
    })]);
    let err = lower(&tree).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Translation);
    assert!(err.to_string().contains("failed to compile due to: "));
}

#[test]
fn innermost_location_is_reported() {
    let at = |line| Location::new("built.py".to_string(), line, 1);
    let bad = AstNode::bare(AstNodeKind::AnnAssign {
        target: Box::new(name("d")),
        annotation: TypeExpr::named("dict"),
        value: None,
    })
    .with_location(at(4));
    let function = AstNode::bare(AstNodeKind::FunctionDef {
        name: "f".to_string(),
        params: vec![],
        returns: Some(TypeExpr::named("None")),
        body: vec![bad],
    })
    .with_location(at(2));
    let err = lower(&module(vec![function]).with_location(at(1))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "<File \"built.py\", line 4> failed to compile due to: No conversion for dict is known"
    );
    assert_eq!(err.location().map(|l| l.line), Some(4));
}

#[test]
fn return_type_falls_back_to_the_header_line() {
    let script = Script::from_source("header.py", "def label() -> str:\n    pass\n");
    let function = AstNode::bare(AstNodeKind::FunctionDef {
        name: "label".to_string(),
        params: vec![],
        returns: None,
        body: vec![],
    })
    .with_location(Location::new("header.py".to_string(), 1, 1));
    let cpp = Lowerer::new(&script, &Config::default())
        .lower(&module(vec![function]))
        .expect("lower");
    assert_eq!(cpp, "#include <string>\n\n\nstd::string label () {\n}\n");
}

#[test]
fn receiver_parameter_without_annotation_is_elided_in_classes() {
    let method = AstNode::bare(AstNodeKind::FunctionDef {
        name: "size".to_string(),
        params: vec![
            Param { name: "self".to_string(), annotation: None },
            Param { name: "scale".to_string(), annotation: Some(TypeExpr::named("float")) },
        ],
        returns: Some(TypeExpr::named("int")),
        body: vec![],
    });
    let class = AstNode::bare(AstNodeKind::ClassDef {
        name: "Box".to_string(),
        bases: vec![],
        body: vec![method],
    });
    let cpp = lower(&module(vec![class])).expect("lower");
    assert_eq!(cpp, "\n\nstruct Box {\n    int size (double scale) {\n    }\n};\n");
}

#[test]
fn non_finite_float_literal_is_rejected() {
    let nan = AstNode::bare(AstNodeKind::Constant { value: Constant::Float(f64::NAN) });
    let err = lower(&module(vec![assign("x", nan)])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Translation);
}

#[test]
fn failed_lowering_leaves_indentation_balanced() {
    // The loop body fails inside an indent scope; the state must not leak.
    let mut lowerer = Lowerer::detached("built.py", &Config::default());
    let tree = AstNode::bare(AstNodeKind::While {
        test: Box::new(name("go")),
        body: vec![AstNode::bare(AstNodeKind::Expr {
            value: Box::new(AstNode::bare(AstNodeKind::Call {
                func: Box::new(name("f")),
                args: vec![],
                keywords: vec![serpent_core::ast::Keyword { name: Some("k".into()), value: int(1) }],
            })),
        })],
        orelse: vec![],
    });
    assert!(lowerer.visit(&tree).is_err());
    assert_eq!(lowerer.state().buffer.depth(), 0);
}
