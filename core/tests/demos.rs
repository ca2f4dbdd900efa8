use std::path::PathBuf;

use serpent_core::{translate_file, Config};

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("demos")
        .join(name)
        .join("main.py")
}

fn translate_demo(name: &str) -> String {
    match translate_file(demo(name), &Config::default()) {
        Ok(cpp) => cpp,
        Err(err) => panic!("{} failed: {}", name, err),
    }
}

#[test]
fn classes_demo() {
    let cpp = translate_demo("classes");
    assert!(cpp.contains("#include <iostream>\n"));
    assert!(cpp.contains("#include <string>\n"));
    assert!(cpp.contains("struct Account {\n    std::string owner;\n    int balance;\n"));
    assert!(cpp.contains("    Account (std::string owner, int balance) {\n        this->owner = owner;\n"));
    assert!(cpp.contains("    void describe () {\n        std::cout << (this->owner) << \": \" << (this->balance) << \"\\n\";\n    }\n"));
    assert!(cpp.contains("        this->balance += amount;\n"));
    assert!(cpp.contains("    auto account = Account(\"Ada\", 10);\n"));
}

#[test]
fn exceptions_demo() {
    let cpp = translate_demo("exceptions");
    assert!(cpp.contains("#include <stdexcept>\n"));
    assert!(cpp.contains("        throw std::runtime_error(\"limit too high\");\n"));
    assert!(cpp.contains("    catch (std::exception& e){\n"));
}

#[test]
fn operators_demo() {
    let cpp = translate_demo("operators");
    assert!(cpp.contains("std::cout << \"7 // 3: \" << (7 / 3) << \"\\n\";"));
    assert!(cpp.contains("    auto a = 1 << 2;\n"));
    assert!(cpp.contains("    t = t || f;\n"));
    assert!(cpp.contains("    if ((1 < a) && (a < 8))\n    {\n"));
}

#[test]
fn loops_demo() {
    let cpp = translate_demo("loops");
    assert!(cpp.contains("#include <vector>\n"));
    assert!(cpp.contains("    while (i < count)\n    {\n        i += 1;\n"));
    assert!(cpp.contains("    std::vector<int> values = {\n        1,\n        2,\n        3\n    };\n"));
    assert!(cpp.contains("    for (auto& value : values) {\n"));
    assert!(cpp.contains("        total += fibonacci(value);\n"));
}
