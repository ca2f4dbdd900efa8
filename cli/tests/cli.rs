use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

fn serpent() -> Command {
    Command::cargo_bin("serpent").unwrap()
}

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("demos")
        .join(name)
        .join("main.py")
}

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn have_compiler() -> bool {
    !cpp_toolchain::find_available_compilers().is_empty()
}

#[test]
fn translate_prints_cpp_to_stdout() {
    let output = serpent().arg("translate").arg(demo("loops")).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#include <vector>\n"));
    assert!(stdout.contains("for (auto& value : values) {"));
}

#[test]
fn translate_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let src = write(dir.path(), "main.py", "def main() -> int:\n    return 0\n");
    let out = dir.path().join("out/main.cpp");
    serpent().arg("translate").arg(&src).arg("-o").arg(&out).assert().success();
    assert_eq!(fs::read_to_string(out).unwrap(), "\n\nint main () {\n    return 0;\n}\n");
}

#[test]
fn translation_errors_exit_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let src = write(dir.path(), "bad.py", "x = 1\ny = x ** 2\n");
    let output = serpent().arg("translate").arg(&src).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("** is an unsupported operator"));
    assert!(stderr.contains("y = x ** 2"));
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    serpent()
        .arg("translate")
        .arg(dir.path().join("absent.py"))
        .assert()
        .code(2);
}

#[test]
fn invalid_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.py", "x = 1\n");
    write(dir.path(), "serpent.json", "{\"indent_width\": 0}");
    serpent().arg("build").arg(dir.path()).assert().code(2);
}

#[test]
fn build_reports_failures_as_json() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.py", "r = 2 ** 3\n");
    write(dir.path(), "b.py", "r = 1\n");

    let output = serpent()
        .args(["build", "--format", "json"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["stage"], "translate");
    assert_eq!(reports[0]["severity"], "Error");
    assert_eq!(reports[0]["location"]["line"], 1);
    assert!(!dir.path().join("cpp/b.cpp").exists());
}

#[test]
fn compilers_json_is_an_array() {
    let output = serpent().args(["compilers", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value.is_array());
}

#[test]
fn run_builds_and_executes_the_project() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "main.py",
        "def main() -> int:\n    print(\"hello from serpent\")\n    return 0\n",
    );

    let output = serpent().arg("run").arg(dir.path()).output().unwrap();
    if !have_compiler() {
        assert_eq!(output.status.code(), Some(2));
        return;
    }
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("hello from serpent"));
    assert!(dir.path().join("cpp/main.cpp").exists());
    assert!(dir.path().join("obj/main.o").exists());
}

#[test]
fn printed_literals_match_their_source_values() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "main.py",
        "def main() -> int:\n    print(True)\n    print(False)\n    print(3)\n    print(\"s\")\n    print(2.5)\n    return 0\n",
    );

    let output = serpent().arg("run").arg(dir.path()).output().unwrap();
    if !have_compiler() {
        assert_eq!(output.status.code(), Some(2));
        return;
    }
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("true\nfalse\n3\ns\n2.5\n"), "{}", stdout);
}
