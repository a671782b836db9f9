//! CLI behavior: the `build` and `emit` subcommands, exit codes, and the
//! published feature tags.

mod common;

use common::{tusmo_binary, write_file};
use std::process::Command;

#[test]
fn test_build_writes_c_file_and_prints_tags() {
    let temp = tempfile::tempdir().unwrap();
    let entry = write_file(temp.path(), "salaan.tus", "qor(\"salaan\");\n");

    let output = Command::new(tusmo_binary())
        .arg("build")
        .arg(&entry)
        .output()
        .expect("failed to run tusmo");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "io");

    let c_path = temp.path().join("salaan.c");
    let c_code = std::fs::read_to_string(&c_path).unwrap();
    assert!(c_code.starts_with("#include \"tusmo_runtime.h\""));
}

#[test]
fn test_build_with_output_path() {
    let temp = tempfile::tempdir().unwrap();
    let entry = write_file(temp.path(), "barnaamij.tus", "keyd : tiro x = 1;\n");
    let out = temp.path().join("madax.c");

    let status = Command::new(tusmo_binary())
        .arg("build")
        .arg(&entry)
        .arg("-o")
        .arg(&out)
        .status()
        .expect("failed to run tusmo");

    assert!(status.success());
    assert!(out.is_file());
}

#[test]
fn test_emit_prints_c_to_stdout() {
    let temp = tempfile::tempdir().unwrap();
    let entry = write_file(temp.path(), "salaan.tus", "qor(7);\n");

    let output = Command::new(tusmo_binary())
        .arg("emit")
        .arg(&entry)
        .output()
        .expect("failed to run tusmo");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("printf(\"%d\", 7);"));
    assert!(stdout.contains("int main(void)"));
}

#[test]
fn test_error_exits_nonzero_and_writes_no_c() {
    let temp = tempfile::tempdir().unwrap();
    let entry = write_file(temp.path(), "qalad.tus", "qor(ma_jiro);\n");

    let output = Command::new(tusmo_binary())
        .arg("build")
        .arg(&entry)
        .output()
        .expect("failed to run tusmo");

    assert!(!output.status.success());
    // No partial C output is committed on failure.
    assert!(!temp.path().join("qalad.c").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ma_jiro"));
}

#[test]
fn test_missing_input_file_exits_nonzero() {
    let output = Command::new(tusmo_binary())
        .arg("build")
        .arg("/ma/jiro/waxba.tus")
        .output()
        .expect("failed to run tusmo");
    assert!(!output.status.success());
}

#[test]
fn test_stdlib_flag() {
    let temp = tempfile::tempdir().unwrap();
    let stdlib = temp.path().join("stdlib");
    write_file(&stdlib, "asaasi.tus", "keyd : tiro ASAASI = 9;\n");
    let entry = write_file(temp.path(), "main.tus", "keen \"asaasi\";\nqor(ASAASI);\n");

    let output = Command::new(tusmo_binary())
        .arg("build")
        .arg(&entry)
        .arg("--stdlib")
        .arg(&stdlib)
        .output()
        .expect("failed to run tusmo");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}
