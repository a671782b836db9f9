//! Common test utilities for Tusmo integration tests.

// Each test file is compiled as a separate crate, so not all helpers are
// used in every test file.
#![allow(dead_code)]

use tusmo::driver::{self, BuildOutput, CompileError};

use std::path::{Path, PathBuf};

/// Compiles an in-memory program through the full pipeline.
pub fn compile(source: &str) -> Result<BuildOutput, CompileError> {
    driver::compile_source(source, "test.tus")
}

/// Compiles and unwraps, panicking with the error on failure.
pub fn compile_ok(source: &str) -> BuildOutput {
    match compile(source) {
        Ok(output) => output,
        Err(error) => panic!("compilation failed: {}", error),
    }
}

/// Compiles and returns the error, panicking on success.
pub fn compile_err(source: &str) -> CompileError {
    match compile(source) {
        Ok(_) => panic!("expected a compilation error"),
        Err(error) => error,
    }
}

/// Writes `contents` under `dir` and returns the full path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

/// Returns the path to the `tusmo` binary built by cargo.
pub fn tusmo_binary() -> String {
    env!("CARGO_BIN_EXE_tusmo").to_string()
}
