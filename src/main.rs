//! The Tusmo compiler CLI.
//!
//! `tusmo build` writes the C translation unit next to the input (or to
//! `-o`) and prints the runtime feature tags on stdout, one line, space
//! separated; an external build driver consumes those tags to pick which
//! runtime sources to compile and link. `tusmo emit` prints the C to
//! stdout instead. Neither invokes a C compiler.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tusmo::driver::{self, BuildOutput};

mod diagnostics;

/// Command-line interface for the Tusmo compiler.
#[derive(Parser)]
#[command(name = "tusmo")]
#[command(about = "The Tusmo programming language compiler", long_about = None)]
struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Compile a Tusmo program into a C translation unit.
    Build {
        /// The source file to compile (e.g., `salaan.tus`).
        file: PathBuf,

        /// Output path for the C file.
        /// If not specified, uses the input filename with a `.c` extension.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Standard-library root, searched after the importing file's
        /// directory and the project `lib/` root.
        #[arg(long = "stdlib")]
        stdlib: Option<PathBuf>,
    },
    /// Compile a Tusmo program and print the C to stdout.
    Emit {
        /// The source file to compile.
        file: PathBuf,

        /// Standard-library root.
        #[arg(long = "stdlib")]
        stdlib: Option<PathBuf>,
    },
}

/// Entry point for the Tusmo compiler.
fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            file,
            output,
            stdlib,
        } => {
            let result = driver::compile_file(&file, stdlib.as_deref());
            let build = unwrap_or_report(result);
            let out_path = output.unwrap_or_else(|| file.with_extension("c"));
            if let Err(error) = std::fs::write(&out_path, &build.c_code) {
                eprintln!(
                    "Error: failed to write '{}': {}",
                    out_path.display(),
                    error
                );
                std::process::exit(1);
            }
            // The feature tags for the external build driver.
            println!("{}", build.features);
        }
        Commands::Emit { file, stdlib } => {
            let result = driver::compile_file(&file, stdlib.as_deref());
            let build = unwrap_or_report(result);
            print!("{}", build.c_code);
        }
    }
}

fn unwrap_or_report(result: Result<BuildOutput, driver::CompileError>) -> BuildOutput {
    match result {
        Ok(build) => {
            for diagnostic in &build.lex_diagnostics {
                eprintln!("{}", diagnostic);
            }
            build
        }
        Err(error) => {
            diagnostics::report(&error);
            std::process::exit(1);
        }
    }
}
