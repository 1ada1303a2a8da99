//! Gridlang compiler CLI.
//!
//! Provides the `gridlang` binary. Currently supports `compile`, which
//! loads a JSON graph document, builds the module, and emits Erlang
//! source. Diagnostics go to stderr; the generated source goes to stdout
//! or to a file, even when the compile found problems -- the source is
//! partial in that case and the exit code says so.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use gridlang_codegen::emit_module;

mod document;

use document::ModuleDoc;

/// Gridlang graph compiler and tools.
#[derive(Parser)]
#[command(name = "gridlang", about = "Gridlang graph compiler and tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON graph document to Erlang source.
    Compile {
        /// Path to the graph document.
        input: PathBuf,

        /// Write the generated source to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile { input, output } => {
            process::exit(run_compile(&input, output.as_deref()));
        }
    }
}

/// Execute the compile subcommand.
///
/// Returns exit code: 0 = compiled clean, 1 = compiled with diagnostics,
/// 2 = malformed document, 3 = I/O error.
fn run_compile(input: &Path, output: Option<&Path>) -> i32 {
    let text = match fs::read_to_string(input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", input.display(), e);
            return 3;
        }
    };

    let doc: ModuleDoc = match serde_json::from_str(&text) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: malformed document: {}", e);
            return 2;
        }
    };

    let module = match document::build_module(&doc) {
        Ok(module) => module,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    let result = emit_module(&module);

    for diagnostic in &result.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, &result.source) {
                eprintln!("Error: failed to write '{}': {}", path.display(), e);
                return 3;
            }
        }
        None => print!("{}", result.source),
    }

    if result.diagnostics.is_empty() {
        0
    } else {
        1
    }
}
