use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Parser)]
#[command(name = "mdc")]
#[command(about = "mdc — markdown to HTML compiler")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a markdown file to a sibling .html file
    Build {
        /// Input markdown file
        #[arg(default_value = "test.md")]
        path: String,

        /// Print the first error and keep the partial output instead of
        /// failing (for inspecting what was produced up to the error)
        #[arg(long)]
        diagnostics: bool,
    },

    /// Check a markdown file for errors without writing output
    Check {
        /// Input markdown file
        #[arg(default_value = "test.md")]
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { path, diagnostics } => cmd_build(&path, diagnostics),
        Command::Check { path } => cmd_check(&path),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_build(path: &str, diagnostics: bool) {
    let source = read_source(path);

    // The full document is rendered before anything touches the filesystem,
    // so a failed compile never leaves a partial output file behind.
    let html = match mdc_codegen::compile(&source, diagnostics) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let dir = Path::new(path).parent().unwrap_or(Path::new("."));
    let html_path = dir.join(format!("{stem}.html"));

    if let Err(e) = std::fs::write(&html_path, &html) {
        eprintln!("Error writing {}: {e}", html_path.display());
        std::process::exit(1);
    }

    eprintln!("Built: {}", html_path.display());
}

fn cmd_check(path: &str) {
    let source = read_source(path);

    if let Err(e) = mdc_parser::parse(&source) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    // Parsing alone misses generation-time problems; run the full pipeline.
    if let Err(e) = mdc_codegen::compile(&source, false) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    eprintln!("OK: {path}");
}
