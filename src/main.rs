//! CLI entry point for dirindex

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use dirindex::{
    ConsoleReporter, DirectoryWalker, Error, IndexConfig, OutputConfig, PageRenderer, WalkSummary,
};
use tracing_subscriber::{EnvFilter, fmt};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dirindex")]
#[command(
    about = "Generate an .html index of the files in a directory",
    long_about = "Generate an .html index of the files in a directory (recursion is off by \
                  default). Starts from the current directory or the folder given as the \
                  first argument. Optionally filter entries with --filter \"*.py\"."
)]
#[command(version)]
struct Args {
    /// Top folder from which to start generating indexes (default: current folder)
    top_dir: Option<PathBuf>,

    /// Do not ignore entries starting with .
    #[arg(short, long)]
    all: bool,

    /// Only include entries matching this glob
    #[arg(short, long, value_name = "PATTERN")]
    filter: Option<String>,

    /// Name of the generated file in every directory
    #[arg(
        short,
        long = "output-file",
        value_name = "FILENAME",
        default_value = dirindex::tree::DEFAULT_OUTPUT_FILE
    )]
    output_file: String,

    /// Recursively process nested directories
    #[arg(short, long)]
    recursive: bool,

    /// Print every processed entry (slow on large trees and slow terminals)
    #[arg(short, long)]
    verbose: bool,

    /// Render pages with this template instead of the built-in one
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: Args) -> Result<WalkSummary, Error> {
    let config = IndexConfig {
        show_all: args.all,
        recursive: args.recursive,
        verbose: args.verbose,
        filter: args.filter,
        output_file: args.output_file,
    };

    let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;
    let root = match args.top_dir {
        Some(path) if path.is_absolute() => path,
        Some(path) => cwd.join(path),
        None => cwd,
    };

    // Validates the filter before anything is written
    let walker = DirectoryWalker::new(config)?;

    if let Some(template) = &args.template {
        PageRenderer::install_template(template)?;
    }

    let mut reporter = ConsoleReporter::new(OutputConfig {
        use_color: should_use_color(args.color),
    });
    walker.walk(&root, &mut reporter)
}

fn main() {
    init_logging();
    let args = Args::parse();

    match run(args) {
        Ok(summary) => {
            tracing::debug!(
                directories = summary.directories,
                entries = summary.entries,
                skipped = summary.skipped,
                "done"
            );
        }
        Err(e) => {
            eprintln!("dirindex: error: {}", e);
            process::exit(1);
        }
    }
}
