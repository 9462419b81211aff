mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "declsum",
    version,
    about = "Extract customs declaration tables from PDFs and total them per item"
)]
struct Cli {
    /// Log per-document progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and combine the declaration tables of one or more PDFs
    Extract {
        /// PDF files, processed in the given order
        #[arg(required = true)]
        input_files: Vec<PathBuf>,

        /// JSON options file (markers, column names, timeout)
        #[arg(long = "options", value_name = "FILE")]
        options: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Print one row per 备案序号 instead of every row
        #[arg(long)]
        summary: bool,
    },
    /// Inspect extraction options
    Options {
        #[command(subcommand)]
        action: OptionsAction,
    },
}

#[derive(Subcommand)]
enum OptionsAction {
    /// Print the default options as JSON
    Show,
    /// Validate an options file
    Validate {
        /// Path to JSON options file
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "declsum_core=debug"
    } else {
        "declsum_core=warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input_files,
            options,
            output,
            summary,
        } => commands::extract::run(input_files, options, &output, summary),
        Commands::Options { action } => match action {
            OptionsAction::Show => commands::options::show(),
            OptionsAction::Validate { file } => commands::options::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
