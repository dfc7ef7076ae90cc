//! CLI frontend for reading BZFlag world files.

mod commands;

use std::path::PathBuf;
use std::process;

use bzw_dsl::ReaderConfig;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bzw",
    about = "Check, inspect, and reformat BZFlag world files",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log more detail to stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// File extension to look for when given a directory
    #[arg(long, global = true, default_value = "bzw")]
    ext: String,

    /// Descend into subdirectories when given a directory
    #[arg(long, global = true)]
    recursive: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse world files and report syntax errors
    Check {
        /// A world file, or a directory of them
        path: PathBuf,
    },

    /// Print parsed world files as JSON
    Dump {
        /// A world file, or a directory of them
        path: PathBuf,

        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },

    /// List the objects in world files
    List {
        /// A world file, or a directory of them
        path: PathBuf,

        /// Only show objects of this kind (e.g. box, teleporter, waterLevel)
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Rewrite a world file in canonical layout
    Fmt {
        /// The world file to format
        file: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ReaderConfig::default()
        .with_extension(&cli.ext)
        .with_recursive(cli.recursive);
    log::debug!("reader config: {config:?}");

    let result = match cli.command {
        Commands::Check { path } => commands::check::run(&path, &config),
        Commands::Dump { path, compact } => commands::dump::run(&path, &config, compact),
        Commands::List { path, kind } => commands::list::run(&path, &config, kind.as_deref()),
        Commands::Fmt { file, output } => commands::fmt::run(&file, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
