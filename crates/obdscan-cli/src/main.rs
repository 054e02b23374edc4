mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "obdscan",
    version,
    about = "Severity classification for OBD-II diagnostic logs"
)]
struct Cli {
    /// Log classifier decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a file is a usable OBD-II CSV log
    Validate {
        /// Path to CSV log
        input_file: PathBuf,
    },
    /// Parse and classify an OBD-II CSV log
    Parse {
        /// Path to CSV log
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the parsed result to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        #[command(flatten)]
        tables: TableArgs,
    },
    /// Parse a log and give one combined verdict, optionally with an assistant response
    Assess {
        /// Path to CSV log
        input_file: PathBuf,

        /// File holding the assistant's response text
        #[arg(long, value_name = "FILE", conflicts_with = "text")]
        response: Option<PathBuf>,

        /// Assistant response text given inline
        #[arg(long, value_name = "TEXT")]
        text: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        #[command(flatten)]
        tables: TableArgs,
    },
    /// Score the severity of free-form text
    Score {
        /// Text to score; multiple words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Look up diagnostic trouble codes
    Codes {
        #[command(subcommand)]
        action: CodesAction,
    },
    /// Inspect and validate range tables and code registries
    Tables {
        #[command(subcommand)]
        action: TablesAction,
    },
}

/// Replacements for the built-in tables.
#[derive(clap::Args)]
struct TableArgs {
    /// Custom metric range table (JSON)
    #[arg(long, value_name = "FILE")]
    ranges: Option<PathBuf>,

    /// Custom fault code registry (JSON)
    #[arg(long, value_name = "FILE")]
    codes: Option<PathBuf>,
}

#[derive(Subcommand)]
enum CodesAction {
    /// Explain one or more codes
    Lookup {
        #[arg(required = true)]
        codes: Vec<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// List every code in the built-in registry
    List,
}

#[derive(Subcommand)]
enum TablesAction {
    /// List the built-in tables
    List,
    /// Explain a built-in table in plain language
    Explain {
        /// Table name: ranges or codes
        name: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom table file
    Validate {
        /// Metric range table to validate
        #[arg(long, value_name = "FILE", required_unless_present = "codes")]
        ranges: Option<PathBuf>,

        /// Fault code registry to validate
        #[arg(long, value_name = "FILE")]
        codes: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate { input_file } => commands::validate::run(&input_file),
        Commands::Parse {
            input_file,
            output,
            out,
            tables,
        } => commands::parse::run(input_file, &output, out, tables.ranges, tables.codes),
        Commands::Assess {
            input_file,
            response,
            text,
            output,
            tables,
        } => commands::assess::run(
            input_file,
            response,
            text,
            &output,
            tables.ranges,
            tables.codes,
        ),
        Commands::Score { text } => commands::score::run(&text.join(" ")),
        Commands::Codes { action } => match action {
            CodesAction::Lookup { codes, output } => commands::codes::lookup(&codes, &output),
            CodesAction::List => commands::codes::list(),
        },
        Commands::Tables { action } => match action {
            TablesAction::List => commands::tables::list(),
            TablesAction::Explain { name } => commands::tables::explain(&name),
            TablesAction::Schema => commands::tables::schema(),
            TablesAction::Validate { ranges, codes } => {
                commands::tables::validate(ranges.as_deref(), codes.as_deref())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
