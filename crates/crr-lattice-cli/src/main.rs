mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::pricing::{CompareArgs, ConvergeArgs, PriceArgs};

/// Cox-Ross-Rubinstein binomial lattice option pricing
#[derive(Parser)]
#[command(
    name = "crr",
    version,
    about = "Cox-Ross-Rubinstein binomial lattice option pricing",
    long_about = "Builds the recombining CRR price lattice and backward-induces call or put \
                  values with decimal precision. Parameters come from flags, a JSON/YAML \
                  file (--input), or JSON piped on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Price an option and print the price and value lattices
    Price(PriceArgs),
    /// Check the optimized lattice build against the naive one
    Compare(CompareArgs),
    /// Measure convergence to the Black-Scholes price over step counts
    Converge(ConvergeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Price(args) => commands::pricing::run_price(args),
        Commands::Compare(args) => commands::pricing::run_compare(args),
        Commands::Converge(args) => commands::pricing::run_converge(args),
        Commands::Version => {
            println!("crr {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
