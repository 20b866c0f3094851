//! CLI for infotensor: information metrics on labeled probability tensors.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "infotensor")]
#[command(about = "infotensor: information metrics on labeled probability tensors")]
#[command(version = infotensor_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered metric with its positional signature
    Metrics,

    /// Show the axes, total mass and per-axis entropy of a tensor document
    Inspect {
        /// Path to a tensor JSON document
        tensor: String,
    },

    /// Evaluate one metric by name.
    /// Loaded tensors fill the leading positional arguments in --tensor order,
    /// followed by every --arg.
    Eval {
        /// Registered metric name (see `infotensor metrics`)
        metric: String,

        /// Tensor JSON document; repeat for metrics taking two tensors
        #[arg(long = "tensor", required = true)]
        tensors: Vec<String>,

        /// Positional metric argument: a number, true/false, a comma list or a word
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Seed for the sampling metrics (default: seeded from the OS)
        #[arg(long)]
        seed: Option<u64>,

        /// Write the result as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Write a tensor document filled with random normalized mass
    Random {
        /// Comma-separated axis labels (e.g. "t,X_1,X_2")
        #[arg(long)]
        labels: String,

        /// Comma-separated axis sizes, one per label
        #[arg(long)]
        shape: String,

        /// RNG seed (default: seeded from the OS)
        #[arg(long)]
        seed: Option<u64>,

        /// Output path for the document
        #[arg(long)]
        output: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Metrics => commands::metrics::run(),
        Commands::Inspect { tensor } => commands::inspect::run(&tensor),
        Commands::Eval {
            metric,
            tensors,
            args,
            seed,
            output,
        } => commands::eval::run(commands::eval::EvalCommandConfig {
            metric: &metric,
            tensor_paths: &tensors,
            args: &args,
            seed,
            output_path: output.as_deref(),
        }),
        Commands::Random {
            labels,
            shape,
            seed,
            output,
        } => commands::random::run(commands::random::RandomCommandConfig {
            labels: &labels,
            shape: &shape,
            seed,
            output_path: &output,
        }),
    }
}
