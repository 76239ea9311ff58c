use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_cli::{parse_responses, read_input, resolve_params, vote_groups};

#[derive(Parser)]
#[command(name = "tally", version, about = "Parse and vote over LLM evaluation outputs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a JSON array of raw responses into labels
    Parse {
        /// Dataset name; decides the task
        #[arg(long)]
        dataset: String,
        /// Input file (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Seed for sentiment tie-breaking
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Parse groups of samples and print one consensus label per group
    Vote {
        #[arg(long)]
        dataset: String,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Print the sampling parameters a dataset resolves to
    Params {
        #[arg(long)]
        dataset: String,
        /// YAML or JSON query config
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Parse {
            dataset,
            input,
            seed,
        } => {
            let labels = parse_responses(&dataset, &read_input(input.as_deref())?, seed)?;
            tracing::info!(dataset = %dataset, count = labels.len(), "parsed responses");
            serde_json::to_string_pretty(&labels)?
        }
        Commands::Vote {
            dataset,
            input,
            seed,
        } => {
            let consensus = vote_groups(&dataset, &read_input(input.as_deref())?, seed)?;
            tracing::info!(dataset = %dataset, groups = consensus.len(), "voted");
            serde_json::to_string_pretty(&consensus)?
        }
        Commands::Params { dataset, config } => {
            let params = resolve_params(&dataset, config.as_deref())?;
            serde_json::to_string_pretty(&params)?
        }
    };
    println!("{output}");
    Ok(())
}
