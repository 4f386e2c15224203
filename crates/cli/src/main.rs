use clap::{Parser, Subcommand};
use cuecard_cli::commands::{inspect, replay, timeline};

#[derive(Parser)]
#[command(name = "cuecard")]
#[command(about = "Cuecard catalog tool - inspect and replay timed reveal catalogs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a catalog: slot counts, ordering, span and digest
    Inspect {
        catalog_path: String,
    },
    /// List the reveal timeline
    Timeline {
        catalog_path: String,
    },
    /// Replay a clock sample sequence and print each reveal batch
    Replay {
        catalog_path: String,

        /// Comma separated seconds; `null` for an unstarted reading
        #[arg(long, short, allow_hyphen_values = true)]
        samples: String,
    },
}

fn main() -> anyhow::Result<()> {
    println!("Cuecard Catalog Tool v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { catalog_path } => inspect::run(&catalog_path),
        Commands::Timeline { catalog_path } => timeline::run(&catalog_path),
        Commands::Replay { catalog_path, samples } => replay::run(&catalog_path, &samples).map(|_| ()),
    }
}
