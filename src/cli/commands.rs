use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "marketpulse", about = "LLM-driven BTC market monitor")]
pub struct Cli {
    /// Path to the JSON config file (default: MARKETPULSE_CONFIG or ./config.json)
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the analysis loop (market read only, no trading decisions)
    Watch {
        /// Minutes between cycles (overrides the config)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Run the trading-decision loop against the simulated account
    Trade {
        /// Minutes between cycles (overrides the config)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Run a single cycle and exit
    Once {
        /// Which cycle to run
        #[arg(value_enum, default_value_t = CycleMode::Analysis)]
        mode: CycleMode,
    },
    /// Fetch and print the current market snapshot
    Snapshot,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CycleMode {
    Analysis,
    Trading,
}
