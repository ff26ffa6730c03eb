use clap::Parser;
use marketpulse::cli::commands::{Cli, Commands, CycleMode};
use marketpulse::config::Config;
use marketpulse::MarketPulse;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .or_else(|| std::env::var("MARKETPULSE_CONFIG").ok())
        .unwrap_or_else(|| "config.json".into());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    };

    let monitor = match MarketPulse::new(&config) {
        Ok(monitor) => monitor,
        Err(e) => {
            eprintln!("Error initializing monitor: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Watch { interval } => {
            let minutes = interval.unwrap_or(config.analysis_interval_minutes);
            println!("Starting analysis loop for {} every {minutes} minutes", config.symbol);
            monitor.run_analysis_loop(minutes).await;
        }
        Commands::Trade { interval } => {
            let minutes = interval.unwrap_or(config.analysis_interval_minutes);
            println!("Starting trading loop for {} every {minutes} minutes", config.symbol);
            monitor.run_trading_loop(minutes).await;
        }
        Commands::Once { mode } => {
            let record = match mode {
                CycleMode::Analysis => monitor.analyze_once(1).await,
                CycleMode::Trading => monitor.trade_once(1).await,
            };
            match serde_json::to_string_pretty(&record) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("Error serializing record: {e}"),
            }
            if record.error.is_some() {
                std::process::exit(1);
            }
        }
        Commands::Snapshot => match monitor.snapshot().await {
            Ok(snapshot) => {
                println!("{} ${:.2}", snapshot.symbol, snapshot.current_price);
                let pc = &snapshot.price_changes;
                println!(
                    "Change: 15m {:+.2}% | 1h {:+.2}% | 4h {:+.2}% | 24h {:+.2}%",
                    pc.m15, pc.h1, pc.h4, pc.h24
                );
                for (name, series) in snapshot.timeframes() {
                    let c = &series.current;
                    println!(
                        "{name:>3}: trend {} | EMA20 {:.2} | MACD {:.4} | RSI14 {:.1} | ATR {:.2}",
                        series.ema_trend(),
                        c.ema20,
                        c.macd,
                        c.rsi14,
                        c.atr14
                    );
                }
                println!(
                    "OI {:.0} | funding {:.6}",
                    snapshot.open_interest.latest, snapshot.funding_rate
                );
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }
}
