use clap::{Parser, Subcommand};

mod commands;

use commands::{BacktestArgs, ScreenArgs};

#[derive(Parser)]
#[command(name = "sentiment-trade")]
#[command(about = "Multi-source sentiment screener and signal backtester", long_about = None)]
struct Cli {
    /// Config file path (defaults to config/Config.toml and SENTIMENT_* env vars)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Config profile layered over config/Config.toml (config/Config.<profile>.toml)
    #[arg(short, long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and rank a list of tickers
    Screen(ScreenArgs),
    /// Backtest a signal against historical daily closes
    Backtest(BacktestArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = commands::ConfigSource {
        path: cli.config.as_deref(),
        profile: cli.profile.as_deref(),
    };
    match cli.command {
        Commands::Screen(args) => {
            commands::run_screen(args, config).await?;
        }
        Commands::Backtest(args) => {
            commands::run_backtest(args, config).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_screen_ticker_list() {
        let cli = Cli::try_parse_from([
            "sentiment-trade",
            "screen",
            "--tickers",
            "NVDA,amd,TSLA",
            "--output",
            "out.csv",
        ])
        .unwrap();

        match cli.command {
            Commands::Screen(args) => {
                assert_eq!(args.tickers, vec!["NVDA", "amd", "TSLA"]);
                assert!(args.universe.is_none());
                assert!(!args.stocktwits);
                assert_eq!(args.output.unwrap().to_str(), Some("out.csv"));
            }
            Commands::Backtest(_) => panic!("expected screen"),
        }
    }

    #[test]
    fn parses_backtest_dates() {
        let cli = Cli::try_parse_from([
            "sentiment-trade",
            "--config",
            "custom.toml",
            "backtest",
            "--ticker",
            "NVDA",
            "--prices",
            "data/prices",
            "--start",
            "2024-01-02",
            "--end",
            "2024-06-28",
            "--signals",
            "signals.csv",
        ])
        .unwrap();

        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        match cli.command {
            Commands::Backtest(args) => {
                assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
                assert_eq!(args.end, NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
                assert!(args.signals.is_some());
                assert!(args.trades_out.is_none());
            }
            Commands::Screen(_) => panic!("expected backtest"),
        }
    }

    #[test]
    fn rejects_malformed_date() {
        let result = Cli::try_parse_from([
            "sentiment-trade",
            "backtest",
            "--ticker",
            "NVDA",
            "--prices",
            "p",
            "--start",
            "01/02/2024",
            "--end",
            "2024-06-28",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn screen_requires_tickers_or_universe() {
        assert!(Cli::try_parse_from(["sentiment-trade", "screen"]).is_err());
    }

    #[test]
    fn parses_screen_universe() {
        let cli =
            Cli::try_parse_from(["sentiment-trade", "screen", "--universe", "semiconductors"])
                .unwrap();

        match cli.command {
            Commands::Screen(args) => {
                assert_eq!(args.universe.as_deref(), Some("semiconductors"));
                assert!(args.tickers.is_empty());
            }
            Commands::Backtest(_) => panic!("expected screen"),
        }
    }

    #[test]
    fn universe_conflicts_with_tickers() {
        let result = Cli::try_parse_from([
            "sentiment-trade",
            "screen",
            "--tickers",
            "NVDA",
            "--universe",
            "popular",
        ]);

        assert!(result.is_err());
    }
}
