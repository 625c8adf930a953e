use crate::app::metrics;
use crate::app::scheduler::Scheduler;
use crate::config::Config;
use crate::core::memory::SignalMemory;
use crate::core::poller::{PassReport, Poller};
use crate::exchange::binance::{BinanceConfig, BinanceMarketData};
use crate::notify::telegram::{TelegramConfig, TelegramNotifier};
use crate::{Error, Result};
use std::env;
use std::time::Duration;
use tracing::{info, warn};

pub fn run() -> Result<()> {
    metrics::init_start_time();
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;

    if cli.show_help {
        print_usage();
        return Ok(());
    }

    let mut config = Config::load_or_default(&cli.config_path)?;
    if let Some(symbols) = cli.symbols_override {
        config.symbols = symbols;
        config.validate()?;
    }

    let market = BinanceMarketData::new(BinanceConfig {
        base_url: config.market.base_url.clone(),
        timeout_secs: config.market.timeout_secs,
    })?;

    // Missing credentials are accepted here; delivery fails per symbol and
    // shows up in the pass report instead.
    let notifier = TelegramNotifier::new(TelegramConfig {
        base_url: config.telegram.base_url.clone(),
        bot_token: env::var("TICKWATCH_BOT_TOKEN").unwrap_or_default(),
        chat_id: env::var("TICKWATCH_CHAT_ID").unwrap_or_default(),
        timeout_secs: config.telegram.timeout_secs,
    })?;

    let poller = Poller::new(&market, &notifier, &config);
    let mut memory = SignalMemory::new();

    if cli.run_once {
        let report = poller.run_pass(&mut memory);
        finish_pass(&report);
        return Ok(());
    }

    info!(
        symbols = config.symbols.len(),
        interval = %config.interval,
        poll_secs = config.poll_secs,
        "starting poll loop"
    );
    let scheduler = Scheduler::new(Duration::from_secs(config.poll_secs));
    scheduler.run(|| {
        let report = poller.run_pass(&mut memory);
        finish_pass(&report);
    });
    Ok(())
}

fn finish_pass(report: &PassReport) {
    info!(
        notified = report.notified(),
        suppressed = report.suppressed(),
        failed = report.failed(),
        "pass complete"
    );
    metrics::record_pass(report);
    if let Err(err) = metrics::write_if_configured() {
        warn!(error = %err.message, "metrics write failed");
    }
}

struct CliArgs {
    config_path: String,
    symbols_override: Option<Vec<String>>,
    run_once: bool,
    show_help: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut config_path = "config.toml".to_string();
    let mut symbols_override = None;
    let mut run_once = false;
    let mut show_help = false;

    let mut index = 1;
    while index < args.len() {
        match args[index].as_str() {
            "--help" | "-h" => {
                show_help = true;
                index += 1;
            }
            "--config" | "-c" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::config("missing value for --config"))?;
                config_path = value.to_string();
                index += 2;
            }
            "--symbols" | "-s" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::config("missing value for --symbols"))?;
                let symbols: Vec<String> = value
                    .split(',')
                    .map(|symbol| symbol.trim().to_string())
                    .filter(|symbol| !symbol.is_empty())
                    .collect();
                symbols_override = Some(symbols);
                index += 2;
            }
            "--once" => {
                run_once = true;
                index += 1;
            }
            unknown => {
                return Err(Error::config(format!("unknown argument: {unknown}")));
            }
        }
    }

    Ok(CliArgs {
        config_path,
        symbols_override,
        run_once,
        show_help,
    })
}

fn print_usage() {
    println!("usage: tickwatch [--config <path>] [--symbols <A,B,C>] [--once]");
    println!("  -c, --config   Path to config.toml (default: config.toml)");
    println!("  -s, --symbols  Override symbol list (comma-separated)");
    println!("      --once     Run a single pass and exit");
    println!("  -h, --help     Show this help");
}

#[cfg(test)]
mod tests {
    use super::parse_args;

    #[test]
    fn parses_defaults() {
        let args = vec!["tickwatch".to_string()];
        let parsed = parse_args(&args).expect("parse");
        assert_eq!(parsed.config_path, "config.toml");
        assert!(parsed.symbols_override.is_none());
        assert!(!parsed.run_once);
        assert!(!parsed.show_help);
    }

    #[test]
    fn parses_overrides() {
        let args = vec![
            "tickwatch".to_string(),
            "--config".to_string(),
            "custom.toml".to_string(),
            "--symbols".to_string(),
            "BTCUSDT, ETHUSDT".to_string(),
            "--once".to_string(),
        ];
        let parsed = parse_args(&args).expect("parse");
        assert_eq!(parsed.config_path, "custom.toml");
        assert_eq!(
            parsed.symbols_override,
            Some(vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()])
        );
        assert!(parsed.run_once);
    }

    #[test]
    fn rejects_unknown_argument() {
        let args = vec!["tickwatch".to_string(), "--bogus".to_string()];
        assert!(parse_args(&args).is_err());
    }
}
