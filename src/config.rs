use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct MarketConfig {
    pub base_url: String,
    pub candle_limit: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct TelegramConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct IndicatorConfig {
    pub rsi_window: u32,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    pub ema_fast: u32,
    pub ema_slow: u32,
}

#[derive(Clone, Debug)]
pub struct SignalConfig {
    pub min_candles: u32,
    pub oversold: f64,
    pub overbought: f64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub symbols: Vec<String>,
    pub interval: String,
    pub poll_secs: u64,
    pub market: MarketConfig,
    pub telegram: TelegramConfig,
    pub indicators: IndicatorConfig,
    pub signals: SignalConfig,
}

#[derive(Clone, Debug, Deserialize)]
struct MarketConfigFile {
    base_url: Option<String>,
    candle_limit: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
struct TelegramConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
struct IndicatorConfigFile {
    rsi_window: Option<u32>,
    macd_fast: Option<u32>,
    macd_slow: Option<u32>,
    macd_signal: Option<u32>,
    ema_fast: Option<u32>,
    ema_slow: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
struct SignalConfigFile {
    min_candles: Option<u32>,
    oversold: Option<f64>,
    overbought: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
struct ConfigFile {
    symbols: Option<Vec<String>>,
    interval: Option<String>,
    poll_secs: Option<u64>,
    market: Option<MarketConfigFile>,
    telegram: Option<TelegramConfigFile>,
    indicators: Option<IndicatorConfigFile>,
    signals: Option<SignalConfigFile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: vec![
                "SOLUSDT".to_string(),
                "ETHUSDT".to_string(),
                "BTCUSDT".to_string(),
                "ADAUSDT".to_string(),
            ],
            interval: "1h".to_string(),
            poll_secs: 3600,
            market: MarketConfig {
                base_url: "https://api.binance.com".to_string(),
                candle_limit: 100,
                timeout_secs: 30,
            },
            telegram: TelegramConfig {
                base_url: "https://api.telegram.org".to_string(),
                timeout_secs: 30,
            },
            indicators: IndicatorConfig {
                rsi_window: 14,
                macd_fast: 12,
                macd_slow: 26,
                macd_signal: 9,
                ema_fast: 9,
                ema_slow: 21,
            },
            signals: SignalConfig {
                min_candles: 20,
                oversold: 30.0,
                overbought: 70.0,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|err| Error::config(format!("failed to read config: {err}")))?;
        let file: ConfigFile = toml::from_str(&content)
            .map_err(|err| Error::config(format!("failed to parse config: {err}")))?;
        let mut config = Config::from_file(file);
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    // Missing config file is not an error: defaults plus env overrides apply.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            return Self::load(path);
        }
        let mut config = Config::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(file: ConfigFile) -> Self {
        let mut config = Config::default();

        if let Some(symbols) = file.symbols {
            config.symbols = symbols;
        }
        if let Some(interval) = file.interval {
            config.interval = interval;
        }
        if let Some(poll_secs) = file.poll_secs {
            config.poll_secs = poll_secs;
        }

        if let Some(market) = file.market {
            if let Some(value) = market.base_url {
                config.market.base_url = value;
            }
            if let Some(value) = market.candle_limit {
                config.market.candle_limit = value;
            }
            if let Some(value) = market.timeout_secs {
                config.market.timeout_secs = value;
            }
        }

        if let Some(telegram) = file.telegram {
            if let Some(value) = telegram.base_url {
                config.telegram.base_url = value;
            }
            if let Some(value) = telegram.timeout_secs {
                config.telegram.timeout_secs = value;
            }
        }

        if let Some(indicators) = file.indicators {
            if let Some(value) = indicators.rsi_window {
                config.indicators.rsi_window = value;
            }
            if let Some(value) = indicators.macd_fast {
                config.indicators.macd_fast = value;
            }
            if let Some(value) = indicators.macd_slow {
                config.indicators.macd_slow = value;
            }
            if let Some(value) = indicators.macd_signal {
                config.indicators.macd_signal = value;
            }
            if let Some(value) = indicators.ema_fast {
                config.indicators.ema_fast = value;
            }
            if let Some(value) = indicators.ema_slow {
                config.indicators.ema_slow = value;
            }
        }

        if let Some(signals) = file.signals {
            if let Some(value) = signals.min_candles {
                config.signals.min_candles = value;
            }
            if let Some(value) = signals.oversold {
                config.signals.oversold = value;
            }
            if let Some(value) = signals.overbought {
                config.signals.overbought = value;
            }
        }

        config
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = read_string_env("TICKWATCH_SYMBOLS")? {
            self.symbols = value
                .split(',')
                .map(|symbol| symbol.trim().to_string())
                .filter(|symbol| !symbol.is_empty())
                .collect();
        }
        if let Some(value) = read_string_env("TICKWATCH_INTERVAL")? {
            self.interval = value;
        }
        if let Some(value) = read_u64_env("TICKWATCH_POLL_SECS")? {
            self.poll_secs = value;
        }

        if let Some(value) = read_string_env("TICKWATCH_MARKET_BASE_URL")? {
            self.market.base_url = value;
        }
        if let Some(value) = read_u32_env("TICKWATCH_CANDLE_LIMIT")? {
            self.market.candle_limit = value;
        }
        if let Some(value) = read_u64_env("TICKWATCH_MARKET_TIMEOUT_SECS")? {
            self.market.timeout_secs = value;
        }

        if let Some(value) = read_string_env("TICKWATCH_TELEGRAM_BASE_URL")? {
            self.telegram.base_url = value;
        }
        if let Some(value) = read_u64_env("TICKWATCH_TELEGRAM_TIMEOUT_SECS")? {
            self.telegram.timeout_secs = value;
        }

        if let Some(value) = read_u32_env("TICKWATCH_RSI_WINDOW")? {
            self.indicators.rsi_window = value;
        }
        if let Some(value) = read_u32_env("TICKWATCH_MACD_FAST")? {
            self.indicators.macd_fast = value;
        }
        if let Some(value) = read_u32_env("TICKWATCH_MACD_SLOW")? {
            self.indicators.macd_slow = value;
        }
        if let Some(value) = read_u32_env("TICKWATCH_MACD_SIGNAL")? {
            self.indicators.macd_signal = value;
        }
        if let Some(value) = read_u32_env("TICKWATCH_EMA_FAST")? {
            self.indicators.ema_fast = value;
        }
        if let Some(value) = read_u32_env("TICKWATCH_EMA_SLOW")? {
            self.indicators.ema_slow = value;
        }

        if let Some(value) = read_u32_env("TICKWATCH_MIN_CANDLES")? {
            self.signals.min_candles = value;
        }
        if let Some(value) = read_f64_env("TICKWATCH_OVERSOLD")? {
            self.signals.oversold = value;
        }
        if let Some(value) = read_f64_env("TICKWATCH_OVERBOUGHT")? {
            self.signals.overbought = value;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(Error::config("symbols must not be empty"));
        }
        for symbol in &self.symbols {
            if symbol.trim().is_empty() {
                return Err(Error::config("symbols must not contain empty entries"));
            }
        }
        if self.interval.trim().is_empty() {
            return Err(Error::config("interval must be set"));
        }
        if self.poll_secs == 0 {
            return Err(Error::config("poll_secs must be positive"));
        }

        if self.market.base_url.trim().is_empty() {
            return Err(Error::config("market.base_url must be set"));
        }
        if self.market.candle_limit == 0 || self.market.candle_limit > 1000 {
            return Err(Error::config("market.candle_limit must be in 1..=1000"));
        }

        if self.telegram.base_url.trim().is_empty() {
            return Err(Error::config("telegram.base_url must be set"));
        }

        let indicators = &self.indicators;
        for (name, value) in [
            ("indicators.rsi_window", indicators.rsi_window),
            ("indicators.macd_fast", indicators.macd_fast),
            ("indicators.macd_slow", indicators.macd_slow),
            ("indicators.macd_signal", indicators.macd_signal),
            ("indicators.ema_fast", indicators.ema_fast),
            ("indicators.ema_slow", indicators.ema_slow),
        ] {
            if value == 0 {
                return Err(Error::config(format!("{name} must be positive")));
            }
        }
        if indicators.macd_fast >= indicators.macd_slow {
            return Err(Error::config(
                "indicators.macd_fast must be less than macd_slow",
            ));
        }
        if indicators.ema_fast >= indicators.ema_slow {
            return Err(Error::config(
                "indicators.ema_fast must be less than ema_slow",
            ));
        }

        if self.signals.min_candles == 0 {
            return Err(Error::config("signals.min_candles must be positive"));
        }
        if !(0.0..=100.0).contains(&self.signals.oversold)
            || !(0.0..=100.0).contains(&self.signals.overbought)
        {
            return Err(Error::config(
                "signals.oversold and signals.overbought must be in [0, 100]",
            ));
        }
        if self.signals.oversold >= self.signals.overbought {
            return Err(Error::config(
                "signals.oversold must be less than overbought",
            ));
        }

        Ok(())
    }
}

fn read_string_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::config(format!("failed to read {key}: {err}"))),
    }
}

fn read_u32_env(key: &str) -> Result<Option<u32>> {
    match env::var(key) {
        Ok(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|err| Error::config(format!("{key} must be u32: {err}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::config(format!("failed to read {key}: {err}"))),
    }
}

fn read_u64_env(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| Error::config(format!("{key} must be u64: {err}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::config(format!("failed to read {key}: {err}"))),
    }
}

fn read_f64_env(key: &str) -> Result<Option<f64>> {
    match env::var(key) {
        Ok(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|err| Error::config(format!("{key} must be f64: {err}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::config(format!("failed to read {key}: {err}"))),
    }
}
