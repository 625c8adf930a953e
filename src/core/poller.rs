use crate::config::Config;
use crate::core::classifier::classify;
use crate::core::memory::SignalMemory;
use crate::core::snapshot::IndicatorSnapshot;
use crate::exchange::{CandleRequest, MarketData};
use crate::notify::Notifier;
use crate::{ErrorKind, Result};
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq)]
pub enum Delivery {
    Notified { rendered: String },
    Suppressed { rendered: String },
}

pub struct SymbolResult {
    pub symbol: String,
    pub outcome: Result<Delivery>,
}

#[derive(Default)]
pub struct PassReport {
    pub results: Vec<SymbolResult>,
}

impl PassReport {
    pub fn notified(&self) -> usize {
        self.results
            .iter()
            .filter(|result| matches!(result.outcome, Ok(Delivery::Notified { .. })))
            .count()
    }

    pub fn suppressed(&self) -> usize {
        self.results
            .iter()
            .filter(|result| matches!(result.outcome, Ok(Delivery::Suppressed { .. })))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.outcome.is_err())
            .count()
    }
}

pub struct Poller<'a, M: MarketData, N: Notifier> {
    market: &'a M,
    notifier: &'a N,
    config: &'a Config,
}

impl<'a, M: MarketData, N: Notifier> Poller<'a, M, N> {
    pub fn new(market: &'a M, notifier: &'a N, config: &'a Config) -> Self {
        Self {
            market,
            notifier,
            config,
        }
    }

    /// One full pass over the configured symbols, strictly sequential.
    /// A failed symbol is recorded in the report; it never skips siblings.
    pub fn run_pass(&self, memory: &mut SignalMemory) -> PassReport {
        let mut results = Vec::with_capacity(self.config.symbols.len());
        for symbol in &self.config.symbols {
            let outcome = self.evaluate_symbol(symbol, memory);
            match &outcome {
                Ok(Delivery::Notified { rendered }) => {
                    info!(symbol = %symbol, signal = %rendered, "notification sent");
                }
                Ok(Delivery::Suppressed { .. }) => {
                    info!(symbol = %symbol, "signal unchanged, notification suppressed");
                }
                Err(err) => {
                    warn!(symbol = %symbol, error = %err.message, "symbol evaluation failed");
                }
            }
            results.push(SymbolResult {
                symbol: symbol.clone(),
                outcome,
            });
        }
        PassReport { results }
    }

    fn evaluate_symbol(&self, symbol: &str, memory: &mut SignalMemory) -> Result<Delivery> {
        let request = CandleRequest {
            symbol: symbol.to_string(),
            interval: self.config.interval.clone(),
            limit: self.config.market.candle_limit,
        };
        // A malformed payload counts as missing data, not a failed symbol;
        // the empty series classifies as insufficient and flows on to the
        // comparison step.
        let candles = match self.market.fetch_candles(&request) {
            Ok(candles) => candles,
            Err(err) if err.kind == ErrorKind::Data => Vec::new(),
            Err(err) => return Err(err),
        };

        let closes: Vec<f64> = candles.iter().map(|candle| candle.close).collect();
        let snapshot = IndicatorSnapshot::compute(&closes, &self.config.indicators);
        let signal = classify(closes.len(), &snapshot, &self.config.signals);
        let rendered = signal.render();

        if memory.get(symbol) == Some(rendered.as_str()) {
            return Ok(Delivery::Suppressed { rendered });
        }
        memory.update(symbol, rendered.as_str());

        let message = format!(
            "🪙 {symbol} [{interval}]\n{rendered}",
            interval = self.config.interval
        );
        self.notifier.send(&message)?;
        Ok(Delivery::Notified { rendered })
    }
}
