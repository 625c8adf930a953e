use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tickwatch::config::Config;
use tickwatch::core::memory::SignalMemory;
use tickwatch::core::poller::{Delivery, Poller};
use tickwatch::exchange::{CandleRequest, MarketData};
use tickwatch::models::Candle;
use tickwatch::notify::Notifier;
use tickwatch::{Error, Result};

fn candle(time: i64, close: f64) -> Candle {
    Candle {
        time,
        open: close,
        high: close,
        low: close,
        close,
        volume: 1.0,
    }
}

#[derive(Default)]
struct FakeMarket {
    series: RefCell<HashMap<String, Vec<f64>>>,
    transport_failures: RefCell<HashSet<String>>,
    data_failures: RefCell<HashSet<String>>,
}

impl FakeMarket {
    fn set(&self, symbol: &str, closes: Vec<f64>) {
        self.series.borrow_mut().insert(symbol.to_string(), closes);
    }

    fn fail_transport(&self, symbol: &str) {
        self.transport_failures
            .borrow_mut()
            .insert(symbol.to_string());
    }

    fn fail_data(&self, symbol: &str) {
        self.data_failures.borrow_mut().insert(symbol.to_string());
    }
}

impl MarketData for FakeMarket {
    fn fetch_candles(&self, req: &CandleRequest) -> Result<Vec<Candle>> {
        if self.transport_failures.borrow().contains(&req.symbol) {
            return Err(Error::transport("connection refused"));
        }
        if self.data_failures.borrow().contains(&req.symbol) {
            return Err(Error::data("kline row is not array"));
        }
        let closes = self
            .series
            .borrow()
            .get(&req.symbol)
            .cloned()
            .unwrap_or_default();
        Ok(closes
            .iter()
            .enumerate()
            .map(|(index, &close)| candle(index as i64, close))
            .collect())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: RefCell<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn send(&self, text: &str) -> Result<()> {
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }
}

struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, _text: &str) -> Result<()> {
        Err(Error::transport("telegram send failed"))
    }
}

fn config_for(symbols: &[&str]) -> Config {
    let mut config = Config::default();
    config.symbols = symbols.iter().map(|symbol| symbol.to_string()).collect();
    config
}

fn rising_closes(len: usize) -> Vec<f64> {
    (1..=len).map(|value| 100.0 + value as f64).collect()
}

#[test]
fn first_pass_notifies_then_identical_pass_suppresses() {
    let market = FakeMarket::default();
    market.set("BTCUSDT", rising_closes(40));
    let notifier = RecordingNotifier::default();
    let config = config_for(&["BTCUSDT"]);
    let poller = Poller::new(&market, &notifier, &config);
    let mut memory = SignalMemory::new();

    let first = poller.run_pass(&mut memory);
    assert_eq!(first.notified(), 1);
    assert_eq!(first.suppressed(), 0);
    assert_eq!(notifier.sent.borrow().len(), 1);
    let message = notifier.sent.borrow()[0].clone();
    assert!(message.starts_with("🪙 BTCUSDT [1h]\n"));

    let second = poller.run_pass(&mut memory);
    assert_eq!(second.notified(), 0);
    assert_eq!(second.suppressed(), 1);
    assert_eq!(notifier.sent.borrow().len(), 1);
}

#[test]
fn changed_signal_notifies_exactly_twice() {
    let market = FakeMarket::default();
    market.set("BTCUSDT", rising_closes(40));
    let notifier = RecordingNotifier::default();
    let config = config_for(&["BTCUSDT"]);
    let poller = Poller::new(&market, &notifier, &config);
    let mut memory = SignalMemory::new();

    poller.run_pass(&mut memory);
    market.set("BTCUSDT", rising_closes(5));
    let second = poller.run_pass(&mut memory);

    assert_eq!(second.notified(), 1);
    assert_eq!(notifier.sent.borrow().len(), 2);
    assert!(notifier.sent.borrow()[1].ends_with("not enough data"));
}

#[test]
fn transport_failure_does_not_skip_remaining_symbols() {
    let market = FakeMarket::default();
    market.fail_transport("AAAUSDT");
    market.set("BBBUSDT", rising_closes(40));
    let notifier = RecordingNotifier::default();
    let config = config_for(&["AAAUSDT", "BBBUSDT"]);
    let poller = Poller::new(&market, &notifier, &config);
    let mut memory = SignalMemory::new();

    let report = poller.run_pass(&mut memory);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.notified(), 1);
    assert_eq!(report.results[0].symbol, "AAAUSDT");
    assert!(report.results[0].outcome.is_err());
    assert_eq!(notifier.sent.borrow().len(), 1);
    assert!(notifier.sent.borrow()[0].starts_with("🪙 BBBUSDT"));
    assert_eq!(memory.get("AAAUSDT"), None);
}

#[test]
fn malformed_payload_degrades_to_insufficient_data() {
    let market = FakeMarket::default();
    market.fail_data("BTCUSDT");
    let notifier = RecordingNotifier::default();
    let config = config_for(&["BTCUSDT"]);
    let poller = Poller::new(&market, &notifier, &config);
    let mut memory = SignalMemory::new();

    let report = poller.run_pass(&mut memory);
    assert_eq!(report.failed(), 0);
    assert_eq!(report.notified(), 1);
    assert!(notifier.sent.borrow()[0].ends_with("not enough data"));
    assert_eq!(memory.get("BTCUSDT"), Some("not enough data"));
}

#[test]
fn notify_failure_is_recorded_for_that_symbol() {
    let market = FakeMarket::default();
    market.set("BTCUSDT", rising_closes(40));
    let notifier = FailingNotifier;
    let config = config_for(&["BTCUSDT"]);
    let poller = Poller::new(&market, &notifier, &config);
    let mut memory = SignalMemory::new();

    let report = poller.run_pass(&mut memory);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.notified(), 0);
}

#[test]
fn insufficient_data_reasons_are_distinct_signals() {
    let market = FakeMarket::default();
    let notifier = RecordingNotifier::default();
    let config = config_for(&["BTCUSDT"]);
    let poller = Poller::new(&market, &notifier, &config);
    let mut memory = SignalMemory::new();

    // 14 flat closes then a rising tail: still below the 20-candle floor.
    let mut closes = vec![100.0; 14];
    closes.extend([101.0, 102.0, 103.0, 104.0, 105.0]);
    market.set("BTCUSDT", closes.clone());
    poller.run_pass(&mut memory);
    assert_eq!(memory.get("BTCUSDT"), Some("not enough data"));

    // At 20 closes the floor passes but MACD is still warming up; the new
    // reason is a new rendered signal, so it notifies again.
    closes.push(106.0);
    market.set("BTCUSDT", closes.clone());
    let report = poller.run_pass(&mut memory);
    assert_eq!(report.notified(), 1);
    assert_eq!(memory.get("BTCUSDT"), Some("MACD unavailable"));

    // With a long enough series every indicator resolves; a monotonic rise
    // has no fresh cross, so the outcome is neutral.
    while closes.len() < 40 {
        closes.push(closes.last().copied().unwrap_or(100.0) + 1.0);
    }
    market.set("BTCUSDT", closes);
    let report = poller.run_pass(&mut memory);
    assert_eq!(report.notified(), 1);
    let last = notifier.sent.borrow().last().cloned().unwrap_or_default();
    assert!(last.contains("⏳ No clear signal."));
    assert_eq!(notifier.sent.borrow().len(), 3);
}

#[test]
fn delivery_outcomes_expose_rendered_signal() {
    let market = FakeMarket::default();
    market.set("BTCUSDT", rising_closes(40));
    let notifier = RecordingNotifier::default();
    let config = config_for(&["BTCUSDT"]);
    let poller = Poller::new(&market, &notifier, &config);
    let mut memory = SignalMemory::new();

    let report = poller.run_pass(&mut memory);
    match &report.results[0].outcome {
        Ok(Delivery::Notified { rendered }) => {
            assert_eq!(memory.get("BTCUSDT"), Some(rendered.as_str()));
        }
        other => panic!("expected notified outcome, got {other:?}"),
    }
}
