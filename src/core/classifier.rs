use crate::config::SignalConfig;
use crate::core::snapshot::IndicatorSnapshot;
use crate::models::Signal;

/// Rules are evaluated in order; the first match wins.
pub fn classify(series_len: usize, snapshot: &IndicatorSnapshot, config: &SignalConfig) -> Signal {
    if series_len < config.min_candles as usize {
        return Signal::insufficient("not enough data");
    }
    let Some(rsi) = snapshot.rsi else {
        return Signal::insufficient("RSI unavailable");
    };
    let Some(macd) = snapshot.macd else {
        return Signal::insufficient("MACD unavailable");
    };
    let (Some(ema_fast), Some(ema_slow)) = (snapshot.ema_fast, snapshot.ema_slow) else {
        return Signal::insufficient("EMA unavailable");
    };

    let ema_up = ema_fast > ema_slow;
    let ema_down = ema_fast < ema_slow;

    if rsi < config.oversold && macd.crossed_up() && ema_up {
        Signal::Buy { rsi }
    } else if rsi > config.overbought && macd.crossed_down() && ema_down {
        Signal::Sell { rsi }
    } else {
        Signal::Neutral { rsi }
    }
}
