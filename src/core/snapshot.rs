use crate::config::IndicatorConfig;
use crate::core::indicators::{ema, macd, rsi};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacdState {
    pub line: f64,
    pub signal: f64,
    pub prev_line: f64,
    pub prev_signal: f64,
}

impl MacdState {
    pub fn crossed_up(&self) -> bool {
        self.line > self.signal && self.prev_line < self.prev_signal
    }

    pub fn crossed_down(&self) -> bool {
        self.line < self.signal && self.prev_line > self.prev_signal
    }
}

/// Latest indicator values for one symbol, recomputed from scratch every
/// pass and discarded after classification. A `None` field means the
/// series is still inside that indicator's warm-up.
#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub macd: Option<MacdState>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn compute(closes: &[f64], config: &IndicatorConfig) -> Self {
        let rsi_series = rsi(closes, config.rsi_window as usize);
        let macd_series = macd(
            closes,
            config.macd_fast as usize,
            config.macd_slow as usize,
            config.macd_signal as usize,
        );
        let ema_fast_series = ema(closes, config.ema_fast as usize);
        let ema_slow_series = ema(closes, config.ema_slow as usize);

        let macd_state = match (
            last_two(&macd_series.line),
            last_two(&macd_series.signal),
        ) {
            (Some((prev_line, line)), Some((prev_signal, signal))) => Some(MacdState {
                line,
                signal,
                prev_line,
                prev_signal,
            }),
            _ => None,
        };

        Self {
            rsi: rsi_series.last().copied(),
            macd: macd_state,
            ema_fast: ema_fast_series.last().copied(),
            ema_slow: ema_slow_series.last().copied(),
        }
    }
}

fn last_two(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    Some((values[values.len() - 2], values[values.len() - 1]))
}
