//! Pure indicator math over a closing-price series, oldest to newest.
//!
//! Each function returns only the points for which the indicator is
//! defined; warm-up points are absent rather than NaN-padded. EMAs are
//! seeded with the simple average of the first window, RSI uses Wilder's
//! recursive smoothing.

pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

// First output corresponds to input index `window - 1`.
pub fn ema(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }
    let k = 2.0 / (window as f64 + 1.0);
    let seed: f64 = values[..window].iter().sum::<f64>() / window as f64;
    let mut output = Vec::with_capacity(values.len() - window + 1);
    output.push(seed);
    let mut previous = seed;
    for &value in &values[window..] {
        previous = (value - previous) * k + previous;
        output.push(previous);
    }
    output
}

// First output corresponds to input index `window`, so `window + 1` closes
// are required for a single point.
pub fn rsi(closes: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || closes.len() <= window {
        return Vec::new();
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=window {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }
    let mut avg_gain = gains / window as f64;
    let mut avg_loss = losses / window as f64;

    let mut output = Vec::with_capacity(closes.len() - window);
    output.push(rsi_point(avg_gain, avg_loss));

    for i in (window + 1)..closes.len() {
        let change = closes[i] - closes[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (window - 1) as f64 + gain) / window as f64;
        avg_loss = (avg_loss * (window - 1) as f64 + loss) / window as f64;
        output.push(rsi_point(avg_gain, avg_loss));
    }
    output
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_window: usize) -> MacdSeries {
    if fast == 0 || slow == 0 || fast >= slow {
        return MacdSeries {
            line: Vec::new(),
            signal: Vec::new(),
        };
    }
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    if slow_ema.is_empty() {
        return MacdSeries {
            line: Vec::new(),
            signal: Vec::new(),
        };
    }

    // The fast EMA starts earlier; align both on the slow warm-up.
    let offset = slow - fast;
    let line: Vec<f64> = fast_ema[offset..]
        .iter()
        .zip(slow_ema.iter())
        .map(|(fast_value, slow_value)| fast_value - slow_value)
        .collect();
    let signal = ema(&line, signal_window);

    MacdSeries { line, signal }
}

fn rsi_point(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
