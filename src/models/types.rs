#[derive(Clone, Debug, PartialEq)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    Buy { rsi: f64 },
    Sell { rsi: f64 },
    Neutral { rsi: f64 },
    InsufficientData { reason: String },
}

impl Signal {
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Signal::InsufficientData {
            reason: reason.into(),
        }
    }

    // The rendered string is the unit of change detection; any change in
    // wording or rounding counts as a new signal.
    pub fn render(&self) -> String {
        match self {
            Signal::Buy { rsi } => {
                format!("📈 BUY: RSI={rsi:.2}, MACD crossed up, fast EMA above slow")
            }
            Signal::Sell { rsi } => {
                format!("📉 SELL: RSI={rsi:.2}, MACD crossed down, fast EMA below slow")
            }
            Signal::Neutral { rsi } => {
                format!("⏳ No clear signal. RSI={rsi:.2}")
            }
            Signal::InsufficientData { reason } => reason.clone(),
        }
    }
}
