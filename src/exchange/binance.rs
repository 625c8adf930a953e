use crate::exchange::{CandleRequest, MarketData};
use crate::models::Candle;
use crate::{Error, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct BinanceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

pub struct BinanceMarketData {
    client: Client,
    config: BinanceConfig,
}

impl BinanceMarketData {
    pub fn new(config: BinanceConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::config("base_url must be set"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|err| Error::transport(format!("http client build failed: {err}")))?;
        Ok(Self { client, config })
    }

    fn fetch_text(&self, path: &str, query: &[(String, String)]) -> Result<String> {
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|err| Error::transport(format!("http request failed: {err}")))?;
        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "binance response status: {}",
                response.status()
            )));
        }
        response
            .text()
            .map_err(|err| Error::transport(format!("http read failed: {err}")))
    }
}

impl MarketData for BinanceMarketData {
    fn fetch_candles(&self, req: &CandleRequest) -> Result<Vec<Candle>> {
        let query = vec![
            ("symbol".to_string(), req.symbol.clone()),
            ("interval".to_string(), req.interval.clone()),
            ("limit".to_string(), req.limit.to_string()),
        ];
        let text = self.fetch_text("/api/v3/klines", &query)?;
        parse_klines(&text)
    }
}

pub fn parse_klines(text: &str) -> Result<Vec<Candle>> {
    let json: Value = serde_json::from_str(text)
        .map_err(|err| Error::data(format!("klines json parse failed: {err}")))?;
    let array = json
        .as_array()
        .ok_or_else(|| Error::data("klines response should be array"))?;

    let mut candles = Vec::with_capacity(array.len());
    for row in array {
        let row = row
            .as_array()
            .ok_or_else(|| Error::data("kline row is not array"))?;
        if row.len() < 7 {
            return Err(Error::data("kline row has insufficient fields"));
        }
        let close_time_ms = value_to_i64(&row[6])?;
        let open = value_to_f64(&row[1])?;
        let high = value_to_f64(&row[2])?;
        let low = value_to_f64(&row[3])?;
        let close = value_to_f64(&row[4])?;
        let volume = value_to_f64(&row[5])?;
        candles.push(Candle {
            time: close_time_ms / 1000,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    // Chronological order is an invariant downstream.
    candles.sort_by_key(|candle| candle.time);
    candles.dedup_by_key(|candle| candle.time);
    Ok(candles)
}

fn value_to_i64(value: &Value) -> Result<i64> {
    match value {
        Value::Number(number) => number.as_i64().ok_or_else(|| Error::data("number is not i64")),
        Value::String(text) => text
            .parse::<i64>()
            .map_err(|err| Error::data(format!("invalid i64: {err}"))),
        _ => Err(Error::data("unexpected value type for i64")),
    }
}

fn value_to_f64(value: &Value) -> Result<f64> {
    match value {
        Value::Number(number) => number.as_f64().ok_or_else(|| Error::data("number is not f64")),
        Value::String(text) => text
            .parse::<f64>()
            .map_err(|err| Error::data(format!("invalid f64: {err}"))),
        _ => Err(Error::data("unexpected value type for f64")),
    }
}
