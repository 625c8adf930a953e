pub mod binance;

use crate::models::Candle;
use crate::Result;

pub struct CandleRequest {
    pub symbol: String,
    pub interval: String,
    pub limit: u32,
}

pub trait MarketData {
    fn fetch_candles(&self, req: &CandleRequest) -> Result<Vec<Candle>>;
}
