pub mod types;

pub use types::{Candle, Signal};
