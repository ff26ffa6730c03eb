pub mod binance;
pub mod indicators;
