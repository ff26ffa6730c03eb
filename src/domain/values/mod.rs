pub mod sharpe;
pub mod trade_action;
