use crate::domain::values::sharpe::sharpe_ratio;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Simulated account state fed to the trading prompt. Nothing here touches
/// an exchange; it exists so the model reasons against realistic
/// equity/margin constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperAccount {
    pub total_equity: f64,
    pub available_balance: f64,
    pub total_pnl: f64,
    pub total_pnl_pct: f64,
    pub margin_used: f64,
    pub margin_used_pct: f64,
    pub position_count: usize,
    pub positions: Vec<Position>,
    /// Per-trade returns (percent) of closed trades, oldest first.
    pub trade_returns: Vec<f64>,
}

impl PaperAccount {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            total_equity: initial_balance,
            available_balance: initial_balance,
            total_pnl: 0.0,
            total_pnl_pct: 0.0,
            margin_used: 0.0,
            margin_used_pct: 0.0,
            position_count: 0,
            positions: Vec::new(),
            trade_returns: Vec::new(),
        }
    }

    /// Cycle-level performance feedback handed back to the model.
    pub fn sharpe_ratio(&self) -> f64 {
        sharpe_ratio(&self.trade_returns)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: String,
    pub entry_price: f64,
    pub mark_price: f64,
    pub unrealized_pnl_pct: f64,
    pub leverage: f64,
    pub margin_used: f64,
    pub liquidation_price: f64,
    pub opened_at: DateTime<Utc>,
}

impl Position {
    pub fn holding_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.opened_at).num_minutes().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_account() {
        let acct = PaperAccount::new(1000.0);
        assert_eq!(acct.total_equity, 1000.0);
        assert_eq!(acct.available_balance, 1000.0);
        assert_eq!(acct.position_count, 0);
        assert_eq!(acct.sharpe_ratio(), 0.0);
    }

    #[test]
    fn test_sharpe_uses_trade_returns() {
        let mut acct = PaperAccount::new(1000.0);
        acct.trade_returns = vec![1.0, 2.0, 3.0];
        assert!(acct.sharpe_ratio() > 0.0);
    }
}
