use crate::domain::values::trade_action::TradeAction;
use serde::{Deserialize, Serialize};

/// One structured instruction from an array-mode reply. The raw `action`
/// token is kept verbatim; `kind()` maps it into the recognized vocabulary,
/// flagging anything else as `Unknown` for display rather than rejecting
/// the record. Sizing fields are only expected on open actions and are not
/// numerically validated here — this system emits text, it never executes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Decision {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub leverage: Option<f64>,
    #[serde(default)]
    pub position_size_usd: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
    /// 0-100 self-assessed confidence.
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub risk_usd: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl Decision {
    pub fn kind(&self) -> TradeAction {
        TradeAction::classify(&self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_preserves_raw_token() {
        let d = Decision {
            symbol: "BTCUSDT".into(),
            action: "yolo_long".into(),
            ..Default::default()
        };
        assert_eq!(d.kind(), TradeAction::Unknown);
        assert_eq!(d.action, "yolo_long");
    }

    #[test]
    fn test_deserialize_close_decision_without_sizing() {
        let d: Decision =
            serde_json::from_str(r#"{"symbol": "ETHUSDT", "action": "close_long", "reasoning": "take profit"}"#)
                .unwrap();
        assert_eq!(d.kind(), TradeAction::CloseLong);
        assert!(d.leverage.is_none());
        assert!(d.stop_loss.is_none());
    }
}
