use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed vocabulary the model is instructed to use for decisions.
/// `Unknown` is never emitted by `FromStr`; it exists so that unrecognized
/// tokens can be carried through to display instead of being dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    OpenLong,
    OpenShort,
    CloseLong,
    CloseShort,
    Hold,
    Wait,
    Unknown,
}

impl TradeAction {
    /// Total classifier: any token outside the fixed set maps to `Unknown`.
    pub fn classify(s: &str) -> Self {
        s.parse().unwrap_or(TradeAction::Unknown)
    }

    /// Open actions carry sizing/risk fields (leverage, stop loss, ...).
    pub fn is_open(&self) -> bool {
        matches!(self, TradeAction::OpenLong | TradeAction::OpenShort)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            TradeAction::OpenLong => "📈",
            TradeAction::OpenShort => "📉",
            TradeAction::CloseLong | TradeAction::CloseShort => "✅",
            TradeAction::Hold => "⏸",
            TradeAction::Wait => "⏰",
            TradeAction::Unknown => "❓",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::OpenLong => write!(f, "open_long"),
            TradeAction::OpenShort => write!(f, "open_short"),
            TradeAction::CloseLong => write!(f, "close_long"),
            TradeAction::CloseShort => write!(f, "close_short"),
            TradeAction::Hold => write!(f, "hold"),
            TradeAction::Wait => write!(f, "wait"),
            TradeAction::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for TradeAction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open_long" => Ok(TradeAction::OpenLong),
            "open_short" => Ok(TradeAction::OpenShort),
            "close_long" => Ok(TradeAction::CloseLong),
            "close_short" => Ok(TradeAction::CloseShort),
            "hold" => Ok(TradeAction::Hold),
            "wait" => Ok(TradeAction::Wait),
            _ => Err(format!("Unknown trade action: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_tokens() {
        assert_eq!(TradeAction::classify("open_long"), TradeAction::OpenLong);
        assert_eq!(TradeAction::classify("HOLD"), TradeAction::Hold);
        assert_eq!(TradeAction::classify("wait"), TradeAction::Wait);
    }

    #[test]
    fn test_classify_unknown_token() {
        assert_eq!(TradeAction::classify("moonshot"), TradeAction::Unknown);
        assert_eq!(TradeAction::classify(""), TradeAction::Unknown);
    }

    #[test]
    fn test_open_actions() {
        assert!(TradeAction::OpenShort.is_open());
        assert!(!TradeAction::CloseLong.is_open());
        assert!(!TradeAction::Wait.is_open());
    }
}
