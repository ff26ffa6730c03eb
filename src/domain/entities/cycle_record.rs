use crate::domain::entities::account::PaperAccount;
use crate::domain::entities::analysis::AnalysisReport;
use crate::domain::entities::decision::Decision;
use crate::domain::entities::market_snapshot::PriceChanges;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleKind {
    Analysis,
    Trading,
}

/// One completed (or failed) monitoring cycle, appended as a single line to
/// the date-keyed JSONL log. Self-contained: the chain of trace is always
/// recorded even when structured extraction failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: CycleKind,
    pub cycle: u64,
    pub success: bool,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub price_changes: Option<PriceChanges>,
    #[serde(default)]
    pub cot_trace: Option<String>,
    #[serde(default)]
    pub analysis: Option<AnalysisReport>,
    #[serde(default)]
    pub decisions: Vec<Decision>,
    #[serde(default)]
    pub account: Option<PaperAccount>,
    #[serde(default)]
    pub sharpe_ratio: Option<f64>,
    #[serde(default)]
    pub chart_attached: bool,
    #[serde(default)]
    pub telegram_sent: bool,
    /// Which stage failed and why, when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

impl CycleRecord {
    pub fn new(kind: CycleKind, cycle: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            kind,
            cycle,
            success: false,
            symbol: None,
            current_price: None,
            price_changes: None,
            cot_trace: None,
            analysis: None,
            decisions: Vec::new(),
            account: None,
            sharpe_ratio: None,
            chart_attached: false,
            telegram_sent: false,
            error: None,
        }
    }

    pub fn failed(kind: CycleKind, cycle: u64, stage: &str, error: impl std::fmt::Display) -> Self {
        let mut record = Self::new(kind, cycle);
        record.error = Some(format!("{stage}: {error}"));
        record
    }
}
