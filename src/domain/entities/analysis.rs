use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured summary the model appends after its free-form reasoning in
/// analysis (object) mode. Every field is optional: the model is asked for
/// all of them but frequently omits some, and a partial report is still
/// worth relaying.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub market_state: Option<String>,
    /// Per-timeframe trend descriptions keyed by "3m"/"15m"/"1h"/"4h".
    #[serde(default)]
    pub timeframe_analysis: BTreeMap<String, String>,
    #[serde(default)]
    pub trend_resonance: Option<String>,
    #[serde(default)]
    pub short_term_trend: Option<String>,
    #[serde(default)]
    pub mid_term_trend: Option<String>,
    #[serde(default)]
    pub key_levels: Option<KeyLevels>,
    /// 0-100 self-assessed confidence.
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub key_signals: Vec<String>,
    #[serde(default)]
    pub risk_warning: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeyLevels {
    #[serde(default)]
    pub support: Option<f64>,
    #[serde(default)]
    pub resistance: Option<f64>,
}
