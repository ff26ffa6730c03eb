//! Prompt construction and report formatting for the pure-analysis
//! workflow: the model is asked for a market read, never for trades.

use super::{escape_html, format_series};
use crate::domain::entities::analysis::AnalysisReport;
use crate::domain::entities::market_snapshot::{MarketSnapshot, TimeframeSeries};
use chrono::Utc;

pub fn build_system_prompt() -> String {
    r#"You are a professional cryptocurrency market analysis AI focused on multi-timeframe BTC analysis and trend forecasting.

# Core task

1. Multi-timeframe analysis: combine the 3m, 15m, 1h and 4h timeframes into one coherent read.
2. Identify key signals: important indicator events and cross-timeframe trend resonance.
3. Forecast the short and medium term based on the data.
4. Flag risks: potential failure points and the price levels that matter.

Important: this is a pure analysis task. Do NOT give trading advice; describe the market state objectively.

# Data you receive

Four timeframes, each with price series (open/high/low/close), EMA20/EMA50, MACD (line, signal, histogram), RSI(7)/RSI(14), ATR(14), Bollinger bands and volume with its moving average:
- 3m (ultra short term, momentum and fast reversals)
- 15m (short term, intraday levels)
- 1h (intraday trend, support/resistance)
- 4h (medium term trend, major levels)

# Method

- Trend resonance: aligned timeframes mean a strong trend; a short timeframe against the long ones suggests pullback or reversal. Read the EMA20/EMA50 stacking per timeframe.
- Support/resistance: levels from the 4h chart matter most; levels shared across timeframes are strongest; include the Bollinger bands.
- Momentum: short-timeframe RSI for overbought/oversold, long-timeframe MACD for trend strength, histogram changes for momentum shifts.
- Divergence: price making new highs/lows unconfirmed by the indicator, across several timeframes, is a strong signal.

# Output format

Step 1: a concise free-text chain of reasoning covering per-timeframe trend state, resonance or divergence, key signals, the basis for your forecast, and risks.

Step 2: a structured JSON summary:

```json
{
  "market_state": "uptrend | downtrend | ranging | reversal",
  "timeframe_analysis": {"3m": "...", "15m": "...", "1h": "...", "4h": "..."},
  "trend_resonance": "aligned | short-term pullback | divergent",
  "short_term_trend": "expected move over the next 1-2 hours",
  "mid_term_trend": "expected move over the next 4-6 hours",
  "key_levels": {"support": 0, "resistance": 0},
  "confidence": 75,
  "key_signals": ["signal 1", "signal 2"],
  "risk_warning": "...",
  "summary": "one-sentence summary"
}
```

Remember: read the long timeframes (4h/1h) first for the big trend, use the short ones (15m/3m) for timing, and always state uncertainty."#
        .to_string()
}

pub fn build_user_prompt(snapshot: &MarketSnapshot, runtime_minutes: i64, call_count: u64) -> String {
    let mut lines: Vec<String> = Vec::new();

    let now = Utc::now().format("%Y-%m-%d %H:%M:%S");
    lines.push(format!(
        "**Time**: {now} | **Cycle**: #{call_count} | **Runtime**: {runtime_minutes} minutes\n"
    ));

    lines.push(format!("## {} market overview\n", snapshot.symbol));
    lines.push(format!("**Current price**: ${:.2}\n", snapshot.current_price));

    let pc = &snapshot.price_changes;
    lines.push("**Price change by timeframe**:".to_string());
    lines.push(format!("  - 15m: {:+.2}%", pc.m15));
    lines.push(format!("  - 1h: {:+.2}%", pc.h1));
    lines.push(format!("  - 4h: {:+.2}%", pc.h4));
    lines.push(format!("  - 24h: {:+.2}%\n", pc.h24));

    lines.push("## Multi-timeframe technical data\n".to_string());
    for (name, series) in snapshot.timeframes() {
        lines.push(format_timeframe_detail(name, series));
    }

    lines.push("## Market funding\n".to_string());
    lines.push(format!("**Open interest**: {:.0}", snapshot.open_interest.latest));
    lines.push(format!(
        "**Funding rate**: {:.6} ({:.4}%){}",
        snapshot.funding_rate,
        snapshot.funding_rate * 100.0,
        funding_note(snapshot.funding_rate)
    ));
    lines.push(String::new());

    lines.push("---\n".to_string());
    lines.push(
        "Using all four timeframes, provide: per-timeframe trend reads, resonance or divergence, \
         key signals, support/resistance levels, a short- and mid-term forecast, and risks."
            .to_string(),
    );
    lines.push(
        "**Output format**: chain-of-reasoning text followed by the structured JSON summary \
         (including the timeframe_analysis field).\n"
            .to_string(),
    );

    lines.join("\n")
}

fn format_timeframe_detail(name: &str, series: &TimeframeSeries) -> String {
    let c = &series.current;
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("### {name} ({} points available)\n", series.data_points));
    lines.push("**Latest bar**:".to_string());
    lines.push(format!("  - Price: ${:.2}", c.price));
    lines.push(format!(
        "  - EMA trend: {} (EMA20 ${:.2} | EMA50 ${:.2})",
        series.ema_trend(),
        c.ema20,
        c.ema50
    ));
    lines.push(format!(
        "  - MACD: {:.4} ({})",
        c.macd,
        if c.macd > 0.0 { "bullish" } else { "bearish" }
    ));
    let rsi_state = if c.rsi14 > 70.0 {
        "overbought"
    } else if c.rsi14 < 30.0 {
        "oversold"
    } else {
        "neutral"
    };
    lines.push(format!(
        "  - RSI(7): {:.2} | RSI(14): {:.2} ({rsi_state})",
        c.rsi7, c.rsi14
    ));
    lines.push(format!("  - ATR(14): {:.2}", c.atr14));

    let vol_ratio = series.volume_ratio();
    let vol_state = if vol_ratio > 120.0 {
        "expanding"
    } else if vol_ratio < 80.0 {
        "contracting"
    } else {
        "normal"
    };
    lines.push(format!(
        "  - Volume: {:.0} ({vol_state}, {vol_ratio:.0}% of MA)",
        c.volume
    ));

    if let (Some(upper), Some(lower)) = (series.bb_upper.last(), series.bb_lower.last()) {
        lines.push("**Bollinger**:".to_string());
        lines.push(format!("  - Upper ${upper:.2} | Lower ${lower:.2}"));
        lines.push(format!("  - Price position: {:.1}%", series.bollinger_position()));
    }

    lines.push("**Recent series** (last 10 points):".to_string());
    lines.push(format!("  - Prices: {}", format_series(&series.prices, 10, 2)));
    lines.push(format!("  - MACD hist: {}", format_series(&series.macd_hist, 10, 3)));
    lines.push(format!("  - RSI(14): {}", format_series(&series.rsi14, 10, 1)));
    lines.push(String::new());

    lines.join("\n")
}

fn funding_note(rate: f64) -> &'static str {
    if rate > 0.0001 {
        " -> longs paying up, bullish sentiment elevated"
    } else if rate < -0.0001 {
        " -> shorts paying up, bearish sentiment elevated"
    } else {
        " -> near neutral, longs and shorts balanced"
    }
}

/// Build the Telegram HTML report for an analysis cycle. A missing report
/// (text-only reply) still yields a readable message around the trace.
pub fn format_analysis_message(cot_trace: &str, report: Option<&AnalysisReport>, symbol: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let divider = "━".repeat(40);

    lines.push(format!("🤖 <b>{symbol} multi-timeframe analysis</b>\n"));
    lines.push(divider.clone());
    lines.push(String::new());

    if let Some(report) = report {
        if let Some(summary) = &report.summary {
            lines.push(format!("📌 <b>Summary</b>: {}\n", escape_html(summary)));
        }
        if let Some(state) = &report.market_state {
            let emoji = match state.as_str() {
                "uptrend" => "📈",
                "downtrend" => "📉",
                "ranging" => "↔️",
                "reversal" => "🔄",
                _ => "📊",
            };
            lines.push(format!("{emoji} <b>Market state</b>: {}\n", escape_html(state)));
        }
        if !report.timeframe_analysis.is_empty() {
            lines.push("⏱ <b>Timeframe trends</b>:".to_string());
            for tf in ["3m", "15m", "1h", "4h"] {
                if let Some(desc) = report.timeframe_analysis.get(tf) {
                    lines.push(format!("  - {tf}: {}", escape_html(desc)));
                }
            }
            lines.push(String::new());
        }
        if let Some(resonance) = &report.trend_resonance {
            lines.push(format!("🔄 <b>Resonance</b>: {}\n", escape_html(resonance)));
        }
        if let Some(trend) = &report.short_term_trend {
            lines.push(format!("⏰ <b>Short term (1-2h)</b>: {}", escape_html(trend)));
        }
        if let Some(trend) = &report.mid_term_trend {
            lines.push(format!("⏳ <b>Mid term (4-6h)</b>: {}\n", escape_html(trend)));
        }
        if let Some(levels) = &report.key_levels {
            lines.push("🎯 <b>Key levels</b>:".to_string());
            if let Some(r) = levels.resistance {
                lines.push(format!("  - Resistance: ${r:.2}"));
            }
            if let Some(s) = levels.support {
                lines.push(format!("  - Support: ${s:.2}"));
            }
            lines.push(String::new());
        }
        if !report.key_signals.is_empty() {
            lines.push("⚡ <b>Key signals</b>:".to_string());
            for signal in &report.key_signals {
                lines.push(format!("  - {}", escape_html(signal)));
            }
            lines.push(String::new());
        }
        if let Some(warning) = &report.risk_warning {
            lines.push(format!("⚠️ <b>Risk</b>: {}\n", escape_html(warning)));
        }
        if let Some(confidence) = report.confidence {
            let level = if confidence >= 80.0 {
                "high"
            } else if confidence >= 60.0 {
                "medium"
            } else {
                "low"
            };
            lines.push(format!("📊 <b>Confidence</b>: {confidence:.0}% ({level})\n"));
        }
    } else {
        lines.push("📄 <b>No structured summary this cycle</b>\n".to_string());
    }

    lines.push(divider);
    lines.push(String::new());
    lines.push("💭 <b>Model reasoning</b>:".to_string());

    let preview: String = cot_trace.chars().take(400).collect();
    lines.push(format!("<pre>{}</pre>", escape_html(&preview)));
    if cot_trace.chars().count() > 400 {
        lines.push("<i>... full reasoning saved to the cycle log</i>".to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::analysis::KeyLevels;

    #[test]
    fn test_message_includes_escaped_summary() {
        let report = AnalysisReport {
            summary: Some("support < 90k & rising".into()),
            market_state: Some("uptrend".into()),
            confidence: Some(82.0),
            key_levels: Some(KeyLevels {
                support: Some(90000.0),
                resistance: Some(95000.0),
            }),
            ..Default::default()
        };
        let msg = format_analysis_message("trace", Some(&report), "BTCUSDT");
        assert!(msg.contains("support &lt; 90k &amp; rising"));
        assert!(msg.contains("📈"));
        assert!(msg.contains("Resistance: $95000.00"));
        assert!(msg.contains("(high)"));
    }

    #[test]
    fn test_message_without_report_keeps_trace() {
        let msg = format_analysis_message("just text", None, "BTCUSDT");
        assert!(msg.contains("No structured summary"));
        assert!(msg.contains("<pre>just text</pre>"));
    }

    #[test]
    fn test_long_trace_is_truncated() {
        let trace = "x".repeat(1000);
        let msg = format_analysis_message(&trace, None, "BTCUSDT");
        assert!(msg.contains("full reasoning saved"));
    }
}
