//! Prompt construction and report formatting for the trading-decision
//! workflow. The model manages a simulated account and answers with a JSON
//! decision array; everything stays text-only.

use super::{escape_html, format_series};
use crate::domain::entities::account::PaperAccount;
use crate::domain::entities::decision::Decision;
use crate::domain::entities::market_snapshot::{MarketSnapshot, TimeframeSeries};
use crate::domain::values::trade_action::TradeAction;
use chrono::Utc;

pub fn build_system_prompt(account_equity: f64, btc_eth_leverage: u32, altcoin_leverage: u32) -> String {
    let mut prompt = String::from(
        r#"You are a professional cryptocurrency trading AI operating autonomously on a perpetual futures market.

# Core objective

Maximize the Sharpe ratio (mean return / return volatility).

- High-quality trades (high win rate, large reward:risk) raise Sharpe.
- Steady gains with controlled drawdowns raise Sharpe.
- Patient holding that lets winners run raises Sharpe.
- Frequent small wins and losses add volatility and crush Sharpe.
- Overtrading bleeds fees; premature exits forfeit the big moves.

Key insight: the system scans every few minutes, but that does NOT mean you trade every scan. Most cycles should end in `wait` or `hold`; open only on exceptional setups.

# Hard constraints (risk control)

1. Reward:risk must be at least 3:1.
2. At most 3 symbols held at once (quality over quantity).
"#,
    );

    prompt.push_str(&format!(
        "3. Position size: altcoins {:.0}-{:.0} USD ({altcoin_leverage}x leverage) | BTC/ETH {:.0}-{:.0} USD ({btc_eth_leverage}x leverage)\n",
        account_equity * 0.8,
        account_equity * 1.5,
        account_equity * 5.0,
        account_equity * 10.0,
    ));
    prompt.push_str("4. Total margin usage must stay at or below 90%.\n\n");

    prompt.push_str(r#"# Trading discipline

- Capital preservation first; protecting equity beats chasing returns.
- Execute your exit plan; never move stops or targets on impulse.
- A handful of high-conviction trades beats many low-conviction ones.
- Respect the trend; do not fade strong momentum.
- Avoid revenge trading after a loss and analysis paralysis before an entry.
- BTC usually leads altcoins; check BTC first.

# Entry standard (strict)

Open a position only on a strong signal; when unsure, wait. You have the
full price/EMA/MACD/RSI/ATR/Bollinger/volume series per timeframe plus open
interest and funding. Cross-validate several dimensions (price + volume +
OI + indicator + series shape) and require overall confidence >= 75 to open.
Avoid single-indicator signals, contradictory reads, and choppy ranges.

# Sharpe feedback loop

Each cycle you receive the account's Sharpe ratio:
- below -0.5: stop trading, wait for at least 6 cycles and rethink frequency, holding time and signal quality
- -0.5 to 0: only confidence > 80 trades, at most one new position per hour
- 0 to 0.7: keep the current approach
- above 0.7: position sizes may grow moderately

# Decision flow

1. Read the Sharpe ratio: is the current approach working?
2. Review open positions: has the trend changed, is it time to exit?
3. Look for fresh setups, long or short.
4. Output your decisions.

# Output format

Step 1: a concise free-text chain of reasoning.

Step 2: a JSON decision array:

```json
[
"#);

    prompt.push_str(&format!(
        "  {{\"symbol\": \"BTCUSDT\", \"action\": \"open_short\", \"leverage\": {btc_eth_leverage}, \"position_size_usd\": {:.0}, \"stop_loss\": 97000, \"take_profit\": 91000, \"confidence\": 85, \"risk_usd\": 300, \"reasoning\": \"downtrend + MACD cross\"}},\n",
        account_equity * 5.0
    ));
    prompt.push_str(
        r#"  {"symbol": "ETHUSDT", "action": "close_long", "reasoning": "take profit"}
]
```

Field notes:
- `action`: open_long | open_short | close_long | close_short | hold | wait
- `confidence`: 0-100 (openings should be >= 75)
- openings require: leverage, position_size_usd, stop_loss, take_profit, confidence, risk_usd, reasoning

Remember: the target is Sharpe, not activity. Missing a trade is fine; taking a bad one is not. 3:1 reward:risk is the floor."#,
    );

    prompt
}

pub fn build_user_prompt(
    snapshot: &MarketSnapshot,
    runtime_minutes: i64,
    call_count: u64,
    account: &PaperAccount,
    sharpe_ratio: f64,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    let now = Utc::now().format("%Y-%m-%d %H:%M:%S");
    lines.push(format!(
        "Time: {now} | Cycle: #{call_count} | Runtime: {runtime_minutes} minutes\n"
    ));

    let pc = &snapshot.price_changes;
    lines.push(format!(
        "{}: ${:.2} (1h: {:+.2}%, 4h: {:+.2}%) | MACD: {:.4} | RSI(7): {:.2}\n",
        snapshot.symbol, snapshot.current_price, pc.h1, pc.h4, snapshot.current_macd, snapshot.current_rsi7
    ));

    let available_pct = if account.total_equity > 0.0 {
        account.available_balance / account.total_equity * 100.0
    } else {
        0.0
    };
    lines.push(format!(
        "Account: equity {:.2} | balance {:.2} ({available_pct:.1}%) | PnL {:+.2}% | margin {:.1}% | positions {}\n",
        account.total_equity,
        account.available_balance,
        account.total_pnl_pct,
        account.margin_used_pct,
        account.position_count
    ));

    if account.positions.is_empty() {
        lines.push("Open positions: none\n".to_string());
    } else {
        lines.push("## Open positions\n".to_string());
        let now = Utc::now();
        for (i, pos) in account.positions.iter().enumerate() {
            lines.push(format!(
                "{}. {} {} | entry {:.4} mark {:.4} | PnL {:+.2}% | {}x | margin {:.0} | liq {:.4} | held {} min",
                i + 1,
                pos.symbol,
                pos.side.to_uppercase(),
                pos.entry_price,
                pos.mark_price,
                pos.unrealized_pnl_pct,
                pos.leverage,
                pos.margin_used,
                pos.liquidation_price,
                pos.holding_minutes(now)
            ));
        }
        lines.push(String::new());
    }

    lines.push(format!("## Candidate symbols (1)\n\n### 1. {}\n", snapshot.symbol));
    lines.push("**Timeframe overview**:\n".to_string());
    for (name, series) in snapshot.timeframes() {
        lines.push(format_timeframe_brief(name, series));
    }
    lines.push(String::new());

    lines.push("**Detailed indicators**:\n".to_string());
    for (name, series) in snapshot.timeframes() {
        lines.push(format_timeframe_detail(name, series));
    }

    lines.push("**Market funding**:".to_string());
    lines.push(format!("  - Open interest: {:.0}", snapshot.open_interest.latest));
    lines.push(format!(
        "  - Funding rate: {:.6} ({:.4}%)",
        snapshot.funding_rate,
        snapshot.funding_rate * 100.0
    ));
    lines.push(String::new());

    lines.push(format!("## Sharpe ratio: {sharpe_ratio:.2}\n"));

    lines.push("---\n".to_string());
    lines.push("Analyze and output your decisions (chain of reasoning + JSON array).\n".to_string());

    lines.join("\n")
}

fn format_timeframe_brief(name: &str, series: &TimeframeSeries) -> String {
    let c = &series.current;
    let rsi_state = if c.rsi14 > 70.0 {
        "overbought"
    } else if c.rsi14 < 30.0 {
        "oversold"
    } else {
        "neutral"
    };
    format!(
        "- **{name}**: ${:.2} | trend {} | MACD {} | RSI(14) {:.1} ({rsi_state})",
        c.price,
        series.ema_trend(),
        if c.macd > 0.0 { "bullish" } else { "bearish" },
        c.rsi14
    )
}

fn format_timeframe_detail(name: &str, series: &TimeframeSeries) -> String {
    let c = &series.current;
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("**{name}** ({} points):", series.data_points));
    lines.push(format!("  - Prices (last 10): {}", format_series(&series.prices, 10, 2)));
    lines.push(format!("  - EMA20 ${:.2} | EMA50 ${:.2}", c.ema20, c.ema50));
    lines.push(format!(
        "  - MACD {:.4} | hist {}",
        c.macd,
        format_series(&series.macd_hist, 5, 3)
    ));
    lines.push(format!(
        "  - RSI(7) {:.2} | RSI(14) {:.2} | series {}",
        c.rsi7,
        c.rsi14,
        format_series(&series.rsi14, 5, 1)
    ));
    lines.push(format!("  - ATR(14) {:.2}", c.atr14));
    if let (Some(upper), Some(lower)) = (series.bb_upper.last(), series.bb_lower.last()) {
        lines.push(format!(
            "  - Bollinger upper ${upper:.2} lower ${lower:.2} | position {:.1}%",
            series.bollinger_position()
        ));
    }
    lines.push(format!(
        "  - Volume {:.0} ({:.0}% of MA)\n",
        c.volume,
        series.volume_ratio()
    ));
    lines.join("\n")
}

/// Build the Telegram HTML report for a trading cycle. Unknown action
/// tokens are shown as-is with an `unknown` marker instead of being
/// dropped.
pub fn format_trading_message(cot_trace: &str, decisions: &[Decision], account: &PaperAccount) -> String {
    let mut lines: Vec<String> = Vec::new();
    let divider = "━".repeat(40);

    lines.push("🤖 <b>Trading decision report</b>\n".to_string());
    lines.push(divider.clone());
    lines.push(String::new());

    let available_pct = if account.total_equity > 0.0 {
        account.available_balance / account.total_equity * 100.0
    } else {
        0.0
    };
    lines.push("💰 <b>Account</b>:".to_string());
    lines.push(format!("  - Equity: ${:.2}", account.total_equity));
    lines.push(format!(
        "  - Available: ${:.2} ({available_pct:.1}%)",
        account.available_balance
    ));
    lines.push(format!("  - PnL: {:+.2}%", account.total_pnl_pct));
    lines.push(format!("  - Margin: {:.1}%", account.margin_used_pct));
    lines.push(format!("  - Positions: {}\n", account.position_count));

    if decisions.is_empty() {
        lines.push("⏰ <b>No trade this cycle</b> (waiting or holding)\n".to_string());
    } else {
        lines.push(format!("📋 <b>Decisions</b> ({}):\n", decisions.len()));
        for (i, decision) in decisions.iter().enumerate() {
            let kind = decision.kind();
            let label = if kind == TradeAction::Unknown {
                format!("{} (unknown)", escape_html(&decision.action))
            } else {
                kind.to_string()
            };
            lines.push(format!(
                "{} <b>Decision #{}: {} - {label}</b>",
                kind.emoji(),
                i + 1,
                escape_html(&decision.symbol)
            ));

            if kind.is_open() {
                if let Some(leverage) = decision.leverage {
                    lines.push(format!("  - Leverage: {leverage}x"));
                }
                if let Some(size) = decision.position_size_usd {
                    lines.push(format!("  - Size: ${size:.2}"));
                }
                if let Some(sl) = decision.stop_loss {
                    lines.push(format!("  - Stop loss: ${sl:.2}"));
                }
                if let Some(tp) = decision.take_profit {
                    lines.push(format!("  - Take profit: ${tp:.2}"));
                }
                if let Some(risk) = decision.risk_usd {
                    lines.push(format!("  - Risk: ${risk:.2}"));
                }
                if let Some(confidence) = decision.confidence {
                    lines.push(format!("  - Confidence: {confidence:.0}%"));
                }
            }
            let reasoning = decision.reasoning.as_deref().unwrap_or("none given");
            lines.push(format!("  - Reasoning: {}\n", escape_html(reasoning)));
        }
    }

    lines.push(divider);
    lines.push(String::new());
    lines.push("💭 <b>Model reasoning</b>:".to_string());

    // Telegram caps messages at 4096 characters; keep the trace under 3000.
    let escaped = escape_html(cot_trace);
    if escaped.chars().count() > 3000 {
        let preview: String = escaped.chars().take(3000).collect();
        let remaining = escaped.chars().count() - 3000;
        lines.push(format!("<pre>{preview}</pre>"));
        lines.push(format!("<i>... {remaining} more characters in the cycle log</i>"));
    } else {
        lines.push(format!("<pre>{escaped}</pre>"));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> PaperAccount {
        PaperAccount::new(1000.0)
    }

    #[test]
    fn test_empty_decisions_message() {
        let msg = format_trading_message("sitting out", &[], &account());
        assert!(msg.contains("No trade this cycle"));
        assert!(msg.contains("<pre>sitting out</pre>"));
    }

    #[test]
    fn test_open_decision_detail() {
        let decision = Decision {
            symbol: "BTCUSDT".into(),
            action: "open_long".into(),
            leverage: Some(5.0),
            position_size_usd: Some(5000.0),
            stop_loss: Some(91000.0),
            take_profit: Some(99000.0),
            confidence: Some(85.0),
            risk_usd: Some(300.0),
            reasoning: Some("trend resonance".into()),
        };
        let msg = format_trading_message("trace", &[decision], &account());
        assert!(msg.contains("open_long"));
        assert!(msg.contains("Stop loss: $91000.00"));
        assert!(msg.contains("Confidence: 85%"));
    }

    #[test]
    fn test_unknown_action_is_flagged_not_dropped() {
        let decision = Decision {
            symbol: "BTCUSDT".into(),
            action: "lambo_time".into(),
            ..Default::default()
        };
        let msg = format_trading_message("trace", &[decision], &account());
        assert!(msg.contains("lambo_time (unknown)"));
        assert!(msg.contains("❓"));
    }

    #[test]
    fn test_system_prompt_scales_with_equity() {
        let prompt = build_system_prompt(2000.0, 5, 3);
        assert!(prompt.contains("1600-3000 USD (3x leverage)"));
        assert!(prompt.contains("10000-20000 USD (5x leverage)"));
    }
}
