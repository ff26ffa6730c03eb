//! Technical indicator series over close/high/low/volume arrays. Warmup
//! positions (where the indicator is not yet defined) are filled with 0.0 so
//! every series stays aligned with its price series.

/// Simple moving average with a rolling window.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = sum / period as f64;
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = sum / period as f64;
    }
    out
}

/// Exponential moving average seeded with the SMA of the first window.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut prev: f64 = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = prev;
    let k = 2.0 / (period as f64 + 1.0);
    for i in period..values.len() {
        prev += (values[i] - prev) * k;
        out[i] = prev;
    }
    out
}

/// Relative strength index with Wilder smoothing.
pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![0.0; n];
    if period == 0 || n <= period {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let delta = values[i] - values[i - 1];
        if delta > 0.0 {
            avg_gain += delta;
        } else {
            avg_loss -= delta;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = rsi_value(avg_gain, avg_loss);

    for i in period + 1..n {
        let delta = values[i] - values[i - 1];
        let (gain, loss) = if delta > 0.0 { (delta, 0.0) } else { (0.0, -delta) };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out[i] = rsi_value(avg_gain, avg_loss);
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// MACD(12, 26, 9): returns (line, signal, histogram).
pub fn macd(values: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = values.len();
    let fast = ema(values, 12);
    let slow = ema(values, 26);

    let mut line = vec![0.0; n];
    for i in 25..n {
        line[i] = fast[i] - slow[i];
    }

    // Signal line: EMA(9) over the valid part of the MACD line.
    let mut signal = vec![0.0; n];
    let mut hist = vec![0.0; n];
    if n > 25 {
        let signal_tail = ema(&line[25..], 9);
        for (i, v) in signal_tail.iter().enumerate() {
            signal[25 + i] = *v;
            if *v != 0.0 {
                hist[25 + i] = line[25 + i] - v;
            }
        }
    }
    (line, signal, hist)
}

/// Average true range with Wilder smoothing.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut out = vec![0.0; n];
    if period == 0 || n <= period {
        return out;
    }

    let tr: Vec<f64> = (0..n)
        .map(|i| {
            if i == 0 {
                highs[0] - lows[0]
            } else {
                let hl = highs[i] - lows[i];
                let hc = (highs[i] - closes[i - 1]).abs();
                let lc = (lows[i] - closes[i - 1]).abs();
                hl.max(hc).max(lc)
            }
        })
        .collect();

    let mut prev: f64 = tr[1..=period].iter().sum::<f64>() / period as f64;
    out[period] = prev;
    for i in period + 1..n {
        prev = (prev * (period as f64 - 1.0) + tr[i]) / period as f64;
        out[i] = prev;
    }
    out
}

/// Bollinger bands: returns (upper, middle, lower) with `num_dev` standard
/// deviations around a `period` SMA.
pub fn bollinger(values: &[f64], period: usize, num_dev: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = values.len();
    let middle = sma(values, period);
    let mut upper = vec![0.0; n];
    let mut lower = vec![0.0; n];
    if period == 0 || n < period {
        return (upper, middle, lower);
    }

    for i in period - 1..n {
        let window = &values[i + 1 - period..=i];
        let mean = middle[i];
        let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
        let dev = variance.sqrt() * num_dev;
        upper[i] = mean + dev;
        lower[i] = mean - dev;
    }
    (upper, middle, lower)
}

/// Percentage change between the latest close and the close `periods` bars
/// earlier. 0.0 when the series is too short.
pub fn price_change_pct(closes: &[f64], periods: usize) -> f64 {
    if closes.len() < periods + 1 {
        return 0.0;
    }
    let current = closes[closes.len() - 1];
    let past = closes[closes.len() - 1 - periods];
    if past > 0.0 {
        (current - past) / past * 100.0
    } else {
        0.0
    }
}
