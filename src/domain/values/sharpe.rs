/// Sharpe ratio over a series of per-trade returns (in percent):
/// mean return divided by the sample standard deviation of returns.
/// Returns 0.0 when fewer than two data points exist or volatility is zero.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return 0.0;
    }

    mean / std_dev
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_single_return_zero() {
        assert_eq!(sharpe_ratio(&[]), 0.0);
        assert_eq!(sharpe_ratio(&[1.5]), 0.0);
    }

    #[test]
    fn test_constant_returns_zero_volatility() {
        assert_eq!(sharpe_ratio(&[2.0, 2.0, 2.0]), 0.0);
    }

    #[test]
    fn test_positive_returns() {
        let s = sharpe_ratio(&[1.0, 2.0, 3.0]);
        assert!((s - 2.0).abs() < 1e-9); // mean 2.0, stdev 1.0
    }

    #[test]
    fn test_losing_series_is_negative() {
        assert!(sharpe_ratio(&[-1.0, -3.0, -2.0]) < 0.0);
    }
}
