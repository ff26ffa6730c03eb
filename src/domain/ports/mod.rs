pub mod chart_port;
pub mod completion_port;
pub mod cycle_log_port;
pub mod market_data_port;
pub mod notifier_port;
