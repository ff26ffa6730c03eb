pub mod chart;
pub mod jsonl_log;
pub mod llm;
pub mod market;
pub mod telegram;
