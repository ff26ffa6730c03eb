pub mod deepseek;
pub mod retry;
