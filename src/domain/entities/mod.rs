pub mod account;
pub mod analysis;
pub mod cycle_record;
pub mod decision;
pub mod market_snapshot;
