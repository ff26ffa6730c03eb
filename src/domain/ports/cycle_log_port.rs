use crate::domain::entities::cycle_record::CycleRecord;

/// Append-only store of completed cycle records, keyed by wall-clock date.
pub trait CycleLog: Send + Sync {
    fn append(&self, record: &CycleRecord) -> Result<(), String>;
}
