use crate::domain::entities::cycle_record::CycleRecord;
use crate::domain::ports::cycle_log_port::CycleLog;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Append-only cycle log: one JSON object per line, one file per UTC date
/// (`<dir>/YYYY-MM-DD.jsonl`).
pub struct JsonlCycleLog {
    dir: PathBuf,
}

impl JsonlCycleLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CycleLog for JsonlCycleLog {
    fn append(&self, record: &CycleRecord) -> Result<(), String> {
        fs::create_dir_all(&self.dir).map_err(|e| format!("create log dir: {e}"))?;

        let path = self.dir.join(format!("{}.jsonl", Utc::now().format("%Y-%m-%d")));
        let line = serde_json::to_string(record).map_err(|e| format!("serialize record: {e}"))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| format!("open {}: {e}", path.display()))?;
        writeln!(file, "{line}").map_err(|e| format!("write {}: {e}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::cycle_record::CycleKind;

    #[test]
    fn test_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonlCycleLog::new(dir.path());

        log.append(&CycleRecord::new(CycleKind::Analysis, 1)).unwrap();
        log.append(&CycleRecord::new(CycleKind::Trading, 2)).unwrap();

        let path = dir
            .path()
            .join(format!("{}.jsonl", Utc::now().format("%Y-%m-%d")));
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: CycleRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.cycle, 1);
        let second: CycleRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.kind, CycleKind::Trading);
    }
}
