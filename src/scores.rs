//! Persisted best score with a 24-hour shelf life.
use crate::consts;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
struct Record {
    score: u32,
    /// When the score was saved, in milliseconds since the Unix epoch
    timestamp: u64,
}

/// Handle on the best-score record on disk.
///
/// `load` never fails outward: a missing, corrupt, or expired record all
/// read as zero.  A record in the legacy bare-integer format is accepted
/// and rewritten in the timestamped format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Store {
    /// `None` disables persistence entirely
    path: Option<PathBuf>,
}

impl Store {
    pub(crate) fn new(path: Option<PathBuf>) -> Store {
        Store { path }
    }

    /// The default best-score file path in the platform data directory
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("serpent").join("best-score.json"))
    }

    pub(crate) fn load(&self) -> u32 {
        self.load_at(epoch_millis())
    }

    fn load_at(&self, now: u64) -> u32 {
        let Some(path) = self.path.as_deref() else {
            return 0;
        };
        let Ok(src) = fs_err::read_to_string(path) else {
            return 0;
        };
        if let Ok(record) = serde_json::from_str::<Record>(&src) {
            if now.saturating_sub(record.timestamp) > consts::BEST_SCORE_TTL_MS {
                let _ = fs_err::remove_file(path);
                return 0;
            }
            return record.score;
        }
        if let Ok(score) = src.trim().parse::<u32>() {
            // legacy bare integer: adopt it and rewrite in the current format
            let _ = self.save_at(score, now);
            return score;
        }
        let _ = fs_err::remove_file(path);
        0
    }

    pub(crate) fn save(&self, score: u32) -> Result<(), SaveError> {
        self.save_at(score, epoch_millis())
    }

    fn save_at(&self, score: u32, now: u64) -> Result<(), SaveError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let record = Record {
            score,
            timestamp: now,
        };
        let mut src = serde_json::to_string(&record).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(path, &src).map_err(SaveError::write)?;
        Ok(())
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

#[derive(Debug, Error)]
#[error("Failed to save best score to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize best score")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write best score to disk")]
    Write(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: u64 = 60 * 60 * 1000;

    fn store_in(dir: &tempfile::TempDir) -> Store {
        Store::new(Some(dir.path().join("best-score.json")))
    }

    #[test]
    fn save_then_load_within_a_day() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save_at(7, 1_000).unwrap();
        assert_eq!(store.load_at(1_000 + 23 * HOUR_MS), 7);
    }

    #[test]
    fn record_expires_after_a_day() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save_at(7, 1_000).unwrap();
        assert_eq!(store.load_at(1_000 + 25 * HOUR_MS), 0);
        // the stale record was removed, not just ignored
        assert!(!dir.path().join("best-score.json").exists());
    }

    #[test]
    fn legacy_bare_integer_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let path = dir.path().join("best-score.json");
        fs_err::write(&path, "5").unwrap();
        assert_eq!(store.load_at(9_000), 5);
        let rewritten: Record =
            serde_json::from_str(&fs_err::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            rewritten,
            Record {
                score: 5,
                timestamp: 9_000
            }
        );
    }

    #[test]
    fn missing_file_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).load_at(1_000), 0);
    }

    #[test]
    fn corrupt_data_reads_as_zero_and_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let path = dir.path().join("best-score.json");
        fs_err::write(&path, "{not json").unwrap();
        assert_eq!(store.load_at(1_000), 0);
        assert!(!path.exists());
    }

    #[test]
    fn disabled_store_is_inert() {
        let store = Store::new(None);
        assert_eq!(store.load(), 0);
        store.save(7).unwrap();
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(Some(dir.path().join("nested").join("scores.json")));
        store.save_at(3, 500).unwrap();
        assert_eq!(store.load_at(500), 3);
    }
}
