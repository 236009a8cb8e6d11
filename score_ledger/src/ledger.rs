//! The shared score ledger: an append-only JSON array on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LedgerError;

// ════════════════════════════════════════════════════════════════════════════
// LedgerRecord
// ════════════════════════════════════════════════════════════════════════════

/// One finished session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Game identifier, e.g. `"BalloonPop"`. Older entries may lack it.
    #[serde(default)]
    pub game:   String,
    pub player: String,
    pub score:  u32,
    pub level:  u32,
    /// Mean seconds per scored action; `null` for games that don't time them.
    #[serde(default)]
    pub avg_reaction_time: Option<f64>,
    pub time_elapsed: f64,
}

// ════════════════════════════════════════════════════════════════════════════
// Ledger
// ════════════════════════════════════════════════════════════════════════════

/// Handle to the ledger file. Cheap; holds only the path.
#[derive(Clone, Debug)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Ledger { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw entries. Missing file, unreadable file, malformed JSON or a
    /// non-array document all read as empty.
    fn load_entries(&self) -> Vec<Value> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                tracing::warn!("Ledger {} is not a JSON array; starting fresh", self.path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Ledger {} is corrupt ({}); starting fresh", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Every entry that parses as a [`LedgerRecord`], oldest first.
    ///
    /// Entries written by other tools that don't match the record shape are
    /// skipped here but kept on disk by [`append`](Self::append).
    pub fn records(&self) -> Vec<LedgerRecord> {
        self.load_entries()
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect()
    }

    /// Highest-scoring record per game, sorted by game name.
    pub fn best_per_game(&self) -> Vec<LedgerRecord> {
        let mut best: Vec<LedgerRecord> = Vec::new();
        for record in self.records() {
            match best.iter_mut().find(|b| b.game == record.game) {
                Some(b) if record.score > b.score => *b = record,
                Some(_) => {}
                None => best.push(record),
            }
        }
        best.sort_by(|a, b| a.game.cmp(&b.game));
        best
    }

    /// Read, append `record`, rewrite the whole file.
    pub fn append(&self, record: &LedgerRecord) -> Result<(), LedgerError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| LedgerError::Io {
                path: dir.display().to_string(),
                source,
            })?;
        }

        let mut entries = self.load_entries();
        entries.push(serde_json::to_value(record)?);

        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        Value::Array(entries).serialize(&mut ser)?;

        fs::write(&self.path, out).map_err(|source| LedgerError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        tracing::info!(
            "Score saved to {} ({} {} pts)",
            self.path.display(),
            record.game,
            record.score
        );
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
