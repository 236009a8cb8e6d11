//! Error types for the score ledger

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger IO error on {path}: {source}")]
    Io {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),
}
