//! Configuration for record validation and logging.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::record::{Record, RecordId};


/// Bounds a [`Record`] has to satisfy before it is handed to the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLimits {
    /// Maximum name length in bytes.
    pub max_name_len: usize,
    /// Lowest accepted score (inclusive).
    pub min_score: f64,
    /// Highest accepted score (inclusive).
    pub max_score: f64,
}

impl Default for RecordLimits {
    fn default() -> Self {
        Self {
            max_name_len: 99,
            min_score: 0.0,
            max_score: 100.0,
        }
    }
}

impl RecordLimits {
    /// Checks raw fields and builds a [`Record`] out of them.
    pub fn validate(&self, id: i64, name: &str, score: f64) -> Result<Record> {
        let id = self.check_id(id)?;
        self.check_fields(name, score)?;
        Ok(Record::new(id, name, score))
    }

    pub fn check_id(&self, id: i64) -> Result<RecordId> {
        match RecordId::try_from(id) {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(IndexError::InvalidInput(format!("id must be a positive integer up to {}, got {id}", RecordId::MAX))),
        }
    }

    /// Checks the fields an update is allowed to change.
    pub fn check_fields(&self, name: &str, score: f64) -> Result<()> {
        if name.trim().is_empty() {
            return Err(IndexError::InvalidInput("name must not be empty".into()))
        }
        if name.len() > self.max_name_len {
            return Err(IndexError::InvalidInput(format!("name is {} bytes long (max {})", name.len(), self.max_name_len)))
        }
        // these would break the `id|name|score` line format
        if name.contains(['|', '\n', '\r']) {
            return Err(IndexError::InvalidInput(format!("name {name:?} contains a reserved character")))
        }
        if !score.is_finite() || score < self.min_score || score > self.max_score {
            return Err(IndexError::InvalidInput(format!("score {score} is outside {}..={}", self.min_score, self.max_score)))
        }
        Ok(())
    }
}


/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Terminal log level (`off`, `error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Optional file that receives everything at `debug` and above.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            log_file: None,
        }
    }
}
