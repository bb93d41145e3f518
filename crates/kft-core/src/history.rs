use crate::error::Result;
use crate::io::{atomic_write, read_optional};
use crate::paths;
use crate::target::PodTarget;
use crate::transfer::{Direction, TransferOutcome, TransferRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

pub const DEFAULT_MAX_ENTRIES: usize = 50;

// ---------------------------------------------------------------------------
// HistoryEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub local_path: String,
    pub pod_path: String,
    pub target: PodTarget,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}

impl HistoryEntry {
    pub fn from_outcome(request: &TransferRequest, outcome: &TransferOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: outcome.started_at,
            direction: request.direction,
            local_path: request.local_path.clone(),
            pod_path: request.pod_path.clone(),
            target: request.target.clone(),
            success: outcome.success,
            error: outcome.error.clone(),
            code: outcome.code,
        }
    }

    /// The request that produced this entry, ready to run again.
    pub fn request(&self) -> TransferRequest {
        TransferRequest::new(
            self.direction,
            self.local_path.clone(),
            self.pod_path.clone(),
            self.target.clone(),
        )
    }

    pub fn status_label(&self) -> &'static str {
        if self.success {
            "Success"
        } else {
            "Failed"
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Recent transfers, newest first, persisted to `<home>/history.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub entries: Vec<HistoryEntry>,
}

impl History {
    pub fn load(home: &Path) -> Result<Self> {
        match read_optional(&paths::history_path(home))? {
            Some(data) if !data.trim().is_empty() => Ok(serde_yaml::from_str(&data)?),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, home: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        atomic_write(&paths::history_path(home), data.as_bytes())
    }

    /// Insert at the front and keep at most `max_entries`.
    pub fn push(&mut self, entry: HistoryEntry, max_entries: usize) {
        self.entries.insert(0, entry);
        self.entries.truncate(max_entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load, prepend `entry`, truncate and save in one step.
pub fn record(home: &Path, entry: HistoryEntry, max_entries: usize) -> Result<()> {
    let mut history = History::load(home)?;
    history.push(entry, max_entries);
    history.save(home)
}

/// Remove all entries. Returns how many were dropped.
pub fn clear(home: &Path) -> Result<usize> {
    let history = History::load(home)?;
    let n = history.len();
    History::default().save(home)?;
    Ok(n)
}

/// Shorten long paths for display, keeping the tail: `...` + last chars.
pub fn truncate_path(path: &str, max_len: usize) -> String {
    let count = path.chars().count();
    if count <= max_len {
        return path.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let tail: String = path.chars().skip(count - keep).collect();
    format!("...{tail}")
}
