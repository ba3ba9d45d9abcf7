//! Per-well operation history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged operation on a well. Entries are never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user: String,
    pub operation: String,
    pub began: DateTime<Utc>,
    #[serde(default)]
    pub arguments: String,
}

impl HistoryEntry {
    pub fn new(
        user: impl Into<String>,
        operation: impl Into<String>,
        began: DateTime<Utc>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            operation: operation.into(),
            began,
            arguments: arguments.into(),
        }
    }
}
