//! Outcomes of synchronizing events and records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal state of one record or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    Created,
    Updated,
    Failed,
}

impl SyncOutcome {
    /// Outcome of an upsert given whether a page already existed.
    pub const fn for_existing(existing: bool) -> Self {
        if existing {
            Self::Updated
        } else {
            Self::Created
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-level outcome counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

impl SyncSummary {
    pub fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Failed => self.failed += 1,
        }
    }

    pub const fn total(&self) -> usize {
        self.created + self.updated + self.failed
    }

    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Result of handling a single webhook event.
///
/// `critical` distinguishes a hard failure (non-zero exit) from a skip that
/// should be reported but not fail the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResult {
    pub success: bool,
    pub critical: bool,
    pub message: String,
}

impl HandlerResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            critical: false,
            message: message.into(),
        }
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            success: false,
            critical: true,
            message: message.into(),
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            success: false,
            critical: false,
            message: message.into(),
        }
    }

    /// Whether the process should exit non-zero.
    pub const fn is_fatal(&self) -> bool {
        !self.success && self.critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = SyncSummary::default();
        summary.record(SyncOutcome::Created);
        summary.record(SyncOutcome::Updated);
        summary.record(SyncOutcome::Failed);
        summary.record(SyncOutcome::Created);

        assert_eq!(summary.created, 2);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 4);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_handler_result_fatality() {
        assert!(!HandlerResult::ok("done").is_fatal());
        assert!(!HandlerResult::skipped("not configured").is_fatal());
        assert!(HandlerResult::critical("boom").is_fatal());
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SyncOutcome::Updated).unwrap(), "\"updated\"");
        assert_eq!(SyncOutcome::for_existing(false), SyncOutcome::Created);
    }
}
