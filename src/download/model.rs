use crate::core::RequestKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What a download run did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadReport {
    /// The request kind that was run.
    pub kind: RequestKind,
    /// Whether the run was a dry run (no network calls, nothing written).
    pub dry_run: bool,
    /// Batches processed.
    pub batches: usize,
    /// Rows handed to the sink across all batches.
    pub rows_written: usize,
    /// Pretty-printed request bodies, one per batch, for dry runs.
    pub dry_run_payloads: Vec<String>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished; `None` until it completes.
    pub finished_at: Option<DateTime<Utc>>,
}

impl DownloadReport {
    pub(crate) fn started(kind: RequestKind, dry_run: bool) -> Self {
        Self {
            kind,
            dry_run,
            batches: 0,
            rows_written: 0,
            dry_run_payloads: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}
