//! Reconciler task — full-replace publication of per-resource diagnostics.
//!
//! Workers hand finished diagnostic sets over a channel and move on;
//! publication latency (the host's marker store may be slow) never sits on
//! the worker path that gates the concurrency cap.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

use lintmark_types::DiagnosticRecord;

/// Channel capacity between workers and the reconciler task.
pub(crate) const RECONCILE_CHANNEL_CAPACITY: usize = 256;

/// Host-side diagnostic store boundary.
///
/// `replace_all` atomically supersedes every previously published record
/// for `resource` with `records` — full replace, no incremental merge. An
/// empty slice clears the resource's markers.
pub trait DiagnosticSink: Send + Sync {
    fn replace_all(&self, resource: &Path, records: &[DiagnosticRecord]);
}

/// Message from a worker to the reconciler task.
#[derive(Debug)]
pub(crate) enum ReconcileCommand {
    Publish {
        resource: PathBuf,
        records: Vec<DiagnosticRecord>,
    },
}

/// Published per-resource sets: at most one set per resource, always the
/// most recently completed run, never a partial one.
///
/// Owned by the reconciler task; the manager shares it read-only for
/// snapshots.
#[derive(Debug, Default)]
pub(crate) struct PublishedSet {
    data: HashMap<PathBuf, Vec<DiagnosticRecord>>,
}

impl PublishedSet {
    pub fn replace(&mut self, resource: PathBuf, records: Vec<DiagnosticRecord>) {
        if records.is_empty() {
            self.data.remove(&resource);
        } else {
            self.data.insert(resource, records);
        }
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let mut files: Vec<(PathBuf, Vec<DiagnosticRecord>)> = self
            .data
            .iter()
            .map(|(path, records)| (path.clone(), records.clone()))
            .collect();

        // Sort: highest-severity files first, then by path.
        files.sort_by(|a, b| {
            let worst = |records: &[DiagnosticRecord]| {
                records
                    .iter()
                    .map(DiagnosticRecord::severity)
                    .max()
                    .unwrap_or(i32::MIN)
            };
            worst(&b.1).cmp(&worst(&a.1)).then_with(|| a.0.cmp(&b.0))
        });

        DiagnosticsSnapshot { files }
    }
}

/// Immutable snapshot of all published diagnostics, suitable for UI
/// display.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsSnapshot {
    files: Vec<(PathBuf, Vec<DiagnosticRecord>)>,
}

impl DiagnosticsSnapshot {
    /// Per-resource record sets, highest-severity resources first.
    #[must_use]
    pub fn files(&self) -> &[(PathBuf, Vec<DiagnosticRecord>)] {
        &self.files
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total record count across all resources.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.files.iter().map(|(_, records)| records.len()).sum()
    }

    /// Record count at one host severity ordinal.
    #[must_use]
    pub fn count_at_severity(&self, severity: i32) -> usize {
        self.files
            .iter()
            .flat_map(|(_, records)| records)
            .filter(|r| r.severity() == severity)
            .count()
    }
}

/// Run the reconciler until every publish sender is gone.
pub(crate) async fn run_reconciler(
    mut rx: mpsc::Receiver<ReconcileCommand>,
    published: Arc<Mutex<PublishedSet>>,
    sink: Arc<dyn DiagnosticSink>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            ReconcileCommand::Publish { resource, records } => {
                tracing::debug!(
                    resource = %resource.display(),
                    count = records.len(),
                    "publishing diagnostics"
                );
                sink.replace_all(&resource, &records);
                published
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .replace(resource, records);
            }
        }
    }
}
