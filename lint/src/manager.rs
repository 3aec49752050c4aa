//! LintManager facade — public API consumed by the host integration.
//!
//! The host interacts with the engine through this single type: it feeds
//! change notifications in and reads published diagnostics back. Each
//! notification becomes an independent worker task; the admission
//! controller bounds how many run at once, and a dedicated reconciler task
//! applies full-replace publication per resource.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;

use lintmark_types::DiagnosticRecord;

use crate::admission::AdmissionController;
use crate::error::LintError;
use crate::invoker::{self, PylintRunner, ToolRunner};
use crate::parser;
use crate::policy::SeverityPolicy;
use crate::reconcile::{
    self, DiagnosticSink, DiagnosticsSnapshot, PublishedSet, RECONCILE_CHANNEL_CAPACITY,
    ReconcileCommand,
};
use crate::types::{AnalysisRequest, DocumentSource, DocumentText, LintConfig};

const SHUTDOWN_TIMEOUT_SECS: u64 = 2;

/// Public facade for the lint integration engine.
///
/// Generic over the [`ToolRunner`] seam so tests can substitute the
/// process spawn; production code uses the [`PylintRunner`] default.
pub struct LintManager<R: ToolRunner = PylintRunner> {
    config: Arc<LintConfig>,
    admission: AdmissionController,
    runner: Arc<R>,
    publish_tx: mpsc::Sender<ReconcileCommand>,
    published: Arc<Mutex<PublishedSet>>,
    reconciler: tokio::task::JoinHandle<()>,
}

impl LintManager<PylintRunner> {
    /// Construct the manager and spawn its reconciler task.
    ///
    /// `sink` is the host's marker store; every completed analysis reaches
    /// it as one `replace_all` call.
    #[must_use]
    pub fn start(config: LintConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_runner(config, sink, PylintRunner)
    }
}

impl<R: ToolRunner> LintManager<R> {
    /// Like [`LintManager::start`] but with an explicit runner.
    #[must_use]
    pub fn with_runner(config: LintConfig, sink: Arc<dyn DiagnosticSink>, runner: R) -> Self {
        let (publish_tx, publish_rx) = mpsc::channel(RECONCILE_CHANNEL_CAPACITY);
        let published = Arc::new(Mutex::new(PublishedSet::default()));
        let reconciler = tokio::spawn(reconcile::run_reconciler(
            publish_rx,
            Arc::clone(&published),
            sink,
        ));
        Self {
            admission: AdmissionController::new(config.max_concurrency),
            config: Arc::new(config),
            runner: Arc::new(runner),
            publish_tx,
            published,
            reconciler,
        }
    }

    /// Handle a change notification by spawning an analysis worker.
    ///
    /// Does nothing when analysis is disabled. An admitted worker runs to
    /// completion; one over the concurrency cap is dropped silently — the
    /// change trigger re-fires on later edits.
    pub fn notify_changed(&self, request: AnalysisRequest) {
        if !self.config.enabled {
            return;
        }
        tokio::spawn(run_worker(
            Arc::clone(&self.config),
            self.admission.clone(),
            Arc::clone(&self.runner),
            self.publish_tx.clone(),
            request,
        ));
    }

    /// Immutable view of all currently published diagnostics.
    #[must_use]
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Number of analyses currently holding an admission slot.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.admission.in_flight()
    }

    /// Stop accepting publishes and wait briefly for the reconciler to
    /// drain. Workers that are still running keep their slots until they
    /// finish; their results go nowhere.
    pub async fn shutdown(mut self) {
        drop(self.publish_tx);
        if tokio::time::timeout(
            Duration::from_secs(SHUTDOWN_TIMEOUT_SECS),
            &mut self.reconciler,
        )
        .await
        .is_err()
        {
            tracing::debug!("reconciler did not drain in time, aborting");
            self.reconciler.abort();
        }
    }
}

/// One analysis run: admit, snapshot the document, invoke the tool, parse,
/// hand off to the reconciler.
///
/// Every failure is logged here and goes no further — no phantom
/// diagnostics, no effect on the admission controller or on sibling
/// workers.
async fn run_worker<R: ToolRunner>(
    config: Arc<LintConfig>,
    admission: AdmissionController,
    runner: Arc<R>,
    publish_tx: mpsc::Sender<ReconcileCommand>,
    request: AnalysisRequest,
) {
    let AnalysisRequest {
        resource,
        file_path,
        document,
    } = request;

    let Some(slot) = admission.try_admit() else {
        tracing::debug!(
            resource = %resource.display(),
            "dropping analysis request: concurrency cap reached"
        );
        return;
    };

    let outcome = analyze(&config, runner.as_ref(), &file_path, document).await;

    // The slot gates tool processes, not publication: release it as soon
    // as parsing is done so a slow host store never delays admission.
    drop(slot);

    match outcome {
        Ok(records) => {
            let command = ReconcileCommand::Publish { resource, records };
            if publish_tx.send(command).await.is_err() {
                tracing::debug!("reconciler gone, discarding analysis result");
            }
        }
        Err(err) => {
            tracing::warn!(
                resource = %resource.display(),
                error = %err,
                "analysis run failed"
            );
        }
    }
}

async fn analyze<R: ToolRunner>(
    config: &LintConfig,
    runner: &R,
    file_path: &Path,
    document: DocumentSource,
) -> Result<Vec<DiagnosticRecord>, LintError> {
    let policy = SeverityPolicy::from_config(config);

    // Snapshot exactly once, before the tool runs, so the worker never
    // reads a buffer the host is mutating.
    let text = document();
    let document = DocumentText::new(&text);

    let command = invoker::build_command(config, file_path)?;
    if config.use_console_output {
        tracing::info!(target: "lintmark::console", command = %command, "executing lint command");
    }

    let output = runner.run(&command).await?;
    if config.use_console_output {
        tracing::info!(
            target: "lintmark::console",
            stdout = %output.stdout,
            stderr = %output.stderr,
            "lint command finished"
        );
    }

    parser::parse(&output, &document, &policy)
}
