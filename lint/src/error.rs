//! Per-run error taxonomy.

/// Failure of a single analysis run.
///
/// Every variant is handled inside the worker that produced it: logged,
/// never published as diagnostics, never propagated to the admission
/// controller or to sibling workers. Malformed individual output lines are
/// not represented here — the parser skips and logs those without failing
/// the run.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    /// No interpreter or tool script is resolvable for this run. A
    /// precondition failure, not a retryable fault.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The tool itself faulted: a traceback marker appeared in its output.
    #[error("lint tool crashed: traceback detected in {stream}")]
    ToolCrash { stream: &'static str },

    /// Spawning the process or collecting its output failed.
    #[error("lint process error: {0:#}")]
    Io(#[from] anyhow::Error),
}
