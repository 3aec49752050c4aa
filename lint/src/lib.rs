//! Integration engine for an external lint tool (pylint).
//!
//! On each change notification the host hands us an [`AnalysisRequest`];
//! a bounded number of workers run the tool out-of-process, parse its
//! textual diagnostics under the configured severity policy, and hand the
//! result to a reconciler task that full-replaces the resource's published
//! diagnostic set.

pub mod types;

pub(crate) mod admission;
pub(crate) mod parser;
pub(crate) mod policy;
pub(crate) mod reconcile;

mod error;
mod invoker;
mod manager;

pub use error::LintError;
pub use invoker::{PylintRunner, ToolCommand, ToolOutput, ToolRunner};
pub use manager::LintManager;
pub use reconcile::{DiagnosticSink, DiagnosticsSnapshot};
pub use types::{
    AnalysisRequest, CategoryConfig, DocumentSource, DocumentText, LintConfig, SEVERITY_ERROR,
    SEVERITY_WARNING,
};
