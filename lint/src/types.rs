//! Public types consumed by the host integration.
//!
//! The host deserializes [`LintConfig`] from its preference store, builds
//! one [`AnalysisRequest`] per change event, and reads published
//! diagnostics back through [`crate::DiagnosticsSnapshot`].

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use lintmark_types::Category;

/// Host marker severity ordinal for warning-level diagnostics.
pub const SEVERITY_WARNING: i32 = 1;

/// Host marker severity ordinal for error-level diagnostics.
pub const SEVERITY_ERROR: i32 = 2;

fn default_max_concurrency() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_warning_severity() -> i32 {
    SEVERITY_WARNING
}

/// Configuration for the lint integration.
#[derive(Debug, Clone, Deserialize)]
pub struct LintConfig {
    /// Whether lint analysis runs at all. Default: false.
    #[serde(default)]
    pub enabled: bool,
    /// Path to the lint tool's entry script (e.g. pylint's `lint.py`).
    pub tool_path: PathBuf,
    /// Interpreter executable. When absent, resolved from PATH at run time.
    #[serde(default)]
    pub interpreter: Option<PathBuf>,
    /// Extra command-line arguments for the tool, whitespace-separated.
    /// Newlines count as separators.
    #[serde(default)]
    pub extra_args: String,
    /// Maximum number of simultaneously running analyses.
    /// 0 disables analysis entirely: every request is rejected.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Echo the command line and the tool's output to the
    /// `lintmark::console` log target.
    #[serde(default)]
    pub use_console_output: bool,
    #[serde(default = "CategoryConfig::warning_level")]
    pub convention: CategoryConfig,
    #[serde(default = "CategoryConfig::warning_level")]
    pub refactor: CategoryConfig,
    #[serde(default = "CategoryConfig::warning_level")]
    pub warning: CategoryConfig,
    #[serde(default = "CategoryConfig::error_level")]
    pub error: CategoryConfig,
    #[serde(default = "CategoryConfig::error_level")]
    pub fatal: CategoryConfig,
}

impl LintConfig {
    /// Per-category settings.
    #[must_use]
    pub fn category(&self, category: Category) -> CategoryConfig {
        match category {
            Category::Convention => self.convention,
            Category::Refactor => self.refactor,
            Category::Warning => self.warning,
            Category::Error => self.error,
            Category::Fatal => self.fatal,
        }
    }
}

/// Enablement and marker severity for one diagnostic category.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CategoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Host-defined marker severity ordinal.
    #[serde(default = "default_warning_severity")]
    pub severity: i32,
}

impl CategoryConfig {
    fn warning_level() -> Self {
        Self {
            enabled: true,
            severity: SEVERITY_WARNING,
        }
    }

    fn error_level() -> Self {
        Self {
            enabled: true,
            severity: SEVERITY_ERROR,
        }
    }
}

/// Lazy provider of the current document text.
///
/// `FnOnce` on purpose: the snapshot is taken exactly once near the start
/// of the run, so a worker never reads a buffer the host is mutating.
pub type DocumentSource = Box<dyn FnOnce() -> String + Send + 'static>;

/// Everything one analysis run needs. Created per change event, owned
/// solely by its worker, discarded after completion.
pub struct AnalysisRequest {
    /// Host resource key the published diagnostic set is filed under.
    pub(crate) resource: PathBuf,
    /// Absolute filesystem location handed to the tool.
    pub(crate) file_path: PathBuf,
    pub(crate) document: DocumentSource,
}

impl AnalysisRequest {
    #[must_use]
    pub fn new(resource: PathBuf, file_path: PathBuf, document: DocumentSource) -> Self {
        Self {
            resource,
            file_path,
            document,
        }
    }

    #[must_use]
    pub fn resource(&self) -> &PathBuf {
        &self.resource
    }

    #[must_use]
    pub fn file_path(&self) -> &PathBuf {
        &self.file_path
    }
}

impl fmt::Debug for AnalysisRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisRequest")
            .field("resource", &self.resource)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

/// Immutable line-indexed snapshot of a document's text.
#[derive(Debug, Clone, Default)]
pub struct DocumentText {
    lines: Vec<String>,
}

impl DocumentText {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(ToOwned::to_owned).collect(),
        }
    }

    /// Content of the 0-indexed line, without its terminator.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
