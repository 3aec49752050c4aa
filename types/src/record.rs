//! Diagnostic records produced by one analysis run.

use crate::category::Category;

/// A single diagnostic reported by the analysis tool.
///
/// Fields are private; construction goes through [`DiagnosticRecord::new`]
/// and nothing mutates a record afterwards. Only the parser constructs
/// these in production code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    category: Category,
    /// Full message id, e.g. `"W0611"`.
    diagnostic_id: String,
    message: String,
    /// 0-indexed source line.
    line: u32,
    /// Host-defined marker severity ordinal.
    severity: i32,
}

impl DiagnosticRecord {
    #[must_use]
    pub fn new(
        category: Category,
        diagnostic_id: String,
        message: String,
        line: u32,
        severity: i32,
    ) -> Self {
        Self {
            category,
            diagnostic_id,
            message,
            line,
            severity,
        }
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Full message id, e.g. `"W0611"`.
    #[must_use]
    pub fn diagnostic_id(&self) -> &str {
        &self.diagnostic_id
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 0-indexed source line.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Host-defined marker severity ordinal.
    #[must_use]
    pub fn severity(&self) -> i32 {
        self.severity
    }

    /// Marker text in the host's historical format: `ID:<id> <message>`.
    #[must_use]
    pub fn marker_text(&self) -> String {
        format!("ID:{} {}", self.diagnostic_id, self.message)
    }

    /// Source range the host marker should cover: the whole resolved line.
    #[must_use]
    pub fn span(&self) -> MarkerSpan {
        MarkerSpan {
            start_line: self.line,
            start_col: 0,
            end_line: self.line,
            end_col: 0,
        }
    }
}

/// Zero-width source range anchored at line starts, as the host marker
/// store expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSpan {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}
