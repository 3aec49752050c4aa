//! Severity policy snapshot, taken once per analysis run.

use lintmark_types::Category;

use crate::types::LintConfig;

/// Read-only per-run view of the per-category policy.
///
/// Snapshotted before parsing begins so a preference change mid-parse
/// cannot classify records of one run under two different regimes.
#[derive(Debug, Clone, Copy)]
pub struct SeverityPolicy {
    rules: [CategoryRule; 5],
}

#[derive(Debug, Clone, Copy)]
struct CategoryRule {
    enabled: bool,
    severity: i32,
}

impl SeverityPolicy {
    #[must_use]
    pub fn from_config(config: &LintConfig) -> Self {
        let mut rules = [CategoryRule {
            enabled: false,
            severity: 0,
        }; 5];
        for category in Category::ALL {
            let cfg = config.category(category);
            rules[category.index()] = CategoryRule {
                enabled: cfg.enabled,
                severity: cfg.severity,
            };
        }
        Self { rules }
    }

    /// Marker severity for `category`, or `None` when the category is
    /// disabled. A `None` tells the caller to skip the output line before
    /// tokenizing it any further.
    #[must_use]
    pub fn classify(&self, category: Category) -> Option<i32> {
        let rule = self.rules[category.index()];
        rule.enabled.then_some(rule.severity)
    }
}
