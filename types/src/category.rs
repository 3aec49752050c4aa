//! The five fixed diagnostic categories reported by pylint.

use serde::{Deserialize, Serialize};

/// Category of a pylint diagnostic, identified by the first letter of its
/// message id (`C0321`, `W0611`, ...).
///
/// The set is closed: pylint has emitted exactly these five classes since
/// its earliest releases, so an enum is the honest representation — an
/// unknown leading letter means the line is not a diagnostic at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Convention,
    Refactor,
    Warning,
    Error,
    Fatal,
}

impl Category {
    /// All categories, in pylint's conventional C/R/W/E/F order.
    pub const ALL: [Category; 5] = [
        Category::Convention,
        Category::Refactor,
        Category::Warning,
        Category::Error,
        Category::Fatal,
    ];

    /// Map a message-id leading letter to its category.
    ///
    /// Returns `None` for anything outside the five known letters.
    /// Callers (boundary code) decide whether that means "skip the line".
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'C' => Some(Self::Convention),
            'R' => Some(Self::Refactor),
            'W' => Some(Self::Warning),
            'E' => Some(Self::Error),
            'F' => Some(Self::Fatal),
            _ => None,
        }
    }

    /// The message-id leading letter for this category.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Convention => 'C',
            Self::Refactor => 'R',
            Self::Warning => 'W',
            Self::Error => 'E',
            Self::Fatal => 'F',
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Convention => "convention",
            Self::Refactor => "refactor",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Index into per-category tables (C=0 .. F=4).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Convention => 0,
            Self::Refactor => 1,
            Self::Warning => 2,
            Self::Error => 3,
            Self::Fatal => 4,
        }
    }
}
