//! Core domain types for lintmark - no IO, no async.

mod category;
mod record;

pub use category::Category;
pub use record::{DiagnosticRecord, MarkerSpan};
