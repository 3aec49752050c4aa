//! Turns raw tool output into diagnostic records.

use lintmark_types::{Category, DiagnosticRecord};

use crate::error::LintError;
use crate::invoker::ToolOutput;
use crate::policy::SeverityPolicy;
use crate::types::DocumentText;

/// Literal marker meaning the tool itself faulted instead of producing
/// diagnostics.
pub(crate) const CRASH_SIGNATURE: &str = "Traceback (most recent call last):";

/// Literal source-line marker that silences one diagnostic family.
const SUPPRESSION_MARKER: &str = "IGNORE:";

/// Parse a run's captured output into records.
///
/// Total over arbitrary input: malformed lines are skipped with a log
/// entry, never aborting the run. The only whole-run failure is a crash
/// signature in either stream, which yields no records at all.
pub(crate) fn parse(
    output: &ToolOutput,
    document: &DocumentText,
    policy: &SeverityPolicy,
) -> Result<Vec<DiagnosticRecord>, LintError> {
    if output.stdout.contains(CRASH_SIGNATURE) {
        return Err(LintError::ToolCrash { stream: "stdout" });
    }
    if output.stderr.contains(CRASH_SIGNATURE) {
        return Err(LintError::ToolCrash { stream: "stderr" });
    }

    let mut records = Vec::new();
    for raw in output.stdout.lines() {
        if let Some(record) = parse_line(raw, document, policy) {
            records.push(record);
        }
    }
    Ok(records)
}

// Shapes seen in the wild:
//   W0611:  3: Unused import finalize
//   F0001:  0: Unable to load module test.test2 (list index out of range)
//   C0321: 25:fdfd: More than one statement on a single line
fn parse_line(
    raw: &str,
    document: &DocumentText,
    policy: &SeverityPolicy,
) -> Option<DiagnosticRecord> {
    // Disabled categories are skipped before any further tokenization.
    let category = raw.chars().next().and_then(Category::from_letter)?;
    let severity = policy.classify(category)?;

    // <id>:<lineRef>:<message> — anything without both separators is not a
    // diagnostic line.
    let (id_field, rest) = raw.split_once(':')?;
    let (line_field, message) = rest.split_once(':')?;
    let diagnostic_id = id_field.trim();

    // Newer tool versions report `line,column`; only the line is used.
    let line_ref = line_field.trim();
    let line_ref = line_ref.split(',').next().unwrap_or(line_ref);
    let reported: usize = match line_ref.parse() {
        Ok(n) => n,
        Err(err) => {
            tracing::debug!(
                line = raw,
                error = %err,
                "skipping diagnostic line with malformed line number"
            );
            return None;
        }
    };

    // Reported lines are 1-based. When the adjusted index falls outside
    // the document, fall back to the unadjusted one instead of dropping
    // the record.
    let resolved = match reported.checked_sub(1) {
        Some(adjusted) if document.line(adjusted).is_some() => adjusted,
        _ if document.line(reported).is_some() => reported,
        _ => {
            tracing::debug!(line = raw, reported, "skipping diagnostic outside document bounds");
            return None;
        }
    };

    // `# IGNORE:W0611` on the flagged line silences that diagnostic
    // family without disabling it project-wide.
    let source_line = document.line(resolved)?;
    if let Some(pos) = source_line.find(SUPPRESSION_MARKER) {
        let suppressed = &source_line[pos + SUPPRESSION_MARKER.len()..];
        if suppressed.starts_with(diagnostic_id) {
            return None;
        }
    }

    Some(DiagnosticRecord::new(
        category,
        diagnostic_id.to_string(),
        message.to_string(),
        resolved as u32,
        severity,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LintConfig, SEVERITY_ERROR, SEVERITY_WARNING};

    fn policy(json: serde_json::Value) -> SeverityPolicy {
        let config: LintConfig = serde_json::from_value(json).unwrap();
        SeverityPolicy::from_config(&config)
    }

    fn default_policy() -> SeverityPolicy {
        policy(serde_json::json!({ "tool_path": "lint.py" }))
    }

    fn output(stdout: &str) -> ToolOutput {
        ToolOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn four_line_doc() -> DocumentText {
        DocumentText::new("import os\nimport sys\nfrom gc import finalize\nprint(1)\n")
    }

    #[test]
    fn test_round_trip_warning_line() {
        let records = parse(
            &output("W0611:  3: Unused import finalize"),
            &four_line_doc(),
            &default_policy(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.category(), Category::Warning);
        assert_eq!(rec.diagnostic_id(), "W0611");
        assert_eq!(rec.line(), 2);
        assert_eq!(rec.severity(), SEVERITY_WARNING);
        assert_eq!(rec.message(), " Unused import finalize");
    }

    #[test]
    fn test_message_keeps_embedded_colons() {
        let records = parse(
            &output("C0321: 2:fdfd: More than one statement on a single line"),
            &four_line_doc(),
            &default_policy(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].diagnostic_id(), "C0321");
        assert_eq!(records[0].line(), 1);
        assert_eq!(
            records[0].message(),
            "fdfd: More than one statement on a single line"
        );
    }

    #[test]
    fn test_line_comma_column_uses_line_only() {
        let records = parse(
            &output("W0611:  3,4: Unused import finalize"),
            &four_line_doc(),
            &default_policy(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line(), 2);
    }

    #[test]
    fn test_error_category_gets_error_severity() {
        let records = parse(
            &output("E0602:  1: Undefined variable 'foo'"),
            &four_line_doc(),
            &default_policy(),
        )
        .unwrap();
        assert_eq!(records[0].severity(), SEVERITY_ERROR);
    }

    #[test]
    fn test_line_without_colon_is_skipped() {
        let records = parse(
            &output("Warnings and errors follow\nW0611:  3: Unused import finalize"),
            &four_line_doc(),
            &default_policy(),
        )
        .unwrap();
        // First line starts with 'W' but has no colon-delimited fields.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].diagnostic_id(), "W0611");
    }

    #[test]
    fn test_line_with_single_colon_is_skipped() {
        let records = parse(&output("W0611: orphan"), &four_line_doc(), &default_policy()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_unknown_leading_letter_is_skipped() {
        let records = parse(
            &output("X0001:  1: not a known category"),
            &four_line_doc(),
            &default_policy(),
        )
        .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_disabled_category_never_produces_records() {
        let policy = policy(serde_json::json!({
            "tool_path": "lint.py",
            "convention": { "enabled": false }
        }));
        let records = parse(
            &output("C0111:  1: Missing docstring\nW0611:  3: Unused import finalize"),
            &four_line_doc(),
            &policy,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category(), Category::Warning);
    }

    #[test]
    fn test_malformed_line_number_skips_only_that_line() {
        let records = parse(
            &output("W0611:  x3: bad ref\nW0612:  2: Unused variable 'y'"),
            &four_line_doc(),
            &default_policy(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].diagnostic_id(), "W0612");
    }

    #[test]
    fn test_zero_line_falls_back_to_first_line() {
        // "F0001:  0: ..." is how module-level failures are reported; the
        // adjusted index underflows and the unadjusted one (0) is used.
        let records = parse(
            &output("F0001:  0: Unable to load module test.test2 (list index out of range)"),
            &four_line_doc(),
            &default_policy(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line(), 0);
        assert_eq!(records[0].severity(), SEVERITY_ERROR);
    }

    #[test]
    fn test_out_of_bounds_line_falls_back_unadjusted() {
        // Document has 2 lines. A report for line 3 is out of bounds both
        // adjusted (2) and unadjusted (3), so that record is dropped; the
        // report for line 2 resolves normally.
        let doc = DocumentText::new("a = 1\nb = 2\n");
        let records = parse(
            &output("W0612:  3: Unused variable\nW0611:  2: Unused import"),
            &doc,
            &default_policy(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].diagnostic_id(), "W0611");
        assert_eq!(records[0].line(), 1);
    }

    #[test]
    fn test_suppression_marker_drops_record() {
        let doc = DocumentText::new("import os\nimport sys\nfrom gc import finalize  # IGNORE:W0611\n");
        let records = parse(
            &output("W0611:  3: Unused import finalize"),
            &doc,
            &default_policy(),
        )
        .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_suppression_requires_matching_id_prefix() {
        let doc = DocumentText::new("import os\nimport sys\nfrom gc import finalize  # IGNORE:W0612\n");
        let records = parse(
            &output("W0611:  3: Unused import finalize"),
            &doc,
            &default_policy(),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_suppression_allows_trailing_text() {
        let doc = DocumentText::new("x\ny\nimport junk  # IGNORE:W0611 reviewed 2011-03\n");
        let records = parse(
            &output("W0611:  3: Unused import junk"),
            &doc,
            &default_policy(),
        )
        .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_crash_signature_in_stdout_zeroes_the_run() {
        let out = output(
            "W0611:  3: Unused import finalize\nTraceback (most recent call last):\n  File \"lint.py\"",
        );
        let result = parse(&out, &four_line_doc(), &default_policy());
        assert!(matches!(
            result,
            Err(LintError::ToolCrash { stream: "stdout" })
        ));
    }

    #[test]
    fn test_crash_signature_in_stderr_zeroes_the_run() {
        let out = ToolOutput {
            stdout: "W0611:  3: Unused import finalize".to_string(),
            stderr: "Traceback (most recent call last):\n  ...".to_string(),
        };
        let result = parse(&out, &four_line_doc(), &default_policy());
        assert!(matches!(
            result,
            Err(LintError::ToolCrash { stream: "stderr" })
        ));
    }

    #[test]
    fn test_garbled_output_parses_to_empty() {
        let garbage = "\u{0}\u{7}::\n:::\nW:\nE,3:\n\u{fffd}\u{fffd}\n  \nC: ,: x\nR9:,9:";
        let records = parse(&output(garbage), &four_line_doc(), &default_policy()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_mixed_real_output() {
        let stdout = "************* Module mod1\n\
                      C0111:  1: Missing docstring\n\
                      W0611:  3: Unused import finalize\n\
                      E0602:  4: Undefined variable 'foo'\n";
        let records = parse(&output(stdout), &four_line_doc(), &default_policy()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].diagnostic_id(), "C0111");
        assert_eq!(records[1].diagnostic_id(), "W0611");
        assert_eq!(records[2].diagnostic_id(), "E0602");
    }
}
