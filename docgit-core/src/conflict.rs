//! Classifying revert failures.
//!
//! The engine reports merge conflicts only as human-readable text, so this
//! matching depends on its wording. Messages are forced to the C locale by
//! the runner; the pattern table is versioned so a wording change in a newer
//! engine release can be handled by adding a table rather than editing one.
//! Anything unmatched falls back to the generic revert failure.

/// Patterns observed in engine 2.x revert output, lowercased.
pub const CONFLICT_PATTERNS_V1: &[&str] = &[
    "cannot merge binary files",
    "conflict (",
    "could not revert",
    "after resolving the conflicts",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertFailureKind {
    BinaryConflict,
    Other,
}

pub fn classify_revert_failure(stdout: &str, stderr: &str) -> RevertFailureKind {
    let haystack = format!("{stdout}\n{stderr}").to_lowercase();
    if CONFLICT_PATTERNS_V1
        .iter()
        .any(|pattern| haystack.contains(pattern))
    {
        RevertFailureKind::BinaryConflict
    } else {
        RevertFailureKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_merge_message() {
        let stderr = "warning: Cannot merge binary files: report.docx (HEAD vs. parent of 1a2b3c4 (v2))\n\
                      error: could not revert 1a2b3c4... v2\n\
                      hint: after resolving the conflicts, mark the corrected paths\n";
        let stdout = "CONFLICT (content): Merge conflict in report.docx\n";

        assert_eq!(
            classify_revert_failure(stdout, stderr),
            RevertFailureKind::BinaryConflict
        );
    }

    #[test]
    fn test_conflict_marker_in_stdout_only() {
        assert_eq!(
            classify_revert_failure("CONFLICT (modify/delete): report.docx deleted in HEAD", ""),
            RevertFailureKind::BinaryConflict
        );
    }

    #[test]
    fn test_unrelated_failure_falls_back() {
        assert_eq!(
            classify_revert_failure("", "fatal: bad revision 'nope'\n"),
            RevertFailureKind::Other
        );
        assert_eq!(
            classify_revert_failure(
                "",
                "error: your local changes would be overwritten by revert.\n"
            ),
            RevertFailureKind::Other
        );
    }
}
