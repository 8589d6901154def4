//! Read-only queries. A nonzero exit from the engine is never an error
//! here; only infrastructure failures (missing binary, missing directory)
//! propagate.

use crate::error::Result;
use crate::models::{ChangeKind, ChangeRecord, HistoryEntry};
use crate::repository::Repository;
use crate::runner::ExitOutcome;
use tracing::warn;

const LOG_DELIMITER: char = '|';
const LOG_FORMAT: &str = "--format=%h|%s|%an|%ad";

impl Repository {
    /// Status of the given documents, or of every discovered document.
    pub fn status(&self, files: &[String]) -> Result<Vec<ChangeRecord>> {
        let files = self.resolve_files(files)?;
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let outcome = self.git().probe_on(&["status", "--short"], &files)?;
        log_tool_failure(&outcome);
        Ok(parse_short_status(&outcome.into_output().stdout))
    }

    /// Text diff of the given documents against the index, rendered through
    /// the configured converter. Returns [`Repository::no_files_message`]
    /// without invoking the engine when there is nothing to diff.
    pub fn diff(&self, files: &[String]) -> Result<String> {
        let files = self.resolve_files(files)?;
        if files.is_empty() {
            return Ok(self.no_files_message());
        }

        let outcome = self.git().probe_on(&["diff"], &files)?;
        log_tool_failure(&outcome);
        Ok(outcome.into_output().stdout)
    }

    /// History touching the given documents, newest first.
    pub fn log(&self, files: &[String]) -> Result<Vec<HistoryEntry>> {
        let files = self.resolve_files(files)?;
        if files.is_empty() {
            return Ok(Vec::new());
        }

        // On a repository without commits the engine exits nonzero with no output.
        let outcome = self
            .git()
            .probe_on(&["log", LOG_FORMAT, "--date=short"], &files)?;
        Ok(parse_log(&outcome.into_output().stdout))
    }

    pub fn no_files_message(&self) -> String {
        format!("No .{} files found.", self.settings().extension)
    }
}

fn log_tool_failure(outcome: &ExitOutcome) {
    if let ExitOutcome::Failed(output) = outcome {
        warn!(
            command = %output.command,
            code = ?output.code,
            stderr = %output.stderr.trim(),
            "engine reported an error; returning its output as-is"
        );
    }
}

/// Parses `git status --short` lines: two status columns, a blank, the path.
pub fn parse_short_status(output: &str) -> Vec<ChangeRecord> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let code = line.get(..2)?;
            let rest = line.get(3..)?.trim();
            if rest.is_empty() {
                return None;
            }

            let kind = ChangeKind::from_short_code(code);
            let (path, original_path) = match (kind, rest.split_once(" -> ")) {
                (ChangeKind::Renamed, Some((from, to))) => (unquote_path(to), Some(unquote_path(from))),
                _ => (unquote_path(rest), None),
            };

            Some(ChangeRecord {
                path,
                status: code.trim().to_string(),
                kind,
                original_path,
            })
        })
        .collect()
}

/// Undoes git's C-style path quoting. Git quotes any path containing a
/// space, a quote, a backslash or a control character, even with
/// `core.quotePath false`; octal escapes are raw bytes of the name.
pub fn unquote_path(field: &str) -> String {
    let Some(inner) = field
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return field.to_string();
    };

    let raw = inner.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let byte = raw[i];
        i += 1;
        if byte != b'\\' || i == raw.len() {
            bytes.push(byte);
            continue;
        }

        let escaped = raw[i];
        i += 1;
        let decoded = match escaped {
            b'0'..=b'7' => {
                let mut value = u32::from(escaped - b'0');
                for _ in 0..2 {
                    match raw.get(i) {
                        Some(&digit) if (b'0'..=b'7').contains(&digit) => {
                            value = value * 8 + u32::from(digit - b'0');
                            i += 1;
                        }
                        _ => break,
                    }
                }
                (value & 0xff) as u8
            }
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'v' => 0x0b,
            other => other,
        };
        bytes.push(decoded);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Parses `id|subject|author|date` lines. The subject may itself contain the
/// delimiter; lines with fewer than four fields are dropped.
pub fn parse_log(output: &str) -> Vec<HistoryEntry> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (id, rest) = line.split_once(LOG_DELIMITER)?;
            let mut tail = rest.rsplitn(3, LOG_DELIMITER);
            let date = tail.next()?;
            let author = tail.next()?;
            let message = tail.next()?;

            Some(HistoryEntry {
                id: id.to_string(),
                message: message.to_string(),
                author: author.to_string(),
                date: date.trim_end_matches('\r').to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_entry() {
        let entries = parse_log("abc1234|Fix typo|Alice|2024-01-02\n");

        assert_eq!(
            entries,
            vec![HistoryEntry {
                id: "abc1234".to_string(),
                message: "Fix typo".to_string(),
                author: "Alice".to_string(),
                date: "2024-01-02".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_log_drops_malformed_lines() {
        let raw = "abc1234|Fix typo|Alice|2024-01-02\nbroken|line|only\n\ndef5678|Second|Bob|2024-01-01\n";
        let entries = parse_log(raw);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "abc1234");
        assert_eq!(entries[1].id, "def5678");
    }

    #[test]
    fn test_parse_log_keeps_delimiter_in_subject() {
        let entries = parse_log("abc1234|Merge a|b sections|Alice|2024-01-02");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Merge a|b sections");
        assert_eq!(entries[0].author, "Alice");
        assert_eq!(entries[0].date, "2024-01-02");
    }

    #[test]
    fn test_parse_log_empty_subject() {
        let entries = parse_log("abc1234||Alice|2024-01-02");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "");
    }

    #[test]
    fn test_parse_short_status() {
        let raw = " M report.docx\n?? new.docx\nA  added.docx\nR  old.docx -> renamed.docx\nUU clash.docx\n";
        let records = parse_short_status(raw);

        assert_eq!(records.len(), 5);
        assert_eq!(records[0].path, "report.docx");
        assert_eq!(records[0].status, "M");
        assert_eq!(records[0].kind, ChangeKind::Modified);
        assert_eq!(records[1].status, "??");
        assert_eq!(records[1].kind, ChangeKind::Untracked);
        assert_eq!(records[2].kind, ChangeKind::Staged);
        assert_eq!(records[3].path, "renamed.docx");
        assert_eq!(records[3].original_path.as_deref(), Some("old.docx"));
        assert_eq!(records[4].kind, ChangeKind::Conflicted);
    }

    #[test]
    fn test_parse_short_status_non_ascii_names() {
        let records = parse_short_status(" M 合同审核.docx\n");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "合同审核.docx");
    }

    #[test]
    fn test_parse_short_status_quoted_names() {
        let raw = "?? \"My Report.docx\"\nR  \"old name.docx\" -> \"new name.docx\"\n M \"caf\\303\\251 \\\"draft\\\".docx\"\n";
        let records = parse_short_status(raw);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].path, "My Report.docx");
        assert_eq!(records[1].path, "new name.docx");
        assert_eq!(records[1].original_path.as_deref(), Some("old name.docx"));
        assert_eq!(records[2].path, "café \"draft\".docx");
    }

    #[test]
    fn test_unquote_path_escapes() {
        assert_eq!(unquote_path("report.docx"), "report.docx");
        assert_eq!(unquote_path("\"tab\\there.docx\""), "tab\there.docx");
        assert_eq!(unquote_path("\"back\\\\slash.docx\""), "back\\slash.docx");
    }

    #[test]
    fn test_parse_short_status_skips_short_lines() {
        assert!(parse_short_status("M\n\n").is_empty());
    }
}
