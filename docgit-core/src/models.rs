use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Untracked,
    Modified,
    Staged,
    Deleted,
    Renamed,
    Conflicted,
    Other,
}

impl ChangeKind {
    pub fn as_str(&self) -> &str {
        match self {
            ChangeKind::Untracked => "untracked",
            ChangeKind::Modified => "modified",
            ChangeKind::Staged => "staged",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Conflicted => "conflicted",
            ChangeKind::Other => "other",
        }
    }

    /// Classifies a two-column short-status code (index, worktree).
    pub fn from_short_code(xy: &str) -> Self {
        let mut chars = xy.chars();
        let x = chars.next().unwrap_or(' ');
        let y = chars.next().unwrap_or(' ');

        match (x, y) {
            ('?', '?') => ChangeKind::Untracked,
            ('U', _) | (_, 'U') | ('A', 'A') | ('D', 'D') => ChangeKind::Conflicted,
            ('R', _) | (_, 'R') => ChangeKind::Renamed,
            ('D', _) | (_, 'D') => ChangeKind::Deleted,
            (_, 'M') | (_, 'T') => ChangeKind::Modified,
            ('M', ' ') | ('A', ' ') | ('T', ' ') | ('C', ' ') => ChangeKind::Staged,
            _ => ChangeKind::Other,
        }
    }
}

/// One file's state relative to the last snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub path: String,
    /// Short-status code with surrounding blanks trimmed, e.g. `M`, `??`, `MM`.
    pub status: String,
    pub kind: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
}

/// One snapshot as listed by the log, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub message: String,
    pub author: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommitOutcome {
    Committed { id: String },
    NothingChanged,
}

impl CommitOutcome {
    pub fn committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertOutcome {
    pub reverted: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapReport {
    pub root: PathBuf,
    /// The metadata store was created by this call.
    pub created_store: bool,
    /// Configuration files whose content changed in this call.
    pub updated_files: Vec<String>,
    /// Message of the configuration commit, if one was made.
    pub commit_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyStatus {
    pub program: String,
    pub available: bool,
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_code_classification() {
        assert_eq!(ChangeKind::from_short_code("??"), ChangeKind::Untracked);
        assert_eq!(ChangeKind::from_short_code(" M"), ChangeKind::Modified);
        assert_eq!(ChangeKind::from_short_code("MM"), ChangeKind::Modified);
        assert_eq!(ChangeKind::from_short_code("M "), ChangeKind::Staged);
        assert_eq!(ChangeKind::from_short_code("A "), ChangeKind::Staged);
        assert_eq!(ChangeKind::from_short_code(" D"), ChangeKind::Deleted);
        assert_eq!(ChangeKind::from_short_code("R "), ChangeKind::Renamed);
        assert_eq!(ChangeKind::from_short_code("UU"), ChangeKind::Conflicted);
        assert_eq!(ChangeKind::from_short_code("AA"), ChangeKind::Conflicted);
        assert_eq!(ChangeKind::from_short_code("!!"), ChangeKind::Other);
    }

    #[test]
    fn test_commit_outcome_serialization() {
        let committed = CommitOutcome::Committed {
            id: "abc1234".to_string(),
        };
        let json = serde_json::to_value(&committed).unwrap();

        assert_eq!(json["outcome"], "committed");
        assert_eq!(json["id"], "abc1234");
        assert!(committed.committed());
        assert!(!CommitOutcome::NothingChanged.committed());
    }

    #[test]
    fn test_change_record_omits_missing_original_path() {
        let record = ChangeRecord {
            path: "a.docx".to_string(),
            status: "M".to_string(),
            kind: ChangeKind::Staged,
            original_path: None,
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["kind"], "staged");
        assert!(json.get("original_path").is_none());
    }
}
