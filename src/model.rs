/*!
Wire types for the `/generate-diff` endpoint.

The diff service produces a [`DiffResponse`] once per request; the viewer
treats it as immutable until the next successful request replaces it.
*/

use serde::{Deserialize, Serialize};

/// Classification of one aligned line pair.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Equal,
    Add,
    Remove,
    Change,
}

impl EntryKind {
    pub fn is_change(&self) -> bool {
        !matches!(self, EntryKind::Equal)
    }
}

/// Classification of one token inside a changed line.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WordKind {
    Equal,
    Add,
    Remove,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WordDiffEntry {
    #[serde(rename = "type")]
    pub kind: WordKind,
    #[serde(default)]
    pub text: String,
}

/// One row of the line diff.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub line_num: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_diff: Option<Vec<WordDiffEntry>>,
}

impl DiffEntry {
    pub fn old_text(&self) -> &str {
        self.old_text.as_deref().unwrap_or_default()
    }

    pub fn new_text(&self) -> &str {
        self.new_text.as_deref().unwrap_or_default()
    }

    /// Word diff tokens, or `None` when absent or empty.
    pub fn word_diff(&self) -> Option<&[WordDiffEntry]> {
        self.word_diff.as_deref().filter(|words| !words.is_empty())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffStats {
    #[serde(default)]
    pub added_lines: u32,
    #[serde(default)]
    pub removed_lines: u32,
    #[serde(default)]
    pub changed_lines: u32,
    #[serde(default)]
    pub is_identical: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_lines: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_changes: Option<u32>,
}

impl DiffStats {
    /// True when there is nothing for the changes-only view to show.
    pub fn has_no_changes(&self) -> bool {
        self.is_identical
            || (self.added_lines == 0 && self.removed_lines == 0 && self.changed_lines == 0)
    }

    /// Human readable counters, e.g. `3 additions, 1 removals, 0 changes`.
    pub fn summary(&self) -> String {
        format!(
            "{} additions, {} removals, {} changes",
            self.added_lines, self.removed_lines, self.changed_lines
        )
    }
}

/// Successful response body of `POST /generate-diff`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResponse {
    pub archived_date: String,
    pub current_date: String,
    pub url: String,
    #[serde(default)]
    pub stats: DiffStats,
    #[serde(default)]
    pub significant_added: Vec<String>,
    #[serde(default)]
    pub significant_removed: Vec<String>,
    #[serde(default)]
    pub diff_data: Vec<DiffEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_note: Option<String>,
}

/// Request body of `POST /generate-diff`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiffRequest {
    pub url: String,
    /// Archive date as `YYYYMMDD`
    pub timestamp: String,
}

/// Failure body of `POST /generate-diff`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "url": "https://example.com",
        "archived_date": "03-01-2024",
        "current_date": "03-01-2025",
        "date_note": null,
        "diff_data": [
            {"type": "equal", "line_num": 1, "old_text": "Home", "new_text": "Home"},
            {"type": "change", "line_num": 2, "old_text": "foo", "new_text": "bar",
             "word_diff": [{"type": "remove", "text": "foo"}, {"type": "add", "text": "bar"}]},
            {"type": "add", "line_num": 3, "old_text": "", "new_text": "New line"}
        ],
        "significant_added": ["New line"],
        "significant_removed": [],
        "stats": {"total_lines": 3, "added_lines": 1, "removed_lines": 0,
                  "changed_lines": 1, "is_identical": false, "total_changes": 2}
    }"#;

    #[test]
    fn test_parse_service_payload() {
        let response: DiffResponse = serde_json::from_str(PAYLOAD).unwrap();
        assert_eq!(response.diff_data.len(), 3);
        assert_eq!(response.diff_data[1].kind, EntryKind::Change);
        assert_eq!(response.diff_data[1].word_diff().unwrap().len(), 2);
        assert_eq!(response.stats.total_changes, Some(2));
        assert!(response.date_note.is_none());
        assert!(response.warning.is_none());
    }

    #[test]
    fn test_entry_without_optional_fields() {
        let entry: DiffEntry = serde_json::from_str(r#"{"type": "remove", "line_num": 7}"#).unwrap();
        assert_eq!(entry.old_text(), "");
        assert_eq!(entry.new_text(), "");
        assert!(entry.word_diff().is_none());
    }

    #[test]
    fn test_empty_word_diff_is_absent() {
        let entry: DiffEntry = serde_json::from_str(
            r#"{"type": "change", "line_num": 1, "old_text": "a", "new_text": "b", "word_diff": []}"#,
        )
        .unwrap();
        assert!(entry.word_diff().is_none());
    }

    #[test]
    fn test_stats_without_changes() {
        let stats = DiffStats::default();
        assert!(stats.has_no_changes());
        assert_eq!(stats.summary(), "0 additions, 0 removals, 0 changes");

        let stats = DiffStats { removed_lines: 2, ..Default::default() };
        assert!(!stats.has_no_changes());
    }

    #[test]
    fn test_request_body_shape() {
        let request = DiffRequest { url: "https://example.com".into(), timestamp: "20240301".into() };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["timestamp"], "20240301");
    }
}
