/*!
Two-column rendering of diff entries.

Rendering is a pure function of the entries and the [`ViewMode`]; the result
is either a list of [`DiffRow`]s or a single full-width [`Placeholder`].
*/

use crate::html::{Cell, Tone, escape_html};
use crate::model::{DiffEntry, DiffResponse, EntryKind, WordKind};

/// Which entries the diff table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    All,
    ChangesOnly,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::All => ViewMode::ChangesOnly,
            ViewMode::ChangesOnly => ViewMode::All,
        }
    }

    pub fn shows(&self, kind: EntryKind) -> bool {
        match self {
            ViewMode::All => true,
            ViewMode::ChangesOnly => kind.is_change(),
        }
    }
}

/// Full-width message shown instead of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// The payload carried no entries at all
    Empty,
    /// Changes-only view over entries that are all equal
    NoChanges,
    Identical,
}

impl Placeholder {
    pub fn message(&self) -> &'static str {
        match self {
            Placeholder::Empty => "No differences found",
            Placeholder::NoChanges => "No differences found between the versions",
            Placeholder::Identical => "The content is identical between the two versions",
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"full-width-message\"><div class=\"no-changes\">{}</div></div>",
            escape_html(self.message())
        )
    }
}

/// One visual row of the diff table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    pub kind: EntryKind,
    pub old_line: Option<u32>,
    pub old: Cell,
    pub new_line: Option<u32>,
    pub new: Cell,
    /// Set by search when either cell matched
    pub highlighted: bool,
    /// Set on the first matching row, the one scrolled into view
    pub scrolled_to: bool,
}

impl DiffRow {
    pub fn from_entry(entry: &DiffEntry) -> Self {
        let old_line = (entry.kind != EntryKind::Add).then_some(entry.line_num);
        let new_line = (entry.kind != EntryKind::Remove).then_some(entry.line_num);

        let (old, new) = match entry.kind {
            EntryKind::Equal => (Cell::plain(entry.old_text()), Cell::plain(entry.new_text())),
            EntryKind::Add => (
                Cell::empty(),
                Cell::toned(Tone::Added, entry.new_text())
                    .with_label(format!("Added content: {}", entry.new_text())),
            ),
            EntryKind::Remove => (
                Cell::toned(Tone::Removed, entry.old_text())
                    .with_label(format!("Removed content: {}", entry.old_text())),
                Cell::empty(),
            ),
            EntryKind::Change => {
                let (old, new) = change_cells(entry);
                (
                    old.with_label(format!("Changed from: {}", entry.old_text())),
                    new.with_label(format!("Changed to: {}", entry.new_text())),
                )
            }
        };

        Self {
            kind: entry.kind,
            old_line,
            old,
            new_line,
            new,
            highlighted: false,
            scrolled_to: false,
        }
    }

    pub fn to_html(&self, index: usize) -> String {
        let mut class = String::from("diff-row");
        if self.highlighted {
            class.push_str(" highlight-row");
        }
        if self.scrolled_to {
            class.push_str(" scrolled-to");
        }
        format!(
            "<div class=\"{}\" role=\"row\" data-row=\"{}\">{}{}{}{}</div>",
            class,
            index,
            line_number_html(self.old_line),
            content_html(&self.old),
            line_number_html(self.new_line),
            content_html(&self.new),
        )
    }
}

fn change_cells(entry: &DiffEntry) -> (Cell, Cell) {
    let Some(words) = entry.word_diff() else {
        return (
            Cell::toned(Tone::Removed, entry.old_text()),
            Cell::toned(Tone::Added, entry.new_text()),
        );
    };

    let mut old = Cell::empty();
    let mut new = Cell::empty();
    for word in words {
        match word.kind {
            WordKind::Equal => {
                old.push(Tone::Plain, &word.text);
                new.push(Tone::Plain, &word.text);
            }
            WordKind::Remove => old.push(Tone::Removed, &word.text),
            WordKind::Add => new.push(Tone::Added, &word.text),
        }
    }
    (old, new)
}

fn line_number_html(line: Option<u32>) -> String {
    let text = line.map(|n| n.to_string()).unwrap_or_default();
    format!("<div class=\"line-number\" role=\"cell\">{}</div>", text)
}

fn content_html(cell: &Cell) -> String {
    match cell.aria_label() {
        Some(label) => format!(
            "<div class=\"content\" role=\"cell\" aria-label=\"{}\">{}</div>",
            escape_html(label),
            cell.inner_html()
        ),
        None => format!("<div class=\"content\" role=\"cell\">{}</div>", cell.inner_html()),
    }
}

/// Output of a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedDiff {
    Rows(Vec<DiffRow>),
    Message(Placeholder),
}

impl Default for RenderedDiff {
    fn default() -> Self {
        RenderedDiff::Rows(Vec::new())
    }
}

impl RenderedDiff {
    pub fn rows(&self) -> &[DiffRow] {
        match self {
            RenderedDiff::Rows(rows) => rows,
            RenderedDiff::Message(_) => &[],
        }
    }

    pub fn rows_mut(&mut self) -> &mut [DiffRow] {
        match self {
            RenderedDiff::Rows(rows) => rows,
            RenderedDiff::Message(_) => &mut [],
        }
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        match self {
            RenderedDiff::Message(placeholder) => Some(*placeholder),
            RenderedDiff::Rows(_) => None,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            RenderedDiff::Rows(rows) => rows
                .iter()
                .enumerate()
                .map(|(index, row)| row.to_html(index))
                .collect(),
            RenderedDiff::Message(placeholder) => placeholder.to_html(),
        }
    }
}

/// Renders entries under the given view mode.
///
/// # Arguments
///
/// * `entries` - Diff entries in payload order
/// * `mode` - Whether equal entries are shown
///
/// # Returns
///
/// The visible rows, or the placeholder explaining why there are none
pub fn render_entries(entries: &[DiffEntry], mode: ViewMode) -> RenderedDiff {
    if entries.is_empty() {
        return RenderedDiff::Message(Placeholder::Empty);
    }

    if !entries.iter().any(|entry| entry.kind.is_change()) {
        return RenderedDiff::Message(match mode {
            ViewMode::ChangesOnly => Placeholder::NoChanges,
            ViewMode::All => Placeholder::Identical,
        });
    }

    let rows: Vec<DiffRow> = entries
        .iter()
        .filter(|entry| mode.shows(entry.kind))
        .map(DiffRow::from_entry)
        .collect();

    if rows.is_empty() {
        return RenderedDiff::Message(Placeholder::NoChanges);
    }
    RenderedDiff::Rows(rows)
}

/// Renders a whole response. Identical content always yields the identical
/// message, whatever the view mode.
pub fn render_response(response: &DiffResponse, mode: ViewMode) -> RenderedDiff {
    if response.stats.is_identical {
        return RenderedDiff::Message(Placeholder::Identical);
    }
    render_entries(&response.diff_data, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiffStats, WordDiffEntry};

    fn entry(kind: EntryKind, line_num: u32, old: &str, new: &str) -> DiffEntry {
        DiffEntry {
            kind,
            line_num,
            old_text: Some(old.to_string()),
            new_text: Some(new.to_string()),
            word_diff: None,
        }
    }

    fn mixed_entries() -> Vec<DiffEntry> {
        vec![
            entry(EntryKind::Equal, 1, "Title", "Title"),
            entry(EntryKind::Remove, 2, "Old paragraph", ""),
            entry(EntryKind::Equal, 3, "Footer", "Footer"),
            entry(EntryKind::Add, 4, "", "New paragraph"),
            entry(EntryKind::Change, 5, "Price 10", "Price 12"),
        ]
    }

    /// Every sequence of up to `max_len` entries over the four kinds.
    fn sequences(max_len: u32) -> Vec<Vec<DiffEntry>> {
        const KINDS: [EntryKind; 4] =
            [EntryKind::Equal, EntryKind::Add, EntryKind::Remove, EntryKind::Change];
        let mut all = Vec::new();
        for len in 0..=max_len {
            for code in 0..4usize.pow(len) {
                let entries = (0..len)
                    .map(|i| {
                        let kind = KINDS[code / 4usize.pow(i) % 4];
                        entry(kind, i + 1, "old", "new")
                    })
                    .collect();
                all.push(entries);
            }
        }
        all
    }

    #[test]
    fn test_changes_only_filters_exactly_equal_entries() {
        let mut generated = sequences(4);
        generated.push(mixed_entries());
        generated.push((1..=12).map(|n| entry(EntryKind::Equal, n, "same", "same")).collect());
        generated.push((1..=12).map(|n| entry(EntryKind::Change, n, "a", "b")).collect());

        for entries in &generated {
            let changed: Vec<EntryKind> =
                entries.iter().map(|e| e.kind).filter(|k| *k != EntryKind::Equal).collect();

            let all = render_entries(entries, ViewMode::All);
            let changes = render_entries(entries, ViewMode::ChangesOnly);
            assert!(changes.rows().len() <= all.rows().len().max(entries.len()));

            if entries.is_empty() {
                assert_eq!(all.placeholder(), Some(Placeholder::Empty));
                assert_eq!(changes.placeholder(), Some(Placeholder::Empty));
            } else if changed.is_empty() {
                assert_eq!(all.placeholder(), Some(Placeholder::Identical));
                assert_eq!(changes.placeholder(), Some(Placeholder::NoChanges));
            } else {
                assert_eq!(all.rows().len(), entries.len());
                let kinds: Vec<EntryKind> = changes.rows().iter().map(|r| r.kind).collect();
                assert_eq!(kinds, changed, "entries: {:?}", entries);
            }
        }
    }

    #[test]
    fn test_word_diff_change_row() {
        let entries = vec![DiffEntry {
            kind: EntryKind::Change,
            line_num: 3,
            old_text: Some("foo".into()),
            new_text: Some("bar".into()),
            word_diff: Some(vec![
                WordDiffEntry { kind: WordKind::Remove, text: "foo".into() },
                WordDiffEntry { kind: WordKind::Add, text: "bar".into() },
            ]),
        }];

        let rendered = render_entries(&entries, ViewMode::All);
        let rows = rendered.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].old_line, Some(3));
        assert_eq!(rows[0].new_line, Some(3));
        assert_eq!(rows[0].old.inner_html(), "<span class=\"diff-remove\">foo</span>");
        assert_eq!(rows[0].new.inner_html(), "<span class=\"diff-add\">bar</span>");
    }

    #[test]
    fn test_word_diff_equal_words_in_both_columns() {
        let mut change = entry(EntryKind::Change, 1, "Price 10", "Price 12");
        change.word_diff = Some(vec![
            WordDiffEntry { kind: WordKind::Equal, text: "Price ".into() },
            WordDiffEntry { kind: WordKind::Remove, text: "10".into() },
            WordDiffEntry { kind: WordKind::Add, text: "12".into() },
        ]);
        let row = DiffRow::from_entry(&change);
        assert_eq!(row.old.inner_html(), "Price <span class=\"diff-remove\">10</span>");
        assert_eq!(row.new.inner_html(), "Price <span class=\"diff-add\">12</span>");
        assert_eq!(row.old.aria_label(), Some("Changed from: Price 10"));
        assert_eq!(row.new.aria_label(), Some("Changed to: Price 12"));
    }

    #[test]
    fn test_change_without_word_diff_falls_back_to_whole_line() {
        let row = DiffRow::from_entry(&entry(EntryKind::Change, 9, "a", "b"));
        assert_eq!(row.old.inner_html(), "<span class=\"diff-remove\">a</span>");
        assert_eq!(row.new.inner_html(), "<span class=\"diff-add\">b</span>");
    }

    #[test]
    fn test_add_and_remove_line_numbers() {
        let add = DiffRow::from_entry(&entry(EntryKind::Add, 4, "", "x"));
        assert_eq!(add.old_line, None);
        assert_eq!(add.new_line, Some(4));
        assert!(add.old.text().is_empty());
        assert_eq!(add.new.aria_label(), Some("Added content: x"));

        let remove = DiffRow::from_entry(&entry(EntryKind::Remove, 2, "y", ""));
        assert_eq!(remove.old_line, Some(2));
        assert_eq!(remove.new_line, None);
        assert!(remove.new.text().is_empty());
        assert_eq!(remove.old.aria_label(), Some("Removed content: y"));
    }

    #[test]
    fn test_row_html_escapes_text() {
        let row = DiffRow::from_entry(&entry(EntryKind::Equal, 1, "<b>", "<i>"));
        let html = row.to_html(0);
        assert!(html.contains("&lt;b&gt;"));
        assert!(html.contains("&lt;i&gt;"));
        assert!(!html.contains("<b>"));
        assert!(html.starts_with("<div class=\"diff-row\" role=\"row\" data-row=\"0\">"));
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(render_entries(&[], ViewMode::All).placeholder(), Some(Placeholder::Empty));
        assert_eq!(
            render_entries(&[], ViewMode::ChangesOnly).placeholder(),
            Some(Placeholder::Empty)
        );

        let equal_only = vec![entry(EntryKind::Equal, 1, "same", "same")];
        assert_eq!(
            render_entries(&equal_only, ViewMode::All).placeholder(),
            Some(Placeholder::Identical)
        );
        assert_eq!(
            render_entries(&equal_only, ViewMode::ChangesOnly).placeholder(),
            Some(Placeholder::NoChanges)
        );
    }

    #[test]
    fn test_identical_response_ignores_view_mode() {
        let response = DiffResponse {
            stats: DiffStats { is_identical: true, ..Default::default() },
            diff_data: mixed_entries(),
            ..Default::default()
        };
        for mode in [ViewMode::All, ViewMode::ChangesOnly] {
            let rendered = render_response(&response, mode);
            assert_eq!(rendered.placeholder(), Some(Placeholder::Identical));
            assert!(rendered.rows().is_empty());
            assert_eq!(
                rendered.to_html(),
                "<div class=\"full-width-message\"><div class=\"no-changes\">\
                 The content is identical between the two versions</div></div>"
            );
        }
    }

    #[test]
    fn test_view_mode_toggle() {
        assert_eq!(ViewMode::All.toggled(), ViewMode::ChangesOnly);
        assert_eq!(ViewMode::ChangesOnly.toggled(), ViewMode::All);
        assert!(!ViewMode::ChangesOnly.shows(EntryKind::Equal));
        assert!(ViewMode::ChangesOnly.shows(EntryKind::Change));
    }
}
