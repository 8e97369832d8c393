/*!
Case-insensitive text search over rendered diff rows.
*/

use crate::render::DiffRow;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Please enter a search term")]
    EmptyQuery,

    #[error("No matches found for \"{0}\"")]
    NoMatch(String),

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Rows touched by a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Indices of every matching row, in display order
    pub matched_rows: Vec<usize>,
    /// Row scrolled into view
    pub first_match: usize,
}

/// Builds the case-insensitive pattern for a literal query.
pub fn query_pattern(query: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
}

/// Removes every search marker and restores the plain rendering.
pub fn clear_highlights(rows: &mut [DiffRow]) {
    for row in rows.iter_mut() {
        row.old.clear_highlights();
        row.new.clear_highlights();
        row.highlighted = false;
        row.scrolled_to = false;
    }
}

/// Highlights every occurrence of `query` in the content cells of `rows`.
///
/// Previous highlights are removed first, so repeated searches never stack
/// markers.
///
/// # Errors
///
/// Returns [`SearchError::EmptyQuery`] for a blank query and
/// [`SearchError::NoMatch`] when no row contains it. A query too large for
/// the regex engine yields [`SearchError::Pattern`].
pub fn highlight_matches(rows: &mut [DiffRow], query: &str) -> Result<SearchOutcome, SearchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    clear_highlights(rows);

    let pattern = query_pattern(query)?;
    let mut matched_rows = Vec::new();

    for (index, row) in rows.iter_mut().enumerate() {
        let mut row_has_match = false;
        for cell in [&mut row.old, &mut row.new] {
            let text = cell.text();
            let ranges: Vec<_> = pattern.find_iter(&text).map(|m| m.range()).collect();
            if !ranges.is_empty() {
                row_has_match = true;
                cell.set_highlights(ranges);
            }
        }
        if row_has_match {
            row.highlighted = true;
            matched_rows.push(index);
        }
    }

    let Some(&first_match) = matched_rows.first() else {
        return Err(SearchError::NoMatch(query.to_string()));
    };
    rows[first_match].scrolled_to = true;

    Ok(SearchOutcome { matched_rows, first_match })
}
