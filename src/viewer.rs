/*!
The diff viewer: state and event handlers.

`DiffViewer` holds the current payload, the view mode and the rendered rows,
and pushes every change to its [`Surface`]. Event handlers are plain methods;
the only asynchronous step is the request made by [`DiffViewer::submit`].
*/

use crate::client::{DiffSource, FetchError};
use crate::date_selector::{DateError, DateSelector, DateUpdate};
use crate::html::escape_html;
use crate::model::{DiffRequest, DiffResponse};
use crate::render::{RenderedDiff, ViewMode, render_response};
use crate::search::{SearchError, SearchOutcome, clear_highlights, highlight_matches};
use crate::surface::{ElementId, Surface};
use thiserror::Error;
use tracing::{debug, info};

pub const EMPTY_URL_MESSAGE: &str = "Please enter a valid URL";

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Please enter a valid URL")]
    EmptyUrl,

    #[error(transparent)]
    Date(#[from] DateError),

    #[error("{}", .0.user_message())]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Toggle button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToggleButton {
    pub mode: ViewMode,
    pub enabled: bool,
}

impl ToggleButton {
    pub fn label(&self) -> &'static str {
        match self.mode {
            ViewMode::All => "Focus on Changes",
            ViewMode::ChangesOnly => "Show All Content",
        }
    }

    pub fn pressed(&self) -> bool {
        self.mode == ViewMode::ChangesOnly
    }

    pub fn title(&self) -> &'static str {
        if self.enabled {
            "Toggle between showing all content or only changes"
        } else {
            "No changes to focus on"
        }
    }
}

/// A submitted request waiting for its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub generation: u64,
    pub request: DiffRequest,
}

pub struct DiffViewer<S: Surface> {
    surface: S,
    dates: DateSelector,
    current: Option<DiffResponse>,
    rendered: RenderedDiff,
    toggle: ToggleButton,
    generation: u64,
}

impl<S: Surface> DiffViewer<S> {
    pub fn new(surface: S, dates: DateSelector) -> Self {
        let mut viewer = Self {
            surface,
            dates,
            current: None,
            rendered: RenderedDiff::default(),
            toggle: ToggleButton::default(),
            generation: 0,
        };
        let years: Vec<String> =
            viewer.dates.year_options().iter().map(|year| year.to_string()).collect();
        viewer.surface.set_options(ElementId::ArchiveYear, &years);
        let initial = viewer.dates.current();
        viewer.apply_date(initial);
        viewer.sync_toggle();
        viewer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn dates(&self) -> &DateSelector {
        &self.dates
    }

    pub fn current(&self) -> Option<&DiffResponse> {
        self.current.as_ref()
    }

    pub fn rendered(&self) -> &RenderedDiff {
        &self.rendered
    }

    pub fn toggle(&self) -> ToggleButton {
        self.toggle
    }

    pub fn mode(&self) -> ViewMode {
        self.toggle.mode
    }

    // ---------- Date selectors ----------

    pub fn select_year(&mut self, year: i32) -> Result<DateUpdate, ViewerError> {
        let update = self.dates.select_year(year)?;
        self.apply_date(update.clone());
        Ok(update)
    }

    pub fn select_month(&mut self, month: u32) -> Result<DateUpdate, ViewerError> {
        let update = self.dates.select_month(month)?;
        self.apply_date(update.clone());
        Ok(update)
    }

    pub fn select_day(&mut self, day: u32) -> Result<DateUpdate, ViewerError> {
        let update = self.dates.select_day(day)?;
        self.apply_date(update.clone());
        Ok(update)
    }

    pub fn select_date(&mut self, iso: &str) -> Result<DateUpdate, ViewerError> {
        let update = self.dates.select_iso(iso)?;
        self.apply_date(update.clone());
        Ok(update)
    }

    fn apply_date(&mut self, update: DateUpdate) {
        self.surface.set_value(ElementId::ArchiveYear, &self.dates.year().to_string());
        self.surface.set_value(ElementId::ArchiveMonth, &format!("{:02}", self.dates.month()));
        self.surface.set_options(ElementId::ArchiveDay, &self.dates.day_options());
        self.surface.set_value(ElementId::ArchiveDay, &format!("{:02}", self.dates.day()));
        self.surface.set_value(ElementId::ArchiveDate, &update.iso_date);
        self.surface.set_value(ElementId::Timestamp, &update.timestamp);
        match update.warning {
            Some(warning) => self.show_warning(&warning),
            None => self.clear_warning(),
        }
    }

    // ---------- Request ----------

    /// Validates the form and enters the loading state.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::EmptyUrl`] for a blank URL; the error banner
    /// is shown and no request should be made.
    pub fn begin_submit(&mut self, url: &str) -> Result<PendingRequest, ViewerError> {
        let url = url.trim();
        if url.is_empty() {
            self.show_error(EMPTY_URL_MESSAGE);
            return Err(ViewerError::EmptyUrl);
        }

        self.generation += 1;
        let request = DiffRequest { url: url.to_string(), timestamp: self.dates.timestamp() };
        info!(url = %request.url, timestamp = %request.timestamp, generation = self.generation, "submitting diff request");

        self.surface.set_hidden(ElementId::Loading, false);
        self.surface.set_hidden(ElementId::DiffResults, true);
        self.surface.set_hidden(ElementId::ErrorMessage, true);

        Ok(PendingRequest { generation: self.generation, request })
    }

    /// Applies the outcome of a request.
    ///
    /// Returns `false` when a newer request was submitted meanwhile; the
    /// outcome is then discarded.
    pub fn complete(
        &mut self,
        pending: &PendingRequest,
        outcome: Result<DiffResponse, FetchError>,
    ) -> Result<bool, ViewerError> {
        if pending.generation != self.generation {
            debug!(stale = pending.generation, latest = self.generation, "discarding stale response");
            return Ok(false);
        }

        self.surface.set_hidden(ElementId::Loading, true);
        match outcome {
            Ok(response) => {
                self.show_response(response);
                Ok(true)
            }
            Err(err) => {
                self.show_error(&err.user_message());
                if self.current.is_some() {
                    self.surface.set_hidden(ElementId::DiffResults, false);
                }
                Err(err.into())
            }
        }
    }

    /// Submits the form through `source` and displays the result.
    pub async fn submit<D>(&mut self, url: &str, source: &D) -> Result<(), ViewerError>
    where
        D: DiffSource + ?Sized,
    {
        let pending = self.begin_submit(url)?;
        let outcome = source.generate_diff(&pending.request).await;
        self.complete(&pending, outcome)?;
        Ok(())
    }

    /// Replaces the current payload and refreshes every results element.
    pub fn show_response(&mut self, response: DiffResponse) {
        match response.warning.as_deref() {
            Some(warning) => self.show_warning(warning),
            None => self.clear_warning(),
        }

        self.surface.set_text(
            ElementId::OldVersionHeader,
            &format!("Archived Version ({})", response.archived_date),
        );
        self.surface.set_text(
            ElementId::NewVersionHeader,
            &format!("Current Version ({})", response.current_date),
        );
        self.surface.set_html(ElementId::DiffInfo, &diff_info_html(&response));

        let stats = &response.stats;
        if stats.is_identical {
            self.surface.set_html(
                ElementId::ChangeStats,
                "<strong>The content is identical between the two versions</strong>",
            );
        } else {
            self.surface.set_text(ElementId::ChangeStats, &stats.summary());
        }
        self.toggle.enabled = !stats.has_no_changes();
        if !self.toggle.enabled {
            // A disabled toggle cannot leave the changes-only view.
            self.toggle.mode = ViewMode::All;
        }

        self.surface.set_html(ElementId::KeyAdditions, &list_items_html(&response.significant_added));
        self.surface.set_html(ElementId::KeyRemovals, &list_items_html(&response.significant_removed));

        self.current = Some(response);
        self.sync_toggle();
        self.render();
        self.surface.set_hidden(ElementId::DiffResults, false);
    }

    // ---------- Toggle ----------

    /// Switches between the full and the changes-only view.
    ///
    /// Returns `false` without changing anything while the toggle is disabled.
    pub fn toggle_changes(&mut self) -> bool {
        if !self.toggle.enabled {
            return false;
        }
        self.toggle.mode = self.toggle.mode.toggled();
        debug!(mode = ?self.toggle.mode, "view mode toggled");
        self.sync_toggle();
        self.render();
        true
    }

    fn sync_toggle(&mut self) {
        let id = ElementId::ToggleChangesBtn;
        self.surface.set_text(id, self.toggle.label());
        self.surface.set_attribute(id, "aria-pressed", &self.toggle.pressed().to_string());
        self.surface.set_class(id, "active-toggle", self.toggle.pressed());
        self.surface.set_disabled(id, !self.toggle.enabled);
        self.surface.set_attribute(id, "title", self.toggle.title());
    }

    fn render(&mut self) {
        let Some(response) = &self.current else {
            return;
        };
        self.rendered = render_response(response, self.toggle.mode);
        self.surface.set_html(ElementId::DiffContent, &self.rendered.to_html());
    }

    // ---------- Search ----------

    /// Highlights `query` in the rendered rows and scrolls to the first match.
    ///
    /// Returns `Ok(None)` when there is no payload to search.
    ///
    /// # Errors
    ///
    /// Empty queries and queries without matches are reported through the
    /// error banner and returned as [`ViewerError::Search`].
    pub fn search(&mut self, query: &str) -> Result<Option<SearchOutcome>, ViewerError> {
        if self.current.is_none() {
            return Ok(None);
        }

        match highlight_matches(self.rendered.rows_mut(), query) {
            Ok(outcome) => {
                self.surface.set_html(ElementId::DiffContent, &self.rendered.to_html());
                self.surface.scroll_row_into_view(outcome.first_match);
                Ok(Some(outcome))
            }
            Err(err) => {
                self.surface.set_html(ElementId::DiffContent, &self.rendered.to_html());
                self.show_error(&err.to_string());
                Err(err.into())
            }
        }
    }

    /// Removes all search highlights.
    pub fn clear_search(&mut self) {
        clear_highlights(self.rendered.rows_mut());
        if self.current.is_some() {
            self.surface.set_html(ElementId::DiffContent, &self.rendered.to_html());
        }
    }

    // ---------- Messages ----------

    fn show_error(&mut self, message: &str) {
        self.surface.set_text(ElementId::ErrorMessage, message);
        self.surface.set_hidden(ElementId::ErrorMessage, false);
    }

    fn show_warning(&mut self, message: &str) {
        self.surface.set_text(ElementId::WarningMessage, message);
        self.surface.set_hidden(ElementId::WarningMessage, false);
    }

    fn clear_warning(&mut self) {
        self.surface.set_hidden(ElementId::WarningMessage, true);
    }
}

fn diff_info_html(response: &DiffResponse) -> String {
    let url = escape_html(&response.url);
    let mut html = format!(
        "<p>Comparing archived version from <strong>{}</strong> to current version from <strong>{}</strong></p>\
         <p>URL: <a href=\"{}\" target=\"_blank\">{}</a></p>",
        escape_html(&response.archived_date),
        escape_html(&response.current_date),
        url,
        url
    );
    if let Some(note) = &response.date_note {
        html.push_str(&format!("<p class=\"date-note\">{}</p>", escape_html(note)));
    }
    html
}

fn list_items_html(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect()
}
