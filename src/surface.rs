/*!
The page the viewer writes into.

[`Surface`] abstracts the handful of element operations the viewer needs.
Every operation targeting an element the page does not contain is a no-op.
[`PageSurface`] is an in-memory implementation used by the command line tool
and the tests; the browser implementation lives in `crate::browser`.
*/

use std::collections::HashMap;

/// Fixed element identifiers of the viewer page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    DiffForm,
    Url,
    Loading,
    ErrorMessage,
    WarningMessage,
    DiffResults,
    DiffContent,
    ToggleChangesBtn,
    SearchInput,
    SearchBtn,
    KeyAdditions,
    KeyRemovals,
    DiffInfo,
    ChangeStats,
    OldVersionHeader,
    NewVersionHeader,
    ArchiveDate,
    Timestamp,
    ArchiveYear,
    ArchiveMonth,
    ArchiveDay,
}

impl ElementId {
    pub const ALL: [ElementId; 21] = [
        ElementId::DiffForm,
        ElementId::Url,
        ElementId::Loading,
        ElementId::ErrorMessage,
        ElementId::WarningMessage,
        ElementId::DiffResults,
        ElementId::DiffContent,
        ElementId::ToggleChangesBtn,
        ElementId::SearchInput,
        ElementId::SearchBtn,
        ElementId::KeyAdditions,
        ElementId::KeyRemovals,
        ElementId::DiffInfo,
        ElementId::ChangeStats,
        ElementId::OldVersionHeader,
        ElementId::NewVersionHeader,
        ElementId::ArchiveDate,
        ElementId::Timestamp,
        ElementId::ArchiveYear,
        ElementId::ArchiveMonth,
        ElementId::ArchiveDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::DiffForm => "diffForm",
            ElementId::Url => "url",
            ElementId::Loading => "loading",
            ElementId::ErrorMessage => "errorMessage",
            ElementId::WarningMessage => "warningMessage",
            ElementId::DiffResults => "diffResults",
            ElementId::DiffContent => "diffContent",
            ElementId::ToggleChangesBtn => "toggleChangesBtn",
            ElementId::SearchInput => "searchInput",
            ElementId::SearchBtn => "searchBtn",
            ElementId::KeyAdditions => "keyAdditions",
            ElementId::KeyRemovals => "keyRemovals",
            ElementId::DiffInfo => "diffInfo",
            ElementId::ChangeStats => "changeStats",
            ElementId::OldVersionHeader => "oldVersionHeader",
            ElementId::NewVersionHeader => "newVersionHeader",
            ElementId::ArchiveDate => "archiveDate",
            ElementId::Timestamp => "timestamp",
            ElementId::ArchiveYear => "archiveYear",
            ElementId::ArchiveMonth => "archiveMonth",
            ElementId::ArchiveDay => "archiveDay",
        }
    }
}

/// Element operations used by the viewer.
pub trait Surface {
    /// Replaces the element's content with escaped text.
    fn set_text(&mut self, id: ElementId, text: &str);

    /// Replaces the element's content with trusted markup.
    fn set_html(&mut self, id: ElementId, html: &str);

    fn set_value(&mut self, id: ElementId, value: &str);

    /// Replaces the options of a select element.
    fn set_options(&mut self, id: ElementId, options: &[String]);

    fn set_hidden(&mut self, id: ElementId, hidden: bool);

    fn set_attribute(&mut self, id: ElementId, name: &str, value: &str);

    fn set_disabled(&mut self, id: ElementId, disabled: bool);

    fn set_class(&mut self, id: ElementId, class: &str, enabled: bool);

    /// Scrolls the diff row with the given display index into view.
    fn scroll_row_into_view(&mut self, row: usize);
}

/// Recorded state of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementState {
    /// Markup content; text set through [`Surface::set_text`] is stored escaped
    pub html: String,
    pub value: String,
    /// Select options, in display order
    pub options: Vec<String>,
    pub hidden: bool,
    pub disabled: bool,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

impl ElementState {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// In-memory page.
#[derive(Debug, Clone, Default)]
pub struct PageSurface {
    elements: HashMap<ElementId, ElementState>,
    scrolled_row: Option<usize>,
}

impl PageSurface {
    /// A page with every viewer element, in the initial state of the
    /// served page: loading, results, error and warning hidden.
    pub fn new() -> Self {
        Self::with_elements(&ElementId::ALL)
    }

    pub fn with_elements(ids: &[ElementId]) -> Self {
        let mut elements = HashMap::new();
        for id in ids {
            let hidden = matches!(
                id,
                ElementId::Loading
                    | ElementId::ErrorMessage
                    | ElementId::WarningMessage
                    | ElementId::DiffResults
            );
            elements.insert(*id, ElementState { hidden, ..Default::default() });
        }
        Self { elements, scrolled_row: None }
    }

    /// A full page minus the given elements.
    pub fn without(missing: &[ElementId]) -> Self {
        let ids: Vec<ElementId> = ElementId::ALL
            .iter()
            .copied()
            .filter(|id| !missing.contains(id))
            .collect();
        Self::with_elements(&ids)
    }

    pub fn element(&self, id: ElementId) -> Option<&ElementState> {
        self.elements.get(&id)
    }

    /// Markup of an element, empty when absent.
    pub fn html(&self, id: ElementId) -> &str {
        self.element(id).map(|e| e.html.as_str()).unwrap_or_default()
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(|e| !e.hidden)
    }

    pub fn scrolled_row(&self) -> Option<usize> {
        self.scrolled_row
    }

    fn with_element(&mut self, id: ElementId, f: impl FnOnce(&mut ElementState)) {
        if let Some(element) = self.elements.get_mut(&id) {
            f(element);
        }
    }
}

impl Surface for PageSurface {
    fn set_text(&mut self, id: ElementId, text: &str) {
        let html = crate::html::escape_html(text);
        self.with_element(id, |e| e.html = html);
    }

    fn set_html(&mut self, id: ElementId, html: &str) {
        self.with_element(id, |e| e.html = html.to_string());
    }

    fn set_value(&mut self, id: ElementId, value: &str) {
        self.with_element(id, |e| e.value = value.to_string());
    }

    fn set_options(&mut self, id: ElementId, options: &[String]) {
        self.with_element(id, |e| e.options = options.to_vec());
    }

    fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        self.with_element(id, |e| e.hidden = hidden);
    }

    fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        self.with_element(id, |e| match e.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => e.attributes.push((name.to_string(), value.to_string())),
        });
    }

    fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        self.with_element(id, |e| e.disabled = disabled);
    }

    fn set_class(&mut self, id: ElementId, class: &str, enabled: bool) {
        self.with_element(id, |e| {
            e.classes.retain(|c| c != class);
            if enabled {
                e.classes.push(class.to_string());
            }
        });
    }

    fn scroll_row_into_view(&mut self, row: usize) {
        if self.elements.contains_key(&ElementId::DiffContent) {
            self.scrolled_row = Some(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_visibility() {
        let page = PageSurface::new();
        assert!(!page.is_visible(ElementId::Loading));
        assert!(!page.is_visible(ElementId::DiffResults));
        assert!(page.is_visible(ElementId::DiffContent));
    }

    #[test]
    fn test_set_text_is_escaped() {
        let mut page = PageSurface::new();
        page.set_text(ElementId::ErrorMessage, "<oops>");
        assert_eq!(page.html(ElementId::ErrorMessage), "&lt;oops&gt;");
    }

    #[test]
    fn test_missing_elements_are_noops() {
        let mut page = PageSurface::without(&[ElementId::WarningMessage, ElementId::DiffContent]);
        page.set_text(ElementId::WarningMessage, "ignored");
        page.set_hidden(ElementId::WarningMessage, false);
        page.scroll_row_into_view(3);
        assert!(page.element(ElementId::WarningMessage).is_none());
        assert_eq!(page.html(ElementId::WarningMessage), "");
        assert!(!page.is_visible(ElementId::WarningMessage));
        assert_eq!(page.scrolled_row(), None);
    }

    #[test]
    fn test_classes_and_attributes() {
        let mut page = PageSurface::new();
        let id = ElementId::ToggleChangesBtn;
        page.set_class(id, "active-toggle", true);
        page.set_class(id, "active-toggle", true);
        page.set_attribute(id, "aria-pressed", "true");
        page.set_attribute(id, "aria-pressed", "false");

        let element = page.element(id).unwrap();
        assert_eq!(element.classes, vec!["active-toggle".to_string()]);
        assert_eq!(element.attribute("aria-pressed"), Some("false"));

        page.set_class(id, "active-toggle", false);
        assert!(!page.element(id).unwrap().has_class("active-toggle"));
    }

    #[test]
    fn test_set_options_replaces_list() {
        let mut page = PageSurface::without(&[ElementId::ArchiveYear]);
        let days: Vec<String> = (1..=31).map(|d| format!("{:02}", d)).collect();
        page.set_options(ElementId::ArchiveDay, &days);
        page.set_options(ElementId::ArchiveDay, &days[..28]);
        page.set_options(ElementId::ArchiveYear, &days);

        let day = page.element(ElementId::ArchiveDay).unwrap();
        assert_eq!(day.options.len(), 28);
        assert_eq!(day.options.last().map(String::as_str), Some("28"));
        assert!(page.element(ElementId::ArchiveYear).is_none());
    }
}
