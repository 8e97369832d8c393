//! [`Surface`] over the live DOM and the event wiring of the `wasm32` build.

use crate::client::{DiffSource, HttpDiffSource};
use crate::date_selector::DateSelector;
use crate::surface::{ElementId, Surface};
use crate::viewer::DiffViewer;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, Event, HtmlInputElement, HtmlSelectElement, KeyboardEvent, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition,
};

type SharedViewer = Rc<RefCell<DiffViewer<BrowserSurface>>>;

pub struct BrowserSurface {
    document: Document,
}

impl BrowserSurface {
    /// Binds to the current window's document, `None` outside a browser.
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.document.get_element_by_id(id.as_str())
    }

    /// Current value of an input or select element.
    pub fn value(&self, id: ElementId) -> Option<String> {
        let element = self.element(id)?;
        if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            Some(select.value())
        } else {
            element.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::value)
        }
    }
}

impl Surface for BrowserSurface {
    fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(element) = self.element(id) {
            element.set_text_content(Some(text));
        }
    }

    fn set_html(&mut self, id: ElementId, html: &str) {
        if let Some(element) = self.element(id) {
            element.set_inner_html(html);
        }
    }

    fn set_value(&mut self, id: ElementId, value: &str) {
        let Some(element) = self.element(id) else {
            return;
        };
        if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn set_options(&mut self, id: ElementId, options: &[String]) {
        let Some(element) = self.element(id) else {
            return;
        };
        element.set_inner_html("");
        for value in options {
            if let Ok(option) = self.document.create_element("option") {
                let _ = option.set_attribute("value", value);
                option.set_text_content(Some(value));
                let _ = element.append_child(&option);
            }
        }
    }

    fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        self.set_class(id, "hidden", hidden);
    }

    fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(element) = self.element(id) {
            let _ = element.set_attribute(name, value);
        }
    }

    fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if let Some(element) = self.element(id) {
            let _ = if disabled {
                element.set_attribute("disabled", "")
            } else {
                element.remove_attribute("disabled")
            };
        }
    }

    fn set_class(&mut self, id: ElementId, class: &str, enabled: bool) {
        if let Some(element) = self.element(id) {
            let _ = element.class_list().toggle_with_force(class, enabled);
        }
    }

    fn scroll_row_into_view(&mut self, row: usize) {
        let selector = format!("#{} .diff-row[data-row=\"{}\"]", ElementId::DiffContent.as_str(), row);
        if let Ok(Some(element)) = self.document.query_selector(&selector) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Center);
            element.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }
}

/// Binds the viewer to the page and registers its event handlers.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is unavailable"))?;
    let surface =
        BrowserSurface::new().ok_or_else(|| JsValue::from_str("document is unavailable"))?;
    let document = surface.document.clone();
    // The diff service is served from the same origin as the page.
    let source = Rc::new(HttpDiffSource::new(window.location().origin()?));
    let viewer: SharedViewer = Rc::new(RefCell::new(DiffViewer::new(surface, DateSelector::new())));

    {
        let viewer = viewer.clone();
        listen(&document, ElementId::DiffForm, "submit", move |event: Event| {
            event.prevent_default();
            submit(&viewer, &source);
        })?;
    }
    {
        let viewer = viewer.clone();
        listen(&document, ElementId::ToggleChangesBtn, "click", move |_: Event| {
            if let Ok(mut viewer) = viewer.try_borrow_mut() {
                viewer.toggle_changes();
            }
        })?;
    }
    {
        let viewer = viewer.clone();
        listen(&document, ElementId::SearchBtn, "click", move |_: Event| search(&viewer))?;
    }
    {
        let viewer = viewer.clone();
        listen(&document, ElementId::SearchInput, "keydown", move |event: Event| {
            let enter = event.dyn_ref::<KeyboardEvent>().is_some_and(|key| key.key() == "Enter");
            if enter {
                event.prevent_default();
                search(&viewer);
            }
        })?;
    }
    for id in [ElementId::ArchiveYear, ElementId::ArchiveMonth, ElementId::ArchiveDay] {
        let viewer = viewer.clone();
        listen(&document, id, "change", move |_: Event| select_date_part(&viewer, id))?;
    }
    Ok(())
}

/// Attaches `handler` to the element's `event`; absent elements are skipped.
fn listen<F>(document: &Document, id: ElementId, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let Some(element) = document.get_element_by_id(id.as_str()) else {
        return Ok(());
    };
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    element.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn submit(viewer: &SharedViewer, source: &Rc<HttpDiffSource>) {
    let Ok(mut state) = viewer.try_borrow_mut() else {
        return;
    };
    let url = state.surface().value(ElementId::Url).unwrap_or_default();
    let Ok(pending) = state.begin_submit(&url) else {
        return;
    };
    drop(state);

    let viewer = viewer.clone();
    let source = source.clone();
    spawn_local(async move {
        let outcome = source.generate_diff(&pending.request).await;
        let result = viewer.borrow_mut().complete(&pending, outcome);
        if let Err(err) = result {
            debug!(error = %err, "diff request failed");
        }
    });
}

fn search(viewer: &SharedViewer) {
    let Ok(mut state) = viewer.try_borrow_mut() else {
        return;
    };
    let query = state.surface().value(ElementId::SearchInput).unwrap_or_default();
    if let Err(err) = state.search(&query) {
        debug!(error = %err, "search failed");
    }
}

fn select_date_part(viewer: &SharedViewer, id: ElementId) {
    let Ok(mut state) = viewer.try_borrow_mut() else {
        return;
    };
    let value = state.surface().value(id).unwrap_or_default();
    let result = match id {
        ElementId::ArchiveYear => value.parse().map(|year| state.select_year(year)),
        ElementId::ArchiveMonth => value.parse().map(|month| state.select_month(month)),
        _ => value.parse().map(|day| state.select_day(day)),
    };
    match result {
        Ok(Ok(update)) => debug!(timestamp = %update.timestamp, "archive date selected"),
        Ok(Err(err)) => debug!(error = %err, "date selection rejected"),
        Err(err) => debug!(error = %err, value = %value, "unreadable date selection"),
    }
}
