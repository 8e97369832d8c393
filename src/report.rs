/*!
Standalone HTML report of a viewer page.

The report is the in-memory page serialised with the viewer stylesheet, so a
diff can be kept or shared without the diff service.
*/

use crate::html::escape_html;
use crate::surface::{ElementId, PageSurface};

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        :root {
            --bg: #0d0d0d;
            --surface: #161616;
            --border: #2a2a2a;
            --text: #ededed;
            --text-muted: #888;
            --accent: #00d4aa;
            --danger: #ff4444;
            --warning: #ffaa00;
        }
        body { font-family: 'Inter', -apple-system, sans-serif; background: var(--bg); color: var(--text); line-height: 1.5; padding: 1.5rem; }
        a { color: var(--accent); }
        h1 { font-size: 1.25rem; font-weight: 600; color: var(--accent); margin-bottom: 1rem; }
        .hidden { display: none; }
        .panel { background: var(--surface); border: 1px solid var(--border); border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }
        .warning-message { color: var(--warning); border-color: var(--warning); }
        .error-message { color: var(--danger); border-color: var(--danger); }
        .date-note { color: var(--text-muted); font-size: 0.85rem; }
        .key-changes { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
        .key-changes ul { padding-left: 1.25rem; font-size: 0.85rem; }
        .diff-header, .diff-row { display: grid; grid-template-columns: 3.5rem 1fr 3.5rem 1fr; }
        .diff-header { font-weight: 600; border-bottom: 1px solid var(--border); padding-bottom: 0.5rem; }
        .diff-header div:nth-child(odd) { grid-column: span 2; }
        .diff-content { font-family: 'JetBrains Mono', monospace; font-size: 0.85rem; }
        .diff-row { border-bottom: 1px solid var(--border); }
        .line-number { color: var(--text-muted); text-align: right; padding: 0.1rem 0.5rem; user-select: none; }
        .content { white-space: pre-wrap; word-break: break-word; padding: 0.1rem 0.5rem; }
        .diff-add { background: rgba(0, 255, 136, 0.15); color: #4ade80; }
        .diff-remove { background: rgba(255, 68, 68, 0.15); color: #ff6b6b; text-decoration: line-through; }
        .search-highlight { background: var(--warning); color: #000; }
        .highlight-row { outline: 1px solid var(--warning); }
        .full-width-message { padding: 2rem; text-align: center; }
        .no-changes { color: var(--text-muted); }
"#;

fn hidden_class(page: &PageSurface, id: ElementId) -> &'static str {
    if page.is_visible(id) { "" } else { " hidden" }
}

/// Serialises the page into a complete HTML document.
pub fn render_report(page: &PageSurface, title: &str) -> String {
    let mut body = String::new();

    body.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    body.push_str(&format!(
        "<div id=\"warningMessage\" class=\"panel warning-message{}\" role=\"alert\">{}</div>\n",
        hidden_class(page, ElementId::WarningMessage),
        page.html(ElementId::WarningMessage)
    ));
    body.push_str(&format!(
        "<div id=\"errorMessage\" class=\"panel error-message{}\" role=\"alert\">{}</div>\n",
        hidden_class(page, ElementId::ErrorMessage),
        page.html(ElementId::ErrorMessage)
    ));
    body.push_str(&format!(
        "<div id=\"diffResults\" class=\"{}\">\n",
        hidden_class(page, ElementId::DiffResults).trim()
    ));
    body.push_str(&format!(
        "<div id=\"diffInfo\" class=\"panel\">{}<p id=\"changeStats\">{}</p></div>\n",
        page.html(ElementId::DiffInfo),
        page.html(ElementId::ChangeStats)
    ));
    body.push_str(&format!(
        "<div class=\"panel key-changes\">\
         <div><h3>Key additions</h3><ul id=\"keyAdditions\">{}</ul></div>\
         <div><h3>Key removals</h3><ul id=\"keyRemovals\">{}</ul></div></div>\n",
        page.html(ElementId::KeyAdditions),
        page.html(ElementId::KeyRemovals)
    ));
    body.push_str(&format!(
        "<div class=\"panel\" role=\"table\">\
         <div class=\"diff-header\" role=\"row\">\
         <div id=\"oldVersionHeader\" role=\"columnheader\">{}</div>\
         <div id=\"newVersionHeader\" role=\"columnheader\">{}</div></div>\
         <div id=\"diffContent\" class=\"diff-content\">{}</div></div>\n",
        page.html(ElementId::OldVersionHeader),
        page.html(ElementId::NewVersionHeader),
        page.html(ElementId::DiffContent)
    ));
    body.push_str("</div>\n");

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;

    #[test]
    fn test_report_contains_page_content() {
        let mut page = PageSurface::new();
        page.set_html(ElementId::DiffContent, "<div class=\"diff-row\"></div>");
        page.set_text(ElementId::OldVersionHeader, "Archived Version (01-01-2025)");
        page.set_hidden(ElementId::DiffResults, false);

        let report = render_report(&page, "Diff <example.com>");
        assert!(report.starts_with("<!DOCTYPE html>"));
        assert!(report.contains("<title>Diff &lt;example.com&gt;</title>"));
        assert!(report.contains("<div id=\"diffContent\" class=\"diff-content\"><div class=\"diff-row\"></div></div>"));
        assert!(report.contains("Archived Version (01-01-2025)"));
        assert!(report.contains("<div id=\"diffResults\" class=\"\">"));
        assert!(report.contains("class=\"panel warning-message hidden\""));
    }

    #[test]
    fn test_report_shows_error() {
        let mut page = PageSurface::new();
        page.set_text(ElementId::ErrorMessage, "Failed to generate diff");
        page.set_hidden(ElementId::ErrorMessage, false);

        let report = render_report(&page, "Diff");
        assert!(report.contains("class=\"panel error-message\" role=\"alert\">Failed to generate diff</div>"));
        assert!(report.contains("<div id=\"diffResults\" class=\"hidden\">"));
    }
}
