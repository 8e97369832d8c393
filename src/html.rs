/*!
HTML escaping and the content-cell model.

A [`Cell`] keeps its text as typed segments instead of a markup string, so
search highlights can be added and removed without re-parsing HTML. Markup
is produced only by [`Cell::inner_html`], which escapes every piece of text.
*/

use std::ops::Range;

/// Escapes text for insertion into HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Styling applied to a run of text inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Added,
    Removed,
}

impl Tone {
    pub fn class(&self) -> Option<&'static str> {
        match self {
            Tone::Plain => None,
            Tone::Added => Some("diff-add"),
            Tone::Removed => Some("diff-remove"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub tone: Tone,
    pub text: String,
}

/// Content of one side of a diff row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    segments: Vec<Segment>,
    aria_label: Option<String>,
    /// Byte ranges into [`Cell::text`], sorted and disjoint
    highlights: Vec<Range<usize>>,
}

impl Cell {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn plain(text: &str) -> Self {
        let mut cell = Self::default();
        cell.push(Tone::Plain, text);
        cell
    }

    pub fn toned(tone: Tone, text: &str) -> Self {
        let mut cell = Self::default();
        cell.push(tone, text);
        cell
    }

    /// Appends a run of text. Adjacent runs with the same tone are merged.
    pub fn push(&mut self, tone: Tone, text: &str) {
        if let Some(last) = self.segments.last_mut()
            && last.tone == tone
        {
            last.text.push_str(text);
            return;
        }
        self.segments.push(Segment { tone, text: text.to_string() });
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn aria_label(&self) -> Option<&str> {
        self.aria_label.as_deref()
    }

    /// Display text, i.e. what a browser reports as `textContent`.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn highlights(&self) -> &[Range<usize>] {
        &self.highlights
    }

    pub fn set_highlights(&mut self, highlights: Vec<Range<usize>>) {
        self.highlights = highlights;
    }

    pub fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        let mut offset = 0;
        for segment in &self.segments {
            match segment.tone.class() {
                Some(class) => {
                    out.push_str(&format!("<span class=\"{}\">", class));
                    self.write_text(&mut out, &segment.text, offset);
                    out.push_str("</span>");
                }
                None => self.write_text(&mut out, &segment.text, offset),
            }
            offset += segment.text.len();
        }
        out
    }

    fn write_text(&self, out: &mut String, text: &str, start: usize) {
        let end = start + text.len();
        let mut cursor = start;
        for range in &self.highlights {
            if range.end <= cursor || range.start >= end {
                continue;
            }
            let from = range.start.max(cursor);
            let to = range.end.min(end);
            if from > cursor {
                out.push_str(&escape_html(&text[cursor - start..from - start]));
            }
            out.push_str("<span class=\"search-highlight\">");
            out.push_str(&escape_html(&text[from - start..to - start]));
            out.push_str("</span>");
            cursor = to;
        }
        if cursor < end {
            out.push_str(&escape_html(&text[cursor - start..]));
        }
    }
}
