/*!
Terminal output helpers for the wayback-diff command line tool.

This module provides the header banner, the loading spinner, the statistics
table and the two-column terminal rendering of diff rows.
*/

use crate::html::{Cell, Tone};
use crate::model::DiffResponse;
use crate::render::{DiffRow, RenderedDiff};
use chrono::NaiveDate;
use colored::*;
use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct StatsDisplay {
    #[tabled(rename = "Additions")]
    added: u32,
    #[tabled(rename = "Removals")]
    removed: u32,
    #[tabled(rename = "Changes")]
    changed: u32,
    #[tabled(rename = "Identical")]
    identical: String,
}

/// Prints a formatted header with decorative borders.
///
/// Displays a stylized header with horizontal lines matching the terminal width.
///
/// # Arguments
///
/// * `text` - The header text to display
pub fn print_header(text: &str) {
    let term = Term::stdout();
    let (_, width) = term.size();
    let width = width as usize;
    println!("\n{}", "═".repeat(width).bright_blue());
    println!("{}", style(text).cyan().bold());
    println!("{}\n", "═".repeat(width).bright_blue());
}

/// Creates the spinner shown while the diff service works.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Host part of a URL: what follows `//` up to the next `/`.
pub fn domain_of(url: &str) -> &str {
    let rest = url.rsplit("//").next().unwrap_or(url);
    rest.split('/').next().unwrap_or(rest)
}

/// Default report file name, e.g. `diff_example.com_20250101_20261016.html`.
///
/// # Arguments
///
/// * `url` - Compared page
/// * `timestamp` - Archive timestamp (`YYYYMMDD`)
/// * `today` - Date of the comparison
pub fn report_filename(url: &str, timestamp: &str, today: NaiveDate) -> String {
    let domain: String = domain_of(url)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!("diff_{}_{}_{}.html", domain, timestamp, today.format("%Y%m%d"))
}

/// Prints the comparison summary and the change counters table.
pub fn print_summary(response: &DiffResponse) {
    println!(
        "{} {} {} {}",
        style("Comparing").green(),
        style(&response.archived_date).cyan(),
        style("with").green(),
        style(&response.current_date).cyan()
    );
    println!("{} {}", style("URL:").green(), style(&response.url).cyan());
    if let Some(note) = &response.date_note {
        println!("{}", style(note).dim());
    }
    if let Some(warning) = &response.warning {
        println!("{}", style(warning).yellow());
    }

    let stats = &response.stats;
    let table = Table::new([StatsDisplay {
        added: stats.added_lines,
        removed: stats.removed_lines,
        changed: stats.changed_lines,
        identical: if stats.is_identical { "yes" } else { "no" }.to_string(),
    }])
    .with(Style::rounded())
    .to_string();
    println!("{}", table);
}

/// Prints the key additions and removals lists.
pub fn print_significant(response: &DiffResponse) {
    if !response.significant_added.is_empty() {
        println!("\n{}", style("Key additions").green().bold());
        for item in &response.significant_added {
            println!("  {} {}", "+".green(), item);
        }
    }
    if !response.significant_removed.is_empty() {
        println!("\n{}", style("Key removals").red().bold());
        for item in &response.significant_removed {
            println!("  {} {}", "-".red(), item);
        }
    }
}

/// Prints rendered rows, or the placeholder message.
pub fn print_rendered(rendered: &RenderedDiff) {
    if let Some(placeholder) = rendered.placeholder() {
        println!("\n{}", style(placeholder.message()).yellow());
        return;
    }
    println!();
    for row in rendered.rows() {
        println!("{}", terminal_row(row));
    }
}

fn terminal_row(row: &DiffRow) -> String {
    let marker = if row.highlighted { "▶".yellow().to_string() } else { " ".to_string() };
    let line = |n: Option<u32>| match n {
        Some(n) => format!("{:>5}", n).dimmed().to_string(),
        None => "     ".to_string(),
    };
    format!(
        "{}{} {}  {} {}",
        marker,
        line(row.old_line),
        terminal_cell(&row.old),
        line(row.new_line),
        terminal_cell(&row.new)
    )
}

/// Colours each segment by tone and inverts search matches.
fn terminal_cell(cell: &Cell) -> String {
    let mut out = String::new();
    let mut offset = 0;
    for segment in cell.segments() {
        let end = offset + segment.text.len();
        let mut cursor = offset;
        for range in cell.highlights() {
            if range.end <= cursor || range.start >= end {
                continue;
            }
            let from = range.start.max(cursor);
            let to = range.end.min(end);
            if from > cursor {
                out.push_str(&paint(segment.tone, &segment.text[cursor - offset..from - offset]));
            }
            out.push_str(&segment.text[from - offset..to - offset].black().on_yellow().to_string());
            cursor = to;
        }
        if cursor < end {
            out.push_str(&paint(segment.tone, &segment.text[cursor - offset..]));
        }
        offset = end;
    }
    out
}

fn paint(tone: Tone, text: &str) -> String {
    match tone {
        Tone::Plain => text.to_string(),
        Tone::Added => text.green().to_string(),
        Tone::Removed => text.red().to_string(),
    }
}
