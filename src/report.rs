//! Console summary printed before the wheel opens

use unicode_width::UnicodeWidthStr;

use crate::anime::AnimeEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Format a duration in minutes as `45m` or `6h 1m`
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.width()));
    match align {
        Align::Left => format!("{}{}", cell, fill),
        Align::Right => format!("{}{}", fill, cell),
    }
}

fn center(cell: &str, width: usize) -> String {
    let gap = width.saturating_sub(cell.width());
    let left = gap / 2;
    format!("{}{}{}", " ".repeat(left), cell, " ".repeat(gap - left))
}

fn border(widths: &[usize], left: &str, mid: &str, right: &str) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}", left, segments.join(mid), right)
}

/// Render a light box-drawing table; headers are centered
fn render_table(headers: &[&str], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(border(&widths, "┌", "┬", "┐"));

    let header_cells: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!(" {} ", center(h, w)))
        .collect();
    lines.push(format!("│{}│", header_cells.join("│")));
    lines.push(border(&widths, "├", "┼", "┤"));

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!(" {} ", pad(cell, widths[i], aligns[i])))
            .collect();
        lines.push(format!("│{}│", cells.join("│")));
    }

    lines.push(border(&widths, "└", "┴", "┘"));
    lines.join("\n")
}

/// Per-show table: progress, episode length, time left, title
pub fn entries_table(entries: &[AnimeEntry]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                format!("{} / {}", e.progress, e.episodes),
                format!("{} min", e.duration),
                format_minutes(e.minutes_left),
                e.title.clone(),
            ]
        })
        .collect();

    render_table(
        &["Progress", "Duration", "Left", "Title"],
        &rows,
        &[Align::Right, Align::Right, Align::Left, Align::Left],
    )
}

/// Totals across all shows
pub fn totals_table(entries: &[AnimeEntry]) -> String {
    let watched: u32 = entries.iter().map(|e| e.progress).sum();
    let left: u32 = entries.iter().map(|e| e.episodes_left).sum();
    let minutes: u32 = entries.iter().map(|e| e.minutes_left).sum();

    render_table(
        &["Progress", "Left"],
        &[vec![format!("{} / {}", watched, left), format_minutes(minutes)]],
        &[Align::Right, Align::Left],
    )
}

/// Print both tables to stdout
pub fn print_report(entries: &[AnimeEntry]) {
    println!("{}", entries_table(entries));
    println!("{}", totals_table(entries));
}
