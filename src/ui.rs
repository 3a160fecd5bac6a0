use ratatui::{prelude::*, widgets::*};

use crate::models::HttpMethod;

/// One row of an editable key/value list (headers, parameters)
pub struct FieldRow<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub enabled: bool,
}

/// Renders a key-value list with an optional checkbox column
pub fn render_field_list<'a>(
    rows: &[FieldRow<'a>],
    title: &'a str,
    selected: Option<usize>,
    checkboxes: bool,
) -> List<'a> {
    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if !row.enabled {
                Style::default().fg(Color::DarkGray)
            } else if Some(i) == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default()
            };

            let value = if row.value.is_empty() { "<empty>" } else { row.value };
            let text = if checkboxes {
                let prefix = if row.enabled { "[x]" } else { "[ ]" };
                format!("{} {}: {}", prefix, row.key, value)
            } else {
                format!("{}: {}", row.key, value)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    List::new(items).block(Block::default().borders(Borders::ALL).title(title))
}

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Simple JSON syntax highlighting, one `Line` per input line
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    text.lines().map(highlight_json_line).collect()
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '"' | '{' | '}' | '[' | ']' | ',' | ':') || c.is_whitespace()
}

/// Byte length of the string literal at the start of `s`, closing quote included
fn string_len(s: &str) -> usize {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return i + 1,
            _ => escaped = false,
        }
    }
    s.len()
}

fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        let run_end = rest
            .char_indices()
            .skip(1)
            .find(|(_, ch)| is_delimiter(*ch))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        let (len, style) = match c {
            '"' => {
                let len = string_len(rest);
                let is_key = rest[len..].trim_start().starts_with(':');
                let color = if is_key { Color::Cyan } else { Color::Green };
                (len, Style::default().fg(color))
            }
            '{' | '}' | '[' | ']' => (1, Style::default().fg(Color::Yellow)),
            '-' | '0'..='9' => (run_end, Style::default().fg(Color::Yellow)),
            _ if matches!(&rest[..run_end], "true" | "false" | "null") => {
                (run_end, Style::default().fg(Color::Magenta))
            }
            _ if is_delimiter(c) => (c.len_utf8(), Style::default()),
            _ => (run_end, Style::default()),
        };

        spans.push(Span::styled(rest[..len].to_string(), style));
        rest = &rest[len..];
    }

    Line::from(spans)
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: HttpMethod) -> Color {
    match method {
        HttpMethod::GET => Color::Green,
        HttpMethod::POST => Color::Yellow,
        HttpMethod::PUT => Color::Blue,
        HttpMethod::PATCH => Color::Cyan,
        HttpMethod::DELETE => Color::Red,
        _ => Color::White,
    }
}

/// Rect of the given percentage size centered in `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
