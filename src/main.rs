//! apidoc - terminal API reference browser
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use apidoc_tui::app::state::TestDialog;
use apidoc_tui::constants::{APP_NAME, APP_VERSION, DEFAULT_LOG_FILE};
use apidoc_tui::document::load_document;
use apidoc_tui::messages::render::SidebarRowKind;
use apidoc_tui::messages::ui_events::{key_to_ui_event, DialogTab, Focus, InputMode};
use apidoc_tui::models::RequestOutcome;
use apidoc_tui::presenter::{EndpointView, ParameterRow, PropertyRow};
use apidoc_tui::ui::{self, centered_rect, highlight_json, method_color, status_color, FieldRow};
use apidoc_tui::{AppActor, Config, NetworkActor, NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Initialize logging to file; the returned guard flushes on drop
fn init_logging(log_file: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_file.file_name().unwrap_or(OsStr::new(DEFAULT_LOG_FILE));

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let _log_guard = init_logging(&config.log_file);

    // Fails before raw mode so the error reaches the normal terminal
    let document = load_document(&config.document)
        .with_context(|| format!("failed to load API document {}", config.document.display()))?;
    tracing::info!(
        title = %document.title(),
        endpoints = document.endpoint_count(),
        "{} {} starting",
        APP_NAME,
        APP_VERSION
    );

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(net_resp_tx, config.request_timeout());
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(Arc::new(document), config.app_settings(), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, current_state.key_context()) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, main_chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(main_chunks[1]);

    draw_sidebar(f, state, panes[0]);

    let detail = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(10)])
        .split(panes[1]);

    draw_detail(f, state, detail[0]);
    draw_snippet(f, state, detail[1]);
    draw_status_bar(f, state, main_chunks[2]);

    // Popups
    if let Some(dialog) = &state.dialog {
        draw_test_dialog(f, dialog, area);
    }

    if let Some(input) = &state.goto_input {
        draw_goto_popup(f, input, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw(" "),
        Span::styled(state.title.clone(), Style::default().bold()),
    ];
    if let Some(version) = &state.version {
        spans.push(Span::styled(format!(" v{}", version), Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::styled(format!("  {}", state.base_url), Style::default().fg(Color::DarkGray)));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_sidebar(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = state
        .sidebar_rows
        .iter()
        .map(|row| match &row.kind {
            SidebarRowKind::Section { open } => {
                let marker = if *open { "▾" } else { "▸" };
                ListItem::new(Line::from(Span::styled(
                    format!("{} {}", marker, row.label),
                    Style::default().bold(),
                )))
            }
            SidebarRowKind::Endpoint { method } => {
                let path_style = if row.active {
                    Style::default().fg(Color::White).underlined()
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("  {:7}", method.as_str()), Style::default().fg(method_color(*method)).bold()),
                    Span::styled(row.label.clone(), path_style),
                ]))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(state.focus == Focus::Sidebar))
                .title(" Endpoints "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut list_state = ListState::default();
    if !state.sidebar_rows.is_empty() {
        list_state.select(Some(state.sidebar_cursor));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn section_heading(title: &str) -> Line<'static> {
    Line::from(Span::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()))
}

fn parameter_lines(title: &str, rows: &[ParameterRow], lines: &mut Vec<Line<'static>>) {
    if rows.is_empty() {
        return;
    }
    lines.push(section_heading(title));
    for p in rows {
        let mut spans = vec![
            Span::styled(format!("  {}", p.name), Style::default().fg(Color::Cyan)),
            Span::styled(format!(" ({})", p.type_name), Style::default().fg(Color::DarkGray)),
        ];
        if p.required {
            spans.push(Span::styled(" required", Style::default().fg(Color::Red)));
        }
        spans.push(Span::raw(format!("  {}", p.description)));
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());
}

fn property_lines(rows: &[PropertyRow], lines: &mut Vec<Line<'static>>) {
    for p in rows {
        let mut spans = vec![
            Span::styled(format!("  {}", p.name), Style::default().fg(Color::Cyan)),
            Span::styled(format!(": {}", p.type_name), Style::default().fg(Color::DarkGray)),
        ];
        if p.required {
            spans.push(Span::styled(" *", Style::default().fg(Color::Red)));
        }
        if let Some(description) = &p.description {
            spans.push(Span::raw(format!("  {}", description)));
        }
        lines.push(Line::from(spans));
    }
}

fn endpoint_lines(view: &EndpointView, active_response: Option<&str>) -> Vec<Line<'static>> {
    let mut header = vec![
        Span::styled(format!("{} ", view.method), Style::default().fg(method_color(view.method)).bold()),
        Span::styled(view.path.clone(), Style::default().bold()),
    ];
    if view.deprecated {
        header.push(Span::styled("  DEPRECATED", Style::default().fg(Color::Red)));
    }

    let mut lines = vec![
        Line::from(header),
        Line::from(Span::styled(view.summary.clone(), Style::default().bold())),
        Line::from(view.description.clone()),
    ];
    if !view.tags.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Tags: {}", view.tags.join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::default());

    parameter_lines("Path Parameters", &view.path_params, &mut lines);
    parameter_lines("Query Parameters", &view.query_params, &mut lines);

    if !view.request_properties.is_empty() {
        lines.push(section_heading("Request Body"));
        property_lines(&view.request_properties, &mut lines);
        if let Some(schema) = &view.request_schema_json {
            lines.extend(highlight_json(schema));
        }
        lines.push(Line::default());
    }

    lines.push(section_heading("Responses  ([ / ] to switch)"));
    if view.responses.is_empty() {
        lines.push(Line::from("  No responses declared."));
        return lines;
    }

    let mut tabs = vec![Span::raw("  ")];
    for r in &view.responses {
        let color = r.status.parse().map(status_color).unwrap_or(Color::White);
        let style = if Some(r.status.as_str()) == active_response {
            Style::default().fg(Color::Black).bg(color).bold()
        } else {
            Style::default().fg(color)
        };
        tabs.push(Span::styled(format!(" {} ", r.status), style));
        tabs.push(Span::raw(" "));
    }
    lines.push(Line::from(tabs));

    if let Some(response) = active_response.and_then(|s| view.response(s)) {
        lines.push(Line::from(format!("  {}", response.description)));
        property_lines(&response.properties, &mut lines);
        lines.push(Line::default());
        lines.extend(highlight_json(&response.schema_json));
    }

    lines
}

fn draw_detail(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(state.focus == Focus::Detail))
        .title(" Endpoint ");

    let lines = match &state.endpoint {
        Some(view) => endpoint_lines(view, state.active_response_tab.as_deref()),
        None => vec![
            Line::from(Span::styled(state.title.clone(), Style::default().bold())),
            Line::default(),
            Line::from("Select an endpoint in the sidebar, or press g to go to a fragment."),
        ],
    };

    let detail = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.detail_scroll, 0));
    f.render_widget(detail, area);
}

fn draw_snippet(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} (l:language) ", state.snippet_language.as_str()));

    let content = state.snippet.as_deref().unwrap_or("");
    let snippet = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(snippet, area);
}

fn draw_test_dialog(f: &mut Frame, dialog: &TestDialog, area: Rect) {
    let popup_area = centered_rect(85, 85, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Try it: {} {} ", dialog.endpoint.method, dialog.endpoint.path))
        .title_style(Style::default().fg(method_color(dialog.endpoint.method)).bold())
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // URL
            Constraint::Length(1),      // Tabs
            Constraint::Percentage(40), // Fields
            Constraint::Min(3),         // Response
        ])
        .split(inner);

    let url = Line::from(vec![
        Span::styled("URL ", Style::default().fg(Color::DarkGray)),
        Span::raw(dialog.url_preview()),
    ]);
    f.render_widget(Paragraph::new(url), chunks[0]);

    let tabs = dialog.tabs();
    let titles: Vec<&str> = tabs.iter().map(|t| t.title()).collect();
    let selected = tabs.iter().position(|t| *t == dialog.active_tab).unwrap_or(0);
    f.render_widget(ui::render_tabs(&titles, selected), chunks[1]);

    draw_dialog_fields(f, dialog, chunks[2]);
    draw_dialog_response(f, dialog, chunks[3]);
}

fn draw_dialog_fields(f: &mut Frame, dialog: &TestDialog, area: Rect) {
    let editing = dialog.input_mode == InputMode::Editing;

    if dialog.active_tab == DialogTab::Body {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if editing { Style::default().fg(Color::Yellow) } else { Style::default() })
            .title(" Body (JSON) ");
        f.render_widget(Paragraph::new(dialog.draft.body.as_str()).block(block), area);

        if editing {
            let before = &dialog.draft.body[..dialog.cursor_position.min(dialog.draft.body.len())];
            let row = before.matches('\n').count() as u16;
            let col = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0) as u16;
            set_cursor(f, area, col, row);
        }
        return;
    }

    let (rows, title, checkboxes): (Vec<FieldRow>, &str, bool) = match dialog.active_tab {
        DialogTab::Headers => (
            dialog
                .draft
                .headers
                .iter()
                .map(|h| FieldRow { key: &h.key, value: &h.value, enabled: h.enabled })
                .collect(),
            " Headers (a:add d:del space:toggle n:edit name) ",
            true,
        ),
        DialogTab::Parameters => (
            dialog
                .draft
                .path_params
                .iter()
                .map(|p| FieldRow { key: &p.name, value: &p.value, enabled: true })
                .collect(),
            " Path Parameters ",
            false,
        ),
        _ => (
            dialog
                .draft
                .query_params
                .iter()
                .map(|p| FieldRow { key: &p.name, value: &p.value, enabled: true })
                .collect(),
            " Query Parameters ",
            false,
        ),
    };

    if rows.is_empty() {
        let empty = Paragraph::new("Nothing to fill in.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, area);
        return;
    }

    let cursor_prefix = rows.get(dialog.selected).map(|row| {
        let checkbox = if checkboxes { 4 } else { 0 };
        if dialog.editing_key {
            checkbox
        } else {
            checkbox + row.key.chars().count() + 2
        }
    });

    f.render_widget(ui::render_field_list(&rows, title, Some(dialog.selected), checkboxes), area);

    if editing {
        if let (Some(prefix), Some(input)) = (cursor_prefix, dialog.current_input()) {
            let col = prefix + input[..dialog.cursor_position.min(input.len())].chars().count();
            set_cursor(f, area, col as u16, dialog.selected as u16);
        }
    }
}

/// Place the cursor at `(col, row)` inside a bordered area
fn set_cursor(f: &mut Frame, area: Rect, col: u16, row: u16) {
    let max_x = area.x + area.width.saturating_sub(2);
    let max_y = area.y + area.height.saturating_sub(2);
    let x = (area.x + 1 + col).min(max_x);
    let y = (area.y + 1 + row).min(max_y);
    f.set_cursor_position(Position::new(x, y));
}

fn draw_dialog_response(f: &mut Frame, dialog: &TestDialog, area: Rect) {
    let (title, time_text) = match &dialog.outcome {
        Some(RequestOutcome::Response { status, elapsed_ms, .. }) => (
            Span::styled(format!(" {} ", status), Style::default().fg(status_color(*status)).bold()),
            format!(" {}ms ", elapsed_ms),
        ),
        Some(RequestOutcome::Failed { elapsed_ms, .. }) => (
            Span::styled(" Error ", Style::default().fg(Color::Red).bold()),
            format!(" {}ms ", elapsed_ms),
        ),
        None => (Span::raw(" Response "), String::new()),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(Line::from(time_text).right_aligned());

    let lines = if dialog.is_loading {
        vec![Line::from(Span::styled("Sending...", Style::default().fg(Color::Yellow)))]
    } else {
        match &dialog.outcome {
            Some(outcome) => highlight_json(&outcome.to_display_text()),
            None => vec![Line::from(Span::styled(
                "Press s to send the request.",
                Style::default().fg(Color::DarkGray),
            ))],
        }
    };

    let response = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((dialog.response_scroll, 0));
    f.render_widget(response, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = Vec::new();
    if let Some(fragment) = &state.fragment {
        spans.push(Span::styled(format!(" #{} ", fragment), Style::default().fg(Color::Cyan)));
    }
    if let Some(message) = &state.status_message {
        spans.push(Span::styled(format!(" {} ", message), Style::default().fg(Color::Yellow)));
    }

    let hints = match &state.dialog {
        Some(d) if d.is_loading => " Loading... | Esc:close ",
        Some(d) if d.input_mode == InputMode::Editing => " Esc:stop editing | arrows:move ",
        Some(_) => " Tab:tab | j/k:field | e:edit | s:send | PgUp/PgDn:scroll | Esc:close ",
        None => " Tab:pane | Enter:open | t:try it | g:go to | ?:help | q:quit ",
    };
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_goto_popup(f: &mut Frame, input: &str, area: Rect) {
    let popup_area = centered_rect(60, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Go to endpoint (Enter to open, Esc to cancel) ")
        .style(Style::default().bg(Color::Black));

    let content = format!("#{}", input.trim_start_matches('#'));
    let prompt = Paragraph::new(content.as_str()).block(block);

    f.render_widget(Clear, popup_area);
    f.render_widget(prompt, popup_area);
    set_cursor(f, popup_area, content.chars().count() as u16, 0);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 APIDOC - Keyboard Shortcuts

 BROWSING
   Tab                Switch sidebar / detail
   ↑ / ↓  (j / k)     Move in sidebar / scroll detail
   Enter              Open endpoint / toggle section
   [ / ]              Previous / next response
   l                  Cycle snippet language
   g or #             Go to a fragment (e.g. get-users-42)

 TRY IT
   t                  Open the request dialog
   Tab / Shift+Tab    Switch Headers / Parameters / Query / Body
   ↑ / ↓  (j / k)     Select field
   e / Enter          Edit selected value
   n                  Edit header name
   a / d / space      Add / delete / toggle header
   s                  Send request
   PgUp / PgDn        Scroll response
   Esc                Close dialog (discards the draft)

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
