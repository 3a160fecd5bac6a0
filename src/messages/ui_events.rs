//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Browser panes
    FocusNext,
    SidebarUp,
    SidebarDown,
    SidebarActivate,
    ScrollUp,
    ScrollDown,
    NextResponseTab,
    PrevResponseTab,
    CycleSnippetLanguage,

    // Go-to prompt (fragment entry)
    OpenGoto,
    GotoChar(char),
    GotoBackspace,
    GotoSubmit,
    GotoCancel,

    // Test dialog
    OpenTestDialog,
    CloseTestDialog,
    DialogNextTab,
    DialogPrevTab,
    NextField,
    PrevField,
    SendRequest,
    ResponseScrollUp,
    ResponseScrollDown,

    // Input editing
    StartEditing,
    StartEditingKey,
    StopEditing,
    CharInput(char),
    Newline,
    Backspace,
    CursorLeft,
    CursorRight,

    // Headers
    ToggleHeader,
    AddHeader,
    DeleteHeader,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Browser pane holding keyboard focus
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Focus {
    #[default]
    Sidebar,
    Detail,
}

impl Focus {
    pub fn next(&self) -> Focus {
        match self {
            Focus::Sidebar => Focus::Detail,
            Focus::Detail => Focus::Sidebar,
        }
    }
}

/// Test dialog tabs
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DialogTab {
    #[default]
    Headers,
    Parameters,
    Query,
    Body,
}

impl DialogTab {
    pub fn title(&self) -> &'static str {
        match self {
            DialogTab::Headers => "Headers",
            DialogTab::Parameters => "Parameters",
            DialogTab::Query => "Query",
            DialogTab::Body => "Body",
        }
    }

    /// Tabs offered for a method; GET has no body tab
    pub fn available(sends_body: bool) -> &'static [DialogTab] {
        static WITH_BODY: [DialogTab; 4] = [DialogTab::Headers, DialogTab::Parameters, DialogTab::Query, DialogTab::Body];
        if sends_body {
            &WITH_BODY
        } else {
            &WITH_BODY[..3]
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// The slice of UI state key mapping depends on
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyContext {
    pub focus: Focus,
    pub dialog_tab: Option<DialogTab>,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub goto_open: bool,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if ctx.show_help {
        return Some(UiEvent::CloseHelp);
    }

    if ctx.goto_open {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::GotoCancel),
            KeyCode::Enter => Some(UiEvent::GotoSubmit),
            KeyCode::Backspace => Some(UiEvent::GotoBackspace),
            KeyCode::Char(c) => Some(UiEvent::GotoChar(c)),
            _ => None,
        };
    }

    match ctx.dialog_tab {
        Some(tab) => handle_dialog_keys(key, tab, ctx.input_mode),
        None => handle_browser_keys(key, ctx.focus),
    }
}

/// Keys for the sidebar and detail panes
fn handle_browser_keys(key: KeyEvent, focus: Focus) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Tab | KeyCode::BackTab => Some(UiEvent::FocusNext),
        KeyCode::Char('g') | KeyCode::Char('#') => Some(UiEvent::OpenGoto),
        KeyCode::Char('t') => Some(UiEvent::OpenTestDialog),
        KeyCode::Char('l') => Some(UiEvent::CycleSnippetLanguage),
        KeyCode::Char(']') => Some(UiEvent::NextResponseTab),
        KeyCode::Char('[') => Some(UiEvent::PrevResponseTab),
        KeyCode::Up | KeyCode::Char('k') => match focus {
            Focus::Sidebar => Some(UiEvent::SidebarUp),
            Focus::Detail => Some(UiEvent::ScrollUp),
        },
        KeyCode::Down | KeyCode::Char('j') => match focus {
            Focus::Sidebar => Some(UiEvent::SidebarDown),
            Focus::Detail => Some(UiEvent::ScrollDown),
        },
        KeyCode::Enter | KeyCode::Char(' ') => match focus {
            Focus::Sidebar => Some(UiEvent::SidebarActivate),
            Focus::Detail => Some(UiEvent::OpenTestDialog),
        },
        _ => None,
    }
}

/// Keys while the test dialog is open
fn handle_dialog_keys(key: KeyEvent, tab: DialogTab, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(UiEvent::CloseTestDialog),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Tab => Some(UiEvent::DialogNextTab),
            KeyCode::BackTab => Some(UiEvent::DialogPrevTab),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevField),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextField),
            KeyCode::PageUp => Some(UiEvent::ResponseScrollUp),
            KeyCode::PageDown => Some(UiEvent::ResponseScrollDown),
            KeyCode::Char('s') => Some(UiEvent::SendRequest),
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
            KeyCode::Char('n') if tab == DialogTab::Headers => Some(UiEvent::StartEditingKey),
            KeyCode::Char(' ') if tab == DialogTab::Headers => Some(UiEvent::ToggleHeader),
            KeyCode::Char('a') if tab == DialogTab::Headers => Some(UiEvent::AddHeader),
            KeyCode::Char('d') if tab == DialogTab::Headers => Some(UiEvent::DeleteHeader),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Enter if tab == DialogTab::Body => Some(UiEvent::Newline),
            KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}
