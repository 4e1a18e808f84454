//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Top-level screens
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Screen {
    #[default]
    Auth,
    Main,
}

/// Tabs of the main screen
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AppTab {
    #[default]
    Dashboard,
    Accounts,
    Transactions,
    Reports,
}

/// Login/register mode of the auth form
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Tab navigation
    SwitchTab(AppTab),

    // List navigation
    NextItem,
    PrevItem,
    ScrollUp,
    ScrollDown,

    // Data actions
    Refresh,
    OpenCreateForm,
    OpenEditForm,
    DeleteSelected,

    // Forms (auth, account and transaction forms share these)
    FormChar(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormLeft,
    FormRight,
    FormSubmit,
    FormCancel,
    ToggleAuthMode,

    // Ledger filters (Form* events drive the search box while it is open)
    CycleTypeFilter,
    StartSearch,
    ClearSearch,

    // Session
    Logout,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    screen: Screen,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match screen {
        Screen::Auth => handle_auth_keys(key),
        Screen::Main => match input_mode {
            InputMode::Normal => handle_main_keys(key),
            InputMode::Editing => handle_editing_keys(key),
        },
    }
}

/// The auth screen is always editing its form
fn handle_auth_keys(key: KeyEvent) -> Option<UiEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('t') = key.code {
            return Some(UiEvent::ToggleAuthMode);
        }
    }

    match key.code {
        KeyCode::Esc => Some(UiEvent::Quit),
        KeyCode::Enter => Some(UiEvent::FormSubmit),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::FormNextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::FormPrevField),
        KeyCode::Backspace => Some(UiEvent::FormBackspace),
        KeyCode::Char(c) => Some(UiEvent::FormChar(c)),
        _ => None,
    }
}

/// Normal-mode keys on the main screen
fn handle_main_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('1') => Some(UiEvent::SwitchTab(AppTab::Dashboard)),
        KeyCode::Char('2') => Some(UiEvent::SwitchTab(AppTab::Accounts)),
        KeyCode::Char('3') => Some(UiEvent::SwitchTab(AppTab::Transactions)),
        KeyCode::Char('4') => Some(UiEvent::SwitchTab(AppTab::Reports)),
        KeyCode::Up => Some(UiEvent::PrevItem),
        KeyCode::Down => Some(UiEvent::NextItem),
        KeyCode::PageUp => Some(UiEvent::ScrollUp),
        KeyCode::PageDown => Some(UiEvent::ScrollDown),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        KeyCode::Char('n') => Some(UiEvent::OpenCreateForm),
        KeyCode::Char('e') => Some(UiEvent::OpenEditForm),
        KeyCode::Char('d') => Some(UiEvent::DeleteSelected),
        KeyCode::Char('f') => Some(UiEvent::CycleTypeFilter),
        KeyCode::Char('/') => Some(UiEvent::StartSearch),
        KeyCode::Char('c') => Some(UiEvent::ClearSearch),
        KeyCode::Char('x') => Some(UiEvent::Logout),
        _ => None,
    }
}

/// Editing-mode keys: an open form or the search box owns the keyboard
fn handle_editing_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::FormCancel),
        KeyCode::Enter => Some(UiEvent::FormSubmit),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::FormNextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::FormPrevField),
        KeyCode::Left => Some(UiEvent::FormLeft),
        KeyCode::Right => Some(UiEvent::FormRight),
        KeyCode::Backspace => Some(UiEvent::FormBackspace),
        KeyCode::Char(c) => Some(UiEvent::FormChar(c)),
        _ => None,
    }
}
