use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::QuickPick => map_key_quick_pick(key),
            }
        }
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::MoveDown,
        MouseEventKind::ScrollUp => Action::MoveUp,
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => Action::NextPage,
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => Action::PrevPage,
        KeyCode::Char('[') => Action::FirstPage,
        KeyCode::Char(']') => Action::LastPage,
        KeyCode::Char('z') => Action::CyclePageSize,
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Reload,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::ScrollDown,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::ScrollUp,
        KeyCode::Char(' ') => Action::ToggleRow,
        KeyCode::Char('a') => Action::ToggleAllVisible,
        KeyCode::Char('p') | KeyCode::Char('n') => Action::OpenQuickPick,
        KeyCode::Char('s') => Action::CycleSort,
        KeyCode::Char('S') => Action::ReverseSort,
        KeyCode::Tab => Action::ToggleSelectionPanel,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::NavigateBack,
        _ => Action::None,
    }
}

fn map_key_quick_pick(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::TextCancel,
        KeyCode::Enter => Action::TextConfirm,
        KeyCode::Backspace => Action::TextBackspace,
        KeyCode::Char(c) => Action::TextInput(c),
        _ => Action::None,
    }
}
