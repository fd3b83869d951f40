use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::layout::{button_area, contains_point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Activate,
    EscapePressed,
    Quit,
    None,
}

pub fn parse_input(key: KeyEvent) -> InputCommand {
    if key.kind != KeyEventKind::Press {
        return InputCommand::None;
    }

    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => InputCommand::Activate,
        KeyCode::Char('q') => InputCommand::Quit,
        KeyCode::Esc => InputCommand::EscapePressed,
        _ => InputCommand::None,
    }
}

pub fn parse_mouse_input(mouse: MouseEvent, terminal_area: Rect) -> InputCommand {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return InputCommand::None;
    }

    if contains_point(button_area(terminal_area), mouse.column, mouse.row) {
        InputCommand::Activate
    } else {
        InputCommand::None
    }
}
