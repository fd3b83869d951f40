use ratatui::layout::{Constraint, Direction, Layout, Rect};

const BUTTON_WIDTH: u16 = 40;
const BUTTON_HEIGHT: u16 = 5;

#[derive(Debug, Clone, Copy)]
pub struct UiLayout {
    pub status: Rect,
    pub content: Rect,
    pub keys: Rect,
}

pub fn ui_layout(area: Rect) -> UiLayout {
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(BUTTON_HEIGHT),
            Constraint::Length(3),
        ])
        .split(area);

    UiLayout {
        status: areas[0],
        content: areas[1],
        keys: areas[2],
    }
}

/// Where the button is drawn inside the whole terminal area.
pub fn button_area(area: Rect) -> Rect {
    let content = ui_layout(area).content;
    centered_rect(BUTTON_WIDTH, BUTTON_HEIGHT, content)
}

pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub(crate) fn contains_point(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}
