mod input;
mod layout;
mod model;
mod presentation;
mod render;

pub use input::{parse_input, parse_mouse_input, InputCommand};
pub use layout::{button_area, ui_layout, UiLayout};
pub use model::ButtonModel;
pub use presentation::{build_status_line, parse_hex_color, spinner_frame};
pub use render::TerminalUi;
