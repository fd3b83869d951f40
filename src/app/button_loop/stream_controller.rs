use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::{
    ports::ClockPort,
    ui::tui::{parse_input, parse_mouse_input, ButtonModel, InputCommand},
};

const ESC_DOUBLE_PRESS_WINDOW_MS: i64 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LoopControl {
    Continue,
    Activate,
    Redraw,
    Quit,
}

pub(super) fn handle_stream_event<K>(
    maybe_event: Option<Result<Event, std::io::Error>>,
    model: &mut ButtonModel,
    clock: &K,
    terminal_area: Rect,
) -> LoopControl
where
    K: ClockPort,
{
    match maybe_event {
        Some(Ok(Event::Key(key))) => {
            let cmd = parse_input(key);
            if model.alert_visible() && cmd != InputCommand::None {
                model.dismiss_alert();
                return LoopControl::Redraw;
            }
            if cmd != InputCommand::EscapePressed && cmd != InputCommand::None {
                model.esc_armed_until = None;
            }

            match cmd {
                InputCommand::Activate => LoopControl::Activate,
                InputCommand::Quit => LoopControl::Quit,
                InputCommand::EscapePressed => {
                    let now = clock.now();
                    if model
                        .esc_armed_until
                        .is_some_and(|armed_until| now <= armed_until)
                    {
                        LoopControl::Quit
                    } else {
                        model.esc_armed_until =
                            Some(now + chrono::Duration::milliseconds(ESC_DOUBLE_PRESS_WINDOW_MS));
                        model.status_line = "press Esc again to quit (1.5s)".to_string();
                        LoopControl::Redraw
                    }
                }
                InputCommand::None => LoopControl::Continue,
            }
        }
        Some(Ok(Event::Mouse(mouse))) => {
            if model.alert_visible() {
                return LoopControl::Continue;
            }
            match parse_mouse_input(mouse, terminal_area) {
                InputCommand::Activate => LoopControl::Activate,
                _ => LoopControl::Continue,
            }
        }
        Some(Ok(Event::Resize(_, _))) => LoopControl::Redraw,
        Some(Ok(_)) => LoopControl::Continue,
        Some(Err(err)) => {
            tracing::warn!(error = %err, "input stream failed");

            model.failure_count += 1;
            model.status_line = format!("input stream failed: {err}");
            LoopControl::Redraw
        }
        None => LoopControl::Quit,
    }
}
