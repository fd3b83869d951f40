use chrono::{DateTime, Utc};
use ratatui::style::Color;

use super::model::ButtonModel;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Parses `#RRGGBB`; anything else falls back to the terminal's default.
pub fn parse_hex_color(raw: &str) -> Color {
    let Some(hex) = raw.strip_prefix('#') else {
        return Color::Reset;
    };
    if hex.len() != 6 {
        return Color::Reset;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize]
}

pub fn build_status_line(model: &ButtonModel, now: DateTime<Utc>) -> String {
    let mut parts = vec![model.status_line.clone()];

    if let Some(started) = model.poll_started_at {
        let elapsed = (now - started).num_seconds().max(0);
        parts.push(format!("t={elapsed}s"));
    }

    match model.cars_available {
        Some(true) => parts.push("cars=available".to_string()),
        Some(false) => parts.push("cars=unknown".to_string()),
        None => {}
    }

    if let Some(finished) = model.last_finished_at {
        parts.push(format!("last={}", finished.format("%H:%M:%S")));
    }

    parts.push(format!("fail={}", model.failure_count));
    parts.join(" | ")
}

pub(crate) fn keys_line(alert_visible: bool) -> &'static str {
    if alert_visible {
        "any key: dismiss"
    } else {
        "Enter/Space/click: press button | q: quit | Esc Esc: quit"
    }
}
