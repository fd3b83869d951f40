use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Screen state around the button. The button's own state lives in the
/// trigger control and is handed to the renderer as props.
#[derive(Debug, Clone, Default)]
pub struct ButtonModel {
    pub status_line: String,
    pub cars_available: Option<bool>,
    pub last_body: Option<String>,
    pub poll_started_at: Option<DateTime<Utc>>,
    pub last_finished_at: Option<DateTime<Utc>>,
    pub failure_count: u64,
    pub spinner_tick: u64,
    pub esc_armed_until: Option<DateTime<Utc>>,
    alert: Option<String>,
    queued_alerts: VecDeque<String>,
}

impl ButtonModel {
    pub fn new() -> Self {
        Self {
            status_line: "starting".to_string(),
            ..Self::default()
        }
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn alert_visible(&self) -> bool {
        self.alert.is_some()
    }

    /// Shows `message` now, or after the alerts already on screen are dismissed.
    pub fn show_alert(&mut self, message: String) {
        if self.alert.is_none() {
            self.alert = Some(message);
        } else {
            self.queued_alerts.push_back(message);
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = self.queued_alerts.pop_front();
    }
}
