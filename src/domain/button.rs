use serde::{Deserialize, Serialize};

use super::session::ControlState;

/// Static look of the control in one state. Passed to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAppearance {
    pub label: String,
    pub color: String,
    #[serde(default)]
    pub spinner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatesConfig {
    pub idle: StateAppearance,
    pub polling: StateAppearance,
}

impl StatesConfig {
    pub fn appearance(&self, state: ControlState) -> &StateAppearance {
        match state {
            ControlState::Idle => &self.idle,
            ControlState::Polling => &self.polling,
        }
    }
}

impl Default for StatesConfig {
    fn default() -> Self {
        Self {
            idle: default_idle_appearance(),
            polling: default_polling_appearance(),
        }
    }
}

pub fn default_idle_appearance() -> StateAppearance {
    StateAppearance {
        label: "Poll".to_string(),
        color: "#1155DD".to_string(),
        spinner: false,
    }
}

pub fn default_polling_appearance() -> StateAppearance {
    StateAppearance {
        label: "Polling... (press to cancel)".to_string(),
        color: "#002299".to_string(),
        spinner: true,
    }
}

/// Activation handler bound to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Poll,
    Cancel,
}

impl ControlAction {
    pub fn for_state(state: ControlState) -> Self {
        match state {
            ControlState::Idle => Self::Poll,
            ControlState::Polling => Self::Cancel,
        }
    }
}

/// Everything the renderer needs to draw the control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonProps {
    pub current_state: ControlState,
    pub states: StatesConfig,
    pub transition_duration_ms: u64,
}

impl ButtonProps {
    pub fn current(&self) -> &StateAppearance {
        self.states.appearance(self.current_state)
    }

    pub fn on_activate(&self) -> ControlAction {
        ControlAction::for_state(self.current_state)
    }
}
