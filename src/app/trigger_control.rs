use crate::{
    domain::{
        button::{ButtonProps, ControlAction, StatesConfig},
        session::ControlState,
    },
    ports::PollControlPort,
};

/// Two-state control in front of a poller.
///
/// Dropping the control cancels the poller whatever state it is in, so a
/// response arriving after removal has nothing left to update.
pub struct TriggerControl<P: PollControlPort> {
    state: ControlState,
    poller: P,
    states: StatesConfig,
    transition_duration_ms: u64,
}

impl<P: PollControlPort> TriggerControl<P> {
    pub fn new(poller: P, states: StatesConfig, transition_duration_ms: u64) -> Self {
        Self {
            state: ControlState::Idle,
            poller,
            states,
            transition_duration_ms,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn poller(&self) -> &P {
        &self.poller
    }

    pub fn poller_mut(&mut self) -> &mut P {
        &mut self.poller
    }

    /// Runs the activation handler of the current state and returns which one ran.
    pub fn activate(&mut self) -> ControlAction {
        let action = ControlAction::for_state(self.state);
        match action {
            ControlAction::Poll => {
                self.state = ControlState::Polling;
                self.poller.poll();
            }
            ControlAction::Cancel => {
                self.state = ControlState::Idle;
                self.poller.cancel();
            }
        }
        tracing::debug!(action = ?action, state = %self.state, "control activated");
        action
    }

    /// Returns to idle once the poll session has ended on its own.
    pub fn settle(&mut self) {
        self.state = ControlState::Idle;
    }

    pub fn button_props(&self) -> ButtonProps {
        ButtonProps {
            current_state: self.state,
            states: self.states.clone(),
            transition_duration_ms: self.transition_duration_ms,
        }
    }

    /// Removes the control. Equivalent to dropping it.
    pub fn teardown(self) {}
}

impl<P: PollControlPort> Drop for TriggerControl<P> {
    fn drop(&mut self) {
        tracing::debug!(state = %self.state, "control torn down");
        self.poller.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::TriggerControl;
    use crate::{
        domain::{
            button::{ControlAction, StatesConfig},
            session::ControlState,
        },
        ports::PollControlPort,
    };

    #[derive(Default)]
    struct CountingPoller {
        polls: usize,
        cancels: usize,
    }

    impl PollControlPort for CountingPoller {
        fn poll(&mut self) {
            self.polls += 1;
        }

        fn cancel(&mut self) {
            self.cancels += 1;
        }
    }

    #[test]
    fn props_follow_state() {
        let mut control = TriggerControl::new(CountingPoller::default(), StatesConfig::default(), 200);

        let idle = control.button_props();
        assert_eq!(idle.current_state, ControlState::Idle);
        assert_eq!(idle.current().label, "Poll");
        assert!(!idle.current().spinner);
        assert_eq!(idle.on_activate(), ControlAction::Poll);
        assert_eq!(idle.transition_duration_ms, 200);

        control.activate();
        let polling = control.button_props();
        assert_eq!(polling.current_state, ControlState::Polling);
        assert!(polling.current().spinner);
        assert_eq!(polling.on_activate(), ControlAction::Cancel);
    }

    #[test]
    fn settle_returns_to_idle_without_cancelling() {
        let mut control = TriggerControl::new(CountingPoller::default(), StatesConfig::default(), 200);
        control.activate();
        control.settle();

        assert_eq!(control.state(), ControlState::Idle);
        assert_eq!(control.poller().cancels, 0);
    }
}
