mod common;

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use common::{ok, FakeGeolocation, GatedTransport, RecordingAlert, StaticTransport};
use poll_button::{
    app::{
        location_poller::{LocationPoller, PollUpdate, PollerSettings},
        trigger_control::TriggerControl,
    },
    domain::{
        button::{ControlAction, StatesConfig},
        estimate::Endpoint,
        location::PositionOptions,
        session::{ControlState, PollStage},
    },
    ports::{PollControlPort, TransportPort},
};

#[derive(Clone, Default)]
struct RecordingPoller {
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingPoller {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl PollControlPort for RecordingPoller {
    fn poll(&mut self) {
        self.calls.lock().unwrap().push("poll");
    }

    fn cancel(&mut self) {
        self.calls.lock().unwrap().push("cancel");
    }
}

fn control(poller: &RecordingPoller) -> TriggerControl<RecordingPoller> {
    TriggerControl::new(poller.clone(), StatesConfig::default(), 200)
}

#[test]
fn first_activation_polls() {
    let poller = RecordingPoller::default();
    let mut control = control(&poller);

    assert_eq!(control.activate(), ControlAction::Poll);
    assert_eq!(control.state(), ControlState::Polling);
    assert_eq!(poller.calls(), vec!["poll"]);
}

#[test]
fn activating_twice_returns_to_idle_with_one_cancel() {
    let poller = RecordingPoller::default();
    let mut control = control(&poller);

    control.activate();
    assert_eq!(control.activate(), ControlAction::Cancel);

    assert_eq!(control.state(), ControlState::Idle);
    assert_eq!(poller.calls(), vec!["poll", "cancel"]);
}

#[test]
fn teardown_while_polling_cancels() {
    let poller = RecordingPoller::default();
    let mut control = control(&poller);
    control.activate();

    control.teardown();

    assert_eq!(poller.calls(), vec!["poll", "cancel"]);
}

#[test]
fn teardown_while_idle_still_cancels() {
    let poller = RecordingPoller::default();
    let control = control(&poller);

    drop(control);

    assert_eq!(poller.calls(), vec!["cancel"]);
}

#[test]
fn control_can_be_activated_again_after_settling() {
    let poller = RecordingPoller::default();
    let mut control = control(&poller);

    control.activate();
    control.settle();
    assert_eq!(control.activate(), ControlAction::Poll);

    assert_eq!(control.state(), ControlState::Polling);
    assert_eq!(poller.calls(), vec!["poll", "poll"]);
}

fn location_poller<T: TransportPort + 'static>(
    transport: &Arc<T>,
) -> LocationPoller<FakeGeolocation, T, RecordingAlert> {
    LocationPoller::new(
        Arc::new(FakeGeolocation::at(37.0, -122.0)),
        Arc::clone(transport),
        RecordingAlert::default(),
        PollerSettings {
            endpoint: Endpoint::default(),
            gps: PositionOptions::default(),
        },
    )
}

#[tokio::test]
async fn finished_session_settles_control_to_idle() {
    let transport = Arc::new(StaticTransport::new(ok(200, r#"{"eta":5}"#)));
    let mut control = TriggerControl::new(location_poller(&transport), StatesConfig::default(), 200);

    control.activate();
    let update = control.poller_mut().next_update().await;
    control.settle();

    assert!(matches!(update, Some(PollUpdate::Finished { available: true, .. })));
    assert_eq!(control.poller().stage(), PollStage::Done);
    assert!(control.poller().cars_available());
    assert_eq!(control.state(), ControlState::Idle);
}

#[tokio::test(start_paused = true)]
async fn teardown_with_request_in_flight_aborts_it() {
    let transport = Arc::new(GatedTransport::default());
    let mut control = TriggerControl::new(location_poller(&transport), StatesConfig::default(), 200);

    control.activate();
    assert!(
        tokio::time::timeout(Duration::from_millis(10), control.poller_mut().next_update())
            .await
            .is_err()
    );
    transport.wait_for_requests(1).await;

    control.teardown();
    common::settle().await;

    assert!(!transport.respond(0, ok(200, "after teardown")));
}

#[test]
fn teardown_after_session_finished_still_cancels() {
    let poller = RecordingPoller::default();
    let mut control = control(&poller);

    control.activate();
    control.settle();
    control.teardown();

    assert_eq!(poller.calls(), vec!["poll", "cancel"]);
}
