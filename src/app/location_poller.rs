use std::sync::Arc;

use serde::Serialize;
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

use crate::{
    app::request_coordinator::RequestCoordinator,
    domain::{
        error::{LocationError, PollError, RequestError},
        estimate::{Endpoint, OutboundRequest},
        location::{Position, PositionOptions},
        session::{transition, Effect, PollEvent, PollStage, Transition},
    },
    ports::{AlertPort, GeolocationPort, PollControlPort, TransportPort},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerSettings {
    pub endpoint: Endpoint,
    pub gps: PositionOptions,
}

/// Terminal outcome of a poll session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollUpdate {
    Finished { available: bool, body: String },
    Failed { message: String },
}

#[derive(Debug)]
struct SessionEvent {
    session: u64,
    event: PollEvent,
}

/// Drives one location lookup followed by one estimate request.
///
/// `poll` returns immediately. Completions from the lookup task and the
/// request coordinator come back as [`PollEvent`]s and are applied by
/// [`LocationPoller::next_update`].
pub struct LocationPoller<G, T, A> {
    geolocation: Arc<G>,
    coordinator: RequestCoordinator<T>,
    alerts: A,
    settings: PollerSettings,
    stage: PollStage,
    session: u64,
    cars_available: bool,
    lookup_task: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
}

impl<G, T, A> LocationPoller<G, T, A>
where
    G: GeolocationPort + 'static,
    T: TransportPort + 'static,
    A: AlertPort,
{
    pub fn new(geolocation: Arc<G>, transport: Arc<T>, alerts: A, settings: PollerSettings) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            geolocation,
            coordinator: RequestCoordinator::new(transport),
            alerts,
            settings,
            stage: PollStage::Idle,
            session: 0,
            cars_available: false,
            lookup_task: None,
            events_tx,
            events_rx,
        }
    }

    pub fn stage(&self) -> PollStage {
        self.stage
    }

    pub fn cars_available(&self) -> bool {
        self.cars_available
    }

    pub fn coordinator(&self) -> &RequestCoordinator<T> {
        &self.coordinator
    }

    /// Starts a new session, cancelling the one in progress if any.
    pub fn poll(&mut self) {
        if self.stage.is_active() {
            self.cancel();
        }

        self.session += 1;
        self.cars_available = false;
        tracing::info!(session = self.session, "poll started");
        self.apply(PollEvent::Start);
    }

    pub fn cancel(&mut self) {
        self.apply(PollEvent::Cancel);
    }

    /// Waits for the current session to produce its terminal outcome.
    ///
    /// Events belonging to earlier sessions are discarded. Cancel safe: the
    /// only suspension point is the channel receive.
    pub async fn next_update(&mut self) -> Option<PollUpdate> {
        loop {
            let SessionEvent { session, event } = self.events_rx.recv().await?;
            if session != self.session {
                tracing::debug!(session, current = self.session, "dropped stale poll event");
                continue;
            }

            if let Some(update) = self.apply(event) {
                return Some(update);
            }
        }
    }

    fn apply(&mut self, event: PollEvent) -> Option<PollUpdate> {
        let Transition { next, effect } = transition(self.stage, &event);
        if next != self.stage {
            tracing::debug!(
                session = self.session,
                from = %self.stage,
                to = %next,
                "poll stage changed"
            );
        }
        self.stage = next;

        match effect {
            Effect::None => None,
            Effect::LookupLocation => {
                self.start_lookup();
                None
            }
            Effect::IssueRequest(position) => {
                self.issue_request(position);
                None
            }
            Effect::MarkAvailable(body) => {
                self.cars_available = true;
                Some(PollUpdate::Finished {
                    available: true,
                    body,
                })
            }
            Effect::ReportError(err) => Some(self.handle_error(err)),
            Effect::AbortRequest => {
                self.abort_outstanding();
                None
            }
        }
    }

    fn handle_error(&mut self, err: PollError) -> PollUpdate {
        let message = err.to_string();
        tracing::warn!(session = self.session, error = %message, "poll failed");
        self.alerts.alert(&message);
        self.cancel();
        PollUpdate::Failed { message }
    }

    fn start_lookup(&mut self) {
        let geolocation = Arc::clone(&self.geolocation);
        let options = self.settings.gps;
        let events = self.events_tx.clone();
        let session = self.session;

        if let Some(previous) = self.lookup_task.take() {
            previous.abort();
        }

        self.lookup_task = Some(tokio::spawn(async move {
            let lookup = geolocation.current_position(&options);
            let event = match tokio::time::timeout(options.timeout(), lookup).await {
                Ok(Ok(position)) => PollEvent::LocationFound(position),
                Ok(Err(err)) => PollEvent::LocationFailed(err),
                Err(_) => PollEvent::LocationFailed(LocationError::Timeout(options.timeout_ms)),
            };
            let _ = events.send(SessionEvent { session, event });
        }));
    }

    fn issue_request(&mut self, position: Position) {
        self.lookup_task = None;
        tracing::info!(
            session = self.session,
            latitude = position.coords.latitude,
            longitude = position.coords.longitude,
            "location found"
        );

        let session = self.session;
        let request = match OutboundRequest::estimate(&self.settings.endpoint, &position) {
            Ok(request) => request,
            Err(err) => {
                let _ = self.events_tx.send(SessionEvent {
                    session,
                    event: PollEvent::RequestFailed(err),
                });
                return;
            }
        };
        let on_success = {
            let events = self.events_tx.clone();
            move |body: String| {
                let _ = events.send(SessionEvent {
                    session,
                    event: PollEvent::RequestSucceeded(body),
                });
            }
        };
        let on_failure = {
            let events = self.events_tx.clone();
            move |body: Option<String>, status: Option<u16>| {
                let _ = events.send(SessionEvent {
                    session,
                    event: PollEvent::RequestFailed(RequestError::from_failure(body, status)),
                });
            }
        };

        self.coordinator.post(request, on_success, on_failure);
    }

    fn abort_outstanding(&mut self) {
        if let Some(task) = self.lookup_task.take() {
            task.abort();
        }
        self.coordinator.cancel();
    }
}

impl<G, T, A> PollControlPort for LocationPoller<G, T, A>
where
    G: GeolocationPort + 'static,
    T: TransportPort + 'static,
    A: AlertPort,
{
    fn poll(&mut self) {
        LocationPoller::poll(self);
    }

    fn cancel(&mut self) {
        LocationPoller::cancel(self);
    }
}

impl<G, T, A> Drop for LocationPoller<G, T, A> {
    fn drop(&mut self) {
        if let Some(task) = self.lookup_task.take() {
            task.abort();
        }
    }
}
