#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use poll_button::{
    domain::{
        error::LocationError,
        estimate::OutboundRequest,
        location::{Position, PositionOptions},
    },
    ports::{AlertPort, GeolocationPort, TransportError, TransportPort, TransportResponse},
};
use tokio::sync::oneshot;

type Reply = Result<TransportResponse, TransportError>;

pub fn ok(status: u16, body: &str) -> Reply {
    Ok(TransportResponse {
        status,
        body: body.to_string(),
    })
}

/// Transport whose responses are released by the test, one request at a time.
#[derive(Clone, Default)]
pub struct GatedTransport {
    requests: Arc<Mutex<Vec<OutboundRequest>>>,
    responders: Arc<Mutex<Vec<Option<oneshot::Sender<Reply>>>>>,
}

impl GatedTransport {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns false when the request was aborted before its response arrived.
    pub fn respond(&self, index: usize, reply: Reply) -> bool {
        let sender = self.responders.lock().unwrap()[index].take();
        match sender {
            Some(sender) => sender.send(reply).is_ok(),
            None => false,
        }
    }

    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..1000 {
            if self.request_count() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {count} requests, saw {}", self.request_count());
    }
}

#[async_trait]
impl TransportPort for GatedTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        let (tx, rx) = oneshot::channel();
        self.requests.lock().unwrap().push(request.clone());
        self.responders.lock().unwrap().push(Some(tx));
        rx.await
            .unwrap_or_else(|_| Err(TransportError("responder dropped".to_string())))
    }
}

/// Transport that answers every request with the same reply.
#[derive(Clone)]
pub struct StaticTransport {
    reply: Reply,
    requests: Arc<Mutex<Vec<OutboundRequest>>>,
}

impl StaticTransport {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransportPort for StaticTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

#[derive(Clone)]
pub enum LocationBehavior {
    Found(Position),
    Fails(LocationError),
    FoundAfter(Position, Duration),
    Never,
}

#[derive(Clone)]
pub struct FakeGeolocation {
    behavior: LocationBehavior,
    seen_options: Arc<Mutex<Vec<PositionOptions>>>,
}

impl FakeGeolocation {
    pub fn new(behavior: LocationBehavior) -> Self {
        Self {
            behavior,
            seen_options: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self::new(LocationBehavior::Found(Position::new(latitude, longitude)))
    }

    pub fn seen_options(&self) -> Vec<PositionOptions> {
        self.seen_options.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeolocationPort for FakeGeolocation {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, LocationError> {
        self.seen_options.lock().unwrap().push(*options);
        match &self.behavior {
            LocationBehavior::Found(position) => Ok(*position),
            LocationBehavior::Fails(err) => Err(err.clone()),
            LocationBehavior::FoundAfter(position, delay) => {
                tokio::time::sleep(*delay).await;
                Ok(*position)
            }
            LocationBehavior::Never => std::future::pending().await,
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingAlert {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingAlert {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl AlertPort for RecordingAlert {
    fn alert(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
