use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    error::LocationError,
    estimate::OutboundRequest,
    location::{Position, PositionOptions},
};

#[async_trait]
pub trait GeolocationPort: Send + Sync {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, LocationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Network transport. Aborting a request means dropping the returned future.
#[async_trait]
pub trait TransportPort: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError>;
}

/// Blocking user-facing notification.
pub trait AlertPort: Send + Sync {
    fn alert(&self, message: &str);
}

/// What a trigger control drives.
pub trait PollControlPort {
    fn poll(&mut self);
    fn cancel(&mut self);
}

pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
