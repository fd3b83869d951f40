use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::Instant;

use crate::{
    config::{LocationConfig, LocationSource},
    domain::{
        error::LocationError,
        location::{Position, PositionOptions},
    },
    ports::GeolocationPort,
};

/// Always reports the configured coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocation {
    position: Position,
}

impl FixedGeolocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            position: Position::new(latitude, longitude),
        }
    }
}

#[async_trait]
impl GeolocationPort for FixedGeolocation {
    async fn current_position(&self, _options: &PositionOptions) -> Result<Position, LocationError> {
        Ok(self.position)
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Approximate location from an ip-api style JSON endpoint.
///
/// A fix younger than `max_cached_age_ms` is reused without a network call, so
/// an age of zero always looks up afresh.
/// `high_accuracy` cannot be honoured by an IP lookup and is only logged.
#[derive(Debug)]
pub struct IpGeolocation {
    http: reqwest::Client,
    lookup_url: String,
    last_fix: Mutex<Option<(Position, Instant)>>,
}

impl IpGeolocation {
    pub fn new(lookup_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            lookup_url: lookup_url.into(),
            last_fix: Mutex::new(None),
        })
    }

    fn cached(&self, options: &PositionOptions) -> Option<Position> {
        let guard = self.last_fix.lock().unwrap_or_else(PoisonError::into_inner);
        (*guard).and_then(|(position, taken_at)| {
            (taken_at.elapsed() < options.max_cached_age()).then_some(position)
        })
    }

    fn remember(&self, position: Position) {
        *self.last_fix.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((position, Instant::now()));
    }

    async fn lookup(&self) -> Result<Position, LocationError> {
        let response = self
            .http
            .get(&self.lookup_url)
            .send()
            .await
            .map_err(|err| LocationError::PositionUnavailable(err.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(LocationError::PermissionDenied);
        }
        if !status.is_success() {
            return Err(LocationError::PositionUnavailable(format!(
                "lookup returned status {}",
                status.as_u16()
            )));
        }

        let payload: IpLookupResponse = response
            .json()
            .await
            .map_err(|err| LocationError::PositionUnavailable(err.to_string()))?;
        parse_lookup(payload)
    }
}

fn parse_lookup(payload: IpLookupResponse) -> Result<Position, LocationError> {
    if payload.status.as_deref().is_some_and(|status| status != "success") {
        return Err(LocationError::PositionUnavailable(
            payload.message.unwrap_or_else(|| "lookup failed".to_string()),
        ));
    }

    match (payload.lat, payload.lon) {
        (Some(lat), Some(lon)) => Ok(Position::new(lat, lon)),
        _ => Err(LocationError::PositionUnavailable(
            "lookup response has no coordinates".to_string(),
        )),
    }
}

#[async_trait]
impl GeolocationPort for IpGeolocation {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, LocationError> {
        if let Some(position) = self.cached(options) {
            tracing::debug!("reusing cached location fix");
            return Ok(position);
        }

        tracing::debug!(
            url = %self.lookup_url,
            high_accuracy = options.high_accuracy,
            "looking up location"
        );
        let position = self.lookup().await?;
        self.remember(position);
        Ok(position)
    }
}

/// The source selected by `[location]` in the config.
#[derive(Debug)]
pub enum ConfiguredGeolocation {
    Fixed(FixedGeolocation),
    Ip(IpGeolocation),
}

impl ConfiguredGeolocation {
    pub fn from_config(config: &LocationConfig) -> Result<Self> {
        Ok(match config.source {
            LocationSource::Fixed => {
                Self::Fixed(FixedGeolocation::new(config.latitude, config.longitude))
            }
            LocationSource::Ip => Self::Ip(IpGeolocation::new(config.ip_lookup_url.clone())?),
        })
    }
}

#[async_trait]
impl GeolocationPort for ConfiguredGeolocation {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, LocationError> {
        match self {
            Self::Fixed(source) => source.current_position(options).await,
            Self::Ip(source) => source.current_position(options).await,
        }
    }
}
