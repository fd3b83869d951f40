use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    app::location_poller::{LocationPoller, PollUpdate},
    config::Config,
    domain::session::PollStage,
    ports::{AlertPort, ClockPort, GeolocationPort, TransportPort},
};

#[derive(Debug, Clone, Serialize)]
pub struct PollOutcome {
    pub stage: PollStage,
    pub cars_available: bool,
    #[serde(flatten)]
    pub update: PollUpdate,
    pub finished_at: DateTime<Utc>,
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.update, PollUpdate::Finished { .. })
    }
}

/// Runs a single poll session to completion without a UI.
pub async fn poll_once<G, T, A, K>(
    config: &Config,
    geolocation: Arc<G>,
    transport: Arc<T>,
    alerts: A,
    clock: &K,
) -> Result<PollOutcome>
where
    G: GeolocationPort + 'static,
    T: TransportPort + 'static,
    A: AlertPort,
    K: ClockPort,
{
    let mut poller = LocationPoller::new(geolocation, transport, alerts, config.poller_settings());
    poller.poll();

    let update = poller
        .next_update()
        .await
        .ok_or_else(|| anyhow!("poll session ended without an outcome"))?;

    Ok(PollOutcome {
        stage: poller.stage(),
        cars_available: poller.cars_available(),
        update,
        finished_at: clock.now(),
    })
}
