use std::sync::Arc;

use anyhow::Result;

use crate::{
    app::{location_poller::PollUpdate, poll_once::poll_once},
    cli::{PollFailed, SystemClock},
    config::LoadedConfig,
    infra::{alert::StderrAlert, geolocation::ConfiguredGeolocation, http_transport::HttpTransport},
};

pub(crate) async fn run(loaded: LoadedConfig, json: bool) -> Result<()> {
    let cfg = loaded.config;
    let geolocation = Arc::new(ConfiguredGeolocation::from_config(&cfg.location)?);
    let transport = Arc::new(HttpTransport::new()?);

    let outcome = poll_once(&cfg, geolocation, transport, StderrAlert, &SystemClock).await?;

    if json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else {
        let source = if loaded.file_found {
            loaded.resolved_path.source.to_string()
        } else {
            "built-in defaults".to_string()
        };
        println!(
            "config: {} (source: {source})",
            loaded.resolved_path.path.display()
        );
        println!("stage: {}", outcome.stage);
        println!("cars_available: {}", outcome.cars_available);
        match &outcome.update {
            PollUpdate::Finished { body, .. } => println!("body: {body}"),
            PollUpdate::Failed { message } => println!("error: {message}"),
        }
    }

    if outcome.is_success() {
        Ok(())
    } else {
        Err(PollFailed.into())
    }
}
