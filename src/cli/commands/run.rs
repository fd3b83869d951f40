use std::sync::Arc;

use anyhow::Result;

use crate::{
    app::button_loop::run_button,
    cli::SystemClock,
    config::Config,
    infra::{geolocation::ConfiguredGeolocation, http_transport::HttpTransport},
};

pub(crate) async fn run(cfg: Config) -> Result<()> {
    let geolocation = Arc::new(ConfiguredGeolocation::from_config(&cfg.location)?);
    let transport = Arc::new(HttpTransport::new()?);

    run_button(&cfg, geolocation, transport, &SystemClock).await
}
