use std::{
    env,
    fmt::{Display, Formatter},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use reqwest::Url;
use serde::Deserialize;

use crate::{
    app::location_poller::PollerSettings,
    domain::{
        button::{
            default_idle_appearance, default_polling_appearance, StateAppearance, StatesConfig,
        },
        estimate::{Endpoint, HttpMethod, DEFAULT_ESTIMATE_URL},
        location::PositionOptions,
    },
};

pub const CONFIG_ENV: &str = "POLL_BUTTON_CONFIG";
pub const SERVER_TOKEN_ENV: &str = "POLL_BUTTON_SERVER_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub gps: GpsConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub button: ButtonConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub server_token: String,
    #[serde(default)]
    pub method: HttpMethod,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            server_token: String::new(),
            method: HttpMethod::Get,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GpsConfig {
    #[serde(default = "default_true")]
    pub high_accuracy: bool,
    #[serde(default = "default_gps_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_cached_age_ms")]
    pub max_cached_age_ms: u64,
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: default_gps_timeout_ms(),
            max_cached_age_ms: default_max_cached_age_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    #[default]
    Fixed,
    Ip,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub source: LocationSource,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            source: LocationSource::Fixed,
            latitude: default_latitude(),
            longitude: default_longitude(),
            ip_lookup_url: default_ip_lookup_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ButtonConfig {
    #[serde(default = "default_transition_duration_ms")]
    pub transition_duration_ms: u64,
    #[serde(default = "default_idle_appearance")]
    pub idle: StateAppearance,
    #[serde(default = "default_polling_appearance")]
    pub polling: StateAppearance,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            transition_duration_ms: default_transition_duration_ms(),
            idle: default_idle_appearance(),
            polling: default_polling_appearance(),
        }
    }
}

impl ButtonConfig {
    pub fn states(&self) -> StatesConfig {
        StatesConfig {
            idle: self.idle.clone(),
            polling: self.polling.clone(),
        }
    }
}

impl Config {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            base_url: self.endpoint.base_url.clone(),
            server_token: self.endpoint.server_token.clone(),
            method: self.endpoint.method,
        }
    }

    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.gps.high_accuracy,
            timeout_ms: self.gps.timeout_ms,
            max_cached_age_ms: self.gps.max_cached_age_ms,
        }
    }

    pub fn poller_settings(&self) -> PollerSettings {
        PollerSettings {
            endpoint: self.endpoint(),
            gps: self.position_options(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_ESTIMATE_URL.to_string()
}

fn default_gps_timeout_ms() -> u64 {
    20_000
}

fn default_max_cached_age_ms() -> u64 {
    60_000
}

fn default_latitude() -> f64 {
    37.0
}

fn default_longitude() -> f64 {
    -122.0
}

fn default_ip_lookup_url() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_transition_duration_ms() -> u64 {
    200
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPathSource {
    Cli,
    LocalFile,
    Env,
    Default,
}

impl Display for ConfigPathSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Cli => "--config",
            Self::LocalFile => "./config.toml",
            Self::Env => CONFIG_ENV,
            Self::Default => "default",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfigPath {
    pub path: PathBuf,
    pub source: ConfigPathSource,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub resolved_path: ResolvedConfigPath,
    pub file_found: bool,
}

pub fn parse_config(src: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(src).context("failed to parse config TOML")?;
    validate_config(&cfg)?;
    Ok(cfg)
}

/// Loads the config, falling back to defaults when no file exists at an
/// implicitly chosen location. A missing `--config` file is an error.
pub fn load_config_with_path(path: Option<&Path>) -> Result<LoadedConfig> {
    let resolved_path = resolve_config_path_with_source(path)?;

    let file_found = resolved_path.path.exists();
    let mut config = if file_found {
        let src = fs::read_to_string(&resolved_path.path).with_context(|| {
            format!("failed to read config: {}", resolved_path.path.display())
        })?;
        parse_config(&src)
            .with_context(|| format!("invalid config: {}", resolved_path.path.display()))?
    } else if resolved_path.source == ConfigPathSource::Cli {
        return Err(anyhow!(
            "config does not exist: {} (run `poll-button init --path <path>`)",
            resolved_path.path.display()
        ));
    } else {
        Config::default()
    };

    apply_env_overrides(&mut config);

    Ok(LoadedConfig {
        config,
        resolved_path,
        file_found,
    })
}

pub fn apply_env_overrides(config: &mut Config) {
    if let Some(token) = env::var_os(SERVER_TOKEN_ENV) {
        config.endpoint.server_token = token.to_string_lossy().into_owned();
    }
}

pub fn resolve_config_path(path: Option<&Path>) -> Result<PathBuf> {
    Ok(resolve_config_path_with_source(path)?.path)
}

pub fn resolve_config_path_with_source(path: Option<&Path>) -> Result<ResolvedConfigPath> {
    if let Some(explicit) = path {
        return Ok(ResolvedConfigPath {
            path: explicit.to_path_buf(),
            source: ConfigPathSource::Cli,
        });
    }

    let local = PathBuf::from("config.toml");
    if local.exists() {
        return Ok(ResolvedConfigPath {
            path: local,
            source: ConfigPathSource::LocalFile,
        });
    }

    if let Some(raw) = env::var_os(CONFIG_ENV) {
        return Ok(ResolvedConfigPath {
            path: PathBuf::from(raw),
            source: ConfigPathSource::Env,
        });
    }

    Ok(ResolvedConfigPath {
        path: default_config_path()?,
        source: ConfigPathSource::Default,
    })
}

pub fn default_config_path() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var_os("APPDATA").ok_or_else(|| anyhow!("APPDATA is not set"))?;
        return Ok(PathBuf::from(appdata)
            .join("poll-button")
            .join("config.toml"));
    }

    #[cfg(not(windows))]
    {
        let home = home_dir()?;
        Ok(home.join(".config").join("poll-button").join("config.toml"))
    }
}

fn home_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| anyhow!("could not determine home directory"))
}

fn validate_config(cfg: &Config) -> Result<()> {
    let base_url = &cfg.endpoint.base_url;
    let parsed = Url::parse(base_url)
        .with_context(|| format!("endpoint.base_url '{base_url}' is not a valid URL"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!(
            "endpoint.base_url '{}' must start with http:// or https://",
            base_url
        ));
    }

    if cfg.gps.timeout_ms == 0 {
        return Err(anyhow!("gps.timeout_ms must be >= 1"));
    }

    if cfg.location.source == LocationSource::Fixed {
        if !(-90.0..=90.0).contains(&cfg.location.latitude) {
            return Err(anyhow!("location.latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&cfg.location.longitude) {
            return Err(anyhow!("location.longitude must be within [-180, 180]"));
        }
    }

    validate_color("button.idle.color", &cfg.button.idle.color)?;
    validate_color("button.polling.color", &cfg.button.polling.color)?;

    Ok(())
}

fn validate_color(key: &str, color: &str) -> Result<()> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(anyhow!("{key} '{color}' is invalid; expected #RRGGBB"))
    }
}
