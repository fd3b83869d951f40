use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use reqwest::Url;

use super::{error::RequestError, location::Position};

pub const DEFAULT_ESTIMATE_URL: &str = "https://api.example-ride-service.com/v1/estimates/time";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub base_url: String,
    pub server_token: String,
    pub method: HttpMethod,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ESTIMATE_URL.to_string(),
            server_token: String::new(),
            method: HttpMethod::Get,
        }
    }
}

/// One outbound call: target address plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
}

impl OutboundRequest {
    /// Builds the time-estimate request for a position.
    ///
    /// The longitude key is `longitude`, not `start_longitude`; the endpoint has
    /// always been called that way and the parameter names are kept verbatim.
    pub fn estimate(endpoint: &Endpoint, position: &Position) -> Result<Self, RequestError> {
        let mut url = Url::parse(&endpoint.base_url).map_err(|err| {
            RequestError::InvalidAddress(format!("{}: {err}", endpoint.base_url))
        })?;
        url.query_pairs_mut()
            .append_pair("server_token", &endpoint.server_token)
            .append_pair("start_latitude", &format_coordinate(position.coords.latitude))
            .append_pair("longitude", &format_coordinate(position.coords.longitude));

        let body = match endpoint.method {
            HttpMethod::Get => None,
            HttpMethod::Post => url.query().map(str::to_string),
        };

        Ok(Self {
            method: endpoint.method,
            url: url.into(),
            body,
        })
    }
}

/// Shortest decimal form, with negative zero printed as `0`.
pub fn format_coordinate(degrees: f64) -> String {
    if degrees == 0.0 {
        return "0".to_string();
    }
    degrees.to_string()
}
