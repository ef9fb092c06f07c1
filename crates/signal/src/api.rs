use crate::error::{ApiError, ApiResult};
use crate::types::{CarbonReading, LatestResponse, ZoneTable};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.co2signal.com/v1";
pub const DEFAULT_ZONES_URL: &str = "https://api.electricitymap.org/v3/zones";
const AUTH_HEADER: &str = "auth-token";
const REGION_PARAM: &str = "countryCode";
const MAX_ERROR_BODY: usize = 512;

/// Outbound capability used by the session controller.
#[async_trait]
pub trait SignalApi: Send + Sync {
    /// Latest intensity and fossil share for `region_code`.
    async fn latest(&self, api_key: &str, region_code: &str) -> ApiResult<CarbonReading>;

    /// Zone-metadata table keyed by region code. No authentication.
    async fn zones(&self) -> ApiResult<ZoneTable>;
}

#[derive(Clone)]
pub struct SignalClient {
    http: Client,
    base_url: String,
    zones_url: String,
}

impl Default for SignalClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_ZONES_URL, Duration::from_secs(10))
    }
}

impl SignalClient {
    pub fn new(
        base_url: impl Into<String>,
        zones_url: impl Into<String>,
        connect_timeout: Duration,
    ) -> Self {
        let http = Client::builder()
            .user_agent(concat!("carbon-signal/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            zones_url: zones_url.into(),
        }
    }

    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Err(ApiError::Status { status, body })
    }
}

#[async_trait]
impl SignalApi for SignalClient {
    async fn latest(&self, api_key: &str, region_code: &str) -> ApiResult<CarbonReading> {
        tracing::debug!(region = region_code, "requesting latest carbon intensity");

        let response = self
            .http
            .get(format!("{}/latest", self.base_url))
            .query(&[(REGION_PARAM, region_code)])
            .header(AUTH_HEADER, api_key)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let bytes = response.bytes().await?;
        let data: LatestResponse = serde_json::from_slice(&bytes)?;
        Ok(data.into_reading())
    }

    async fn zones(&self) -> ApiResult<ZoneTable> {
        tracing::debug!("requesting zone metadata");

        let response = self.http.get(&self.zones_url).send().await?;
        let response = Self::check_status(response).await?;

        let bytes = response.bytes().await?;
        let table: ZoneTable = serde_json::from_slice(&bytes)?;
        Ok(table)
    }
}
