//! Remote boundary fetcher.
//!
//! The HTTP client is abstracted behind [`BoundaryTransport`] so the fetcher
//! can be driven by `reqwest` in the browser and by an in-memory mock in
//! tests.

use std::future::Future;

use geojson::{FeatureCollection, GeoJson};
use url::Url;

use crate::error::BoundaryError;
use crate::region::{self, RegionKey};

/// Display name used in errors for the country-level document.
pub const COUNTRY_REGION: &str = "India";

/// Status and body of a completed HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal async HTTP GET.
///
/// Futures are not required to be `Send`: the browser runs everything on one
/// thread.
pub trait BoundaryTransport {
    /// Performs a GET. `Err` means no response was received at all.
    fn get(&self, url: &Url) -> impl Future<Output = Result<HttpResponse, String>>;
}

/// Which boundary document to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    States,
    Districts { state: String },
}

/// Builds boundary URLs and validates what comes back. Does not cache and
/// never retries; both are the caller's business.
#[derive(Debug, Clone)]
pub struct BoundaryFetcher<T> {
    transport: T,
    base_url: Url,
}

impl<T: BoundaryTransport> BoundaryFetcher<T> {
    pub fn new(transport: T, base_url: Url) -> Self {
        BoundaryFetcher {
            transport,
            base_url,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn fetch_states(&self) -> Result<FeatureCollection, BoundaryError> {
        let url = region::states_url(&self.base_url).ok_or_else(|| invalid_host(COUNTRY_REGION))?;
        self.fetch(COUNTRY_REGION, &url).await
    }

    pub async fn fetch_districts(&self, state_name: &str) -> Result<FeatureCollection, BoundaryError> {
        let key = RegionKey::new(state_name);
        let url =
            region::districts_url(&self.base_url, &key).ok_or_else(|| invalid_host(state_name))?;
        self.fetch(state_name, &url).await
    }

    pub async fn fetch_request(
        &self,
        request: &FetchRequest,
    ) -> Result<FeatureCollection, BoundaryError> {
        match request {
            FetchRequest::States => self.fetch_states().await,
            FetchRequest::Districts { state } => self.fetch_districts(state).await,
        }
    }

    async fn fetch(&self, region: &str, url: &Url) -> Result<FeatureCollection, BoundaryError> {
        tracing::info!(region, %url, "fetching boundaries");
        let response = self.transport.get(url).await.map_err(|reason| {
            tracing::warn!(region, %reason, "boundary request failed");
            BoundaryError::NetworkFailure {
                region: region.to_string(),
                reason,
            }
        })?;
        if !response.is_success() {
            tracing::warn!(region, status = response.status, "boundary host returned an error");
            return Err(BoundaryError::NotFound {
                region: region.to_string(),
                status: response.status,
            });
        }
        parse_document(region, &response.body)
    }
}

fn invalid_host(region: &str) -> BoundaryError {
    BoundaryError::NetworkFailure {
        region: region.to_string(),
        reason: "boundary host URL cannot carry a path".to_string(),
    }
}

/// Parse a response body, accepting only a FeatureCollection.
pub fn parse_document(region: &str, body: &str) -> Result<FeatureCollection, BoundaryError> {
    let invalid = |reason: String| BoundaryError::InvalidFormat {
        region: region.to_string(),
        reason,
    };

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| invalid(format!("not JSON: {e}")))?;
    match value.get("type").and_then(serde_json::Value::as_str) {
        Some("FeatureCollection") => {}
        Some(other) => return Err(invalid(format!("expected FeatureCollection, got {other}"))),
        None => return Err(invalid("missing \"type\"".to_string())),
    }

    match GeoJson::from_json_value(value) {
        Ok(GeoJson::FeatureCollection(collection)) => Ok(collection),
        Ok(_) => Err(invalid("expected FeatureCollection".to_string())),
        Err(e) => Err(invalid(e.to_string())),
    }
}
