//! Browser-side I/O: boundary downloads over `reqwest` and preferences kept
//! in `localStorage`.

use fra_shared::basemap::Basemap;
use fra_shared::config::AtlasConfig;
use fra_shared::source::{BoundaryFetcher, BoundaryTransport, HttpResponse};
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_KEY: &str = "fra-atlas.config";
const PREFS_KEY: &str = "fra-atlas.prefs";

/// [`BoundaryTransport`] backed by the browser's `fetch` through `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl BoundaryTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, String> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| e.to_string())?;
        Ok(HttpResponse { status, body })
    }
}

pub fn boundary_fetcher(config: &AtlasConfig) -> BoundaryFetcher<ReqwestTransport> {
    BoundaryFetcher::new(ReqwestTransport::default(), config.boundary_base_url.clone())
}

/// UI choices restored on the next visit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub basemap: String,
    pub show_boundaries: bool,
}

impl Preferences {
    pub fn basemap(&self) -> Basemap {
        Basemap::from_key(&self.basemap).unwrap_or_default()
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn read_item(key: &str) -> Option<String> {
    local_storage()?
        .get_item(key)
        .map_err(|e: wasm_bindgen::JsValue| tracing::warn!(key, error = ?e, "localStorage read failed"))
        .ok()?
}

/// Parse stored config overrides. Missing fields keep their defaults; an
/// unreadable blob is ignored entirely.
pub fn parse_config(raw: Option<&str>) -> AtlasConfig {
    let Some(raw) = raw else {
        return AtlasConfig::default();
    };
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring invalid stored config");
        AtlasConfig::default()
    })
}

pub fn load_config() -> AtlasConfig {
    parse_config(read_item(CONFIG_KEY).as_deref())
}

pub fn load_preferences() -> Preferences {
    read_item(PREFS_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub fn save_preferences(prefs: &Preferences) {
    let Some(storage) = local_storage() else {
        return;
    };
    match serde_json::to_string(prefs) {
        Ok(json) => {
            if storage.set_item(PREFS_KEY, &json).is_err() {
                tracing::warn!("could not persist preferences");
            }
        }
        Err(e) => tracing::warn!(error = %e, "could not serialize preferences"),
    }
}
