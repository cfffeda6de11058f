use serde::Deserialize;
use url::Url;

use crate::geo::LatLng;

/// Public host serving the Indian administrative boundary files.
pub const DEFAULT_BOUNDARY_HOST: &str =
    "https://raw.githubusercontent.com/datta07/INDIAN-SHAPEFILES/master";

/// Geographic centre of India.
pub const DEFAULT_CENTER: LatLng = LatLng::new(20.5937, 78.9629);

/// Zoom at which the whole country fits a desktop-sized map.
pub const DEFAULT_ZOOM: f64 = 5.0;

/// Runtime settings for boundary loading and the map viewport.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AtlasConfig {
    pub boundary_base_url: Url,
    pub default_center: LatLng,
    pub default_zoom: f64,
    /// Padding in screen pixels when fitting to a clicked state.
    pub state_fit_padding: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        AtlasConfig {
            boundary_base_url: Url::parse(DEFAULT_BOUNDARY_HOST)
                .expect("DEFAULT_BOUNDARY_HOST is a valid URL"),
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            state_fit_padding: 50.0,
            min_zoom: 3.0,
            max_zoom: 18.0,
        }
    }
}
