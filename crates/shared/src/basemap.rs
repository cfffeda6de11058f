use serde::{Deserialize, Serialize};

use crate::viewport::TileCoord;

const OSM_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

/// Background tile layers the user can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Basemap {
    #[default]
    Street,
    Satellite,
    Terrain,
}

impl Basemap {
    pub const ALL: [Basemap; 3] = [Basemap::Street, Basemap::Satellite, Basemap::Terrain];

    pub fn display_name(self) -> &'static str {
        match self {
            Basemap::Street => "Street Map",
            Basemap::Satellite => "Satellite",
            Basemap::Terrain => "Terrain",
        }
    }

    pub fn attribution(self) -> &'static str {
        match self {
            Basemap::Street => "© OpenStreetMap contributors",
            Basemap::Satellite | Basemap::Terrain => "Tiles © Esri",
        }
    }

    pub fn max_zoom(self) -> u8 {
        match self {
            Basemap::Street => 19,
            Basemap::Satellite | Basemap::Terrain => 18,
        }
    }

    pub fn tile_url(self, tile: TileCoord) -> String {
        let TileCoord { x, y, z } = tile;
        match self {
            Basemap::Street => {
                let s = OSM_SUBDOMAINS[((x + y) % 3) as usize];
                format!("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")
            }
            Basemap::Satellite => esri_url("World_Imagery", tile),
            Basemap::Terrain => esri_url("World_Topo_Map", tile),
        }
    }

    /// Inverse of [`Basemap::as_key`].
    pub fn from_key(key: &str) -> Option<Basemap> {
        Basemap::ALL.into_iter().find(|b| b.as_key() == key)
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Basemap::Street => "street",
            Basemap::Satellite => "satellite",
            Basemap::Terrain => "terrain",
        }
    }
}

// Esri orders tile paths z/y/x.
fn esri_url(service: &str, TileCoord { x, y, z }: TileCoord) -> String {
    format!("https://server.arcgisonline.com/ArcGIS/rest/services/{service}/MapServer/tile/{z}/{y}/{x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osm_url_uses_subdomain() {
        let url = Basemap::Street.tile_url(TileCoord { x: 22, y: 14, z: 5 });
        assert_eq!(url, "https://a.tile.openstreetmap.org/5/22/14.png");
    }

    #[test]
    fn test_esri_urls_swap_x_and_y() {
        let tile = TileCoord { x: 22, y: 14, z: 5 };
        assert_eq!(
            Basemap::Satellite.tile_url(tile),
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/5/14/22"
        );
        assert!(Basemap::Terrain.tile_url(tile).contains("World_Topo_Map/MapServer/tile/5/14/22"));
    }

    #[test]
    fn test_key_lookup() {
        for b in Basemap::ALL {
            assert_eq!(Basemap::from_key(b.as_key()), Some(b));
        }
        assert_eq!(Basemap::from_key("watercolor"), None);
        assert_eq!(Basemap::default(), Basemap::Street);
    }

    #[test]
    fn test_attributions() {
        assert!(Basemap::Street.attribution().contains("OpenStreetMap"));
        assert_eq!(Basemap::Terrain.attribution(), "Tiles © Esri");
    }
}
