//! Region keys and the boundary host's file layout.
//!
//! The boundary host stores one file for the whole country and one file per
//! state, laid out as:
//!
//! ```text
//! INDIA/INDIA_STATES.geojson
//! STATES/<folder>/<FILE>_DISTRICTS.geojson
//! ```
//!
//! `<folder>` is usually the region key with underscores turned back into
//! spaces, but a few states live under historical or abbreviated names.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Normalize a human-readable region name: uppercase, spaces become
/// underscores, anything outside `[A-Z0-9_]` is dropped.
pub fn normalize(name: &str) -> String {
    name.to_uppercase()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// Normalized identifier for a state, used for cache and URL lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionKey(String);

impl RegionKey {
    pub fn new(name: &str) -> Self {
        RegionKey(normalize(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Folder on the boundary host holding this state's district file.
    pub fn folder(&self) -> String {
        match FOLDER_OVERRIDES.iter().find(|(key, _)| *key == self.0) {
            Some((_, folder)) => folder.to_string(),
            None => self.0.replace('_', " "),
        }
    }

    /// District file stem (without extension) for this state.
    pub fn districts_file(&self) -> String {
        // The folder was renamed but the file kept the modern spelling.
        if self.0 == "ORISSA" {
            "ODISHA_DISTRICTS".to_string()
        } else {
            format!("{}_DISTRICTS", self.0)
        }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Region keys whose folder on the host differs from the key itself.
const FOLDER_OVERRIDES: &[(&str, &str)] = &[
    ("ODISHA", "ORISSA"),
    ("ORISSA", "ORISSA"),
    ("BIHAR", "BIHAR"),
    ("MADHYA_PRADESH", "MADHYA PRADESH"),
    ("JAMMU_AND_KASHMIR", "JAMMU KASHMIR"),
];

/// URL of the country-level document listing every state.
pub fn states_url(base: &Url) -> Option<Url> {
    join_segments(base, &["INDIA", "INDIA_STATES.geojson"])
}

/// URL of the district document for one state.
pub fn districts_url(base: &Url, key: &RegionKey) -> Option<Url> {
    let file = format!("{}.geojson", key.districts_file());
    join_segments(base, &["STATES", &key.folder(), &file])
}

/// Append path segments, percent-encoding each one. `None` if `base` cannot
/// carry a path (e.g. a `data:` URL).
fn join_segments(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.org/shapes/master").unwrap()
    }

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("Madhya Pradesh"), "MADHYA_PRADESH");
        assert_eq!(normalize("odisha"), "ODISHA");
        assert_eq!(normalize("Jammu & Kashmir"), "JAMMU__KASHMIR");
        assert_eq!(normalize("Dadra-Nagar Haveli"), "DADRANAGAR_HAVELI");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let names = [
            "Madhya Pradesh",
            "  Tamil  Nadu ",
            "Jammu and Kashmir",
            "Andaman & Nicobar Islands",
            "puducherry",
            "Tělangana",
            "UT-2019 (Ladakh)",
            "___",
        ];
        for name in names {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn test_equivalent_spellings_share_a_key() {
        assert_eq!(RegionKey::new("Madhya Pradesh"), RegionKey::new("MADHYA pradesh"));
        assert_eq!(RegionKey::new("Odisha!"), RegionKey::new("odisha"));
    }

    #[test]
    fn test_folder_overrides() {
        assert_eq!(RegionKey::new("Odisha").folder(), "ORISSA");
        assert_eq!(RegionKey::new("Orissa").folder(), "ORISSA");
        assert_eq!(RegionKey::new("Madhya Pradesh").folder(), "MADHYA PRADESH");
        assert_eq!(RegionKey::new("Jammu and Kashmir").folder(), "JAMMU KASHMIR");
    }

    #[test]
    fn test_folder_fallback_restores_spaces() {
        assert_eq!(RegionKey::new("Tamil Nadu").folder(), "TAMIL NADU");
        assert_eq!(RegionKey::new("Tripura").folder(), "TRIPURA");
    }

    #[test]
    fn test_districts_file() {
        assert_eq!(RegionKey::new("Tripura").districts_file(), "TRIPURA_DISTRICTS");
        assert_eq!(RegionKey::new("Orissa").districts_file(), "ODISHA_DISTRICTS");
        assert_eq!(RegionKey::new("Odisha").districts_file(), "ODISHA_DISTRICTS");
    }

    #[test]
    fn test_states_url() {
        let url = states_url(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.org/shapes/master/INDIA/INDIA_STATES.geojson"
        );
    }

    #[test]
    fn test_districts_url_encodes_folder() {
        let url = districts_url(&base(), &RegionKey::new("Madhya Pradesh")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.org/shapes/master/STATES/MADHYA%20PRADESH/MADHYA_PRADESH_DISTRICTS.geojson"
        );
    }

    #[test]
    fn test_districts_url_with_trailing_slash_base() {
        let base = Url::parse("https://example.org/shapes/").unwrap();
        let url = districts_url(&base, &RegionKey::new("Odisha")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.org/shapes/STATES/ORISSA/ODISHA_DISTRICTS.geojson"
        );
    }
}
