//! Location search over the claims dataset and the catalogue of focused
//! states used by the district search.

use std::collections::HashSet;
use std::fmt;

use crate::claims::ClaimFeature;
use crate::config::DEFAULT_CENTER;
use crate::filter::FilterState;
use crate::geo::{Bounds, LatLng};

/// Shortest query that produces results.
pub const MIN_QUERY_LEN: usize = 2;
pub const MAX_RESULTS: usize = 8;

/// States with forest-rights data, in display order.
pub const FOCUSED_STATES: [&str; 4] = ["Madhya Pradesh", "Tripura", "Odisha", "Telangana"];

const DISTRICTS_BY_STATE: [(&str, &[&str]); 4] = [
    ("Madhya Pradesh", &["Bhopal", "Indore"]),
    ("Tripura", &["Agartala", "Dhalai"]),
    ("Odisha", &["Bhubaneswar", "Cuttack"]),
    ("Telangana", &["Hyderabad", "Warangal"]),
];

/// Suggestions for the tribal group filter.
pub const TRIBAL_GROUPS: [&str; 5] = ["Gond", "Bhil", "Oraon", "Mizo", "Santhal"];

/// Districts offered for `state` in the district search. Empty for states
/// outside the catalogue.
pub fn districts_of(state: &str) -> &'static [&'static str] {
    DISTRICTS_BY_STATE
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(state.trim()))
        .map(|(_, d)| *d)
        .unwrap_or(&[])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    State,
    District,
    Village,
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationKind::State => write!(f, "State"),
            LocationKind::District => write!(f, "District"),
            LocationKind::Village => write!(f, "Village"),
        }
    }
}

/// A searchable place, carrying the parents of its first claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub kind: LocationKind,
    pub name: String,
    pub state: String,
    pub district: String,
}

impl Location {
    pub fn full_name(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }

    /// Point the location filters at this place.
    pub fn apply_to(&self, filters: &mut FilterState) {
        filters.state = self.state.clone();
        filters.district = match self.kind {
            LocationKind::State => String::new(),
            _ => self.district.clone(),
        };
        filters.village = match self.kind {
            LocationKind::Village => self.name.clone(),
            _ => String::new(),
        };
    }
}

/// Unique states, districts, and villages of `claims`, sorted by name.
pub fn locations(claims: &[ClaimFeature]) -> Vec<Location> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for kind in [LocationKind::State, LocationKind::District, LocationKind::Village] {
        for claim in claims {
            let p = &claim.properties;
            let name = match kind {
                LocationKind::State => &p.state,
                LocationKind::District => &p.district,
                LocationKind::Village => &p.village,
            };
            if name.is_empty() || !seen.insert((kind, name.clone())) {
                continue;
            }
            out.push(Location {
                kind,
                name: name.clone(),
                state: p.state.clone(),
                district: p.district.clone(),
            });
        }
    }
    out.sort_by_key(|l| l.name.to_lowercase());
    out
}

/// Case-insensitive substring match over location names.
pub fn search_locations<'a>(locations: &'a [Location], query: &str) -> Vec<&'a Location> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }
    locations
        .iter()
        .filter(|l| l.name.to_lowercase().contains(&query))
        .take(MAX_RESULTS)
        .collect()
}

fn rect(south: f64, west: f64, north: f64, east: f64) -> Bounds {
    Bounds::from_corners(LatLng::new(south, west), LatLng::new(north, east))
}

/// Approximate extent of a known place, for fitting the map after a
/// location search. Unknown names give the country centre as a point.
pub fn known_bounds(name: &str) -> Bounds {
    match name.trim().to_lowercase().as_str() {
        "madhya pradesh" => rect(21.0, 74.0, 26.0, 83.0),
        "tripura" => rect(23.0, 91.0, 24.5, 92.5),
        "odisha" => rect(17.5, 81.0, 22.5, 87.0),
        "telangana" => rect(15.5, 77.0, 19.5, 81.0),
        "bhopal" => rect(22.5, 77.5, 23.5, 78.5),
        "indore" => rect(22.0, 75.5, 23.0, 76.5),
        "agartala" => rect(23.5, 91.0, 24.0, 91.5),
        "dhalai" => rect(23.5, 91.5, 24.0, 92.0),
        "bhubaneswar" => rect(20.0, 85.0, 20.5, 85.5),
        "hyderabad" => rect(17.0, 78.0, 17.5, 78.5),
        "village a" => rect(22.675, 77.675, 23.125, 78.125),
        "village b" => rect(22.175, 75.675, 22.625, 76.125),
        "village c" => rect(23.525, 91.025, 23.975, 91.475),
        "village d" => rect(23.525, 91.525, 23.975, 91.975),
        "village e" => rect(20.025, 85.025, 20.475, 85.475),
        "village f" => rect(17.025, 78.025, 17.475, 78.475),
        _ => Bounds::point(DEFAULT_CENTER),
    }
}
