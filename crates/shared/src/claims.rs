//! Forest-rights claims: the bundled dataset, status styling, and scheme
//! recommendations.

use std::fmt;

use geojson::{Feature, GeoJson, Geometry};
use serde::Deserialize;

use crate::error::ClaimsError;
use crate::geo::{self, Bounds};

const EMBEDDED_CLAIMS: &str = include_str!("../data/claims.geojson");

/// Claim forms under the Forest Rights Act.
pub const FEATURE_TYPES: [&str; 3] = ["IFR", "CR", "CFR"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClaimStatus {
    Approved,
    Pending,
    UnderReview,
    Rejected,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::Approved,
        ClaimStatus::Pending,
        ClaimStatus::UnderReview,
        ClaimStatus::Rejected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Pending => "Pending",
            ClaimStatus::UnderReview => "Under Review",
            ClaimStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(label: &str) -> Option<ClaimStatus> {
        ClaimStatus::ALL.into_iter().find(|s| s.label() == label)
    }

    pub fn color(self) -> &'static str {
        match self {
            ClaimStatus::Approved => "#2f9e44",
            ClaimStatus::Pending => "#f59f00",
            ClaimStatus::UnderReview => "#1c7ed6",
            ClaimStatus::Rejected => "#e03131",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fill colour for a raw status label. Unrecognised labels get the pending
/// colour.
pub fn status_color(status: &str) -> &'static str {
    ClaimStatus::parse(status)
        .unwrap_or(ClaimStatus::Pending)
        .color()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimProperties {
    pub claim_id: String,
    #[serde(default)]
    pub feature_type: String,
    #[serde(default)]
    pub claimant_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub date_filed: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub village: String,
    #[serde(default)]
    pub tribal_group: String,
    #[serde(default)]
    pub eligible_schemes: Vec<String>,
    /// Forest cover density in `0.0..=1.0`, when surveyed.
    #[serde(default)]
    pub density: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClaimFeature {
    pub properties: ClaimProperties,
    pub geometry: Option<Geometry>,
    pub bounds: Option<Bounds>,
}

impl ClaimFeature {
    fn from_feature(index: usize, feature: &Feature) -> Result<Self, ClaimsError> {
        let props = feature.properties.clone().unwrap_or_default();
        let properties: ClaimProperties = serde_json::from_value(serde_json::Value::Object(props))
            .map_err(|e| ClaimsError::Properties {
                index,
                reason: e.to_string(),
            })?;
        Ok(ClaimFeature {
            properties,
            geometry: feature.geometry.clone(),
            bounds: geo::feature_bounds(feature),
        })
    }

    pub fn id(&self) -> &str {
        &self.properties.claim_id
    }

    pub fn color(&self) -> &'static str {
        status_color(&self.properties.status)
    }

    /// Label/value pairs for the claim popup.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let p = &self.properties;
        let schemes = if p.eligible_schemes.is_empty() {
            "None".to_string()
        } else {
            p.eligible_schemes.join(", ")
        };
        vec![
            ("Claimant", p.claimant_name.clone()),
            ("Type", p.feature_type.clone()),
            ("Status", p.status.clone()),
            ("Filed", p.date_filed.clone()),
            ("Village", p.village.clone()),
            ("District", p.district.clone()),
            ("State", p.state.clone()),
            ("Tribal group", p.tribal_group.clone()),
            ("Eligible schemes", schemes),
            ("Recommended", recommend_schemes(p).join(", ")),
        ]
    }
}

/// Parse a claims FeatureCollection.
pub fn parse_claims(text: &str) -> Result<Vec<ClaimFeature>, ClaimsError> {
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| ClaimsError::Parse(e.to_string()))?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(ClaimsError::Parse("expected a FeatureCollection".to_string()));
    };
    collection
        .features
        .iter()
        .enumerate()
        .map(|(i, f)| ClaimFeature::from_feature(i, f))
        .collect()
}

/// The claims bundled with the application.
pub fn embedded_claims() -> Result<Vec<ClaimFeature>, ClaimsError> {
    parse_claims(EMBEDDED_CLAIMS)
}

/// Government schemes a claim may qualify for. Returns `["None"]` when no
/// rule applies.
pub fn recommend_schemes(p: &ClaimProperties) -> Vec<&'static str> {
    let mut out = Vec::new();
    if p.status == "Approved" || p.feature_type == "Agricultural" {
        out.push("PM-KISAN");
    }
    if p.density.is_some_and(|d| d < 0.5) || p.feature_type == "Water" {
        out.push("Jal Jeevan Mission");
    }
    let community = p.feature_type == "CR" || p.feature_type == "CFR";
    if community && (p.status == "Approved" || p.status == "Pending") {
        out.push("MGNREGA");
    }
    if !p.tribal_group.trim().is_empty() {
        out.push("DAJGUA");
    }
    if out.is_empty() {
        out.push("None");
    }
    out
}
