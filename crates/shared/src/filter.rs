use std::collections::BTreeSet;

use crate::claims::{ClaimFeature, ClaimProperties};

/// Display filters over the claims dataset. Empty fields match everything;
/// non-empty fields are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub state: String,
    pub district: String,
    pub village: String,
    pub tribal_group: String,
    /// Empty means every status.
    pub claim_statuses: BTreeSet<String>,
    pub feature_type: String,
}

/// Levels of the location breadcrumb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Crumb {
    Country,
    State,
    District,
    Village,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl FilterState {
    pub fn matches(&self, p: &ClaimProperties) -> bool {
        contains_ci(&p.state, &self.state)
            && contains_ci(&p.district, &self.district)
            && contains_ci(&p.village, &self.village)
            && contains_ci(&p.tribal_group, &self.tribal_group)
            && (self.claim_statuses.is_empty() || self.claim_statuses.contains(&p.status))
            && (self.feature_type.is_empty() || self.feature_type == p.feature_type)
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterState::default()
    }

    pub fn toggle_status(&mut self, status: &str) {
        if !self.claim_statuses.remove(status) {
            self.claim_statuses.insert(status.to_string());
        }
    }

    /// Breadcrumb trail for the current location filters, starting at the
    /// country. Stops at the first empty level.
    pub fn breadcrumb(&self) -> Vec<(Crumb, String)> {
        let mut trail = vec![(Crumb::Country, "India".to_string())];
        for (crumb, value) in [
            (Crumb::State, &self.state),
            (Crumb::District, &self.district),
            (Crumb::Village, &self.village),
        ] {
            if value.trim().is_empty() {
                break;
            }
            trail.push((crumb, value.clone()));
        }
        trail
    }

    /// Navigate the breadcrumb back to `crumb`, clearing finer filters.
    pub fn truncate_to(&mut self, crumb: Crumb) {
        match crumb {
            Crumb::Country => *self = FilterState::default(),
            Crumb::State => {
                self.district.clear();
                self.village.clear();
                self.tribal_group.clear();
            }
            Crumb::District => {
                self.village.clear();
                self.tribal_group.clear();
            }
            Crumb::Village => {}
        }
    }

    /// Clear the location fields, keeping status and type filters.
    pub fn clear_location(&mut self) {
        self.state.clear();
        self.district.clear();
        self.village.clear();
    }
}

/// Claims passing every active filter, in dataset order.
pub fn filter_claims<'a>(claims: &'a [ClaimFeature], filters: &FilterState) -> Vec<&'a ClaimFeature> {
    claims
        .iter()
        .filter(|c| filters.matches(&c.properties))
        .collect()
}
