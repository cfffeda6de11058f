use dioxus::prelude::*;
use fra_shared::filter::{Crumb, FilterState};

/// Apply a breadcrumb click to the filters. Returns true when the map must
/// also go back to the country view.
fn follow_crumb(filters: &mut FilterState, crumb: Crumb) -> bool {
    filters.truncate_to(crumb);
    crumb == Crumb::Country
}

#[component]
pub fn Header(filters: Signal<FilterState>, loading: bool, on_country: EventHandler<()>) -> Element {
    let mut filters = filters;
    let trail = filters.read().breadcrumb();
    let last = trail.len().saturating_sub(1);

    rsx! {
        div { class: "header",
            h1 { "FRA Atlas" }
            nav { class: "breadcrumb", "aria-label": "Location",
                for (i, (crumb, name)) in trail.into_iter().enumerate() {
                    if i > 0 {
                        span { class: "crumb-sep", "›" }
                    }
                    if i == last {
                        span { class: "crumb current", "{name}" }
                    } else {
                        button {
                            class: "crumb",
                            onclick: move |_| {
                                if follow_crumb(&mut filters.write(), crumb) {
                                    on_country.call(());
                                }
                            },
                            "{name}"
                        }
                    }
                }
            }
            if loading {
                span { class: "header-status", "Loading…" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy_filters() -> FilterState {
        let mut f = FilterState {
            state: "Odisha".into(),
            district: "Mayurbhanj".into(),
            tribal_group: "Santhal".into(),
            feature_type: "IFR".into(),
            ..FilterState::default()
        };
        f.toggle_status("Pending");
        f
    }

    #[test]
    fn test_country_crumb_clears_every_filter() {
        let mut f = busy_filters();
        assert!(follow_crumb(&mut f, Crumb::Country));
        assert!(f.is_empty());
    }

    #[test]
    fn test_state_crumb_keeps_status_filters() {
        let mut f = busy_filters();
        assert!(!follow_crumb(&mut f, Crumb::State));
        assert_eq!(f.state, "Odisha");
        assert!(f.district.is_empty());
        assert!(f.tribal_group.is_empty());
        assert!(f.claim_statuses.contains("Pending"));
    }
}
