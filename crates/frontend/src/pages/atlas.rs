use dioxus::prelude::*;
use fra_shared::basemap::Basemap;
use fra_shared::claims::{embedded_claims, ClaimFeature};
use fra_shared::drawing::DrawingTools;
use fra_shared::filter::{filter_claims, FilterState};
use fra_shared::navigator::NavEvent;

use crate::api;
use crate::components::claim_popup::MapPopup;
use crate::components::drawing_panel::DrawingPanel;
use crate::components::filter_panel::FilterPanel;
use crate::components::header::Header;
use crate::components::layer_control::LayerControl;
use crate::components::legend::Legend;
use crate::components::map_view::MapView;
use crate::components::search_panel::SearchPanel;
use crate::driver::{self, use_map_driver};

fn load_claims() -> Vec<ClaimFeature> {
    match embedded_claims() {
        Ok(claims) => {
            tracing::info!(count = claims.len(), "claims loaded");
            claims
        }
        Err(e) => {
            tracing::error!(error = %e, "claims dataset failed to load");
            driver::alert(&format!("Could not load claims: {e}"));
            Vec::new()
        }
    }
}

#[component]
pub fn Atlas() -> Element {
    let config = use_hook(api::load_config);
    let prefs = use_hook(api::load_preferences);
    let driver = use_map_driver(&config);

    let basemap = use_signal(|| prefs.basemap());
    let claims = use_signal(load_claims);
    let mut filters = use_signal(FilterState::default);
    let drawing = use_signal(DrawingTools::new);
    let mut popup = use_signal(|| None::<MapPopup>);

    // Restore the boundary toggle once, after the first render.
    use_hook(move || {
        spawn(async move {
            if prefs.show_boundaries {
                driver.dispatch(NavEvent::SetBoundariesEnabled(true));
            }
        })
    });

    let mut reset_to_country = move || {
        driver.dispatch(NavEvent::ResetToCountry);
        filters.write().clear_location();
        popup.set(None);
    };

    let total = claims.read().len();
    let matching = filter_claims(&claims.read(), &filters.read()).len();
    let loading = driver.is_loading();

    rsx! {
        div { class: "app",
            Header {
                filters: filters,
                loading: loading,
                on_country: move |_| reset_to_country(),
            }

            div { class: "sidebar",
                LayerControl {
                    driver: driver,
                    basemap: basemap,
                    on_reset: move |_| reset_to_country(),
                }
                SearchPanel {
                    driver: driver,
                    claims: claims,
                    filters: filters,
                }
                FilterPanel {
                    filters: filters,
                    matching: matching,
                    total: total,
                }
                DrawingPanel { drawing: drawing }
                Legend {}
            }

            MapView {
                driver: driver,
                claims: claims,
                filters: filters,
                basemap: basemap,
                drawing: drawing,
                popup: popup,
            }
        }
    }
}
