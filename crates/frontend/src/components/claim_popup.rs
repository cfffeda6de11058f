use dioxus::prelude::*;
use fra_shared::claims::ClaimFeature;
use fra_shared::geo::LatLng;

/// Popup anchored to a map position.
#[derive(Debug, Clone, PartialEq)]
pub enum MapPopup {
    Claim { id: String, at: LatLng },
    Boundary { text: String, at: LatLng },
}

impl MapPopup {
    pub fn at(&self) -> LatLng {
        match self {
            MapPopup::Claim { at, .. } | MapPopup::Boundary { at, .. } => *at,
        }
    }

    pub fn claim_id(&self) -> Option<&str> {
        match self {
            MapPopup::Claim { id, .. } => Some(id),
            MapPopup::Boundary { .. } => None,
        }
    }
}

#[component]
pub fn ClaimPopup(claim: ClaimFeature, x: f64, y: f64, on_close: EventHandler<()>) -> Element {
    let rows = claim.summary();
    let color = claim.color();
    let id = claim.id().to_string();

    rsx! {
        div {
            class: "map-popup claim-popup",
            style: "left: {x}px; top: {y}px;",
            onmousedown: move |evt| evt.stop_propagation(),
            onmouseup: move |evt| evt.stop_propagation(),
            div { class: "popup-header",
                span { class: "status-dot", style: "background: {color};" }
                strong { "{id}" }
                button {
                    class: "popup-close",
                    "aria-label": "Close",
                    onclick: move |_| on_close.call(()),
                    "×"
                }
            }
            if !claim.properties.description.is_empty() {
                p { class: "popup-description", "{claim.properties.description}" }
            }
            table {
                for (label, value) in rows {
                    tr {
                        th { "{label}" }
                        td { "{value}" }
                    }
                }
            }
        }
    }
}
