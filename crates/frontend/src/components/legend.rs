use dioxus::prelude::*;
use fra_shared::claims::ClaimStatus;
use fra_shared::render::{DISTRICTS_STYLE, SEARCH_STYLE, STATES_STYLE};

#[component]
pub fn Legend() -> Element {
    let statuses: Vec<(&str, &str)> = ClaimStatus::ALL
        .into_iter()
        .map(|s| (s.label(), s.color()))
        .collect();
    let boundaries = [
        ("State boundary", STATES_STYLE.stroke),
        ("District boundary", DISTRICTS_STYLE.stroke),
        ("Searched district", SEARCH_STYLE.stroke),
    ];

    rsx! {
        div { class: "panel legend",
            h3 { "Legend" }
            for (label, color) in statuses {
                div { class: "legend-row",
                    span { class: "swatch", style: "background: {color};" }
                    "{label}"
                }
            }
            for (label, color) in boundaries {
                div { class: "legend-row",
                    span { class: "swatch outline", style: "border-color: {color};" }
                    "{label}"
                }
            }
        }
    }
}
