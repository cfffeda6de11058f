use dioxus::prelude::*;
use fra_shared::drawing::{DrawMode, DrawingTools};
use geojson::FeatureCollection;

/// Drawn shapes as a GeoJSON FeatureCollection string.
fn export_geojson(tools: &DrawingTools) -> String {
    let collection = FeatureCollection {
        bbox: None,
        features: tools.shapes().iter().map(|s| s.to_feature()).collect(),
        foreign_members: None,
    };
    collection.to_string()
}

fn hint(mode: DrawMode, placed: usize) -> String {
    match mode {
        DrawMode::Marker => "Click the map to place a marker".to_string(),
        DrawMode::Rectangle if placed == 0 => "Click the first corner".to_string(),
        DrawMode::Rectangle => "Click the opposite corner".to_string(),
        DrawMode::Circle if placed == 0 => "Click the centre".to_string(),
        DrawMode::Circle => "Click a point on the edge".to_string(),
        DrawMode::Polygon => format!("{placed} points placed. Double-click or Finish to close"),
    }
}

#[component]
pub fn DrawingPanel(drawing: Signal<DrawingTools>) -> Element {
    let mut drawing = drawing;
    let tools = drawing.read();
    let active = tools.active_mode();
    let placed = tools.pending_points().len();
    let modes: Vec<(DrawMode, &str, bool)> = DrawMode::ALL
        .into_iter()
        .map(|m| (m, m.label(), active == Some(m)))
        .collect();
    let shapes: Vec<(u64, &str)> = tools.shapes().iter().map(|s| (s.id, s.mode.label())).collect();
    let hint_text = active.map(|m| hint(m, placed));
    drop(tools);

    rsx! {
        div { class: "panel",
            h3 { "Draw" }
            div { class: "draw-modes",
                for (mode, label, is_active) in modes {
                    button {
                        class: if is_active { "active" } else { "" },
                        onclick: move |_| drawing.write().start(mode),
                        "{label}"
                    }
                }
            }
            if let Some(text) = hint_text {
                div { class: "draw-hint", "{text}" }
                div { class: "draw-actions",
                    if active == Some(DrawMode::Polygon) {
                        button {
                            onclick: move |_| {
                                if let Err(e) = drawing.write().finish() {
                                    crate::driver::alert(&e.to_string());
                                }
                            },
                            "Finish"
                        }
                    }
                    button {
                        class: "secondary",
                        onclick: move |_| drawing.write().cancel(),
                        "Cancel"
                    }
                }
            }
            if !shapes.is_empty() {
                ul { class: "shape-list",
                    for (id, label) in shapes {
                        li { key: "{id}",
                            "{label} #{id}"
                            button {
                                class: "link",
                                "aria-label": "Remove shape",
                                onclick: move |_| {
                                    drawing.write().remove(id);
                                },
                                "Remove"
                            }
                        }
                    }
                }
                div { class: "draw-actions",
                    button {
                        class: "secondary",
                        onclick: move |_| {
                            let json = export_geojson(&drawing.read());
                            wasm_bindgen_futures::spawn_local(async move {
                                if let Some(window) = web_sys::window() {
                                    let clipboard = window.navigator().clipboard();
                                    let _ = wasm_bindgen_futures::JsFuture::from(
                                        clipboard.write_text(&json)
                                    ).await;
                                }
                            });
                        },
                        "Copy GeoJSON"
                    }
                    button {
                        class: "secondary",
                        onclick: move |_| drawing.write().clear(),
                        "Clear all"
                    }
                }
            }
        }
    }
}
