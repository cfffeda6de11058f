use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use fra_shared::basemap::Basemap;
use fra_shared::claims::ClaimFeature;
use fra_shared::drawing::{DrawingTools, Shape};
use fra_shared::filter::{filter_claims, FilterState};
use fra_shared::geo::{self, LatLng, EARTH_RADIUS_M};
use fra_shared::layers::LayerKind;
use fra_shared::viewport::Viewport;

use crate::components::claim_popup::{ClaimPopup, MapPopup};
use crate::coords::{self, MAP_CONTAINER_ID};
use crate::driver::MapDriver;
use crate::surface::SvgSurface;

/// Drag threshold in pixels. Movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Touch drag threshold, larger than for the mouse.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

/// Zoom levels per wheel notch.
const ZOOM_STEP: f64 = 0.5;

const DRAW_COLOR: &str = "#3388ff";
const SELECTED_STROKE: &str = "#212529";

// ---------------------------------------------------------------------------
// Pointer math (pure functions, easily testable)
// ---------------------------------------------------------------------------

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Distance between two client-coordinate points (for touch threshold checks).
fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Zoom change for a pinch that went from `start` to `now` finger spacing.
fn pinch_zoom_delta(start: f64, now: f64) -> f64 {
    if start < 1.0 || now < 1.0 {
        return 0.0;
    }
    (now / start).log2()
}

/// On-screen radius of a circle of `radius_m` metres centred at `center`.
fn radius_px(viewport: &Viewport, center: LatLng, radius_m: f64) -> f64 {
    let north = LatLng::new(center.lat + (radius_m / EARTH_RADIUS_M).to_degrees(), center.lng);
    let (_, y0) = viewport.to_screen(center);
    let (_, y1) = viewport.to_screen(north);
    (y0 - y1).abs()
}

// ---------------------------------------------------------------------------
// Hit testing
// ---------------------------------------------------------------------------

/// Topmost visible claim under `at`. Claims draw in dataset order, so the
/// last match is on top.
fn hit_claim<'a>(claims: &[&'a ClaimFeature], at: LatLng) -> Option<&'a ClaimFeature> {
    claims.iter().rev().copied().find(|c| {
        c.bounds.is_some_and(|b| b.contains(at))
            && c.geometry.as_ref().is_some_and(|g| geo::geometry_contains(g, at))
    })
}

fn boundary_popup_text(kind: LayerKind, label: &str) -> String {
    match kind {
        LayerKind::States => format!("State: {label}"),
        LayerKind::Districts | LayerKind::Search => format!("District: {label}"),
    }
}

/// Route a click at `at`: drawing first, then claims, then boundaries.
fn handle_map_click(
    at: LatLng,
    driver: MapDriver,
    visible_claims: &[&ClaimFeature],
    drawing: &mut Signal<DrawingTools>,
    popup: &mut Signal<Option<MapPopup>>,
) {
    if drawing.read().active_mode().is_some() {
        if let Err(e) = drawing.write().add_point(at) {
            tracing::warn!(error = %e, "drawing point rejected");
        }
        return;
    }

    if let Some(claim) = hit_claim(visible_claims, at) {
        tracing::debug!(claim = claim.id(), "claim clicked");
        popup.set(Some(MapPopup::Claim {
            id: claim.id().to_string(),
            at,
        }));
        return;
    }

    let hit = driver
        .surface
        .read()
        .hit_test(at)
        .map(|(layer, feature)| (layer.kind, feature.label.clone(), feature.click.clone()));
    match hit {
        Some((kind, label, click)) => {
            popup.set(Some(MapPopup::Boundary {
                text: boundary_popup_text(kind, &label),
                at,
            }));
            if let Some(action) = click {
                driver.dispatch(action.into_event());
            }
        }
        None => popup.set(None),
    }
}

// ---------------------------------------------------------------------------
// SVG builder
// ---------------------------------------------------------------------------

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn build_tiles(svg: &mut String, viewport: &Viewport, basemap: Basemap) {
    for tile in viewport.visible_tiles() {
        if tile.coord.z > basemap.max_zoom() {
            continue;
        }
        // Half a pixel of overlap hides seams between tiles.
        svg.push_str(&format!(
            r#"<image href="{}" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" preserveAspectRatio="none"/>"#,
            escape_xml(&basemap.tile_url(tile.coord)),
            tile.left,
            tile.top,
            tile.size + 0.5,
            tile.size + 0.5,
        ));
    }
}

fn build_boundaries(svg: &mut String, surface: &SvgSurface) {
    let viewport = &surface.viewport;
    for layer in surface.layers() {
        let s = layer.style;
        svg.push_str(&format!(
            r#"<g class="boundary-layer" fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{}" fill-rule="evenodd">"#,
            s.fill, s.fill_opacity, s.stroke, s.weight
        ));
        for feature in &layer.features {
            let Some(geometry) = &feature.geometry else {
                continue;
            };
            let d = coords::geometry_path(viewport, geometry);
            if d.is_empty() {
                continue;
            }
            svg.push_str(&format!(
                r#"<path d="{d}"><title>{}</title></path>"#,
                escape_xml(&feature.label)
            ));
        }
        svg.push_str("</g>");
    }
}

fn build_claims(svg: &mut String, viewport: &Viewport, claims: &[&ClaimFeature], selected: Option<&str>) {
    for claim in claims {
        let Some(geometry) = &claim.geometry else {
            continue;
        };
        let d = coords::geometry_path(viewport, geometry);
        if d.is_empty() {
            continue;
        }
        let color = claim.color();
        let (stroke, width) = if selected == Some(claim.id()) {
            (SELECTED_STROKE, 3)
        } else {
            (color, 2)
        };
        svg.push_str(&format!(
            r##"<g role="img"><title>{} ({})</title><path d="{d}" fill="{color}" fill-opacity="0.5" stroke="{stroke}" stroke-width="{width}"/></g>"##,
            escape_xml(claim.id()),
            escape_xml(&claim.properties.status),
        ));
    }
}

fn build_drawings(svg: &mut String, viewport: &Viewport, tools: &DrawingTools) {
    for drawn in tools.shapes() {
        match &drawn.shape {
            Shape::Polygon(points) => {
                let d = points_path(viewport, points, true);
                svg.push_str(&format!(
                    r#"<path d="{d}" fill="{DRAW_COLOR}" fill-opacity="0.5" stroke="{DRAW_COLOR}" stroke-width="2"/>"#
                ));
            }
            Shape::Circle { center, radius_m } => {
                let (cx, cy) = viewport.to_screen(*center);
                let r = radius_px(viewport, *center, *radius_m);
                svg.push_str(&format!(
                    r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{DRAW_COLOR}" fill-opacity="0.5" stroke="{DRAW_COLOR}" stroke-width="2"/>"#
                ));
            }
            Shape::Marker(p) => {
                let (cx, cy) = viewport.to_screen(*p);
                svg.push_str(&format!(
                    r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="6" fill="{DRAW_COLOR}" stroke="white" stroke-width="2"/>"#
                ));
            }
        }
    }

    let pending = tools.pending_points();
    if !pending.is_empty() {
        let d = points_path(viewport, pending, false);
        svg.push_str(&format!(
            r#"<path d="{d}" fill="none" stroke="{DRAW_COLOR}" stroke-width="2" stroke-dasharray="6 4"/>"#
        ));
        for p in pending {
            let (cx, cy) = viewport.to_screen(*p);
            svg.push_str(&format!(
                r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="4" fill="white" stroke="{DRAW_COLOR}" stroke-width="2"/>"#
            ));
        }
    }
}

fn points_path(viewport: &Viewport, points: &[LatLng], close: bool) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let (x, y) = viewport.to_screen(*p);
        d.push_str(&format!("{}{x:.1} {y:.1}", if i == 0 { 'M' } else { 'L' }));
    }
    if close && points.len() > 2 {
        d.push('Z');
    }
    d
}

/// Full SVG overlay: basemap tiles, boundaries, claims, then drawings.
fn build_svg_content(
    surface: &SvgSurface,
    basemap: Basemap,
    claims: &[&ClaimFeature],
    selected_claim: Option<&str>,
    tools: &DrawingTools,
) -> String {
    let viewport = &surface.viewport;
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="position:absolute;top:0;left:0;pointer-events:none;">"#,
        w = viewport.width,
        h = viewport.height,
    ));
    build_tiles(&mut svg, viewport, basemap);
    build_boundaries(&mut svg, surface);
    build_claims(&mut svg, viewport, claims, selected_claim);
    build_drawings(&mut svg, viewport, tools);
    svg.push_str("</svg>");
    svg
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(
    driver: MapDriver,
    claims: ReadSignal<Vec<ClaimFeature>>,
    filters: ReadSignal<FilterState>,
    basemap: ReadSignal<Basemap>,
    drawing: Signal<DrawingTools>,
    popup: Signal<Option<MapPopup>>,
) -> Element {
    // Mutable bindings (Signal is Copy)
    let mut drawing = drawing;
    let mut popup = popup;
    let mut surface = driver.surface;

    // Drag state (mouse)
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0_f64, 0.0_f64));
    let mut drag_start_view = use_signal(|| surface.peek().viewport);

    // Touch state
    let mut touch_start_pos = use_signal(|| None::<(f64, f64)>);
    let mut touch_did_pan = use_signal(|| false);
    let mut is_pinching = use_signal(|| false);
    let mut pinch_start_distance = use_signal(|| 0.0_f64);
    let mut pinch_midpoint = use_signal(|| (0.0_f64, 0.0_f64));

    let mut cursor = use_signal(|| None::<LatLng>);

    let svg_html = use_memo(move || {
        let surface = surface.read();
        let claims = claims.read();
        let filters = filters.read();
        let visible = filter_claims(&claims, &filters);
        let popup = popup.read();
        let selected = popup.as_ref().and_then(MapPopup::claim_id);
        build_svg_content(&surface, *basemap.read(), &visible, selected, &drawing.read())
    });

    let mut click_at = move |x: f64, y: f64| {
        let at = surface.read().viewport.to_lat_lng(x, y);
        let claims = claims.read();
        let filters = filters.read();
        let visible = filter_claims(&claims, &filters);
        handle_map_click(at, driver, &visible, &mut drawing, &mut popup);
    };

    let viewport = surface.read().viewport;
    let dragging = *is_dragging.read();
    let draw_mode = drawing.read().active_mode();
    let container_class = if dragging {
        "map-container dragging"
    } else if draw_mode.is_some() {
        "map-container drawing"
    } else {
        "map-container"
    };
    let loading = driver.is_loading();
    let current_basemap = *basemap.read();
    let basemap_name = current_basemap.display_name();
    let attribution = current_basemap.attribution();
    let zoom_label = format!("{:.1}", viewport.zoom);
    let cursor_label = (*cursor.read()).map(coords::format_lat_lng);

    let popup_el = match popup.read().clone() {
        Some(MapPopup::Claim { id, at }) => {
            let (x, y) = viewport.to_screen(at);
            let claim = claims.read().iter().find(|c| c.id() == id).cloned();
            match claim {
                Some(claim) => rsx! {
                    ClaimPopup {
                        claim: claim,
                        x: x,
                        y: y,
                        on_close: move |_| popup.set(None),
                    }
                },
                None => rsx! {},
            }
        }
        Some(MapPopup::Boundary { text, at }) => {
            let (x, y) = viewport.to_screen(at);
            rsx! {
                div {
                    class: "map-popup boundary-popup",
                    style: "left: {x}px; top: {y}px;",
                    "{text}"
                }
            }
        }
        None => rsx! {},
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onmounted: move |_| {
                if let Some((w, h)) = coords::container_size() {
                    surface.write().viewport.resize(w, h);
                }
            },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let client = evt.data().client_coordinates();
                let Some((x, y)) = coords::container_point(client.x, client.y) else { return };

                let delta_y = wheel_delta_y(evt.data().delta());
                if delta_y == 0.0 {
                    return;
                }
                let step = if delta_y < 0.0 { ZOOM_STEP } else { -ZOOM_STEP };
                let new_z = surface.read().viewport.zoom + step;
                surface.write().viewport.zoom_at(x, y, new_z);
            },

            onmousedown: move |evt: Event<MouseData>| {
                // Only track drag/click for left mouse button
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                if let Some((w, h)) = coords::container_size() {
                    surface.write().viewport.resize(w, h);
                }
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set((client.x, client.y));
                drag_start_view.set(surface.read().viewport);
            },

            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                if let Some((x, y)) = coords::container_point(client.x, client.y) {
                    cursor.set(Some(surface.read().viewport.to_lat_lng(x, y)));
                }
                if !*is_dragging.read() {
                    return;
                }
                let (sx, sy) = *drag_start.read();
                let dx = client.x - sx;
                let dy = client.y - sy;

                if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    let mut view = *drag_start_view.read();
                    view.pan_by(dx, dy);
                    surface.write().viewport = view;
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                is_dragging.set(false);

                // A mouseup without drag movement = a click
                if was_dragging && !was_drag {
                    let client = evt.client_coordinates();
                    if let Some((x, y)) = coords::container_point(client.x, client.y) {
                        click_at(x, y);
                    }
                }
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
                cursor.set(None);
            },

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                if drawing.read().active_mode().is_some() {
                    if let Err(e) = drawing.write().finish() {
                        tracing::debug!(error = %e, "double-click did not finish shape");
                    }
                    return;
                }
                let client = evt.client_coordinates();
                if let Some((x, y)) = coords::container_point(client.x, client.y) {
                    let new_z = surface.read().viewport.zoom + 1.0;
                    surface.write().viewport.zoom_at(x, y, new_z);
                }
            },

            // --- Touch event handlers ---

            ontouchstart: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();
                if touches.len() == 1 {
                    // Single finger: record start position for tap detection and panning
                    let t = &touches[0];
                    touch_start_pos.set(Some((t.client_coordinates().x, t.client_coordinates().y)));
                    touch_did_pan.set(false);
                    drag_start_view.set(surface.read().viewport);
                } else if touches.len() >= 2 {
                    // Two fingers: start pinch-to-zoom
                    let p0 = (touches[0].client_coordinates().x, touches[0].client_coordinates().y);
                    let p1 = (touches[1].client_coordinates().x, touches[1].client_coordinates().y);
                    is_pinching.set(true);
                    pinch_start_distance.set(point_distance(p0, p1));
                    pinch_midpoint.set(((p0.0 + p1.0) / 2.0, (p0.1 + p1.1) / 2.0));
                    drag_start_view.set(surface.read().viewport);
                    // Cancel any tap tracking
                    touch_start_pos.set(None);
                    touch_did_pan.set(true);
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();

                if *is_pinching.read() && touches.len() >= 2 {
                    let p0 = (touches[0].client_coordinates().x, touches[0].client_coordinates().y);
                    let p1 = (touches[1].client_coordinates().x, touches[1].client_coordinates().y);
                    let delta = pinch_zoom_delta(*pinch_start_distance.read(), point_distance(p0, p1));

                    let mid = *pinch_midpoint.read();
                    let Some((x, y)) = coords::container_point(mid.0, mid.1) else { return };
                    let mut view = *drag_start_view.read();
                    view.zoom_at(x, y, view.zoom + delta);
                    surface.write().viewport = view;
                } else if touches.len() == 1 {
                    let t = &touches[0];
                    let cur = (t.client_coordinates().x, t.client_coordinates().y);
                    if let Some(start) = *touch_start_pos.read() {
                        if !*touch_did_pan.read() && point_distance(start, cur) > TOUCH_DRAG_THRESHOLD {
                            touch_did_pan.set(true);
                        }
                        if *touch_did_pan.read() {
                            let mut view = *drag_start_view.read();
                            view.pan_by(cur.0 - start.0, cur.1 - start.1);
                            surface.write().viewport = view;
                        }
                    }
                }
            },

            ontouchend: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let remaining = evt.data().touches().len();

                if *is_pinching.read() {
                    // Wait for all fingers to lift before resetting pinch state
                    if remaining == 0 {
                        is_pinching.set(false);
                        touch_start_pos.set(None);
                    }
                    return;
                }

                if remaining == 0 && !*touch_did_pan.read() {
                    let start = *touch_start_pos.read();
                    if let Some((cx, cy)) = start {
                        if let Some((x, y)) = coords::container_point(cx, cy) {
                            click_at(x, y);
                        }
                    }
                }

                if remaining == 0 {
                    touch_start_pos.set(None);
                }
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                touch_start_pos.set(None);
                touch_did_pan.set(false);
                is_pinching.set(false);
            },

            div {
                class: "map-layers",
                dangerous_inner_html: "{svg_html}",
            }

            {popup_el}

            if loading {
                div { class: "map-loading", "Loading boundaries…" }
            }

            div { class: "coord-readout",
                span { class: "coord-tag", "Zoom {zoom_label}" }
                if let Some(label) = cursor_label {
                    span { class: "coord-tag", "{label}" }
                }
            }

            div { class: "map-attribution", "{basemap_name} · {attribution}" }
        }
    }
}
