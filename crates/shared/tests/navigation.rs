//! End-to-end navigation: navigator, fetcher and a recording map surface
//! wired together the way the frontend wires them.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use fra_shared::claims::embedded_claims;
use fra_shared::config::AtlasConfig;
use fra_shared::error::{BoundaryError, SurfaceError};
use fra_shared::filter::{filter_claims, FilterState};
use fra_shared::geo::{Bounds, LatLng};
use fra_shared::layers::{LayerHandle, LayerKind};
use fra_shared::navigator::{BoundaryNavigator, NavEvent};
use fra_shared::region::{self, RegionKey};
use fra_shared::render::{apply_commands, ClickAction, MapSurface, VectorLayer};
use fra_shared::selection::Level;
use fra_shared::source::{BoundaryFetcher, BoundaryTransport, FetchRequest, HttpResponse};
use url::Url;

const BASE: &str = "https://shapes.test/master";

fn square(prop: &str, name: &str, west: f64, south: f64, size: f64) -> String {
    let (e, n) = (west + size, south + size);
    format!(
        r#"{{"type":"Feature","properties":{{"{prop}":"{name}"}},
            "geometry":{{"type":"Polygon","coordinates":[[[{west},{south}],[{e},{south}],[{e},{n}],[{west},{n}],[{west},{south}]]]}}}}"#
    )
}

fn collection(features: &[String]) -> String {
    format!(r#"{{"type":"FeatureCollection","features":[{}]}}"#, features.join(","))
}

#[derive(Default)]
struct CountingTransport {
    responses: HashMap<String, HttpResponse>,
    calls: RefCell<Vec<String>>,
}

impl CountingTransport {
    fn with_fixtures() -> Self {
        let base = Url::parse(BASE).unwrap();
        let mut t = CountingTransport::default();
        t.ok(
            region::states_url(&base).unwrap(),
            collection(&[
                square("STNAME", "Odisha", 81.0, 17.5, 5.0),
                square("STNAME", "Bihar", 83.0, 24.5, 4.0),
                square("STNAME", "Madhya Pradesh", 74.0, 21.0, 5.0),
            ]),
        );
        t.ok(
            region::districts_url(&base, &RegionKey::new("Odisha")).unwrap(),
            collection(&[
                square("dtname", "Cuttack", 85.5, 20.2, 0.6),
                square("dtname", "Khordha", 85.0, 19.8, 0.5),
            ]),
        );
        t.ok(
            region::districts_url(&base, &RegionKey::new("Bihar")).unwrap(),
            collection(&[square("DISTRICT", "Patna", 85.0, 25.3, 0.5)]),
        );
        t.ok(
            region::districts_url(&base, &RegionKey::new("Madhya Pradesh")).unwrap(),
            collection(&[
                square("dtname", "Bhopal", 77.2, 23.0, 0.5),
                square("dtname", "INDORE ", 75.6, 22.4, 0.6),
            ]),
        );
        t
    }

    fn ok(&mut self, url: Url, body: String) {
        self.responses
            .insert(url.to_string(), HttpResponse { status: 200, body });
    }

    fn calls_to(&self, needle: &str) -> usize {
        self.calls.borrow().iter().filter(|u| u.contains(needle)).count()
    }
}

impl BoundaryTransport for CountingTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, String> {
        self.calls.borrow_mut().push(url.to_string());
        Ok(self.responses.get(url.as_str()).cloned().unwrap_or(HttpResponse {
            status: 404,
            body: "404: Not Found".to_string(),
        }))
    }
}

#[derive(Default)]
struct RecordingSurface {
    layers: BTreeMap<LayerHandle, VectorLayer>,
    fits: Vec<(Bounds, f64)>,
    views: Vec<(LatLng, f64)>,
}

impl MapSurface for RecordingSurface {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.views.push((center, zoom));
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: f64) {
        self.fits.push((bounds, padding));
    }

    fn add_layer(&mut self, handle: LayerHandle, layer: VectorLayer) {
        self.layers.insert(handle, layer);
    }

    fn remove_layer(&mut self, handle: LayerHandle) -> Result<(), SurfaceError> {
        self.layers
            .remove(&handle)
            .map(|_| ())
            .ok_or(SurfaceError::NotAttached(handle))
    }
}

impl RecordingSurface {
    fn count(&self, kind: LayerKind) -> usize {
        self.layers.values().filter(|l| l.kind == kind).count()
    }

    fn layer(&self, kind: LayerKind) -> Option<&VectorLayer> {
        self.layers.values().find(|l| l.kind == kind)
    }

    /// Click the feature labelled `label` on the layer of `kind`.
    fn click(&self, kind: LayerKind, label: &str) -> ClickAction {
        self.layer(kind)
            .and_then(|l| l.features.iter().find(|f| f.label == label))
            .and_then(|f| f.click.clone())
            .unwrap_or_else(|| panic!("no clickable {label} on {kind:?} layer"))
    }
}

struct Harness {
    nav: BoundaryNavigator,
    fetcher: BoundaryFetcher<CountingTransport>,
    surface: RecordingSurface,
    queued: Vec<FetchRequest>,
    notices: Vec<BoundaryError>,
}

impl Harness {
    fn new() -> Self {
        let config = AtlasConfig {
            boundary_base_url: Url::parse(BASE).unwrap(),
            ..AtlasConfig::default()
        };
        Harness {
            fetcher: BoundaryFetcher::new(
                CountingTransport::with_fixtures(),
                config.boundary_base_url.clone(),
            ),
            nav: BoundaryNavigator::new(config),
            surface: RecordingSurface::default(),
            queued: Vec::new(),
            notices: Vec::new(),
        }
    }

    fn send(&mut self, event: NavEvent) {
        let commands = self.nav.handle(event);
        let follow_up = apply_commands(&mut self.surface, commands, self.nav.cache());
        self.queued.extend(follow_up.fetches);
        self.notices.extend(follow_up.notices);

        assert!(self.surface.count(LayerKind::Districts) <= 1);
        assert_eq!(self.surface.layers.len(), self.nav.layers().handles().len());
        assert!(self.nav.selection().is_consistent());
    }

    fn click(&mut self, kind: LayerKind, label: &str) {
        let action = self.surface.click(kind, label);
        self.send(action.into_event());
    }

    async fn resolve(&mut self, index: usize) {
        let request = self.queued.remove(index);
        let result = self.fetcher.fetch_request(&request).await;
        let event = match request {
            FetchRequest::States => NavEvent::StatesLoaded(result),
            FetchRequest::Districts { state } => NavEvent::DistrictsLoaded { state, result },
        };
        self.send(event);
    }

    async fn resolve_all(&mut self) {
        while !self.queued.is_empty() {
            self.resolve(0).await;
        }
    }

    fn calls_to(&self, needle: &str) -> usize {
        self.fetcher.transport().calls_to(needle)
    }

    async fn enabled() -> Self {
        let mut h = Harness::new();
        h.send(NavEvent::SetBoundariesEnabled(true));
        h.resolve_all().await;
        assert_eq!(h.surface.count(LayerKind::States), 1);
        h
    }
}

#[tokio::test]
async fn test_states_fetched_once_across_toggles() {
    let mut h = Harness::enabled().await;
    h.send(NavEvent::SetBoundariesEnabled(false));
    assert!(h.surface.layers.is_empty());
    h.send(NavEvent::SetBoundariesEnabled(true));
    h.resolve_all().await;

    assert_eq!(h.surface.count(LayerKind::States), 1);
    assert_eq!(h.calls_to("INDIA_STATES"), 1);
}

#[tokio::test]
async fn test_odisha_click_fits_before_fetch_resolves() {
    let mut h = Harness::enabled().await;
    h.click(LayerKind::States, "Odisha");

    assert_eq!(h.nav.selection().selected_state(), Some("Odisha"));
    assert_eq!(h.nav.selection().level(), Level::State);
    assert_eq!(h.surface.fits.len(), 1);
    assert_eq!(h.surface.fits[0].1, 50.0);
    assert_eq!(
        h.queued,
        vec![FetchRequest::Districts {
            state: "Odisha".into()
        }]
    );
    assert!(h.nav.is_loading());

    h.resolve_all().await;
    assert_eq!(h.calls_to("ORISSA/ODISHA_DISTRICTS"), 1);
    assert_eq!(h.surface.count(LayerKind::Districts), 1);
    assert!(!h.nav.is_loading());
}

#[tokio::test]
async fn test_late_odisha_districts_discarded_after_bihar_click() {
    let mut h = Harness::enabled().await;
    h.click(LayerKind::States, "Odisha");
    h.click(LayerKind::States, "Bihar");
    assert_eq!(h.queued.len(), 2);

    // Odisha resolves first, after the selection moved on.
    h.resolve(0).await;
    assert_eq!(h.surface.count(LayerKind::Districts), 0);

    h.resolve(0).await;
    let districts = h.surface.layer(LayerKind::Districts).unwrap();
    assert_eq!(districts.features[0].label, "Patna");

    // Going back to Odisha uses the cached document.
    h.click(LayerKind::States, "Odisha");
    assert!(h.queued.is_empty());
    assert_eq!(h.surface.layer(LayerKind::Districts).unwrap().features.len(), 2);
    assert_eq!(h.calls_to("ODISHA_DISTRICTS"), 1);
}

#[tokio::test]
async fn test_district_click_keeps_layers() {
    let mut h = Harness::enabled().await;
    h.click(LayerKind::States, "Odisha");
    h.resolve_all().await;
    h.click(LayerKind::Districts, "Cuttack");

    assert_eq!(h.nav.selection().level(), Level::District);
    assert_eq!(h.nav.selection().selected_district(), Some("Cuttack"));
    assert_eq!(h.surface.count(LayerKind::States), 1);
    assert_eq!(h.surface.count(LayerKind::Districts), 1);
    assert_eq!(h.surface.fits.last().unwrap().1, 0.0);
}

#[tokio::test]
async fn test_search_indore_shows_single_feature() {
    let mut h = Harness::enabled().await;
    h.click(LayerKind::States, "Odisha");
    h.resolve_all().await;

    h.send(NavEvent::Search {
        state: "Madhya Pradesh".into(),
        district: "Indore".into(),
    });
    h.resolve_all().await;

    assert_eq!(h.surface.layers.len(), 1);
    let search = h.surface.layer(LayerKind::Search).unwrap();
    assert_eq!(search.features.len(), 1);
    assert_eq!(search.features[0].label, "INDORE");
    assert_eq!(h.nav.selection().level(), Level::Search);
    assert!(h.nav.selection().selected_state().is_none());
    assert!(h.nav.selection().selected_district().is_none());
    assert!(h.notices.is_empty());
}

#[tokio::test]
async fn test_disabling_boundaries_in_search_keeps_search_layer() {
    let mut h = Harness::enabled().await;
    h.send(NavEvent::Search {
        state: "Madhya Pradesh".into(),
        district: "Bhopal".into(),
    });
    h.resolve_all().await;
    let before: Vec<LayerHandle> = h.surface.layers.keys().copied().collect();

    h.send(NavEvent::SetBoundariesEnabled(false));
    let after: Vec<LayerHandle> = h.surface.layers.keys().copied().collect();
    assert_eq!(before, after);
    assert_eq!(h.nav.selection().level(), Level::Search);
}

#[tokio::test]
async fn test_unknown_district_search_reports_region() {
    let mut h = Harness::enabled().await;
    h.send(NavEvent::Search {
        state: "Bihar".into(),
        district: "Gaya".into(),
    });
    h.resolve_all().await;

    assert_eq!(
        h.notices,
        vec![BoundaryError::RegionNotFound {
            region: "Gaya, Bihar".into()
        }]
    );
    assert_eq!(h.surface.count(LayerKind::States), 1);
    assert_eq!(h.nav.selection().level(), Level::Country);
}

#[tokio::test]
async fn test_missing_state_file_is_notified_and_retryable() {
    let mut h = Harness::enabled().await;
    h.send(NavEvent::StateClicked {
        name: "Goa".into(),
        bounds: None,
    });
    h.resolve_all().await;
    assert!(matches!(
        h.notices[..],
        [BoundaryError::NotFound { ref region, status: 404 }] if region == "Goa"
    ));
    assert_eq!(h.surface.count(LayerKind::Districts), 0);

    // Nothing was cached, so clicking again fetches again.
    h.send(NavEvent::StateClicked {
        name: "Goa".into(),
        bounds: None,
    });
    assert_eq!(h.queued.len(), 1);
}

#[tokio::test]
async fn test_reset_returns_to_country_view() {
    let mut h = Harness::enabled().await;
    h.click(LayerKind::States, "Bihar");
    h.resolve_all().await;
    h.send(NavEvent::ResetToCountry);

    assert_eq!(h.surface.count(LayerKind::Districts), 0);
    assert_eq!(h.surface.count(LayerKind::States), 1);
    let (center, zoom) = *h.surface.views.last().unwrap();
    assert_eq!(center, h.nav.config().default_center);
    assert_eq!(zoom, h.nav.config().default_zoom);
}

#[tokio::test]
async fn test_rapid_state_clicks_never_stack_districts() {
    let mut h = Harness::enabled().await;
    for name in ["Odisha", "Bihar", "Madhya Pradesh", "Bihar", "Odisha"] {
        h.click(LayerKind::States, name);
        if name == "Bihar" {
            h.resolve_all().await;
        }
    }
    h.resolve_all().await;
    let districts = h.surface.layer(LayerKind::Districts).unwrap();
    assert!(districts.features.iter().any(|f| f.label == "Cuttack"));
}

#[test]
fn test_approved_filter_is_exact_and_idempotent() {
    let claims = embedded_claims().unwrap();
    let mut filters = FilterState::default();
    filters.toggle_status("Approved");

    let once: Vec<_> = filter_claims(&claims, &filters).into_iter().cloned().collect();
    let expected: Vec<_> = claims
        .iter()
        .filter(|c| c.properties.status == "Approved")
        .cloned()
        .collect();
    assert_eq!(once, expected);

    let twice: Vec<_> = filter_claims(&once, &filters).into_iter().cloned().collect();
    assert_eq!(once, twice);
}
