//! Boundary navigation state machine.
//!
//! [`BoundaryNavigator`] owns the selection, the boundary cache, and the record
//! of which boundary layers are attached. Each [`NavEvent`] mutates that state
//! and returns the [`MapCommand`]s the caller must carry out. Layer commands
//! are always derived by diffing the desired layer set against the attached
//! one, never issued ad hoc, so repeated or out-of-order events cannot stack
//! duplicate layers.
//!
//! Fetch completions may arrive after the selection has moved on. A districts
//! document is cached when it arrives but only rendered if its state is still
//! the selected one.

use std::collections::HashSet;

use geojson::FeatureCollection;

use crate::cache::{BoundaryCache, CacheKey};
use crate::config::AtlasConfig;
use crate::error::BoundaryError;
use crate::geo::{self, Bounds, LatLng, DISTRICT_NAME_PROPERTIES};
use crate::layers::{reconcile, ActiveLayers, DesiredLayers, HandleAllocator, LayerOp, LayerSpec};
use crate::region::RegionKey;
use crate::selection::{Level, SelectionState};
use crate::source::FetchRequest;

/// Inputs to the navigator: user actions and fetch completions.
#[derive(Debug, Clone)]
pub enum NavEvent {
    SetBoundariesEnabled(bool),
    StatesLoaded(Result<FeatureCollection, BoundaryError>),
    StateClicked {
        name: String,
        bounds: Option<Bounds>,
    },
    DistrictsLoaded {
        state: String,
        result: Result<FeatureCollection, BoundaryError>,
    },
    DistrictClicked {
        name: String,
        bounds: Option<Bounds>,
    },
    ResetToCountry,
    /// Jump straight to one district, bypassing the drill-down.
    Search {
        state: String,
        district: String,
    },
}

/// Side effects requested by the navigator, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    Layer(LayerOp),
    FitBounds { bounds: Bounds, padding: f64 },
    SetView { center: LatLng, zoom: f64 },
    Fetch(FetchRequest),
    /// Show the error to the user. Never fatal.
    Notify(BoundaryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchTarget {
    state: String,
    district: String,
}

#[derive(Debug)]
pub struct BoundaryNavigator {
    config: AtlasConfig,
    selection: SelectionState,
    boundaries_enabled: bool,
    cache: BoundaryCache,
    in_flight: HashSet<CacheKey>,
    /// Search waiting for its state's districts document.
    pending_search: Option<SearchTarget>,
    /// District shown while in search mode.
    search: Option<SearchTarget>,
    layers: ActiveLayers,
    handles: HandleAllocator,
}

impl BoundaryNavigator {
    pub fn new(config: AtlasConfig) -> Self {
        BoundaryNavigator {
            config,
            selection: SelectionState::default(),
            boundaries_enabled: false,
            cache: BoundaryCache::new(),
            in_flight: HashSet::new(),
            pending_search: None,
            search: None,
            layers: ActiveLayers::default(),
            handles: HandleAllocator::default(),
        }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn boundaries_enabled(&self) -> bool {
        self.boundaries_enabled
    }

    pub fn cache(&self) -> &BoundaryCache {
        &self.cache
    }

    pub fn layers(&self) -> &ActiveLayers {
        &self.layers
    }

    /// True while any boundary fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Process one event and return the commands to execute.
    ///
    /// Layer commands come first (detaches before attaches), followed by
    /// viewport moves, fetches, and notifications.
    pub fn handle(&mut self, event: NavEvent) -> Vec<MapCommand> {
        let mut effects = Vec::new();
        match event {
            NavEvent::SetBoundariesEnabled(enabled) => {
                self.set_boundaries_enabled(enabled, &mut effects)
            }
            NavEvent::StatesLoaded(result) => self.states_loaded(result, &mut effects),
            NavEvent::StateClicked { name, bounds } => {
                self.state_clicked(&name, bounds, &mut effects)
            }
            NavEvent::DistrictsLoaded { state, result } => {
                self.districts_loaded(&state, result, &mut effects)
            }
            NavEvent::DistrictClicked { name, bounds } => {
                self.district_clicked(&name, bounds, &mut effects)
            }
            NavEvent::ResetToCountry => self.reset_to_country(&mut effects),
            NavEvent::Search { state, district } => self.search(state, district, &mut effects),
        }

        let mut commands: Vec<MapCommand> = self.sync().into_iter().map(MapCommand::Layer).collect();
        commands.extend(effects);
        commands
    }

    fn set_boundaries_enabled(&mut self, enabled: bool, effects: &mut Vec<MapCommand>) {
        if enabled == self.boundaries_enabled {
            return;
        }
        self.boundaries_enabled = enabled;
        tracing::info!(enabled, level = %self.selection.level(), "boundaries toggled");

        if enabled {
            if self.selection.level() == Level::Search {
                // Re-enabling leaves search mode for country navigation.
                self.selection.reset();
                self.search = None;
            }
            self.request(CacheKey::States, FetchRequest::States, effects);
        } else if self.selection.level() != Level::Search {
            self.selection.reset();
        }
    }

    fn states_loaded(
        &mut self,
        result: Result<FeatureCollection, BoundaryError>,
        effects: &mut Vec<MapCommand>,
    ) {
        self.in_flight.remove(&CacheKey::States);
        match result {
            Ok(doc) => {
                self.cache.put(CacheKey::States, doc);
            }
            Err(e) => effects.push(MapCommand::Notify(e)),
        }
    }

    fn state_clicked(&mut self, name: &str, bounds: Option<Bounds>, effects: &mut Vec<MapCommand>) {
        if !self.boundaries_enabled {
            tracing::debug!(state = name, "state click ignored, boundaries disabled");
            return;
        }
        tracing::info!(state = name, "state selected");
        self.search = None;
        self.pending_search = None;
        self.selection.select_state(name);
        if let Some(bounds) = bounds {
            effects.push(MapCommand::FitBounds {
                bounds,
                padding: self.config.state_fit_padding,
            });
        }
        self.request_districts(name, effects);
    }

    fn districts_loaded(
        &mut self,
        state: &str,
        result: Result<FeatureCollection, BoundaryError>,
        effects: &mut Vec<MapCommand>,
    ) {
        let key = RegionKey::new(state);
        self.in_flight.remove(&CacheKey::Districts(key.clone()));

        let for_search = self
            .pending_search
            .as_ref()
            .is_some_and(|s| RegionKey::new(&s.state) == key);
        let for_selection = self
            .selection
            .selected_state()
            .is_some_and(|s| RegionKey::new(s) == key);

        match result {
            Ok(doc) => {
                self.cache.put(CacheKey::Districts(key), doc);
                if let Some(target) = self.pending_search.take_if(|_| for_search) {
                    self.complete_search(target, effects);
                } else if !for_selection {
                    tracing::debug!(state, "districts arrived for a state no longer selected, not rendering");
                }
            }
            Err(e) if for_search || for_selection => {
                if for_search {
                    self.pending_search = None;
                }
                effects.push(MapCommand::Notify(e));
            }
            Err(e) => {
                tracing::debug!(state, error = %e, "discarding stale districts failure");
            }
        }
    }

    fn district_clicked(&mut self, name: &str, bounds: Option<Bounds>, effects: &mut Vec<MapCommand>) {
        let drilled = matches!(self.selection.level(), Level::State | Level::District);
        if !self.boundaries_enabled || !drilled {
            tracing::debug!(district = name, "district click ignored");
            return;
        }
        if self.selection.select_district(name) {
            tracing::info!(district = name, "district selected");
            if let Some(bounds) = bounds {
                effects.push(MapCommand::FitBounds {
                    bounds,
                    padding: 0.0,
                });
            }
        }
    }

    fn reset_to_country(&mut self, effects: &mut Vec<MapCommand>) {
        tracing::info!("reset to country");
        self.selection.reset();
        self.search = None;
        self.pending_search = None;
        effects.push(MapCommand::SetView {
            center: self.config.default_center,
            zoom: self.config.default_zoom,
        });
    }

    fn search(&mut self, state: String, district: String, effects: &mut Vec<MapCommand>) {
        let target = SearchTarget { state, district };
        if self.cache.contains(&CacheKey::Districts(RegionKey::new(&target.state))) {
            self.pending_search = None;
            self.complete_search(target, effects);
        } else {
            tracing::debug!(state = %target.state, district = %target.district, "search waiting for districts");
            self.request_districts(&target.state, effects);
            self.pending_search = Some(target);
        }
    }

    /// Resolve a search against the cached districts of its state. On a miss
    /// nothing changes and `RegionNotFound` is reported.
    fn complete_search(&mut self, target: SearchTarget, effects: &mut Vec<MapCommand>) {
        let key = RegionKey::new(&target.state);
        let found = self.cache.districts(&key).and_then(|doc| {
            geo::find_feature_by_name(&doc, &target.district, DISTRICT_NAME_PROPERTIES).map(|f| {
                let name = geo::feature_name(f, DISTRICT_NAME_PROPERTIES)
                    .unwrap_or(target.district.trim())
                    .to_string();
                (name, geo::feature_bounds(f))
            })
        });

        let Some((district, bounds)) = found else {
            tracing::warn!(state = %target.state, district = %target.district, "search found no district");
            effects.push(MapCommand::Notify(BoundaryError::RegionNotFound {
                region: format!("{}, {}", target.district, target.state),
            }));
            return;
        };

        tracing::info!(state = %target.state, district = %district, "search matched district");
        self.selection.enter_search();
        self.search = Some(SearchTarget {
            state: target.state,
            district,
        });
        if let Some(bounds) = bounds {
            effects.push(MapCommand::FitBounds {
                bounds,
                padding: 0.0,
            });
        }
    }

    fn request_districts(&mut self, state: &str, effects: &mut Vec<MapCommand>) {
        let key = CacheKey::Districts(RegionKey::new(state));
        let request = FetchRequest::Districts {
            state: state.to_string(),
        };
        self.request(key, request, effects);
    }

    /// Issue a fetch unless the document is cached or already on its way.
    fn request(&mut self, key: CacheKey, request: FetchRequest, effects: &mut Vec<MapCommand>) {
        if self.cache.contains(&key) {
            tracing::debug!(key = %key, "boundaries served from cache");
            return;
        }
        if !self.in_flight.insert(key.clone()) {
            tracing::debug!(key = %key, "boundary fetch already in flight");
            return;
        }
        effects.push(MapCommand::Fetch(request));
    }

    /// Boundary layers that should be on the map for the current state.
    fn desired(&self) -> DesiredLayers {
        let level = self.selection.level();
        let states = (self.boundaries_enabled
            && level != Level::Search
            && self.cache.contains(&CacheKey::States))
        .then_some(LayerSpec::States);

        let districts = self
            .selection
            .selected_state()
            .filter(|_| self.boundaries_enabled && matches!(level, Level::State | Level::District))
            .filter(|s| self.cache.districts(&RegionKey::new(s)).is_some())
            .map(|s| LayerSpec::Districts {
                state: s.to_string(),
            });

        let search = self
            .search
            .as_ref()
            .filter(|_| level == Level::Search)
            .map(|t| LayerSpec::Search {
                state: t.state.clone(),
                district: t.district.clone(),
            });

        DesiredLayers {
            states,
            districts,
            search,
        }
    }

    fn sync(&mut self) -> Vec<LayerOp> {
        let ops = reconcile(&self.layers, &self.desired(), &mut self.handles);
        self.layers.apply(&ops);
        ops
    }
}
