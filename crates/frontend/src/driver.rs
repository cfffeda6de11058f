use dioxus::prelude::*;
use fra_shared::config::AtlasConfig;
use fra_shared::navigator::{BoundaryNavigator, NavEvent};
use fra_shared::render::apply_commands;
use fra_shared::source::{BoundaryFetcher, FetchRequest};

use crate::api::{self, ReqwestTransport};
use crate::coords;
use crate::surface::SvgSurface;

/// Runs navigator events against the SVG surface and feeds fetch results
/// back in as events. Cheap to copy into event handlers.
#[derive(Clone, Copy, PartialEq)]
pub struct MapDriver {
    pub navigator: Signal<BoundaryNavigator>,
    pub surface: Signal<SvgSurface>,
    fetcher: Signal<BoundaryFetcher<ReqwestTransport>>,
}

pub fn use_map_driver(config: &AtlasConfig) -> MapDriver {
    let nav_config = config.clone();
    let navigator = use_signal(move || BoundaryNavigator::new(nav_config));
    let surface_config = config.clone();
    let surface = use_signal(move || SvgSurface::new(&surface_config));
    let fetch_config = config.clone();
    let fetcher = use_signal(move || api::boundary_fetcher(&fetch_config));
    MapDriver {
        navigator,
        surface,
        fetcher,
    }
}

impl MapDriver {
    pub fn dispatch(self, event: NavEvent) {
        let mut navigator = self.navigator;
        let mut surface = self.surface;

        // Fits must use the real container size.
        if let Some((w, h)) = coords::container_size() {
            surface.write().viewport.resize(w, h);
        }

        let commands = navigator.write().handle(event);
        let follow_up = apply_commands(&mut *surface.write(), commands, navigator.read().cache());

        for notice in follow_up.notices {
            tracing::warn!(region = notice.region(), error = %notice, "boundary error shown to user");
            alert(&notice.to_string());
        }
        for request in follow_up.fetches {
            self.spawn_fetch(request);
        }
    }

    fn spawn_fetch(self, request: FetchRequest) {
        let fetcher = self.fetcher.read().clone();
        spawn(async move {
            let result = fetcher.fetch_request(&request).await;
            let event = match request {
                FetchRequest::States => NavEvent::StatesLoaded(result),
                FetchRequest::Districts { state } => NavEvent::DistrictsLoaded { state, result },
            };
            self.dispatch(event);
        });
    }

    pub fn is_loading(&self) -> bool {
        self.navigator.read().is_loading()
    }
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        window.alert_with_message(message).ok();
    }
}
