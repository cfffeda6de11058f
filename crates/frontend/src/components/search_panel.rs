use dioxus::prelude::*;
use fra_shared::claims::ClaimFeature;
use fra_shared::filter::FilterState;
use fra_shared::navigator::NavEvent;
use fra_shared::render::MapSurface;
use fra_shared::search::{self, Location, FOCUSED_STATES};
use gloo_timers::future::TimeoutFuture;

use crate::driver::MapDriver;

/// Quiet period after the last keystroke before results refresh.
const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Screen padding when fitting to a searched location.
const LOCATION_PADDING: f64 = 20.0;

/// Point the filters and the viewport at a picked location.
fn go_to_location(location: &Location, driver: MapDriver, mut filters: Signal<FilterState>) {
    location.apply_to(&mut filters.write());

    let mut surface = driver.surface;
    let bounds = search::known_bounds(&location.name);
    if bounds.south_west() == bounds.north_east() {
        let zoom = driver.navigator.read().config().default_zoom;
        surface.write().set_view(bounds.center(), zoom);
    } else {
        surface.write().fit_bounds(bounds, LOCATION_PADDING);
    }
    tracing::info!(location = %location.full_name(), "location selected");
}

#[component]
pub fn SearchPanel(
    driver: MapDriver,
    claims: ReadSignal<Vec<ClaimFeature>>,
    filters: Signal<FilterState>,
) -> Element {
    let mut query = use_signal(String::new);
    let mut debounced = use_signal(String::new);
    let mut search_state = use_signal(|| FOCUSED_STATES[0].to_string());
    let mut search_district = use_signal(String::new);

    let locations = use_memo(move || search::locations(&claims.read()));

    let results: Vec<Location> = {
        let locations = locations.read();
        search::search_locations(&locations, &debounced.read())
            .into_iter()
            .cloned()
            .collect()
    };
    let has_query = debounced.read().trim().chars().count() >= search::MIN_QUERY_LEN;

    let districts = search::districts_of(&search_state.read());
    let chosen_district = search_district.read().clone();

    rsx! {
        div { class: "panel search-panel",
            h3 { "Search" }
            input {
                r#type: "search",
                placeholder: "State, district or village…",
                value: "{query}",
                oninput: move |evt: Event<FormData>| {
                    let value = evt.value();
                    query.set(value.clone());
                    spawn(async move {
                        TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
                        if *query.peek() == value {
                            debounced.set(value);
                        }
                    });
                },
            }
            if has_query {
                ul { class: "search-results",
                    if results.is_empty() {
                        li { class: "empty", "No matching locations" }
                    }
                    for location in results {
                        li {
                            key: "{location.kind}-{location.name}",
                            onclick: {
                                let location = location.clone();
                                move |_| {
                                    go_to_location(&location, driver, filters);
                                    query.set(String::new());
                                    debounced.set(String::new());
                                }
                            },
                            span { class: "result-name", "{location.name}" }
                            span { class: "result-kind", "{location.kind}" }
                        }
                    }
                }
            }

            h4 { "Find a district" }
            div { class: "district-search",
                select {
                    "aria-label": "State",
                    onchange: move |evt: Event<FormData>| {
                        search_state.set(evt.value());
                        search_district.set(String::new());
                    },
                    for s in FOCUSED_STATES {
                        option { value: "{s}", selected: *search_state.read() == s, "{s}" }
                    }
                }
                select {
                    "aria-label": "District",
                    onchange: move |evt: Event<FormData>| search_district.set(evt.value()),
                    option { value: "", selected: chosen_district.is_empty(), "-- District --" }
                    for d in districts {
                        option { value: "{d}", selected: chosen_district == *d, "{d}" }
                    }
                }
                button {
                    disabled: chosen_district.is_empty(),
                    onclick: move |_| {
                        let state = search_state.read().clone();
                        let district = search_district.read().clone();
                        driver.dispatch(NavEvent::Search { state, district });
                    },
                    "Go"
                }
            }
        }
    }
}
