use dioxus::prelude::*;
use fra_shared::basemap::Basemap;
use fra_shared::navigator::NavEvent;
use fra_shared::selection::Level;

use crate::api::{self, Preferences};
use crate::driver::MapDriver;

fn save(basemap: Basemap, show_boundaries: bool) {
    api::save_preferences(&Preferences {
        basemap: basemap.as_key().to_string(),
        show_boundaries,
    });
}

#[component]
pub fn LayerControl(driver: MapDriver, basemap: Signal<Basemap>, on_reset: EventHandler<()>) -> Element {
    let mut basemap = basemap;
    let (enabled, level, location) = {
        let navigator = driver.navigator.read();
        let selection = navigator.selection();
        let level = selection.level();
        let location = match (selection.selected_state(), selection.selected_district()) {
            (Some(state), Some(district)) => format!("{district}, {state}"),
            (Some(state), None) => state.to_string(),
            _ if level == Level::Search => "Search result".to_string(),
            _ => "India".to_string(),
        };
        (navigator.boundaries_enabled(), level, location)
    };
    let current = *basemap.read();
    let options: Vec<(&str, &str, bool)> = Basemap::ALL
        .into_iter()
        .map(|b| (b.as_key(), b.display_name(), b == current))
        .collect();

    rsx! {
        div { class: "panel",
            h3 { "Layers" }
            select {
                "aria-label": "Select basemap",
                onchange: move |evt: Event<FormData>| {
                    let choice = Basemap::from_key(&evt.value()).unwrap_or_default();
                    basemap.set(choice);
                    save(choice, driver.navigator.read().boundaries_enabled());
                },
                for (key, name, is_current) in options {
                    option {
                        value: "{key}",
                        selected: is_current,
                        "{name}"
                    }
                }
            }
            label { class: "checkbox-row",
                input {
                    r#type: "checkbox",
                    checked: enabled,
                    onchange: move |evt: Event<FormData>| {
                        let on = evt.checked();
                        driver.dispatch(NavEvent::SetBoundariesEnabled(on));
                        save(*basemap.read(), on);
                    },
                }
                "Administrative boundaries"
            }
            if enabled {
                div { class: "selection-info",
                    span { class: "level-tag", "{level}" }
                    " {location}"
                }
            }
            button {
                class: "secondary",
                onclick: move |_| on_reset.call(()),
                "Reset to India"
            }
        }
    }
}
