use dioxus::prelude::*;
use fra_shared::claims::{ClaimStatus, FEATURE_TYPES};
use fra_shared::filter::FilterState;
use fra_shared::search::TRIBAL_GROUPS;

/// Which free-text filter an input edits.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TextField {
    State,
    District,
    Village,
    TribalGroup,
}

impl TextField {
    const ALL: [TextField; 4] = [
        TextField::State,
        TextField::District,
        TextField::Village,
        TextField::TribalGroup,
    ];

    fn label(self) -> &'static str {
        match self {
            TextField::State => "State",
            TextField::District => "District",
            TextField::Village => "Village",
            TextField::TribalGroup => "Tribal group",
        }
    }

    fn get(self, f: &FilterState) -> &str {
        match self {
            TextField::State => &f.state,
            TextField::District => &f.district,
            TextField::Village => &f.village,
            TextField::TribalGroup => &f.tribal_group,
        }
    }

    fn get_mut(self, f: &mut FilterState) -> &mut String {
        match self {
            TextField::State => &mut f.state,
            TextField::District => &mut f.district,
            TextField::Village => &mut f.village,
            TextField::TribalGroup => &mut f.tribal_group,
        }
    }
}

#[component]
pub fn FilterPanel(filters: Signal<FilterState>, matching: usize, total: usize) -> Element {
    let mut filters = filters;
    let current = filters.read().clone();
    let fields: Vec<(TextField, &str, String)> = TextField::ALL
        .into_iter()
        .map(|f| (f, f.label(), f.get(&current).to_string()))
        .collect();
    let statuses: Vec<(&str, &str, bool)> = ClaimStatus::ALL
        .into_iter()
        .map(|s| (s.label(), s.color(), current.claim_statuses.contains(s.label())))
        .collect();

    rsx! {
        div { class: "panel",
            h3 { "Filters" }
            for (field, label, value) in fields {
                label { class: "field",
                    span { "{label}" }
                    input {
                        r#type: "text",
                        value: "{value}",
                        list: if field == TextField::TribalGroup { "tribal-groups" } else { "" },
                        oninput: move |evt: Event<FormData>| {
                            *field.get_mut(&mut filters.write()) = evt.value();
                        },
                    }
                }
            }
            datalist { id: "tribal-groups",
                for group in TRIBAL_GROUPS {
                    option { value: "{group}" }
                }
            }

            fieldset { class: "status-filters",
                legend { "Claim status" }
                for (label, color, checked) in statuses {
                    label { class: "checkbox-row",
                        input {
                            r#type: "checkbox",
                            checked: checked,
                            onchange: move |_| filters.write().toggle_status(label),
                        }
                        span { class: "swatch", style: "background: {color};" }
                        "{label}"
                    }
                }
            }

            label { class: "field",
                span { "Claim type" }
                select {
                    onchange: move |evt: Event<FormData>| {
                        filters.write().feature_type = evt.value();
                    },
                    option { value: "", selected: current.feature_type.is_empty(), "All types" }
                    for t in FEATURE_TYPES {
                        option { value: "{t}", selected: current.feature_type == t, "{t}" }
                    }
                }
            }

            div { class: "filter-summary",
                "{matching} of {total} claims shown"
            }
            button {
                class: "secondary",
                disabled: current.is_empty(),
                onclick: move |_| filters.set(FilterState::default()),
                "Clear filters"
            }
        }
    }
}
