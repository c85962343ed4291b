use dioxus::prelude::*;
use spotlight_shared::engine::LocateStatus;
use spotlight_shared::filter::{FilterState, PRICE_SLIDER_MAX_DOLLARS};
use spotlight_shared::models::{format_price, SpaceType};
use spotlight_shared::query::build_url;

/// Parse a range input value, keeping the previous value on garbage.
fn slider_value(raw: &str, previous: u32) -> u32 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u32)
        .unwrap_or(previous)
}

fn optional_text(raw: String) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw)
    }
}

#[component]
pub fn FilterPanel(
    state: FilterState,
    locate: LocateStatus,
    radius_options: Vec<u32>,
    price_step: u32,
    on_query: EventHandler<Option<String>>,
    on_city: EventHandler<Option<String>>,
    on_type: EventHandler<Option<SpaceType>>,
    on_price: EventHandler<(u32, u32)>,
    on_locate: EventHandler<()>,
    on_radius: EventHandler<u32>,
    on_clear_location: EventHandler<()>,
) -> Element {
    let floor = state.price_floor;
    let ceiling = state.price_ceiling;
    let floor_label = format_price(floor as i64 * 100);
    let ceiling_label = state.price_ceiling_label();
    // Typed city text stays local until committed (Enter or blur), so partial
    // names never reach the engine or the geocoder.
    let mut city_draft = use_signal(|| state.city.clone().unwrap_or_default());
    let query = state.query.clone().unwrap_or_default();
    let located = state.user_location.is_some();
    let locating = locate == LocateStatus::Locating;
    let button_label = locate.button_label();
    let error_message = locate.error_message();
    let all_types_url = build_url(state.city_term(), None, state.query_term());
    let type_links: Vec<(SpaceType, String)> = SpaceType::FILTERABLE
        .iter()
        .map(|&t| (t, build_url(state.city_term(), Some(t), state.query_term())))
        .collect();

    rsx! {
        aside { class: "sidebar",
            div { class: "panel",
                h3 { "Search" }
                input {
                    r#type: "search",
                    placeholder: "Title or description...",
                    value: "{query}",
                    oninput: move |evt: Event<FormData>| on_query.call(optional_text(evt.value())),
                }
            }

            div { class: "panel",
                h3 { "City" }
                input {
                    r#type: "text",
                    placeholder: "Any city",
                    value: "{city_draft}",
                    oninput: move |evt: Event<FormData>| city_draft.set(evt.value()),
                    onchange: move |evt: Event<FormData>| on_city.call(optional_text(evt.value())),
                }
            }

            div { class: "panel",
                h3 { "Type" }
                nav { class: "type-list",
                    a {
                        href: "{all_types_url}",
                        class: if state.space_type.is_none() { "active" } else { "" },
                        onclick: move |evt: Event<MouseData>| {
                            evt.prevent_default();
                            on_type.call(None);
                        },
                        "All types"
                    }
                    for (t, url) in type_links {
                        a {
                            key: "{t}",
                            href: "{url}",
                            class: if state.space_type == Some(t) { "active" } else { "" },
                            onclick: move |evt: Event<MouseData>| {
                                evt.prevent_default();
                                on_type.call(Some(t));
                            },
                            "{t}"
                        }
                    }
                }
            }

            div { class: "panel",
                h3 { "Monthly price" }
                div { class: "price-labels",
                    span { "{floor_label}" }
                    span { "{ceiling_label}" }
                }
                input {
                    r#type: "range",
                    min: "0",
                    max: "{PRICE_SLIDER_MAX_DOLLARS}",
                    step: "{price_step}",
                    value: "{floor}",
                    oninput: move |evt: Event<FormData>| {
                        on_price.call((slider_value(&evt.value(), floor), ceiling));
                    },
                }
                input {
                    r#type: "range",
                    min: "0",
                    max: "{PRICE_SLIDER_MAX_DOLLARS}",
                    step: "{price_step}",
                    value: "{ceiling}",
                    oninput: move |evt: Event<FormData>| {
                        on_price.call((floor, slider_value(&evt.value(), ceiling)));
                    },
                }
            }

            div { class: "panel",
                h3 { "Location" }
                button {
                    disabled: locating,
                    onclick: move |_| on_locate.call(()),
                    "{button_label}"
                }
                if let Some(message) = error_message {
                    p { class: "error", "{message}" }
                }
                if located {
                    div { class: "radius-chips",
                        for miles in radius_options {
                            button {
                                key: "{miles}",
                                class: if state.radius_miles == miles as f64 { "chip active" } else { "chip" },
                                onclick: move |_| on_radius.call(miles),
                                "{miles} mi"
                            }
                        }
                    }
                    button {
                        class: "secondary",
                        onclick: move |_| on_clear_location.call(()),
                        "Clear location filter"
                    }
                }
            }
        }
    }
}
