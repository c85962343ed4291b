use dioxus::prelude::*;
use spotlight_shared::models::{format_price, Listing, SpaceType};
use spotlight_shared::sync::row_element_id;

/// Accent color for the type badge.
pub fn type_color(space_type: SpaceType) -> &'static str {
    match space_type {
        SpaceType::Billboard => "#7c3aed",
        SpaceType::Vehicle => "#0891b2",
        SpaceType::Indoor => "#ca8a04",
        SpaceType::Outdoor => "#16a34a",
        SpaceType::Digital => "#db2777",
        SpaceType::Event => "#ea580c",
        SpaceType::Other => "#64748b",
    }
}

/// Listing photo, or a stable placeholder seeded by the id.
fn image_src(listing: &Listing) -> String {
    match listing.image_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => format!("https://picsum.photos/seed/spotlight-{}/480/270", listing.id),
    }
}

fn location_line(listing: &Listing) -> Option<String> {
    match (listing.city.as_deref(), listing.address.as_deref()) {
        (Some(city), Some(address)) if !address.is_empty() => Some(format!("{address}, {city}")),
        (Some(city), _) if !city.is_empty() => Some(city.to_string()),
        (None, Some(address)) if !address.is_empty() => Some(address.to_string()),
        _ => None,
    }
}

#[component]
pub fn ListingCard(
    listing: Listing,
    highlighted: bool,
    favorite: bool,
    on_enter: EventHandler<String>,
    on_leave: EventHandler<()>,
    on_toggle_favorite: EventHandler<String>,
) -> Element {
    let id = listing.id.clone();
    let enter_id = id.clone();
    let fav_id = id.clone();
    let color = type_color(listing.space_type);
    let price = format_price(listing.price_cents);
    let location = location_line(&listing);

    rsx! {
        article {
            id: row_element_id(&id),
            class: if highlighted { "listing-card highlighted" } else { "listing-card" },
            onmouseenter: move |_| on_enter.call(enter_id.clone()),
            onmouseleave: move |_| on_leave.call(()),

            img {
                class: "listing-image",
                src: image_src(&listing),
                alt: "{listing.title}",
                loading: "lazy",
            }
            div { class: "listing-body",
                div { class: "listing-head",
                    span {
                        class: "type-badge",
                        style: "background: {color};",
                        "{listing.space_type}"
                    }
                    button {
                        class: if favorite { "favorite active" } else { "favorite" },
                        title: if favorite { "Remove from favorites" } else { "Save to favorites" },
                        onclick: move |evt: Event<MouseData>| {
                            evt.stop_propagation();
                            on_toggle_favorite.call(fav_id.clone());
                        },
                        if favorite { "♥" } else { "♡" }
                    }
                }
                h3 { "{listing.title}" }
                if let Some(loc) = location {
                    p { class: "listing-location", "{loc}" }
                }
                p { class: "listing-price",
                    strong { "{price}" }
                    span { "/mo" }
                }
            }
        }
    }
}
