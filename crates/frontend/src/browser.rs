//! Thin adapters over browser APIs used by the explorer.

use spotlight_shared::error::{FavoritesError, GeolocationError};
use spotlight_shared::favorites::FavoriteStore;
use spotlight_shared::models::Coordinate;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::Promise;
use web_sys::{
    GeolocationPosition, GeolocationPositionError, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};

/// `window.localStorage`, shared by every tab on the origin.
pub struct LocalFavoriteStore;

impl LocalFavoriteStore {
    fn storage() -> Result<web_sys::Storage, FavoritesError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| FavoritesError::Storage("localStorage unavailable".to_string()))
    }
}

fn js_error(e: JsValue) -> FavoritesError {
    FavoritesError::Storage(format!("{e:?}"))
}

impl FavoriteStore for LocalFavoriteStore {
    fn read(&self, key: &str) -> Result<Option<String>, FavoritesError> {
        Self::storage()?.get_item(key).map_err(js_error)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), FavoritesError> {
        Self::storage()?.set_item(key, value).map_err(js_error)
    }
}

/// One-shot position request. No retries; the caller shows the error inline.
pub async fn current_position() -> Result<Coordinate, GeolocationError> {
    let geolocation = web_sys::window()
        .and_then(|w| w.navigator().geolocation().ok())
        .ok_or(GeolocationError::Unsupported)?;

    let promise = Promise::new(&mut |resolve, reject| {
        if let Err(err) =
            geolocation.get_current_position_with_error_callback(&resolve, Some(&reject))
        {
            let _ = reject.call1(&JsValue::NULL, &err);
        }
    });

    match JsFuture::from(promise).await {
        Ok(value) => {
            let coords = value.unchecked_into::<GeolocationPosition>().coords();
            Ok(Coordinate::new(coords.latitude(), coords.longitude()))
        }
        Err(err) => {
            let code = err
                .dyn_ref::<GeolocationPositionError>()
                .map(|e| e.code())
                .unwrap_or(0);
            Err(GeolocationError::from_code(code))
        }
    }
}

/// Smoothly bring an element to the nearest edge of its scroll container.
pub fn scroll_into_view(element_id: &str) {
    let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(element_id))
    else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Nearest);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Current `location.search`, including the leading `?` when present.
pub fn location_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// Replace the query string without adding a history entry.
pub fn replace_query(query: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let path = window.location().pathname().unwrap_or_else(|_| "/".to_string());
    let url = url_with_query(&path, query);
    if let Ok(history) = window.history() {
        if let Err(err) = history.replace_state_with_url(&JsValue::NULL, "", Some(&url)) {
            tracing::debug!(?err, "history.replaceState failed");
        }
    }
}

pub fn url_with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Size of an element's box, for fitting the map camera.
pub fn element_size(element_id: &str) -> Option<(f64, f64)> {
    let document = web_sys::window()?.document()?;
    let rect = document.get_element_by_id(element_id)?.get_bounding_client_rect();
    (rect.width() > 0.0 && rect.height() > 0.0).then(|| (rect.width(), rect.height()))
}

/// Top-left corner of an element in client coordinates.
pub fn element_origin(element_id: &str) -> Option<(f64, f64)> {
    let document = web_sys::window()?.document()?;
    let rect = document.get_element_by_id(element_id)?.get_bounding_client_rect();
    Some((rect.left(), rect.top()))
}
