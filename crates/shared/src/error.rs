use thiserror::Error;

/// Why a geocode lookup produced no coordinate. Callers usually collapse all
/// of these into "no match".
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Transport(String),
    #[error("geocoder returned status {0}")]
    Status(u16),
    #[error("malformed geocoder response: {0}")]
    Malformed(String),
    #[error("no match for place")]
    NoMatch,
}

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("favorites storage unavailable: {0}")]
    Storage(String),
    #[error("favorites could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure of a one-shot "Near me" request. `Display` is the inline message
/// shown under the button.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported by your browser.")]
    Unsupported,
    #[error("Location access was denied. Enable it to search nearby spaces.")]
    Denied,
    #[error("Unable to determine your location. Please try again.")]
    Unavailable,
}

impl GeolocationError {
    /// Map a `GeolocationPositionError.code` (1 denied, 2 unavailable, 3 timeout).
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeolocationError::Denied,
            _ => GeolocationError::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geolocation_codes() {
        assert_eq!(GeolocationError::from_code(1), GeolocationError::Denied);
        assert_eq!(GeolocationError::from_code(2), GeolocationError::Unavailable);
        assert_eq!(GeolocationError::from_code(3), GeolocationError::Unavailable);
        assert!(GeolocationError::Denied.to_string().contains("denied"));
    }
}
