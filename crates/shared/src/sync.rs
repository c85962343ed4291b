//! Shared hover state between the card list and the map.

/// Where a hover started. Only marker hovers scroll the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverSource {
    List,
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Normal,
    Highlighted,
}

impl MarkerStyle {
    pub fn radius_px(&self) -> f64 {
        match self {
            MarkerStyle::Normal => 8.0,
            MarkerStyle::Highlighted => 12.0,
        }
    }

    pub fn fill(&self) -> &'static str {
        match self {
            MarkerStyle::Normal => "#2563eb",
            MarkerStyle::Highlighted => "#f97316",
        }
    }

    pub fn fill_opacity(&self) -> f64 {
        match self {
            MarkerStyle::Normal => 0.75,
            MarkerStyle::Highlighted => 1.0,
        }
    }

    pub fn z_index(&self) -> i32 {
        match self {
            MarkerStyle::Normal => 1,
            MarkerStyle::Highlighted => 10,
        }
    }
}

pub fn marker_style(id: &str, hovered: Option<&str>) -> MarkerStyle {
    if hovered == Some(id) {
        MarkerStyle::Highlighted
    } else {
        MarkerStyle::Normal
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverState {
    hovered: Option<String>,
}

impl HoverState {
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Set the hover and return the row to scroll into view, if any.
    pub fn enter(&mut self, id: &str, source: HoverSource) -> Option<String> {
        self.hovered = Some(id.to_string());
        match source {
            HoverSource::Marker => Some(id.to_string()),
            HoverSource::List => None,
        }
    }

    pub fn leave(&mut self) {
        self.hovered = None;
    }

    pub fn style_for(&self, id: &str) -> MarkerStyle {
        marker_style(id, self.hovered())
    }
}

/// DOM id of a listing row, the scroll target for marker hovers.
pub fn row_element_id(listing_id: &str) -> String {
    format!("listing-{listing_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_hover_does_not_scroll() {
        let mut hover = HoverState::default();
        assert_eq!(hover.enter("3", HoverSource::List), None);
        assert_eq!(hover.hovered(), Some("3"));
    }

    #[test]
    fn test_marker_hover_requests_scroll() {
        let mut hover = HoverState::default();
        assert_eq!(hover.enter("4", HoverSource::Marker), Some("4".to_string()));
        assert_eq!(hover.style_for("4"), MarkerStyle::Highlighted);
        assert_eq!(hover.style_for("5"), MarkerStyle::Normal);
        hover.leave();
        assert_eq!(hover.hovered(), None);
        assert_eq!(hover.style_for("4"), MarkerStyle::Normal);
    }

    #[test]
    fn test_highlight_is_heavier() {
        assert!(MarkerStyle::Highlighted.radius_px() > MarkerStyle::Normal.radius_px());
        assert!(MarkerStyle::Highlighted.z_index() > MarkerStyle::Normal.z_index());
        assert_eq!(row_element_id("12"), "listing-12");
    }
}
