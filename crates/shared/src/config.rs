use serde::{Deserialize, Serialize};

use crate::camera::CameraSettings;
use crate::filter::{DEFAULT_RADIUS_MILES, RADIUS_OPTIONS};

/// Engine tunables. Everything has a sensible default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub camera: CameraSettings,
    pub price_slider_step_dollars: u32,
    pub radius_options: Vec<u32>,
    pub default_radius_miles: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            camera: CameraSettings::default(),
            price_slider_step_dollars: 50,
            radius_options: RADIUS_OPTIONS.to_vec(),
            default_radius_miles: DEFAULT_RADIUS_MILES,
        }
    }
}

impl DiscoveryConfig {
    pub fn is_radius_option(&self, miles: f64) -> bool {
        self.radius_options.iter().any(|&r| r as f64 == miles)
    }
}
