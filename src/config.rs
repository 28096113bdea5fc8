use serde::{Deserialize, Serialize};

/// Feature extraction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbConfig {
    /// FAST intensity threshold.
    pub threshold: u8,
    /// Cell size for grid non-maximum suppression.
    pub nms_grid: u32,
    /// Keep at most this many keypoints, strongest first.
    pub max_features: usize,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            threshold: 20,
            nms_grid: 16,
            max_features: 500,
        }
    }
}

/// Single-object tracker parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Peak correlation below this reports a tracking failure.
    pub detect_threshold: f32,
    /// Search window half-size in pixels around the last position.
    pub search_radius: u32,
    /// Template running-average learning rate.
    pub interp_factor: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            detect_threshold: 0.35,
            search_radius: 24,
            interp_factor: 0.075,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingConfig {
    pub orb: OrbConfig,
    pub tracker: TrackerConfig,
}
