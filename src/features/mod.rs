//! FAST keypoint detection and rotated BRIEF description.

pub mod brief;
pub mod fast;

use image::GrayImage;

use crate::config::OrbConfig;
use crate::detected_features::{Descriptor, KeyPoint};

pub use brief::BriefPattern;
pub use fast::detect_keypoints;

/// ORB-style extractor: FAST-9 corners, intensity-centroid orientation,
/// rotated BRIEF descriptors.
pub struct OrbExtractor {
    config: OrbConfig,
    pattern: BriefPattern,
}

impl Default for OrbExtractor {
    fn default() -> Self {
        Self::new(&OrbConfig::default())
    }
}

impl OrbExtractor {
    pub fn new(config: &OrbConfig) -> Self {
        Self {
            config: config.clone(),
            pattern: BriefPattern::new(),
        }
    }

    /// Keypoints and their descriptors, index-aligned. Both empty when the
    /// image is too small for the detection border.
    pub fn detect_and_compute(&self, img: &GrayImage) -> (Vec<KeyPoint>, Vec<Descriptor>) {
        let keypoints = detect_keypoints(img, &self.config);
        let descriptors = keypoints
            .iter()
            .map(|kp| self.pattern.describe(img, kp))
            .collect();
        (keypoints, descriptors)
    }
}
