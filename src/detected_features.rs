use glam;

/// A detected corner with its score and orientation.
#[derive(Debug, Clone, Copy)]
pub struct KeyPoint {
    pub x: f32,
    pub y: f32,
    pub response: f32,
    /// Orientation in radians, from the intensity centroid.
    pub angle: f32,
}

impl KeyPoint {
    pub fn pt(&self) -> glam::Vec2 {
        glam::Vec2::new(self.x, self.y)
    }
}

/// 256-bit binary descriptor packed into four words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor(pub [u64; 4]);

impl Descriptor {
    pub fn hamming_distance(&self, other: &Descriptor) -> u32 {
        (self.0[0] ^ other.0[0]).count_ones()
            + (self.0[1] ^ other.0[1]).count_ones()
            + (self.0[2] ^ other.0[2]).count_ones()
            + (self.0[3] ^ other.0[3]).count_ones()
    }
}

/// Features extracted from one live frame.
pub struct FrameFeatures {
    pub time_ns: i64,
    pub img_w_h: (u32, u32),
    pub keypoints: Vec<KeyPoint>,
    pub descriptors: Vec<Descriptor>,
}

/// A reference image with its precomputed features. Immutable after loading.
pub struct TrackingTarget {
    pub name: String,
    pub img_w_h: (u32, u32),
    pub keypoints: Vec<KeyPoint>,
    pub descriptors: Vec<Descriptor>,
}
