use image::GrayImage;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::detected_features::{Descriptor, KeyPoint};

/// Number of intensity comparisons, one bit each.
const NUM_TESTS: usize = 256;

/// Sample offsets stay within this radius; rotated samples stay within
/// `fast::BORDER` of the keypoint.
const PATTERN_RADIUS: i32 = 15;

/// Pattern seed. Fixed so descriptors are comparable across runs and
/// processes.
const PATTERN_SEED: u64 = 0x5f3759df;

/// Rotated BRIEF sampling pattern: 256 point pairs over a 31x31 patch.
pub struct BriefPattern {
    pairs: Vec<(f32, f32, f32, f32)>,
}

impl Default for BriefPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl BriefPattern {
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(PATTERN_SEED);
        let pairs = (0..NUM_TESTS)
            .map(|_| {
                (
                    rng.random_range(-PATTERN_RADIUS..=PATTERN_RADIUS) as f32,
                    rng.random_range(-PATTERN_RADIUS..=PATTERN_RADIUS) as f32,
                    rng.random_range(-PATTERN_RADIUS..=PATTERN_RADIUS) as f32,
                    rng.random_range(-PATTERN_RADIUS..=PATTERN_RADIUS) as f32,
                )
            })
            .collect();
        Self { pairs }
    }

    /// Describes a keypoint by comparing rotated sample pairs. The caller
    /// guarantees the keypoint sits at least `fast::BORDER` from the edge.
    pub fn describe(&self, img: &GrayImage, kp: &KeyPoint) -> Descriptor {
        let (sin, cos) = kp.angle.sin_cos();
        let cx = kp.x.round() as i32;
        let cy = kp.y.round() as i32;

        let sample = |dx: f32, dy: f32| -> u8 {
            let rx = (cos * dx - sin * dy).round() as i32;
            let ry = (sin * dx + cos * dy).round() as i32;
            img.get_pixel((cx + rx) as u32, (cy + ry) as u32).0[0]
        };

        let mut words = [0u64; 4];
        for (i, &(x0, y0, x1, y1)) in self.pairs.iter().enumerate() {
            if sample(x0, y0) < sample(x1, y1) {
                words[i / 64] |= 1 << (i % 64);
            }
        }
        Descriptor(words)
    }
}
