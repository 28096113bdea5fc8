use std::collections::HashMap;

use image::GrayImage;

use crate::config::OrbConfig;
use crate::detected_features::KeyPoint;

/// Border width inside which keypoints are not detected. Wide enough for the
/// orientation patch and any rotated descriptor sample.
pub const BORDER: u32 = 22;

/// Contiguous arc length required on the circle (FAST-9).
const ARC_LEN: usize = 9;

/// Half-size of the orientation patch.
const HALF_PATCH: i32 = 15;

/// 16-pixel Bresenham circle of radius 3, clockwise from the top.
const CIRCLE: [(i32, i32); 16] = [
    (0, -3),
    (1, -3),
    (2, -2),
    (3, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 3),
    (-1, 3),
    (-2, 2),
    (-3, 1),
    (-3, 0),
    (-3, -1),
    (-2, -2),
    (-1, -3),
];

#[inline]
fn pixel(img: &GrayImage, x: i32, y: i32) -> i16 {
    img.get_pixel(x as u32, y as u32).0[0] as i16
}

/// FAST-9 segment test: at least `ARC_LEN` contiguous circle pixels all
/// brighter or all darker than the center by the threshold.
fn is_corner(img: &GrayImage, x: u32, y: u32, threshold: u8) -> bool {
    let c = pixel(img, x as i32, y as i32);
    let t = threshold as i16;

    let mut brighter = [false; 16];
    let mut darker = [false; 16];
    for (i, &(dx, dy)) in CIRCLE.iter().enumerate() {
        let p = pixel(img, x as i32 + dx, y as i32 + dy);
        brighter[i] = p > c + t;
        darker[i] = p < c - t;
    }

    longest_circular_run(&brighter) >= ARC_LEN || longest_circular_run(&darker) >= ARC_LEN
}

fn longest_circular_run(flags: &[bool; 16]) -> usize {
    let mut best = 0;
    let mut run = 0;
    // doubled pass handles wraparound
    for i in 0..32 {
        if flags[i % 16] {
            run += 1;
            best = best.max(run);
            if best >= 16 {
                return 16;
            }
        } else {
            run = 0;
        }
    }
    best.min(16)
}

/// Corner score: summed circle contrast beyond the threshold.
fn corner_score(img: &GrayImage, x: u32, y: u32, threshold: u8) -> f32 {
    let c = pixel(img, x as i32, y as i32);
    let t = threshold as i16;
    let mut score = 0i32;
    for &(dx, dy) in CIRCLE.iter() {
        let d = (pixel(img, x as i32 + dx, y as i32 + dy) - c).abs() as i32;
        let d = d - t as i32;
        if d > 0 {
            score += d;
        }
    }
    score as f32
}

/// Orientation by intensity centroid over a circular patch.
fn orientation(img: &GrayImage, x: u32, y: u32) -> f32 {
    let mut m01 = 0f32;
    let mut m10 = 0f32;
    for dy in -HALF_PATCH..=HALF_PATCH {
        for dx in -HALF_PATCH..=HALF_PATCH {
            if dx * dx + dy * dy > HALF_PATCH * HALF_PATCH {
                continue;
            }
            let v = pixel(img, x as i32 + dx, y as i32 + dy) as f32;
            m10 += dx as f32 * v;
            m01 += dy as f32 * v;
        }
    }
    m01.atan2(m10)
}

/// Best keypoint per grid cell, sorted by response, capped at `max_features`.
fn grid_nms(keypoints: Vec<KeyPoint>, cell: u32, max_features: usize) -> Vec<KeyPoint> {
    let cell = cell.max(1);
    let mut best_per_cell: HashMap<(u32, u32), KeyPoint> = HashMap::new();
    for kp in keypoints {
        let key = (kp.x as u32 / cell, kp.y as u32 / cell);
        best_per_cell
            .entry(key)
            .and_modify(|cur| {
                if kp.response > cur.response {
                    *cur = kp;
                }
            })
            .or_insert(kp);
    }
    let mut kept: Vec<KeyPoint> = best_per_cell.into_values().collect();
    kept.sort_by(|a, b| b.response.total_cmp(&a.response));
    kept.truncate(max_features);
    kept
}

/// Detects FAST-9 keypoints with orientation. Images too small to hold the
/// detection border yield no keypoints.
pub fn detect_keypoints(img: &GrayImage, config: &OrbConfig) -> Vec<KeyPoint> {
    let (w, h) = img.dimensions();
    if w <= 2 * BORDER || h <= 2 * BORDER {
        return Vec::new();
    }

    let mut found = Vec::new();
    for y in BORDER..h - BORDER {
        for x in BORDER..w - BORDER {
            if !is_corner(img, x, y, config.threshold) {
                continue;
            }
            found.push(KeyPoint {
                x: x as f32,
                y: y as f32,
                response: corner_score(img, x, y, config.threshold),
                angle: orientation(img, x, y),
            });
        }
    }
    log::trace!("{} raw fast corners", found.len());
    grid_nms(found, config.nms_grid, config.max_features)
}
