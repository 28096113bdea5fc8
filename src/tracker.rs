//! Single-object correlation tracker.
//!
//! Same contract as the usual KCF-style trackers: seed with a bounding box,
//! call `update` once per frame, get the new box or a failure. The model is
//! a normalized cross-correlation template blended over time.

use image::GrayImage;
use log::debug;

use crate::config::TrackerConfig;

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Rect {
        Rect { x, y, w, h }
    }
}

pub struct CorrelationTracker {
    config: TrackerConfig,
    template: Vec<f32>,
    size: (u32, u32),
    pos: (u32, u32),
}

impl CorrelationTracker {
    /// Captures the template under the box. `None` when the box is empty or
    /// falls outside the frame.
    pub fn init(frame: &GrayImage, bbox: Rect, config: &TrackerConfig) -> Option<Self> {
        let (fw, fh) = frame.dimensions();
        if bbox.w == 0 || bbox.h == 0 || bbox.x + bbox.w > fw || bbox.y + bbox.h > fh {
            return None;
        }
        Some(Self {
            config: config.clone(),
            template: extract_patch(frame, bbox.x, bbox.y, bbox.w, bbox.h),
            size: (bbox.w, bbox.h),
            pos: (bbox.x, bbox.y),
        })
    }

    /// Searches a window around the last position. On success moves the
    /// state, blends the template and returns the new box; on failure the
    /// state is left untouched so a later frame can re-acquire.
    pub fn update(&mut self, frame: &GrayImage) -> Option<Rect> {
        let (fw, fh) = frame.dimensions();
        let (bw, bh) = self.size;
        if bw > fw || bh > fh {
            return None;
        }

        let r = self.config.search_radius as i64;
        let max_x = (fw - bw) as i64;
        let max_y = (fh - bh) as i64;
        let x0 = (self.pos.0 as i64 - r).clamp(0, max_x);
        let x1 = (self.pos.0 as i64 + r).clamp(0, max_x);
        let y0 = (self.pos.1 as i64 - r).clamp(0, max_y);
        let y1 = (self.pos.1 as i64 + r).clamp(0, max_y);

        let mut best_score = f32::MIN;
        let mut best_pos = self.pos;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let patch = extract_patch(frame, x as u32, y as u32, bw, bh);
                let score = ncc(&self.template, &patch);
                if score > best_score {
                    best_score = score;
                    best_pos = (x as u32, y as u32);
                }
            }
        }

        if best_score < self.config.detect_threshold {
            debug!("peak correlation {:.3} below threshold", best_score);
            return None;
        }

        self.pos = best_pos;
        let patch = extract_patch(frame, best_pos.0, best_pos.1, bw, bh);
        let a = self.config.interp_factor;
        for (t, p) in self.template.iter_mut().zip(patch) {
            *t = (1.0 - a) * *t + a * p;
        }
        Some(Rect::new(best_pos.0, best_pos.1, bw, bh))
    }
}

fn extract_patch(frame: &GrayImage, x: u32, y: u32, w: u32, h: u32) -> Vec<f32> {
    let mut out = Vec::with_capacity((w * h) as usize);
    for dy in 0..h {
        for dx in 0..w {
            out.push(frame.get_pixel(x + dx, y + dy).0[0] as f32);
        }
    }
    out
}

/// Zero-mean normalized cross-correlation in [-1, 1]. Flat patches score 0.
fn ncc(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len() as f32;
    let mean_a = a.iter().sum::<f32>() / n;
    let mean_b = b.iter().sum::<f32>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&xa, &xb) in a.iter().zip(b.iter()) {
        let da = xa - mean_a;
        let db = xb - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a < f32::EPSILON || var_b < f32::EPSILON {
        return 0.0;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}
