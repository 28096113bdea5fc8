use glam::Vec2;
use image::DynamicImage;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rerun::RecordingStream;
use std::io::Cursor;

use crate::detected_features::KeyPoint;
use crate::matching::Match;
use crate::tracker::Rect;

pub fn log_image_as_compressed(
    recording: &RecordingStream,
    topic: &str,
    img: &DynamicImage,
    format: image::ImageFormat,
) {
    let mut bytes: Vec<u8> = Vec::new();

    img.to_luma8()
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();

    recording
        .log(
            format!("{}/image", topic),
            &rerun::EncodedImage::from_file_contents(bytes),
        )
        .unwrap();
}

pub fn id_to_color(id: usize) -> (u8, u8, u8, u8) {
    let mut rng = ChaCha8Rng::seed_from_u64(id as u64);
    let color_num = rng.random_range(0..2u32.pow(24));
    (
        ((color_num >> 16) % 256) as u8,
        ((color_num >> 8) % 256) as u8,
        (color_num % 256) as u8,
        255,
    )
}

/// rerun use top left corner as (0, 0)
pub fn rerun_shift(p2ds: &[(f32, f32)]) -> Vec<(f32, f32)> {
    p2ds.iter().map(|(x, y)| (*x + 0.5, *y + 0.5)).collect()
}

pub fn log_keypoints(recording: &RecordingStream, topic: &str, keypoints: &[KeyPoint]) {
    let (pts, colors): (Vec<_>, Vec<_>) = keypoints
        .iter()
        .enumerate()
        .map(|(i, kp)| ((kp.x, kp.y), id_to_color(i)))
        .unzip();
    let pts = rerun_shift(&pts);

    recording
        .log(
            format!("{}/pts", topic),
            &rerun::Points2D::new(pts)
                .with_colors(colors)
                .with_radii([rerun::Radius::new_ui_points(3.0)]),
        )
        .unwrap();
}

/// Closed green outline, the projected-corner overlay of the find samples.
pub fn log_quad(recording: &RecordingStream, topic: &str, corners: &[Vec2]) {
    let mut strip: Vec<(f32, f32)> = corners.iter().map(|p| (p.x, p.y)).collect();
    if let Some(&first) = strip.first() {
        strip.push(first);
    }
    recording
        .log(
            format!("{}/quad", topic),
            &rerun::LineStrips2D::new([rerun_shift(&strip)])
                .with_colors([(0, 255, 0, 255)])
                .with_radii([rerun::Radius::new_ui_points(1.5)]),
        )
        .unwrap();
}

/// Tracked bounding box.
pub fn log_bbox(recording: &RecordingStream, topic: &str, rect: &Rect) {
    let x = rect.x as f32;
    let y = rect.y as f32;
    let (w, h) = (rect.w as f32, rect.h as f32);
    let strip = vec![(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)];
    recording
        .log(
            format!("{}/bbox", topic),
            &rerun::LineStrips2D::new([rerun_shift(&strip)])
                .with_colors([(0, 0, 255, 255)])
                .with_radii([rerun::Radius::new_ui_points(1.5)]),
        )
        .unwrap();
}

/// Match lines between a reference image and a frame laid out side by
/// side, colored by descriptor distance.
pub fn log_match_lines(
    recording: &RecordingStream,
    topic: &str,
    query_kps: &[KeyPoint],
    train_kps: &[KeyPoint],
    matches: &[Match],
    train_x_offset: f32,
) {
    let gradient = colorous::TURBO;
    let (strips, colors): (Vec<_>, Vec<_>) = matches
        .iter()
        .map(|m| {
            let q = &query_kps[m.query_idx];
            let t = &train_kps[m.train_idx];
            let c = gradient.eval_continuous((m.distance as f64 / 256.0).min(1.0));
            (
                rerun_shift(&[(q.x, q.y), (t.x + train_x_offset, t.y)]),
                (c.r, c.g, c.b, 255u8),
            )
        })
        .unzip();
    recording
        .log(
            format!("{}/matches", topic),
            &rerun::LineStrips2D::new(strips)
                .with_colors(colors)
                .with_radii([rerun::Radius::new_ui_points(1.0)]),
        )
        .unwrap();
}

pub fn log_label(recording: &RecordingStream, topic: &str, text: &str) {
    recording
        .log(format!("{}/label", topic), &rerun::TextLog::new(text))
        .unwrap();
}

/// Drops a previously logged overlay so stale annotations do not linger on
/// frames without a match.
pub fn log_clear(recording: &RecordingStream, topic: &str) {
    recording
        .log(topic.to_string(), &rerun::Clear::recursive())
        .unwrap();
}
