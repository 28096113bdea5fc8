use std::io::{Error, ErrorKind};
use std::path::Path;

use glob::glob;
use image::{DynamicImage, ImageReader};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::detected_features::TrackingTarget;
use crate::features::OrbExtractor;

/// One image of a frame sequence.
pub struct Frame {
    pub time_ns: i64,
    pub image: DynamicImage,
}

/// Numeric file stems are nanosecond timestamps; anything else gets a
/// synthetic 10 Hz timestamp from its position in the sorted listing.
fn path_to_timestamp(path: &Path, idx: usize) -> i64 {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(idx as i64 * 100_000_000)
}

fn img_filter(rp: glob::GlobResult) -> Option<std::path::PathBuf> {
    if let Ok(p) = rp {
        for ext in &[".png", ".jpg"] {
            if p.as_os_str().to_string_lossy().ends_with(ext) {
                return Some(p);
            }
        }
    }
    None
}

/// Loads every frame of an image directory, sorted by timestamp. Decoding
/// runs in parallel; iteration afterwards is strictly sequential. An empty
/// or missing directory is a startup error, a single unreadable frame is
/// skipped with a warning.
pub fn load_frames(dir: &str) -> std::io::Result<Vec<Frame>> {
    let paths = glob(format!("{}/*", dir).as_str())
        .map_err(|e| Error::new(ErrorKind::InvalidInput, e.to_string()))?;
    let mut sorted_paths: Vec<std::path::PathBuf> =
        paths.into_iter().filter_map(img_filter).collect();
    sorted_paths.sort();
    if sorted_paths.is_empty() {
        return Err(Error::new(
            ErrorKind::NotFound,
            format!("no frames under {}", dir),
        ));
    }

    let mut frames: Vec<Frame> = sorted_paths
        .par_iter()
        .enumerate()
        .progress_count(sorted_paths.len() as u64)
        .filter_map(|(idx, path)| {
            let decoded = ImageReader::open(path)
                .map_err(|e| e.to_string())
                .and_then(|r| r.decode().map_err(|e| e.to_string()));
            match decoded {
                Ok(image) => Some(Frame {
                    time_ns: path_to_timestamp(path, idx),
                    image,
                }),
                Err(e) => {
                    log::warn!("skipping unreadable frame {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect();
    frames.sort_by_key(|f| f.time_ns);
    Ok(frames)
}

/// Loads the reference images and extracts their features once, up front.
/// The resulting set is immutable for the rest of the run.
pub fn load_targets(paths: &[String], orb: &OrbExtractor) -> std::io::Result<Vec<TrackingTarget>> {
    let targets: Vec<_> = paths
        .par_iter()
        .progress_count(paths.len() as u64)
        .map(|path| {
            let img = ImageReader::open(path)?
                .decode()
                .map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;
            let gray = img.to_luma8();
            let (keypoints, descriptors) = orb.detect_and_compute(&gray);
            log::trace!("{}: {} keypoints", path, keypoints.len());
            Ok(TrackingTarget {
                name: path.clone(),
                img_w_h: gray.dimensions(),
                keypoints,
                descriptors,
            })
        })
        .collect::<std::io::Result<_>>()?;
    Ok(targets)
}
