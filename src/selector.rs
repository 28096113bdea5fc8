//! Best-match selection across a set of reference targets.

use log::debug;
use nalgebra as na;

use crate::detected_features::{FrameFeatures, TrackingTarget};
use crate::geometry::homography::{RANSAC_REPROJ_THRESHOLD, find_homography_ransac};
use crate::matching::{Match, good_matches};

/// A homography is only attempted when the winner has strictly more good
/// matches than this.
pub const MIN_MATCHES_FOR_HOMOGRAPHY: usize = 4;

/// The winning reference for one frame.
pub struct BestMatch {
    pub target_idx: usize,
    pub good_matches: Vec<Match>,
    /// Maps target image coordinates into the frame.
    pub homography: na::Matrix3<f64>,
}

/// Matches the frame against every target and keeps the one with the most
/// ratio-test survivors. The first target to reach the top count wins ties.
///
/// Returns `None` when no target clears `MIN_MATCHES_FOR_HOMOGRAPHY` or the
/// homography cannot be estimated. That is a per-frame null result, not an
/// error: the caller renders the frame unannotated and moves on.
pub fn find_best_target(frame: &FrameFeatures, targets: &[TrackingTarget]) -> Option<BestMatch> {
    let mut best_idx = None;
    let mut best_matches: Vec<Match> = Vec::new();
    for (i, target) in targets.iter().enumerate() {
        let matches = good_matches(&target.descriptors, &frame.descriptors);
        debug!("target {} ({}): {} good matches", i, target.name, matches.len());
        if matches.len() > best_matches.len() {
            best_matches = matches;
            best_idx = Some(i);
        }
    }

    let target_idx = best_idx?;
    if best_matches.len() <= MIN_MATCHES_FOR_HOMOGRAPHY {
        return None;
    }

    let target = &targets[target_idx];
    let (src, dst): (Vec<_>, Vec<_>) = best_matches
        .iter()
        .map(|m| {
            (
                target.keypoints[m.query_idx].pt(),
                frame.keypoints[m.train_idx].pt(),
            )
        })
        .unzip();
    let homography = find_homography_ransac(&src, &dst, RANSAC_REPROJ_THRESHOLD)?;

    Some(BestMatch {
        target_idx,
        good_matches: best_matches,
        homography,
    })
}
