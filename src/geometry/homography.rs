use faer::linalg::solvers::SolveLstsqCore;
use glam::Vec2;
use log::debug;
use nalgebra as na;
use rand::seq::SliceRandom;

/// RANSAC inlier threshold in pixels. Fixed, the same value every sample
/// passes to the robust estimator.
pub const RANSAC_REPROJ_THRESHOLD: f64 = 5.0;

const RANSAC_ITERS: usize = 1000;

/// Corners of a w x h image: top-left, bottom-left, bottom-right, top-right.
pub fn image_corners(width: u32, height: u32) -> [Vec2; 4] {
    let w = (width - 1) as f32;
    let h = (height - 1) as f32;
    [
        Vec2::new(0.0, 0.0),
        Vec2::new(0.0, h),
        Vec2::new(w, h),
        Vec2::new(w, 0.0),
    ]
}

/// Similarity transform moving the centroid to the origin with mean
/// distance sqrt(2). Conditions the DLT system.
fn normalizing_transform(pts: &[Vec2]) -> Option<na::Matrix3<f64>> {
    let n = pts.len() as f64;
    let cx = pts.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let cy = pts.iter().map(|p| p.y as f64).sum::<f64>() / n;
    let mean_dist = pts
        .iter()
        .map(|p| ((p.x as f64 - cx).powi(2) + (p.y as f64 - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    if mean_dist < f64::EPSILON {
        return None;
    }
    let s = std::f64::consts::SQRT_2 / mean_dist;
    Some(na::Matrix3::new(
        s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0,
    ))
}

fn apply(h: &na::Matrix3<f64>, p: Vec2) -> na::Vector3<f64> {
    h * na::Vector3::new(p.x as f64, p.y as f64, 1.0)
}

/// Direct linear transform with h33 fixed to 1, solved by least squares
/// over all correspondences. Requires at least 4 pairs.
pub fn find_homography_dlt(src: &[Vec2], dst: &[Vec2]) -> Option<na::Matrix3<f64>> {
    if src.len() < 4 || src.len() != dst.len() {
        return None;
    }
    let t_src = normalizing_transform(src)?;
    let t_dst = normalizing_transform(dst)?;

    let n = src.len();
    let mut a: faer::Mat<f64> = faer::Mat::zeros(2 * n, 8);
    let mut b: faer::Mat<f64> = faer::Mat::zeros(2 * n, 1);
    for (r, (p, q)) in src.iter().zip(dst.iter()).enumerate() {
        let pn = apply(&t_src, *p);
        let qn = apply(&t_dst, *q);
        let (x, y) = (pn.x, pn.y);
        let (u, v) = (qn.x, qn.y);
        unsafe {
            *a.get_mut_unchecked(2 * r, 0) = x;
            *a.get_mut_unchecked(2 * r, 1) = y;
            *a.get_mut_unchecked(2 * r, 2) = 1.0;
            *a.get_mut_unchecked(2 * r, 6) = -x * u;
            *a.get_mut_unchecked(2 * r, 7) = -y * u;
            *b.get_mut_unchecked(2 * r, 0) = u;

            *a.get_mut_unchecked(2 * r + 1, 3) = x;
            *a.get_mut_unchecked(2 * r + 1, 4) = y;
            *a.get_mut_unchecked(2 * r + 1, 5) = 1.0;
            *a.get_mut_unchecked(2 * r + 1, 6) = -x * v;
            *a.get_mut_unchecked(2 * r + 1, 7) = -y * v;
            *b.get_mut_unchecked(2 * r + 1, 0) = v;
        }
    }

    let mut x = b;
    a.qr()
        .solve_lstsq_in_place_with_conj(faer::Conj::No, x.as_mut());

    let hn = na::Matrix3::new(
        *x.get(0, 0),
        *x.get(1, 0),
        *x.get(2, 0),
        *x.get(3, 0),
        *x.get(4, 0),
        *x.get(5, 0),
        *x.get(6, 0),
        *x.get(7, 0),
        1.0,
    );
    if !hn.iter().all(|v| v.is_finite()) {
        debug!("dlt produced a non-finite homography");
        return None;
    }

    let h = t_dst.try_inverse()? * hn * t_src;
    let scale = h[(2, 2)];
    if scale.abs() < f64::EPSILON {
        return Some(h);
    }
    Some(h / scale)
}

/// Projects points through a homography.
pub fn perspective_transform(pts: &[Vec2], h: &na::Matrix3<f64>) -> Vec<Vec2> {
    pts.iter()
        .map(|p| {
            let q = apply(h, *p);
            Vec2::new((q.x / q.z) as f32, (q.y / q.z) as f32)
        })
        .collect()
}

fn reproj_error(h: &na::Matrix3<f64>, p: Vec2, q: Vec2) -> f64 {
    let r = apply(h, p);
    if r.z.abs() < f64::EPSILON {
        return f64::INFINITY;
    }
    let du = r.x / r.z - q.x as f64;
    let dv = r.y / r.z - q.y as f64;
    (du * du + dv * dv).sqrt()
}

/// Any three collinear points make a minimal sample useless.
fn is_degenerate(sample: &[Vec2]) -> bool {
    for i in 0..sample.len() {
        for j in (i + 1)..sample.len() {
            for k in (j + 1)..sample.len() {
                let ab = sample[j] - sample[i];
                let ac = sample[k] - sample[i];
                if (ab.x * ac.y - ab.y * ac.x).abs() < 1e-3 {
                    return true;
                }
            }
        }
    }
    false
}

/// Robust homography from point correspondences: minimal 4-point DLT
/// hypotheses, forward reprojection scoring, refit on the best inlier set.
pub fn find_homography_ransac(
    src: &[Vec2],
    dst: &[Vec2],
    reproj_threshold: f64,
) -> Option<na::Matrix3<f64>> {
    if src.len() < 4 || src.len() != dst.len() {
        return None;
    }
    if src.len() == 4 {
        if is_degenerate(src) || is_degenerate(dst) {
            return None;
        }
        return find_homography_dlt(src, dst);
    }

    let mut rng = rand::rng();
    let mut indices: Vec<usize> = (0..src.len()).collect();
    let mut best_inliers: Vec<usize> = Vec::new();
    for _ in 0..RANSAC_ITERS {
        indices.shuffle(&mut rng);
        let sample_src: Vec<Vec2> = indices[..4].iter().map(|&i| src[i]).collect();
        let sample_dst: Vec<Vec2> = indices[..4].iter().map(|&i| dst[i]).collect();
        if is_degenerate(&sample_src) || is_degenerate(&sample_dst) {
            continue;
        }
        let Some(h) = find_homography_dlt(&sample_src, &sample_dst) else {
            continue;
        };
        let inliers: Vec<usize> = (0..src.len())
            .filter(|&i| reproj_error(&h, src[i], dst[i]) < reproj_threshold)
            .collect();
        if inliers.len() > best_inliers.len() {
            best_inliers = inliers;
            if best_inliers.len() == src.len() {
                break;
            }
        }
    }

    if best_inliers.len() < 4 {
        debug!("ransac kept {} inliers, need 4", best_inliers.len());
        return None;
    }
    let inlier_src: Vec<Vec2> = best_inliers.iter().map(|&i| src[i]).collect();
    let inlier_dst: Vec<Vec2> = best_inliers.iter().map(|&i| dst[i]).collect();
    find_homography_dlt(&inlier_src, &inlier_dst)
}
