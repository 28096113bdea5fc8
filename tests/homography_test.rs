use glam::Vec2;
use image_tracking::geometry::{
    find_homography_dlt, find_homography_ransac, image_corners, perspective_transform,
};
use nalgebra as na;

fn scatter() -> Vec<Vec2> {
    vec![
        Vec2::new(12.0, 18.0),
        Vec2::new(85.0, 10.0),
        Vec2::new(30.0, 70.0),
        Vec2::new(55.0, 22.0),
        Vec2::new(15.0, 45.0),
        Vec2::new(78.0, 60.0),
        Vec2::new(40.0, 38.0),
        Vec2::new(66.0, 81.0),
        Vec2::new(25.0, 90.0),
        Vec2::new(90.0, 35.0),
        Vec2::new(50.0, 55.0),
        Vec2::new(70.0, 12.0),
    ]
}

fn projective_h() -> na::Matrix3<f64> {
    na::Matrix3::new(
        1.2, 0.1, 5.0, -0.05, 0.9, 10.0, 3e-4, 2e-4, 1.0,
    )
}

#[test]
fn test_dlt_recovers_translation() {
    let src = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(100.0, 0.0),
        Vec2::new(100.0, 100.0),
        Vec2::new(0.0, 100.0),
    ];
    let dst: Vec<Vec2> = src.iter().map(|p| *p + Vec2::new(10.0, 20.0)).collect();
    let h = find_homography_dlt(&src, &dst).expect("translation is solvable");
    let mapped = perspective_transform(&src, &h);
    for (m, d) in mapped.iter().zip(dst.iter()) {
        assert!((m.x - d.x).abs() < 1e-4);
        assert!((m.y - d.y).abs() < 1e-4);
    }
}

#[test]
fn test_corner_projection_matches_reference_transform() {
    let h_true = projective_h();
    let src = scatter();
    let dst = perspective_transform(&src, &h_true);

    let h = find_homography_ransac(&src, &dst, 5.0).expect("clean data is solvable");

    let corners = image_corners(100, 80);
    let expected = perspective_transform(&corners, &h_true);
    let recovered = perspective_transform(&corners, &h);
    for (r, e) in recovered.iter().zip(expected.iter()) {
        assert!((r.x - e.x).abs() < 1e-2);
        assert!((r.y - e.y).abs() < 1e-2);
    }
}

#[test]
fn test_ransac_rejects_outliers() {
    let h_true = projective_h();
    let src = scatter();
    let mut dst = perspective_transform(&src, &h_true);
    // corrupt three correspondences well beyond the inlier threshold
    dst[2] += Vec2::new(60.0, -45.0);
    dst[7] += Vec2::new(-80.0, 30.0);
    dst[10] += Vec2::new(25.0, 70.0);

    let h = find_homography_ransac(&src, &dst, 5.0).expect("inlier majority is solvable");

    let corners = image_corners(100, 80);
    let expected = perspective_transform(&corners, &h_true);
    let recovered = perspective_transform(&corners, &h);
    for (r, e) in recovered.iter().zip(expected.iter()) {
        assert!((r.x - e.x).abs() < 1e-1);
        assert!((r.y - e.y).abs() < 1e-1);
    }
}

#[test]
fn test_degenerate_input() {
    // fewer than four pairs
    let three = vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
    assert!(find_homography_ransac(&three, &three, 5.0).is_none());

    // length mismatch
    let four = vec![
        Vec2::ZERO,
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
    ];
    assert!(find_homography_ransac(&four, &three, 5.0).is_none());

    // four collinear points
    let line: Vec<Vec2> = (0..4).map(|i| Vec2::new(i as f32 * 10.0, 5.0)).collect();
    assert!(find_homography_ransac(&line, &line, 5.0).is_none());

    // all points coincident
    let same = vec![Vec2::new(3.0, 3.0); 4];
    assert!(find_homography_ransac(&same, &same, 5.0).is_none());
}

#[test]
fn test_identity_corners_are_exact() {
    let corners = image_corners(640, 480);
    let mapped = perspective_transform(&corners, &na::Matrix3::identity());
    for (m, c) in mapped.iter().zip(corners.iter()) {
        assert!((m.x - c.x).abs() < 1e-6);
        assert!((m.y - c.y).abs() < 1e-6);
    }
}
