use glam::Vec2;
use image_tracking::geometry::{
    PinholeIntrinsics, planar_object_points, rotation_to_euler_deg, solve_planar_pose,
};
use nalgebra as na;

#[test]
fn test_euler_identity() {
    let euler = rotation_to_euler_deg(&na::Matrix3::identity());
    assert!(euler.x.abs() < 1e-9);
    assert!(euler.y.abs() < 1e-9);
    assert!(euler.z.abs() < 1e-9);
}

#[test]
fn test_euler_roundtrip() {
    // from_euler_angles builds Rz * Ry * Rx, the convention the extraction
    // assumes
    let (roll, pitch, yaw) = (30f64.to_radians(), 20f64.to_radians(), 10f64.to_radians());
    let r = na::Rotation3::from_euler_angles(roll, pitch, yaw).into_inner();
    let euler = rotation_to_euler_deg(&r);
    assert!((euler.x - 30.0).abs() < 1e-6);
    assert!((euler.y - 20.0).abs() < 1e-6);
    assert!((euler.z - 10.0).abs() < 1e-6);
}

#[test]
fn test_euler_singular_branch() {
    // pitch of exactly 90 degrees collapses sy and pins z to 0
    let r = na::Rotation3::from_axis_angle(&na::Vector3::y_axis(), std::f64::consts::FRAC_PI_2)
        .into_inner();
    let euler = rotation_to_euler_deg(&r);
    assert!((euler.y - 90.0).abs() < 1e-6);
    assert_eq!(euler.z, 0.0);
}

#[test]
fn test_placeholder_intrinsics() {
    let intr = PinholeIntrinsics::placeholder((640, 480));
    assert_eq!(intr.fx, 1.0);
    assert_eq!(intr.fy, 1.0);
    assert_eq!(intr.cx, 320.0);
    assert_eq!(intr.cy, 240.0);

    let k = intr.camera_matrix();
    assert_eq!(k[(0, 2)], 320.0);
    assert_eq!(k[(1, 2)], 240.0);
    assert_eq!(k[(2, 2)], 1.0);

    let n = intr.normalize(Vec2::new(320.0, 240.0));
    assert_eq!(n, Vec2::ZERO);
}

#[test]
fn test_object_points_lie_in_plane() {
    let obj = planar_object_points((101, 81));
    for p in &obj {
        assert_eq!(p.z, 0.0);
    }
    assert_eq!(obj[2].x, 100.0);
    assert_eq!(obj[2].y, 80.0);
}

#[test]
fn test_planar_pose_reprojects() {
    let intr = PinholeIntrinsics::placeholder((640, 480));
    let obj = planar_object_points((101, 81));

    // camera straight above the plane center, looking down
    let tvec = na::Vector3::new(-50.0, -40.0, 100.0);
    let img_pts: Vec<Vec2> = obj
        .iter()
        .map(|p| {
            let cam = na::Vector3::new(p.x as f64, p.y as f64, 0.0) + tvec;
            Vec2::new(
                (cam.x / cam.z * intr.fx + intr.cx) as f32,
                (cam.y / cam.z * intr.fy + intr.cy) as f32,
            )
        })
        .collect();

    let rt = solve_planar_pose(&obj, &img_pts, &intr).expect("clean pose is solvable");
    let iso = rt.to_isometry();
    for (p, expected) in obj.iter().zip(img_pts.iter()) {
        let cam = iso * na::Point3::new(p.x as f64, p.y as f64, p.z as f64);
        assert!(cam.z > 0.0);
        let u = cam.x / cam.z * intr.fx + intr.cx;
        let v = cam.y / cam.z * intr.fy + intr.cy;
        assert!((u - expected.x as f64).abs() < 1e-2);
        assert!((v - expected.y as f64).abs() < 1e-2);
    }
}

#[test]
fn test_pose_input_validation() {
    let intr = PinholeIntrinsics::placeholder((640, 480));
    let obj = planar_object_points((101, 81));
    assert!(solve_planar_pose(&obj, &[Vec2::ZERO; 3], &intr).is_none());
    assert!(solve_planar_pose(&obj[..3], &[Vec2::ZERO; 3], &intr).is_none());
}
