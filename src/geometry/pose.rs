use glam::{Vec2, Vec3};
use nalgebra as na;
use sqpnp_simple::sqpnp_solve_glam;

use crate::types::RvecTvec;

/// Pinhole intrinsics without distortion.
pub struct PinholeIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl PinholeIntrinsics {
    /// Hand-set stand-in used by the pose sample: focal length 1.0 and the
    /// principal point at the image center. Not a calibrated model; poses
    /// computed with it are illustrative, not metric.
    pub fn placeholder(img_w_h: (u32, u32)) -> Self {
        Self {
            fx: 1.0,
            fy: 1.0,
            cx: img_w_h.0 as f64 / 2.0,
            cy: img_w_h.1 as f64 / 2.0,
        }
    }

    pub fn camera_matrix(&self) -> na::Matrix3<f64> {
        na::Matrix3::new(self.fx, 0.0, self.cx, 0.0, self.fy, self.cy, 0.0, 0.0, 1.0)
    }

    /// Pixel coordinates to the normalized z=1 plane.
    pub fn normalize(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            ((p.x as f64 - self.cx) / self.fx) as f32,
            ((p.y as f64 - self.cy) / self.fy) as f32,
        )
    }
}

/// 3D corners of a planar w x h object lying in the z=0 plane, in the same
/// order as `image_corners`.
pub fn planar_object_points(img_w_h: (u32, u32)) -> [Vec3; 4] {
    let w = (img_w_h.0 - 1) as f32;
    let h = (img_w_h.1 - 1) as f32;
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, h, 0.0),
        Vec3::new(w, h, 0.0),
        Vec3::new(w, 0.0, 0.0),
    ]
}

/// Recovers the camera pose from object points and their projections.
/// Returns `None` when the solver rejects the input.
pub fn solve_planar_pose(
    obj_pts: &[Vec3],
    img_pts: &[Vec2],
    intrinsics: &PinholeIntrinsics,
) -> Option<RvecTvec> {
    if obj_pts.len() != img_pts.len() || obj_pts.len() < 4 {
        return None;
    }
    let normalized: Vec<Vec2> = img_pts.iter().map(|p| intrinsics.normalize(*p)).collect();
    let (r, t) = sqpnp_solve_glam(obj_pts, &normalized)?;
    Some(RvecTvec::new(
        na::Vector3::new(r.0, r.1, r.2),
        na::Vector3::new(t.0, t.1, t.2),
    ))
}

/// Rotation matrix to XYZ Euler angles in degrees. Near the gimbal-lock
/// singularity (`sy < 1e-6`) the z angle is fixed to 0.
pub fn rotation_to_euler_deg(r: &na::Matrix3<f64>) -> na::Vector3<f64> {
    let sy = (r[(0, 0)] * r[(0, 0)] + r[(1, 0)] * r[(1, 0)]).sqrt();
    let (x, y, z) = if sy >= 1e-6 {
        (
            r[(2, 1)].atan2(r[(2, 2)]),
            (-r[(2, 0)]).atan2(sy),
            r[(1, 0)].atan2(r[(0, 0)]),
        )
    } else {
        (
            (-r[(1, 2)]).atan2(r[(1, 1)]),
            (-r[(2, 0)]).atan2(sy),
            0.0,
        )
    };
    na::Vector3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}
