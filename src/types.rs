use nalgebra as na;

/// Axis-angle rotation and translation, as returned by the PnP solver.
pub struct RvecTvec {
    pub rvec: na::Vector3<f64>,
    pub tvec: na::Vector3<f64>,
}

impl RvecTvec {
    pub fn new(rvec: na::Vector3<f64>, tvec: na::Vector3<f64>) -> RvecTvec {
        RvecTvec { rvec, tvec }
    }

    /// Rodrigues conversion of the rotation vector.
    pub fn rotation(&self) -> na::Matrix3<f64> {
        na::Rotation3::new(self.rvec).into_inner()
    }

    pub fn to_isometry(&self) -> na::Isometry3<f64> {
        na::Isometry3::new(self.tvec, self.rvec)
    }
}
