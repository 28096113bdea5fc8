pub mod homography;
pub mod pose;

pub use homography::*;
pub use pose::*;
