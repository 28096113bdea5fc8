use image_tracking::detected_features::{Descriptor, FrameFeatures, KeyPoint, TrackingTarget};
use image_tracking::geometry::perspective_transform;
use image_tracking::selector::find_best_target;

const POSITIONS: [(f32, f32); 12] = [
    (12.0, 18.0),
    (85.0, 10.0),
    (30.0, 70.0),
    (55.0, 22.0),
    (15.0, 45.0),
    (78.0, 60.0),
    (40.0, 38.0),
    (66.0, 81.0),
    (25.0, 90.0),
    (90.0, 35.0),
    (50.0, 55.0),
    (70.0, 12.0),
];

// distinct words for every index; odd multiplier keeps them unique
fn frame_descriptor(i: usize) -> Descriptor {
    let w = 0x0123_4567_89ab_cdefu64.wrapping_mul(i as u64 + 1);
    Descriptor([w, w.rotate_left(17), w.rotate_left(31), w.rotate_left(47)])
}

fn keypoint(i: usize) -> KeyPoint {
    KeyPoint {
        x: POSITIONS[i].0,
        y: POSITIONS[i].1,
        response: 1.0,
        angle: 0.0,
    }
}

fn make_frame() -> FrameFeatures {
    FrameFeatures {
        time_ns: 0,
        img_w_h: (100, 100),
        keypoints: (0..12).map(keypoint).collect(),
        descriptors: (0..12).map(frame_descriptor).collect(),
    }
}

/// A target whose descriptors are exact copies of the given frame indices,
/// so it produces exactly that many ratio-test survivors.
fn make_target(name: &str, indices: &[usize]) -> TrackingTarget {
    TrackingTarget {
        name: name.to_string(),
        img_w_h: (100, 100),
        keypoints: indices.iter().map(|&i| keypoint(i)).collect(),
        descriptors: indices.iter().map(|&i| frame_descriptor(i)).collect(),
    }
}

#[test]
fn test_selector_picks_highest_count() {
    let frame = make_frame();
    let targets = vec![
        make_target("a", &[0, 1, 2]),
        make_target("b", &[3, 4, 5, 6, 7, 8, 9]),
        make_target("c", &[10, 11]),
    ];
    let best = find_best_target(&frame, &targets).expect("should find target b");
    assert_eq!(best.target_idx, 1);
    assert_eq!(best.good_matches.len(), 7);

    // the correspondences are identity, so the homography must be too
    let mapped = perspective_transform(
        &[glam::Vec2::new(20.0, 30.0), glam::Vec2::new(80.0, 65.0)],
        &best.homography,
    );
    assert!((mapped[0].x - 20.0).abs() < 1e-3);
    assert!((mapped[0].y - 30.0).abs() < 1e-3);
    assert!((mapped[1].x - 80.0).abs() < 1e-3);
    assert!((mapped[1].y - 65.0).abs() < 1e-3);
}

#[test]
fn test_selector_needs_more_than_four_matches() {
    let frame = make_frame();
    // the best target has exactly 4 good matches, which is not enough
    let targets = vec![
        make_target("a", &[0, 1, 2]),
        make_target("b", &[3, 4, 5, 6]),
        make_target("c", &[10, 11]),
    ];
    assert!(find_best_target(&frame, &targets).is_none());
}

#[test]
fn test_selector_no_targets() {
    let frame = make_frame();
    assert!(find_best_target(&frame, &[]).is_none());
}

#[test]
fn test_selector_empty_frame() {
    let frame = FrameFeatures {
        time_ns: 0,
        img_w_h: (100, 100),
        keypoints: Vec::new(),
        descriptors: Vec::new(),
    };
    let targets = vec![make_target("a", &[0, 1, 2, 3, 4, 5])];
    assert!(find_best_target(&frame, &targets).is_none());
}
