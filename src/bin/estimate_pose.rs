use clap::Parser;
use image_tracking::config::TrackingConfig;
use image_tracking::data_loader::{load_frames, load_targets};
use image_tracking::features::OrbExtractor;
use image_tracking::geometry::{
    PinholeIntrinsics, RANSAC_REPROJ_THRESHOLD, find_homography_ransac, image_corners,
    perspective_transform, planar_object_points, rotation_to_euler_deg, solve_planar_pose,
};
use image_tracking::io::object_from_json;
use image_tracking::matching::good_matches;
use image_tracking::selector::MIN_MATCHES_FOR_HOMOGRAPHY;
use image_tracking::visualization::{log_clear, log_image_as_compressed, log_label, log_quad};
use rerun::TimeCell;

/// Locate a single reference image in every frame and estimate its pose
/// with a placeholder camera matrix. The focal length is a hand-set guess,
/// so the printed pose is illustrative rather than metric.
#[derive(Parser)]
#[command(version, about, author)]
struct EstimatePoseCli {
    /// path to a folder of frames (*.png, *.jpg)
    frames: String,

    /// reference image to locate
    target: String,

    /// optional JSON config, see TrackingConfig
    #[arg(long)]
    config: Option<String>,

    /// save the rerun log to this file instead of spawning a viewer
    #[arg(long)]
    save: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = EstimatePoseCli::parse();
    let config: TrackingConfig = cli
        .config
        .as_ref()
        .map(|p| object_from_json(p))
        .unwrap_or_default();
    let orb = OrbExtractor::new(&config.orb);

    let recording = if let Some(path) = &cli.save {
        rerun::RecordingStreamBuilder::new("estimate-pose")
            .save(path)
            .unwrap()
    } else {
        rerun::RecordingStreamBuilder::new("estimate-pose")
            .spawn()
            .unwrap()
    };

    let targets =
        load_targets(std::slice::from_ref(&cli.target), &orb).expect("failed to load reference");
    let target = &targets[0];
    let frames = load_frames(&cli.frames).expect("failed to load frames");

    let obj_pts = planar_object_points(target.img_w_h);
    let corners = image_corners(target.img_w_h.0, target.img_w_h.1);

    let topic = "/cam0";
    for frame in &frames {
        recording.set_time(
            "stable",
            TimeCell::from_timestamp_nanos_since_epoch(frame.time_ns),
        );
        log_image_as_compressed(&recording, topic, &frame.image, image::ImageFormat::Jpeg);

        let gray = frame.image.to_luma8();
        let (keypoints, descriptors) = orb.detect_and_compute(&gray);

        let matches = good_matches(&target.descriptors, &descriptors);
        let homography = if matches.len() > MIN_MATCHES_FOR_HOMOGRAPHY {
            let (src, dst): (Vec<_>, Vec<_>) = matches
                .iter()
                .map(|m| {
                    (
                        target.keypoints[m.query_idx].pt(),
                        keypoints[m.train_idx].pt(),
                    )
                })
                .unzip();
            find_homography_ransac(&src, &dst, RANSAC_REPROJ_THRESHOLD)
        } else {
            None
        };

        let Some(homography) = homography else {
            log_clear(&recording, format!("{}/quad", topic).as_str());
            log_clear(&recording, format!("{}/label", topic).as_str());
            continue;
        };

        let quad = perspective_transform(&corners, &homography);
        log_quad(&recording, topic, &quad);

        let intrinsics = PinholeIntrinsics::placeholder(gray.dimensions());
        if let Some(rt) = solve_planar_pose(&obj_pts, &quad, &intrinsics) {
            let rmat = rt.rotation();
            let euler = rotation_to_euler_deg(&rmat);
            println!("rotation matrix:{}", rmat);
            println!("translation vector:{}", rt.tvec);
            println!(
                "euler angles (x, y, z): {:.2} {:.2} {:.2}",
                euler.x, euler.y, euler.z
            );
            log_label(
                &recording,
                topic,
                &format!(
                    "Position: x={:.2}, y={:.2}, z={:.2} | Rotation: x={:.2}, y={:.2}, z={:.2}",
                    rt.tvec.x, rt.tvec.y, rt.tvec.z, euler.x, euler.y, euler.z
                ),
            );
        }
    }
}
