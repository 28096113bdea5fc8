use std::time::Instant;

use clap::Parser;
use image_tracking::config::TrackingConfig;
use image_tracking::data_loader::{load_frames, load_targets};
use image_tracking::detected_features::FrameFeatures;
use image_tracking::features::OrbExtractor;
use image_tracking::geometry::{image_corners, perspective_transform};
use image_tracking::io::{TargetReport, TrackingReport, object_from_json, write_report};
use image_tracking::selector::find_best_target;
use image_tracking::visualization::{
    log_clear, log_image_as_compressed, log_label, log_quad,
};
use rerun::TimeCell;

/// Find the best matching reference image in every frame of a sequence and
/// outline it.
#[derive(Parser)]
#[command(version, about, author)]
struct FindImageCli {
    /// path to a folder of frames (*.png, *.jpg)
    frames: String,

    /// reference images to search for
    #[arg(required = true, num_args = 1..)]
    targets: Vec<String>,

    /// optional JSON config, see TrackingConfig
    #[arg(long)]
    config: Option<String>,

    /// save the rerun log to this file instead of spawning a viewer
    #[arg(long)]
    save: Option<String>,

    /// write a JSON run report to this file
    #[arg(long)]
    report: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = FindImageCli::parse();
    let config: TrackingConfig = cli
        .config
        .as_ref()
        .map(|p| object_from_json(p))
        .unwrap_or_default();
    let orb = OrbExtractor::new(&config.orb);

    let recording = if let Some(path) = &cli.save {
        rerun::RecordingStreamBuilder::new("find-image")
            .save(path)
            .unwrap()
    } else {
        rerun::RecordingStreamBuilder::new("find-image")
            .spawn()
            .unwrap()
    };

    let targets = load_targets(&cli.targets, &orb).expect("failed to load reference images");
    let frames = load_frames(&cli.frames).expect("failed to load frames");

    let mut hits = vec![0usize; targets.len()];
    let mut good_counts = vec![0usize; targets.len()];
    let mut frames_matched = 0usize;

    let topic = "/cam0";
    let now = Instant::now();
    for frame in &frames {
        recording.set_time(
            "stable",
            TimeCell::from_timestamp_nanos_since_epoch(frame.time_ns),
        );
        log_image_as_compressed(&recording, topic, &frame.image, image::ImageFormat::Jpeg);

        let gray = frame.image.to_luma8();
        let (keypoints, descriptors) = orb.detect_and_compute(&gray);
        let features = FrameFeatures {
            time_ns: frame.time_ns,
            img_w_h: gray.dimensions(),
            keypoints,
            descriptors,
        };

        match find_best_target(&features, &targets) {
            Some(best) => {
                let target = &targets[best.target_idx];
                let corners = image_corners(target.img_w_h.0, target.img_w_h.1);
                let quad = perspective_transform(&corners, &best.homography);
                log_quad(&recording, topic, &quad);
                log_label(&recording, topic, &target.name);
                hits[best.target_idx] += 1;
                good_counts[best.target_idx] += best.good_matches.len();
                frames_matched += 1;
            }
            None => {
                // frame stays unannotated
                log_clear(&recording, format!("{}/quad", topic).as_str());
                log_clear(&recording, format!("{}/label", topic).as_str());
            }
        }
    }
    let duration_sec = now.elapsed().as_secs_f64();
    println!("processed {} frames in {:.6} sec", frames.len(), duration_sec);
    println!("avg: {} sec", duration_sec / frames.len() as f64);
    println!("matched {}/{} frames", frames_matched, frames.len());

    if let Some(path) = &cli.report {
        let target_reports = targets
            .iter()
            .enumerate()
            .map(|(i, t)| TargetReport {
                name: t.name.clone(),
                hits: hits[i],
                mean_good_matches: if hits[i] > 0 {
                    good_counts[i] as f64 / hits[i] as f64
                } else {
                    0.0
                },
            })
            .collect();
        write_report(
            path,
            &TrackingReport::new(frames.len(), frames_matched, target_reports),
        )
        .expect("failed to write report");
    }
}
