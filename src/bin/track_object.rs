use clap::Parser;
use image_tracking::config::TrackingConfig;
use image_tracking::data_loader::load_frames;
use image_tracking::io::object_from_json;
use image_tracking::tracker::{CorrelationTracker, Rect};
use image_tracking::visualization::{log_bbox, log_clear, log_image_as_compressed, log_label};
use rerun::TimeCell;

fn parse_rect(s: &str) -> Result<Rect, String> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|v| v.trim().parse().map_err(|_| format!("bad bbox value {:?}", v)))
        .collect::<Result<_, _>>()?;
    match parts[..] {
        [x, y, w, h] => Ok(Rect::new(x, y, w, h)),
        _ => Err("bbox must be x,y,w,h".to_string()),
    }
}

/// Track a single object through a frame sequence from a bounding box on
/// the first frame.
#[derive(Parser)]
#[command(version, about, author)]
struct TrackObjectCli {
    /// path to a folder of frames (*.png, *.jpg)
    frames: String,

    /// object box on the first frame as x,y,w,h
    #[arg(long, value_parser = parse_rect)]
    bbox: Rect,

    /// optional JSON config, see TrackingConfig
    #[arg(long)]
    config: Option<String>,

    /// save the rerun log to this file instead of spawning a viewer
    #[arg(long)]
    save: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = TrackObjectCli::parse();
    let config: TrackingConfig = cli
        .config
        .as_ref()
        .map(|p| object_from_json(p))
        .unwrap_or_default();

    let recording = if let Some(path) = &cli.save {
        rerun::RecordingStreamBuilder::new("track-object")
            .save(path)
            .unwrap()
    } else {
        rerun::RecordingStreamBuilder::new("track-object")
            .spawn()
            .unwrap()
    };

    let frames = load_frames(&cli.frames).expect("failed to load frames");
    let first = frames.first().expect("no frames");
    let mut tracker = CorrelationTracker::init(&first.image.to_luma8(), cli.bbox, &config.tracker)
        .expect("bbox does not fit the first frame");

    let topic = "/cam0";
    let mut tracked = 0usize;
    for frame in &frames[1..] {
        recording.set_time(
            "stable",
            TimeCell::from_timestamp_nanos_since_epoch(frame.time_ns),
        );
        log_image_as_compressed(&recording, topic, &frame.image, image::ImageFormat::Jpeg);

        match tracker.update(&frame.image.to_luma8()) {
            Some(bbox) => {
                log_bbox(&recording, topic, &bbox);
                log_label(&recording, topic, "Correlation Tracker");
                tracked += 1;
            }
            None => {
                log_clear(&recording, format!("{}/bbox", topic).as_str());
                log_label(&recording, topic, "Tracking failure detected");
            }
        }
    }
    println!("tracked {}/{} frames", tracked, frames.len() - 1);
}
