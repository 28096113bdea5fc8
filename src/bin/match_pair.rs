use clap::Parser;
use image::ImageReader;
use image_tracking::detected_features::KeyPoint;
use image_tracking::features::OrbExtractor;
use image_tracking::matching::{knn2_match, ratio_filter};
use image_tracking::visualization::{log_image_as_compressed, log_keypoints, log_match_lines};

/// Detect ORB features in two images and show the ratio-test matches side
/// by side.
#[derive(Parser)]
#[command(version, about, author)]
struct MatchPairCli {
    /// query image (the object to look for)
    query: String,

    /// train image (the scene)
    train: String,

    /// save the rerun log to this file instead of spawning a viewer
    #[arg(long)]
    save: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = MatchPairCli::parse();

    let query = ImageReader::open(&cli.query)
        .expect("cannot open query image")
        .decode()
        .expect("cannot decode query image")
        .to_luma8();
    let train = ImageReader::open(&cli.train)
        .expect("cannot open train image")
        .decode()
        .expect("cannot decode train image")
        .to_luma8();

    let orb = OrbExtractor::default();
    let (query_kps, query_descs) = orb.detect_and_compute(&query);
    let (train_kps, train_descs) = orb.detect_and_compute(&train);
    println!(
        "{} query keypoints, {} train keypoints",
        query_kps.len(),
        train_kps.len()
    );

    let knn = knn2_match(&query_descs, &train_descs);
    let good = ratio_filter(&knn);
    println!("{} candidate pairs, {} pass the ratio test", knn.len(), good.len());

    let recording = if let Some(path) = &cli.save {
        rerun::RecordingStreamBuilder::new("match-pair")
            .save(path)
            .unwrap()
    } else {
        rerun::RecordingStreamBuilder::new("match-pair")
            .spawn()
            .unwrap()
    };

    // side-by-side canvas, train image shifted right of the query
    let (qw, qh) = query.dimensions();
    let (tw, th) = train.dimensions();
    let mut canvas = image::GrayImage::new(qw + tw, qh.max(th));
    image::imageops::replace(&mut canvas, &query, 0, 0);
    image::imageops::replace(&mut canvas, &train, qw as i64, 0);

    let topic = "/pair";
    log_image_as_compressed(
        &recording,
        topic,
        &image::DynamicImage::ImageLuma8(canvas),
        image::ImageFormat::Png,
    );

    let shifted: Vec<KeyPoint> = query_kps
        .iter()
        .copied()
        .chain(train_kps.iter().map(|kp| KeyPoint {
            x: kp.x + qw as f32,
            ..*kp
        }))
        .collect();
    log_keypoints(&recording, topic, &shifted);
    log_match_lines(&recording, topic, &query_kps, &train_kps, &good, qw as f32);
}
