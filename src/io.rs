use std::io::Write;

use serde::{Serialize, de::DeserializeOwned};

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(output_path: &str, object: &T) {
    let j = serde_json::to_string_pretty(object).unwrap();
    let mut file = std::fs::File::create(output_path).unwrap();
    file.write_all(j.as_bytes()).unwrap();
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: &str) -> T {
    let contents =
        std::fs::read_to_string(file_path).expect("Should have been able to read the file");
    serde_json::from_str(&contents).unwrap()
}

#[derive(serde::Serialize)]
pub struct TargetReport {
    pub name: String,
    /// Frames this reference won the best-match selection.
    pub hits: usize,
    pub mean_good_matches: f64,
}

/// Summary of one find-image run.
#[derive(serde::Serialize)]
pub struct TrackingReport {
    pub timestamp: String,
    pub frames_total: usize,
    pub frames_matched: usize,
    pub targets: Vec<TargetReport>,
}

impl TrackingReport {
    pub fn new(frames_total: usize, frames_matched: usize, targets: Vec<TargetReport>) -> Self {
        use std::time::SystemTime;
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        TrackingReport {
            timestamp: timestamp.to_string(),
            frames_total,
            frames_matched,
            targets,
        }
    }
}

pub fn write_report(output_path: &str, report: &TrackingReport) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(output_path, json)?;
    Ok(())
}
