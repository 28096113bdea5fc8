//! Brute-force Hamming matching with Lowe's ratio filter.

use crate::detected_features::Descriptor;

/// Ratio-test threshold. Fixed on purpose: every sample uses Lowe's 0.7.
pub const LOWE_RATIO: f32 = 0.7;

/// A correspondence between a query (reference) descriptor and a train
/// (live frame) descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: u32,
}

/// Two nearest train descriptors for every query descriptor, best first.
/// Empty when the train set has fewer than two descriptors.
pub fn knn2_match(query: &[Descriptor], train: &[Descriptor]) -> Vec<[Match; 2]> {
    if train.len() < 2 {
        return Vec::new();
    }
    query
        .iter()
        .enumerate()
        .map(|(qi, qd)| {
            let mut best = Match {
                query_idx: qi,
                train_idx: 0,
                distance: u32::MAX,
            };
            let mut second = best;
            for (ti, td) in train.iter().enumerate() {
                let d = qd.hamming_distance(td);
                if d < best.distance {
                    second = best;
                    best = Match {
                        query_idx: qi,
                        train_idx: ti,
                        distance: d,
                    };
                } else if d < second.distance {
                    second = Match {
                        query_idx: qi,
                        train_idx: ti,
                        distance: d,
                    };
                }
            }
            [best, second]
        })
        .collect()
}

/// Lowe's ratio test: keep the best match only when it is strictly closer
/// than `LOWE_RATIO` times the second best. Ties are rejected.
pub fn ratio_filter(knn: &[[Match; 2]]) -> Vec<Match> {
    knn.iter()
        .filter(|pair| (pair[0].distance as f32) < LOWE_RATIO * pair[1].distance as f32)
        .map(|pair| pair[0])
        .collect()
}

/// 2-NN matching followed by the ratio filter.
pub fn good_matches(query: &[Descriptor], train: &[Descriptor]) -> Vec<Match> {
    ratio_filter(&knn2_match(query, train))
}

/// Plain nearest-neighbor matching with an absolute distance cutoff.
pub fn match_nearest(query: &[Descriptor], train: &[Descriptor], max_distance: u32) -> Vec<Match> {
    if train.is_empty() {
        return Vec::new();
    }
    query
        .iter()
        .enumerate()
        .filter_map(|(qi, qd)| {
            let (ti, d) = train
                .iter()
                .enumerate()
                .map(|(ti, td)| (ti, qd.hamming_distance(td)))
                .min_by_key(|&(_, d)| d)?;
            (d < max_distance).then_some(Match {
                query_idx: qi,
                train_idx: ti,
                distance: d,
            })
        })
        .collect()
}
