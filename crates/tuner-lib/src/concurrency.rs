//! Peak concurrency estimation from task time windows
//!
//! Sweeps start/end events in time order and samples the number of active
//! tasks after every event. The estimate is a percentile of those samples
//! rather than the true maximum, so a rare spike does not inflate the head
//! job allocation.

use crate::models::TimeWindow;
use std::cmp::Ordering;

/// Default percentile of concurrency samples to cover
pub const DEFAULT_PERCENTILE: f64 = 0.95;

/// Estimate how many tasks ran simultaneously at the given percentile
///
/// Events are ordered by timestamp, ends before starts at the same instant.
/// Returns at least 1, including for an empty window set.
pub fn estimate_peak_concurrency(windows: &[TimeWindow], percentile: f64) -> usize {
    if windows.is_empty() {
        return 1;
    }

    let mut events: Vec<(f64, i64)> = windows
        .iter()
        .flat_map(|w| [(w.start, 1), (w.end, -1)])
        .collect();
    events.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut active = 0i64;
    let mut samples: Vec<i64> = events
        .iter()
        .map(|(_, delta)| {
            active += delta;
            active
        })
        .collect();
    samples.sort_unstable();

    let selected = samples[percentile_index(samples.len(), percentile)];
    selected.max(1) as usize
}

/// Index `ceil(n * p) - 1`, clamped into `0..n`
fn percentile_index(len: usize, percentile: f64) -> usize {
    let rank = (len as f64 * percentile).ceil();
    match rank.partial_cmp(&1.0) {
        Some(Ordering::Greater) => (rank as usize - 1).min(len - 1),
        _ => 0,
    }
}
