//! Time apportioning for the sampling pass.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning for the sampling fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Samples each move should get; sizes the residual exact search.
    pub target_samples: u32,
    /// Upper bound on the residual empty-cell count.
    pub max_switch_depth: usize,
    /// Smallest sampling slice a move can receive.
    pub min_slice: Duration,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            target_samples: 200,
            max_switch_depth: 10,
            min_slice: Duration::from_millis(5),
        }
    }
}

/// Throughput of the exact pass, in positions per millisecond.
pub fn states_per_ms(states: u64, elapsed: Duration) -> f64 {
    let ms = (elapsed.as_secs_f64() * 1000.0).max(1.0);
    states as f64 / ms
}

/// Sampling weight per move.
///
/// Moves the exact pass measured use their state count; moves it never
/// reached are assumed to cost as much as the most expensive measured one.
pub fn sampling_weights(measured: &[u64], moves: usize) -> Vec<u64> {
    let fallback = measured.iter().copied().max().unwrap_or(1).max(1);
    (0..moves)
        .map(|i| measured.get(i).copied().unwrap_or(fallback).max(1))
        .collect()
}

/// Share of `remaining` for a move of `weight`, out of `weight_left` still
/// to be served (this move included). Never below `min_slice`.
pub fn slice(remaining: Duration, weight: u64, weight_left: u64, min_slice: Duration) -> Duration {
    let fraction = if weight_left == 0 {
        1.0
    } else {
        weight as f64 / weight_left as f64
    };
    remaining.mul_f64(fraction.min(1.0)).max(min_slice)
}

/// Residual depth for a sampling run.
///
/// A residual exact search over `d` empty cells costs about `d!`
/// positions. The depth is the largest `d` whose cost still lets the slice
/// hold `target_samples` searches at the measured throughput, clamped to
/// `1..=min(empty - 1, max_switch_depth)`.
pub fn switch_depth(states_per_ms: f64, slice: Duration, empty: usize, config: &SamplingConfig) -> usize {
    let ceiling = empty.saturating_sub(1).min(config.max_switch_depth).max(1);
    let per_sample = states_per_ms * slice.as_secs_f64() * 1000.0 / f64::from(config.target_samples.max(1));

    let mut depth = 1;
    let mut cost = 1.0;
    while depth < ceiling {
        let next = cost * (depth + 1) as f64;
        if next > per_sample {
            break;
        }
        cost = next;
        depth += 1;
    }
    depth
}
