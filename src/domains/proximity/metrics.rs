use super::types::{Timestep, TrajectorySet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Localization error of estimated trajectories against ground truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub samples: usize,
    pub mean: f64,
    pub max: f64,
}

impl ErrorSummary {
    /// Compares samples matched by agent and timestep; unmatched samples are ignored.
    pub fn between(truth: &TrajectorySet, estimate: &TrajectorySet) -> Self {
        let mut summary = ErrorSummary::default();
        let mut total = 0.0;

        for (agent, estimated) in estimate.iter() {
            let Some(actual) = truth.get(agent) else {
                continue;
            };
            let by_time: HashMap<Timestep, _> =
                actual.iter().map(|s| (s.timestep, s.position)).collect();
            for sample in estimated {
                if let Some(position) = by_time.get(&sample.timestep) {
                    let err = sample.position.distance(position);
                    total += err;
                    summary.max = summary.max.max(err);
                    summary.samples += 1;
                }
            }
        }

        if summary.samples > 0 {
            summary.mean = total / summary.samples as f64;
        }
        summary
    }
}
