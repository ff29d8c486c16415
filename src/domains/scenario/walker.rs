use super::path::Path;
use crate::common::{DomainError, DomainResult, Position2D};
use crate::domains::proximity::{Timestep, Trajectory, TrajectorySample};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkParams {
    pub timesteps: Timestep,
    pub offset_max: f64,
    pub speed_avg: f64,
    pub speed_sigma: f64,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            timesteps: 1500,
            offset_max: 5.0,
            speed_avg: 1.3,
            speed_sigma: 0.3,
        }
    }
}

/// Moves a single agent along a path at a random constant speed with a random
/// lateral offset. Running off the end of the path respawns the agent at the
/// start as a new trajectory.
#[derive(Debug, Clone)]
pub struct PathWalker {
    timesteps: Timestep,
    offset_max: f64,
    speed: Normal<f64>,
}

impl PathWalker {
    pub fn new(params: WalkParams) -> DomainResult<Self> {
        if !(params.offset_max.is_finite() && params.offset_max >= 0.0) {
            return Err(DomainError::invalid_configuration(format!(
                "offset must be non-negative, got {}",
                params.offset_max
            )));
        }
        if !(params.speed_avg.is_finite()
            && params.speed_sigma.is_finite()
            && params.speed_sigma >= 0.0)
        {
            return Err(DomainError::invalid_configuration(format!(
                "speed must be finite with a non-negative spread, got N({}, {})",
                params.speed_avg, params.speed_sigma
            )));
        }
        let speed = Normal::new(params.speed_avg, params.speed_sigma).map_err(|e| {
            DomainError::invalid_configuration(format!("speed distribution: {}", e))
        })?;
        Ok(Self {
            timesteps: params.timesteps,
            offset_max: params.offset_max,
            speed,
        })
    }

    pub fn walk<R: Rng + ?Sized>(&self, path: &Path, rng: &mut R) -> Vec<Trajectory> {
        let mut trajectories: Vec<Trajectory> = Vec::new();
        let mut d = 0.0;
        let mut speed = 0.0;
        let mut offset = Position2D::default();

        for t in 0..self.timesteps {
            if t == 0 || d > path.length() {
                d = if t == 0 {
                    rng.gen::<f64>() * path.length()
                } else {
                    0.0
                };
                speed = self.speed.sample(rng);
                offset = self.sample_offset(rng);
                trajectories.push(Vec::new());
            }

            let position = path.at(d) + offset;
            if let Some(current) = trajectories.last_mut() {
                current.push(TrajectorySample {
                    position,
                    timestep: t,
                });
            }
            d += speed;
        }

        trajectories
    }

    /// Uniform in the disk of radius `offset_max`, by rejection from the square.
    fn sample_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> Position2D {
        loop {
            let offset = Position2D::new(
                rng.gen_range(-1.0..=1.0) * self.offset_max,
                rng.gen_range(-1.0..=1.0) * self.offset_max,
            );
            if offset.norm() <= self.offset_max {
                return offset;
            }
        }
    }
}
