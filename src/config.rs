use crate::common::{DomainError, DomainResult};
use crate::domains::proximity::{EmbeddingParams, ProximityGraphBuilder, SpeOptimizer};
use crate::domains::scenario::{ScenarioGenerator, ScenarioKind, ScenarioParams, WalkParams};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub embedding: EmbeddingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub scenario: ScenarioKind,
    pub seed: u64,
    /// Agents walking each path of the scenario.
    pub num_nodes: usize,
    pub timesteps: u64,
    pub width: f64,
    pub offset_max: f64,
    pub speed_avg: f64,
    pub speed_sigma: f64,
    pub sinus_amplitude: f64,
    pub parallel_distance: f64,
    /// Degrees.
    pub crossing_angle: f64,
    pub anchors_per_path: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub max_rounds: usize,
    pub rate: f64,
    pub detection_radius: f64,
    pub hop_distance: Option<f64>,
    /// Emit ground truth instead of estimates.
    pub skip: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<String>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Checks every tunable up front so a bad value fails before any work is done.
    pub fn validate(&self) -> DomainResult<()> {
        let generator = self.simulation.generator();
        crate::domains::scenario::build_paths(generator.kind, &generator.params)?;
        crate::domains::scenario::PathWalker::new(generator.walk)?;

        let params = self.embedding.params();
        ProximityGraphBuilder::new(params.d_max, params.d_hop)?;
        SpeOptimizer::new(params.max_rounds, params.rate)?;
        if self.simulation.num_nodes == 0 {
            return Err(DomainError::invalid_configuration(
                "num_nodes must be at least 1",
            ));
        }
        Ok(())
    }
}

impl SimulationConfig {
    pub fn generator(&self) -> ScenarioGenerator {
        ScenarioGenerator {
            kind: self.scenario,
            params: ScenarioParams {
                width: self.width,
                sinus_amplitude: self.sinus_amplitude,
                parallel_distance: self.parallel_distance,
                crossing_angle: self.crossing_angle,
            },
            walk: WalkParams {
                timesteps: self.timesteps,
                offset_max: self.offset_max,
                speed_avg: self.speed_avg,
                speed_sigma: self.speed_sigma,
            },
            agents_per_path: self.num_nodes,
            anchors_per_path: self.anchors_per_path,
        }
    }
}

impl EmbeddingConfig {
    pub fn params(&self) -> EmbeddingParams {
        EmbeddingParams::new(
            self.max_rounds,
            self.rate,
            self.detection_radius,
            self.hop_distance,
        )
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let scenario = ScenarioParams::default();
        let walk = WalkParams::default();
        Self {
            scenario: ScenarioKind::Lane,
            seed: 0,
            num_nodes: 25,
            timesteps: walk.timesteps,
            width: scenario.width,
            offset_max: walk.offset_max,
            speed_avg: walk.speed_avg,
            speed_sigma: walk.speed_sigma,
            sinus_amplitude: scenario.sinus_amplitude,
            parallel_distance: scenario.parallel_distance,
            crossing_angle: scenario.crossing_angle,
            anchors_per_path: 25,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            max_rounds: 500,
            rate: 0.05,
            detection_radius: 25.0,
            hop_distance: None,
            skip: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
[simulation]
scenario = "crossing"
crossing_angle = 90.0

[embedding]
rate = 0.1
"#,
        )
        .unwrap();
        assert_eq!(config.simulation.scenario, ScenarioKind::Crossing);
        assert_eq!(config.simulation.crossing_angle, 90.0);
        assert_eq!(config.simulation.num_nodes, 25);
        assert_eq!(config.embedding.rate, 0.1);
        assert_eq!(config.embedding.max_rounds, 500);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_rate() {
        let mut config = Config::default();
        config.embedding.rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_speed_spread() {
        let mut config = Config::default();
        config.simulation.speed_sigma = -0.3;
        assert!(config.validate().is_err());
    }
}
