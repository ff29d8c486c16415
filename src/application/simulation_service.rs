use crate::common::{ApplicationResult, Position2D};
use crate::config::Config;
use crate::domains::logger::DynLogger;
use crate::domains::proximity::{ErrorSummary, TemporalEmbeddingOrchestrator, TrajectorySet};
use crate::domains::scenario::GeneratedScenario;
use rand::Rng;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub anchors: Vec<Position2D>,
    pub truth: TrajectorySet,
    /// Estimated trajectories, or the ground truth when embedding was skipped.
    pub output: TrajectorySet,
    /// `None` when embedding was skipped.
    pub error: Option<ErrorSummary>,
}

impl SimulationReport {
    /// Comment lines describing the run, for output formats that carry them.
    pub fn comments(&self, config: &Config) -> Vec<String> {
        let mut lines = vec![
            format!("scenario: {}", config.simulation.scenario),
            format!("seed: {}", config.simulation.seed),
            format!(
                "agents: {}, samples: {}, anchors: {}",
                self.output.len(),
                self.output.sample_count(),
                self.anchors.len()
            ),
        ];
        match &self.error {
            Some(err) => lines.push(format!(
                "localization error: mean {:.3}, max {:.3} over {} samples",
                err.mean, err.max, err.samples
            )),
            None => lines.push("embedding skipped, ground truth".to_string()),
        }
        lines
    }
}

/// Generates a scenario, localizes its agents from proximity alone and scores
/// the estimates against ground truth.
pub struct SimulationService {
    config: Config,
    logger: DynLogger,
}

impl SimulationService {
    pub fn new(config: Config, logger: DynLogger) -> ApplicationResult<Self> {
        config.validate()?;
        Ok(Self { config, logger })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> ApplicationResult<GeneratedScenario> {
        let sim = &self.config.simulation;
        self.logger.info(&format!(
            "generating trajectories: {} ({} agents per path, {} timesteps)",
            sim.scenario, sim.num_nodes, sim.timesteps
        ));
        let scenario = sim.generator().generate(rng)?;
        self.logger.info(&format!(
            "generated {} trajectories, {} samples, {} anchors",
            scenario.trajectories.len(),
            scenario.trajectories.sample_count(),
            scenario.anchors.len()
        ));
        Ok(scenario)
    }

    pub fn embed<R: Rng + ?Sized>(
        &self,
        scenario: &GeneratedScenario,
        rng: &mut R,
    ) -> ApplicationResult<TrajectorySet> {
        let orchestrator = TemporalEmbeddingOrchestrator::new(self.config.embedding.params())?;
        self.logger.info(&format!(
            "performing embedding: {} rounds per frame, rate {}, detection radius {}, hop {}",
            orchestrator.optimizer().max_iter(),
            orchestrator.optimizer().rate(),
            orchestrator.builder().d_max(),
            orchestrator.builder().d_hop()
        ));
        let started = Instant::now();
        let estimates = orchestrator.run(&scenario.trajectories, &scenario.anchors, rng)?;
        self.logger.info(&format!(
            "embedding finished in {:.2?}",
            started.elapsed()
        ));
        Ok(estimates)
    }

    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> ApplicationResult<SimulationReport> {
        let scenario = self.generate(rng)?;

        if self.config.embedding.skip {
            self.logger.warn("skipping embedding phase");
            return Ok(SimulationReport {
                anchors: scenario.anchors,
                output: scenario.trajectories.clone(),
                truth: scenario.trajectories,
                error: None,
            });
        }

        let output = self.embed(&scenario, rng)?;
        let error = ErrorSummary::between(&scenario.trajectories, &output);
        self.logger.info(&format!(
            "localization error: mean {:.3}, max {:.3}",
            error.mean, error.max
        ));
        Ok(SimulationReport {
            anchors: scenario.anchors,
            truth: scenario.trajectories,
            output,
            error: Some(error),
        })
    }
}
