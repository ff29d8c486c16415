use super::graph::ProximityGraphBuilder;
use super::spe::SpeOptimizer;
use super::types::{AgentId, EmbeddingParams, Timestep, Trajectory, TrajectorySample, TrajectorySet};
use crate::common::{DomainError, DomainResult, Position2D};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Participant {
    agent: AgentId,
    truth: Position2D,
}

/// Per-agent state carried across frames. `estimate` stays empty until the
/// agent's first frame, where it is seeded with the true position.
#[derive(Debug, Default)]
struct AgentTrack {
    estimate: Option<Position2D>,
    output: Trajectory,
}

/// Replays trajectories frame by frame, estimating every agent's position from
/// proximity alone and warm-starting each frame from the previous estimates.
#[derive(Debug, Clone, Copy)]
pub struct TemporalEmbeddingOrchestrator {
    builder: ProximityGraphBuilder,
    optimizer: SpeOptimizer,
}

impl TemporalEmbeddingOrchestrator {
    pub fn new(params: EmbeddingParams) -> DomainResult<Self> {
        Ok(Self {
            builder: ProximityGraphBuilder::new(params.d_max, params.d_hop)?,
            optimizer: SpeOptimizer::new(params.max_rounds, params.rate)?,
        })
    }

    pub fn builder(&self) -> &ProximityGraphBuilder {
        &self.builder
    }

    pub fn optimizer(&self) -> &SpeOptimizer {
        &self.optimizer
    }

    pub fn run<R: Rng + ?Sized>(
        &self,
        trajectories: &TrajectorySet,
        anchors: &[Position2D],
        rng: &mut R,
    ) -> DomainResult<TrajectorySet> {
        let frames = group_by_timestep(trajectories)?;
        let mut tracks: BTreeMap<AgentId, AgentTrack> = trajectories
            .agent_ids()
            .map(|id| (id, AgentTrack::default()))
            .collect();

        for (timestep, participants) in &frames {
            let size = participants.len() + anchors.len();
            let mut truth = Vec::with_capacity(size);
            let mut estimates = Vec::with_capacity(size);
            let mut is_anchor = Vec::with_capacity(size);

            for p in participants {
                let track = tracks.entry(p.agent).or_default();
                let warm = *track.estimate.get_or_insert(p.truth);
                truth.push(p.truth);
                estimates.push(warm);
                is_anchor.push(false);
            }
            truth.extend_from_slice(anchors);
            estimates.extend_from_slice(anchors);
            is_anchor.resize(size, true);

            let graph = self.builder.build(&truth)?;
            let stats = self
                .optimizer
                .embed(&mut estimates, graph.edges(), &is_anchor, rng)?;
            debug!(
                timestep = *timestep,
                agents = participants.len(),
                edges = graph.len(),
                corrections = stats.corrections,
                degenerate = stats.degenerate,
                "frame embedded"
            );

            for (p, estimate) in participants.iter().zip(&estimates) {
                let track = tracks.entry(p.agent).or_default();
                track.estimate = Some(*estimate);
                track.output.push(TrajectorySample {
                    position: *estimate,
                    timestep: *timestep,
                });
            }
        }

        Ok(tracks
            .into_iter()
            .map(|(id, track)| (id, track.output))
            .collect())
    }
}

fn group_by_timestep(
    trajectories: &TrajectorySet,
) -> DomainResult<BTreeMap<Timestep, Vec<Participant>>> {
    let mut frames: BTreeMap<Timestep, Vec<Participant>> = BTreeMap::new();
    for (agent, trajectory) in trajectories.iter() {
        let mut seen = BTreeSet::new();
        for sample in trajectory {
            if !seen.insert(sample.timestep) {
                return Err(DomainError::DuplicateTimestep {
                    agent,
                    timestep: sample.timestep,
                });
            }
            frames.entry(sample.timestep).or_default().push(Participant {
                agent,
                truth: sample.position,
            });
        }
    }
    Ok(frames)
}
