use crate::common::Position2D;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type AgentId = u64;
pub type Timestep = u64;

/// One observation of an agent: where it is (or is estimated to be) at `timestep`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub position: Position2D,
    pub timestep: Timestep,
}

impl TrajectorySample {
    pub fn new(x: f64, y: f64, timestep: Timestep) -> Self {
        Self {
            position: Position2D::new(x, y),
            timestep,
        }
    }
}

pub type Trajectory = Vec<TrajectorySample>;

/// Trajectories keyed by agent id. Iteration is in ascending id order, which is
/// the participant order used for every frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySet {
    agents: BTreeMap<AgentId, Trajectory>,
}

impl TrajectorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, agent: AgentId, trajectory: Trajectory) -> Option<Trajectory> {
        self.agents.insert(agent, trajectory)
    }

    pub fn get(&self, agent: AgentId) -> Option<&Trajectory> {
        self.agents.get(&agent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &Trajectory)> {
        self.agents.iter().map(|(id, t)| (*id, t))
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.agents.values().map(Vec::len).sum()
    }
}

impl FromIterator<(AgentId, Trajectory)> for TrajectorySet {
    fn from_iter<I: IntoIterator<Item = (AgentId, Trajectory)>>(iter: I) -> Self {
        Self {
            agents: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TrajectorySet {
    type Item = (AgentId, Trajectory);
    type IntoIter = std::collections::btree_map::IntoIter<AgentId, Trajectory>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.into_iter()
    }
}

/// Tunables consumed by the embedding core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingParams {
    pub max_rounds: usize,
    pub rate: f64,
    pub d_max: f64,
    pub d_hop: Option<f64>,
}

impl EmbeddingParams {
    pub fn new(max_rounds: usize, rate: f64, d_max: f64, d_hop: Option<f64>) -> Self {
        Self {
            max_rounds,
            rate,
            d_max,
            d_hop,
        }
    }
}
