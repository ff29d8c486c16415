use super::path::Path;
use super::walker::{PathWalker, WalkParams};
use crate::common::{DomainError, DomainResult, Position2D};
use crate::domains::proximity::{AgentId, TrajectorySet};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// Two opposing lanes on the same line.
    Lane,
    /// Two opposing sinusoidal paths.
    Sinus,
    /// Two parallel lanes some distance apart.
    Parallel,
    /// Two lanes intersecting at an angle.
    Crossing,
    /// One lane splitting into two.
    Divergent,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 5] = [
        ScenarioKind::Lane,
        ScenarioKind::Sinus,
        ScenarioKind::Parallel,
        ScenarioKind::Crossing,
        ScenarioKind::Divergent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::Lane => "lane",
            ScenarioKind::Sinus => "sinus",
            ScenarioKind::Parallel => "parallel",
            ScenarioKind::Crossing => "crossing",
            ScenarioKind::Divergent => "divergent",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ScenarioKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| DomainError::UnknownScenario {
                name: s.to_string(),
            })
    }
}

/// Geometry knobs of the scenario catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub width: f64,
    pub sinus_amplitude: f64,
    pub parallel_distance: f64,
    /// Degrees, within [0, 180].
    pub crossing_angle: f64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            width: 250.0,
            sinus_amplitude: 50.0,
            parallel_distance: 10.0,
            crossing_angle: 45.0,
        }
    }
}

pub fn build_paths(kind: ScenarioKind, params: &ScenarioParams) -> DomainResult<Vec<Path>> {
    let width = params.width;
    if !(width.is_finite() && width > 0.0) {
        return Err(DomainError::invalid_configuration(format!(
            "scenario width must be positive, got {}",
            width
        )));
    }

    let paths = match kind {
        ScenarioKind::Lane => {
            let path = Path::hline(width, 0.0);
            let back = path.reversed();
            vec![path, back]
        }
        ScenarioKind::Sinus => {
            if !params.sinus_amplitude.is_finite() {
                return Err(DomainError::invalid_configuration(format!(
                    "sinus amplitude must be finite, got {}",
                    params.sinus_amplitude
                )));
            }
            let path = Path::sinus(width, params.sinus_amplitude);
            let back = path.reversed();
            vec![path, back]
        }
        ScenarioKind::Parallel => {
            let dist = params.parallel_distance;
            if dist.is_nan() || dist < 0.0 {
                return Err(DomainError::invalid_configuration(
                    "parallel distance must be positive",
                ));
            }
            vec![Path::hline(width, -0.5 * dist), Path::hline(width, 0.5 * dist)]
        }
        ScenarioKind::Crossing => {
            if !(0.0..=180.0).contains(&params.crossing_angle) {
                return Err(DomainError::invalid_configuration(
                    "crossing angle must be in [0, 180] degrees",
                ));
            }
            let angle = params.crossing_angle.to_radians();
            let (sin, cos) = angle.sin_cos();
            vec![
                Path::new(vec![
                    Position2D::new(-0.5 * width, 0.0),
                    Position2D::new(0.5 * width, 0.0),
                ])?,
                Path::new(vec![
                    Position2D::new(-0.5 * width * cos, -0.5 * width * sin),
                    Position2D::new(0.5 * width * cos, 0.5 * width * sin),
                ])?,
            ]
        }
        ScenarioKind::Divergent => vec![Path::hline(width, 0.0), Path::corner(width)],
    };
    Ok(paths)
}

/// `count` anchors evenly spaced along the path, both end points included.
pub fn place_anchors(path: &Path, count: usize) -> Vec<Position2D> {
    match count {
        0 => Vec::new(),
        1 => vec![path.at(0.0)],
        _ => {
            let step = path.length() / (count - 1) as f64;
            (0..count).map(|k| path.at(k as f64 * step)).collect()
        }
    }
}

/// Ground truth produced by the scenario generator.
#[derive(Debug, Clone, Default)]
pub struct GeneratedScenario {
    pub anchors: Vec<Position2D>,
    pub trajectories: TrajectorySet,
}

#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    pub kind: ScenarioKind,
    pub params: ScenarioParams,
    pub walk: WalkParams,
    pub agents_per_path: usize,
    pub anchors_per_path: usize,
}

impl ScenarioGenerator {
    /// Walks `agents_per_path` agents along every path of the scenario. Each
    /// respawn opens a new trajectory with its own agent id.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> DomainResult<GeneratedScenario> {
        let paths = build_paths(self.kind, &self.params)?;
        let walker = PathWalker::new(self.walk)?;

        let mut scenario = GeneratedScenario::default();
        let mut next_id: AgentId = 0;
        for path in &paths {
            for _ in 0..self.agents_per_path {
                for trajectory in walker.walk(path, rng) {
                    scenario.trajectories.insert(next_id, trajectory);
                    next_id += 1;
                }
            }
            scenario
                .anchors
                .extend(place_anchors(path, self.anchors_per_path));
        }
        Ok(scenario)
    }
}
