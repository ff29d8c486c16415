use crate::common::{DomainError, DomainResult};
use crate::domains::proximity::{TrajectorySet, TrajectoryWriter};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;

fn io_err(e: io::Error) -> DomainError {
    DomainError::InfrastructureError(format!("{}", e))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    GeoJson,
}

impl OutputFormat {
    pub fn writer(&self) -> Box<dyn TrajectoryWriter> {
        match self {
            OutputFormat::Text => Box::new(TextTrajectoryWriter),
            OutputFormat::GeoJson => Box::new(GeoJsonTrajectoryWriter),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::GeoJson => f.write_str("geojson"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "geojson" | "json" => Ok(OutputFormat::GeoJson),
            other => Err(DomainError::invalid_configuration(format!(
                "unknown output format: {}",
                other
            ))),
        }
    }
}

/// `-` is stdout, anything else is a file that gets created or truncated.
pub fn open_output(target: &str) -> DomainResult<Box<dyn Write>> {
    if target == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    let file = File::create(target).map_err(io_err)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// One line per agent holding its `x y` pairs in timestep order, preceded by
/// `#` comment lines.
pub struct TextTrajectoryWriter;

impl TrajectoryWriter for TextTrajectoryWriter {
    fn write_trajectories(
        &self,
        out: &mut dyn Write,
        comments: &[String],
        trajectories: &TrajectorySet,
    ) -> DomainResult<()> {
        for comment in comments {
            writeln!(out, "# {}", comment).map_err(io_err)?;
        }
        for (_, trajectory) in trajectories.iter() {
            let line = trajectory
                .iter()
                .map(|s| format!("{} {}", s.position.x, s.position.y))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "{}", line).map_err(io_err)?;
        }
        out.flush().map_err(io_err)
    }
}

/// A `FeatureCollection` with one `LineString` per agent (`Point` for single samples).
pub struct GeoJsonTrajectoryWriter;

impl GeoJsonTrajectoryWriter {
    pub fn collection(comments: &[String], trajectories: &TrajectorySet) -> FeatureCollection {
        let features = trajectories
            .iter()
            .filter(|(_, trajectory)| !trajectory.is_empty())
            .map(|(agent, trajectory)| {
                let coords: Vec<Vec<f64>> = trajectory
                    .iter()
                    .map(|s| vec![s.position.x, s.position.y])
                    .collect();
                let value = match coords.as_slice() {
                    [single] => Value::Point(single.clone()),
                    _ => Value::LineString(coords),
                };
                let mut feature = Feature::from(Geometry::new(value));
                feature.set_property("agent_id", agent);
                if let (Some(first), Some(last)) = (trajectory.first(), trajectory.last()) {
                    feature.set_property("first_timestep", first.timestep);
                    feature.set_property("last_timestep", last.timestep);
                }
                feature
            })
            .collect();

        let foreign_members = if comments.is_empty() {
            None
        } else {
            let mut members = JsonObject::new();
            members.insert(
                "comments".to_string(),
                JsonValue::from(comments.to_vec()),
            );
            Some(members)
        };

        FeatureCollection {
            bbox: None,
            features,
            foreign_members,
        }
    }
}

impl TrajectoryWriter for GeoJsonTrajectoryWriter {
    fn write_trajectories(
        &self,
        out: &mut dyn Write,
        comments: &[String],
        trajectories: &TrajectorySet,
    ) -> DomainResult<()> {
        let collection = Self::collection(comments, trajectories);
        serde_json::to_writer(&mut *out, &collection)?;
        writeln!(out).map_err(io_err)?;
        out.flush().map_err(io_err)
    }
}
