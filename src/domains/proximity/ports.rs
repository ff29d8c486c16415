use super::types::TrajectorySet;
use crate::common::DomainResult;
use std::io::Write;

/// Port for exporting trajectories to downstream consumers (clustering, plotting).
/// `comments` are free-form lines a format may carry alongside the data.
pub trait TrajectoryWriter: Send + Sync {
    fn write_trajectories(
        &self,
        out: &mut dyn Write,
        comments: &[String],
        trajectories: &TrajectorySet,
    ) -> DomainResult<()>;
}
