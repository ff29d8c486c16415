use crate::common::{DomainError, DomainResult, Position2D};

/// Number of samples used for the sinusoidal path.
const SINUS_SAMPLES: usize = 50;

/// Polyline parameterized by arclength.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<Position2D>,
    distances: Vec<f64>,
}

impl Path {
    pub fn new(points: Vec<Position2D>) -> DomainResult<Self> {
        if points.is_empty() {
            return Err(DomainError::EmptyPath);
        }
        Ok(Self::with_arclength(points))
    }

    fn with_arclength(points: Vec<Position2D>) -> Self {
        let mut distances = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += points[i - 1].distance(p);
            }
            distances.push(total);
        }
        Self { points, distances }
    }

    /// Horizontal line of the given width centred on x = 0, running right to left.
    pub fn hline(width: f64, y: f64) -> Self {
        Self::with_arclength(vec![
            Position2D::new(0.5 * width, y),
            Position2D::new(-0.5 * width, y),
        ])
    }

    /// Down the y axis to the origin, then right along the x axis.
    pub fn corner(width: f64) -> Self {
        Self::with_arclength(vec![
            Position2D::new(0.0, 0.5 * width),
            Position2D::new(0.0, 0.0),
            Position2D::new(0.5 * width, 0.0),
        ])
    }

    /// One full sine period spanning `width`, sampled at evenly spaced points.
    pub fn sinus(width: f64, amplitude: f64) -> Self {
        let points = (0..SINUS_SAMPLES)
            .map(|k| {
                let t = -1.0 + 2.0 * k as f64 / (SINUS_SAMPLES - 1) as f64;
                Position2D::new(t * width * 0.5, amplitude * (t * std::f64::consts::PI).sin())
            })
            .collect();
        Self::with_arclength(points)
    }

    pub fn length(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Point at arclength `d`, clamped to the path's end points.
    pub fn at(&self, d: f64) -> Position2D {
        let i = self.distances.partition_point(|&x| x <= d);
        if i == 0 {
            return self.points[0];
        }
        if i == self.points.len() {
            return self.points[i - 1];
        }
        let span = self.distances[i] - self.distances[i - 1];
        let t = (d - self.distances[i - 1]) / span;
        self.points[i - 1].lerp(&self.points[i], t)
    }

    pub fn reversed(&self) -> Self {
        Self::with_arclength(self.points.iter().rev().copied().collect())
    }
}
