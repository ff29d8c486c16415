use super::graph::ProximityEdge;
use crate::common::{DomainError, DomainResult, Position2D};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::trace;

/// Standard deviation of the isotropic jitter added to every sampled displacement.
pub const JITTER_STDDEV: f64 = 0.1;

/// Hands out edge indices without replacement; a new shuffled pass starts once
/// the current one is exhausted.
#[derive(Debug, Clone, Default)]
pub struct ShuffledCursor {
    len: usize,
    remaining: Vec<usize>,
}

impl ShuffledCursor {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            remaining: Vec::with_capacity(len),
        }
    }

    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        if self.remaining.is_empty() {
            self.remaining.extend(0..self.len);
            self.remaining.shuffle(rng);
        }
        self.remaining.pop()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedStats {
    pub corrections: usize,
    pub degenerate: usize,
}

/// Stochastic Proximity Embedding over a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeOptimizer {
    max_iter: usize,
    rate: f64,
}

impl SpeOptimizer {
    pub fn new(max_iter: usize, rate: f64) -> DomainResult<Self> {
        if !(rate > 0.0 && rate < 1.0) {
            return Err(DomainError::invalid_configuration(format!(
                "annealing rate must lie in (0, 1), got {}",
                rate
            )));
        }
        Ok(Self { max_iter, rate })
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Runs `max_iter` correction rounds, moving non-anchor positions in place.
    ///
    /// Each round samples one edge, measures the jittered displacement between its
    /// endpoints and splits the correction `rate^(it / max_iter) * (w - d) / d`
    /// evenly between them. Anchors are read but never written.
    pub fn embed<R: Rng + ?Sized>(
        &self,
        positions: &mut [Position2D],
        edges: &[ProximityEdge],
        is_anchor: &[bool],
        rng: &mut R,
    ) -> DomainResult<EmbedStats> {
        if is_anchor.len() != positions.len() {
            return Err(DomainError::LengthMismatch {
                positions: positions.len(),
                flags: is_anchor.len(),
            });
        }
        let len = positions.len();
        if let Some(edge) = edges.iter().find(|e| e.a >= len || e.b >= len) {
            return Err(DomainError::EdgeOutOfRange {
                index: edge.a.max(edge.b),
                len,
            });
        }

        let mut stats = EmbedStats::default();
        let mut cursor = ShuffledCursor::new(edges.len());

        for it in 0..self.max_iter {
            let Some(index) = cursor.draw(rng) else {
                break;
            };
            let edge = edges[index];
            // Both endpoints would receive equal and opposite halves.
            if edge.a == edge.b {
                continue;
            }

            let jitter = Position2D::new(
                rng.sample::<f64, _>(StandardNormal) * JITTER_STDDEV,
                rng.sample::<f64, _>(StandardNormal) * JITTER_STDDEV,
            );
            let delta = positions[edge.a] - positions[edge.b] + jitter;
            let current = delta.norm();
            if current == 0.0 {
                trace!(iteration = it, a = edge.a, b = edge.b, "coincident endpoints, skipping");
                stats.degenerate += 1;
                continue;
            }

            let scale = self.rate.powf(it as f64 / self.max_iter as f64);
            let half = delta * (0.5 * scale * (edge.weight - current) / current);

            if !is_anchor[edge.a] {
                positions[edge.a] += half;
            }
            if !is_anchor[edge.b] {
                positions[edge.b] -= half;
            }
            stats.corrections += 1;
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::proximity::graph::EdgeKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn edge(a: usize, b: usize, weight: f64) -> ProximityEdge {
        ProximityEdge {
            a,
            b,
            weight,
            kind: EdgeKind::Direct,
        }
    }

    #[test]
    fn test_cursor_visits_every_edge_once_per_pass() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut cursor = ShuffledCursor::new(5);
        for _ in 0..3 {
            let mut pass: Vec<usize> = (0..5).filter_map(|_| cursor.draw(&mut rng)).collect();
            pass.sort_unstable();
            assert_eq!(pass, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_cursor_on_empty_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(ShuffledCursor::new(0).draw(&mut rng), None);
    }

    #[test]
    fn test_rate_must_be_in_open_unit_interval() {
        assert!(SpeOptimizer::new(10, 0.0).is_err());
        assert!(SpeOptimizer::new(10, 1.0).is_err());
        assert!(SpeOptimizer::new(10, f64::NAN).is_err());
        assert!(SpeOptimizer::new(10, 0.05).is_ok());
    }

    #[test]
    fn test_zero_iterations_leave_positions_unchanged() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let optimizer = SpeOptimizer::new(0, 0.05).unwrap();
        let original = vec![Position2D::new(0.0, 0.0), Position2D::new(10.0, 0.0)];
        let mut positions = original.clone();
        optimizer
            .embed(&mut positions, &[edge(0, 1, 5.0)], &[false, false], &mut rng)
            .unwrap();
        assert_eq!(positions, original);
    }

    #[test]
    fn test_mismatched_anchor_mask_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let optimizer = SpeOptimizer::new(10, 0.05).unwrap();
        let mut positions = vec![Position2D::default(); 2];
        let err = optimizer
            .embed(&mut positions, &[], &[false], &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::LengthMismatch {
                positions: 2,
                flags: 1
            }
        ));
    }

    #[test]
    fn test_out_of_range_edge_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let optimizer = SpeOptimizer::new(10, 0.05).unwrap();
        let mut positions = vec![Position2D::default(); 2];
        let err = optimizer
            .embed(&mut positions, &[edge(0, 2, 1.0)], &[false, false], &mut rng)
            .unwrap_err();
        assert!(matches!(err, DomainError::EdgeOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_anchor_endpoint_stays_fixed() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let optimizer = SpeOptimizer::new(500, 0.05).unwrap();
        let mut positions = vec![Position2D::new(0.0, 0.0), Position2D::new(20.0, 0.0)];
        optimizer
            .embed(&mut positions, &[edge(0, 1, 5.0)], &[true, false], &mut rng)
            .unwrap();
        assert_eq!(positions[0], Position2D::new(0.0, 0.0));
        assert!((positions[0].distance(&positions[1]) - 5.0).abs() < 0.5);
    }
}
