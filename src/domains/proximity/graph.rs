use crate::common::{DomainError, DomainResult, Position2D};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{BTreeSet, HashMap};

/// Hop distance as a fraction of the detection radius when none is given.
pub const DEFAULT_HOP_FACTOR: f64 = 0.666;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    SelfLoop,
    Direct,
    TwoHop,
}

/// Target-distance constraint between two participants of a frame. The builder emits `a <= b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityEdge {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProximityGraph {
    node_count: usize,
    edges: Vec<ProximityEdge>,
}

impl ProximityGraph {
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edges(&self) -> &[ProximityEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn count(&self, kind: EdgeKind) -> usize {
        self.edges.iter().filter(|e| e.kind == kind).count()
    }

    pub fn into_edges(self) -> Vec<ProximityEdge> {
        self.edges
    }
}

/// Builds the 1-hop / 2-hop proximity graph of a frame from true positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityGraphBuilder {
    d_max: f64,
    d_hop: f64,
}

impl ProximityGraphBuilder {
    pub fn new(d_max: f64, d_hop: Option<f64>) -> DomainResult<Self> {
        if !(d_max.is_finite() && d_max > 0.0) {
            return Err(DomainError::invalid_configuration(format!(
                "detection radius must be positive and finite, got {}",
                d_max
            )));
        }
        let d_hop = d_hop.unwrap_or(DEFAULT_HOP_FACTOR * d_max);
        if !(d_hop.is_finite() && d_hop >= 0.0) {
            return Err(DomainError::invalid_configuration(format!(
                "hop distance must be non-negative and finite, got {}",
                d_hop
            )));
        }
        Ok(Self { d_max, d_hop })
    }

    pub fn d_max(&self) -> f64 {
        self.d_max
    }

    pub fn d_hop(&self) -> f64 {
        self.d_hop
    }

    /// Emits, per node `a` in index order: the self-edge, direct neighbours `b > a`
    /// weighted `d_hop`, then 2-hop-only neighbours `b > a` weighted `2 * d_hop`.
    pub fn build(&self, positions: &[Position2D]) -> DomainResult<ProximityGraph> {
        if let Some(index) = positions.iter().position(|p| !p.is_finite()) {
            return Err(DomainError::invalid_configuration(format!(
                "position {} is not finite",
                index
            )));
        }

        let n = positions.len();
        let pairs = GridIndex::new(positions, self.d_max).pairs_within(positions, self.d_max);

        let mut adjacency = UnGraph::<(), ()>::with_capacity(n, pairs.len());
        for _ in 0..n {
            adjacency.add_node(());
        }
        for &(a, b) in &pairs {
            adjacency.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }

        let hop1: Vec<BTreeSet<usize>> = (0..n)
            .map(|a| {
                adjacency
                    .neighbors(NodeIndex::new(a))
                    .map(|nb| nb.index())
                    .collect()
            })
            .collect();

        let mut edges = Vec::with_capacity(n + 2 * pairs.len());
        for a in 0..n {
            edges.push(ProximityEdge {
                a,
                b: a,
                weight: 0.0,
                kind: EdgeKind::SelfLoop,
            });

            edges.extend(hop1[a].range(a + 1..).map(|&b| ProximityEdge {
                a,
                b,
                weight: self.d_hop,
                kind: EdgeKind::Direct,
            }));

            let hop2: BTreeSet<usize> = hop1[a]
                .iter()
                .flat_map(|&b| hop1[b].iter().copied())
                .filter(|&b| b > a && !hop1[a].contains(&b))
                .collect();
            edges.extend(hop2.into_iter().map(|b| ProximityEdge {
                a,
                b,
                weight: 2.0 * self.d_hop,
                kind: EdgeKind::TwoHop,
            }));
        }

        Ok(ProximityGraph {
            node_count: n,
            edges,
        })
    }
}

/// Uniform bucket grid with cell size equal to the query radius, so every pair
/// closer than the radius lies in the same or an adjacent cell.
struct GridIndex {
    cell: f64,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl GridIndex {
    fn new(positions: &[Position2D], cell: f64) -> Self {
        let mut index = Self {
            cell,
            buckets: HashMap::new(),
        };
        for (i, p) in positions.iter().enumerate() {
            let key = index.key(p);
            index.buckets.entry(key).or_default().push(i);
        }
        index
    }

    fn key(&self, p: &Position2D) -> (i64, i64) {
        (
            (p.x / self.cell).floor() as i64,
            (p.y / self.cell).floor() as i64,
        )
    }

    /// Unordered pairs `(i, j)`, `i < j`, strictly closer than `radius`.
    fn pairs_within(&self, positions: &[Position2D], radius: f64) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, p) in positions.iter().enumerate() {
            let (cx, cy) = self.key(p);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    let key = (cx.saturating_add(dx), cy.saturating_add(dy));
                    let Some(bucket) = self.buckets.get(&key) else {
                        continue;
                    };
                    pairs.extend(
                        bucket
                            .iter()
                            .filter(|&&j| j > i && p.distance(&positions[j]) < radius)
                            .map(|&j| (i, j)),
                    );
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Position2D> {
        raw.iter().copied().map(Position2D::from).collect()
    }

    #[test]
    fn test_empty_positions_yield_empty_graph() {
        let builder = ProximityGraphBuilder::new(10.0, None).unwrap();
        let graph = builder.build(&[]).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_default_hop_distance() {
        let builder = ProximityGraphBuilder::new(30.0, None).unwrap();
        assert!((builder.d_hop() - 19.98).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        assert!(ProximityGraphBuilder::new(0.0, None).is_err());
        assert!(ProximityGraphBuilder::new(-1.0, None).is_err());
        assert!(ProximityGraphBuilder::new(f64::NAN, None).is_err());
        assert!(ProximityGraphBuilder::new(1.0, Some(-0.5)).is_err());
    }

    #[test]
    fn test_chain_produces_two_hop_edge() {
        let builder = ProximityGraphBuilder::new(10.0, Some(4.0)).unwrap();
        let graph = builder
            .build(&pts(&[(0.0, 0.0), (8.0, 0.0), (16.0, 0.0)]))
            .unwrap();

        let triples: Vec<(usize, usize, f64)> =
            graph.edges().iter().map(|e| (e.a, e.b, e.weight)).collect();
        assert_eq!(
            triples,
            vec![
                (0, 0, 0.0),
                (0, 1, 4.0),
                (0, 2, 8.0),
                (1, 1, 0.0),
                (1, 2, 4.0),
                (2, 2, 0.0),
            ]
        );
    }

    #[test]
    fn test_radius_is_strict() {
        let builder = ProximityGraphBuilder::new(5.0, None).unwrap();
        let graph = builder.build(&pts(&[(0.0, 0.0), (5.0, 0.0)])).unwrap();
        assert_eq!(graph.count(EdgeKind::Direct), 0);
        assert_eq!(graph.count(EdgeKind::SelfLoop), 2);
    }

    #[test]
    fn test_pairs_across_negative_cells() {
        let builder = ProximityGraphBuilder::new(1.0, None).unwrap();
        let graph = builder.build(&pts(&[(-0.1, -0.1), (0.1, 0.1)])).unwrap();
        assert_eq!(graph.count(EdgeKind::Direct), 1);
    }

    #[test]
    fn test_rejects_non_finite_position() {
        let builder = ProximityGraphBuilder::new(1.0, None).unwrap();
        assert!(builder
            .build(&pts(&[(0.0, 0.0), (f64::INFINITY, 0.0)]))
            .is_err());
    }
}
