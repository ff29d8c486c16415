use proximity_embedding::common::Position2D;
use proximity_embedding::domains::proximity::{
    EdgeKind, ProximityEdge, ProximityGraphBuilder, SpeOptimizer,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn direct(a: usize, b: usize, weight: f64) -> ProximityEdge {
    ProximityEdge {
        a,
        b,
        weight,
        kind: EdgeKind::Direct,
    }
}

#[test]
fn test_pair_converges_to_target_distance() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let optimizer = SpeOptimizer::new(2000, 0.05).unwrap();
    let mut positions = vec![Position2D::new(0.0, 0.0), Position2D::new(10.0, 0.0)];

    let stats = optimizer
        .embed(&mut positions, &[direct(0, 1, 5.0)], &[false, false], &mut rng)
        .unwrap();

    let distance = positions[0].distance(&positions[1]);
    assert!((distance - 5.0).abs() < 0.5, "distance {} not near 5", distance);
    assert_eq!(stats.corrections + stats.degenerate, 2000);
}

#[test]
fn test_anchor_only_frame_is_untouched() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let optimizer = SpeOptimizer::new(1000, 0.05).unwrap();
    let original = vec![
        Position2D::new(0.0, 0.0),
        Position2D::new(3.0, 0.0),
        Position2D::new(0.0, 3.0),
    ];
    let mut positions = original.clone();
    let edges = ProximityGraphBuilder::new(10.0, None)
        .unwrap()
        .build(&original)
        .unwrap()
        .into_edges();

    optimizer
        .embed(&mut positions, &edges, &[true, true, true], &mut rng)
        .unwrap();
    assert_eq!(positions, original);
}

#[test]
fn test_empty_edge_list_is_a_no_op() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let optimizer = SpeOptimizer::new(100, 0.5).unwrap();
    let original = vec![Position2D::new(1.0, 2.0), Position2D::new(3.0, 4.0)];
    let mut positions = original.clone();
    let stats = optimizer
        .embed(&mut positions, &[], &[false, false], &mut rng)
        .unwrap();
    assert_eq!(positions, original);
    assert_eq!(stats.corrections, 0);
}

#[test]
fn test_same_seed_gives_bitwise_identical_embedding() {
    let truth: Vec<Position2D> = (0..12)
        .map(|i| Position2D::new((i % 4) as f64 * 6.0, (i / 4) as f64 * 6.0))
        .collect();
    let edges = ProximityGraphBuilder::new(9.0, None)
        .unwrap()
        .build(&truth)
        .unwrap()
        .into_edges();
    let start: Vec<Position2D> = truth.iter().map(|p| *p * 0.5).collect();
    let mut anchors = vec![false; 12];
    anchors[0] = true;
    anchors[11] = true;

    let optimizer = SpeOptimizer::new(800, 0.05).unwrap();
    let run = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut positions = start.clone();
        optimizer
            .embed(&mut positions, &edges, &anchors, &mut rng)
            .unwrap();
        positions
    };

    assert_eq!(run(5), run(5));
    assert_ne!(run(5), run(6));
}
