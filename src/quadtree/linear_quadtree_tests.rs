use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::{Point, Quadrant, Rect, Vec2};
use crate::quadtree::{child_index, child_range, depth_of, node_bounds, parent_index, LinearQuadtree, Node, NodeState};
use crate::utils::{level_start, ErrorKind, QuadtreeError, MAX_SUPPORTED_DEPTH, NODE_SIZE_BYTES};

fn two_by_two() -> Rect {
    Rect::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0))
}

fn random_points(count: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Point::new(
                rng.random_range(0.0..100.0),
                rng.random_range(0.0..100.0),
                rng.random_range(1.0..10.0),
            )
        })
        .collect()
}

/// Walks every reachable node and checks that aggregated nodes hold exactly what their
/// children hold.
fn assert_conserved(tree: &LinearQuadtree) {
    let mut stack = vec![0usize];
    while let Some(index) = stack.pop() {
        let node = tree.nodes()[index];
        if let NodeState::Internal { sum, count } = node.state() {
            let mut child_sum = Point::ZERO;
            let mut child_count = 0;
            for child in child_range(index) {
                let c = tree.nodes()[child];
                child_count += c.point_count();
                child_sum += c.point();
                stack.push(child);
            }
            assert_eq!(count, child_count, "count mismatch at node {}", index);
            assert_relative_eq!(sum.x, child_sum.x, epsilon = 1e-3, max_relative = 1e-4);
            assert_relative_eq!(sum.y, child_sum.y, epsilon = 1e-3, max_relative = 1e-4);
            assert_relative_eq!(sum.mass, child_sum.mass, epsilon = 1e-3, max_relative = 1e-4);
        }
    }
}

#[test]
fn test_index_arithmetic() {
    assert_eq!(child_range(0), 1..=4);
    assert_eq!(child_range(2), 9..=12);
    assert_eq!(child_index(0, Quadrant::NorthWest), 1);
    assert_eq!(child_index(0, Quadrant::SouthEast), 4);
    assert_eq!(parent_index(0), None);
    assert_eq!(parent_index(4), Some(0));
    assert_eq!(parent_index(12), Some(2));
    assert_eq!(depth_of(0), 0);
    assert_eq!(depth_of(4), 1);
    assert_eq!(depth_of(5), 2);
    assert_eq!(depth_of(level_start(3)), 3);
    assert_eq!(depth_of(level_start(3) - 1), 2);
}

#[test]
fn test_node_bounds() {
    let root = two_by_two();
    assert_eq!(node_bounds(root, 0), root);
    assert_eq!(node_bounds(root, 1), Rect::new(Vec2::new(0.0, 1.0), Vec2::new(1.0, 2.0)));
    // south-west child of the north-east child
    let index = child_index(2, Quadrant::SouthWest);
    assert_eq!(node_bounds(root, index), Rect::new(Vec2::new(1.0, 1.0), Vec2::new(1.5, 1.5)));
}

#[test]
fn test_new_tree_is_zeroed() {
    let tree = LinearQuadtree::new(2).unwrap();
    assert_eq!(tree.capacity(), 63);
    assert_eq!(tree.max_depth(), 2);
    assert!(tree.nodes().iter().all(|n| n.state() == NodeState::Empty));
    assert!(tree.as_bytes().iter().all(|b| *b == 0));
}

#[test]
fn test_deep_tree_starts_empty() {
    let tree = LinearQuadtree::new(9).unwrap();
    assert_eq!(tree.capacity(), 4usize.pow(10) - 1);
    assert_eq!(tree.as_bytes().len(), tree.capacity() * NODE_SIZE_BYTES);
    let last = tree.capacity() - 1;
    assert_eq!(tree.node(last), Some(&Node::EMPTY));
    assert_eq!(tree.stats().occupied(), 0);
}

#[test]
fn test_new_rejects_unsupported_depth() {
    let err = LinearQuadtree::new(MAX_SUPPORTED_DEPTH + 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapacityViolation);
}

#[test]
fn test_two_points_split_into_north_quadrants() {
    let mut tree = LinearQuadtree::new(1).unwrap();
    let bounds = two_by_two();
    tree.insert(0, 0, bounds, Point::new(0.5, 1.5, 1.0)).unwrap();
    tree.insert(0, 0, bounds, Point::new(1.5, 1.5, 3.0)).unwrap();

    let nodes = tree.nodes();
    assert_eq!(nodes[0].point_count(), 2);
    assert!(nodes[0].has_children());
    assert_eq!(nodes[0].point(), Point::new(2.0, 3.0, 4.0));

    assert_eq!(nodes[1].state(), NodeState::Leaf(Point::new(0.5, 1.5, 1.0)));
    assert_eq!(nodes[2].state(), NodeState::Leaf(Point::new(1.5, 1.5, 3.0)));
    assert_eq!(nodes[3].point_count(), 0);
    assert_eq!(nodes[4].point_count(), 0);
}

#[test]
fn test_two_points_at_depth_zero_saturate() {
    let mut tree = LinearQuadtree::new(0).unwrap();
    let bounds = two_by_two();
    tree.insert(0, 0, bounds, Point::new(0.5, 1.5, 1.0)).unwrap();
    tree.insert(0, 0, bounds, Point::new(1.5, 1.5, 3.0)).unwrap();

    let root = tree.root();
    assert_eq!(root.point_count(), 2);
    assert!(!root.has_children());
    // raw coordinate sum, not a centroid
    assert_eq!(root.point(), Point::new(2.0, 3.0, 4.0));
    assert_eq!(
        root.state(),
        NodeState::Saturated { sum: Point::new(2.0, 3.0, 4.0), count: 2 }
    );
    assert!(tree.nodes()[1..].iter().all(|n| n.is_empty()));
}

#[test]
fn test_same_quadrant_at_depth_zero_never_splits() {
    let mut tree = LinearQuadtree::new(0).unwrap();
    let points = [Point::new(0.1, 0.1, 2.0), Point::new(0.2, 0.15, 5.0)];
    tree.build(&points).unwrap();
    let root = tree.root();
    assert_eq!(root.point_count(), 2);
    assert!(!root.has_children());
    assert_relative_eq!(root.point().x, 0.3);
    assert_relative_eq!(root.point().y, 0.25);
    assert_relative_eq!(root.point().mass, 7.0);
}

#[test]
fn test_single_point_is_a_root_leaf() {
    let mut tree = LinearQuadtree::new(3).unwrap();
    tree.build(&[Point::new(5.0, -2.0, 1.5)]).unwrap();
    assert_eq!(tree.root().state(), NodeState::Leaf(Point::new(5.0, -2.0, 1.5)));
    assert!(tree.nodes()[1..].iter().all(|n| n.state() == NodeState::Empty));
    let stats = tree.stats();
    assert_eq!(stats.leaves, 1);
    assert_eq!(stats.internal, 0);
    assert_eq!(stats.deepest_level, Some(0));
}

#[test]
fn test_center_point_lands_north_east() {
    let mut tree = LinearQuadtree::new(2).unwrap();
    let bounds = two_by_two();
    tree.build_within(bounds, &[Point::new(0.2, 0.2, 1.0), Point::new(1.0, 1.0, 1.0)]).unwrap();
    let nodes = tree.nodes();
    assert_eq!(nodes[3].state(), NodeState::Leaf(Point::new(0.2, 0.2, 1.0)));
    assert_eq!(nodes[2].state(), NodeState::Leaf(Point::new(1.0, 1.0, 1.0)));
    assert_eq!(tree.root().point_count(), 2);
}

#[test]
fn test_build_spanning_more_than_f32_max() {
    let mut tree = LinearQuadtree::new(4).unwrap();
    let west = Point::new(-3.0e38, 0.0, 1.0);
    let east = Point::new(3.0e38, 0.0, 1.0);
    let bounds = tree.build(&[west, east]).unwrap();
    assert!(bounds.width().is_infinite());

    let nodes = tree.nodes();
    assert_eq!(nodes[1].state(), NodeState::Leaf(west));
    assert_eq!(nodes[2].state(), NodeState::Leaf(east));
    assert_eq!(tree.root().point(), Point::new(0.0, 0.0, 2.0));
    assert_conserved(&tree);
}

#[test]
fn test_build_rejects_f32_max_coordinate() {
    let mut tree = LinearQuadtree::new(2).unwrap();
    tree.build(&[Point::new(1.0, 1.0, 1.0)]).unwrap();
    let before = tree.as_bytes().to_vec();

    let err = tree.build(&[Point::new(f32::MAX, 0.0, 1.0)]).unwrap_err();
    assert!(matches!(err, QuadtreeError::InvalidParameter(_)));
    assert_eq!(tree.as_bytes(), &before[..]);
}

#[test]
fn test_leaf_point_descends_on_split() {
    // both points share the south-west quadrant at depth 1, so the split cascades
    let mut tree = LinearQuadtree::new(3).unwrap();
    let bounds = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(8.0, 8.0));
    tree.build_within(bounds, &[Point::new(0.5, 0.5, 1.0), Point::new(2.5, 2.5, 2.0)]).unwrap();

    let sw = child_index(0, Quadrant::SouthWest);
    assert!(matches!(tree.nodes()[sw].state(), NodeState::Internal { count: 2, .. }));
    let sw_sw = child_index(sw, Quadrant::SouthWest);
    let sw_ne = child_index(sw, Quadrant::NorthEast);
    assert_eq!(tree.nodes()[sw_sw].state(), NodeState::Leaf(Point::new(0.5, 0.5, 1.0)));
    assert_eq!(tree.nodes()[sw_ne].state(), NodeState::Leaf(Point::new(2.5, 2.5, 2.0)));
    assert_conserved(&tree);
}

#[test]
fn test_duplicate_points_saturate_at_max_depth() {
    let mut tree = LinearQuadtree::new(3).unwrap();
    let bounds = two_by_two();
    let p = Point::new(0.3, 0.3, 1.0);
    tree.build_within(bounds, &[p, p, p]).unwrap();

    let stats = tree.stats();
    assert_eq!(stats.internal, 3);
    assert_eq!(stats.saturated, 1);
    assert_eq!(stats.leaves, 0);
    assert_eq!(stats.deepest_level, Some(3));

    let mut index = 0;
    for _ in 0..3 {
        index = child_index(index, Quadrant::SouthWest);
    }
    match tree.nodes()[index].state() {
        NodeState::Saturated { sum, count } => {
            assert_eq!(count, 3);
            assert_relative_eq!(sum.x, 0.9, epsilon = 1e-6);
            assert_relative_eq!(sum.mass, 3.0);
        }
        other => panic!("Expected a Saturated node, got {:?}", other),
    }
    assert_conserved(&tree);
}

#[test]
fn test_root_aggregates_every_point() {
    let points = random_points(500, 42);
    let expected = points.iter().fold((0.0f64, 0.0f64, 0.0f64), |acc, p| {
        (acc.0 + p.x as f64, acc.1 + p.y as f64, acc.2 + p.mass as f64)
    });

    for max_depth in 0..=6 {
        let mut tree = LinearQuadtree::new(max_depth).unwrap();
        tree.build(&points).unwrap();
        let root = tree.root();
        assert_eq!(root.point_count(), points.len(), "depth {}", max_depth);
        assert_relative_eq!(root.point().x as f64, expected.0, max_relative = 1e-4);
        assert_relative_eq!(root.point().y as f64, expected.1, max_relative = 1e-4);
        assert_relative_eq!(root.point().mass as f64, expected.2, max_relative = 1e-4);
        assert_conserved(&tree);

        // every original point is accounted for exactly once by leaves and saturated nodes
        let terminal: usize = tree
            .nodes()
            .iter()
            .filter_map(|n| match n.state() {
                NodeState::Leaf(_) => Some(1),
                NodeState::Saturated { count, .. } => Some(count),
                _ => None,
            })
            .sum();
        assert_eq!(terminal, points.len());
    }
}

#[test]
fn test_rebuild_is_bit_identical() {
    let points = random_points(300, 7);
    let other = random_points(120, 8);
    let mut tree = LinearQuadtree::new(5).unwrap();

    tree.build(&points).unwrap();
    let first = tree.as_bytes().to_vec();

    tree.build(&other).unwrap();
    assert_ne!(tree.as_bytes(), &first[..]);

    tree.build(&points).unwrap();
    assert_eq!(tree.as_bytes(), &first[..]);
}

#[test]
fn test_failed_build_keeps_previous_tree() {
    let mut tree = LinearQuadtree::new(2).unwrap();
    tree.build(&random_points(20, 3)).unwrap();
    let before = tree.as_bytes().to_vec();

    assert_eq!(tree.build(&[]).unwrap_err(), QuadtreeError::EmptyPointSet);
    assert_eq!(tree.as_bytes(), &before[..]);

    let bad = [Point::new(1.0, 1.0, 1.0), Point::new(3.0, 3.0, 1.0)];
    let err = tree.build_within(two_by_two(), &bad).unwrap_err();
    assert_eq!(err, QuadtreeError::PointOutOfBounds { index: 1, x: 3.0, y: 3.0 });
    assert_eq!(tree.as_bytes(), &before[..]);
}

#[test]
fn test_build_within_names_the_offending_body() {
    let mut tree = LinearQuadtree::new(2).unwrap();
    let points = [
        Point::new(0.5, 0.5, 1.0),
        Point::new(1.5, 1.5, 1.0),
        Point::new(0.25, 2.0, 1.0),
        Point::new(-1.0, 0.0, 1.0),
    ];
    // the first body past the exclusive top edge is reported, not the later one
    let err = tree.build_within(two_by_two(), &points).unwrap_err();
    assert_eq!(err, QuadtreeError::PointOutOfBounds { index: 2, x: 0.25, y: 2.0 });
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(tree.nodes().iter().all(|n| n.is_empty()));

    tree.build_within(two_by_two(), &points[..2]).unwrap();
    assert_eq!(tree.root().point_count(), 2);
}

#[test]
fn test_clear_resets_every_slot() {
    let mut tree = LinearQuadtree::new(3).unwrap();
    tree.build(&random_points(50, 11)).unwrap();
    assert!(tree.stats().occupied() > 0);
    tree.clear();
    assert!(tree.as_bytes().iter().all(|b| *b == 0));
    assert_eq!(tree.stats().deepest_level, None);
}

#[test]
fn test_insert_validates_arguments() {
    let mut tree = LinearQuadtree::new(1).unwrap();
    let bounds = two_by_two();
    let p = Point::new(0.5, 0.5, 1.0);

    assert_eq!(
        tree.insert(2, 0, bounds, p).unwrap_err(),
        QuadtreeError::InvalidDepth { depth: 2, max_depth: 1 }
    );
    assert_eq!(
        tree.insert(1, 99, bounds, p).unwrap_err(),
        QuadtreeError::CapacityViolation { index: 99, capacity: 15 }
    );
    // index 0 is not on level 1
    assert!(matches!(tree.insert(1, 0, bounds, p), Err(QuadtreeError::InvalidDepth { .. })));
    assert_eq!(
        tree.insert(0, 0, bounds, Point::new(2.0, 0.5, 1.0)).unwrap_err(),
        QuadtreeError::PointOutOfBounds { index: 0, x: 2.0, y: 0.5 }
    );
    assert!(tree.nodes().iter().all(|n| n.is_empty()));

    // inserting directly into a child with its own extent is allowed
    let sw_bounds = node_bounds(bounds, 3);
    tree.insert(1, 3, sw_bounds, p).unwrap();
    assert_eq!(tree.nodes()[3].state(), NodeState::Leaf(p));
}

#[test]
fn test_insertion_order_only_moves_leaves() {
    let points = random_points(64, 21);
    let mut reversed = points.clone();
    reversed.reverse();

    let mut forward = LinearQuadtree::new(8).unwrap();
    let mut backward = LinearQuadtree::new(8).unwrap();
    forward.build(&points).unwrap();
    backward.build(&reversed).unwrap();

    // the same cells end up occupied with the same counts
    for (a, b) in forward.nodes().iter().zip(backward.nodes()) {
        assert_eq!(a.point_count(), b.point_count());
        assert_eq!(a.has_children(), b.has_children());
    }
    assert_relative_eq!(forward.root().point().mass, backward.root().point().mass, max_relative = 1e-5);
}
