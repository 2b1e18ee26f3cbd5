use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use test_strategy::proptest as strategy_proptest;

use crate::data::{Direction, Subdivision};
use crate::testing::{refined_column, twin_columns, uniform_column};
use crate::{EdgeNetwork, MIN_INCLINE_DEGREES};

// The universally quantified properties of a built network: ownership
// exclusivity, z-monotonicity, boundary match, inclination, continuity,
// and the query laws.
fn assert_network_invariants(subdivision: &Subdivision) {
  let network = EdgeNetwork::build(subdivision);

  for (owner, edge) in network.left_edges().chain(network.right_edges()) {
    let range = subdivision.cell(owner).z_range();
    assert_eq!(edge.front().z_coord(), range.min);
    assert_eq!(edge.back().z_coord(), range.max);
    for pair in edge.points().windows(2) {
      assert!(pair[0].z_coord() < pair[1].z_coord());
    }
    assert!(edge.min_inclination().into_inner() > MIN_INCLINE_DEGREES);
  }

  for cell in subdivision.ids() {
    // Every lateral edge has exactly one owner.
    for &after in subdivision.cell(cell).adjacent(Direction::Right) {
      let owners =
        network.right_edge(cell).is_some() as usize + network.left_edge(after).is_some() as usize;
      assert_eq!(owners, 1, "{:?}|{:?} edge must have one owner", cell, after);

      // Query laws: idempotence and endpoint coherence. The owner is the
      // deeper cell, so its z-range lies within both cells' ranges.
      let owner = if subdivision.cell(after).depth() > subdivision.cell(cell).depth() {
        network.left_edge(after).unwrap()
      } else {
        network.right_edge(cell).unwrap()
      };
      let bottom = owner.front().z_coord();
      let top = owner.back().z_coord();
      assert_eq!(
        network.cell_edge_location(cell, after, bottom),
        owner.front().xy()
      );
      assert_eq!(
        network.cell_edge_location(cell, after, top),
        owner.back().xy()
      );
      let mid = (bottom + top) / 2;
      assert_eq!(
        network.cell_edge_location(cell, after, mid),
        network.cell_edge_location(cell, after, mid)
      );
    }

    // Vertically adjacent owned edges meet exactly.
    for &upper in subdivision.cell(cell).adjacent(Direction::Up) {
      for &side in &[Direction::Left, Direction::Right] {
        let lower_edge = match side {
          Direction::Left => network.left_edge(cell),
          _ => network.right_edge(cell),
        };
        let upper_edge = match side {
          Direction::Left => network.left_edge(upper),
          _ => network.right_edge(upper),
        };
        if let (Some(lower_edge), Some(upper_edge)) = (lower_edge, upper_edge) {
          assert_eq!(
            lower_edge.back(),
            upper_edge.front(),
            "{:?} edges of {:?} and {:?} must meet",
            side,
            cell,
            upper
          );
        }
      }
    }
  }
}

#[test]
fn uniform_column_network_invariants() {
  assert_network_invariants(&uniform_column(1));
  assert_network_invariants(&uniform_column(6));
}

proptest! {
  #[test]
  fn refined_column_network_invariants(seed: u64, slots in 1usize..10) {
    let mut rng = SmallRng::seed_from_u64(seed);
    assert_network_invariants(&refined_column(&mut rng, slots));
  }

  #[test]
  fn twin_columns_network_invariants(seed: u64, slots in 1usize..8) {
    let mut rng = SmallRng::seed_from_u64(seed);
    assert_network_invariants(&twin_columns(&mut rng, slots));
  }
}

#[strategy_proptest]
fn rebuilding_the_network_is_deterministic(seed: u64, #[strategy(1usize..6)] slots: usize) {
  let mut rng = SmallRng::seed_from_u64(seed);
  let subdivision = twin_columns(&mut rng, slots);
  let first = EdgeNetwork::build(&subdivision);
  let second = EdgeNetwork::build(&subdivision);
  for (cell, edge) in first.left_edges() {
    assert_eq!(Some(edge), second.left_edge(cell));
  }
  for (cell, edge) in first.right_edges() {
    assert_eq!(Some(edge), second.right_edge(cell));
  }
}
