//! Sweep-line monotone polygon partition, followed by stack-based monotone triangulation
//! (`spec.md` §4.4).
//!
//! The sweep never mutates the polygon's [`Dcel`] while it runs: diagonals are collected
//! into a list and spliced in afterwards via [`Dcel::split`], once partitioning and
//! triangulation have fully decided every diagonal. That means the half-edge -> segment
//! mapping the status structure's comparator reads from is fixed for the algorithm's whole
//! run, so it is snapshotted once up front.

use std::cell::Cell;
use std::cmp::Ordering;
use std::rc::Rc;

use crate::dcel::{Dcel, FaceId, HalfEdgeId, VertexId};
use crate::geom::{orientation, Orientation, Point, Segment};
use crate::tree::{Comparator, RedBlackTree};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexCategory {
  Start,
  Split,
  End,
  Merge,
  Regular,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HelperPoint {
  vertex: VertexId,
  category: VertexCategory,
}

/// `true` if `a` lies below `b` in sweep order (lower priority: lower, or level and right).
fn below(a: &Point, b: &Point) -> bool {
  a.sweep_cmp(b) == Ordering::Less
}

/// The departing half-edge of `v` that bounds the interior (non-unbounded) face.
fn bounded_departing_edge(dcel: &Dcel, v: VertexId) -> HalfEdgeId {
  let candidates = dcel.departing_edges(v);
  candidates
    .into_iter()
    .find(|&e| dcel.face(dcel.half_edge(e).incident_face).outer.is_some())
    .expect("every polygon vertex has exactly one departing edge bounding the interior")
}

pub fn categorize_vertex(dcel: &Dcel, v: VertexId) -> VertexCategory {
  let e = bounded_departing_edge(dcel, v);
  let p = dcel.vertex(v).point;
  let p_prev = dcel.origin_point(dcel.half_edge(e).prev);
  let p_next = dcel.origin_point(dcel.half_edge(e).next);

  let prev_below = below(&p_prev, &p);
  let next_below = below(&p_next, &p);

  if prev_below && next_below {
    if orientation(&p_prev, &p, &p_next).is_left_or_beyond() {
      VertexCategory::Start
    } else {
      VertexCategory::Split
    }
  } else if !prev_below && !next_below {
    if orientation(&p_prev, &p, &p_next).is_left_or_beyond() {
      VertexCategory::End
    } else {
      VertexCategory::Merge
    }
  } else {
    VertexCategory::Regular
  }
}

fn interior_on_right(dcel: &Dcel, departing_edge: HalfEdgeId) -> bool {
  let p_prev = dcel.origin_point(dcel.half_edge(departing_edge).prev);
  let p_cur = dcel.origin_point(departing_edge);
  let p_next = dcel.origin_point(dcel.half_edge(departing_edge).next);
  p_prev.sweep_cmp(&p_cur) == Ordering::Greater && p_cur.sweep_cmp(&p_next) == Ordering::Greater
}

/// Orders half-edges by the `x` at which they cross the current sweep line, breaking ties
/// by half-edge identity so that two edges transiently sharing an x-intercept still
/// compare distinctly (`spec.md` §3.4/§5, stateful comparator contract).
struct EdgeOrder {
  segments: Rc<Vec<Segment>>,
  sweep_y: Rc<Cell<f64>>,
}

impl Comparator<HalfEdgeId> for EdgeOrder {
  fn compare(&self, a: &HalfEdgeId, b: &HalfEdgeId) -> Ordering {
    if a == b {
      return Ordering::Equal;
    }
    let y = self.sweep_y.get();
    let xa = self.segments[a.index()].x_at_y(y);
    let xb = self.segments[b.index()].x_at_y(y);
    match xa.partial_cmp(&xb).unwrap_or(Ordering::Equal) {
      Ordering::Equal => a.index().cmp(&b.index()),
      ord => ord,
    }
  }
}

type Status = RedBlackTree<HalfEdgeId, HelperPoint, EdgeOrder>;

fn left_neighbor(status: &Status, key: &HalfEdgeId) -> crate::tree::NodeId {
  match status.lower_bound(key) {
    Some(id) => status
      .predecessor(id)
      .expect("lower_bound never returns the minimum element when processing a Split/Merge/Regular vertex"),
    None => status.max().expect("status structure is non-empty while processing an event"),
  }
}

/// Partitions `dcel` into y-monotone pieces, returning the diagonals to apply. Does not
/// mutate `dcel` itself: the caller splices the diagonals in afterwards via
/// [`Dcel::split`].
pub fn partition_into_monotone_pieces(dcel: &Dcel) -> Vec<(VertexId, VertexId)> {
  let segments: Rc<Vec<Segment>> = Rc::new(dcel.half_edge_ids().map(|e| dcel.segment_of(e)).collect());
  let sweep_y = Rc::new(Cell::new(0.0));

  let mut events: Vec<VertexId> = dcel.vertex_ids().collect();
  events.sort_by(|&a, &b| dcel.vertex(a).point.sweep_cmp(&dcel.vertex(b).point).reverse());

  let mut status: Status = RedBlackTree::with_comparator(EdgeOrder {
    segments: segments.clone(),
    sweep_y: sweep_y.clone(),
  });
  let mut diagonals = Vec::new();

  for v in events {
    let p = dcel.vertex(v).point;
    sweep_y.set(p.y);
    let category = categorize_vertex(dcel, v);
    let e = bounded_departing_edge(dcel, v);

    match category {
      VertexCategory::Start => {
        status.insert(e, HelperPoint { vertex: v, category });
      }
      VertexCategory::End => {
        let prev = dcel.half_edge(e).prev;
        let id = status.find(&prev).expect("End vertex's preceding edge is in the status structure");
        let helper = *status.value(id);
        if helper.category == VertexCategory::Merge {
          diagonals.push((v, helper.vertex));
        }
        status.erase(id);
      }
      VertexCategory::Split => {
        let left = left_neighbor(&status, &e);
        let helper = *status.value(left);
        diagonals.push((v, helper.vertex));
        *status.value_mut(left) = HelperPoint { vertex: v, category };
        status.insert(e, HelperPoint { vertex: v, category });
      }
      VertexCategory::Merge => {
        let prev = dcel.half_edge(e).prev;
        let id = status.find(&prev).expect("Merge vertex's preceding edge is in the status structure");
        let helper = *status.value(id);
        if helper.category == VertexCategory::Merge {
          diagonals.push((v, helper.vertex));
        }
        status.erase(id);

        let left = left_neighbor(&status, &e);
        let helper = *status.value(left);
        if helper.category == VertexCategory::Merge {
          diagonals.push((v, helper.vertex));
        }
        *status.value_mut(left) = HelperPoint { vertex: v, category };
      }
      VertexCategory::Regular => {
        if interior_on_right(dcel, e) {
          let prev = dcel.half_edge(e).prev;
          let id = status.find(&prev).expect("Regular-right vertex's preceding edge is in the status structure");
          let helper = *status.value(id);
          if helper.category == VertexCategory::Merge {
            diagonals.push((v, helper.vertex));
          }
          status.erase(id);
          status.insert(e, HelperPoint { vertex: v, category });
        } else {
          let left = left_neighbor(&status, &e);
          let helper = *status.value(left);
          if helper.category == VertexCategory::Merge {
            diagonals.push((v, helper.vertex));
          }
          *status.value_mut(left) = HelperPoint { vertex: v, category };
        }
      }
    }
  }

  diagonals
}

/// Stack-based triangulation of a single y-monotone face, returning the diagonals that
/// split it into triangles (`spec.md` §4.4.3). `face` must already be monotone (the usual
/// way to guarantee that is to have applied every diagonal from
/// [`partition_into_monotone_pieces`] first).
pub fn triangulate_monotone_face(dcel: &Dcel, face: FaceId) -> Vec<(VertexId, VertexId)> {
  let Some(start) = dcel.face(face).outer else {
    return Vec::new();
  };
  let vertices = dcel.face_vertices(face);
  if vertices.len() < 3 {
    return Vec::new();
  }

  let mut sorted = vertices.clone();
  sorted.sort_by(|&a, &b| dcel.vertex(b).point.sweep_cmp(&dcel.vertex(a).point));

  let v_top = sorted[0];
  let v_bottom = *sorted.last().unwrap();

  // Walk the face boundary from v_top forward to classify every vertex (besides the two
  // extremes) as belonging to the chain reached by `next` or the chain reached by `prev`.
  let mut chain_next = std::collections::HashSet::new();
  let mut e = {
    let mut e = start;
    while dcel.half_edge(e).origin != v_top {
      e = dcel.half_edge(e).next;
    }
    e
  };
  while dcel.half_edge(dcel.half_edge(e).next).origin != v_bottom {
    chain_next.insert(dcel.half_edge(dcel.half_edge(e).next).origin);
    e = dcel.half_edge(e).next;
  }
  let mut chain_prev = std::collections::HashSet::new();
  let mut e = {
    let mut e = start;
    while dcel.half_edge(e).origin != v_top {
      e = dcel.half_edge(e).next;
    }
    e
  };
  while dcel.half_edge(dcel.half_edge(e).prev).origin != v_bottom {
    chain_prev.insert(dcel.half_edge(dcel.half_edge(e).prev).origin);
    e = dcel.half_edge(e).prev;
  }

  let mut diagonals = Vec::new();
  let mut stack = vec![sorted[0], sorted[1]];

  for &v_i in &sorted[2..sorted.len() - 1] {
    let v_top_of_stack = *stack.last().unwrap();
    let different_chains = (chain_next.contains(&v_i) && chain_prev.contains(&v_top_of_stack))
      || (chain_prev.contains(&v_i) && chain_next.contains(&v_top_of_stack));

    if different_chains {
      while let Some(v_j) = stack.pop() {
        if !stack.is_empty() {
          diagonals.push((v_i, v_j));
        }
      }
      stack.push(v_top_of_stack);
      stack.push(v_i);
    } else {
      let mut last_popped = stack.pop().unwrap();
      while let Some(&v_j) = stack.last() {
        if orientation_allows_diagonal(dcel, v_i, v_j, &sorted, &chain_next) {
          stack.pop();
          last_popped = v_j;
          diagonals.push((v_i, v_j));
        } else {
          break;
        }
      }
      stack.push(last_popped);
      stack.push(v_i);
    }
  }

  for &v_i in &stack[1..stack.len() - 1] {
    diagonals.push((v_bottom, v_i));
  }

  diagonals
}

/// Triangulates `dcel` in place (`spec.md` §4.4): partitions into monotone pieces, applies
/// every partition diagonal via [`Dcel::split`], then triangulates each resulting bounded
/// face and applies those diagonals too. Returns every diagonal applied, partition
/// diagonals first, in the order they were split in.
pub fn triangulate_polygon(dcel: &mut Dcel) -> Result<Vec<(VertexId, VertexId)>> {
  let mut applied = Vec::new();
  for (v1, v2) in partition_into_monotone_pieces(dcel) {
    dcel.split(v1, v2)?;
    applied.push((v1, v2));
  }

  let faces: Vec<FaceId> = dcel.face_ids().collect();
  for face in faces {
    for (v1, v2) in triangulate_monotone_face(dcel, face) {
      dcel.split(v1, v2)?;
      applied.push((v1, v2));
    }
  }

  Ok(applied)
}

/// Stateful wrapper over the two free functions above, shaped per `spec.md` §6:
/// `new`/`set` load a polygon, `make_monotone`/`triangulate` run the two passes in order,
/// and `monotone_diagonals`/`triangulation_diagonals` read back what each one applied.
pub struct MonotonePartition {
  dcel: Dcel,
  monotone_diagonals: Vec<(VertexId, VertexId)>,
  triangulation_diagonals: Vec<(VertexId, VertexId)>,
}

impl MonotonePartition {
  pub fn new(points: &[Point]) -> Result<MonotonePartition> {
    Ok(MonotonePartition {
      dcel: Dcel::new(points)?,
      monotone_diagonals: Vec::new(),
      triangulation_diagonals: Vec::new(),
    })
  }

  /// Replaces the working polygon, discarding any diagonals computed so far.
  pub fn set(&mut self, points: &[Point]) -> Result<()> {
    self.dcel = Dcel::new(points)?;
    self.monotone_diagonals.clear();
    self.triangulation_diagonals.clear();
    Ok(())
  }

  /// Runs [`partition_into_monotone_pieces`] and applies its diagonals via [`Dcel::split`].
  pub fn make_monotone(&mut self) -> Result<()> {
    for (v1, v2) in partition_into_monotone_pieces(&self.dcel) {
      self.dcel.split(v1, v2)?;
      self.monotone_diagonals.push((v1, v2));
    }
    Ok(())
  }

  /// Triangulates every face of the (by now monotone) polygon, applying each diagonal
  /// [`triangulate_monotone_face`] reports. Call [`Self::make_monotone`] first.
  pub fn triangulate(&mut self) -> Result<()> {
    let faces: Vec<FaceId> = self.dcel.face_ids().collect();
    for face in faces {
      for (v1, v2) in triangulate_monotone_face(&self.dcel, face) {
        self.dcel.split(v1, v2)?;
        self.triangulation_diagonals.push((v1, v2));
      }
    }
    Ok(())
  }

  pub fn monotone_diagonals(&self) -> &[(VertexId, VertexId)] {
    &self.monotone_diagonals
  }

  pub fn triangulation_diagonals(&self) -> &[(VertexId, VertexId)] {
    &self.triangulation_diagonals
  }

  /// The DCEL as left by whichever of `make_monotone`/`triangulate` last ran.
  pub fn dcel(&self) -> &Dcel {
    &self.dcel
  }
}

/// `true` if popping `v_j` off the stack while advancing to `v_i` keeps the diagonal
/// interior to the monotone polygon: the turn `v_j -> v_i` must bend into the interior,
/// which (since `v_i`/`v_j` are on the same chain) is exactly a convex turn as seen from
/// that chain's side.
fn orientation_allows_diagonal(
  dcel: &Dcel,
  v_i: VertexId,
  v_j: VertexId,
  sorted: &[VertexId],
  chain_next: &std::collections::HashSet<VertexId>,
) -> bool {
  let idx_j = sorted.iter().position(|&v| v == v_j).unwrap();
  let idx_prev = idx_j.checked_sub(1);
  let Some(idx_prev) = idx_prev else { return true };
  let v_before_j = sorted[idx_prev];
  let p_before = dcel.vertex(v_before_j).point;
  let p_j = dcel.vertex(v_j).point;
  let p_i = dcel.vertex(v_i).point;
  let turn = orientation(&p_before, &p_j, &p_i);
  if chain_next.contains(&v_i) {
    turn == Orientation::Left
  } else {
    turn == Orientation::Right
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dcel::Dcel;
  use crate::geom::Point;

  /// A 15-vertex polygon shaped so the sweep produces Split and Merge vertices:
  /// two "fingers" pointing inward from the top and bottom of an otherwise convex ring.
  fn comb_polygon() -> Vec<Point> {
    vec![
      Point::new(0.0, 10.0),
      Point::new(2.0, 8.0),
      Point::new(1.0, 10.0), // inward finger from the top: Split/Merge pair
      Point::new(4.0, 8.0),
      Point::new(6.0, 10.0),
      Point::new(8.0, 10.0),
      Point::new(10.0, 10.0),
      Point::new(10.0, 0.0),
      Point::new(8.0, 0.0),
      Point::new(7.0, 2.0),
      Point::new(6.0, 0.0), // inward finger from the bottom
      Point::new(4.0, 0.0),
      Point::new(2.0, 0.0),
      Point::new(0.0, 0.0),
      Point::new(-2.0, 5.0),
    ]
  }

  #[test]
  fn categorizes_a_square() {
    let dcel = Dcel::new(&[
      Point::new(0.0, 0.0),
      Point::new(10.0, 0.0),
      Point::new(10.0, 10.0),
      Point::new(0.0, 10.0),
    ])
    .unwrap();
    // (0,10) and (10,10) are the two topmost vertices: one Start, one Regular (or vice
    // versa depending on winding); (0,0)/(10,0) are bottommost: End/Regular.
    let cats: Vec<VertexCategory> = dcel.vertex_ids().map(|v| categorize_vertex(&dcel, v)).collect();
    assert!(cats.contains(&VertexCategory::Start));
    assert!(cats.contains(&VertexCategory::End));
  }

  #[test]
  fn comb_polygon_partitions_without_crashing() {
    let dcel = Dcel::new(&comb_polygon()).unwrap();
    let diagonals = partition_into_monotone_pieces(&dcel);
    // At minimum the two inward fingers force at least one Split/Merge diagonal pair.
    assert!(!diagonals.is_empty());
  }

  #[test]
  fn full_triangulation_of_the_comb_polygon_gives_n_minus_2_triangles() {
    let points = comb_polygon();
    let n = points.len();
    let mut dcel = Dcel::new(&points).unwrap();
    let diagonals = triangulate_polygon(&mut dcel).unwrap();
    // A simple n-gon always needs n - 3 diagonals to fully triangulate, producing n - 2
    // triangles, regardless of how many of those diagonals come from partitioning vs.
    // the per-face triangulation pass.
    assert_eq!(diagonals.len(), n - 3);

    let bounded_faces: Vec<FaceId> = dcel.face_ids().filter(|&f| dcel.face(f).outer.is_some()).collect();
    assert_eq!(bounded_faces.len(), n - 2);
    for face in bounded_faces {
      assert_eq!(dcel.face_vertices(face).len(), 3);
    }
  }

  #[test]
  fn monotone_partition_struct_api_matches_the_free_functions() {
    let points = comb_polygon();
    let n = points.len();
    let mut partition = MonotonePartition::new(&points).unwrap();
    partition.make_monotone().unwrap();
    partition.triangulate().unwrap();

    assert_eq!(
      partition.monotone_diagonals().len() + partition.triangulation_diagonals().len(),
      n - 3
    );

    let bounded_faces: Vec<FaceId> = partition.dcel().face_ids().filter(|&f| partition.dcel().face(f).outer.is_some()).collect();
    assert_eq!(bounded_faces.len(), n - 2);
    for face in bounded_faces {
      assert_eq!(partition.dcel().face_vertices(face).len(), 3);
    }
  }

  #[test]
  fn triangulating_a_convex_pentagon_gives_n_minus_2_triangles() {
    let dcel = Dcel::new(&[
      Point::new(0.0, 0.0),
      Point::new(10.0, 0.0),
      Point::new(10.0, 6.0),
      Point::new(5.0, 10.0),
      Point::new(0.0, 6.0),
    ])
    .unwrap();
    let face = dcel.face_ids().next().unwrap();
    let diagonals = triangulate_monotone_face(&dcel, face);
    // n - 3 diagonals split an n-gon into n - 2 triangles.
    assert_eq!(diagonals.len(), 2);
  }
}
