//! Bentley-Ottmann segment intersection (`spec.md` §4.5).
//!
//! An event queue ordered top-to-bottom ([`Point::sweep_cmp`]), a status structure of
//! active segments ordered by x-intercept at the current sweep line, and a "new event"
//! test run on the boundary neighbours of whatever changed at the current event point.
//! The status structure's sweep `y` is nudged an epsilon below the event point before
//! re-inserting the segments that continue past it, so segments that swap order at the
//! event sort correctly immediately afterwards.

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::rc::Rc;

use crate::geom::{compute_intersection, strict_intersection_exists, Point, Segment};
use crate::tree::{Comparator, NodeId, RedBlackTree};

/// The sweep nudge, scaled to the input's coordinate spread rather than a bare constant
/// (`spec.md` §9, first Open Question), so segments at very large or very small
/// coordinates still reorder correctly at a shared event point.
fn sweep_nudge(segments: &[Segment]) -> f64 {
  let spread = segments
    .iter()
    .flat_map(|s| [s.start.x, s.start.y, s.end.x, s.end.y])
    .fold(1.0_f64, |acc, v| acc.max(v.abs()));
  spread * 1e-9
}

#[derive(Debug, Clone)]
pub struct Intersection {
  pub point: Point,
  pub segments: Vec<Segment>,
}

struct SweepOrder;

impl Comparator<Point> for SweepOrder {
  fn compare(&self, a: &Point, b: &Point) -> Ordering {
    a.sweep_cmp(b)
  }
}

/// Keyed by event point, value is the indices (into the shared segment list) of segments
/// whose *upper* endpoint is this event.
type EventQueue = RedBlackTree<Point, Vec<u32>, SweepOrder>;

struct SegmentOrder {
  segments: Rc<Vec<Segment>>,
  sweep_y: Rc<Cell<f64>>,
}

impl Comparator<u32> for SegmentOrder {
  fn compare(&self, a: &u32, b: &u32) -> Ordering {
    if a == b {
      return Ordering::Equal;
    }
    let y = self.sweep_y.get();
    let xa = self.segments[*a as usize].x_at_y(y);
    let xb = self.segments[*b as usize].x_at_y(y);
    match xa.partial_cmp(&xb).unwrap_or(Ordering::Equal) {
      Ordering::Equal => a.cmp(b),
      ord => ord,
    }
  }
}

type Status = RedBlackTree<u32, (), SegmentOrder>;

fn insert_upper_event(queue: &mut EventQueue, p: Point, idx: u32) {
  match queue.find(&p) {
    Some(id) => queue.value_mut(id).push(idx),
    None => {
      queue.insert(p, vec![idx]);
    }
  }
}

fn insert_plain_event(queue: &mut EventQueue, p: Point) {
  if queue.find(&p).is_none() {
    queue.insert(p, Vec::new());
  }
}

fn build_event_queue(segments: &[Segment]) -> EventQueue {
  let mut queue: EventQueue = RedBlackTree::with_comparator(SweepOrder);
  for (i, seg) in segments.iter().enumerate() {
    insert_upper_event(&mut queue, seg.upper(), i as u32);
    insert_plain_event(&mut queue, seg.lower());
  }
  queue
}

fn pop_next(queue: &mut EventQueue) -> Option<(Point, Vec<u32>)> {
  let id = queue.max()?;
  Some(queue.erase(id))
}

/// The segments immediately left and right of `target_x` in `status`, at the status
/// structure's current sweep `y`.
fn neighbours_of_x(status: &Status, segments: &[Segment], sweep_y: f64, target_x: f64) -> (Option<NodeId>, Option<NodeId>) {
  let mut cur = status.root();
  let mut left = None;
  let mut right = None;
  while let Some(id) = cur {
    let x = segments[*status.key(id) as usize].x_at_y(sweep_y);
    match x.partial_cmp(&target_x).unwrap_or(Ordering::Equal) {
      Ordering::Less => {
        left = Some(id);
        cur = status.right_child(id);
      }
      Ordering::Greater => {
        right = Some(id);
        cur = status.left_child(id);
      }
      Ordering::Equal => {
        left = status.predecessor(id);
        right = status.successor(id);
        break;
      }
    }
  }
  (left, right)
}

fn find_new_event(queue: &mut EventQueue, seg1: Segment, seg2: Segment, p: Point, sweep_y: f64) {
  if !strict_intersection_exists(&seg1, &seg2) {
    return;
  }
  let Some(ip) = compute_intersection(&seg1, &seg2) else {
    return;
  };
  if ip.y < sweep_y || ip.x > p.x {
    insert_plain_event(queue, ip);
  }
}

/// Every pairwise intersection among `segments`, grouping coincident intersection points
/// into a single [`Intersection`] listing every segment through that point.
pub fn intersections(segments: &[Segment]) -> Vec<Intersection> {
  let nudge = sweep_nudge(segments);
  log::debug!("bentley_ottmann: sweep nudge = {:e}", nudge);
  let segments: Rc<Vec<Segment>> = Rc::new(segments.to_vec());
  let sweep_y = Rc::new(Cell::new(f64::INFINITY));
  let mut queue = build_event_queue(&segments);
  let mut status: Status = RedBlackTree::with_comparator(SegmentOrder {
    segments: segments.clone(),
    sweep_y: sweep_y.clone(),
  });
  let mut out = Vec::new();

  while let Some((point, upper_idx)) = pop_next(&mut queue) {
    sweep_y.set(point.y);

    let active: Vec<u32> = status.iter().map(|(k, _)| *k).collect();
    let mut lower_idx = Vec::new();
    let mut central_idx = Vec::new();
    for &idx in &active {
      let seg = segments[idx as usize];
      if seg.lower() == point {
        lower_idx.push(idx);
      } else if seg.contains_interior(&point) {
        central_idx.push(idx);
      }
    }

    let luc: HashSet<u32> = upper_idx
      .iter()
      .chain(lower_idx.iter())
      .chain(central_idx.iter())
      .copied()
      .collect();
    if luc.len() >= 2 {
      out.push(Intersection {
        point,
        segments: luc.iter().map(|&i| segments[i as usize]).collect(),
      });
    }

    for idx in lower_idx.iter().chain(central_idx.iter()) {
      if let Some(id) = status.find(idx) {
        status.erase(id);
      }
    }

    sweep_y.set(point.y - nudge);
    let uc: HashSet<u32> = upper_idx.iter().chain(central_idx.iter()).copied().collect();
    for &idx in &uc {
      status.insert(idx, ());
    }

    let cur_y = sweep_y.get();
    if uc.is_empty() {
      let (left, right) = neighbours_of_x(&status, &segments, cur_y, point.x);
      if let (Some(l), Some(r)) = (left, right) {
        let s1 = segments[*status.key(l) as usize];
        let s2 = segments[*status.key(r) as usize];
        find_new_event(&mut queue, s1, s2, point, cur_y);
      }
    } else {
      let leftmost = *uc
        .iter()
        .min_by(|&&a, &&b| segments[a as usize].x_at_y(cur_y).partial_cmp(&segments[b as usize].x_at_y(cur_y)).unwrap())
        .unwrap();
      if let Some(id) = status.find(&leftmost) {
        if let Some(left_id) = status.predecessor(id) {
          let s1 = segments[*status.key(left_id) as usize];
          let s2 = segments[leftmost as usize];
          find_new_event(&mut queue, s1, s2, point, cur_y);
        }
      }

      let rightmost = *uc
        .iter()
        .max_by(|&&a, &&b| segments[a as usize].x_at_y(cur_y).partial_cmp(&segments[b as usize].x_at_y(cur_y)).unwrap())
        .unwrap();
      if let Some(id) = status.find(&rightmost) {
        if let Some(right_id) = status.successor(id) {
          let s1 = segments[rightmost as usize];
          let s2 = segments[*status.key(right_id) as usize];
          find_new_event(&mut queue, s1, s2, point, cur_y);
        }
      }
    }
  }

  out
}

/// Stateful wrapper over [`intersections`], shaped per `spec.md` §6: `new` stores the
/// segment set, `process` runs the sweep, `intersections` reads back each hit point paired
/// with the segments through it.
pub struct BentleyOttmann {
  segments: Vec<Segment>,
  hits: Vec<Intersection>,
}

impl BentleyOttmann {
  pub fn new(segments: &[Segment]) -> BentleyOttmann {
    BentleyOttmann {
      segments: segments.to_vec(),
      hits: Vec::new(),
    }
  }

  /// Runs the sweep over the stored segment set, replacing any previous result.
  pub fn process(&mut self) {
    self.hits = intersections(&self.segments);
  }

  /// Every intersection point found by the last [`Self::process`] call, paired with the
  /// segments through it. Empty until `process` has run.
  pub fn intersections(&self) -> Vec<(Point, Vec<Segment>)> {
    self.hits.iter().map(|hit| (hit.point, hit.segments.clone())).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn two_crossing_segments() {
    let segs = vec![
      Segment::new(Point::new(0.0, 10.0), Point::new(10.0, 0.0)),
      Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)),
    ];
    let hits = intersections(&segs);
    assert_eq!(hits.len(), 1);
    assert!(approx_point(hits[0].point, Point::new(5.0, 5.0)));
    assert_eq!(hits[0].segments.len(), 2);
  }

  #[test]
  fn disjoint_segments_do_not_intersect() {
    let segs = vec![
      Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
      Segment::new(Point::new(5.0, 5.0), Point::new(6.0, 6.0)),
    ];
    assert!(intersections(&segs).is_empty());
  }

  #[test]
  fn three_segments_crossing_at_one_point() {
    let segs = vec![
      Segment::new(Point::new(-5.0, 0.0), Point::new(5.0, 0.0)),
      Segment::new(Point::new(0.0, -5.0), Point::new(0.0, 5.0)),
      Segment::new(Point::new(-5.0, -5.0), Point::new(5.0, 5.0)),
    ];
    let hits = intersections(&segs);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].segments.len(), 3);
    assert!(approx_point(hits[0].point, Point::new(0.0, 0.0)));
  }

  #[test]
  fn many_segments_find_every_pairwise_crossing() {
    // A "fan" of 4 segments all crossing a single horizontal one at distinct points.
    let mut segs = vec![Segment::new(Point::new(-10.0, 0.0), Point::new(10.0, 0.0))];
    for i in -2..=2 {
      if i == 0 {
        continue;
      }
      let x = i as f64 * 2.0;
      segs.push(Segment::new(Point::new(x, -5.0), Point::new(x, 5.0)));
    }
    let hits = intersections(&segs);
    assert_eq!(hits.len(), 4);
  }

  fn approx_point(a: Point, b: Point) -> bool {
    a == b
  }

  #[test]
  fn bentley_ottmann_struct_api_matches_the_free_function() {
    let segs = vec![
      Segment::new(Point::new(0.0, 10.0), Point::new(10.0, 0.0)),
      Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)),
    ];
    let mut bo = BentleyOttmann::new(&segs);
    assert!(bo.intersections().is_empty(), "process() has not run yet");
    bo.process();
    let hits = bo.intersections();
    assert_eq!(hits.len(), 1);
    assert!(approx_point(hits[0].0, Point::new(5.0, 5.0)));
    assert_eq!(hits[0].1.len(), 2);
  }
}
