//! Fortune's algorithm for the Voronoi diagram of a point set (`spec.md` §4.6).
//!
//! The beachline is kept as a flat, left-to-right ordered sequence of breakpoints in the
//! status structure; arcs are never stored as nodes of their own, they are the implicit
//! gaps between two (or, at either end of the beachline, one) consecutive breakpoints.
//! Every breakpoint carries the pair of sites it separates, so an arc's generating site
//! can always be read off its bounding breakpoints without extra bookkeeping — this is
//! the same "flatten the classic structure into one ordered container" move the range
//! trees make with their secondary structures.
//!
//! Circle events are invalidated lazily: a breakpoint pair is only a *live* circle event
//! if both breakpoint ids are still present in the tree and still adjacent. No explicit
//! `valid` flag is threaded through a circle event struct; adjacency after any
//! intervening insert/erase is strictly stronger.

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use crate::geom::{bisector, circumcircle, orientation, Orientation, Parabola, Point};
use crate::range::Range2D;
use crate::tolerance::approx_zero;
use crate::tree::{Comparator, NodeId, RedBlackTree};

/// A nudge applied to the sweep line while processing a site event, so the new site's
/// (momentarily zero-height) parabola doesn't collide exactly with its neighbour's.
const SITE_NUDGE: f64 = 1e-7;

/// One edge of the diagram: the perpendicular bisector of `site_left`/`site_right`,
/// clipped to the region between the two Voronoi vertices (or the bounding box) it
/// actually spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiEdge {
  pub site_left: Point,
  pub site_right: Point,
  pub start: Point,
  pub end: Point,
}

#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
  pub sites: Vec<Point>,
  pub vertices: Vec<Point>,
  pub edges: Vec<VoronoiEdge>,
  bounds: Range2D,
}

/// One bounded cell of the diagram: the convex polygon of points closer to `site` than to
/// any other, clipped to the diagram's bounding box. Together with the single unbounded
/// region outside the box (never materialized, for the same reason `Dcel`'s unbounded face
/// carries no boundary vertex list) this is the diagram's face structure — `sites.len()`
/// bounded faces plus that one implicit unbounded face.
#[derive(Debug, Clone)]
pub struct VoronoiFace {
  pub site: Point,
  /// Boundary vertices in CCW order, already clipped to the bounding box.
  pub boundary: Vec<Point>,
}

impl VoronoiDiagram {
  /// Every edge bordering `site`, in no particular order.
  pub fn cell_edges(&self, site: Point) -> Vec<&VoronoiEdge> {
    self.edges.iter().filter(|e| e.site_left == site || e.site_right == site).collect()
  }

  /// The diagram's bounded faces, one per site: each is the intersection of the bounding
  /// box with every half-plane "closer to this site than to site `other`", which is always
  /// convex since it is an intersection of half-planes.
  pub fn faces(&self) -> Vec<VoronoiFace> {
    let corners = vec![
      Point::new(self.bounds.x_min, self.bounds.y_min),
      Point::new(self.bounds.x_max, self.bounds.y_min),
      Point::new(self.bounds.x_max, self.bounds.y_max),
      Point::new(self.bounds.x_min, self.bounds.y_max),
    ];
    self
      .sites
      .iter()
      .map(|&site| {
        let mut boundary = corners.clone();
        for &other in &self.sites {
          if other == site || boundary.is_empty() {
            continue;
          }
          boundary = clip_halfplane(&boundary, |p| p.distance_squared(&site) - p.distance_squared(&other));
        }
        VoronoiFace { site, boundary }
      })
      .collect()
  }
}

/// Keeps the part of the convex polygon `poly` (CCW, closed implicitly) where `f(p) <= 0`,
/// cutting any edge that crosses the boundary. `f` must be an affine function of `p` (e.g.
/// a signed distance to a bisector line) so that linear interpolation along a cut edge
/// lands exactly on the zero crossing. Standard Sutherland-Hodgman single-plane clip.
fn clip_halfplane(poly: &[Point], f: impl Fn(Point) -> f64) -> Vec<Point> {
  let n = poly.len();
  let mut out = Vec::with_capacity(n + 1);
  for i in 0..n {
    let cur = poly[i];
    let prev = poly[(i + n - 1) % n];
    let f_cur = f(cur);
    let f_prev = f(prev);
    let cur_in = f_cur <= 0.0;
    let prev_in = f_prev <= 0.0;
    if cur_in != prev_in {
      let t = f_prev / (f_prev - f_cur);
      out.push(Point::new(prev.x + t * (cur.x - prev.x), prev.y + t * (cur.y - prev.y)));
    }
    if cur_in {
      out.push(cur);
    }
  }
  out
}

/// `true` if every turn along the closed polygon `points` (CCW) is a left turn — i.e. the
/// polygon is convex. Collinear turns are tolerated (a clipped edge can land exactly on a
/// box boundary).
fn is_convex_polygon(points: &[Point]) -> bool {
  let n = points.len();
  if n < 3 {
    return true;
  }
  (0..n).all(|i| {
    let a = points[i];
    let b = points[(i + 1) % n];
    let c = points[(i + 2) % n];
    orientation(&a, &b, &c) != Orientation::Right
  })
}

/// A bounding box enclosing `sites` with `margin` of slack on every side, big enough that
/// every unbounded Voronoi ray gets clipped somewhere sensible.
pub fn bounding_box_of(sites: &[Point], margin: f64) -> Range2D {
  let mut x_min = f64::INFINITY;
  let mut x_max = f64::NEG_INFINITY;
  let mut y_min = f64::INFINITY;
  let mut y_max = f64::NEG_INFINITY;
  for s in sites {
    x_min = x_min.min(s.x);
    x_max = x_max.max(s.x);
    y_min = y_min.min(s.y);
    y_max = y_max.max(s.y);
  }
  Range2D {
    x_min: x_min - margin,
    x_max: x_max + margin,
    y_min: y_min - margin,
    y_max: y_max + margin,
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Breakpoint {
  id: u32,
  left_site: Point,
  right_site: Point,
}

struct BreakpointOrder {
  sweep_y: Rc<Cell<f64>>,
}

impl Comparator<Breakpoint> for BreakpointOrder {
  fn compare(&self, a: &Breakpoint, b: &Breakpoint) -> Ordering {
    if a.id == b.id {
      return Ordering::Equal;
    }
    let y = self.sweep_y.get();
    let xa = breakpoint_x(a.left_site, a.right_site, y);
    let xb = breakpoint_x(b.left_site, b.right_site, y);
    match xa.partial_cmp(&xb).unwrap_or(Ordering::Equal) {
      Ordering::Equal => a.id.cmp(&b.id),
      ord => ord,
    }
  }
}

type Beachline = RedBlackTree<Breakpoint, (), BreakpointOrder>;

/// The x-coordinate where the parabolas with foci `left_site`/`right_site` and shared
/// directrix `sweep_y` cross — the position of the breakpoint between the two arcs they
/// bound. Of the quadratic's two roots, the correct one is the one where the left arc's
/// parabola is below the right arc's just to its left, and above just to its right.
fn breakpoint_x(left_site: Point, right_site: Point, sweep_y: f64) -> f64 {
  let left = Parabola::new(left_site, sweep_y);
  let right = Parabola::new(right_site, sweep_y);
  if left.is_degenerate {
    return left_site.x;
  }
  if right.is_degenerate {
    return right_site.x;
  }
  let a = left.a - right.a;
  let b = left.b - right.b;
  let c = left.c - right.c;
  if approx_zero(a, 1.0) {
    return -c / b;
  }
  let discriminant = (b * b - 4.0 * a * c).max(0.0);
  let sqrt_d = discriminant.sqrt();
  let x1 = (-b - sqrt_d) / (2.0 * a);
  let x2 = (-b + sqrt_d) / (2.0 * a);
  let eps = 1e-6 * left_site.x.abs().max(right_site.x.abs()).max(1.0);
  let valid = |x: f64| left.eval(x - eps) < right.eval(x - eps) && left.eval(x + eps) > right.eval(x + eps);
  if valid(x1) {
    x1
  } else if valid(x2) {
    x2
  } else {
    // Near-degenerate: both roots coincide (the two sites are almost vertically
    // stacked). Either is a reasonable approximation.
    x1
  }
}

/// The breakpoints immediately left and right of `target_x` at the beachline's current
/// sweep `y`.
fn neighbours_of_x(beach: &Beachline, sweep_y: f64, target_x: f64) -> (Option<NodeId>, Option<NodeId>) {
  let mut cur = beach.root();
  let mut left = None;
  let mut right = None;
  while let Some(id) = cur {
    let bp = beach.key(id);
    let x = breakpoint_x(bp.left_site, bp.right_site, sweep_y);
    match x.partial_cmp(&target_x).unwrap_or(Ordering::Equal) {
      Ordering::Less => {
        left = Some(id);
        cur = beach.right_child(id);
      }
      Ordering::Greater => {
        right = Some(id);
        cur = beach.left_child(id);
      }
      Ordering::Equal => {
        left = beach.predecessor(id);
        right = beach.successor(id);
        break;
      }
    }
  }
  (left, right)
}

#[derive(Debug, Clone, Copy)]
enum EventKind {
  Site(Point),
  Circle { left_id: u32, right_id: u32 },
}

struct SweepOrder;

impl Comparator<Point> for SweepOrder {
  fn compare(&self, a: &Point, b: &Point) -> Ordering {
    a.sweep_cmp(b)
  }
}

type EventQueue = RedBlackTree<Point, Vec<EventKind>, SweepOrder>;

fn insert_event(queue: &mut EventQueue, p: Point, kind: EventKind) {
  match queue.find(&p) {
    Some(id) => queue.value_mut(id).push(kind),
    None => {
      queue.insert(p, vec![kind]);
    }
  }
}

fn pop_next(queue: &mut EventQueue) -> Option<(Point, Vec<EventKind>)> {
  let id = queue.max()?;
  Some(queue.erase(id))
}

struct OpenEdge {
  site_left: Point,
  site_right: Point,
  /// `None` for the single breakpoint born when the beachline holds exactly two sites —
  /// its edge is the full bisector, unbounded in both directions.
  start: Option<Point>,
}

fn alloc_id(next_id: &mut u32) -> u32 {
  let id = *next_id;
  *next_id += 1;
  id
}

/// Tries to schedule the circle event for the arc bounded by the breakpoints `left_id`
/// and `right_id`, if they are still live and adjacent and their three sites converge.
fn try_schedule_circle_event(
  beach: &Beachline,
  breakpoint_nodes: &HashMap<u32, NodeId>,
  queue: &mut EventQueue,
  sweep_y: f64,
  left_id: u32,
  right_id: u32,
) {
  let (Some(&ln), Some(&rn)) = (breakpoint_nodes.get(&left_id), breakpoint_nodes.get(&right_id)) else {
    return;
  };
  if beach.successor(ln) != Some(rn) {
    return;
  }
  let left = *beach.key(ln);
  let right = *beach.key(rn);
  let site_l = left.left_site;
  let site_mid = left.right_site;
  let site_r = right.right_site;

  if orientation(&site_l, &site_mid, &site_r) != Orientation::Right {
    return;
  }
  let Some((centre, radius)) = circumcircle(&site_l, &site_mid, &site_r) else {
    return;
  };
  let bottom = Point::new(centre.x, centre.y - radius);
  if bottom.y > sweep_y {
    return;
  }
  insert_event(queue, bottom, EventKind::Circle { left_id, right_id });
}

#[allow(clippy::too_many_arguments)]
fn handle_site_event(
  site: Point,
  beach: &mut Beachline,
  breakpoint_nodes: &mut HashMap<u32, NodeId>,
  queue: &mut EventQueue,
  sweep_y: &Rc<Cell<f64>>,
  next_id: &mut u32,
  open_edges: &mut HashMap<u32, OpenEdge>,
  lone_site: &mut Option<Point>,
) {
  sweep_y.set(site.y - SITE_NUDGE);

  if beach.is_empty() {
    match lone_site.take() {
      None => *lone_site = Some(site),
      Some(first) => {
        let id = alloc_id(next_id);
        let bp = Breakpoint {
          id,
          left_site: first,
          right_site: site,
        };
        let node = beach.insert(bp, ()).expect("fresh breakpoint id is always unique");
        breakpoint_nodes.insert(id, node);
        open_edges.insert(
          id,
          OpenEdge {
            site_left: first,
            site_right: site,
            start: None,
          },
        );
      }
    }
    return;
  }

  let (left, right) = neighbours_of_x(beach, sweep_y.get(), site.x);
  let left_bp = left.map(|id| *beach.key(id));
  let right_bp = right.map(|id| *beach.key(id));
  let mid_site = match (left_bp, right_bp) {
    (Some(l), _) => l.right_site,
    (None, Some(r)) => r.left_site,
    (None, None) => unreachable!("a non-empty beachline always has at least one breakpoint"),
  };

  let edge_start = Point::new(site.x, Parabola::new(mid_site, site.y).eval(site.x));
  let bp1_id = alloc_id(next_id);
  let bp2_id = alloc_id(next_id);
  let bp1 = Breakpoint {
    id: bp1_id,
    left_site: mid_site,
    right_site: site,
  };
  let bp2 = Breakpoint {
    id: bp2_id,
    left_site: site,
    right_site: mid_site,
  };
  let node1 = beach.insert(bp1, ()).expect("fresh breakpoint id is always unique");
  let node2 = beach.insert(bp2, ()).expect("fresh breakpoint id is always unique");
  breakpoint_nodes.insert(bp1_id, node1);
  breakpoint_nodes.insert(bp2_id, node2);
  open_edges.insert(
    bp1_id,
    OpenEdge {
      site_left: mid_site,
      site_right: site,
      start: Some(edge_start),
    },
  );
  open_edges.insert(
    bp2_id,
    OpenEdge {
      site_left: site,
      site_right: mid_site,
      start: Some(edge_start),
    },
  );

  if let Some(l) = left_bp {
    try_schedule_circle_event(beach, breakpoint_nodes, queue, sweep_y.get(), l.id, bp1_id);
  }
  if let Some(r) = right_bp {
    try_schedule_circle_event(beach, breakpoint_nodes, queue, sweep_y.get(), bp2_id, r.id);
  }
}

#[allow(clippy::too_many_arguments)]
fn handle_circle_event(
  point: Point,
  left_id: u32,
  right_id: u32,
  beach: &mut Beachline,
  breakpoint_nodes: &mut HashMap<u32, NodeId>,
  queue: &mut EventQueue,
  sweep_y: &Rc<Cell<f64>>,
  next_id: &mut u32,
  open_edges: &mut HashMap<u32, OpenEdge>,
  vertices: &mut Vec<Point>,
  edges: &mut Vec<VoronoiEdge>,
) {
  let (Some(&ln), Some(&rn)) = (breakpoint_nodes.get(&left_id), breakpoint_nodes.get(&right_id)) else {
    return;
  };
  if beach.successor(ln) != Some(rn) {
    return; // stale: a later site or circle event already split this pair apart.
  }
  sweep_y.set(point.y);

  let left = *beach.key(ln);
  let right = *beach.key(rn);
  // `point` is the circle's bottom, used only as the event's sweep-priority key; the
  // vertex itself is the circumcentre.
  let (centre, _) = circumcircle(&left.left_site, &left.right_site, &right.right_site)
    .expect("a scheduled circle event always has a well-defined circumcircle");

  vertices.push(centre);
  for id in [left_id, right_id] {
    if let Some(open) = open_edges.remove(&id) {
      let start = open.start.unwrap_or(centre);
      edges.push(VoronoiEdge {
        site_left: open.site_left,
        site_right: open.site_right,
        start,
        end: centre,
      });
    }
  }

  let far_left = beach.predecessor(ln);
  let far_right = beach.successor(rn);

  beach.erase(ln);
  beach.erase(rn);
  breakpoint_nodes.remove(&left_id);
  breakpoint_nodes.remove(&right_id);

  let merged_id = alloc_id(next_id);
  let merged = Breakpoint {
    id: merged_id,
    left_site: left.left_site,
    right_site: right.right_site,
  };
  let node = beach.insert(merged, ()).expect("fresh breakpoint id is always unique");
  breakpoint_nodes.insert(merged_id, node);
  open_edges.insert(
    merged_id,
    OpenEdge {
      site_left: left.left_site,
      site_right: right.right_site,
      start: Some(centre),
    },
  );

  if let Some(fl) = far_left {
    let fl_bp = *beach.key(fl);
    try_schedule_circle_event(beach, breakpoint_nodes, queue, sweep_y.get(), fl_bp.id, merged_id);
  }
  if let Some(fr) = far_right {
    let fr_bp = *beach.key(fr);
    try_schedule_circle_event(beach, breakpoint_nodes, queue, sweep_y.get(), merged_id, fr_bp.id);
  }
}

/// The bisector direction for `site_left`/`site_right`, signed so that walking from
/// `start` along it moves away from both sites.
fn outward_direction(start: Point, site_left: Point, site_right: Point) -> (f64, f64) {
  let (dx, dy) = bisector(&site_left, &site_right).direction;
  let probe = Point::new(start.x + dx, start.y + dy);
  let base = start.distance_squared(&site_left) + start.distance_squared(&site_right);
  let probed = probe.distance_squared(&site_left) + probe.distance_squared(&site_right);
  if probed >= base {
    (dx, dy)
  } else {
    (-dx, -dy)
  }
}

/// The first point where the ray `origin + t * dir, t > 0` leaves `bounds`, or `None` if
/// `dir` is degenerate.
fn clip_ray(origin: Point, dir: (f64, f64), bounds: &Range2D) -> Option<Point> {
  let mut best: Option<f64> = None;
  let mut consider = |t: f64, other: f64, lo: f64, hi: f64, best: &mut Option<f64>| {
    if t > 1e-9 && other >= lo - 1e-6 && other <= hi + 1e-6 && best.map_or(true, |b| t < b) {
      *best = Some(t);
    }
  };
  if dir.0.abs() > 1e-12 {
    let t = (bounds.x_min - origin.x) / dir.0;
    consider(t, origin.y + t * dir.1, bounds.y_min, bounds.y_max, &mut best);
    let t = (bounds.x_max - origin.x) / dir.0;
    consider(t, origin.y + t * dir.1, bounds.y_min, bounds.y_max, &mut best);
  }
  if dir.1.abs() > 1e-12 {
    let t = (bounds.y_min - origin.y) / dir.1;
    consider(t, origin.x + t * dir.0, bounds.x_min, bounds.x_max, &mut best);
    let t = (bounds.y_max - origin.y) / dir.1;
    consider(t, origin.x + t * dir.0, bounds.x_min, bounds.x_max, &mut best);
  }
  best.map(|t| Point::new(origin.x + t * dir.0, origin.y + t * dir.1))
}

fn finalize_edge(open: OpenEdge, bounds: &Range2D) -> Option<VoronoiEdge> {
  match open.start {
    Some(start) => {
      let dir = outward_direction(start, open.site_left, open.site_right);
      let end = clip_ray(start, dir, bounds)?;
      Some(VoronoiEdge {
        site_left: open.site_left,
        site_right: open.site_right,
        start,
        end,
      })
    }
    None => {
      let origin = bisector(&open.site_left, &open.site_right).origin;
      let dir = outward_direction(origin, open.site_left, open.site_right);
      let a = clip_ray(origin, dir, bounds)?;
      let b = clip_ray(origin, (-dir.0, -dir.1), bounds)?;
      Some(VoronoiEdge {
        site_left: open.site_left,
        site_right: open.site_right,
        start: a,
        end: b,
      })
    }
  }
}

/// The Voronoi diagram of `sites`, with every unbounded cell edge clipped to `bounds`.
pub fn build(sites: &[Point], bounds: Range2D) -> VoronoiDiagram {
  let sweep_y = Rc::new(Cell::new(f64::INFINITY));
  let mut beach: Beachline = RedBlackTree::with_comparator(BreakpointOrder { sweep_y: sweep_y.clone() });
  let mut breakpoint_nodes: HashMap<u32, NodeId> = HashMap::new();
  let mut queue: EventQueue = RedBlackTree::with_comparator(SweepOrder);
  for &s in sites {
    insert_event(&mut queue, s, EventKind::Site(s));
  }

  let mut next_id: u32 = 0;
  let mut open_edges: HashMap<u32, OpenEdge> = HashMap::new();
  let mut vertices = Vec::new();
  let mut edges = Vec::new();
  let mut lone_site: Option<Point> = None;

  while let Some((point, kinds)) = pop_next(&mut queue) {
    for kind in kinds {
      match kind {
        EventKind::Site(site) => handle_site_event(
          site,
          &mut beach,
          &mut breakpoint_nodes,
          &mut queue,
          &sweep_y,
          &mut next_id,
          &mut open_edges,
          &mut lone_site,
        ),
        EventKind::Circle { left_id, right_id } => handle_circle_event(
          point,
          left_id,
          right_id,
          &mut beach,
          &mut breakpoint_nodes,
          &mut queue,
          &sweep_y,
          &mut next_id,
          &mut open_edges,
          &mut vertices,
          &mut edges,
        ),
      }
    }
  }

  for (_, open) in open_edges {
    let sites = (open.site_left, open.site_right);
    match finalize_edge(open, &bounds) {
      Some(edge) => edges.push(edge),
      None => log::warn!(
        "voronoi: edge between {:?} and {:?} could not be clipped to the bounding box",
        sites.0,
        sites.1
      ),
    }
  }

  VoronoiDiagram {
    sites: sites.to_vec(),
    vertices,
    edges,
    bounds,
  }
}

/// Stateful wrapper over [`build`], shaped per `spec.md` §6: `new` stores the site set,
/// `construct` runs Fortune's sweep against a bounding box, and `vertices`/`edges`/`faces`
/// read back the diagram it built.
pub struct Voronoi {
  sites: Vec<Point>,
  diagram: Option<VoronoiDiagram>,
}

impl Voronoi {
  pub fn new(sites: &[Point]) -> Voronoi {
    Voronoi {
      sites: sites.to_vec(),
      diagram: None,
    }
  }

  /// Runs [`build`] against the stored site set, clipping every unbounded edge to
  /// `bounding_box`. Replaces any previously constructed diagram.
  pub fn construct(&mut self, bounding_box: Range2D) {
    self.diagram = Some(build(&self.sites, bounding_box));
  }

  /// Every Voronoi vertex found by the last [`Self::construct`] call. Empty until
  /// `construct` has run.
  pub fn vertices(&self) -> &[Point] {
    self.diagram.as_ref().map_or(&[], |d| d.vertices.as_slice())
  }

  pub fn edges(&self) -> &[VoronoiEdge] {
    self.diagram.as_ref().map_or(&[], |d| d.edges.as_slice())
  }

  pub fn faces(&self) -> Vec<VoronoiFace> {
    self.diagram.as_ref().map_or_else(Vec::new, |d| d.faces())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn two_sites_give_one_unbounded_edge() {
    let sites = vec![Point::new(-5.0, 0.0), Point::new(5.0, 0.0)];
    let bounds = bounding_box_of(&sites, 20.0);
    let diagram = build(&sites, bounds);
    assert_eq!(diagram.edges.len(), 1);
    assert!(diagram.vertices.is_empty());
    let edge = &diagram.edges[0];
    // The bisector of two points symmetric about the origin on the x-axis is the y-axis.
    assert!(approx_zero(edge.start.x, 1e-3));
    assert!(approx_zero(edge.end.x, 1e-3));
  }

  #[test]
  fn three_sites_in_a_triangle_give_one_vertex() {
    let sites = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 10.0)];
    let bounds = bounding_box_of(&sites, 50.0);
    let diagram = build(&sites, bounds);
    assert_eq!(diagram.vertices.len(), 1);
    assert_eq!(diagram.edges.len(), 3);
    // The one Voronoi vertex is the triangle's circumcentre.
    let (centre, _) = circumcircle(&sites[0], &sites[1], &sites[2]).unwrap();
    assert!(diagram.vertices[0] == centre);
  }

  #[test]
  fn every_site_gets_a_nonempty_cell() {
    let sites = vec![
      Point::new(50.0, 10.0),
      Point::new(54.0, 9.0),
      Point::new(48.0, 7.0),
      Point::new(47.3, 5.5),
      Point::new(53.0, 5.0),
      Point::new(52.0, 3.0),
      Point::new(58.0, -2.0),
      Point::new(56.0, -3.5),
      Point::new(44.0, 0.8),
      Point::new(50.0, -7.0),
    ];
    let bounds = bounding_box_of(&sites, 100.0);
    let diagram = build(&sites, bounds);
    assert!(!diagram.edges.is_empty());
    for &s in &sites {
      assert!(!diagram.cell_edges(s).is_empty(), "site {:?} has no bounding edges", s);
    }
  }

  #[test]
  fn face_count_is_sites_plus_the_implicit_unbounded_region() {
    let sites = vec![
      Point::new(50.0, 10.0),
      Point::new(54.0, 9.0),
      Point::new(48.0, 7.0),
      Point::new(47.3, 5.5),
      Point::new(53.0, 5.0),
      Point::new(52.0, 3.0),
      Point::new(58.0, -2.0),
      Point::new(56.0, -3.5),
      Point::new(44.0, 0.8),
      Point::new(50.0, -7.0),
    ];
    let bounds = bounding_box_of(&sites, 100.0);
    let diagram = build(&sites, bounds);
    let faces = diagram.faces();
    // `faces()` enumerates the bounded cells only; the "+ 1" is the single unbounded
    // region outside the bounding box, which carries no finite boundary to list.
    assert_eq!(faces.len() + 1, sites.len() + 1);
    for face in &faces {
      assert!(!face.boundary.is_empty(), "site {:?} has an empty cell", face.site);
      assert!(is_convex_polygon(&face.boundary), "cell for site {:?} is not convex", face.site);
    }
  }

  #[test]
  fn voronoi_struct_api_matches_the_free_function() {
    let sites = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 10.0)];
    let bounds = bounding_box_of(&sites, 50.0);
    let mut voronoi = Voronoi::new(&sites);
    assert!(voronoi.vertices().is_empty(), "construct() has not run yet");
    voronoi.construct(bounds);
    assert_eq!(voronoi.vertices().len(), 1);
    assert_eq!(voronoi.edges().len(), 3);
    assert_eq!(voronoi.faces().len(), sites.len());
  }

  #[test]
  fn four_cocircular_sites_still_terminate() {
    // A degenerate configuration: all four circle events coincide at the origin.
    let sites = vec![
      Point::new(1.0, 0.0),
      Point::new(0.0, 1.0),
      Point::new(-1.0, 0.0),
      Point::new(0.0, -1.0),
    ];
    let bounds = bounding_box_of(&sites, 20.0);
    let diagram = build(&sites, bounds);
    assert!(!diagram.edges.is_empty());
  }
}
