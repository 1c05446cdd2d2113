//! A doubly-connected edge list over a planar subdivision (`spec.md` §3.3/§4.3).
//!
//! Vertices, half-edges and faces live in flat arenas; `next`/`prev`/`twin`/`incident_face`
//! links are indices (`VertexId`/`HalfEdgeId`/`FaceId`) rather than pointers, per the
//! design note in `spec.md` §9. Construction starts from a simple, CCW-oriented polygon:
//! every vertex gets one outgoing (CCW, bounding the interior face) and one incoming (CW,
//! bounding the single unbounded face) half-edge, exactly mirroring a two-face planar
//! subdivision before any diagonal has been applied.

use crate::geom::{orientation, Orientation, Point, Segment};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalfEdgeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceId(u32);

impl VertexId {
  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

impl HalfEdgeId {
  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

impl FaceId {
  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone)]
pub struct Vertex {
  pub point: Point,
  pub incident_edge: HalfEdgeId,
}

#[derive(Debug, Clone)]
pub struct HalfEdge {
  pub origin: VertexId,
  pub next: HalfEdgeId,
  pub prev: HalfEdgeId,
  pub twin: HalfEdgeId,
  pub incident_face: FaceId,
}

#[derive(Debug, Clone, Default)]
pub struct Face {
  /// A half-edge on the outer boundary of this face; `None` for the unbounded face.
  pub outer: Option<HalfEdgeId>,
  /// One half-edge per inner boundary (hole) contained in this face.
  pub inner: Vec<HalfEdgeId>,
}

/// The pair of departing half-edges found by [`Dcel::diagonal`], and whether connecting
/// them is a legal diagonal.
#[derive(Debug, Clone, Copy)]
pub struct DiagonalData {
  pub departing_edge_v1: Option<HalfEdgeId>,
  pub departing_edge_v2: Option<HalfEdgeId>,
  pub is_valid: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Dcel {
  vertices: Vec<Vertex>,
  half_edges: Vec<HalfEdge>,
  faces: Vec<Face>,
}

impl Dcel {
  /// Builds the two-face subdivision of a simple, CCW-oriented polygon.
  pub fn new(points: &[Point]) -> Result<Dcel> {
    if points.len() < 3 {
      return Err(Error::Precondition(format!(
        "a DCEL needs at least 3 vertices, got {}",
        points.len()
      )));
    }
    let mut dcel = Dcel::default();
    let n = points.len();

    for &p in points {
      dcel.vertices.push(Vertex {
        point: p,
        incident_edge: HalfEdgeId(0), // patched below
      });
    }

    // Two half-edges per polygon edge: an even-indexed CCW one (bounding the interior)
    // and an odd-indexed CW twin (bounding the unbounded face).
    for i in 0..n {
      let cur = VertexId(i as u32);
      let next = VertexId(((i + 1) % n) as u32);
      let h1 = HalfEdgeId(dcel.half_edges.len() as u32);
      let h2 = HalfEdgeId(h1.0 + 1);
      dcel.half_edges.push(HalfEdge {
        origin: cur,
        next: HalfEdgeId(0),
        prev: HalfEdgeId(0),
        twin: h2,
        incident_face: FaceId(0),
      });
      dcel.half_edges.push(HalfEdge {
        origin: next,
        next: HalfEdgeId(0),
        prev: HalfEdgeId(0),
        twin: h1,
        incident_face: FaceId(0),
      });
      dcel.vertices[i].incident_edge = h1;
    }

    let m = dcel.half_edges.len();
    for i in 0..m {
      if i % 2 == 0 {
        dcel.half_edges[i].next = HalfEdgeId(((i + 2) % m) as u32);
        dcel.half_edges[i].prev = HalfEdgeId(((i + m - 2) % m) as u32);
      } else {
        dcel.half_edges[i].prev = HalfEdgeId(((i + 2) % m) as u32);
        dcel.half_edges[i].next = HalfEdgeId(((i + m - 2) % m) as u32);
      }
    }

    let bounded = FaceId(0);
    let unbounded = FaceId(1);
    dcel.faces.push(Face {
      outer: Some(HalfEdgeId(0)),
      inner: Vec::new(),
    });
    dcel.faces.push(Face {
      outer: None,
      inner: vec![HalfEdgeId(1)],
    });
    for i in (0..m).step_by(2) {
      dcel.half_edges[i].incident_face = bounded;
    }
    for i in (1..m).step_by(2) {
      dcel.half_edges[i].incident_face = unbounded;
    }

    Ok(dcel)
  }

  pub fn vertex(&self, id: VertexId) -> &Vertex {
    &self.vertices[id.0 as usize]
  }

  pub fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge {
    &self.half_edges[id.0 as usize]
  }

  pub fn face(&self, id: FaceId) -> &Face {
    &self.faces[id.0 as usize]
  }

  pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
    (0..self.vertices.len() as u32).map(VertexId)
  }

  pub fn half_edge_ids(&self) -> impl Iterator<Item = HalfEdgeId> {
    (0..self.half_edges.len() as u32).map(HalfEdgeId)
  }

  pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
    (0..self.faces.len() as u32).map(FaceId)
  }

  pub fn origin_point(&self, e: HalfEdgeId) -> Point {
    self.vertex(self.half_edge(e).origin).point
  }

  pub fn destination_point(&self, e: HalfEdgeId) -> Point {
    let twin = self.half_edge(e).twin;
    self.vertex(self.half_edge(twin).origin).point
  }

  pub fn segment_of(&self, e: HalfEdgeId) -> Segment {
    Segment::new(self.origin_point(e), self.destination_point(e))
  }

  fn segment_between(&self, v_start: VertexId, v_end: VertexId) -> Segment {
    Segment::new(self.vertex(v_start).point, self.vertex(v_end).point)
  }

  /// All half-edges with origin `v`, in CCW order around `v`.
  pub fn departing_edges(&self, v: VertexId) -> Vec<HalfEdgeId> {
    let mut e_first = self.vertex(v).incident_edge;
    if self.half_edge(e_first).origin != v {
      e_first = self.half_edge(e_first).twin;
    }
    let mut out = Vec::new();
    let mut e = e_first;
    let cap = self.half_edges.len() + 1;
    loop {
      out.push(e);
      e = self.half_edge(e).twin;
      e = self.half_edge(e).next;
      if e == e_first || out.len() > cap {
        break;
      }
    }
    out
  }

  /// The vertices bounding `face`'s outer loop, in order.
  pub fn face_vertices(&self, face: FaceId) -> Vec<VertexId> {
    let Some(start) = self.face(face).outer else {
      return Vec::new();
    };
    let mut out = Vec::new();
    let mut e = start;
    loop {
      out.push(self.half_edge(e).origin);
      e = self.half_edge(e).next;
      if e == start {
        break;
      }
    }
    out
  }

  /// A pair of edges departing `v1` and `v2` respectively that bound the same face, if
  /// one exists.
  pub fn find_departing_edges_with_common_face(
    &self,
    v1: VertexId,
    v2: VertexId,
  ) -> Option<(HalfEdgeId, HalfEdgeId)> {
    let d1 = self.departing_edges(v1);
    let d2 = self.departing_edges(v2);
    for &e1 in &d1 {
      let f1 = self.half_edge(e1).incident_face;
      for &e2 in &d2 {
        if self.half_edge(e2).incident_face == f1 {
          return Some((e1, e2));
        }
      }
    }
    None
  }

  /// `true` if the segment `orig -> dest` crosses any edge of the face bounded by
  /// `orig_depart_edge`, other than the two edges incident to `dest` itself.
  pub fn any_intersections_exist(&self, orig: VertexId, dest: VertexId, orig_depart_edge: HalfEdgeId) -> bool {
    let test_seg = self.segment_between(orig, dest);
    let stop = self.half_edge(orig_depart_edge).prev;
    let mut e = self.half_edge(orig_depart_edge).next;
    while e != stop {
      let he = self.half_edge(e);
      let twin_origin = self.half_edge(he.twin).origin;
      if he.origin == dest || twin_origin == dest {
        e = self.half_edge(e).next;
        continue;
      }
      if crate::geom::intersection_exists(&test_seg, &self.segment_of(e)) {
        return true;
      }
      e = self.half_edge(e).next;
    }
    false
  }

  /// `true` if `v`'s interior angle (at the face bounded by `departing_edge`) is convex.
  pub fn is_convex(&self, v: VertexId, departing_edge: HalfEdgeId) -> bool {
    debug_assert_eq!(self.half_edge(departing_edge).origin, v);
    let seg_out = self.segment_of(departing_edge);
    let prev = self.half_edge(departing_edge).prev;
    let seg_in = self.segment_of(prev);
    orientation(&seg_in.start, &seg_in.end, &seg_out.end).is_left_or_beyond()
  }

  /// `true` if connecting `orig -> dest` stays inside the face bounded by `orig_depart_edge`.
  pub fn makes_interior_connection(&self, orig: VertexId, dest: VertexId, orig_depart_edge: HalfEdgeId) -> bool {
    let v_next = self.destination_point(orig_depart_edge);
    let prev = self.half_edge(orig_depart_edge).prev;
    let v_prev = self.origin_point(prev);
    let candidate = self.segment_between(orig, dest);

    if self.is_convex(orig, orig_depart_edge) {
      orientation(&candidate.start, &candidate.end, &v_next) == Orientation::Right
        && orientation(&candidate.start, &candidate.end, &v_prev) == Orientation::Left
    } else {
      let exterior = orientation(&candidate.start, &candidate.end, &v_next) == Orientation::Left
        && orientation(&candidate.start, &candidate.end, &v_prev) == Orientation::Right;
      !exterior
    }
  }

  /// Checks whether `v1 -> v2` is a legal diagonal of the face they share (not already
  /// adjacent, crosses no existing edge, and stays interior from both ends).
  pub fn diagonal(&self, v1: VertexId, v2: VertexId) -> DiagonalData {
    let invalid = DiagonalData {
      departing_edge_v1: None,
      departing_edge_v2: None,
      is_valid: false,
    };
    if v1 == v2 {
      return invalid;
    }
    let Some((e1, e2)) = self.find_departing_edges_with_common_face(v1, v2) else {
      return invalid;
    };
    if self.half_edge(self.half_edge(e1).next).origin == v2 {
      return invalid;
    }
    if self.half_edge(self.half_edge(e2).next).origin == v1 {
      return invalid;
    }
    if self.any_intersections_exist(v1, v2, e1) {
      return invalid;
    }
    let is_valid = self.makes_interior_connection(v1, v2, e1) && self.makes_interior_connection(v2, v1, e2);
    DiagonalData {
      departing_edge_v1: Some(e1),
      departing_edge_v2: Some(e2),
      is_valid,
    }
  }

  /// Splits the face shared by `v1` and `v2` along the diagonal `v1 -> v2`, producing a
  /// new face and two new twin half-edges.
  pub fn split(&mut self, v1: VertexId, v2: VertexId) -> Result<()> {
    let diag = self.diagonal(v1, v2);
    if !diag.is_valid {
      return Err(Error::Precondition(format!(
        "{v1:?} -> {v2:?} is not a legal diagonal of their shared face"
      )));
    }
    let dep_v1 = diag.departing_edge_v1.unwrap();
    let dep_v2 = diag.departing_edge_v2.unwrap();

    let f1 = self.half_edge(dep_v1).incident_face;
    let f2 = FaceId(self.faces.len() as u32);

    let e1 = HalfEdgeId(self.half_edges.len() as u32);
    let e2 = HalfEdgeId(e1.0 + 1);

    let dep_v1_prev = self.half_edge(dep_v1).prev;
    let dep_v2_prev = self.half_edge(dep_v2).prev;

    self.half_edges.push(HalfEdge {
      origin: v1,
      next: dep_v2,
      prev: dep_v1_prev,
      twin: e2,
      incident_face: f1,
    });
    self.half_edges.push(HalfEdge {
      origin: v2,
      next: dep_v1,
      prev: dep_v2_prev,
      twin: e1,
      incident_face: f2,
    });

    self.half_edges[dep_v1_prev.0 as usize].next = e1;
    self.half_edges[dep_v1.0 as usize].prev = e2;
    self.half_edges[dep_v2_prev.0 as usize].next = e2;
    self.half_edges[dep_v2.0 as usize].prev = e1;

    let old_inner = self.face(f1).inner.clone();
    self.faces.push(Face {
      outer: Some(e2),
      inner: old_inner,
    });
    self.faces[f1.0 as usize].outer = Some(e1);

    let mut e_cur = e2;
    loop {
      self.half_edges[e_cur.0 as usize].incident_face = f2;
      e_cur = self.half_edge(e_cur).next;
      if e_cur == e2 {
        break;
      }
    }

    Ok(())
  }

  /// Recomputes and re-checks every structural invariant: vertex-loop closure, twin
  /// symmetry, next/prev consistency, and face-loop closure. Intended for tests and
  /// debug assertions, not the hot path (`spec.md` §9, promoting `Validate()` to a public
  /// self-check).
  pub fn validate(&self) -> Result<()> {
    let cap = self.half_edges.len() + 2;

    for v in self.vertex_ids() {
      let mut e_first = self.vertex(v).incident_edge;
      if self.half_edge(e_first).origin != v {
        e_first = self.half_edge(e_first).twin;
      }
      if self.half_edge(e_first).origin != v {
        return Err(Error::Invariant {
          entity: format!("{v:?}"),
          expected: "incident edge has this vertex as its origin".to_string(),
          actual: "incident edge (and its twin) originate elsewhere".to_string(),
        });
      }
      let mut e = e_first;
      let mut iters = 0;
      loop {
        e = self.half_edge(e).twin;
        e = self.half_edge(e).next;
        if self.half_edge(e).origin != v {
          return Err(Error::Invariant {
            entity: format!("{v:?}"),
            expected: "walking next(twin(e)) around the vertex stays on edges originating here".to_string(),
            actual: format!("reached {e:?}, originating at {:?}", self.half_edge(e).origin),
          });
        }
        iters += 1;
        if iters > cap {
          return Err(Error::Invariant {
            entity: format!("{v:?}"),
            expected: format!("edge fan closes within {cap} steps"),
            actual: "loop did not terminate".to_string(),
          });
        }
        if e == e_first {
          break;
        }
      }
    }

    if self.half_edges.len() % 2 != 0 || self.half_edges.len() < 2 * self.vertices.len() {
      return Err(Error::Invariant {
        entity: "half-edge count".to_string(),
        expected: format!("even and at least {}", 2 * self.vertices.len()),
        actual: self.half_edges.len().to_string(),
      });
    }

    for e in self.half_edge_ids() {
      let he = self.half_edge(e);
      if self.half_edge(he.twin).twin != e {
        return Err(Error::Invariant {
          entity: format!("{e:?}"),
          expected: "twin's twin is itself".to_string(),
          actual: format!("twin's twin is {:?}", self.half_edge(he.twin).twin),
        });
      }
      if self.half_edge(self.half_edge(he.prev).twin).origin != he.origin {
        return Err(Error::Invariant {
          entity: format!("{e:?}"),
          expected: format!("prev's twin originates at {:?}", he.origin),
          actual: format!("prev's twin originates at {:?}", self.half_edge(self.half_edge(he.prev).twin).origin),
        });
      }
      if let Some(outer) = self.face(he.incident_face).outer {
        if self.half_edge(outer).incident_face != he.incident_face {
          return Err(Error::Invariant {
            entity: format!("{e:?}"),
            expected: format!("face's outer edge has incident_face {:?}", he.incident_face),
            actual: format!("outer edge has incident_face {:?}", self.half_edge(outer).incident_face),
          });
        }
      }
    }

    for f in self.face_ids() {
      let face = self.face(f);
      if face.outer.is_none() && face.inner.is_empty() {
        return Err(Error::Invariant {
          entity: format!("{f:?}"),
          expected: "an outer boundary or at least one inner boundary".to_string(),
          actual: "neither".to_string(),
        });
      }
      if let Some(start) = face.outer {
        let mut e = start;
        let mut iters = 0;
        loop {
          if self.half_edge(e).incident_face != f {
            return Err(Error::Invariant {
              entity: format!("{f:?}"),
              expected: format!("outer loop stays on edges with incident_face {f:?}"),
              actual: format!("{e:?} has incident_face {:?}", self.half_edge(e).incident_face),
            });
          }
          e = self.half_edge(e).next;
          iters += 1;
          if iters > cap {
            return Err(Error::Invariant {
              entity: format!("{f:?}"),
              expected: format!("outer loop closes within {cap} steps"),
              actual: "loop did not terminate".to_string(),
            });
          }
          if e == start {
            break;
          }
        }
      }
      for &start in &face.inner {
        let mut e = start;
        let mut iters = 0;
        loop {
          if self.half_edge(e).incident_face != f {
            return Err(Error::Invariant {
              entity: format!("{f:?}"),
              expected: format!("inner loop stays on edges with incident_face {f:?}"),
              actual: format!("{e:?} has incident_face {:?}", self.half_edge(e).incident_face),
            });
          }
          e = self.half_edge(e).next;
          iters += 1;
          if iters > cap {
            return Err(Error::Invariant {
              entity: format!("{f:?}"),
              expected: format!("inner loop closes within {cap} steps"),
              actual: "loop did not terminate".to_string(),
            });
          }
          if e == start {
            break;
          }
        }
      }
    }

    log::debug!(
      "DCEL validated: {} vertices, {} half-edges, {} faces",
      self.vertices.len(),
      self.half_edges.len(),
      self.faces.len()
    );
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn square() -> Dcel {
    Dcel::new(&[
      Point::new(0.0, 0.0),
      Point::new(10.0, 0.0),
      Point::new(10.0, 10.0),
      Point::new(0.0, 10.0),
    ])
    .unwrap()
  }

  #[test]
  fn construction_validates() {
    let dcel = square();
    dcel.validate().unwrap();
    assert_eq!(dcel.face_ids().count(), 2);
  }

  #[test]
  fn too_few_points_errors() {
    assert!(Dcel::new(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).is_err());
  }

  #[test]
  fn face_vertices_recovers_input_loop() {
    let dcel = square();
    let bounded = FaceId(0);
    let verts = dcel.face_vertices(bounded);
    assert_eq!(verts.len(), 4);
  }

  #[test]
  fn split_on_a_square_adds_a_face() {
    let mut dcel = square();
    let v0 = VertexId(0);
    let v2 = VertexId(2);
    dcel.split(v0, v2).unwrap();
    dcel.validate().unwrap();
    assert_eq!(dcel.face_ids().count(), 3);
  }

  #[test]
  fn split_adjacent_vertices_is_rejected() {
    let mut dcel = square();
    assert!(dcel.split(VertexId(0), VertexId(1)).is_err());
  }
}
