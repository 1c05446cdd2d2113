//! A static 2D kd-tree, alternating the split axis by depth (`spec.md` §4.7).

use crate::geom::Point;

use super::Range2D;

struct Node {
  is_leaf: bool,
  split_value: f64,
  depth: u32,
  left: Option<u32>,
  right: Option<u32>,
  point: Option<Point>,
}

pub struct KdTree {
  nodes: Vec<Node>,
  root: Option<u32>,
}

impl KdTree {
  pub fn new(points: &[Point]) -> KdTree {
    if points.is_empty() {
      return KdTree {
        nodes: Vec::new(),
        root: None,
      };
    }
    let mut nodes = Vec::new();
    let root = Self::build(0, points.to_vec(), &mut nodes);
    KdTree {
      nodes,
      root: Some(root),
    }
  }

  fn build(depth: u32, mut points: Vec<Point>, nodes: &mut Vec<Node>) -> u32 {
    if points.len() == 1 {
      nodes.push(Node {
        is_leaf: true,
        split_value: 0.0,
        depth,
        left: None,
        right: None,
        point: Some(points[0]),
      });
      return (nodes.len() - 1) as u32;
    }

    if depth % 2 == 0 {
      points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
    } else {
      points.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
    }

    let median_pos = points.len() / 2 + points.len() % 2;
    let split_value = if depth % 2 == 0 {
      points[median_pos - 1].x
    } else {
      points[median_pos - 1].y
    };

    let second_half = points.split_off(median_pos);
    let left = Self::build(depth + 1, points, nodes);
    let right = Self::build(depth + 1, second_half, nodes);

    nodes.push(Node {
      is_leaf: false,
      split_value,
      depth,
      left: Some(left),
      right: Some(right),
      point: None,
    });
    (nodes.len() - 1) as u32
  }

  pub fn range_search(&self, range: &Range2D) -> Vec<Point> {
    let mut out = Vec::new();
    if let Some(root) = self.root {
      self.search_node(root, full_plane(), range, &mut out);
    }
    out
  }

  pub fn collect_all_points(&self) -> Vec<Point> {
    let mut out = Vec::new();
    if let Some(root) = self.root {
      self.accumulate(root, &mut out);
    }
    out
  }

  fn accumulate(&self, id: u32, out: &mut Vec<Point>) {
    let node = &self.nodes[id as usize];
    if node.is_leaf {
      out.push(node.point.unwrap());
      return;
    }
    self.accumulate(node.left.unwrap(), out);
    self.accumulate(node.right.unwrap(), out);
  }

  fn search_node(&self, id: u32, node_range: Range2D, input_range: &Range2D, out: &mut Vec<Point>) {
    let node = &self.nodes[id as usize];
    if node.is_leaf {
      let p = node.point.unwrap();
      if input_range.contains(&p) {
        out.push(p);
      }
      return;
    }

    let (mut r_left, mut r_right) = (node_range, node_range);
    if node.depth % 2 == 0 {
      r_left.x_max = node.split_value;
      r_right.x_min = node.split_value;
    } else {
      r_left.y_max = node.split_value;
      r_right.y_min = node.split_value;
    }

    let left = node.left.unwrap();
    let right = node.right.unwrap();
    if range_contains_range(input_range, &r_left) {
      self.accumulate(left, out);
    } else if ranges_intersect(input_range, &r_left) {
      self.search_node(left, r_left, input_range, out);
    }

    if range_contains_range(input_range, &r_right) {
      self.accumulate(right, out);
    } else if ranges_intersect(input_range, &r_right) {
      self.search_node(right, r_right, input_range, out);
    }
  }
}

fn full_plane() -> Range2D {
  Range2D {
    x_min: f64::NEG_INFINITY,
    x_max: f64::INFINITY,
    y_min: f64::NEG_INFINITY,
    y_max: f64::INFINITY,
  }
}

/// `true` if `test_range` is fully contained in `range`.
fn range_contains_range(range: &Range2D, test_range: &Range2D) -> bool {
  test_range.x_max <= range.x_max
    && test_range.x_min >= range.x_min
    && test_range.y_max <= range.y_max
    && test_range.y_min >= range.y_min
}

fn ranges_intersect(a: &Range2D, b: &Range2D) -> bool {
  let disjoint = a.x_min > b.x_max || a.x_max < b.x_min || a.y_min > b.y_max || a.y_max < b.y_min;
  !disjoint
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::range::brute_force_range_query;
  use ordered_float::OrderedFloat;

  #[test]
  fn collects_every_point() {
    let points = vec![
      Point::new(0.0, 0.0),
      Point::new(1.0, 1.0),
      Point::new(2.0, 2.0),
      Point::new(-1.0, 3.0),
    ];
    let tree = KdTree::new(&points);
    assert_eq!(tree.collect_all_points().len(), points.len());
  }

  #[test]
  fn matches_brute_force_on_random_sets() {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    let mut rng = SmallRng::seed_from_u64(99);
    let points: Vec<Point> = (0..1000).map(|_| rng.gen::<Point>()).collect();
    let tree = KdTree::new(&points);

    for _ in 0..50 {
      let x0 = rng.gen_range(-1e3..1e3);
      let x1 = rng.gen_range(-1e3..1e3);
      let y0 = rng.gen_range(-1e3..1e3);
      let y1 = rng.gen_range(-1e3..1e3);
      let range = Range2D {
        x_min: x0.min(x1),
        x_max: x0.max(x1),
        y_min: y0.min(y1),
        y_max: y0.max(y1),
      };
      let mut got = tree.range_search(&range);
      let mut want = brute_force_range_query(&points, &range);
      let key = |p: &Point| (OrderedFloat(p.x), OrderedFloat(p.y));
      got.sort_by_key(key);
      want.sort_by_key(key);
      assert_eq!(got.len(), want.len());
    }
  }
}
