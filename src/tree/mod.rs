//! A generic, arena-backed red-black tree (`spec.md` §3.4/§4.2).
//!
//! This is simultaneously an ordered container (`insert`/`erase`/`find`/iteration) *and*
//! the status structure every sweep-line algorithm in this crate uses, via a
//! [`Comparator`] that may be stateful (§5.3). Per the design note in `spec.md` §9
//! ("Raw-pointer graphs"), nodes live in a flat arena (`Vec<Option<Node<K, V>>>`) and all
//! links are indices (`NodeId`) rather than pointers; `erase` tombstones its slot (sets it
//! to `None`) instead of physically compacting the arena, so outstanding `NodeId`s from
//! before the erase simply become invalid rather than aliasing a reused slot.
//!
//! The sentinel `NIL` of the classic CLRS presentation (`spec.md` §3.4) is represented as
//! `Option::None` rather than a real arena slot: every place the textbook algorithm reads
//! or writes `NIL`'s colour, we substitute the constant `Black`, and every place it reads
//! or writes `NIL.parent` we thread that value through an explicit `x_parent` argument
//! (`delete_fixup`) since there's no sentinel node to store it on.

mod comparator;

pub use comparator::{Comparator, NaturalOrder};

use std::cmp::Ordering;

/// An index into a [`RedBlackTree`]'s node arena. Stable until the node it names is
/// erased; never reused afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
  Red,
  Black,
}

struct Node<K, V> {
  key: K,
  value: V,
  color: Color,
  parent: Option<NodeId>,
  left: Option<NodeId>,
  right: Option<NodeId>,
}

/// A self-balancing ordered container, parametrised by a (possibly stateful) [`Comparator`].
pub struct RedBlackTree<K, V, C = NaturalOrder> {
  arena: Vec<Option<Node<K, V>>>,
  root: Option<NodeId>,
  len: usize,
  comparator: C,
}

impl<K, V> RedBlackTree<K, V, NaturalOrder>
where
  K: Ord,
{
  pub fn new() -> Self {
    RedBlackTree::with_comparator(NaturalOrder)
  }
}

impl<K, V> Default for RedBlackTree<K, V, NaturalOrder>
where
  K: Ord,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V, C> RedBlackTree<K, V, C>
where
  C: Comparator<K>,
{
  pub fn with_comparator(comparator: C) -> Self {
    RedBlackTree {
      arena: Vec::new(),
      root: None,
      len: 0,
      comparator,
    }
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// A reference to the comparator, so callers can update the external state it closes
  /// over (e.g. the current sweep-line `y`) between tree operations.
  pub fn comparator(&self) -> &C {
    &self.comparator
  }

  pub fn comparator_mut(&mut self) -> &mut C {
    &mut self.comparator
  }

  fn node(&self, id: NodeId) -> &Node<K, V> {
    self.arena[id.0 as usize]
      .as_ref()
      .expect("NodeId used after the node it names was erased")
  }

  fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
    self.arena[id.0 as usize]
      .as_mut()
      .expect("NodeId used after the node it names was erased")
  }

  pub fn key(&self, id: NodeId) -> &K {
    &self.node(id).key
  }

  pub fn value(&self, id: NodeId) -> &V {
    &self.node(id).value
  }

  pub fn value_mut(&mut self, id: NodeId) -> &mut V {
    &mut self.node_mut(id).value
  }

  fn color(&self, id: Option<NodeId>) -> Color {
    match id {
      None => Color::Black,
      Some(id) => self.node(id).color,
    }
  }

  fn set_color(&mut self, id: NodeId, color: Color) {
    self.node_mut(id).color = color;
  }

  //////////////////////////////////////////////////////////////////////////
  // Extended navigation (the "traversable" extension sweep algorithms rely on).

  pub fn root(&self) -> Option<NodeId> {
    self.root
  }

  pub fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.node(id).parent
  }

  pub fn left_child(&self, id: NodeId) -> Option<NodeId> {
    self.node(id).left
  }

  pub fn right_child(&self, id: NodeId) -> Option<NodeId> {
    self.node(id).right
  }

  pub fn is_leaf(&self, id: NodeId) -> bool {
    self.node(id).left.is_none() && self.node(id).right.is_none()
  }

  /// The deepest node whose key lies in `[low, high]` and whose subtree contains every
  /// key in that range (`spec.md` §4.2/§4.7, GLOSSARY "Split node").
  pub fn find_split_node(&self, low: &K, high: &K) -> Option<NodeId> {
    let mut v = self.root;
    loop {
      let id = v?;
      let k = &self.node(id).key;
      if self.comparator.compare(k, low) == Ordering::Less {
        v = self.node(id).right;
      } else if self.comparator.compare(k, high) == Ordering::Greater {
        v = self.node(id).left;
      } else {
        return Some(id);
      }
    }
  }

  //////////////////////////////////////////////////////////////////////////
  // Lookup.

  pub fn find(&self, key: &K) -> Option<NodeId> {
    let mut cur = self.root;
    while let Some(id) = cur {
      match self.comparator.compare(key, &self.node(id).key) {
        Ordering::Less => cur = self.node(id).left,
        Ordering::Greater => cur = self.node(id).right,
        Ordering::Equal => return Some(id),
      }
    }
    None
  }

  pub fn contains(&self, key: &K) -> bool {
    self.find(key).is_some()
  }

  /// The first element not strictly less than `key`.
  pub fn lower_bound(&self, key: &K) -> Option<NodeId> {
    let mut cur = self.root;
    let mut candidate = None;
    while let Some(id) = cur {
      if self.comparator.compare(&self.node(id).key, key) != Ordering::Less {
        candidate = Some(id);
        cur = self.node(id).left;
      } else {
        cur = self.node(id).right;
      }
    }
    candidate
  }

  /// The first element strictly greater than `key`.
  pub fn upper_bound(&self, key: &K) -> Option<NodeId> {
    let mut cur = self.root;
    let mut candidate = None;
    while let Some(id) = cur {
      if self.comparator.compare(&self.node(id).key, key) == Ordering::Greater {
        candidate = Some(id);
        cur = self.node(id).left;
      } else {
        cur = self.node(id).right;
      }
    }
    candidate
  }

  pub fn min(&self) -> Option<NodeId> {
    self.root.map(|r| self.minimum(r))
  }

  pub fn max(&self) -> Option<NodeId> {
    self.root.map(|r| self.maximum(r))
  }

  fn minimum(&self, mut x: NodeId) -> NodeId {
    while let Some(l) = self.node(x).left {
      x = l;
    }
    x
  }

  fn maximum(&self, mut x: NodeId) -> NodeId {
    while let Some(r) = self.node(x).right {
      x = r;
    }
    x
  }

  /// In-order successor of `x`.
  pub fn successor(&self, x: NodeId) -> Option<NodeId> {
    if let Some(r) = self.node(x).right {
      return Some(self.minimum(r));
    }
    let mut x = x;
    let mut p = self.node(x).parent;
    while let Some(pp) = p {
      if self.node(pp).left == Some(x) {
        return Some(pp);
      }
      x = pp;
      p = self.node(pp).parent;
    }
    None
  }

  /// In-order predecessor of `x`.
  pub fn predecessor(&self, x: NodeId) -> Option<NodeId> {
    if let Some(l) = self.node(x).left {
      return Some(self.maximum(l));
    }
    let mut x = x;
    let mut p = self.node(x).parent;
    while let Some(pp) = p {
      if self.node(pp).right == Some(x) {
        return Some(pp);
      }
      x = pp;
      p = self.node(pp).parent;
    }
    None
  }

  /// In-order traversal as `(key, value)` pairs.
  pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
    let mut cur = self.root.map(|r| self.minimum(r));
    std::iter::from_fn(move || {
      let id = cur?;
      cur = self.successor(id);
      Some((&self.node(id).key, &self.node(id).value))
    })
  }

  //////////////////////////////////////////////////////////////////////////
  // Structural mutation.

  fn push_node(&mut self, node: Node<K, V>) -> NodeId {
    self.arena.push(Some(node));
    NodeId((self.arena.len() - 1) as u32)
  }

  fn rotate_left(&mut self, x: NodeId) {
    let y = self.node(x).right.expect("rotate_left requires a right child");
    let y_left = self.node(y).left;
    self.node_mut(x).right = y_left;
    if let Some(yl) = y_left {
      self.node_mut(yl).parent = Some(x);
    }
    let x_parent = self.node(x).parent;
    self.node_mut(y).parent = x_parent;
    match x_parent {
      None => self.root = Some(y),
      Some(p) => {
        if self.node(p).left == Some(x) {
          self.node_mut(p).left = Some(y);
        } else {
          self.node_mut(p).right = Some(y);
        }
      }
    }
    self.node_mut(y).left = Some(x);
    self.node_mut(x).parent = Some(y);
  }

  fn rotate_right(&mut self, x: NodeId) {
    let y = self.node(x).left.expect("rotate_right requires a left child");
    let y_right = self.node(y).right;
    self.node_mut(x).left = y_right;
    if let Some(yr) = y_right {
      self.node_mut(yr).parent = Some(x);
    }
    let x_parent = self.node(x).parent;
    self.node_mut(y).parent = x_parent;
    match x_parent {
      None => self.root = Some(y),
      Some(p) => {
        if self.node(p).left == Some(x) {
          self.node_mut(p).left = Some(y);
        } else {
          self.node_mut(p).right = Some(y);
        }
      }
    }
    self.node_mut(y).right = Some(x);
    self.node_mut(x).parent = Some(y);
  }

  /// Inserts `key`/`value`. Returns `None` (a "sentinel-end" result, `spec.md` §4.2) if an
  /// equivalent key is already present; the tree is left unmodified in that case.
  pub fn insert(&mut self, key: K, value: V) -> Option<NodeId> {
    let mut parent = None;
    let mut cur = self.root;
    let mut went_left = false;
    while let Some(id) = cur {
      match self.comparator.compare(&key, &self.node(id).key) {
        Ordering::Less => {
          parent = Some(id);
          cur = self.node(id).left;
          went_left = true;
        }
        Ordering::Greater => {
          parent = Some(id);
          cur = self.node(id).right;
          went_left = false;
        }
        Ordering::Equal => return None,
      }
    }
    let id = self.push_node(Node {
      key,
      value,
      color: Color::Red,
      parent,
      left: None,
      right: None,
    });
    match parent {
      None => self.root = Some(id),
      Some(p) => {
        if went_left {
          self.node_mut(p).left = Some(id);
        } else {
          self.node_mut(p).right = Some(id);
        }
      }
    }
    self.len += 1;
    self.insert_fixup(id);
    Some(id)
  }

  fn insert_fixup(&mut self, mut z: NodeId) {
    loop {
      let zp = match self.node(z).parent {
        Some(p) => p,
        None => break,
      };
      if self.color(Some(zp)) != Color::Red {
        break;
      }
      // A red node always has a parent (itself non-root, since the root is black), and
      // that parent in turn has a parent because it is red too.
      let zpp = self
        .node(zp)
        .parent
        .expect("a red node's parent cannot be the root (root is always black)");
      if Some(zp) == self.node(zpp).left {
        let uncle = self.node(zpp).right;
        if self.color(uncle) == Color::Red {
          self.set_color(zp, Color::Black);
          self.set_color(uncle.unwrap(), Color::Black);
          self.set_color(zpp, Color::Red);
          z = zpp;
        } else {
          if Some(z) == self.node(zp).right {
            z = zp;
            self.rotate_left(z);
          }
          let zp2 = self.node(z).parent.unwrap();
          let zpp2 = self.node(zp2).parent.unwrap();
          self.set_color(zp2, Color::Black);
          self.set_color(zpp2, Color::Red);
          self.rotate_right(zpp2);
        }
      } else {
        let uncle = self.node(zpp).left;
        if self.color(uncle) == Color::Red {
          self.set_color(zp, Color::Black);
          self.set_color(uncle.unwrap(), Color::Black);
          self.set_color(zpp, Color::Red);
          z = zpp;
        } else {
          if Some(z) == self.node(zp).left {
            z = zp;
            self.rotate_right(z);
          }
          let zp2 = self.node(z).parent.unwrap();
          let zpp2 = self.node(zp2).parent.unwrap();
          self.set_color(zp2, Color::Black);
          self.set_color(zpp2, Color::Red);
          self.rotate_left(zpp2);
        }
      }
    }
    self.set_color(self.root.unwrap(), Color::Black);
  }

  fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
    let pu = self.node(u).parent;
    match pu {
      None => self.root = v,
      Some(p) => {
        if self.node(p).left == Some(u) {
          self.node_mut(p).left = v;
        } else {
          self.node_mut(p).right = v;
        }
      }
    }
    if let Some(vv) = v {
      self.node_mut(vv).parent = pu;
    }
  }

  /// Removes the node at `id`, returning its key/value. The five-case double-black
  /// fix-up (`spec.md` §4.2) runs whenever the spliced-out node was black.
  pub fn erase(&mut self, id: NodeId) -> (K, V) {
    let z = id;
    let mut y = z;
    let mut y_original_color = self.color(Some(y));
    let x: Option<NodeId>;
    let x_parent: Option<NodeId>;

    if self.node(z).left.is_none() {
      x = self.node(z).right;
      x_parent = self.node(z).parent;
      self.transplant(z, self.node(z).right);
    } else if self.node(z).right.is_none() {
      x = self.node(z).left;
      x_parent = self.node(z).parent;
      self.transplant(z, self.node(z).left);
    } else {
      y = self.minimum(self.node(z).right.unwrap());
      y_original_color = self.color(Some(y));
      x = self.node(y).right;
      if self.node(y).parent == Some(z) {
        x_parent = Some(y);
      } else {
        x_parent = self.node(y).parent;
        self.transplant(y, self.node(y).right);
        self.node_mut(y).right = self.node(z).right;
        let yr = self.node(y).right.unwrap();
        self.node_mut(yr).parent = Some(y);
      }
      self.transplant(z, Some(y));
      self.node_mut(y).left = self.node(z).left;
      let yl = self.node(y).left.unwrap();
      self.node_mut(yl).parent = Some(y);
      self.set_color(y, self.node(z).color);
    }

    if y_original_color == Color::Black {
      self.delete_fixup(x, x_parent);
    }

    self.len -= 1;
    let removed = self.arena[z.0 as usize].take().expect("erased node must exist");
    (removed.key, removed.value)
  }

  /// Convenience: find then erase by key.
  pub fn erase_key(&mut self, key: &K) -> Option<(K, V)> {
    let id = self.find(key)?;
    Some(self.erase(id))
  }

  fn delete_fixup(&mut self, mut x: Option<NodeId>, mut x_parent: Option<NodeId>) {
    while x != self.root && self.color(x) == Color::Black {
      let xp = match x_parent {
        Some(p) => p,
        None => break,
      };
      if x == self.node(xp).left {
        let mut w = self.node(xp).right;
        if self.color(w) == Color::Red {
          self.set_color(w.unwrap(), Color::Black);
          self.set_color(xp, Color::Red);
          self.rotate_left(xp);
          w = self.node(xp).right;
        }
        let w_id = w.expect("a black non-root node always has a non-NIL sibling");
        if self.color(self.node(w_id).left) == Color::Black
          && self.color(self.node(w_id).right) == Color::Black
        {
          self.set_color(w_id, Color::Red);
          x = Some(xp);
          x_parent = self.node(xp).parent;
        } else {
          if self.color(self.node(w_id).right) == Color::Black {
            if let Some(wl) = self.node(w_id).left {
              self.set_color(wl, Color::Black);
            }
            self.set_color(w_id, Color::Red);
            self.rotate_right(w_id);
            w = self.node(xp).right;
          }
          let w_id2 = w.unwrap();
          self.set_color(w_id2, self.color(Some(xp)));
          self.set_color(xp, Color::Black);
          if let Some(wr) = self.node(w_id2).right {
            self.set_color(wr, Color::Black);
          }
          self.rotate_left(xp);
          x = self.root;
          x_parent = None;
        }
      } else {
        let mut w = self.node(xp).left;
        if self.color(w) == Color::Red {
          self.set_color(w.unwrap(), Color::Black);
          self.set_color(xp, Color::Red);
          self.rotate_right(xp);
          w = self.node(xp).left;
        }
        let w_id = w.expect("a black non-root node always has a non-NIL sibling");
        if self.color(self.node(w_id).right) == Color::Black
          && self.color(self.node(w_id).left) == Color::Black
        {
          self.set_color(w_id, Color::Red);
          x = Some(xp);
          x_parent = self.node(xp).parent;
        } else {
          if self.color(self.node(w_id).left) == Color::Black {
            if let Some(wr) = self.node(w_id).right {
              self.set_color(wr, Color::Black);
            }
            self.set_color(w_id, Color::Red);
            self.rotate_left(w_id);
            w = self.node(xp).left;
          }
          let w_id2 = w.unwrap();
          self.set_color(w_id2, self.color(Some(xp)));
          self.set_color(xp, Color::Black);
          if let Some(wl) = self.node(w_id2).left {
            self.set_color(wl, Color::Black);
          }
          self.rotate_right(xp);
          x = self.root;
          x_parent = None;
        }
      }
    }
    if let Some(xx) = x {
      self.set_color(xx, Color::Black);
    }
  }

  //////////////////////////////////////////////////////////////////////////
  // Validation (`spec.md` §4.2 "Testable property" / §8).

  /// Recursively checks all four red-black invariants plus strict in-order ordering.
  /// Intended for tests and debug assertions, mirroring `Dcel::validate`'s role.
  pub fn validate(&self) -> crate::Result<()>
  where
    K: std::fmt::Debug,
  {
    if let Some(root) = self.root {
      if self.color(Some(root)) != Color::Black {
        return Err(crate::Error::Invariant {
          entity: "root".to_string(),
          expected: "black".to_string(),
          actual: "red".to_string(),
        });
      }
    }
    let mut prev: Option<&K> = None;
    self.validate_node(self.root, &mut prev)?;
    Ok(())
  }

  fn validate_node<'a>(&'a self, id: Option<NodeId>, prev: &mut Option<&'a K>) -> crate::Result<usize>
  where
    K: std::fmt::Debug,
  {
    let Some(id) = id else { return Ok(1) }; // NIL counts as black, height 1.
    let node = self.node(id);
    if node.color == Color::Red {
      for child in [node.left, node.right] {
        if self.color(child) == Color::Red {
          return Err(crate::Error::Invariant {
            entity: format!("{:?}", node.key),
            expected: "a red node has two black children".to_string(),
            actual: "at least one child is red".to_string(),
          });
        }
      }
    }
    let left_height = self.validate_node(node.left, prev)?;
    if let Some(p) = prev {
      if self.comparator.compare(p, &node.key) != Ordering::Less {
        return Err(crate::Error::Invariant {
          entity: format!("{:?}", node.key),
          expected: "strictly greater than the previous in-order key".to_string(),
          actual: format!("not strictly greater than {p:?}"),
        });
      }
    }
    *prev = Some(&node.key);
    let right_height = self.validate_node(node.right, prev)?;
    if left_height != right_height {
      return Err(crate::Error::Invariant {
        entity: format!("{:?}", node.key),
        expected: format!("equal left/right black-height, left={left_height}"),
        actual: format!("right={right_height}"),
      });
    }
    Ok(left_height + if node.color == Color::Black { 1 } else { 0 })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn insert_find_erase_roundtrip() {
    let mut t: RedBlackTree<i32, &'static str> = RedBlackTree::new();
    for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
      assert!(t.insert(k, "v").is_some());
      t.validate().unwrap();
    }
    assert_eq!(t.len(), 9);
    assert!(t.contains(&4));
    assert!(t.insert(4, "dup").is_none());

    let id = t.find(&4).unwrap();
    t.erase(id);
    t.validate().unwrap();
    assert!(!t.contains(&4));
    assert_eq!(t.len(), 8);
  }

  #[test]
  fn bounds() {
    let mut t: RedBlackTree<i32, ()> = RedBlackTree::new();
    for k in [10, 20, 30, 40] {
      t.insert(k, ());
    }
    assert_eq!(*t.key(t.lower_bound(&25).unwrap()), 30);
    assert_eq!(*t.key(t.lower_bound(&20).unwrap()), 20);
    assert_eq!(*t.key(t.upper_bound(&20).unwrap()), 30);
    assert!(t.upper_bound(&40).is_none());
  }

  #[test]
  fn in_order_iteration_sorted() {
    let mut t: RedBlackTree<i32, ()> = RedBlackTree::new();
    let mut xs = vec![17, 3, 44, -2, 9, 0, 100, 5];
    for &x in &xs {
      t.insert(x, ());
    }
    xs.sort();
    let got: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
    assert_eq!(got, xs);
  }

  #[test]
  fn stress_insert_erase_preserves_invariants() {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    let mut rng = SmallRng::seed_from_u64(42);
    let mut t: RedBlackTree<i32, i32> = RedBlackTree::new();
    let mut present = std::collections::BTreeSet::new();
    for _ in 0..2000 {
      let k = rng.gen_range(0..500);
      if present.contains(&k) {
        t.erase_key(&k);
        present.remove(&k);
      } else {
        t.insert(k, k);
        present.insert(k);
      }
      t.validate().unwrap();
    }
    assert_eq!(t.len(), present.len());
    let got: Vec<i32> = t.iter().map(|(k, _)| *k).collect();
    let want: Vec<i32> = present.into_iter().collect();
    assert_eq!(got, want);
  }

  #[test]
  fn find_split_node_matches_definition() {
    let mut t: RedBlackTree<i32, ()> = RedBlackTree::new();
    for k in 0..16 {
      t.insert(k, ());
    }
    let split = t.find_split_node(&4, &11).unwrap();
    let k = *t.key(split);
    assert!((4..=11).contains(&k));
  }
}
