//! The beachline: the sequence of parabolic arcs lying directly above the sweep.
//!
//! Arcs are stored in an arena and kept in a red-black tree ordered from left
//! to right, so that the arc above a new site can be found in logarithmic
//! time. The tree nodes are additionally threaded into a doubly-linked list
//! (`prev`/`next`), which is what the sweep mostly walks.
//!
//! The order of the arcs depends on the position of the sweep, so nothing in
//! here stores a key: searching takes the sweep coordinate explicitly.

use crate::diagram::{HalfEdgeIdx, SiteIdx};
use crate::geom::Point;
use crate::queue::EventIdx;

typed_vec!(
    /// A handle to an arc of the beachline.
    ArcIdx,
    /// Arena storage for arcs.
    ArcVec,
    "arc"
);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

/// An arc of the beachline.
#[derive(Clone, Debug)]
pub(crate) struct Arc {
    parent: Option<ArcIdx>,
    left: Option<ArcIdx>,
    right: Option<ArcIdx>,
    color: Color,
    /// The arc immediately to the left.
    pub prev: Option<ArcIdx>,
    /// The arc immediately to the right.
    pub next: Option<ArcIdx>,
    /// The site whose parabola this arc is part of.
    pub site: SiteIdx,
    /// The position of `site`.
    pub point: Point,
    /// The half-edge, in `site`'s face, traced by the left endpoint of this arc.
    pub left_half_edge: Option<HalfEdgeIdx>,
    /// The half-edge, in `site`'s face, traced by the right endpoint of this arc.
    pub right_half_edge: Option<HalfEdgeIdx>,
    /// The pending circle event that would remove this arc.
    pub event: Option<EventIdx>,
}

/// Where two neighboring parabolas intersect, when the sweep is at `sweep_y`.
///
/// `left` and `right` are the foci of the parabolas on the left and the right
/// of the breakpoint. A focus lying on the sweep line has a degenerate
/// (vertical) parabola, and the breakpoint is at its `x` coordinate.
pub(crate) fn breakpoint(left: Point, right: Point, sweep_y: f64) -> f64 {
    if left.y == right.y {
        return (left.x + right.x) / 2.0;
    }
    if left.y == sweep_y {
        return left.x;
    }
    if right.y == sweep_y {
        return right.x;
    }

    let d1 = 1.0 / (2.0 * (left.y - sweep_y));
    let d2 = 1.0 / (2.0 * (right.y - sweep_y));
    let a = d1 - d2;
    let b = 2.0 * (right.x * d2 - left.x * d1);
    let c = (left.y * left.y + left.x * left.x - sweep_y * sweep_y) * d1
        - (right.y * right.y + right.x * right.x - sweep_y * sweep_y) * d2;
    let delta = (b * b - 4.0 * a * c).max(0.0);
    (-b + delta.sqrt()) / (2.0 * a)
}

/// The beachline, as a balanced search tree over an arena of arcs.
#[derive(Clone, Debug, Default)]
pub(crate) struct Beachline {
    arcs: ArcVec<Arc>,
    free: Vec<ArcIdx>,
    root: Option<ArcIdx>,
}

impl std::ops::Index<ArcIdx> for Beachline {
    type Output = Arc;

    fn index(&self, idx: ArcIdx) -> &Arc {
        &self.arcs[idx]
    }
}

impl std::ops::IndexMut<ArcIdx> for Beachline {
    fn index_mut(&mut self, idx: ArcIdx) -> &mut Arc {
        &mut self.arcs[idx]
    }
}

impl Beachline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Allocates a new arc that is not yet part of the tree.
    pub fn create_arc(&mut self, site: SiteIdx, point: Point) -> ArcIdx {
        let arc = Arc {
            parent: None,
            left: None,
            right: None,
            color: Color::Red,
            prev: None,
            next: None,
            site,
            point,
            left_half_edge: None,
            right_half_edge: None,
            event: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.arcs[idx] = arc;
                idx
            }
            None => self.arcs.push(arc),
        }
    }

    /// Makes `arc` the only arc of an empty beachline.
    pub fn set_root(&mut self, arc: ArcIdx) {
        debug_assert!(self.root.is_none());
        self.root = Some(arc);
        self.arcs[arc].color = Color::Black;
    }

    pub fn leftmost_arc(&self) -> Option<ArcIdx> {
        self.root.map(|root| self.minimum(root))
    }

    /// Iterates over the arcs from left to right.
    pub fn iter(&self) -> impl Iterator<Item = ArcIdx> + '_ {
        std::iter::successors(self.leftmost_arc(), |&arc| self.arcs[arc].next)
    }

    /// The number of arcs on the beachline.
    pub fn len(&self) -> usize {
        self.arcs.len() - self.free.len()
    }

    /// Finds the arc lying directly above `point`, when the sweep is at `sweep_y`.
    pub fn locate_arc_above(&self, point: Point, sweep_y: f64) -> Option<ArcIdx> {
        let mut node = self.root?;
        loop {
            let arc = &self.arcs[node];
            let left_of_arc = arc.prev.is_some_and(|prev| {
                point.x < breakpoint(self.arcs[prev].point, arc.point, sweep_y)
            });
            let right_of_arc = !left_of_arc
                && arc.next.is_some_and(|next| {
                    point.x > breakpoint(arc.point, self.arcs[next].point, sweep_y)
                });

            let child = if left_of_arc {
                arc.left
            } else if right_of_arc {
                arc.right
            } else {
                return Some(node);
            };
            // A missing child means that rounding put us in between two arcs.
            // The current one is as good an answer as any.
            match child {
                Some(child) => node = child,
                None => return Some(node),
            }
        }
    }

    /// Inserts the unattached arc `new` immediately to the left of `arc`.
    pub fn insert_before(&mut self, arc: ArcIdx, new: ArcIdx) {
        match self.arcs[arc].left {
            None => {
                self.arcs[arc].left = Some(new);
                self.arcs[new].parent = Some(arc);
            }
            Some(_) => {
                // The predecessor is the rightmost node of the left subtree,
                // so it has no right child.
                let Some(prev) = self.arcs[arc].prev else {
                    unreachable!("an arc with a left subtree has a predecessor");
                };
                self.arcs[prev].right = Some(new);
                self.arcs[new].parent = Some(prev);
            }
        }

        let prev = self.arcs[arc].prev;
        self.arcs[new].prev = prev;
        if let Some(prev) = prev {
            self.arcs[prev].next = Some(new);
        }
        self.arcs[new].next = Some(arc);
        self.arcs[arc].prev = Some(new);

        self.insert_fixup(new);
    }

    /// Inserts the unattached arc `new` immediately to the right of `arc`.
    pub fn insert_after(&mut self, arc: ArcIdx, new: ArcIdx) {
        match self.arcs[arc].right {
            None => {
                self.arcs[arc].right = Some(new);
                self.arcs[new].parent = Some(arc);
            }
            Some(_) => {
                let Some(next) = self.arcs[arc].next else {
                    unreachable!("an arc with a right subtree has a successor");
                };
                self.arcs[next].left = Some(new);
                self.arcs[new].parent = Some(next);
            }
        }

        let next = self.arcs[arc].next;
        self.arcs[new].next = next;
        if let Some(next) = next {
            self.arcs[next].prev = Some(new);
        }
        self.arcs[new].prev = Some(arc);
        self.arcs[arc].next = Some(new);

        self.insert_fixup(new);
    }

    /// Puts the unattached arc `new` in the place of `old`, and frees `old`.
    pub fn replace(&mut self, old: ArcIdx, new: ArcIdx) {
        let Arc {
            parent,
            left,
            right,
            color,
            prev,
            next,
            ..
        } = self.arcs[old].clone();

        self.transplant(old, Some(new));
        self.arcs[new].left = left;
        self.arcs[new].right = right;
        self.arcs[new].color = color;
        self.arcs[new].parent = parent;
        if let Some(left) = left {
            self.arcs[left].parent = Some(new);
        }
        if let Some(right) = right {
            self.arcs[right].parent = Some(new);
        }

        self.arcs[new].prev = prev;
        self.arcs[new].next = next;
        if let Some(prev) = prev {
            self.arcs[prev].next = Some(new);
        }
        if let Some(next) = next {
            self.arcs[next].prev = Some(new);
        }

        self.free.push(old);
    }

    /// Removes `z` from the beachline and frees it.
    pub fn remove(&mut self, z: ArcIdx) {
        let Arc {
            left: z_left,
            right: z_right,
            parent: z_parent,
            color: z_color,
            prev: z_prev,
            next: z_next,
            ..
        } = self.arcs[z].clone();

        let removed_color;
        let x;
        let x_parent;
        match (z_left, z_right) {
            (None, _) => {
                removed_color = z_color;
                x = z_right;
                x_parent = z_parent;
                self.transplant(z, z_right);
            }
            (Some(_), None) => {
                removed_color = z_color;
                x = z_left;
                x_parent = z_parent;
                self.transplant(z, z_left);
            }
            (Some(z_left), Some(z_right)) => {
                let y = self.minimum(z_right);
                removed_color = self.arcs[y].color;
                x = self.arcs[y].right;
                if self.arcs[y].parent == Some(z) {
                    x_parent = Some(y);
                } else {
                    x_parent = self.arcs[y].parent;
                    self.transplant(y, x);
                    self.arcs[y].right = Some(z_right);
                    self.arcs[z_right].parent = Some(y);
                }
                self.transplant(z, Some(y));
                self.arcs[y].left = Some(z_left);
                self.arcs[z_left].parent = Some(y);
                self.arcs[y].color = z_color;
            }
        }

        if removed_color == Color::Black {
            self.remove_fixup(x, x_parent);
        }

        if let Some(prev) = z_prev {
            self.arcs[prev].next = z_next;
        }
        if let Some(next) = z_next {
            self.arcs[next].prev = z_prev;
        }
        self.arcs[z].parent = None;
        self.arcs[z].left = None;
        self.arcs[z].right = None;
        self.arcs[z].prev = None;
        self.arcs[z].next = None;
        self.free.push(z);
    }

    fn minimum(&self, mut node: ArcIdx) -> ArcIdx {
        while let Some(left) = self.arcs[node].left {
            node = left;
        }
        node
    }

    fn is_red(&self, node: Option<ArcIdx>) -> bool {
        node.is_some_and(|n| self.arcs[n].color == Color::Red)
    }

    fn is_black(&self, node: Option<ArcIdx>) -> bool {
        !self.is_red(node)
    }

    fn set_color(&mut self, node: Option<ArcIdx>, color: Color) {
        if let Some(node) = node {
            self.arcs[node].color = color;
        }
    }

    /// Replaces the subtree rooted at `u` by the one rooted at `v`, as far as
    /// `u`'s parent is concerned.
    fn transplant(&mut self, u: ArcIdx, v: Option<ArcIdx>) {
        let parent = self.arcs[u].parent;
        match parent {
            None => self.root = v,
            Some(p) if self.arcs[p].left == Some(u) => self.arcs[p].left = v,
            Some(p) => self.arcs[p].right = v,
        }
        if let Some(v) = v {
            self.arcs[v].parent = parent;
        }
    }

    fn rotate_left(&mut self, x: ArcIdx) {
        let Some(y) = self.arcs[x].right else {
            return;
        };
        let y_left = self.arcs[y].left;
        self.arcs[x].right = y_left;
        if let Some(y_left) = y_left {
            self.arcs[y_left].parent = Some(x);
        }
        self.transplant(x, Some(y));
        self.arcs[y].left = Some(x);
        self.arcs[x].parent = Some(y);
    }

    fn rotate_right(&mut self, x: ArcIdx) {
        let Some(y) = self.arcs[x].left else {
            return;
        };
        let y_right = self.arcs[y].right;
        self.arcs[x].left = y_right;
        if let Some(y_right) = y_right {
            self.arcs[y_right].parent = Some(x);
        }
        self.transplant(x, Some(y));
        self.arcs[y].right = Some(x);
        self.arcs[x].parent = Some(y);
    }

    fn insert_fixup(&mut self, mut z: ArcIdx) {
        self.arcs[z].color = Color::Red;
        while let Some(parent) = self.arcs[z].parent.filter(|&p| self.is_red(Some(p))) {
            // The parent is red, so it isn't the root.
            let Some(grandparent) = self.arcs[parent].parent else {
                break;
            };
            if self.arcs[grandparent].left == Some(parent) {
                let uncle = self.arcs[grandparent].right;
                if self.is_red(uncle) {
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    z = grandparent;
                } else {
                    if self.arcs[parent].right == Some(z) {
                        z = parent;
                        self.rotate_left(z);
                    }
                    if let Some(p) = self.arcs[z].parent {
                        self.arcs[p].color = Color::Black;
                        if let Some(g) = self.arcs[p].parent {
                            self.arcs[g].color = Color::Red;
                            self.rotate_right(g);
                        }
                    }
                }
            } else {
                let uncle = self.arcs[grandparent].left;
                if self.is_red(uncle) {
                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    z = grandparent;
                } else {
                    if self.arcs[parent].left == Some(z) {
                        z = parent;
                        self.rotate_right(z);
                    }
                    if let Some(p) = self.arcs[z].parent {
                        self.arcs[p].color = Color::Black;
                        if let Some(g) = self.arcs[p].parent {
                            self.arcs[g].color = Color::Red;
                            self.rotate_left(g);
                        }
                    }
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    /// Restores the red-black properties after removing a black node.
    ///
    /// `x` is the node that took the removed node's place (possibly an empty
    /// leaf) and `parent` is its parent, which we need to track separately
    /// because empty leaves don't have a parent pointer.
    fn remove_fixup(&mut self, mut x: Option<ArcIdx>, mut parent: Option<ArcIdx>) {
        while x != self.root && self.is_black(x) {
            let Some(p) = parent else {
                break;
            };
            if self.arcs[p].left == x {
                let Some(mut w) = self.arcs[p].right else {
                    break;
                };
                if self.is_red(Some(w)) {
                    self.arcs[w].color = Color::Black;
                    self.arcs[p].color = Color::Red;
                    self.rotate_left(p);
                    let Some(new_w) = self.arcs[p].right else {
                        break;
                    };
                    w = new_w;
                }
                if self.is_black(self.arcs[w].left) && self.is_black(self.arcs[w].right) {
                    self.arcs[w].color = Color::Red;
                    x = Some(p);
                    parent = self.arcs[p].parent;
                } else {
                    if self.is_black(self.arcs[w].right) {
                        self.set_color(self.arcs[w].left, Color::Black);
                        self.arcs[w].color = Color::Red;
                        self.rotate_right(w);
                        let Some(new_w) = self.arcs[p].right else {
                            break;
                        };
                        w = new_w;
                    }
                    self.arcs[w].color = self.arcs[p].color;
                    self.arcs[p].color = Color::Black;
                    self.set_color(self.arcs[w].right, Color::Black);
                    self.rotate_left(p);
                    x = self.root;
                    parent = None;
                }
            } else {
                let Some(mut w) = self.arcs[p].left else {
                    break;
                };
                if self.is_red(Some(w)) {
                    self.arcs[w].color = Color::Black;
                    self.arcs[p].color = Color::Red;
                    self.rotate_right(p);
                    let Some(new_w) = self.arcs[p].left else {
                        break;
                    };
                    w = new_w;
                }
                if self.is_black(self.arcs[w].left) && self.is_black(self.arcs[w].right) {
                    self.arcs[w].color = Color::Red;
                    x = Some(p);
                    parent = self.arcs[p].parent;
                } else {
                    if self.is_black(self.arcs[w].left) {
                        self.set_color(self.arcs[w].right, Color::Black);
                        self.arcs[w].color = Color::Red;
                        self.rotate_left(w);
                        let Some(new_w) = self.arcs[p].left else {
                            break;
                        };
                        w = new_w;
                    }
                    self.arcs[w].color = self.arcs[p].color;
                    self.arcs[p].color = Color::Black;
                    self.set_color(self.arcs[w].left, Color::Black);
                    self.rotate_right(p);
                    x = self.root;
                    parent = None;
                }
            }
        }
        self.set_color(x, Color::Black);
    }

    /// Panics if the tree is not a valid red-black tree, or if the linked list
    /// disagrees with the in-order traversal of the tree.
    pub fn check_invariants(&self) {
        let Some(root) = self.root else {
            return;
        };
        assert_eq!(self.arcs[root].parent, None);
        assert_eq!(self.arcs[root].color, Color::Black);

        let mut in_order = Vec::new();
        self.check_subtree(Some(root), &mut in_order);
        let listed: Vec<_> = self.iter().collect();
        assert_eq!(in_order, listed);
        assert_eq!(listed.len(), self.len());

        for pair in listed.windows(2) {
            assert_eq!(self.arcs[pair[1]].prev, Some(pair[0]));
        }
        assert_eq!(self.arcs[listed[0]].prev, None);
    }

    /// Returns the black height of the subtree.
    fn check_subtree(&self, node: Option<ArcIdx>, in_order: &mut Vec<ArcIdx>) -> usize {
        let Some(node) = node else {
            return 1;
        };
        let arc = &self.arcs[node];
        for child in [arc.left, arc.right].into_iter().flatten() {
            assert_eq!(self.arcs[child].parent, Some(node));
            if arc.color == Color::Red {
                assert_eq!(self.arcs[child].color, Color::Black, "red {node:?} has a red child");
            }
        }
        let left_height = self.check_subtree(arc.left, in_order);
        in_order.push(node);
        let right_height = self.check_subtree(arc.right, in_order);
        assert_eq!(left_height, right_height, "unbalanced at {node:?}");
        left_height + usize::from(arc.color == Color::Black)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arc(line: &mut Beachline, site: usize) -> ArcIdx {
        line.create_arc(SiteIdx(site), Point::new(site as f64, 0.0))
    }

    fn sites(line: &Beachline) -> Vec<usize> {
        line.iter().map(|a| line[a].site.index()).collect()
    }

    #[test]
    fn breakpoint_between_equal_heights() {
        let x = breakpoint(Point::new(0.0, 1.0), Point::new(1.0, 1.0), 0.0);
        assert_eq!(x, 0.5);
    }

    #[test]
    fn breakpoint_of_degenerate_arc() {
        let x = breakpoint(Point::new(0.0, 1.0), Point::new(0.3, 0.0), 0.0);
        assert_eq!(x, 0.3);
        let x = breakpoint(Point::new(0.3, 0.0), Point::new(0.0, 1.0), 0.0);
        assert_eq!(x, 0.3);
    }

    #[test]
    fn breakpoint_is_equidistant() {
        let left = Point::new(0.0, 1.0);
        let right = Point::new(1.0, 0.5);
        let sweep = 0.0;
        let x = breakpoint(left, right, sweep);
        // The point on the left parabola above x.
        let y = ((x - left.x).powi(2) + left.y * left.y - sweep * sweep) / (2.0 * (left.y - sweep));
        let p = Point::new(x, y);
        assert!((p.distance(left) - p.distance(right)).abs() < 1e-12);
        assert!((p.distance(left) - (y - sweep)).abs() < 1e-12);
        // The higher site's parabola is wider, so its arc is the outer one.
        assert!(x < right.x);
    }

    #[test]
    fn insertions_keep_order() {
        let mut line = Beachline::new();
        let a = arc(&mut line, 0);
        line.set_root(a);
        let mut last = a;
        for i in 1..20 {
            let new = arc(&mut line, i);
            line.insert_after(last, new);
            last = new;
            line.check_invariants();
        }
        let first = line.leftmost_arc().unwrap();
        let b = arc(&mut line, 100);
        line.insert_before(first, b);
        line.check_invariants();
        assert_eq!(sites(&line)[..3], [100, 0, 1]);
        assert_eq!(line.len(), 21);
    }

    #[test]
    fn replace_and_remove() {
        let mut line = Beachline::new();
        let a = arc(&mut line, 0);
        line.set_root(a);
        let b = arc(&mut line, 1);
        line.insert_after(a, b);
        let c = arc(&mut line, 2);
        line.insert_after(b, c);

        let d = arc(&mut line, 3);
        line.replace(b, d);
        line.check_invariants();
        assert_eq!(sites(&line), vec![0, 3, 2]);

        line.remove(d);
        line.check_invariants();
        assert_eq!(sites(&line), vec![0, 2]);
        assert_eq!(line[a].next, Some(c));
        assert_eq!(line[c].prev, Some(a));

        line.remove(a);
        line.remove(c);
        assert!(line.is_empty());
        assert_eq!(line.len(), 0);
    }

    #[test]
    fn locate_above() {
        let mut line = Beachline::new();
        let high = line.create_arc(SiteIdx(0), Point::new(0.5, 1.0));
        line.set_root(high);
        let low = line.create_arc(SiteIdx(1), Point::new(0.5, 0.5));
        let right = line.create_arc(SiteIdx(0), Point::new(0.5, 1.0));
        line.replace(high, low);
        let left = line.create_arc(SiteIdx(0), Point::new(0.5, 1.0));
        line.insert_before(low, left);
        line.insert_after(low, right);
        line.check_invariants();

        let sweep = 0.4;
        assert_eq!(line.locate_arc_above(Point::new(0.5, sweep), sweep), Some(low));
        assert_eq!(line.locate_arc_above(Point::new(-2.0, sweep), sweep), Some(left));
        assert_eq!(line.locate_arc_above(Point::new(3.0, sweep), sweep), Some(right));
    }

    proptest! {
    #[test]
    fn random_edits(ops in prop::collection::vec((any::<bool>(), any::<prop::sample::Index>()), 1..200)) {
        let mut line = Beachline::new();
        let root = arc(&mut line, 0);
        line.set_root(root);
        let mut reference = vec![0usize];
        let mut next_site = 1;

        for (insert, idx) in ops {
            let arcs: Vec<_> = line.iter().collect();
            let i = idx.index(arcs.len());
            if insert || arcs.len() == 1 {
                let new = arc(&mut line, next_site);
                if next_site % 2 == 0 {
                    line.insert_before(arcs[i], new);
                    reference.insert(i, next_site);
                } else {
                    line.insert_after(arcs[i], new);
                    reference.insert(i + 1, next_site);
                }
                next_site += 1;
            } else {
                line.remove(arcs[i]);
                reference.remove(i);
            }
            line.check_invariants();
            prop_assert_eq!(sites(&line), reference.clone());
        }
    }
    }
}
