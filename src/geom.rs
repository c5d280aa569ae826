//! Geometric primitives: points, axis-aligned boxes, and the ray/segment
//! intersection tests that the bounding and clipping passes are built on.
//!
//! Unlike most screen-oriented code, the `y` axis points up. The sweep moves
//! from large `y` to small `y`.

use arrayvec::ArrayVec;

/// The absolute tolerance used by every box predicate.
pub const EPSILON: f64 = 1e-14;

/// A two-dimensional point, also used as a vector.
#[derive(Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate. Larger values are up.
    pub y: f64,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Are both coordinates finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// The dot product of `self` and `other`, treated as vectors.
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The 2-D cross product (the determinant of the matrix with columns `self`
    /// and `other`).
    pub fn det(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// The Euclidean length of this vector.
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// The Euclidean distance between two points.
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).norm()
    }

    /// This vector rotated a quarter turn counter-clockwise.
    pub fn orthogonal(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// The point halfway between `self` and `other`.
    pub fn midpoint(&self, other: Point) -> Point {
        (*self + other) * 0.5
    }

    /// Converts to a `kurbo` point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Mul<Point> for f64 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        rhs * self
    }
}

impl std::ops::Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// One of the four sides of a [`BoundingBox`].
///
/// The sides are listed in counter-clockwise order, and each one is traversed
/// counter-clockwise: the left side top-to-bottom, the bottom side
/// left-to-right, and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Side {
    /// `x == left`.
    Left,
    /// `y == bottom`.
    Bottom,
    /// `x == right`.
    Right,
    /// `y == top`.
    Top,
}

impl Side {
    /// All sides, in counter-clockwise order.
    pub const ALL: [Side; 4] = [Side::Left, Side::Bottom, Side::Right, Side::Top];

    /// The position of this side in [`Side::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The side at position `idx % 4` in [`Side::ALL`].
    pub fn from_index(idx: usize) -> Side {
        Side::ALL[idx % 4]
    }

    /// The side that follows this one, counter-clockwise.
    pub fn next(self) -> Side {
        Side::from_index(self.index() + 1)
    }
}

/// A point where a ray or segment crosses the boundary of a box.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Intersection {
    /// The side that was crossed.
    pub side: Side,
    /// The crossing point.
    pub point: Point,
}

/// An axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BoundingBox {
    /// Smallest `x`.
    pub left: f64,
    /// Smallest `y`.
    pub bottom: f64,
    /// Largest `x`.
    pub right: f64,
    /// Largest `y`.
    pub top: f64,
}

impl BoundingBox {
    /// Creates a new box.
    ///
    /// `left` must be at most `right`, and `bottom` at most `top`.
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        debug_assert!(left <= right && bottom <= top);
        BoundingBox {
            left,
            bottom,
            right,
            top,
        }
    }

    /// The width of the box.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// The height of the box.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// The center of the box.
    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }

    /// The smallest box containing both `self` and `p`.
    pub fn expanded_to(&self, p: Point) -> BoundingBox {
        BoundingBox {
            left: self.left.min(p.x),
            bottom: self.bottom.min(p.y),
            right: self.right.max(p.x),
            top: self.top.max(p.y),
        }
    }

    /// The corner at which `side` starts, when walking the boundary counter-clockwise.
    pub fn corner(&self, side: Side) -> Point {
        match side {
            Side::Left => Point::new(self.left, self.top),
            Side::Bottom => Point::new(self.left, self.bottom),
            Side::Right => Point::new(self.right, self.bottom),
            Side::Top => Point::new(self.right, self.top),
        }
    }

    /// Is `p` inside this box (boundary included, up to [`EPSILON`])?
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left - EPSILON
            && p.x <= self.right + EPSILON
            && p.y >= self.bottom - EPSILON
            && p.y <= self.top + EPSILON
    }

    /// Finds where the ray starting at `origin` in direction `direction` leaves the box.
    ///
    /// `origin` must be inside the box. Returns `None` only if `direction` is zero.
    pub fn first_intersection(&self, origin: Point, direction: Point) -> Option<Intersection> {
        let mut best: Option<(f64, Side)> = None;
        let mut consider = |t: f64, side: Side| {
            if best.map_or(true, |(best_t, _)| t < best_t) {
                best = Some((t, side));
            }
        };

        if direction.x > 0.0 {
            consider((self.right - origin.x) / direction.x, Side::Right);
        } else if direction.x < 0.0 {
            consider((self.left - origin.x) / direction.x, Side::Left);
        }
        if direction.y > 0.0 {
            consider((self.top - origin.y) / direction.y, Side::Top);
        } else if direction.y < 0.0 {
            consider((self.bottom - origin.y) / direction.y, Side::Bottom);
        }

        best.map(|(t, side)| Intersection {
            side,
            point: origin + direction * t,
        })
    }

    /// Finds the points where the segment from `origin` to `destination` crosses
    /// the boundary of the box.
    ///
    /// There are at most two of them; if there are two, the one closest to
    /// `origin` comes first. Crossings within [`EPSILON`] (in the segment's
    /// parameter) of either endpoint are ignored. A segment passing through a
    /// corner crosses there once if it has an endpoint inside the box, and not
    /// at all if it only touches the corner from outside.
    pub fn segment_intersections(
        &self,
        origin: Point,
        destination: Point,
    ) -> ArrayVec<Intersection, 2> {
        let direction = destination - origin;
        let mut hits = ArrayVec::<(f64, Intersection), 2>::new();
        let mut consider = |t: f64, side: Side| {
            if hits.is_full() || t <= EPSILON || t >= 1.0 - EPSILON {
                return;
            }
            // The two sides of a corner.
            if hits.iter().any(|&(other, _)| (t - other).abs() <= EPSILON) {
                return;
            }
            let point = origin + direction * t;
            let on_side = match side {
                Side::Left | Side::Right => {
                    point.y >= self.bottom - EPSILON && point.y <= self.top + EPSILON
                }
                Side::Bottom | Side::Top => {
                    point.x >= self.left - EPSILON && point.x <= self.right + EPSILON
                }
            };
            if on_side {
                hits.push((t, Intersection { side, point }));
            }
        };

        // A side can only be crossed if one of the endpoints is strictly beyond it.
        if origin.x < self.left - EPSILON || destination.x < self.left - EPSILON {
            consider((self.left - origin.x) / direction.x, Side::Left);
        }
        if origin.x > self.right + EPSILON || destination.x > self.right + EPSILON {
            consider((self.right - origin.x) / direction.x, Side::Right);
        }
        if origin.y < self.bottom - EPSILON || destination.y < self.bottom - EPSILON {
            consider((self.bottom - origin.y) / direction.y, Side::Bottom);
        }
        if origin.y > self.top + EPSILON || destination.y > self.top + EPSILON {
            consider((self.top - origin.y) / direction.y, Side::Top);
        }

        // Touching a corner from outside.
        if hits.len() == 1 && !self.contains(origin) && !self.contains(destination) {
            hits.clear();
        }
        if hits.len() == 2 && hits[0].0 > hits[1].0 {
            hits.swap(0, 1);
        }
        hits.into_iter().map(|(_, hit)| hit).collect()
    }

    /// How far along the boundary `p` is, walking counter-clockwise from the
    /// top-left corner. Each side has length one, so the result is in `[0, 4]`.
    ///
    /// `p` is assumed to lie on `side`.
    pub(crate) fn perimeter_position(&self, side: Side, p: Point) -> f64 {
        let fraction = |num: f64, len: f64| {
            if len > 0.0 {
                (num / len).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };
        let along = match side {
            Side::Left => fraction(self.top - p.y, self.height()),
            Side::Bottom => fraction(p.x - self.left, self.width()),
            Side::Right => fraction(p.y - self.bottom, self.height()),
            Side::Top => fraction(self.right - p.x, self.width()),
        };
        side.index() as f64 + along
    }

    /// How far one has to walk counter-clockwise along the boundary to get from
    /// `from` to `to`, with each side counting as length one.
    pub fn boundary_distance(&self, from: Intersection, to: Intersection) -> f64 {
        let start = self.perimeter_position(from.side, from.point);
        let end = self.perimeter_position(to.side, to.point);
        (end - start).rem_euclid(4.0)
    }

    /// The corners passed when walking counter-clockwise along the boundary
    /// from `from` to `to`, in walking order.
    ///
    /// Each corner is identified by the side that it starts. Corners that
    /// coincide with `from` or `to` are not included. If `from` and `to` are the
    /// same point, no corners are passed.
    pub fn corners_between(&self, from: Intersection, to: Intersection) -> ArrayVec<Side, 4> {
        let start = self.perimeter_position(from.side, from.point);
        let end = start + self.boundary_distance(from, to);

        let mut corners = ArrayVec::new();
        let mut k = start.floor() + 1.0;
        while k < end && !corners.is_full() {
            corners.push(Side::from_index(k as usize));
            k += 1.0;
        }
        corners
    }

    /// Converts to a `kurbo` rectangle.
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(self.left, self.bottom, self.right, self.top)
    }
}

impl From<kurbo::Rect> for BoundingBox {
    fn from(rect: kurbo::Rect) -> Self {
        BoundingBox::new(rect.min_x(), rect.min_y(), rect.max_x(), rect.max_y())
    }
}
