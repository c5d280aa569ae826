//! Fortune's sweep-line algorithm.
//!
//! The sweep moves from the top (large `y`) to the bottom. The beachline above
//! it is a sequence of parabolic arcs, one or more per site already passed;
//! the breakpoints between neighboring arcs trace out the edges of the
//! diagram. Site events split an arc, and circle events remove one, creating
//! a vertex.
//!
//! Once the queue is empty, the edges still being traced by the beachline are
//! rays, and [`FortuneAlgorithm::bound`] closes them off against a box.

use std::collections::BTreeMap;

use crate::beachline::{ArcIdx, Beachline};
use crate::diagram::{BoxCrossing, Diagram, FaceIdx, HalfEdgeIdx, SiteIdx, VertexIdx};
use crate::event::{Event, EventKind};
use crate::geom::{BoundingBox, Point};
use crate::log::{debug, trace, warn};
use crate::queue::EventQueue;
use crate::Error;

/// Counts of what happened during a sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SweepStats {
    /// The number of site events processed.
    pub site_events: usize,
    /// The number of circle events registered.
    pub circle_events: usize,
    /// The number of registered circle events that were cancelled before firing.
    pub cancelled_events: usize,
}

/// The upper end of an edge between two sites on the top row.
///
/// When several sites share the largest `y`, the edges between them extend
/// upwards forever. Nothing in the beachline remembers those ends, so we keep
/// them here until [`FortuneAlgorithm::bound`] closes them.
#[derive(Clone, Copy, Debug)]
struct UpperRay {
    left: ArcSide,
    right: ArcSide,
}

#[derive(Clone, Copy, Debug)]
struct ArcSide {
    site: SiteIdx,
    half_edge: HalfEdgeIdx,
}

/// Computes a Voronoi diagram with Fortune's algorithm.
///
/// Call [`construct`](Self::construct), then [`bound`](Self::bound), and then
/// look at the [`diagram`](Self::diagram) (or clip it further with
/// [`Diagram::intersect`]).
#[derive(Clone, Debug)]
pub struct FortuneAlgorithm {
    diagram: Diagram,
    beachline: Beachline,
    events: EventQueue<Event>,
    beachline_y: f64,
    upper_rays: Vec<UpperRay>,
    stats: SweepStats,
}

impl FortuneAlgorithm {
    /// Prepares to compute the Voronoi diagram of some points.
    ///
    /// Returns an error if any coordinate isn't finite, or if two points coincide.
    pub fn new(points: &[Point]) -> Result<Self, Error> {
        for p in points {
            if p.x.is_nan() || p.y.is_nan() {
                return Err(Error::NaN);
            }
            if !p.is_finite() {
                return Err(Error::Infinity);
            }
        }

        let mut sorted: Vec<_> = (0..points.len()).collect();
        sorted.sort_by(|&i, &j| {
            points[i]
                .x
                .total_cmp(&points[j].x)
                .then(points[i].y.total_cmp(&points[j].y))
                .then(i.cmp(&j))
        });
        for pair in sorted.windows(2) {
            if points[pair[0]] == points[pair[1]] {
                return Err(Error::DuplicateSite {
                    first: SiteIdx(pair[0]),
                    second: SiteIdx(pair[1]),
                });
            }
        }

        Ok(FortuneAlgorithm {
            diagram: Diagram::new(points),
            beachline: Beachline::new(),
            events: EventQueue::new(),
            beachline_y: f64::INFINITY,
            upper_rays: Vec::new(),
            stats: SweepStats::default(),
        })
    }

    /// The diagram computed so far.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Consumes the algorithm, returning the diagram.
    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    /// What happened during the sweep.
    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    /// Runs the sweep.
    ///
    /// Afterwards, the diagram contains every vertex that is equidistant from
    /// three sites, but the faces along the outside are still unbounded.
    pub fn construct(&mut self) {
        for (idx, site) in self.diagram.sites.iter() {
            self.events.push(Event::site(idx, site.point));
        }
        debug!(sites = self.diagram.sites.len(), "starting sweep");

        while let Some(event) = self.events.pop() {
            self.beachline_y = event.y;
            trace!(?event, "processing event");
            match event.kind {
                EventKind::Site(site) => self.handle_site_event(site),
                EventKind::Circle { point, arc } => self.handle_circle_event(point, arc),
            }

            #[cfg(feature = "slow-asserts")]
            self.beachline.check_invariants();
        }

        debug!(
            vertices = self.diagram.vertices.len(),
            arcs = self.beachline.len(),
            stats = ?self.stats,
            "finished sweep"
        );
    }

    fn handle_site_event(&mut self, site: SiteIdx) {
        self.stats.site_events += 1;
        let point = self.diagram.sites[site].point;

        if self.beachline.is_empty() {
            let arc = self.beachline.create_arc(site, point);
            self.beachline.set_root(arc);
            return;
        }

        let Some(arc_to_break) = self.beachline.locate_arc_above(point, self.beachline_y) else {
            return;
        };
        self.cancel_event(arc_to_break);

        if self.beachline[arc_to_break].point.y == point.y {
            self.insert_on_top_row(arc_to_break, site, point);
            return;
        }

        let (left, middle, right) = self.break_arc(arc_to_break, site, point);
        self.add_edge(left, middle);
        // Both ends of the new arc trace out the same edge, in opposite directions.
        self.beachline[middle].right_half_edge = self.beachline[middle].left_half_edge;
        self.beachline[right].left_half_edge = self.beachline[left].right_half_edge;

        if let Some(prev) = self.beachline[left].prev {
            self.add_event(prev, left, middle);
        }
        if let Some(next) = self.beachline[right].next {
            self.add_event(middle, right, next);
        }
    }

    /// Handles a site at the same height as the arc above it.
    ///
    /// This only happens while processing the first sites, if several of them
    /// share the largest `y`. The arc above is a vertical ray, so there is
    /// nothing to split: the new arc goes next to it.
    fn insert_on_top_row(&mut self, arc: ArcIdx, site: SiteIdx, point: Point) {
        let new = self.beachline.create_arc(site, point);
        let (left, right) = if point.x < self.beachline[arc].point.x {
            self.beachline.insert_before(arc, new);
            (new, arc)
        } else {
            self.beachline.insert_after(arc, new);
            (arc, new)
        };
        self.add_edge(left, right);

        if let (Some(left_he), Some(right_he)) = (
            self.beachline[left].right_half_edge,
            self.beachline[right].left_half_edge,
        ) {
            self.upper_rays.push(UpperRay {
                left: ArcSide {
                    site: self.beachline[left].site,
                    half_edge: left_he,
                },
                right: ArcSide {
                    site: self.beachline[right].site,
                    half_edge: right_he,
                },
            });
        }

        if let Some(prev) = self.beachline[left].prev {
            self.add_event(prev, left, right);
        }
        if let Some(next) = self.beachline[right].next {
            self.add_event(left, right, next);
        }
    }

    fn handle_circle_event(&mut self, point: Point, arc: ArcIdx) {
        // This event was just popped, so don't try to cancel it.
        self.beachline[arc].event = None;

        let (Some(left), Some(right)) = (self.beachline[arc].prev, self.beachline[arc].next)
        else {
            warn!(?arc, "circle event for an arc without two neighbors");
            return;
        };

        let vertex = self.diagram.create_vertex(point);
        self.cancel_event(left);
        self.cancel_event(right);
        self.remove_arc(arc, vertex);

        if let Some(prev) = self.beachline[left].prev {
            self.add_event(prev, left, right);
        }
        if let Some(next) = self.beachline[right].next {
            self.add_event(left, right, next);
        }
    }

    /// Splits `arc` in two, and puts a new arc for `site` in between.
    fn break_arc(&mut self, arc: ArcIdx, site: SiteIdx, point: Point) -> (ArcIdx, ArcIdx, ArcIdx) {
        let old_site = self.beachline[arc].site;
        let old_point = self.beachline[arc].point;
        let old_left_he = self.beachline[arc].left_half_edge;
        let old_right_he = self.beachline[arc].right_half_edge;

        let middle = self.beachline.create_arc(site, point);
        let left = self.beachline.create_arc(old_site, old_point);
        self.beachline[left].left_half_edge = old_left_he;
        let right = self.beachline.create_arc(old_site, old_point);
        self.beachline[right].right_half_edge = old_right_he;

        self.beachline.replace(arc, middle);
        self.beachline.insert_before(middle, left);
        self.beachline.insert_after(middle, right);
        (left, middle, right)
    }

    /// Removes an arc that shrank to `vertex`, and starts the edge between its
    /// two neighbors.
    fn remove_arc(&mut self, arc: ArcIdx, vertex: VertexIdx) {
        let (Some(left), Some(right)) = (self.beachline[arc].prev, self.beachline[arc].next) else {
            return;
        };

        self.finish_breakpoint(left, arc, vertex);
        self.finish_breakpoint(arc, right, vertex);
        if let (Some(l), Some(r)) = (
            self.beachline[arc].left_half_edge,
            self.beachline[arc].right_half_edge,
        ) {
            self.diagram.link(l, r);
        }
        self.beachline.remove(arc);

        let prev_he = self.beachline[left].right_half_edge;
        let next_he = self.beachline[right].left_half_edge;
        self.add_edge(left, right);
        self.start_breakpoint(left, right, vertex);

        if let (Some(new), Some(prev_he)) = (self.beachline[left].right_half_edge, prev_he) {
            self.diagram.link(new, prev_he);
        }
        if let (Some(new), Some(next_he)) = (self.beachline[right].left_half_edge, next_he) {
            self.diagram.link(next_he, new);
        }
    }

    /// Creates the edge traced by the breakpoint between two neighboring arcs.
    fn add_edge(&mut self, left: ArcIdx, right: ArcIdx) {
        let left_face = self.face_of(left);
        let right_face = self.face_of(right);
        let (left_he, right_he) = self.diagram.create_edge(left_face, right_face);
        self.beachline[left].right_half_edge = Some(left_he);
        self.beachline[right].left_half_edge = Some(right_he);
    }

    fn face_of(&self, arc: ArcIdx) -> FaceIdx {
        self.diagram.sites[self.beachline[arc].site].face
    }

    /// The breakpoint between `left` and `right` stopped moving at `vertex`.
    fn finish_breakpoint(&mut self, left: ArcIdx, right: ArcIdx, vertex: VertexIdx) {
        if let Some(he) = self.beachline[left].right_half_edge {
            self.diagram.half_edges[he].origin = Some(vertex);
        }
        if let Some(he) = self.beachline[right].left_half_edge {
            self.diagram.half_edges[he].destination = Some(vertex);
        }
    }

    /// The breakpoint between `left` and `right` started moving at `vertex`.
    fn start_breakpoint(&mut self, left: ArcIdx, right: ArcIdx, vertex: VertexIdx) {
        if let Some(he) = self.beachline[left].right_half_edge {
            self.diagram.half_edges[he].destination = Some(vertex);
        }
        if let Some(he) = self.beachline[right].left_half_edge {
            self.diagram.half_edges[he].origin = Some(vertex);
        }
    }

    fn cancel_event(&mut self, arc: ArcIdx) {
        if let Some(event) = self.beachline[arc].event.take() {
            if self.events.remove(event).is_some() {
                self.stats.cancelled_events += 1;
            }
        }
    }

    /// Registers the circle event for `middle`, if its neighbors are closing in on it.
    fn add_event(&mut self, left: ArcIdx, middle: ArcIdx, right: ArcIdx) {
        let p1 = self.beachline[left].point;
        let p2 = self.beachline[middle].point;
        let p3 = self.beachline[right].point;

        let Some((y, center)) = convergence_point(p1, p2, p3) else {
            trace!(?middle, "no convergence point");
            return;
        };
        let is_below = y <= self.beachline_y;
        if is_below
            && breakpoint_converges(p1, p2, p2, center)
            && breakpoint_converges(p2, p3, p2, center)
        {
            let event = self.events.push(Event::circle(y, center, middle));
            self.beachline[middle].event = Some(event);
            self.stats.circle_events += 1;
            trace!(?middle, y, ?center, "registered circle event");
        } else {
            trace!(?middle, y, ?center, "rejected circle event");
        }
    }

    /// Closes off the diagram against a box.
    ///
    /// The box is grown if necessary to contain all sites and vertices. Every
    /// edge that still extends to infinity is cut where it leaves the box, and
    /// the boundary of every face touching the box is completed with the
    /// corresponding part of the box boundary.
    pub fn bound(&mut self, bbox: BoundingBox) {
        let bbox = self
            .diagram
            .vertices
            .iter()
            .map(|(_, v)| v.point)
            .chain(self.diagram.sites.iter().map(|(_, s)| s.point))
            .fold(bbox, |b, p| b.expanded_to(p));

        let mut ends: BTreeMap<FaceIdx, FaceEnds> = BTreeMap::new();

        let arcs: Vec<_> = self.beachline.iter().collect();
        for pair in arcs.windows(2) {
            let (left, right) = (&self.beachline[pair[0]], &self.beachline[pair[1]]);
            if let (Some(left_he), Some(right_he)) = (left.right_half_edge, right.left_half_edge) {
                let departing = ArcSide {
                    site: left.site,
                    half_edge: left_he,
                };
                let arriving = ArcSide {
                    site: right.site,
                    half_edge: right_he,
                };
                self.close_ray(&bbox, departing, arriving, &mut ends);
            }
        }
        for ray in std::mem::take(&mut self.upper_rays) {
            self.close_ray(&bbox, ray.right, ray.left, &mut ends);
        }

        for (_face, FaceEnds { arriving, mut departing }) in ends {
            for arrival in arriving {
                let from = self.diagram.crossing(arrival);
                let next_departure = departing
                    .iter()
                    .enumerate()
                    .map(|(i, &d)| (i, bbox.boundary_distance(from, self.diagram.crossing(d))))
                    .min_by(|(_, a), (_, b)| a.total_cmp(b))
                    .map(|(i, _)| i);
                match next_departure {
                    Some(i) => {
                        let departure = departing.swap_remove(i);
                        self.diagram.join_along_box(&bbox, arrival, departure);
                    }
                    None => {
                        warn!(face = ?_face, "boundary arrives at the box but never leaves");
                    }
                }
            }
            if !departing.is_empty() {
                warn!(face = ?_face, "boundary leaves the box but never arrives");
            }
        }

        if self.diagram.faces.len() == 1 {
            self.diagram.fill_with_box(FaceIdx(0), &bbox);
        }

        debug!(
            vertices = self.diagram.vertices.len(),
            half_edges = self.diagram.half_edges.len(),
            "bounded diagram"
        );
    }

    /// Cuts the ray between two sites where it leaves the box.
    ///
    /// The ray starts at the midpoint of the sites and runs to the left of the
    /// vector from `arriving` to `departing`. The boundary of `departing`'s face
    /// leaves the box at the new vertex, and that of `arriving`'s face arrives
    /// there.
    fn close_ray(
        &mut self,
        bbox: &BoundingBox,
        departing: ArcSide,
        arriving: ArcSide,
        ends: &mut BTreeMap<FaceIdx, FaceEnds>,
    ) {
        let p_depart = self.diagram.sites[departing.site].point;
        let p_arrive = self.diagram.sites[arriving.site].point;
        let direction = (p_depart - p_arrive).orthogonal();
        let origin = p_depart.midpoint(p_arrive);

        let Some(hit) = bbox.first_intersection(origin, direction) else {
            warn!(?departing, ?arriving, "degenerate ray");
            return;
        };
        let vertex = self.diagram.create_vertex(hit.point);
        self.diagram.half_edges[departing.half_edge].origin = Some(vertex);
        self.diagram.half_edges[arriving.half_edge].destination = Some(vertex);

        let departing_face = self.diagram.sites[departing.site].face;
        let arriving_face = self.diagram.sites[arriving.site].face;
        ends.entry(departing_face)
            .or_default()
            .departing
            .push(BoxCrossing {
                half_edge: departing.half_edge,
                vertex,
                side: hit.side,
            });
        ends.entry(arriving_face)
            .or_default()
            .arriving
            .push(BoxCrossing {
                half_edge: arriving.half_edge,
                vertex,
                side: hit.side,
            });
    }
}

/// Where a face's boundary arrives at the bounding box and where it leaves.
///
/// Usually a face touches the box along a single stretch, but when all the
/// sites are collinear the faces in the middle are strips crossing the whole
/// box, touching it twice.
#[derive(Clone, Debug, Default)]
struct FaceEnds {
    arriving: Vec<BoxCrossing>,
    departing: Vec<BoxCrossing>,
}

/// The center of the circle through three points, and the `y` coordinate of
/// its lowest point.
///
/// Returns `None` if the points are collinear.
pub(crate) fn convergence_point(p1: Point, p2: Point, p3: Point) -> Option<(f64, Point)> {
    let v1 = (p1 - p2).orthogonal();
    let v2 = (p2 - p3).orthogonal();
    let delta = (p3 - p1) * 0.5;
    let denom = v1.det(v2);
    if denom == 0.0 {
        return None;
    }
    let t = delta.det(v2) / denom;
    let center = p1.midpoint(p2) + v1 * t;
    if !center.is_finite() {
        return None;
    }
    let radius = center.distance(p1);
    Some((center.y - radius, center))
}

/// Is the breakpoint between the arcs of `left` and `right` moving towards `center`?
///
/// The breakpoint moves right if the left site is lower, and left otherwise.
/// It starts out directly below the lower site. If `center` is right there,
/// the lower site landed exactly under an existing breakpoint and the arc of
/// `middle` is squeezed to nothing immediately. That doesn't apply when the
/// lower site is `middle` itself: an arc born on the sweep line has zero width
/// too, but it only grows.
fn breakpoint_converges(left: Point, right: Point, middle: Point, center: Point) -> bool {
    let moving_right = left.y < right.y;
    let lower = if moving_right { left } else { right };
    if lower == middle {
        if moving_right {
            lower.x < center.x
        } else {
            lower.x > center.x
        }
    } else if moving_right {
        lower.x <= center.x
    } else {
        lower.x >= center.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn run(points: &[(f64, f64)]) -> FortuneAlgorithm {
        let points: Vec<Point> = points.iter().map(|&p| p.into()).collect();
        let mut algo = FortuneAlgorithm::new(&points).unwrap();
        algo.construct();
        algo.beachline.check_invariants();
        algo
    }

    #[test]
    fn circumcenter() {
        let (y, center) = convergence_point(
            Point::new(0.2, 0.2),
            Point::new(0.5, 0.8),
            Point::new(0.8, 0.2),
        )
        .unwrap();
        assert!((center.x - 0.5).abs() < 1e-12);
        assert!((center.y - 0.425).abs() < 1e-12);
        assert!((y - 0.05).abs() < 1e-12);
    }

    #[test]
    fn collinear_never_converges() {
        assert_eq!(
            convergence_point(
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(2.0, 0.0)
            ),
            None
        );
        assert_eq!(
            convergence_point(
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(2.0, 2.0)
            ),
            None
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_matches!(
            FortuneAlgorithm::new(&[Point::new(f64::NAN, 0.0)]),
            Err(Error::NaN)
        );
        assert_matches!(
            FortuneAlgorithm::new(&[Point::new(0.0, f64::INFINITY)]),
            Err(Error::Infinity)
        );
        assert_matches!(
            FortuneAlgorithm::new(&[
                Point::new(0.5, 0.5),
                Point::new(0.1, 0.2),
                Point::new(0.5, 0.5)
            ]),
            Err(Error::DuplicateSite { first, second })
                if first == SiteIdx(0) && second == SiteIdx(2)
        );
    }

    #[test]
    fn triangle_sweep() {
        let algo = run(&[(0.2, 0.2), (0.8, 0.2), (0.5, 0.8)]);
        assert_eq!(algo.stats().site_events, 3);
        assert_eq!(algo.stats().circle_events, 1);
        assert_eq!(algo.stats().cancelled_events, 0);
        assert_eq!(algo.diagram().vertices.len(), 1);
        assert!(algo.events.is_empty());
        // Two arcs for the top site, and one for each of the others.
        assert_eq!(algo.beachline.len(), 4);
    }

    #[test]
    fn site_under_a_breakpoint() {
        // The last site lands right below the breakpoint of the top row, so
        // one of the arcs next to it has zero width from the start.
        let mut algo = run(&[(0.25, 0.75), (0.75, 0.75), (0.5, 0.5)]);
        assert_eq!(algo.stats().circle_events, 1);
        let vertices: Vec<_> = algo.diagram().vertices().map(|(_, v)| v.point).collect();
        assert_eq!(vertices, vec![Point::new(0.5, 0.75)]);

        algo.bound(BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        let d = algo.diagram();
        d.check_invariants();
        let area: f64 = (0..3)
            .map(|i| kurbo::Shape::area(&d.face_path(FaceIdx(i))).abs())
            .sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn converging_from_directly_below() {
        let (a, b, c) = (
            Point::new(0.25, 0.75),
            Point::new(0.75, 0.75),
            Point::new(0.5, 0.5),
        );
        let center = Point::new(0.5, 0.75);
        // `c` just landed under the breakpoint between `a` and `b`, squeezing
        // whichever of their arcs ends up next to it.
        assert!(breakpoint_converges(c, a, a, center));
        assert!(breakpoint_converges(b, c, b, center));
        // The arc of `c` itself is growing.
        assert!(!breakpoint_converges(a, c, c, center));
        assert!(!breakpoint_converges(c, b, c, center));
        assert!(!breakpoint_converges(Point::new(0.6, 0.5), a, a, center));
    }

    #[test]
    fn top_row() {
        let mut algo = run(&[(0.7, 0.5), (0.3, 0.5)]);
        assert_eq!(algo.stats().circle_events, 0);
        assert_eq!(algo.upper_rays.len(), 1);
        let sites: Vec<_> = algo
            .beachline
            .iter()
            .map(|a| algo.beachline[a].site)
            .collect();
        assert_eq!(sites, vec![SiteIdx(1), SiteIdx(0)]);

        algo.bound(BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        algo.diagram().check_invariants();
        assert!(algo.upper_rays.is_empty());
    }

    #[test]
    fn collinear_strips() {
        for sites in [
            [(0.2, 0.5), (0.5, 0.5), (0.8, 0.5)],
            [(0.2, 0.2), (0.5, 0.5), (0.8, 0.8)],
            [(0.5, 0.2), (0.5, 0.5), (0.5, 0.8)],
        ] {
            let mut algo = run(&sites);
            assert_eq!(algo.stats().circle_events, 0);
            algo.bound(BoundingBox::new(0.0, 0.0, 1.0, 1.0));
            let d = algo.diagram();
            d.check_invariants();
            // The middle face is a strip with two edges and two stretches of box.
            assert_eq!(d.face_half_edges(FaceIdx(1)).count(), 4);
            let area: f64 = (0..3)
                .map(|i| kurbo::Shape::area(&d.face_path(FaceIdx(i))).abs())
                .sum();
            assert!((area - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn single_site_gets_the_box() {
        let mut algo = run(&[(0.5, 0.5)]);
        algo.bound(BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        let d = algo.diagram();
        d.check_invariants();
        assert_eq!(
            d.face_points(FaceIdx(0)),
            vec![
                Point::new(0.0, 1.0),
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn bound_grows_the_box() {
        let mut algo = run(&[(0.0, 0.0), (2.0, 0.0), (1.0, 3.0)]);
        algo.bound(BoundingBox::new(0.5, 0.5, 1.0, 1.0));
        let d = algo.diagram();
        d.check_invariants();
        for (_, v) in d.vertices() {
            assert!(BoundingBox::new(0.0, 0.0, 2.0, 3.0).contains(v.point));
        }
    }

    #[test]
    fn empty_input() {
        let mut algo = run(&[]);
        algo.bound(BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(algo.diagram().site_count(), 0);
        assert_eq!(algo.diagram().half_edges().count(), 0);
    }
}
