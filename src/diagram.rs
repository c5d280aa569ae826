//! The Voronoi diagram, as a doubly-connected edge list.
//!
//! Every site owns exactly one face. Each face is bounded by a cycle of
//! half-edges, linked through `next` and `prev` and oriented counter-clockwise,
//! so that the face is on the left of each of its half-edges. A half-edge
//! separating two faces has a twin in the other face, running the opposite
//! way. Half-edges running along the boundary of a clipping box have no twin.
//!
//! Vertices and half-edges that fall outside the box during
//! [`Diagram::intersect`] are flagged as removed rather than deleted, so that
//! indices stay valid. The iteration accessors skip them.

use std::collections::HashSet;

use crate::geom::{BoundingBox, Intersection, Point, Side};
use crate::log::{debug, warn};
use crate::Error;

typed_vec!(
    /// A handle to a site of a [`Diagram`].
    SiteIdx,
    /// Arena storage for sites.
    SiteVec,
    "site"
);
typed_vec!(
    /// A handle to a face of a [`Diagram`].
    FaceIdx,
    /// Arena storage for faces.
    FaceVec,
    "f"
);
typed_vec!(
    /// A handle to a vertex of a [`Diagram`].
    VertexIdx,
    /// Arena storage for vertices.
    VertexVec,
    "v"
);
typed_vec!(
    /// A handle to a half-edge of a [`Diagram`].
    HalfEdgeIdx,
    /// Arena storage for half-edges.
    HalfEdgeVec,
    "he"
);

/// One of the input points.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Site {
    /// The position of this site in the input.
    pub index: SiteIdx,
    /// Where the site is.
    pub point: Point,
    /// The face containing everything closer to this site than to any other.
    pub face: FaceIdx,
}

/// The cell of a single site.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Face {
    /// The site that this is the cell of.
    pub site: SiteIdx,
    /// Some half-edge on the boundary of this face.
    ///
    /// This is `None` before the diagram is bounded, and after clipping for
    /// faces that lie completely outside the clipping box.
    pub outer_component: Option<HalfEdgeIdx>,
}

/// A vertex of the diagram.
///
/// This is either equidistant from three or more sites, or on the boundary of
/// a bounding box.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Vertex {
    /// Where the vertex is.
    pub point: Point,
    removed: bool,
}

impl Vertex {
    /// Was this vertex clipped away?
    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

/// One side of an edge of the diagram.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct HalfEdge {
    /// Where this half-edge starts. Only `None` for a ray that hasn't been bounded yet.
    pub origin: Option<VertexIdx>,
    /// Where this half-edge ends. Only `None` for a ray that hasn't been bounded yet.
    pub destination: Option<VertexIdx>,
    /// The half-edge on the other side of this edge, if there is another side.
    pub twin: Option<HalfEdgeIdx>,
    /// The face on the left of this half-edge.
    pub incident_face: FaceIdx,
    /// The previous half-edge around `incident_face`.
    pub prev: Option<HalfEdgeIdx>,
    /// The next half-edge around `incident_face`.
    pub next: Option<HalfEdgeIdx>,
    removed: bool,
}

impl HalfEdge {
    /// Was this half-edge clipped away?
    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

/// Where a face's boundary meets the boundary of a box.
///
/// `half_edge` either ends at `vertex` (if the face boundary is arriving at the
/// box) or starts there (if it is leaving).
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BoxCrossing {
    pub half_edge: HalfEdgeIdx,
    pub vertex: VertexIdx,
    pub side: Side,
}

/// A Voronoi diagram.
///
/// These are produced by [`FortuneAlgorithm`](crate::FortuneAlgorithm), or more
/// conveniently by [`voronoi`](crate::voronoi).
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct Diagram {
    pub(crate) sites: SiteVec<Site>,
    pub(crate) faces: FaceVec<Face>,
    pub(crate) vertices: VertexVec<Vertex>,
    pub(crate) half_edges: HalfEdgeVec<HalfEdge>,
}

impl Diagram {
    /// Creates a diagram with one site and one (empty) face per point.
    pub(crate) fn new(points: &[Point]) -> Self {
        let mut diagram = Diagram {
            sites: SiteVec::with_capacity(points.len()),
            faces: FaceVec::with_capacity(points.len()),
            vertices: VertexVec::default(),
            half_edges: HalfEdgeVec::default(),
        };
        for &point in points {
            let index = diagram.sites.next_idx();
            let face = diagram.faces.push(Face {
                site: index,
                outer_component: None,
            });
            diagram.sites.push(Site { index, point, face });
        }
        diagram
    }

    /// The number of sites (and faces).
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Returns a site by index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn site(&self, idx: SiteIdx) -> &Site {
        &self.sites[idx]
    }

    /// Iterates over all sites, in input order.
    pub fn sites(&self) -> impl Iterator<Item = &Site> + '_ {
        self.sites.iter().map(|(_, site)| site)
    }

    /// Returns a face by index.
    pub fn face(&self, idx: FaceIdx) -> &Face {
        &self.faces[idx]
    }

    /// Iterates over all faces, in the order of their sites.
    pub fn faces(&self) -> impl Iterator<Item = (FaceIdx, &Face)> + '_ {
        self.faces.iter()
    }

    /// Returns a vertex by index. The vertex may have been removed by clipping.
    pub fn vertex(&self, idx: VertexIdx) -> &Vertex {
        &self.vertices[idx]
    }

    /// Iterates over the vertices that were not clipped away.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexIdx, &Vertex)> + '_ {
        self.vertices.iter().filter(|(_, v)| !v.removed)
    }

    /// Returns a half-edge by index. The half-edge may have been removed by clipping.
    pub fn half_edge(&self, idx: HalfEdgeIdx) -> &HalfEdge {
        &self.half_edges[idx]
    }

    /// Iterates over the half-edges that were not clipped away.
    pub fn half_edges(&self) -> impl Iterator<Item = (HalfEdgeIdx, &HalfEdge)> + '_ {
        self.half_edges.iter().filter(|(_, he)| !he.removed)
    }

    /// Walks counter-clockwise around the boundary of a face, starting from its
    /// outer component.
    pub fn face_half_edges(&self, face: FaceIdx) -> FaceHalfEdges<'_> {
        let start = self.faces[face].outer_component;
        FaceHalfEdges {
            diagram: self,
            start,
            next: start,
            remaining: self.half_edges.len(),
        }
    }

    /// The corners of a face, in counter-clockwise order.
    pub fn face_points(&self, face: FaceIdx) -> Vec<Point> {
        self.face_half_edges(face)
            .filter_map(|he| self.half_edges[he].origin)
            .map(|v| self.vertices[v].point)
            .collect()
    }

    /// The centroid of a face.
    ///
    /// Returns `None` if the face is empty or has no area. The face boundary
    /// needs to be closed, so this is only meaningful after bounding.
    pub fn centroid(&self, face: FaceIdx) -> Option<Point> {
        let points = self.face_points(face);
        if points.len() < 3 {
            return None;
        }

        let mut area = 0.0;
        let mut centroid = Point::default();
        for (i, &p0) in points.iter().enumerate() {
            let p1 = points[(i + 1) % points.len()];
            let a = p0.det(p1);
            area += a;
            centroid = centroid + (p0 + p1) * a;
        }
        area *= 0.5;
        if area == 0.0 {
            return None;
        }
        Some(Point::new(
            centroid.x / (6.0 * area),
            centroid.y / (6.0 * area),
        ))
    }

    /// The centroids of all faces, in the order of their sites.
    pub fn centroids(&self) -> Vec<Option<Point>> {
        self.faces.indices().map(|f| self.centroid(f)).collect()
    }

    /// The boundary of a face, as a closed path.
    pub fn face_path(&self, face: FaceIdx) -> kurbo::BezPath {
        let mut path = kurbo::BezPath::new();
        let mut points = self.face_points(face).into_iter();
        if let Some(first) = points.next() {
            path.move_to(first.to_kurbo());
            for p in points {
                path.line_to(p.to_kurbo());
            }
            path.close_path();
        }
        path
    }

    pub(crate) fn create_vertex(&mut self, point: Point) -> VertexIdx {
        self.vertices.push(Vertex {
            point,
            removed: false,
        })
    }

    /// Adds a new unlinked half-edge to a face, making it the outer component if
    /// the face doesn't have one yet.
    pub(crate) fn create_half_edge(&mut self, face: FaceIdx) -> HalfEdgeIdx {
        let he = self.half_edges.push(HalfEdge {
            origin: None,
            destination: None,
            twin: None,
            incident_face: face,
            prev: None,
            next: None,
            removed: false,
        });
        self.faces[face].outer_component.get_or_insert(he);
        he
    }

    /// Creates a pair of twin half-edges, one in each face.
    pub(crate) fn create_edge(
        &mut self,
        left: FaceIdx,
        right: FaceIdx,
    ) -> (HalfEdgeIdx, HalfEdgeIdx) {
        let a = self.create_half_edge(left);
        let b = self.create_half_edge(right);
        self.half_edges[a].twin = Some(b);
        self.half_edges[b].twin = Some(a);
        (a, b)
    }

    /// Makes `second` follow `first` around their face.
    pub(crate) fn link(&mut self, first: HalfEdgeIdx, second: HalfEdgeIdx) {
        self.half_edges[first].next = Some(second);
        self.half_edges[second].prev = Some(first);
    }

    /// Adds a half-edge from `origin` to `destination` after `prev`, returning it.
    fn push_boundary_edge(
        &mut self,
        face: FaceIdx,
        prev: Option<HalfEdgeIdx>,
        origin: VertexIdx,
        destination: VertexIdx,
    ) -> HalfEdgeIdx {
        let he = self.create_half_edge(face);
        self.half_edges[he].origin = Some(origin);
        self.half_edges[he].destination = Some(destination);
        if let Some(prev) = prev {
            self.link(prev, he);
        }
        he
    }

    /// The position of a box crossing, as an intersection with the box.
    pub(crate) fn crossing(&self, crossing: BoxCrossing) -> Intersection {
        Intersection {
            side: crossing.side,
            point: self.vertices[crossing.vertex].point,
        }
    }

    /// Closes a face's boundary between a half-edge that arrives at the box and
    /// one that departs from it, by walking counter-clockwise along the box and
    /// adding a vertex at every corner passed.
    pub(crate) fn join_along_box(
        &mut self,
        bbox: &BoundingBox,
        arriving: BoxCrossing,
        departing: BoxCrossing,
    ) {
        let face = self.half_edges[arriving.half_edge].incident_face;
        let from = self.crossing(arriving);
        let to = self.crossing(departing);

        let mut prev = arriving.half_edge;
        let mut vertex = arriving.vertex;
        for side in bbox.corners_between(from, to) {
            let corner = self.create_vertex(bbox.corner(side));
            prev = self.push_boundary_edge(face, Some(prev), vertex, corner);
            vertex = corner;
        }
        let last = self.push_boundary_edge(face, Some(prev), vertex, departing.vertex);
        self.link(last, departing.half_edge);
    }

    /// Makes the boundary of `face` be the boundary of the box.
    pub(crate) fn fill_with_box(&mut self, face: FaceIdx, bbox: &BoundingBox) {
        let corners: Vec<_> = Side::ALL
            .iter()
            .map(|&side| self.create_vertex(bbox.corner(side)))
            .collect();
        self.faces[face].outer_component = None;

        let mut first = None;
        let mut prev = None;
        for (i, &corner) in corners.iter().enumerate() {
            let next_corner = corners[(i + 1) % corners.len()];
            let he = self.push_boundary_edge(face, prev, corner, next_corner);
            first.get_or_insert(he);
            prev = Some(he);
        }
        if let (Some(first), Some(last)) = (first, prev) {
            self.link(last, first);
        }
    }

    fn remove_vertex(&mut self, v: Option<VertexIdx>) {
        if let Some(v) = v {
            self.vertices[v].removed = true;
        }
    }

    fn endpoints(&self, he: HalfEdgeIdx, face: FaceIdx) -> Result<(Point, Point), Error> {
        let he = &self.half_edges[he];
        match (he.origin, he.destination) {
            (Some(o), Some(d)) => Ok((self.vertices[o].point, self.vertices[d].point)),
            _ => Err(Error::OpenBoundary { face }),
        }
    }

    /// Clips the diagram to a box.
    ///
    /// The diagram must already be bounded (see
    /// [`FortuneAlgorithm::bound`](crate::FortuneAlgorithm::bound)), and the box
    /// should lie within the bounding box. Faces that lie completely outside
    /// the box lose their boundary. If the box doesn't cross any edge, the face
    /// containing its center gets the whole box.
    ///
    /// On error, the diagram is left in an unspecified state.
    pub fn intersect(&mut self, bbox: BoundingBox) -> Result<(), Error> {
        let mut processed = HashSet::new();
        let mut crossed = false;

        for face in (0..self.faces.len()).map(FaceIdx) {
            let Some(start) = self.faces[face].outer_component else {
                continue;
            };
            let mut inside = bbox.contains(self.endpoints(start, face)?.0);
            let dirty = !inside;
            // The first half-edge entering the box and the last one leaving it.
            let mut incoming: Option<BoxCrossing> = None;
            let mut outgoing: Option<BoxCrossing> = None;

            let mut he = start;
            let mut steps = 0;
            loop {
                let (origin, destination) = self.endpoints(he, face)?;
                let next_inside = bbox.contains(destination);
                let hits = bbox.segment_intersections(origin, destination);
                let Some(next) = self.half_edges[he].next else {
                    return Err(Error::OpenBoundary { face });
                };
                let twin = self.half_edges[he]
                    .twin
                    .filter(|twin| processed.contains(twin))
                    .map(|twin| self.half_edges[twin].clone());

                match (inside, next_inside, hits.len()) {
                    (true, true, _) => {}
                    (false, false, 0) => {
                        self.remove_vertex(self.half_edges[he].origin);
                        self.half_edges[he].removed = true;
                    }
                    (false, false, 2) => {
                        self.remove_vertex(self.half_edges[he].origin);
                        let (o, d) = match twin {
                            Some(HalfEdge {
                                origin: Some(twin_origin),
                                destination: Some(twin_destination),
                                ..
                            }) => (twin_destination, twin_origin),
                            _ => (
                                self.create_vertex(hits[0].point),
                                self.create_vertex(hits[1].point),
                            ),
                        };
                        self.half_edges[he].origin = Some(o);
                        self.half_edges[he].destination = Some(d);

                        let entering = BoxCrossing {
                            half_edge: he,
                            vertex: o,
                            side: hits[0].side,
                        };
                        if let Some(out) = outgoing {
                            self.join_along_box(&bbox, out, entering);
                        }
                        incoming.get_or_insert(entering);
                        outgoing = Some(BoxCrossing {
                            half_edge: he,
                            vertex: d,
                            side: hits[1].side,
                        });
                        processed.insert(he);
                        crossed = true;
                    }
                    (true, false, 1) => {
                        let d = match twin.and_then(|twin| twin.origin) {
                            Some(twin_origin) => twin_origin,
                            None => self.create_vertex(hits[0].point),
                        };
                        self.half_edges[he].destination = Some(d);
                        outgoing = Some(BoxCrossing {
                            half_edge: he,
                            vertex: d,
                            side: hits[0].side,
                        });
                        processed.insert(he);
                        crossed = true;
                    }
                    (false, true, 1) => {
                        self.remove_vertex(self.half_edges[he].origin);
                        let o = match twin.and_then(|twin| twin.destination) {
                            Some(twin_destination) => twin_destination,
                            None => self.create_vertex(hits[0].point),
                        };
                        self.half_edges[he].origin = Some(o);

                        let entering = BoxCrossing {
                            half_edge: he,
                            vertex: o,
                            side: hits[0].side,
                        };
                        if let Some(out) = outgoing {
                            self.join_along_box(&bbox, out, entering);
                        }
                        incoming.get_or_insert(entering);
                        processed.insert(he);
                        crossed = true;
                    }
                    (_, _, intersections) => {
                        warn!(?face, ?he, intersections, "malformed clip");
                        return Err(Error::MalformedClip {
                            face,
                            intersections,
                        });
                    }
                }

                he = next;
                inside = next_inside;
                if he == start {
                    break;
                }
                steps += 1;
                if steps > self.half_edges.len() {
                    return Err(Error::OpenBoundary { face });
                }
            }

            if dirty {
                if let (Some(out), Some(inc)) = (outgoing, incoming) {
                    self.join_along_box(&bbox, out, inc);
                }
                self.faces[face].outer_component = incoming.map(|c| c.half_edge);
            }
        }

        if !crossed {
            // Either everything is inside the box, or the box is inside a single face.
            let center = bbox.center();
            let nearest = self.faces.iter().min_by(|(_, a), (_, b)| {
                let da = self.sites[a.site].point.distance(center);
                let db = self.sites[b.site].point.distance(center);
                da.total_cmp(&db)
            });
            if let Some((face, f)) = nearest {
                if f.outer_component.is_none() {
                    self.fill_with_box(face, &bbox);
                }
            }
        }

        debug!(
            vertices = self.vertices().count(),
            half_edges = self.half_edges().count(),
            "clipped diagram"
        );
        Ok(())
    }

    /// Panics if the half-edge structure is inconsistent.
    ///
    /// This checks that twins are mutual and run in opposite directions, that
    /// every face boundary is a closed cycle through live half-edges of that
    /// face, and that every live half-edge belongs to such a cycle.
    pub fn check_invariants(&self) {
        assert_eq!(self.sites.len(), self.faces.len());
        for (idx, site) in self.sites.iter() {
            assert_eq!(site.index, idx);
            assert_eq!(self.faces[site.face].site, idx);
        }

        for (idx, he) in self.half_edges() {
            let (Some(origin), Some(destination)) = (he.origin, he.destination) else {
                panic!("{idx:?} is not bounded");
            };
            assert!(!self.vertices[origin].removed, "{idx:?} starts at a removed vertex");
            assert!(!self.vertices[destination].removed, "{idx:?} ends at a removed vertex");

            if let Some(twin) = he.twin {
                let twin_he = &self.half_edges[twin];
                assert!(!twin_he.removed, "{idx:?} has a removed twin");
                assert_eq!(twin_he.twin, Some(idx));
                assert_eq!(twin_he.origin, he.destination);
                assert_eq!(twin_he.destination, he.origin);
                assert_ne!(twin_he.incident_face, he.incident_face);
            }

            let Some(next) = he.next else {
                panic!("{idx:?} has no successor");
            };
            assert_eq!(self.half_edges[next].prev, Some(idx));
            assert_eq!(self.half_edges[next].origin, he.destination);
            assert_eq!(self.half_edges[next].incident_face, he.incident_face);
        }

        let mut on_cycles = 0;
        for (face, f) in self.faces.iter() {
            let Some(start) = f.outer_component else {
                continue;
            };
            let mut he = start;
            loop {
                let half_edge = &self.half_edges[he];
                assert!(!half_edge.removed, "{face:?} has a removed half-edge");
                assert_eq!(half_edge.incident_face, face);
                on_cycles += 1;
                assert!(on_cycles <= self.half_edges.len(), "{face:?} doesn't close");
                match half_edge.next {
                    Some(next) if next == start => break,
                    Some(next) => he = next,
                    None => panic!("{face:?} doesn't close"),
                }
            }
        }
        assert_eq!(on_cycles, self.half_edges().count());
    }
}

/// An iterator over the half-edges around a face.
///
/// Created by [`Diagram::face_half_edges`].
#[derive(Clone, Debug)]
pub struct FaceHalfEdges<'a> {
    diagram: &'a Diagram,
    start: Option<HalfEdgeIdx>,
    next: Option<HalfEdgeIdx>,
    // Guards against walking forever around a broken boundary.
    remaining: usize,
}

impl Iterator for FaceHalfEdges<'_> {
    type Item = HalfEdgeIdx;

    fn next(&mut self) -> Option<HalfEdgeIdx> {
        let current = self.next?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.next = self.diagram.half_edges[current]
            .next
            .filter(|&next| Some(next) != self.start);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn boxed(site: Point, bbox: BoundingBox) -> Diagram {
        let mut diagram = Diagram::new(&[site]);
        diagram.fill_with_box(FaceIdx(0), &bbox);
        diagram
    }

    #[test]
    fn square_centroid() {
        let diagram = boxed(Point::new(0.5, 0.5), BoundingBox::new(0.0, 0.0, 2.0, 2.0));
        diagram.check_invariants();
        let points = diagram.face_points(FaceIdx(0));
        assert_eq!(
            points,
            vec![
                Point::new(0.0, 2.0),
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(2.0, 2.0),
            ]
        );
        let mean = points.iter().fold(Point::default(), |a, &b| a + b) * 0.25;
        assert_eq!(diagram.centroid(FaceIdx(0)), Some(mean));
        assert_eq!(diagram.centroids(), vec![Some(Point::new(1.0, 1.0))]);
    }

    #[test]
    fn empty_face_has_no_centroid() {
        let diagram = Diagram::new(&[Point::new(0.0, 0.0)]);
        assert_eq!(diagram.centroid(FaceIdx(0)), None);
        assert_eq!(diagram.face_half_edges(FaceIdx(0)).count(), 0);
        assert!(diagram.face_path(FaceIdx(0)).elements().is_empty());
    }

    #[test]
    fn face_path_is_closed() {
        let diagram = boxed(Point::new(0.5, 0.5), BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        let path = diagram.face_path(FaceIdx(0));
        assert_eq!(path.elements().len(), 5);
        assert_matches!(path.elements().last(), Some(kurbo::PathEl::ClosePath));
        assert!((kurbo::Shape::area(&path).abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clip_to_inner_box() {
        let mut diagram = boxed(Point::new(0.5, 0.5), BoundingBox::new(-1.0, -1.0, 2.0, 2.0));
        diagram.intersect(BoundingBox::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        diagram.check_invariants();
        assert_eq!(
            diagram.face_points(FaceIdx(0)),
            vec![
                Point::new(0.0, 1.0),
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ]
        );
        assert_eq!(diagram.vertices().count(), 4);
    }

    #[test]
    fn clip_to_overlapping_box() {
        let mut diagram = boxed(Point::new(0.5, 0.5), BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        diagram.intersect(BoundingBox::new(0.5, 0.5, 1.5, 1.5)).unwrap();
        diagram.check_invariants();

        let mut points = diagram.face_points(FaceIdx(0));
        points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        assert_eq!(
            points,
            vec![
                Point::new(0.5, 0.5),
                Point::new(0.5, 1.0),
                Point::new(1.0, 0.5),
                Point::new(1.0, 1.0),
            ]
        );
        assert_eq!(diagram.centroid(FaceIdx(0)), Some(Point::new(0.75, 0.75)));
        assert_eq!(diagram.vertices().count(), 4);
    }

    #[test]
    fn clip_unbounded_face() {
        let mut diagram = Diagram::new(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        diagram.create_edge(FaceIdx(0), FaceIdx(1));
        assert_matches!(
            diagram.intersect(BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
            Err(Error::OpenBoundary { face }) if face == FaceIdx(0)
        );
    }
}
