#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod beachline;
mod diagram;
mod event;
mod fortune;
mod geom;
mod log;

// pub so that we can use it in fuzz tests, but it's really private
#[doc(hidden)]
pub mod queue;

pub use diagram::{
    Diagram, Face, FaceHalfEdges, FaceIdx, HalfEdge, HalfEdgeIdx, Site, SiteIdx, Vertex, VertexIdx,
};
pub use fortune::{FortuneAlgorithm, SweepStats};
pub use geom::{BoundingBox, Intersection, Point, Side, EPSILON};

/// Something went wrong while computing a diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// At least one of the inputs was infinite.
    Infinity,
    /// At least one of the inputs was not a number.
    NaN,
    /// Two of the input points were the same.
    DuplicateSite {
        /// The first of the two coinciding sites.
        first: SiteIdx,
        /// The second of the two coinciding sites.
        second: SiteIdx,
    },
    /// While clipping, an edge of a face met the clipping box in a way that
    /// doesn't make sense for its endpoints.
    ///
    /// This happens when the clipping box is degenerate, or placed badly
    /// relative to the diagram.
    MalformedClip {
        /// The face whose boundary couldn't be clipped.
        face: FaceIdx,
        /// The number of times the offending edge crossed the box boundary.
        intersections: usize,
    },
    /// While clipping, a face's boundary was not closed. The diagram must be
    /// bounded before it can be clipped.
    OpenBoundary {
        /// The face with an open boundary.
        face: FaceIdx,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Infinity => write!(f, "one of the inputs was infinite"),
            Error::NaN => write!(f, "one of the inputs had a NaN"),
            Error::DuplicateSite { first, second } => write!(
                f,
                "sites {} and {} are at the same position",
                first.index(),
                second.index()
            ),
            Error::MalformedClip {
                face,
                intersections,
            } => write!(
                f,
                "an edge of face {} crossed the clipping box {} times",
                face.index(),
                intersections
            ),
            Error::OpenBoundary { face } => {
                write!(f, "face {} has an open boundary", face.index())
            }
        }
    }
}

impl std::error::Error for Error {}

/// Computes the Voronoi diagram of some points, clipped to a box.
///
/// The diagram is first bounded by `outer` (which gets expanded if it doesn't
/// contain all the points) and then clipped to `inner`, which should be
/// contained in `outer`. Bounding with a slightly larger box than the one you
/// want keeps the bounding pass away from the corners of the final box.
///
/// ```
/// use beachcomber::{voronoi, BoundingBox, Point};
///
/// let points = [Point::new(0.2, 0.2), Point::new(0.8, 0.2), Point::new(0.5, 0.8)];
/// let diagram = voronoi(
///     &points,
///     BoundingBox::new(-0.05, -0.05, 1.05, 1.05),
///     BoundingBox::new(0.0, 0.0, 1.0, 1.0),
/// )
/// .unwrap();
/// assert_eq!(diagram.site_count(), 3);
/// ```
pub fn voronoi(points: &[Point], outer: BoundingBox, inner: BoundingBox) -> Result<Diagram, Error> {
    let mut algo = FortuneAlgorithm::new(points)?;
    algo.construct();
    algo.bound(outer);
    let mut diagram = algo.into_diagram();
    diagram.intersect(inner)?;
    Ok(diagram)
}
