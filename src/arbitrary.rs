//! Utilities for fuzz and/or property testing using `arbitrary`.

use std::collections::HashSet;

use arbitrary::Unstructured;

use crate::{BoundingBox, Point};

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate an arbitrary point in a box.
pub fn point_in_box(
    bbox: &BoundingBox,
    u: &mut Unstructured<'_>,
) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(
        float_in_range(bbox.left, bbox.right, u)?,
        float_in_range(bbox.bottom, bbox.top, u)?,
    ))
}

/// Generate a point in a box, with a good chance of sharing a coordinate with
/// `prev` or of lying on a small grid.
///
/// Shared coordinates give rows and columns of sites, and the grid gives
/// cocircular sites. Both produce events at identical sweep positions.
pub fn another_point_in_box(
    prev: Point,
    bbox: &BoundingBox,
    u: &mut Unstructured<'_>,
) -> Result<Point, arbitrary::Error> {
    let p = point_in_box(bbox, u)?;
    Ok(match u.int_in_range(0u8..=3)? {
        0 => Point::new(p.x, prev.y),
        1 => Point::new(prev.x, p.y),
        2 => {
            let snap = |x: f64, lo: f64, hi: f64| {
                lo + ((x - lo) / (hi - lo) * 8.0).round() / 8.0 * (hi - lo)
            };
            Point::new(
                snap(p.x, bbox.left, bbox.right),
                snap(p.y, bbox.bottom, bbox.top),
            )
        }
        _ => p,
    })
}

fn dedup(points: &mut Vec<Point>) {
    let mut seen = HashSet::new();
    // Adding zero turns -0.0 into 0.0.
    points.retain(|p| seen.insert(((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())));
}

/// Generate some distinct points in a box.
pub fn sites(
    bbox: &BoundingBox,
    u: &mut Unstructured<'_>,
) -> Result<Vec<Point>, arbitrary::Error> {
    let len = u.arbitrary_len::<[u32; 2]>()?;
    let mut points = (0..len)
        .map(|_| point_in_box(bbox, u))
        .collect::<Result<Vec<_>, _>>()?;
    dedup(&mut points);
    Ok(points)
}

/// Generate some distinct points in a box, with many shared coordinates.
///
/// See [`another_point_in_box`].
pub fn degenerate_sites(
    bbox: &BoundingBox,
    u: &mut Unstructured<'_>,
) -> Result<Vec<Point>, arbitrary::Error> {
    let len = u.arbitrary_len::<[u32; 2]>()?;
    let mut points: Vec<Point> = Vec::with_capacity(len);
    for _ in 0..len {
        let p = match points.last() {
            Some(&prev) => another_point_in_box(prev, bbox, u)?,
            None => point_in_box(bbox, u)?,
        };
        points.push(p);
    }
    dedup(&mut points);
    Ok(points)
}
