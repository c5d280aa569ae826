#![no_main]

use arbitrary::Unstructured;

use beachcomber::{arbitrary::degenerate_sites, voronoi, BoundingBox, Error};
use libfuzzer_sys::fuzz_target;

fn clip(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let unit = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
    let points = degenerate_sites(&unit, &mut u)?;
    let outer = BoundingBox::new(-0.25, -0.25, 1.25, 1.25);

    // Rows, columns and cocircular sites are all fair game. Only a malformed
    // clip is allowed to fail, and whatever comes back must hang together.
    let diagram = match voronoi(&points, outer, unit) {
        Ok(diagram) => diagram,
        Err(Error::MalformedClip { .. }) => return Ok(()),
        Err(e) => panic!("{e}"),
    };
    diagram.check_invariants();
    assert_eq!(diagram.faces().count(), points.len());
    for (_, v) in diagram.vertices() {
        assert!(unit.contains(v.point));
    }
    if points.is_empty() {
        return Ok(());
    }

    let mut total = 0.0;
    for (f, face) in diagram.faces() {
        let corners = diagram.face_points(f);
        let n = corners.len();
        total += (0..n)
            .map(|i| corners[i].det(corners[(i + 1) % n]))
            .sum::<f64>()
            / 2.0;

        // Every corner of a cell is at least as close to its own site as to
        // any other.
        let site = diagram.site(face.site).point;
        for &corner in &corners {
            for other in &points {
                assert!(other.distance(corner) >= site.distance(corner) - 1e-6);
            }
        }
    }
    assert!((total - 1.0).abs() < 1e-7, "total area {total}");
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let u = Unstructured::new(data);
    let _ = clip(u);
});
