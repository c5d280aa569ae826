use assert_matches::assert_matches;
use beachcomber::{voronoi, BoundingBox, Diagram, Error, FaceIdx, FortuneAlgorithm, Point};
use kurbo::Shape;

fn unit() -> BoundingBox {
    BoundingBox::new(0.0, 0.0, 1.0, 1.0)
}

fn margin() -> BoundingBox {
    BoundingBox::new(-0.1, -0.1, 1.1, 1.1)
}

fn close(a: Point, b: Point) -> bool {
    a.distance(b) < 1e-9
}

fn on_boundary(bbox: &BoundingBox, p: Point) -> bool {
    let eps = 1e-9;
    (p.x - bbox.left).abs() < eps
        || (p.x - bbox.right).abs() < eps
        || (p.y - bbox.bottom).abs() < eps
        || (p.y - bbox.top).abs() < eps
}

// Face boundaries may start anywhere, so compare up to rotation.
fn assert_cycle(actual: &[Point], expected: &[Point]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    let n = actual.len();
    let matches = (0..n).any(|shift| (0..n).all(|i| close(actual[(i + shift) % n], expected[i])));
    assert!(matches, "{actual:?} vs {expected:?}");
}

fn area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n).map(|i| points[i].det(points[(i + 1) % n])).sum::<f64>() / 2.0
}

fn triangle() -> [Point; 3] {
    [
        Point::new(0.2, 0.2),
        Point::new(0.8, 0.2),
        Point::new(0.5, 0.8),
    ]
}

#[test]
fn triangle_has_one_inner_vertex() {
    let diagram = voronoi(&triangle(), margin(), unit()).unwrap();
    diagram.check_invariants();
    assert_eq!(diagram.faces().count(), 3);

    let inner: Vec<_> = diagram
        .vertices()
        .map(|(_, v)| v.point)
        .filter(|p| !on_boundary(&unit(), *p))
        .collect();
    assert_eq!(inner.len(), 1);
    assert!(close(inner[0], Point::new(0.5, 0.425)));

    // Each of the three edges from the center reaches the box.
    let twinned = diagram
        .half_edges()
        .filter(|(_, he)| he.twin.is_some())
        .count();
    assert_eq!(twinned, 6);

    let total: f64 = diagram
        .faces()
        .map(|(f, _)| area(&diagram.face_points(f)))
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn triangle_sweep_stats() {
    let mut algo = FortuneAlgorithm::new(&triangle()).unwrap();
    algo.construct();
    let stats = algo.stats();
    assert_eq!(stats.site_events, 3);
    assert_eq!(stats.circle_events, 1);
}

#[test]
fn two_sites_split_the_box() {
    let points = [Point::new(0.3, 0.5), Point::new(0.7, 0.5)];
    let mut algo = FortuneAlgorithm::new(&points).unwrap();
    algo.construct();
    assert_eq!(algo.stats().circle_events, 0);
    algo.bound(margin());
    let mut diagram = algo.into_diagram();
    diagram.intersect(unit()).unwrap();
    diagram.check_invariants();

    let twinned: Vec<_> = diagram
        .half_edges()
        .filter(|(_, he)| he.twin.is_some())
        .collect();
    assert_eq!(twinned.len(), 2);
    for (_, he) in twinned {
        for v in [he.origin, he.destination] {
            let p = diagram.vertex(v.unwrap()).point;
            assert!((p.x - 0.5).abs() < 1e-12);
        }
    }

    assert_cycle(
        &diagram.face_points(FaceIdx::new(0)),
        &[
            Point::new(0.5, 0.0),
            Point::new(0.5, 1.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
        ],
    );
    assert_cycle(
        &diagram.face_points(FaceIdx::new(1)),
        &[
            Point::new(0.5, 1.0),
            Point::new(0.5, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ],
    );
    let centroids = diagram.centroids();
    assert!(close(centroids[0].unwrap(), Point::new(0.25, 0.5)));
    assert!(close(centroids[1].unwrap(), Point::new(0.75, 0.5)));
}

#[test]
fn lonely_site_gets_the_whole_box() {
    let mut algo = FortuneAlgorithm::new(&[Point::new(0.5, 0.5)]).unwrap();
    algo.construct();
    algo.bound(unit());
    let diagram = algo.diagram();
    diagram.check_invariants();
    assert_cycle(
        &diagram.face_points(FaceIdx::new(0)),
        &[
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ],
    );
    assert!(close(
        diagram.centroid(FaceIdx::new(0)).unwrap(),
        Point::new(0.5, 0.5)
    ));
}

#[test]
fn faces_are_counter_clockwise() {
    let points = [
        Point::new(0.15, 0.85),
        Point::new(0.45, 0.35),
        Point::new(0.7, 0.65),
        Point::new(0.9, 0.15),
        Point::new(0.3, 0.1),
    ];
    let diagram = voronoi(&points, margin(), unit()).unwrap();
    diagram.check_invariants();
    for (f, _) in diagram.faces() {
        let corners = diagram.face_points(f);
        assert!(area(&corners) > 0.0, "{f:?} runs clockwise");
        assert!((diagram.face_path(f).area().abs() - area(&corners)).abs() < 1e-12);
    }
}

#[test]
fn centroid_is_inside_its_face() {
    let points = [
        Point::new(0.1, 0.1),
        Point::new(0.9, 0.2),
        Point::new(0.6, 0.9),
        Point::new(0.3, 0.6),
    ];
    let diagram = voronoi(&points, margin(), unit()).unwrap();
    for (f, face) in diagram.faces() {
        let corners = diagram.face_points(f);
        let c = diagram.centroid(f).unwrap();
        for (i, &p0) in corners.iter().enumerate() {
            let p1 = corners[(i + 1) % corners.len()];
            assert!((p1 - p0).det(c - p0) >= -1e-12);
        }
        // Each site is closer to the centroid of its own cell than any
        // other site is.
        let own = diagram.site(face.site).point.distance(c);
        for site in diagram.sites() {
            assert!(site.point.distance(c) >= own - 1e-12);
        }
    }
}

#[test]
fn clipping_an_open_diagram_fails() {
    let mut algo = FortuneAlgorithm::new(&triangle()).unwrap();
    algo.construct();
    let mut diagram: Diagram = algo.into_diagram();
    assert_matches!(
        diagram.intersect(unit()),
        Err(Error::OpenBoundary { .. })
    );
}

#[test]
fn clipping_far_away_keeps_the_nearest_face() {
    let mut algo = FortuneAlgorithm::new(&triangle()).unwrap();
    algo.construct();
    algo.bound(margin());
    let mut diagram = algo.into_diagram();
    let far = BoundingBox::new(5.0, 5.0, 6.0, 6.0);
    diagram.intersect(far).unwrap();
    diagram.check_invariants();

    // The top site is the closest one to the box.
    assert!(diagram.face(FaceIdx::new(0)).outer_component.is_none());
    assert!(diagram.face(FaceIdx::new(1)).outer_component.is_none());
    assert_cycle(
        &diagram.face_points(FaceIdx::new(2)),
        &[
            Point::new(5.0, 6.0),
            Point::new(5.0, 5.0),
            Point::new(6.0, 5.0),
            Point::new(6.0, 6.0),
        ],
    );
}

#[test]
fn duplicates_are_rejected() {
    let points = [
        Point::new(0.2, 0.3),
        Point::new(0.5, 0.5),
        Point::new(0.2, 0.3),
    ];
    assert_matches!(
        voronoi(&points, margin(), unit()),
        Err(Error::DuplicateSite { first, second }) if first.index() == 0 && second.index() == 2
    );
    assert_matches!(
        FortuneAlgorithm::new(&[Point::new(f64::INFINITY, 0.0)]),
        Err(Error::Infinity)
    );
}

fn assert_tiles(diagram: &Diagram, bbox: &BoundingBox) {
    diagram.check_invariants();
    let total: f64 = diagram
        .faces()
        .map(|(f, _)| area(&diagram.face_points(f)))
        .sum();
    assert!(
        (total - bbox.width() * bbox.height()).abs() < 1e-9,
        "total area {total}"
    );
    for (f, face) in diagram.faces() {
        let site = diagram.site(face.site).point;
        for corner in diagram.face_points(f) {
            for other in diagram.sites() {
                assert!(other.point.distance(corner) >= site.distance(corner) - 1e-9);
            }
        }
    }
}

#[test]
fn hexagon_around_a_center() {
    // Some of the outer sites land exactly below a breakpoint.
    let mut points = vec![Point::new(0.5, 0.5)];
    points.extend((0..6).map(|k| {
        let angle = std::f64::consts::PI / 3.0 * k as f64;
        Point::new(0.5 + 0.3 * angle.cos(), 0.5 + 0.3 * angle.sin())
    }));
    let diagram = voronoi(&points, BoundingBox::new(-0.05, -0.05, 1.05, 1.05), unit()).unwrap();
    assert_tiles(&diagram, &unit());

    // The center cell is a regular hexagon whose apothem is half the radius.
    let center = diagram.face_points(FaceIdx::new(0));
    let expected = 2.0 * 3f64.sqrt() * 0.15 * 0.15;
    assert!((area(&center) - expected).abs() < 1e-9);
}

#[test]
fn bisectors_through_the_corners() {
    let points = [
        Point::new(0.5, 0.9),
        Point::new(0.1, 0.5),
        Point::new(0.9, 0.5),
        Point::new(0.5, 0.1),
    ];
    let diagram = voronoi(&points, margin(), unit()).unwrap();
    assert_tiles(&diagram, &unit());
    for (f, _) in diagram.faces() {
        assert!((area(&diagram.face_points(f)) - 0.25).abs() < 1e-9);
    }
}
