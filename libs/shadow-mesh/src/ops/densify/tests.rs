//! # Densification Tests
//!
//! Tests for boundary densification and both meshing strategies.

use super::*;
use approx::assert_relative_eq;
use config::constants::EPSILON;

fn unit_square() -> Polygon {
    Polygon::square(DVec2::ONE, false)
}

fn square_with_hole() -> Polygon {
    Polygon::with_holes(
        Polygon::square(DVec2::splat(4.0), false).outer,
        vec![vec![
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 3.0),
            DVec2::new(3.0, 3.0),
            DVec2::new(3.0, 1.0),
        ]],
    )
}

fn max_segment(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| ring[i].distance(ring[(i + 1) % n]))
        .fold(0.0, f64::max)
}

fn surface_area(surface: &Surface) -> f64 {
    surface
        .faces()
        .iter()
        .map(|f| surface.face_normal(f).length() / 2.0)
        .sum()
}

// =============================================================================
// DENSIFY TESTS
// =============================================================================

#[test]
fn test_unit_square_ten_segments_per_edge() {
    let dense = densify(&unit_square(), 10.0).unwrap();

    // 4 edges x 10 segments, shared corners counted once
    assert_eq!(dense.outer.len(), 40);
    assert!(max_segment(&dense.outer) <= 0.1 + 1e-12);

    // Every edge of the dense loop has the same length
    let n = dense.outer.len();
    for i in 0..n {
        let length = dense.outer[i].distance(dense.outer[(i + 1) % n]);
        assert_relative_eq!(length, 0.1, epsilon = 1e-12);
    }
}

#[test]
fn test_unit_square_keeps_corners() {
    let dense = densify(&unit_square(), 10.0).unwrap();
    for corner in &unit_square().outer {
        assert!(dense.outer.contains(corner), "missing corner {corner:?}");
    }
}

#[test]
fn test_no_duplicate_points() {
    let dense = densify(&unit_square(), 10.0).unwrap();
    let n = dense.outer.len();
    for i in 0..n {
        assert!(dense.outer[i].distance(dense.outer[(i + 1) % n]) > EPSILON);
    }
}

#[test]
fn test_short_edges_keep_endpoints_only() {
    let tiny = Polygon::square(DVec2::splat(0.05), false);
    let dense = densify(&tiny, 10.0).unwrap();
    assert_eq!(dense.outer, tiny.outer);
}

#[test]
fn test_footprint_preserved() {
    let polygon = Polygon::new(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(2.0, 0.3),
        DVec2::new(1.2, 1.7),
        DVec2::new(-0.4, 0.9),
    ]);
    let dense = densify(&polygon, 10.0).unwrap();

    assert_relative_eq!(dense.area(), polygon.area(), epsilon = 1e-9);
    assert_relative_eq!(dense.perimeter(), polygon.perimeter(), epsilon = 1e-9);
    for p in &dense.outer {
        assert!(polygon.boundary_distance(*p) < 1e-9);
    }
    assert!(max_segment(&dense.outer) <= 0.1 + 1e-12);
}

#[test]
fn test_holes_densified() {
    let dense = densify(&square_with_hole(), 10.0).unwrap();
    assert_eq!(dense.outer.len(), 160);
    assert_eq!(dense.holes.len(), 1);
    assert_eq!(dense.holes[0].len(), 80);
    assert_relative_eq!(dense.area(), 12.0, epsilon = 1e-9);
}

#[test]
fn test_repeated_points_dropped() {
    let mut polygon = unit_square();
    polygon.outer.push(DVec2::ZERO); // explicitly closed loop
    polygon.outer.insert(1, DVec2::ZERO);
    let dense = densify(&polygon, 10.0).unwrap();
    assert_eq!(dense.outer.len(), 40);
}

#[test]
fn test_invalid_density() {
    for density in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let result = densify(&unit_square(), density);
        assert!(
            matches!(result, Err(ShadowError::Configuration { .. })),
            "density {density} should be rejected"
        );
    }
}

#[test]
fn test_resource_limit_before_work() {
    // 100 x 100 square at density 10 -> 1,000,000 estimated points
    let big = Polygon::square(DVec2::splat(100.0), false);
    let err = densify(&big, 10.0).unwrap_err();
    assert_eq!(
        err,
        ShadowError::ResourceLimit {
            estimated: 1_000_000,
            limit: MAX_DENSIFIED_POINTS,
        }
    );
}

#[test]
fn test_resource_limit_at_ceiling_is_allowed() {
    // area 1000 * 10^2 = 100,000 exactly
    let polygon = Polygon::square(DVec2::new(100.0, 10.0), false);
    assert!(densify(&polygon, 10.0).is_ok());
}

#[test]
fn test_resource_limit_thin_polygon() {
    // Almost no area, but a 200,000 unit boundary
    let sliver = Polygon::new(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0e5, 0.0),
        DVec2::new(0.0, 1.0e-8),
    ]);
    assert!(sliver.area() * 100.0 < 1.0);

    let err = densify(&sliver, 10.0).unwrap_err();
    match err {
        ShadowError::ResourceLimit { estimated, limit } => {
            assert!(estimated >= 2_000_000);
            assert_eq!(limit, MAX_DENSIFIED_POINTS);
        }
        other => panic!("expected a resource limit, got {other:?}"),
    }
    assert!(matches!(
        mesh_polygon(&sliver, &DensifyConfig::default()),
        Err(ShadowError::ResourceLimit { .. })
    ));
}

#[test]
fn test_invalid_polygon() {
    let line = Polygon::new(vec![DVec2::ZERO, DVec2::X]);
    assert!(matches!(
        densify(&line, 10.0),
        Err(ShadowError::InvalidPolygon { .. })
    ));
}

#[test]
fn test_collapsed_loop_rejected() {
    let point = Polygon::new(vec![DVec2::ONE, DVec2::ONE, DVec2::ONE]);
    assert!(matches!(
        densify(&point, 10.0),
        Err(ShadowError::InvalidPolygon { .. })
    ));
}

// =============================================================================
// MESHER TESTS
// =============================================================================

#[test]
fn test_mesher_kind_from_str() {
    assert_eq!("boundary".parse::<MesherKind>().unwrap(), MesherKind::Boundary);
    assert_eq!(
        "conforming".parse::<MesherKind>().unwrap(),
        MesherKind::Conforming
    );

    let err = "gmsh".parse::<MesherKind>().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("boundary"));
    assert!(message.contains("conforming"));
}

#[test]
fn test_mesher_names() {
    assert_eq!(MesherKind::Boundary.mesher().name(), "boundary");
    assert_eq!(MesherKind::Conforming.mesher().name(), "conforming");
}

#[test]
fn test_boundary_mesher_square() {
    let surface = mesh_polygon(&unit_square(), &DensifyConfig::default()).unwrap();

    // Only the 40 boundary points, all referenced
    assert_eq!(surface.vertex_count(), 40);
    // A triangulated simple polygon with n points has n - 2 faces
    assert_eq!(surface.face_count(), 38);
    assert_relative_eq!(surface_area(&surface), 1.0, epsilon = 1e-9);
    assert_eq!(surface.free_boundary_edges().len(), 40);
}

#[test]
fn test_faces_counter_clockwise_and_flat() {
    for mesher in [MesherKind::Boundary, MesherKind::Conforming] {
        let config = DensifyConfig {
            mesher,
            ..Default::default()
        };
        let surface = mesh_polygon(&square_with_hole(), &config).unwrap();
        for face in surface.faces() {
            assert!(surface.face_normal(face).z > 0.0);
        }
        for v in surface.vertices() {
            assert_eq!(v.z, 0.0);
        }
    }
}

#[test]
fn test_hole_left_empty() {
    for mesher in [MesherKind::Boundary, MesherKind::Conforming] {
        let config = DensifyConfig {
            mesher,
            ..Default::default()
        };
        let polygon = square_with_hole();
        let surface = mesh_polygon(&polygon, &config).unwrap();
        assert_relative_eq!(surface_area(&surface), 12.0, epsilon = 1e-6);

        for face in surface.faces() {
            let c = face
                .iter()
                .map(|&i| surface.vertex(i).truncate())
                .fold(DVec2::ZERO, |acc, p| acc + p)
                / 3.0;
            assert!(polygon.contains(c), "face centroid {c:?} outside polygon");
        }
    }
}

#[test]
fn test_conforming_adds_interior_points() {
    let config = DensifyConfig {
        mesher: MesherKind::Conforming,
        ..Default::default()
    };
    let polygon = unit_square();
    let surface = mesh_polygon(&polygon, &config).unwrap();

    assert!(surface.vertex_count() > 40);
    assert_relative_eq!(surface_area(&surface), 1.0, epsilon = 1e-9);
    let interior = surface
        .vertices()
        .iter()
        .filter(|v| polygon.boundary_distance(v.truncate()) > 1e-9)
        .count();
    assert!(interior > 0);
}

#[test]
fn test_mesh_keeps_every_boundary_point() {
    for mesher in [MesherKind::Boundary, MesherKind::Conforming] {
        let config = DensifyConfig {
            mesher,
            ..Default::default()
        };
        let dense = densify(&unit_square(), config.density).unwrap();
        let surface = mesh_polygon(&unit_square(), &config).unwrap();
        for p in &dense.outer {
            assert!(
                surface
                    .vertices()
                    .iter()
                    .any(|v| v.truncate().distance(*p) < 1e-12),
                "boundary point {p:?} missing"
            );
        }
    }
}

#[test]
fn test_mesh_polygon_validates_config() {
    let config = DensifyConfig {
        density: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        mesh_polygon(&unit_square(), &config),
        Err(ShadowError::Configuration { .. })
    ));
}

#[test]
fn test_self_intersecting_polygon_fails() {
    let bowtie = Polygon::new(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 1.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(0.0, 1.0),
    ]);
    let result = mesh_polygon(&bowtie, &DensifyConfig::default());
    assert!(matches!(result, Err(ShadowError::Triangulation { .. })));
}

#[test]
fn test_config_serde_defaults() {
    let config: DensifyConfig = serde_json::from_str(r#"{"mesher":"conforming"}"#).unwrap();
    assert_eq!(config.density, DEFAULT_DENSITY);
    assert_eq!(config.mesher, MesherKind::Conforming);
}
