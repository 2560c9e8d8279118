//! End-to-end behaviour across the kernel crates.

use approx::assert_relative_eq;
use halfspace::halfspace_algebra::BnId;
use halfspace::{
    Algebra, Cylinder, HeadRule, LineTrack, Model, Plane, Point3, Simplified, Sphere,
    SurfaceRegistry, TrackError, TrackState, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn plane_and_sphere() -> SurfaceRegistry {
    let mut registry = SurfaceRegistry::new();
    registry.register(1, Plane::px(0.0)).unwrap();
    registry
        .register(2, Sphere::new(Point3::origin(), 5.0).unwrap())
        .unwrap();
    registry
}

/// Five surfaces that cut the sampling box in different ways.
fn mixed_registry() -> SurfaceRegistry {
    let mut registry = plane_and_sphere();
    registry.register(3, Plane::py(1.0)).unwrap();
    registry
        .register(4, Cylinder::new(Point3::origin(), Vec3::z(), 3.0).unwrap())
        .unwrap();
    registry.register(5, Plane::pz(-2.0)).unwrap();
    registry
}

const EXPRESSIONS: &[&str] = &[
    "1 -2",
    "1 2 + 1 -2",
    "1 (2 + -3) #(4 5)",
    "#(1 + -2) 3 : -4 -5",
    "(1 + 2) (3 + 4) (-5 + 1)",
    "1 2 3 + -1 2 3 + 4",
    "#(#(1 2) + 3)",
];

fn row(bits: u32) -> impl Fn(i32) -> bool {
    move |lit| ((bits >> (lit.unsigned_abs() - 1)) & 1 == 1) == (lit > 0)
}

#[test]
fn containment_of_plane_and_sphere() {
    let registry = plane_and_sphere();
    let rule = HeadRule::parse("1 -2").unwrap();
    assert!(rule.is_valid(&registry, &Point3::new(1.0, 1.0, 1.0)).unwrap());
    assert!(!rule.is_valid(&registry, &Point3::new(10.0, 10.0, 10.0)).unwrap());
    assert!(!rule.is_valid(&registry, &Point3::new(-1.0, 1.0, 1.0)).unwrap());
}

#[test]
fn display_round_trips_through_parse() {
    let algebra = Algebra::default();
    for expr in EXPRESSIONS {
        let rule = HeadRule::parse(expr).unwrap();
        let reparsed = HeadRule::parse(&rule.display()).unwrap();
        assert_eq!(reparsed.display(), rule.display(), "{expr}");
        assert_eq!(algebra.equivalent(&rule, &reparsed), Some(true), "{expr}");
    }
}

#[test]
fn tautological_pair_minimizes_to_single_surface() {
    let result = Algebra::default().simplify_str("1 2 + 1 -2").unwrap();
    match result.outcome {
        Simplified::Rule(rule) => assert_eq!(rule.display(), "1"),
        other => panic!("expected a rule, got {other:?}"),
    }
}

#[test]
fn minimized_rules_agree_at_sampled_points() {
    let registry = mixed_registry();
    let algebra = Algebra::default();
    let mut rng = StdRng::seed_from_u64(42);

    for expr in EXPRESSIONS {
        let rule = HeadRule::parse(expr).unwrap();
        let outcome = algebra.simplify(&rule).outcome;

        // Every corner of the truth table
        for bits in 0..32 {
            assert_eq!(
                rule.evaluate_with(row(bits)),
                outcome.evaluate_with(row(bits)),
                "{expr} at {bits:05b}"
            );
        }

        let minimal = match &outcome {
            Simplified::Rule(minimal) => minimal.clone(),
            Simplified::AlwaysTrue => HeadRule::new(),
            Simplified::AlwaysFalse => continue,
        };
        for _ in 0..500 {
            let p = Point3::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
            );
            assert_eq!(
                rule.is_valid(&registry, &p).unwrap(),
                minimal.is_valid(&registry, &p).unwrap(),
                "{expr} at {p}"
            );
        }
    }
}

#[test]
fn minimization_is_idempotent() {
    let algebra = Algebra::default();
    for expr in EXPRESSIONS {
        let once = algebra.simplify_str(expr).unwrap();
        let Simplified::Rule(rule) = &once.outcome else {
            continue;
        };
        let twice = algebra.simplify(rule);
        assert_eq!(twice.literal_count, once.literal_count, "{expr}");
    }
}

#[test]
fn implicants_merge_on_single_difference() {
    let a = BnId::from_minterm(4, 0b0101);
    let b = BnId::from_minterm(4, 0b0111);
    let merged = a.combine(&b).unwrap();
    assert_eq!(merged.covers().iter().copied().collect::<Vec<_>>(), vec![0b0101, 0b0111]);
    assert_eq!(merged.dont_care_count(), 1);

    let c = BnId::from_minterm(4, 0b1110);
    assert!(a.combine(&c).is_none());
}

#[test]
fn sphere_track_lengths() {
    let mut registry = SurfaceRegistry::new();
    registry
        .register(1, Sphere::new(Point3::origin(), 5.0).unwrap())
        .unwrap();
    let mut model = Model::new(registry);
    model.add_cell(10, "1", "void").unwrap();
    model.add_cell(20, "-1", "A").unwrap();
    let model = model.freeze();

    let mut track =
        LineTrack::new(Point3::new(-10.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)).unwrap();
    track.calculate(&model).unwrap();
    assert_eq!(track.state(), TrackState::Complete);

    let materials: Vec<&str> = track.segments().iter().map(|s| s.material.as_str()).collect();
    assert_eq!(materials, vec!["void", "A", "void"]);

    let crossings: Vec<f64> = track.segments()[..2]
        .iter()
        .map(|s| -10.0 + s.exit_distance)
        .collect();
    assert_relative_eq!(crossings[0], -5.0, epsilon = 1e-9);
    assert_relative_eq!(crossings[1], 5.0, epsilon = 1e-9);

    let expected = [5.0, 10.0, 5.0];
    for (segment, want) in track.segments().iter().zip(expected) {
        assert_relative_eq!(segment.length(), want, epsilon = 1e-9);
    }
    assert_relative_eq!(track.total_length(), 20.0, epsilon = 1e-9);
}

#[test]
fn three_owners_are_ambiguous() {
    let mut model = Model::new(plane_and_sphere());
    model.add_cell(1, "-1", "A").unwrap();
    model.add_cell(2, "1", "void").unwrap();
    model.add_cell(3, "1 -2 + 1 2", "void").unwrap();
    let model = model.freeze();

    let mut track =
        LineTrack::new(Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)).unwrap();
    let err = track.calculate(&model).unwrap_err();
    assert_eq!(track.state(), TrackState::Failed);
    match err {
        TrackError::IncompleteTrack { segments, source } => {
            assert_eq!(segments.len(), 1);
            assert_eq!(
                *source,
                TrackError::AmbiguousNeighbor {
                    surface: 1,
                    cells: vec![2, 3]
                }
            );
        }
        other => panic!("expected an incomplete track, got {other:?}"),
    }
}

#[test]
fn simplified_model_tracks_the_same() {
    let mut model = Model::new(plane_and_sphere());
    model.add_cell(1, "-2 1 + -2 1", "A").unwrap();
    model.add_cell(2, "#(1 -2)", "void").unwrap();
    model.add_cell(3, "1 -1 2", "ghost").unwrap();
    assert_eq!(model.simplify_cells(&Algebra::default()), vec![3]);
    assert_eq!(model.cell(1).unwrap().rule().display(), "1 -2");
    let model = model.freeze();

    let pairs = [
        (Point3::new(-10.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)),
        (Point3::new(1.0, -10.0, 0.0), Point3::new(1.0, 10.0, 0.0)),
    ];
    let tracks = model.trace_all(&pairs);
    let first = tracks[0].as_ref().unwrap();
    assert_eq!(first.cells(), vec![2, 1, 2]);
    assert_relative_eq!(first.material_lengths()["A"], 5.0, epsilon = 1e-9);

    let second = tracks[1].as_ref().unwrap();
    assert_eq!(second.cells(), vec![2, 1, 2]);
    let chord = 2.0 * (25.0f64 - 1.0).sqrt();
    assert_relative_eq!(second.material_lengths()["A"], chord, epsilon = 1e-9);
}

#[test]
fn track_from_boundary_of_complement_cell() {
    let mut model = Model::new(plane_and_sphere());
    model.add_cell(1, "1 -2", "A").unwrap();
    model.add_cell(2, "#(1 -2)", "void").unwrap();
    let model = model.freeze();

    let on_sphere = Point3::new(5.0, 0.0, 0.0);
    let mut outward = LineTrack::new(on_sphere, Point3::new(10.0, 0.0, 0.0)).unwrap();
    outward.calculate(&model).unwrap();
    assert_eq!(outward.cells(), vec![2]);
    assert_relative_eq!(outward.material_lengths()["void"], 5.0, epsilon = 1e-9);

    let mut inward = LineTrack::new(on_sphere, Point3::new(-1.0, 0.0, 0.0)).unwrap();
    inward.calculate(&model).unwrap();
    assert_eq!(inward.cells(), vec![1, 2]);
    assert_relative_eq!(inward.material_lengths()["A"], 5.0, epsilon = 1e-9);
}
