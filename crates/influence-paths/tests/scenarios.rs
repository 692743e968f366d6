use influence_paths::{
    BlockingRequirement, CostField, FieldState, MapError, Measurement, ObstacleMask, Point,
    ScanEngine,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// 9×9 room, border walls, a wall segment on row 4 leaving gaps at x=1..2
/// and x=7.
const ROOM: &str = "
#########
#.......#
#.......#
#.......#
#..####.#
#.......#
#.......#
#.......#
#########";

fn room() -> CostField {
    CostField::from_ascii(ROOM, '#', Measurement::Euclidean).unwrap()
}

fn reference_path() -> Vec<Point> {
    [(4, 5), (3, 5), (2, 5), (2, 4), (2, 3), (3, 3)]
        .into_iter()
        .map(Point::from)
        .collect()
}

#[test]
fn room_path_goes_through_the_left_gap() {
    let field = room();
    let mut engine = ScanEngine::new(&field);
    engine.add_goal(Point::new(3, 3), 0.0).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);

    let path = engine
        .find_path(Point::new(5, 5), 10, &ObstacleMask::none(), &mut rng)
        .unwrap();
    assert_eq!(path, reference_path());

    let mut prev = engine.value_at(Point::new(5, 5)).unwrap();
    assert_eq!(prev, 6.0);
    for &p in &path {
        let v = engine.value_at(p).unwrap();
        assert!(v < prev, "{p}: {v} >= {prev}");
        prev = v;
    }
    assert_eq!(prev, 0.0);
}

#[test]
fn partial_scans_then_prescanned_path() {
    let field = room();
    let mut engine = ScanEngine::new(&field);
    engine.add_goal(Point::new(3, 3), 0.0).unwrap();
    let mask = ObstacleMask::none();

    let mut frames = 0;
    while engine.state() != FieldState::Full {
        engine.partial_scan(8, &mask).unwrap();
        frames += 1;
    }
    // 45 open cells at 8 per frame.
    assert_eq!(engine.mapped_count(), 45);
    assert_eq!(frames, 6);

    let mut rng = StdRng::seed_from_u64(1);
    let path = engine.find_path_prescanned(Point::new(5, 5), &mut rng).unwrap();
    assert_eq!(path, reference_path());
}

#[test]
fn blocking_the_left_gap_reroutes_right() {
    let field = room();
    let mut engine = ScanEngine::new(&field);
    engine.add_goal(Point::new(3, 3), 0.0).unwrap();
    let mask = ObstacleMask::new([Point::new(1, 4), Point::new(2, 4)]);
    let mut rng = StdRng::seed_from_u64(3);

    let path = engine
        .find_path(Point::new(5, 5), 20, &mask, &mut rng)
        .unwrap();
    assert!(path.contains(&Point::new(7, 4)));
    assert_eq!(path.last(), Some(&Point::new(3, 3)));
    assert_eq!(path.len(), 8);
}

#[test]
fn corner_squeeze_depends_on_requirement() {
    let field = CostField::from_ascii(
        "
#####
#.#.#
##..#
#####",
        '#',
        Measurement::Chebyshev,
    )
    .unwrap();
    let goal = Point::new(1, 1);
    let start = Point::new(2, 2);
    let mut rng = StdRng::seed_from_u64(0);

    let mut engine = ScanEngine::new(&field);
    engine.add_goal(goal, 0.0).unwrap();
    let path = engine
        .find_path(start, 5, &ObstacleMask::none(), &mut rng)
        .unwrap();
    assert!(path.is_empty());

    engine.set_blocking_requirement(BlockingRequirement::try_from(0).unwrap());
    let path = engine
        .find_path(start, 5, &ObstacleMask::none(), &mut rng)
        .unwrap();
    assert_eq!(path, vec![goal]);
}

#[test]
fn misuse_is_reported() {
    let field = room();
    let mut engine = ScanEngine::new(&field);
    assert_eq!(
        engine.add_goal(Point::new(0, 0), 0.0),
        Err(MapError::InvalidGoal(Point::new(0, 0)))
    );
    assert!(matches!(
        engine.add_goal(Point::new(9, 0), 0.0),
        Err(MapError::OutOfBounds { .. })
    ));
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        engine.find_path_prescanned(Point::new(5, 5), &mut rng),
        Err(MapError::StaleField)
    );
    assert_eq!(
        BlockingRequirement::try_from(3),
        Err(MapError::InvalidBlockingRequirement(3))
    );
}
