use diffused_rays::core::maps::test_map;
use diffused_rays::core::{GridMap, MoveOutcome, NonFiniteInputError, Player};

const NEIGHBOURS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[test]
fn moving_into_any_adjacent_wall_is_an_idempotent_no_op() {
    let map = test_map().unwrap();
    let mut checked = 0;

    for (col, row, code) in map.cells() {
        if GridMap::is_wall(code) {
            continue;
        }
        for (dx, dy) in NEIGHBOURS {
            if !map.is_wall_cell(col as i64 + dx, row as i64 + dy) {
                continue;
            }
            let start = (col as f64 + 0.5, row as f64 + 0.5);
            let mut player = Player::spawn(start.0, start.1, 0.0, &map).unwrap();

            for step in [0.6, 1.0, 3.0] {
                for _ in 0..2 {
                    let outcome = player
                        .try_move(dx as f64 * step, dy as f64 * step, &map)
                        .unwrap();
                    assert_eq!(outcome, MoveOutcome::Rejected);
                    assert_eq!(player.position(), start, "cell ({col}, {row}) step {step}");
                }
            }
            checked += 1;
        }
    }
    assert!(checked > 0);
}

#[test]
fn diagonal_request_keeps_the_open_axis() {
    let map = test_map().unwrap();
    let mut player = Player::spawn(1.5, 1.5, 0.0, &map).unwrap();

    // West is the outer wall, south is open floor.
    let outcome = player.try_move(-1.0, 1.0, &map).unwrap();
    assert_eq!(outcome, MoveOutcome::Partial);
    assert_eq!(player.position(), (1.5, 2.5));
}

#[test]
fn position_never_enters_a_wall_during_a_random_walk() {
    let map = test_map().unwrap();
    let mut player = Player::spawn(5.0, 5.0, 0.0, &map).unwrap();

    // Deterministic pseudo-random sequence of turns and steps.
    let mut state: u32 = 0x9e37_79b9;
    for _ in 0..5_000 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let turn = (state % 1000) as f64 / 1000.0 - 0.5;
        let step = ((state >> 10) % 1000) as f64 / 1000.0 * 0.8 - 0.2;

        player.rotate(turn).unwrap();
        player.forward(step, &map).unwrap();
        let (x, y) = player.position();
        assert!(!map.is_wall_at(x, y), "inside wall at ({x}, {y})");
    }
}

#[test]
fn non_finite_movement_is_reported_and_ignored() {
    let map = test_map().unwrap();
    let mut player = Player::spawn(5.0, 5.0, 1.0, &map).unwrap();

    let err = player.forward(f64::INFINITY, &map).unwrap_err();
    assert_eq!(err.field, "distance");
    assert!(matches!(
        player.rotate(f64::NAN),
        Err(NonFiniteInputError { field: "rotation", .. })
    ));
    assert_eq!(player.position(), (5.0, 5.0));
    assert_eq!(player.heading(), 1.0);
}
