// Heuristic behaviour on hand-built and randomized boards
//
// Randomized cases use a fixed seed so failures reproduce.

mod common;

use common::{board, snake, snapshot};
use portfolio_snake::flood_fill::{open_space_count, OccupancyGrid};
use portfolio_snake::heuristics::{
    avoid_collisions, is_unsafe_move, nearest_food_distance, team_food_race,
};
use portfolio_snake::pathfinding::{shortest_distance, MAX_DISTANCE};
use portfolio_snake::types::{Battlesnake, Coord, Direction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A snake whose body is a short random walk from a random head
fn random_snake(rng: &mut StdRng, id: usize, width: i32, height: i32) -> Battlesnake {
    let mut current = Coord::new(rng.random_range(0..width), rng.random_range(0..height));
    let mut body = vec![(current.x, current.y)];
    let length = rng.random_range(1..=5);

    for _ in 1..length {
        let dir = Direction::all()[rng.random_range(0..4)];
        let next = dir.apply(&current);
        if next.x >= 0 && next.x < width && next.y >= 0 && next.y < height {
            current = next;
        }
        body.push((current.x, current.y));
    }

    let mut s = snake(&format!("snake-{}", id), &body);
    if rng.random_bool(0.5) {
        s.squad = Some(if rng.random_bool(0.5) { "red" } else { "blue" }.to_string());
    }
    s
}

fn random_cells(rng: &mut StdRng, count: usize, width: i32, height: i32) -> Vec<(i32, i32)> {
    (0..count)
        .map(|_| (rng.random_range(0..width), rng.random_range(0..height)))
        .collect()
}

#[test]
fn test_straight_line_distance_to_food() {
    let b = board(7, 7, vec![snake("you", &[(3, 3)])], &[(3, 0)], &[]);
    let s = snapshot(&b);
    assert_eq!(shortest_distance(Coord::new(3, 3), Coord::new(3, 0), &s), 3.0);
}

#[test]
fn test_boxed_in_corner() {
    // neck above, own tail to the right; both remaining sides are walls
    let b = board(
        7,
        7,
        vec![snake("you", &[(0, 0), (0, 1), (1, 1), (1, 0)])],
        &[],
        &[],
    );
    let s = snapshot(&b);
    let head = s.you().head;

    let mut grid = OccupancyGrid::from_snapshot(&s);
    assert_eq!(open_space_count(head, &mut grid), 0);

    let forward = s.forward_moves(s.you());
    assert_eq!(forward.len(), 3);
    for dir in &forward {
        assert!(is_unsafe_move(&dir.apply(&head), &s), "{:?} should be unsafe", dir);
    }
    assert_eq!(avoid_collisions(&s), -10.0 * forward.len() as f64);
}

#[test]
fn test_heads_with_a_gap_between_are_safe() {
    let b = board(
        7,
        7,
        vec![
            snake("you", &[(1, 3), (0, 3)]),
            snake("other", &[(4, 3), (5, 3)]),
        ],
        &[],
        &[],
    );
    let s = snapshot(&b);
    let head = s.you().head;

    let forward = s.forward_moves(s.you());
    assert!(forward.iter().all(|dir| !is_unsafe_move(&dir.apply(&head), &s)));
    assert_eq!(avoid_collisions(&s), forward.len() as f64);
}

#[test]
fn test_equidistant_food_returns_shared_distance() {
    let b = board(7, 7, vec![snake("you", &[(3, 3)])], &[(1, 3), (3, 5)], &[]);
    assert_eq!(nearest_food_distance(&snapshot(&b)), 2.0);
}

#[test]
fn test_collision_score_drops_as_threats_are_added() {
    // head at (3,3) moving up; blockers fill forward cells one by one
    let blockers = [(3, 4), (2, 3), (4, 3)];
    let mut previous = f64::INFINITY;

    for n in 0..=blockers.len() {
        let mut snakes = vec![snake("you", &[(3, 3), (3, 2)])];
        for (i, cell) in blockers.iter().take(n).enumerate() {
            // blocker heads sit in a far corner
            snakes.push(snake(&format!("wall-{}", i), &[(0, 6), *cell]));
        }
        let score = avoid_collisions(&snapshot(&board(7, 7, snakes, &[], &[])));

        assert_eq!(score, (3 - n) as f64 - 10.0 * n as f64);
        assert!(score < previous);
        previous = score;
    }
}

#[test]
fn test_open_grid_distance_is_manhattan() {
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..200 {
        let width = rng.random_range(1..=20);
        let height = rng.random_range(1..=20);
        let start = Coord::new(rng.random_range(0..width), rng.random_range(0..height));
        let goal = Coord::new(rng.random_range(0..width), rng.random_range(0..height));

        let b = board(width, height, vec![snake("you", &[(start.x, start.y)])], &[], &[]);
        let distance = shortest_distance(start, goal, &snapshot(&b));

        assert_eq!(
            distance,
            f64::from(start.manhattan_distance(&goal)),
            "{:?} -> {:?} on {}x{}",
            start,
            goal,
            width,
            height
        );
    }
}

#[test]
fn test_full_wall_gives_sentinel_distance() {
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..100 {
        let width = rng.random_range(3..=19);
        let height = rng.random_range(1..=19);
        let wall_x = rng.random_range(1..width - 1);
        let wall: Vec<(i32, i32)> = (0..height).map(|y| (wall_x, y)).collect();

        let start = Coord::new(rng.random_range(0..wall_x), rng.random_range(0..height));
        let goal = Coord::new(rng.random_range(wall_x + 1..width), rng.random_range(0..height));

        let b = board(width, height, vec![snake("you", &[(start.x, start.y)])], &[], &wall);
        assert_eq!(shortest_distance(start, goal, &snapshot(&b)), MAX_DISTANCE);
    }
}

#[test]
fn test_empty_board_flood_fill_counts_every_cell() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..100 {
        let width = rng.random_range(1..=25);
        let height = rng.random_range(1..=25);
        let start = Coord::new(rng.random_range(0..width), rng.random_range(0..height));

        let mut grid = OccupancyGrid::new(width, height);
        assert_eq!(open_space_count(start, &mut grid), (width * height) as usize);

        let mut grid = OccupancyGrid::new(width, height);
        grid.occupy(&start);
        assert_eq!(open_space_count(start, &mut grid), 0);
    }
}

#[test]
fn test_collision_score_matches_move_classification() {
    let mut rng = StdRng::seed_from_u64(31337);

    for _ in 0..200 {
        let width = rng.random_range(3..=15);
        let height = rng.random_range(3..=15);
        let count = rng.random_range(1..=6);
        let snakes = (0..count)
            .map(|i| random_snake(&mut rng, i, width, height))
            .collect();
        let s = snapshot(&board(width, height, snakes, &[], &[]));

        let head = s.you().head;
        let forward = s.forward_moves(s.you());
        let unsafe_moves = forward
            .iter()
            .filter(|dir| is_unsafe_move(&dir.apply(&head), &s))
            .count();
        let safe = forward.len() - unsafe_moves;

        let score = avoid_collisions(&s);
        assert_eq!(score, safe as f64 - 10.0 * unsafe_moves as f64);
        if unsafe_moves == 0 {
            assert_eq!(score, forward.len() as f64);
        }
    }
}

#[test]
fn test_food_race_stays_clamped() {
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..100 {
        let width = rng.random_range(2..=25);
        let height = rng.random_range(2..=25);
        let count = rng.random_range(1..=8);
        let snakes = (0..count)
            .map(|i| random_snake(&mut rng, i, width, height))
            .collect();
        let food_count = rng.random_range(0..=6);
        let food = random_cells(&mut rng, food_count, width, height);
        let hazard_count = rng.random_range(0..=20);
        let hazards = random_cells(&mut rng, hazard_count, width, height);

        let score = team_food_race(&snapshot(&board(width, height, snakes, &food, &hazards)));
        assert!((-100.0..=100.0).contains(&score), "food race {} out of range", score);
    }
}

#[test]
fn test_nearest_food_infinite_only_without_food() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..100 {
        let width = rng.random_range(1..=19);
        let height = rng.random_range(1..=19);
        let food_count = rng.random_range(0..=3);
        let food = random_cells(&mut rng, food_count, width, height);
        let you = random_snake(&mut rng, 0, width, height);

        let distance = nearest_food_distance(&snapshot(&board(width, height, vec![you], &food, &[])));
        assert_eq!(distance.is_infinite(), food.is_empty());
        assert!(distance >= 0.0);
    }
}
