// Food proximity heuristics
//
// `nearest_food_distance` is a straight-line measure from `you`'s head.
// `team_food_race` compares how far each side has to travel to its nearest
// food on the current board; it does not look ahead.

use crate::pathfinding::AStar;
use crate::profile;
use crate::snapshot::GameSnapshot;
use crate::types::Coord;

pub const FOOD_RACE_CLAMP: f64 = 100.0;

/// Euclidean distance from `you`'s head to the closest food
///
/// Positive infinity when the board has no food.
pub fn nearest_food_distance(snapshot: &GameSnapshot) -> f64 {
    profile!("food", {
        let head = snapshot.you().head;
        snapshot
            .food()
            .iter()
            .map(|food| head.euclidean_distance(food))
            .fold(f64::INFINITY, f64::min)
    })
}

/// Bounded A* distance from `start` to the closest reachable food
///
/// 0 when the board has no food; `astar.max_distance` when none is reachable.
pub fn nearest_food_path_distance(start: Coord, snapshot: &GameSnapshot, astar: &AStar) -> f64 {
    if snapshot.food().is_empty() {
        return 0.0;
    }

    snapshot
        .food()
        .iter()
        .map(|food| astar.distance(start, *food, snapshot))
        .fold(astar.max_distance, f64::min)
}

/// Own team's summed food distance minus the opponents', clamped to `±clamp`
pub fn team_food_race_with(snapshot: &GameSnapshot, astar: &AStar, clamp: f64) -> f64 {
    let ours: f64 = snapshot
        .your_team()
        .map(|snake| nearest_food_path_distance(snake.head, snapshot, astar))
        .sum();
    let theirs: f64 = snapshot
        .opponents()
        .map(|snake| nearest_food_path_distance(snake.head, snapshot, astar))
        .sum();

    (ours - theirs).max(-clamp).min(clamp)
}

/// Team food race with the default A* budget and a clamp of 100
pub fn team_food_race(snapshot: &GameSnapshot) -> f64 {
    team_food_race_with(snapshot, &AStar::default(), FOOD_RACE_CLAMP)
}
