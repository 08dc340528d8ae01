// Scoring functions registered in the portfolio
//
// Every heuristic is a pure function of a `GameSnapshot`; higher is better
// before weighting.

pub mod collision;
pub mod food;
pub mod health;
pub mod space;

pub use collision::{avoid_collisions, is_unsafe_move};
pub use food::{nearest_food_distance, nearest_food_path_distance, team_food_race};
pub use health::team_health;
pub use space::move_space;
