// Library exports for the Battlesnake bot
// This allows the replay tool and the server binary to share the evaluation engine

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod flood_fill;
pub mod heuristics;
pub mod pathfinding;
pub mod portfolio;
pub mod replay;
pub mod simple_profiler;
pub mod snapshot;
pub mod types;

#[cfg(test)]
mod test_utils;
