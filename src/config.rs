// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub pathfinding: PathfindingConfig,
    pub scores: ScoresConfig,
    pub heuristics: Vec<HeuristicWeightConfig>,
    pub move_generation: MoveGenerationConfig,
    pub game_rules: GameRulesConfig,
    pub appearance: AppearanceConfig,
    pub debug: DebugConfig,
}

/// Timing and performance constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
    pub polling_interval_ms: u64,
    pub min_time_remaining_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }

    /// Effective budget for a game whose engine allows `game_timeout_ms` per move
    pub fn budget_for_timeout_ms(&self, game_timeout_ms: u64) -> u64 {
        self.response_time_budget_ms
            .min(game_timeout_ms)
            .saturating_sub(self.network_overhead_ms)
    }
}

/// Bounds on a single A* search
#[derive(Debug, Deserialize, Clone)]
pub struct PathfindingConfig {
    /// Expansions before the search gives up
    pub max_iterations: usize,
    /// Distance reported when the goal is unreachable or the budget runs out
    pub max_distance: f64,
}

/// Heuristic tuning constants
#[derive(Debug, Deserialize, Clone)]
pub struct ScoresConfig {
    /// Cost of each unsafe forward move in the head-to-head heuristic
    pub unsafe_move_penalty: f64,
    /// Symmetric bound on the team food race score
    pub food_race_clamp: f64,
    /// Largest magnitude a single weighted contribution may add to a total
    pub contribution_cap: f64,
}

/// One portfolio entry: which heuristic and how much it counts
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HeuristicWeightConfig {
    pub name: String,
    pub weight: f64,
}

/// Move generation constants
#[derive(Debug, Deserialize, Clone)]
pub struct MoveGenerationConfig {
    /// Trailing segments that vacate the board on the next turn
    pub body_tail_offset: usize,
}

/// Game rules constants
#[derive(Debug, Deserialize, Clone)]
pub struct GameRulesConfig {
    pub health_on_food: u8,
    pub health_loss_per_turn: u8,
    pub hazard_damage: u8,
}

/// Snake customization returned from GET /
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
                polling_interval_ms: 5,
                min_time_remaining_ms: 20,
            },
            pathfinding: PathfindingConfig {
                max_iterations: 1000,
                max_distance: 100.0,
            },
            scores: ScoresConfig {
                unsafe_move_penalty: 10.0,
                food_race_clamp: 100.0,
                contribution_cap: 1.0e6,
            },
            heuristics: vec![
                HeuristicWeightConfig { name: "team-health".to_string(), weight: 1.0 },
                HeuristicWeightConfig { name: "food".to_string(), weight: 3.53 },
                HeuristicWeightConfig { name: "space".to_string(), weight: 0.9 },
                HeuristicWeightConfig { name: "head-to-head".to_string(), weight: 0.9 },
                HeuristicWeightConfig { name: "food-race".to_string(), weight: 0.2 },
            ],
            move_generation: MoveGenerationConfig {
                body_tail_offset: 1,
            },
            game_rules: GameRulesConfig {
                health_on_food: 100,
                health_loss_per_turn: 1,
                hazard_damage: 14,
            },
            appearance: AppearanceConfig {
                author: String::new(),
                color: "#888888".to_string(),
                head: "default".to_string(),
                tail: "default".to_string(),
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default()
            .unwrap_or_else(|e| {
                log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
                Self::default_hardcoded()
            })
    }
}
