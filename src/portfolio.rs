// Weighted heuristic portfolio
//
// The portfolio is built once at startup and never changes afterwards. Scoring
// a snapshot runs every entry (in parallel, each under its own panic guard)
// and sums the weighted results in registration order so the total is
// reproducible bit for bit.

use log::warn;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::Config;
use crate::heuristics::{collision, food, health, space};
use crate::pathfinding::AStar;
use crate::profile;
use crate::snapshot::GameSnapshot;

pub const DEFAULT_CONTRIBUTION_CAP: f64 = 1.0e6;

/// Pure scoring function shared between threads
pub type Evaluator = Arc<dyn Fn(&GameSnapshot) -> f64 + Send + Sync>;

/// A named, weighted heuristic
#[derive(Clone)]
pub struct Heuristic {
    weight: f64,
    name: String,
    evaluator: Evaluator,
}

impl Heuristic {
    pub fn new<F>(weight: f64, name: impl Into<String>, evaluator: F) -> Self
    where
        F: Fn(&GameSnapshot) -> f64 + Send + Sync + 'static,
    {
        Heuristic {
            weight,
            name: name.into(),
            evaluator: Arc::new(evaluator),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Runs the evaluator, turning a panic into an error message
    pub fn evaluate(&self, snapshot: &GameSnapshot) -> Result<f64, String> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.evaluator)(snapshot))).map_err(|payload| {
            if let Some(msg) = payload.downcast_ref::<&str>() {
                msg.to_string()
            } else if let Some(msg) = payload.downcast_ref::<String>() {
                msg.clone()
            } else {
                "evaluator panicked".to_string()
            }
        })
    }
}

impl fmt::Debug for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heuristic")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish()
    }
}

/// One entry's share of a total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub name: String,
    pub weight: f64,
    /// Evaluator output before weighting; may be infinite
    pub raw: f64,
    /// Finite amount actually added to the total
    pub weighted: f64,
    pub failed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub contributions: Vec<Contribution>,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct Portfolio {
    entries: Vec<Heuristic>,
    contribution_cap: f64,
}

impl Portfolio {
    pub fn new(entries: Vec<Heuristic>) -> Self {
        Portfolio {
            entries,
            contribution_cap: DEFAULT_CONTRIBUTION_CAP,
        }
    }

    pub fn with_contribution_cap(mut self, cap: f64) -> Self {
        self.contribution_cap = cap.abs();
        self
    }

    /// Builds the portfolio listed under `[[heuristics]]`, skipping unknown names
    pub fn from_config(config: &Config) -> Self {
        let entries = config
            .heuristics
            .iter()
            .filter_map(|entry| {
                let heuristic = Self::named(&entry.name, entry.weight, config);
                if heuristic.is_none() {
                    warn!("Unknown heuristic '{}' in config, skipping", entry.name);
                }
                heuristic
            })
            .collect();

        Self::new(entries).with_contribution_cap(config.scores.contribution_cap)
    }

    /// Looks up a built-in heuristic by its config name
    pub fn named(name: &str, weight: f64, config: &Config) -> Option<Heuristic> {
        let heuristic = match name {
            "team-health" => Heuristic::new(weight, name, health::team_health),
            "food" => Heuristic::new(weight, name, food::nearest_food_distance),
            "space" => Heuristic::new(weight, name, space::move_space),
            "head-to-head" => {
                let penalty = config.scores.unsafe_move_penalty;
                Heuristic::new(weight, name, move |s: &GameSnapshot| {
                    collision::avoid_collisions_with_penalty(s, penalty)
                })
            }
            "food-race" => {
                let astar = AStar::from_config(&config.pathfinding);
                let clamp = config.scores.food_race_clamp;
                Heuristic::new(weight, name, move |s: &GameSnapshot| {
                    food::team_food_race_with(s, &astar, clamp)
                })
            }
            _ => return None,
        };
        Some(heuristic)
    }

    pub fn entries(&self) -> &[Heuristic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weighted sum of every entry
    pub fn score(&self, snapshot: &GameSnapshot) -> f64 {
        self.breakdown(snapshot).total
    }

    /// Per-entry contributions and their total
    ///
    /// A failing evaluator contributes 0. Non-finite or oversized weighted
    /// values are pulled back to `±contribution_cap` (NaN becomes 0), so the
    /// total is always finite.
    pub fn breakdown(&self, snapshot: &GameSnapshot) -> ScoreBreakdown {
        profile!("portfolio", {
            let contributions: Vec<Contribution> = self
                .entries
                .par_iter()
                .map(|heuristic| self.contribution(heuristic, snapshot))
                .collect();

            let total = contributions.iter().fold(0.0, |acc, c| acc + c.weighted);

            ScoreBreakdown {
                contributions,
                total,
            }
        })
    }

    fn contribution(&self, heuristic: &Heuristic, snapshot: &GameSnapshot) -> Contribution {
        match heuristic.evaluate(snapshot) {
            Ok(raw) => Contribution {
                name: heuristic.name.clone(),
                weight: heuristic.weight,
                raw,
                weighted: bound_contribution(heuristic.weight * raw, self.contribution_cap),
                failed: false,
            },
            Err(msg) => {
                warn!("Heuristic '{}' failed, contributing 0: {}", heuristic.name, msg);
                Contribution {
                    name: heuristic.name.clone(),
                    weight: heuristic.weight,
                    raw: 0.0,
                    weighted: 0.0,
                    failed: true,
                }
            }
        }
    }
}

fn bound_contribution(value: f64, cap: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(-cap).min(cap)
    }
}
