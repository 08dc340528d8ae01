// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// Move selection: every legal move is projected one step ahead and the
// projection is scored by the heuristic portfolio. The highest total wins.

use log::{debug, error, info, warn};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::portfolio::{Contribution, Portfolio};
use crate::profile;
use crate::simple_profiler;
use crate::snapshot::GameSnapshot;
use crate::types::{Battlesnake, Board, Coord, Direction, Game};

/// Portfolio score of one candidate move
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveScore {
    pub direction: Direction,
    pub total: f64,
    pub contributions: Vec<Contribution>,
}

/// Lock-free shared state for communication between async poller and computation engine
#[derive(Debug)]
pub struct SharedSearchState {
    /// Best move found so far (encoded as direction index)
    best_move: AtomicU8,
    /// Bits of the best total as f64
    best_score: AtomicU64,
    /// Flag indicating search completion
    search_complete: AtomicBool,
    /// Every candidate's score, for the debug log
    scores: Mutex<Vec<MoveScore>>,
}

impl SharedSearchState {
    /// Creates a new shared state holding `fallback` until the evaluation publishes
    pub fn new(fallback: Direction) -> Self {
        SharedSearchState {
            best_move: AtomicU8::new(direction_to_index(fallback)),
            best_score: AtomicU64::new(f64::NEG_INFINITY.to_bits()),
            search_complete: AtomicBool::new(false),
            scores: Mutex::new(Vec::new()),
        }
    }

    fn publish(&self, best: Direction, scores: Vec<MoveScore>) {
        let best_total = scores
            .iter()
            .find(|s| s.direction == best)
            .map_or(f64::NEG_INFINITY, |s| s.total);

        *self.scores.lock() = scores;
        self.best_score.store(best_total.to_bits(), Ordering::Release);
        self.best_move.store(direction_to_index(best), Ordering::Release);
    }

    pub fn best_move(&self) -> Direction {
        index_to_direction(self.best_move.load(Ordering::Acquire))
    }

    pub fn best_score(&self) -> f64 {
        f64::from_bits(self.best_score.load(Ordering::Acquire))
    }

    pub fn is_complete(&self) -> bool {
        self.search_complete.load(Ordering::Acquire)
    }

    fn take_scores(&self) -> Vec<MoveScore> {
        std::mem::take(&mut *self.scores.lock())
    }
}

/// Per-game bookkeeping reported at /end
#[derive(Debug, Default, Clone, Copy)]
struct GameRecord {
    turns: u32,
    total_decision_ms: u128,
}

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    portfolio: Portfolio,
    debug_logger: DebugLogger,
    games: Mutex<HashMap<String, GameRecord>>,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let portfolio = Portfolio::from_config(&config);
        info!(
            "Portfolio: {}",
            portfolio
                .entries()
                .iter()
                .map(|h| format!("{}={}", h.name(), h.weight()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Bot {
            config,
            portfolio,
            debug_logger: DebugLogger::disabled(),
            games: Mutex::new(HashMap::new()),
        }
    }

    /// Attaches a JSONL logger that records every decision
    pub fn with_debug_logger(mut self, debug_logger: DebugLogger) -> Self {
        self.debug_logger = debug_logger;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": "1",
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, board: &Board, you: &Battlesnake) {
        info!(
            "GAME START {} ({}x{}, {} snakes) as {}",
            game.id,
            board.width,
            board.height,
            board.snakes.len(),
            you.name
        );
        self.games.lock().insert(game.id.clone(), GameRecord::default());
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        match self.games.lock().remove(&game.id) {
            Some(record) if record.turns > 0 => info!(
                "GAME OVER {} at turn {}: {} decisions, {:.1}ms average",
                game.id,
                turn,
                record.turns,
                record.total_decision_ms as f64 / f64::from(record.turns)
            ),
            _ => info!("GAME OVER {} at turn {}", game.id, turn),
        }
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// This method orchestrates the async polling and CPU-bound evaluation:
    /// 1. Publishes a safe fallback move
    /// 2. Spawns the portfolio evaluation on a blocking thread
    /// 3. Polls for the result until the time budget runs out
    ///
    /// # Arguments
    /// * `game` - Current game metadata
    /// * `turn` - Current turn number
    /// * `board` - Current board state
    /// * `you` - Your snake's current state
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move direction
    pub async fn get_move(&self, game: &Game, turn: &i32, board: &Board, you: &Battlesnake) -> Value {
        let start_time = Instant::now();

        info!("Turn {}: Computing move", turn);

        let snapshot = match GameSnapshot::from_parts(board, you) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Turn {}: Cannot evaluate board: {}", turn, e);
                return json!({ "move": Direction::Up.as_str() });
            }
        };

        let fallback = Self::fallback_move(&snapshot, &self.config);
        let effective_budget = self
            .config
            .timing
            .budget_for_timeout_ms(u64::from(game.timeout));

        if effective_budget < self.config.timing.min_time_remaining_ms {
            warn!(
                "Turn {}: Only {}ms available, skipping evaluation and moving {}",
                turn,
                effective_budget,
                fallback.as_str()
            );
            return json!({ "move": fallback.as_str() });
        }

        // Create shared state for lock-free communication between poller and evaluation
        let shared = Arc::new(SharedSearchState::new(fallback));
        let shared_clone = shared.clone();
        let portfolio = self.portfolio.clone();
        let config = self.config.clone();

        // Spawn CPU-bound computation off the async runtime
        tokio::task::spawn_blocking(move || {
            Bot::compute_best_move_internal(&snapshot, &portfolio, &config, &shared_clone, start_time)
        });

        // Polling loop: check for results or timeout
        let polling_interval = Duration::from_millis(self.config.timing.polling_interval_ms);

        loop {
            tokio::time::sleep(polling_interval).await;

            let elapsed = start_time.elapsed().as_millis() as u64;

            if elapsed >= effective_budget || shared.is_complete() {
                break;
            }
        }

        if !shared.is_complete() {
            warn!(
                "Turn {}: Evaluation did not finish within {}ms, using best move so far",
                turn, effective_budget
            );
        }

        let chosen_move = shared.best_move();
        let elapsed_ms = start_time.elapsed().as_millis();

        info!(
            "Turn {}: Chose {} (score: {:.2}, time: {}ms)",
            turn,
            chosen_move.as_str(),
            shared.best_score(),
            elapsed_ms
        );

        if let Some(record) = self.games.lock().get_mut(&game.id) {
            record.turns += 1;
            record.total_decision_ms += elapsed_ms;
        }

        self.debug_logger.log_move(
            *turn,
            &you.id,
            board.clone(),
            chosen_move,
            shared.take_scores(),
        );

        json!({ "move": chosen_move.as_str(), "shout": "" })
    }

    /// Internal computation engine - runs on a blocking thread
    fn compute_best_move_internal(
        snapshot: &GameSnapshot,
        portfolio: &Portfolio,
        config: &Config,
        shared: &SharedSearchState,
        start_time: Instant,
    ) {
        let (best, scores) = Self::rank_moves(snapshot, portfolio, config);
        shared.publish(best, scores);
        shared.search_complete.store(true, Ordering::Release);

        simple_profiler::merge_thread_local();
        if simple_profiler::is_profiling_enabled() {
            // heuristics ran on rayon workers; collect their counters too
            rayon::broadcast(|_| simple_profiler::merge_thread_local());
            simple_profiler::print_report(start_time.elapsed().as_millis() as u64);
            simple_profiler::reset();
        }
    }

    /// Picks the best move for `snapshot` using this bot's portfolio
    pub fn choose_move(&self, snapshot: &GameSnapshot) -> (Direction, Vec<MoveScore>) {
        Self::rank_moves(snapshot, &self.portfolio, &self.config)
    }

    /// Scores every legal move for `snapshot` using this bot's portfolio
    pub fn evaluate_moves(&self, snapshot: &GameSnapshot) -> Vec<MoveScore> {
        Self::score_candidates(snapshot, &self.portfolio, &self.config)
    }

    /// Highest-scoring legal move; ties go to the earlier direction in `Direction::all()`
    fn rank_moves(
        snapshot: &GameSnapshot,
        portfolio: &Portfolio,
        config: &Config,
    ) -> (Direction, Vec<MoveScore>) {
        let scores = Self::score_candidates(snapshot, portfolio, config);

        let best = scores
            .iter()
            .fold(None, |best: Option<&MoveScore>, candidate| match best {
                Some(current) if current.total >= candidate.total => Some(current),
                _ => Some(candidate),
            })
            .map(|s| s.direction);

        match best {
            Some(direction) => (direction, scores),
            None => {
                let fallback = Self::trapped_fallback(snapshot);
                info!("No legal moves available, falling back to {}", fallback.as_str());
                (fallback, scores)
            }
        }
    }

    fn score_candidates(
        snapshot: &GameSnapshot,
        portfolio: &Portfolio,
        config: &Config,
    ) -> Vec<MoveScore> {
        let candidates =
            Self::generate_legal_moves(snapshot, config.move_generation.body_tail_offset);

        debug!("Evaluating {} legal moves", candidates.len());

        candidates
            .par_iter()
            .map(|&direction| {
                let projected = profile!("projection", {
                    snapshot.project(direction, &config.game_rules)
                });
                let breakdown = portfolio.breakdown(&projected);

                for c in &breakdown.contributions {
                    debug!(
                        "  {} / {}: raw {:.3} x {} = {:.3}{}",
                        direction.as_str(),
                        c.name,
                        c.raw,
                        c.weight,
                        c.weighted,
                        if c.failed { " (failed)" } else { "" }
                    );
                }

                MoveScore {
                    direction,
                    total: breakdown.total,
                    contributions: breakdown.contributions,
                }
            })
            .collect()
    }

    /// Generates all legal moves for `you`
    /// A move is legal if it:
    /// - Doesn't reverse into the neck
    /// - Doesn't go out of bounds
    /// - Doesn't collide with snake bodies (excluding tails which will move)
    pub fn generate_legal_moves(snapshot: &GameSnapshot, body_tail_offset: usize) -> Vec<Direction> {
        let you = snapshot.you();
        if !you.is_alive() {
            return vec![];
        }

        let head = you.body[0];

        snapshot
            .forward_moves(you)
            .into_iter()
            .filter(|dir| {
                let next = dir.apply(&head);
                snapshot.in_bounds(&next) && !Self::is_collision(&next, snapshot, body_tail_offset)
            })
            .collect()
    }

    /// Checks if a coordinate collides with any snake body
    ///
    /// The last `body_tail_offset` segments are skipped because they move away
    /// this turn, unless the snake just ate and its tail is stacked.
    fn is_collision(coord: &Coord, snapshot: &GameSnapshot, body_tail_offset: usize) -> bool {
        snapshot.snakes().any(|snake| {
            let len = snake.body.len();
            let tail_stacked = len >= 2 && snake.body[len - 1] == snake.body[len - 2];
            let body_check_len = if tail_stacked {
                len
            } else {
                len.saturating_sub(body_tail_offset)
            };
            snake.body[..body_check_len].contains(coord)
        })
    }

    /// Safe default published before evaluation starts
    fn fallback_move(snapshot: &GameSnapshot, config: &Config) -> Direction {
        Self::generate_legal_moves(snapshot, config.move_generation.body_tail_offset)
            .first()
            .copied()
            .unwrap_or_else(|| Self::trapped_fallback(snapshot))
    }

    /// With no legal move, prefer staying on the board over an arbitrary "up"
    fn trapped_fallback(snapshot: &GameSnapshot) -> Direction {
        let you = snapshot.you();
        let forward = snapshot.forward_moves(you);

        you.body
            .first()
            .and_then(|head| {
                forward
                    .iter()
                    .find(|dir| snapshot.in_bounds(&dir.apply(head)))
                    .copied()
            })
            .or_else(|| forward.first().copied())
            .unwrap_or(Direction::Up)
    }
}

/// Converts a direction to its encoded index
fn direction_to_index(dir: Direction) -> u8 {
    match dir {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

/// Converts an encoded index to a direction
fn index_to_direction(idx: u8) -> Direction {
    match idx {
        1 => Direction::Down,
        2 => Direction::Left,
        3 => Direction::Right,
        _ => Direction::Up,
    }
}
