// Immutable per-turn view of the board that every heuristic reads from
//
// A snapshot is built once from the wire `Board` and never mutated afterwards.
// Candidate moves are explored with `project`, which returns a fresh snapshot.

use std::collections::HashSet;

use crate::config::GameRulesConfig;
use crate::types::{Battlesnake, Board, Coord, Direction, GameState};

#[derive(Debug, Clone)]
pub struct GameSnapshot {
    width: i32,
    height: i32,
    snakes: Vec<Battlesnake>,
    you_index: usize,
    food: Vec<Coord>,
    hazards: Vec<Coord>,
    body_cells: HashSet<Coord>,
    hazard_cells: HashSet<Coord>,
}

impl GameSnapshot {
    /// Builds a snapshot of `board` from the point of view of the snake `you_id`
    ///
    /// # Returns
    /// * `Err` if the board has non-positive dimensions or `you_id` is not on it
    pub fn new(board: &Board, you_id: &str) -> Result<Self, String> {
        if board.width <= 0 || board.height <= 0 {
            return Err(format!(
                "Invalid board dimensions {}x{}",
                board.width, board.height
            ));
        }

        let you_index = board
            .snakes
            .iter()
            .position(|s| s.id == you_id)
            .ok_or_else(|| format!("Snake with id '{}' not found in board state", you_id))?;

        Ok(Self::assemble(
            board.width,
            board.height,
            board.snakes.clone(),
            you_index,
            board.food.clone(),
            board.hazards.clone(),
        ))
    }

    /// Builds a snapshot from the board and the requesting snake
    ///
    /// Some engines omit the requesting snake from `board.snakes` once it has
    /// been eliminated, so `you` is appended when it is missing.
    pub fn from_parts(board: &Board, you: &Battlesnake) -> Result<Self, String> {
        if board.snakes.iter().any(|s| s.id == you.id) {
            return Self::new(board, &you.id);
        }

        let mut board = board.clone();
        board.snakes.push(you.clone());
        Self::new(&board, &you.id)
    }

    /// Builds a snapshot from a full API request
    pub fn from_state(state: &GameState) -> Result<Self, String> {
        Self::from_parts(&state.board, &state.you)
    }

    fn assemble(
        width: i32,
        height: i32,
        snakes: Vec<Battlesnake>,
        you_index: usize,
        food: Vec<Coord>,
        hazards: Vec<Coord>,
    ) -> Self {
        // `you` stays solid even when a projection has just killed it
        let body_cells = snakes
            .iter()
            .enumerate()
            .filter(|(i, s)| *i == you_index || s.is_alive())
            .flat_map(|(_, s)| s.body.iter().copied())
            .collect();
        let hazard_cells = hazards.iter().copied().collect();

        GameSnapshot {
            width,
            height,
            snakes,
            you_index,
            food,
            hazards,
            body_cells,
            hazard_cells,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// The snake this snapshot is evaluated for
    pub fn you(&self) -> &Battlesnake {
        &self.snakes[self.you_index]
    }

    /// All living snakes, including `you` while it is alive
    pub fn snakes(&self) -> impl Iterator<Item = &Battlesnake> {
        self.snakes.iter().filter(|s| s.is_alive())
    }

    /// Living snakes other than `you`
    pub fn others(&self) -> impl Iterator<Item = &Battlesnake> {
        let you_id = self.you().id.as_str();
        self.snakes().filter(move |s| s.id != you_id)
    }

    /// `you` plus every living snake sharing its squad
    pub fn your_team(&self) -> impl Iterator<Item = &Battlesnake> {
        let you = self.you();
        self.snakes()
            .filter(move |s| s.id == you.id || (you.team().is_some() && s.team() == you.team()))
    }

    /// Living snakes that are not on `you`'s team
    pub fn opponents(&self) -> impl Iterator<Item = &Battlesnake> {
        let you = self.you();
        self.others()
            .filter(move |s| you.team().is_none() || s.team() != you.team())
    }

    pub fn food(&self) -> &[Coord] {
        &self.food
    }

    pub fn hazards(&self) -> &[Coord] {
        &self.hazards
    }

    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// True if any living snake, or `you`, has a segment on `coord`
    pub fn is_body(&self, coord: &Coord) -> bool {
        self.body_cells.contains(coord)
    }

    /// Every cell covered by a snake segment, in no particular order
    pub fn body_cells(&self) -> impl Iterator<Item = &Coord> {
        self.body_cells.iter()
    }

    pub fn is_hazard(&self, coord: &Coord) -> bool {
        self.hazard_cells.contains(coord)
    }

    /// Every direction except the one that reverses into the snake's neck
    pub fn forward_moves(&self, snake: &Battlesnake) -> Vec<Direction> {
        let head = match snake.body.first() {
            Some(head) => *head,
            None => return vec![],
        };
        let neck = snake.neck().filter(|n| *n != head);

        Direction::all()
            .iter()
            .filter(|dir| Some(dir.apply(&head)) != neck)
            .copied()
            .collect()
    }

    /// Returns the snapshot after `you` moves one step in `direction`
    ///
    /// Only `you` moves; every other snake is left where it is. Eating keeps the
    /// tail in place (growth) and restores health; otherwise the tail is dropped
    /// and health decays, with extra damage on hazard cells. A move that drops
    /// health to 0 leaves `you` out of `snakes()` but its body still blocks
    /// cells.
    pub fn project(&self, direction: Direction, rules: &GameRulesConfig) -> GameSnapshot {
        let mut snakes = self.snakes.clone();
        let mut food = self.food.clone();

        let you = &mut snakes[self.you_index];
        if let Some(&head) = you.body.first() {
            let next = direction.apply(&head);
            you.body.insert(0, next);
            you.head = next;

            if let Some(idx) = food.iter().position(|f| *f == next) {
                food.swap_remove(idx);
                you.health = i32::from(rules.health_on_food);
            } else {
                you.body.pop();
                you.health -= i32::from(rules.health_loss_per_turn);
                if self.hazard_cells.contains(&next) {
                    you.health -= i32::from(rules.hazard_damage);
                }
            }
            you.length = you.body.len() as i32;
        }

        Self::assemble(
            self.width,
            self.height,
            snakes,
            self.you_index,
            food,
            self.hazards.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn snake(id: &str, body: &[(i32, i32)], squad: Option<&str>) -> Battlesnake {
        let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord::new(x, y)).collect();
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health: 80,
            head: body[0],
            length: body.len() as i32,
            body,
            latency: "0".to_string(),
            shout: None,
            squad: squad.map(|s| s.to_string()),
        }
    }

    fn board(snakes: Vec<Battlesnake>, food: Vec<Coord>) -> Board {
        Board {
            height: 7,
            width: 7,
            food,
            snakes,
            hazards: vec![],
        }
    }

    #[test]
    fn test_unknown_snake_is_an_error() {
        let b = board(vec![snake("a", &[(1, 1)], None)], vec![]);
        assert!(GameSnapshot::new(&b, "missing").is_err());
    }

    #[test]
    fn test_missing_you_is_appended() {
        let b = board(vec![snake("b", &[(5, 5)], None)], vec![]);
        let you = snake("a", &[(1, 1), (1, 0)], None);
        let s = GameSnapshot::from_parts(&b, &you).unwrap();
        assert_eq!(s.you().id, "a");
        assert!(s.is_body(&Coord::new(1, 0)));
        assert_eq!(s.opponents().count(), 1);
    }

    #[test]
    fn test_zero_sized_board_is_an_error() {
        let mut b = board(vec![snake("a", &[(1, 1)], None)], vec![]);
        b.width = 0;
        assert!(GameSnapshot::new(&b, "a").is_err());
    }

    #[test]
    fn test_forward_moves_exclude_neck() {
        let b = board(vec![snake("a", &[(3, 3), (3, 2), (3, 1)], None)], vec![]);
        let s = GameSnapshot::new(&b, "a").unwrap();
        let moves = s.forward_moves(s.you());
        assert_eq!(moves.len(), 3);
        assert!(!moves.contains(&Direction::Down));
    }

    #[test]
    fn test_forward_moves_with_stacked_start_body() {
        let b = board(vec![snake("a", &[(3, 3), (3, 3), (3, 3)], None)], vec![]);
        let s = GameSnapshot::new(&b, "a").unwrap();
        assert_eq!(s.forward_moves(s.you()).len(), 4);
    }

    #[test]
    fn test_teams_follow_squad() {
        let b = board(
            vec![
                snake("a", &[(0, 0)], Some("red")),
                snake("b", &[(2, 2)], Some("red")),
                snake("c", &[(4, 4)], Some("blue")),
                snake("d", &[(6, 6)], None),
            ],
            vec![],
        );
        let s = GameSnapshot::new(&b, "a").unwrap();
        let team: Vec<&str> = s.your_team().map(|s| s.id.as_str()).collect();
        let enemies: Vec<&str> = s.opponents().map(|s| s.id.as_str()).collect();
        assert_eq!(team, vec!["a", "b"]);
        assert_eq!(enemies, vec!["c", "d"]);
    }

    #[test]
    fn test_without_squad_everyone_else_is_an_opponent() {
        let b = board(
            vec![snake("a", &[(0, 0)], None), snake("b", &[(2, 2)], None)],
            vec![],
        );
        let s = GameSnapshot::new(&b, "a").unwrap();
        assert_eq!(s.your_team().count(), 1);
        assert_eq!(s.opponents().count(), 1);
    }

    #[test]
    fn test_dead_snakes_are_ignored() {
        let mut dead = snake("b", &[(2, 2)], None);
        dead.health = 0;
        let b = board(vec![snake("a", &[(0, 0)], None), dead], vec![]);
        let s = GameSnapshot::new(&b, "a").unwrap();
        assert_eq!(s.snakes().count(), 1);
        assert!(!s.is_body(&Coord::new(2, 2)));
    }

    #[test]
    fn test_project_moves_only_you_and_leaves_source_untouched() {
        let rules = Config::default_hardcoded().game_rules;
        let b = board(
            vec![
                snake("a", &[(3, 3), (3, 2), (3, 1)], None),
                snake("b", &[(0, 0), (0, 1)], None),
            ],
            vec![],
        );
        let s = GameSnapshot::new(&b, "a").unwrap();
        let next = s.project(Direction::Up, &rules);

        assert_eq!(next.you().head, Coord::new(3, 4));
        assert_eq!(next.you().body.len(), 3);
        assert_eq!(next.you().health, 79);
        assert!(!next.is_body(&Coord::new(3, 1)));
        assert!(next.is_body(&Coord::new(0, 0)));

        assert_eq!(s.you().head, Coord::new(3, 3));
        assert!(s.is_body(&Coord::new(3, 1)));
    }

    #[test]
    fn test_project_onto_food_grows_and_heals() {
        let rules = Config::default_hardcoded().game_rules;
        let b = board(
            vec![snake("a", &[(3, 3), (3, 2)], None)],
            vec![Coord::new(3, 4), Coord::new(0, 0)],
        );
        let s = GameSnapshot::new(&b, "a").unwrap();
        let next = s.project(Direction::Up, &rules);

        assert_eq!(next.you().body.len(), 3);
        assert_eq!(next.you().health, 100);
        assert_eq!(next.food(), &[Coord::new(0, 0)]);
        assert_eq!(s.food().len(), 2);
    }

    #[test]
    fn test_from_state_uses_request_snake() {
        let you = snake("a", &[(1, 1), (1, 0)], None);
        let state = GameState {
            game: crate::types::Game {
                id: "g".to_string(),
                ruleset: Default::default(),
                timeout: 500,
                source: String::new(),
            },
            turn: 4,
            board: board(vec![snake("b", &[(5, 5)], None), you.clone()], vec![]),
            you,
        };
        let s = GameSnapshot::from_state(&state).unwrap();
        assert_eq!(s.you().id, "a");
        assert_eq!(s.others().count(), 1);
    }

    #[test]
    fn test_fatal_projection_keeps_body_solid() {
        let rules = Config::default_hardcoded().game_rules;
        let mut b = board(vec![snake("a", &[(3, 3), (3, 2), (3, 1)], None)], vec![]);
        b.snakes[0].health = 10;
        b.hazards = vec![Coord::new(4, 3)];
        let s = GameSnapshot::new(&b, "a").unwrap();
        let next = s.project(Direction::Right, &rules);

        assert!(next.you().health <= 0);
        assert_eq!(next.snakes().count(), 0);
        assert!(next.is_body(&Coord::new(4, 3)));
        assert!(next.is_body(&Coord::new(3, 2)));
        assert_eq!(next.body_cells().count(), 3);
    }

    #[test]
    fn test_project_into_hazard_costs_extra_health() {
        let rules = Config::default_hardcoded().game_rules;
        let mut b = board(vec![snake("a", &[(3, 3), (3, 2)], None)], vec![]);
        b.hazards = vec![Coord::new(4, 3)];
        let s = GameSnapshot::new(&b, "a").unwrap();
        let next = s.project(Direction::Right, &rules);
        assert_eq!(next.you().health, 80 - 1 - 14);
    }
}
