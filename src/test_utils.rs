// Board builders shared by the unit tests

use crate::snapshot::GameSnapshot;
use crate::types::{Battlesnake, Board, Coord};

pub fn coords(points: &[(i32, i32)]) -> Vec<Coord> {
    points.iter().map(|&(x, y)| Coord::new(x, y)).collect()
}

pub fn snake(id: &str, body: &[(i32, i32)]) -> Battlesnake {
    let body = coords(body);
    Battlesnake {
        id: id.to_string(),
        name: id.to_string(),
        health: 100,
        head: body[0],
        length: body.len() as i32,
        body,
        latency: "0".to_string(),
        shout: None,
        squad: None,
    }
}

pub fn board(
    width: i32,
    height: i32,
    snakes: Vec<Battlesnake>,
    food: &[(i32, i32)],
    hazards: &[(i32, i32)],
) -> Board {
    Board {
        width,
        height,
        food: coords(food),
        snakes,
        hazards: coords(hazards),
    }
}

/// Snapshot for the first snake on the board
pub fn snapshot(board: &Board) -> GameSnapshot {
    GameSnapshot::new(board, &board.snakes[0].id).expect("test board should be valid")
}
