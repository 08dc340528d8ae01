// Head-to-head and collision safety
//
// A forward move is unsafe when its target cell cannot be entered (walls and
// snake segments). Cells touching another living snake's head are unsafe too.

use crate::profile;
use crate::snapshot::GameSnapshot;
use crate::types::Coord;

pub const UNSAFE_MOVE_PENALTY: f64 = 10.0;

/// `safe - penalty * unsafe` over `you`'s forward moves
pub fn avoid_collisions_with_penalty(snapshot: &GameSnapshot, unsafe_penalty: f64) -> f64 {
    profile!("collision", {
        let you = snapshot.you();
        let head = match you.body.first() {
            Some(head) => *head,
            None => return 0.0,
        };

        let (safe, unsafe_moves) = snapshot.forward_moves(you).iter().fold(
            (0u32, 0u32),
            |(safe, unsafe_moves), dir| {
                if is_unsafe_move(&dir.apply(&head), snapshot) {
                    (safe, unsafe_moves + 1)
                } else {
                    (safe + 1, unsafe_moves)
                }
            },
        );

        f64::from(safe) - unsafe_penalty * f64::from(unsafe_moves)
    })
}

/// Collision score with the default penalty of 10 per unsafe move
pub fn avoid_collisions(snapshot: &GameSnapshot) -> f64 {
    avoid_collisions_with_penalty(snapshot, UNSAFE_MOVE_PENALTY)
}

/// True if stepping onto `pos` risks death or a head-to-head
pub fn is_unsafe_move(pos: &Coord, snapshot: &GameSnapshot) -> bool {
    !snapshot.in_bounds(pos)
        || snapshot.is_body(pos)
        || snapshot.others().any(|snake| snake.head.is_adjacent(pos))
}
