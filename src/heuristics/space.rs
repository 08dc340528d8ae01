use crate::flood_fill::{open_space_count, OccupancyGrid};
use crate::snapshot::GameSnapshot;

/// Free cells reachable from `you`'s head
///
/// The head is itself a body segment, so it is released before the fill and
/// counts as one of the reachable cells. A head that is off the board or on a
/// hazard scores 0.
pub fn move_space(snapshot: &GameSnapshot) -> f64 {
    let head = match snapshot.you().body.first() {
        Some(head) => *head,
        None => return 0.0,
    };
    if !snapshot.in_bounds(&head) || snapshot.is_hazard(&head) {
        return 0.0;
    }

    let mut grid = OccupancyGrid::from_snapshot(snapshot);
    grid.release(&head);
    open_space_count(head, &mut grid) as f64
}
