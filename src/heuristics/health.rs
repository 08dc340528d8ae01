use crate::snapshot::GameSnapshot;

/// Sum of health over `you` and its living squad mates
pub fn team_health(snapshot: &GameSnapshot) -> f64 {
    snapshot
        .your_team()
        .map(|snake| f64::from(snake.health))
        .sum()
}
