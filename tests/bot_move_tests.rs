// End-to-end move selection through the async /move path

mod common;

use common::{board, game, snake};
use portfolio_snake::bot::Bot;
use portfolio_snake::config::Config;
use portfolio_snake::types::Direction;

/// Our snake at the top wall: its own body blocks down, the enemy head blocks right
#[tokio::test]
async fn test_trapped_at_top_wall_chooses_in_bounds_move() {
    let bot = Bot::new(Config::default_hardcoded());

    let you = snake("our-snake", &[(5, 10), (4, 10), (4, 9), (5, 9), (6, 9)]);
    let b = board(
        11,
        11,
        vec![you.clone(), snake("opponent", &[(6, 10), (7, 10), (7, 9)])],
        &[],
        &[],
    );

    let response = bot.get_move(&game(500), &3, &b, &you).await;
    assert_eq!(response["move"], "down");
}

#[tokio::test]
async fn test_single_legal_move_is_taken() {
    let bot = Bot::new(Config::default_hardcoded());
    let you = snake("our-snake", &[(0, 0), (0, 1), (0, 2)]);
    let b = board(5, 5, vec![you.clone()], &[(4, 4)], &[]);

    let response = bot.get_move(&game(500), &0, &b, &you).await;
    assert_eq!(response["move"], "right");
}

#[tokio::test]
async fn test_tiny_game_timeout_skips_evaluation() {
    let bot = Bot::new(Config::default_hardcoded());
    let you = snake("our-snake", &[(4, 4), (3, 4), (2, 4)]);
    let b = board(5, 5, vec![you.clone()], &[], &[]);

    // 60ms leaves less than the 20ms minimum after network overhead
    let response = bot.get_move(&game(60), &12, &b, &you).await;
    assert_eq!(response["move"], "down");
}

#[tokio::test]
async fn test_missing_you_is_still_evaluated() {
    let bot = Bot::new(Config::default_hardcoded());
    let you = snake("our-snake", &[(0, 0), (0, 1), (0, 2)]);
    let b = board(5, 5, vec![snake("other", &[(4, 4), (4, 3)])], &[], &[]);

    let response = bot.get_move(&game(500), &1, &b, &you).await;
    assert_eq!(response["move"], "right");
}

#[tokio::test]
async fn test_game_lifecycle() {
    let bot = Bot::new(Config::default_hardcoded());
    let you = snake("our-snake", &[(3, 3), (3, 2), (3, 1)]);
    let b = board(7, 7, vec![you.clone()], &[(3, 6)], &[]);
    let g = game(500);

    bot.start(&g, &0, &b, &you);
    for turn in 0..3 {
        let response = bot.get_move(&g, &turn, &b, &you).await;
        let mv: Direction = response["move"].as_str().unwrap_or_default().parse().unwrap();
        assert_ne!(mv, Direction::Down);
    }
    bot.end(&g, &3, &b, &you);
}

#[test]
fn test_open_board_never_leaves_the_board() {
    let bot = Bot::new(Config::default_hardcoded());
    let you = snake("our-snake", &[(6, 3), (5, 3), (4, 3)]);
    let b = board(7, 7, vec![you], &[(0, 0)], &[]);
    let s = common::snapshot(&b);

    let (chosen, scores) = bot.choose_move(&s);
    assert_ne!(chosen, Direction::Right);
    assert_eq!(scores.len(), 2);
    assert!(scores.iter().all(|m| m.total.is_finite()));
}

#[test]
fn test_info_reports_appearance() {
    let bot = Bot::new(Config::default_hardcoded());
    let info = bot.info();
    assert_eq!(info["apiversion"], "1");
    assert_eq!(info["color"], "#888888");
}
