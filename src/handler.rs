// Rocket routes for the Battlesnake API
//
// Each route unpacks the request and hands it to the managed `Bot`. Game
// logic never lives here.

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::Value;

use portfolio_snake::bot::Bot;
use portfolio_snake::types::GameState;

/// GET /: API version and appearance
#[get("/")]
pub fn index(bot: &State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start
#[post("/start", format = "json", data = "<req>")]
pub fn start(bot: &State<Bot>, req: Json<GameState>) -> Status {
    let GameState {
        game,
        turn,
        board,
        you,
    } = req.into_inner();
    bot.start(&game, &turn, &board, &you);
    Status::Ok
}

/// POST /move: scores the legal moves and answers within the game's timeout
#[post("/move", format = "json", data = "<req>")]
pub async fn get_move(bot: &State<Bot>, req: Json<GameState>) -> Json<Value> {
    let GameState {
        game,
        turn,
        board,
        you,
    } = req.into_inner();
    Json(bot.get_move(&game, &turn, &board, &you).await)
}

/// POST /end: logs the game summary and drops its record
#[post("/end", format = "json", data = "<req>")]
pub fn end(bot: &State<Bot>, req: Json<GameState>) -> Status {
    let GameState {
        game,
        turn,
        board,
        you,
    } = req.into_inner();
    bot.end(&game, &turn, &board, &you);
    Status::Ok
}
