#[macro_use]
extern crate rocket;

use log::info;
use rocket::fairing::AdHoc;
use std::env;

use portfolio_snake::bot::Bot;
use portfolio_snake::config::Config;
use portfolio_snake::debug_logger::DebugLogger;

mod handler;

/// Hosting platforms hand out the port in `PORT`; Rocket reads `ROCKET_PORT`.
/// Logging defaults to `info` unless `RUST_LOG` says otherwise.
fn prepare_env() {
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
}

#[launch]
async fn rocket() -> _ {
    prepare_env();
    env_logger::init();

    let config = Config::load_or_default();
    info!(
        "Starting portfolio snake ({} heuristics, {}ms budget)",
        config.heuristics.len(),
        config.timing.effective_budget_ms()
    );

    let debug_logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let bot = Bot::new(config).with_debug_logger(debug_logger);

    rocket::build()
        .manage(bot)
        .attach(AdHoc::on_response("Server header", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "battlesnake/github/portfolio-snake");
            })
        }))
        .mount(
            "/",
            routes![handler::index, handler::start, handler::get_move, handler::end],
        )
}
