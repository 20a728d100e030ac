//! HTTP and WebSocket routing configuration.
//!
//! Defines the endpoints to create and inspect games, and the game WebSocket.

use actix_web::web;
use crate::server::game_session::http::{create_game, get_game};
use crate::server::game_session::session::ws_game;

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/games")
            .route(web::post().to(create_game))
    )
    .service(
        web::resource("/games/{game_id}")
            .route(web::get().to(get_game))
    )
    .service(
        web::resource("/ws/game/{game_id}")
            .to(ws_game)
    );
}
