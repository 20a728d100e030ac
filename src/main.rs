//! Main entry point for the backend server.
//!
//! Loads the prompt deck, starts the game session manager actor and launches the
//! HTTP server with the game creation endpoints and the game WebSocket.

use std::io;

use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::{error, info};

use config::prompts::PromptDeck;
use server::game_session::server::GameSessionManager;

pub mod config;
mod error;
mod game;
mod server;
mod speech;

#[cfg(test)]
mod tests;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to error level).
    env_logger::init();

    // A broken prompt file is fatal: fail before accepting players.
    let deck = PromptDeck::load().map_err(|e| {
        error!("[Config] {}", e);
        io::Error::new(io::ErrorKind::InvalidData, e.to_string())
    })?;

    // Start the GameSessionManager actor (creates and owns all game sessions).
    let game_session_manager = GameSessionManager::new(deck).start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(game_session_manager));

    let (host, port) = config::server::bind_address();
    info!("[Server] Listening on {}:{}", host, port);

    // Start the HTTP server with WebSocket endpoints.
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
