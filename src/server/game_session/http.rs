//! HTTP endpoints to create and inspect games.

use actix_web::{HttpRequest, HttpResponse, web, http::StatusCode};
use log::info;
use serde::Serialize;
use uuid::Uuid;

use crate::config::game::GameConfig;
use crate::server::game_session::messages::GetSnapshot;
use crate::server::game_session::server::{CreateGame, GetGameSession};
use crate::server::query::{query_flag, query_param};
use crate::server::state::AppState;
use crate::server::ws_error::http_error_response;

#[derive(Serialize)]
struct GameCreated {
    game_id: Uuid,
}

/// Build a session config from query parameters, falling back to defaults.
///
/// Accepted keys: `player_one`, `player_two`, `player_one_secs`,
/// `player_two_secs`, `shuffle`.
pub fn config_from_query(query: &str) -> Result<GameConfig, String> {
    let mut config = GameConfig::default();
    for (i, key) in ["player_one", "player_two"].iter().enumerate() {
        if let Some(name) = query_param(query, key).filter(|n| !n.trim().is_empty()) {
            config.player_names[i] = name;
        }
    }
    for (i, key) in ["player_one_secs", "player_two_secs"].iter().enumerate() {
        if let Some(value) = query_param(query, key) {
            config.start_secs[i] = value
                .parse()
                .map_err(|_| format!("{} must be a non-negative integer", key))?;
        }
    }
    config.shuffle_prompts = query_flag(query, "shuffle");
    Ok(config)
}

/// `POST /games`
pub async fn create_game(req: HttpRequest, data: web::Data<AppState>) -> HttpResponse {
    let config = match config_from_query(req.query_string()) {
        Ok(config) => config,
        Err(message) => {
            return http_error_response("INVALID_CONFIG", &message, None, StatusCode::BAD_REQUEST);
        }
    };
    let autoplay = query_flag(req.query_string(), "autoplay");

    match data.game_session_manager.send(CreateGame { config, autoplay }).await {
        Ok(game_id) => {
            info!("[Http] Created game_id={} (autoplay: {})", game_id, autoplay);
            HttpResponse::Ok().json(GameCreated { game_id })
        }
        Err(e) => http_error_response(
            "MAILBOX",
            "Game manager unavailable",
            Some(&e.to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    }
}

/// `GET /games/{game_id}`
pub async fn get_game(path: web::Path<String>, data: web::Data<AppState>) -> HttpResponse {
    let raw_id = path.into_inner();
    let Ok(game_id) = Uuid::parse_str(&raw_id) else {
        return http_error_response("INVALID_GAME_ID", "Malformed game id", Some(&raw_id), StatusCode::BAD_REQUEST);
    };
    let session = match data.game_session_manager.send(GetGameSession { game_id }).await {
        Ok(Ok(session)) => session,
        Ok(Err(message)) => {
            return http_error_response("GAME_NOT_FOUND", &message, Some(&raw_id), StatusCode::NOT_FOUND);
        }
        Err(e) => {
            return http_error_response("MAILBOX", "Game manager unavailable", Some(&e.to_string()), StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    match session.send(GetSnapshot).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => http_error_response("GAME_CLOSED", "Game session closed", Some(&e.to_string()), StatusCode::GONE),
    }
}
