// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the main backend server components, including:
//! - Application state management
//! - HTTP/WebSocket routing
//! - Game session orchestration (session actor, client connections, timers)
//! - Error response helpers

pub mod state;
pub mod router;
pub mod game_session;
pub mod query;
pub mod ws_error;
