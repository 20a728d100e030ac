//! Main configuration module.
//!
//! Re-exports submodules for game, server and prompt deck configuration.

pub mod game;
pub mod prompts;
pub mod server;
