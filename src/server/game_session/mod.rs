pub mod server;
pub mod session;
pub mod messages;
pub mod http;
pub mod turn_resolution;
