//! Server configuration constants.

use std::env;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable overriding the bind address (`host:port`).
pub const BIND_ENV: &str = "SPEAK_DUEL_BIND";

/// Resolve the address the HTTP server binds to.
/// Falls back to the defaults when the variable is missing or malformed.
pub fn bind_address() -> (String, u16) {
    match env::var(BIND_ENV) {
        Ok(value) => parse_bind(&value).unwrap_or_else(|| {
            log::warn!("[Config] Ignoring malformed {}={}", BIND_ENV, value);
            (DEFAULT_HOST.to_string(), DEFAULT_PORT)
        }),
        Err(_) => (DEFAULT_HOST.to_string(), DEFAULT_PORT),
    }
}

fn parse_bind(value: &str) -> Option<(String, u16)> {
    let (host, port) = value.rsplit_once(':')?;
    if host.is_empty() {
        return None;
    }
    Some((host.to_string(), port.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_and_port() {
        assert_eq!(parse_bind("0.0.0.0:9000"), Some(("0.0.0.0".to_string(), 9000)));
    }

    #[test]
    fn rejects_missing_port_or_host() {
        assert_eq!(parse_bind("localhost"), None);
        assert_eq!(parse_bind(":8080"), None);
        assert_eq!(parse_bind("localhost:http"), None);
    }
}
