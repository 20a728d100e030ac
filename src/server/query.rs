//! Query string helpers.

use std::borrow::Cow;

/// First value of `key` in a raw query string, url-decoded.
pub fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|kv| {
        let mut split = kv.splitn(2, '=');
        match (split.next(), split.next()) {
            (Some(k), Some(value)) if k == key => Some(
                urlencoding::decode(&value.replace('+', " "))
                    .unwrap_or(Cow::Borrowed(""))
                    .into_owned(),
            ),
            _ => None,
        }
    })
}

/// `true`/`1`/`yes` are true; anything else, or a missing key, is false.
pub fn query_flag(query: &str, key: &str) -> bool {
    matches!(query_param(query, key).as_deref(), Some("true" | "1" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_values() {
        let q = "player_one=Ana%20Lu&player_two=Bo+Jo&x=1";
        assert_eq!(query_param(q, "player_one").as_deref(), Some("Ana Lu"));
        assert_eq!(query_param(q, "player_two").as_deref(), Some("Bo Jo"));
        assert_eq!(query_param(q, "missing"), None);
    }

    #[test]
    fn flags() {
        assert!(query_flag("shuffle=true", "shuffle"));
        assert!(query_flag("a=2&shuffle=1", "shuffle"));
        assert!(!query_flag("shuffle=no", "shuffle"));
        assert!(!query_flag("", "shuffle"));
    }
}
