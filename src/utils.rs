use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};

use crate::types::Artist;

/// Random value for the authorize request's `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// `base64(client_id:client_secret)` for the token endpoint's Basic header.
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    STANDARD.encode(format!("{client_id}:{client_secret}"))
}

/// Percent-encodes one path segment of a Web API URL.
///
/// Ids are interpolated into paths like `/playlists/{id}`; encoding keeps
/// a `/`, `?` or `&` inside an id from changing the request.
pub fn encode_segment(segment: &str) -> String {
    // byte_serialize writes a space as `+`, which a path would keep literally
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Appends form-encoded query pairs to an endpoint path.
///
/// ```
/// assert_eq!(with_query("/me/albums", &[("ids", "a&b")]), "/me/albums?ids=a%26b");
/// ```
pub fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{path}?{query}")
}

/// Keeps only a short prefix of a token so it can be logged.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    if prefix.len() < token.len() {
        format!("{prefix}…")
    } else {
        "…".to_string()
    }
}

pub fn join_artist_names(artists: &[Artist]) -> String {
    artists
        .iter()
        .map(|artist| artist.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Formats milliseconds as `m:ss`.
pub fn format_duration_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Formats a remaining lifetime as `1h 02m 03s`, or `expired`.
pub fn format_remaining(remaining: chrono::Duration) -> String {
    let secs = remaining.num_seconds();
    if secs <= 0 {
        return "expired".to_string();
    }
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{minutes}m {seconds:02}s")
    }
}
