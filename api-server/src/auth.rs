use actix_web::http::header::{HeaderMap, AUTHORIZATION};

const API_KEY_HEADER: &str = "x-api-key";

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Keys the caller presented, `x-api-key` first.
fn presented_keys(headers: &HeaderMap) -> impl Iterator<Item = &str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .into_iter()
        .chain(bearer_token(headers))
}

/// Admin routes (deletes, catalog writes) are open until an API key is
/// configured.
pub(crate) fn is_admin_request(headers: &HeaderMap, api_key: Option<&str>) -> bool {
    match api_key {
        None => true,
        Some(expected) => presented_keys(headers).any(|key| key == expected),
    }
}
