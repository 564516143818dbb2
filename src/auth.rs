//! Bare token authentication, the wire format the existing web clients
//! speak: `Authorization: Token token_<user id>`. The token carries no
//! signature or expiry; it is simply the numeric user id, pattern-matched
//! and then looked up.

use axum::http::{header, HeaderMap};
use serde::Serialize;

use crate::db::operations::user;
use crate::db::Database;

#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Formats the token handed out on login.
pub fn token_for_user(user_id: i64) -> String {
    format!("token_{user_id}")
}

/// Parses the `Authorization` header into a user id. Accepts only the exact
/// `Token token_<digits>` shape.
pub fn extract_user_id(headers: &HeaderMap) -> Option<i64> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;

    let value = raw.strip_prefix("Token ")?;
    let digits = value.strip_prefix("token_")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Resolves the header to a stored user. `Ok(None)` means the token parsed
/// but no such user exists.
pub async fn resolve_user(
    db: &Database,
    headers: &HeaderMap,
) -> Result<Option<AuthUser>, sqlx::Error> {
    let Some(user_id) = extract_user_id(headers) else {
        return Ok(None);
    };

    let user = user::get_user_by_id(db, user_id).await?;
    Ok(user.map(|u| AuthUser {
        id: u.id,
        username: u.username,
        email: u.email,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn parses_well_formed_token() {
        assert_eq!(extract_user_id(&headers_with("Token token_42")), Some(42));
    }

    #[test]
    fn rejects_missing_or_malformed_tokens() {
        assert_eq!(extract_user_id(&HeaderMap::new()), None);
        assert_eq!(extract_user_id(&headers_with("Token token_")), None);
        assert_eq!(extract_user_id(&headers_with("Token token_abc")), None);
        assert_eq!(extract_user_id(&headers_with("Bearer token_7")), None);
        assert_eq!(extract_user_id(&headers_with("token_7")), None);
        assert_eq!(extract_user_id(&headers_with("Token token_1x2")), None);
    }

    #[test]
    fn token_roundtrip() {
        let token = token_for_user(17);
        let header = format!("Token {token}");
        assert_eq!(extract_user_id(&headers_with(&header)), Some(17));
    }
}
