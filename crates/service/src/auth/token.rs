use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::domain::{AuthUser, Claims};
use super::errors::AuthError;

/// Name of the HttpOnly cookie carrying the session token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Sign an HS256 token for `user`, valid for `ttl_hours`.
pub fn issue_token(user: &AuthUser, secret: &str, ttl_hours: i64) -> Result<(String, Claims), AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.email.clone(),
        uid: user.id,
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };
    let token = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))?;
    Ok((token, claims))
}

/// Check signature and expiry.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-0123456789";

    fn admin() -> AuthUser {
        AuthUser { id: Uuid::new_v4(), email: "admin@batik.test".into(), name: "Admin".into() }
    }

    #[test]
    fn issued_token_verifies() {
        let user = admin();
        let (token, claims) = issue_token(&user, SECRET, 12).unwrap();
        let decoded = verify_token(&token, SECRET).unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.uid, user.id);
        assert_eq!(decoded.exp - decoded.iat, 12 * 3600);
    }

    #[test]
    fn wrong_secret_and_expired_are_rejected() {
        let (token, _) = issue_token(&admin(), SECRET, 12).unwrap();
        assert!(matches!(verify_token(&token, "another-secret-98765"), Err(AuthError::TokenError(_))));

        let (expired, _) = issue_token(&admin(), SECRET, -2).unwrap();
        assert!(verify_token(&expired, SECRET).is_err());
        assert!(verify_token("not.a.jwt", SECRET).is_err());
    }
}
