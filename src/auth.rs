use crate::schemas::AppState;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use model::entities::user;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Bearer-token claims. `sub` is the user id; `exp` is seconds since epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

pub fn role_as_str(role: user::Role) -> &'static str {
    match role {
        user::Role::Admin => "admin",
        user::Role::Candidate => "candidate",
    }
}

fn role_from_str(role: &str) -> Option<user::Role> {
    match role {
        "admin" => Some(user::Role::Admin),
        "candidate" => Some(user::Role::Candidate),
        _ => None,
    }
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash. Any parse or verification
/// failure counts as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash failed to parse: {}", e);
            false
        }
    }
}

/// Issue a bearer token for a user, valid for 24 hours.
pub fn issue_token(
    secret: &str,
    user: &user::Model,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: role_as_str(user.role).to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// The authenticated caller, extracted from the `Authorization: Bearer`
/// header. Rejects with 401 when the header is missing or the token is
/// invalid or expired.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub role: user::Role,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let claims = decode_token(&state.config.jwt_secret, token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            StatusCode::UNAUTHORIZED
        })?;

        let role = role_from_str(&claims.role).ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(AuthUser {
            id: claims.sub,
            username: claims.username,
            role,
        })
    }
}

/// An authenticated caller that must hold the admin role. Rejects with 403
/// for valid non-admin tokens.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != user::Role::Admin {
            return Err(StatusCode::FORBIDDEN);
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> user::Model {
        user::Model {
            id: 7,
            username: "Dhaka5".to_string(),
            password_hash: String::new(),
            role: user::Role::Candidate,
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("Sonar@Bangla1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Sonar@Bangla1", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn token_round_trip() {
        let user = sample_user();
        let token = issue_token("test-secret", &user).unwrap();
        let claims = decode_token("test-secret", &token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "Dhaka5");
        assert_eq!(claims.role, "candidate");
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let token = issue_token("test-secret", &sample_user()).unwrap();
        assert!(decode_token("other-secret", &token).is_err());
    }
}
