//! Authentication: password hashing, access tokens, and the request guard.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::models::user::{LoginRequest, LoginResponse, User};
use crate::AppState;

use super::error::ApiError;

/// Issuer claim stamped into every access token.
pub const TOKEN_ISSUER: &str = "ladle";

/// Access tokens expire this long after issuance.
const TOKEN_TTL_MINUTES: i64 = 30;

/// bcrypt work factor for stored credentials.
const BCRYPT_COST: u32 = 15;

/// Registered claims carried by an access token. The token id claim
/// doubles as the subject: the stringified user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub jti: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// Issues and verifies signed access tokens.
///
/// Constructed once at startup from the configured secret and injected
/// through `AppState`. HS256 is the only algorithm accepted on either side,
/// so a token re-signed under a different scheme never validates.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token for a user id, valid from now.
    pub fn issue(&self, user_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            iss: TOKEN_ISSUER.to_string(),
            jti: user_id.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Decode a token and validate signature, algorithm, issuer, and
    /// validity window. No leeway on expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[TOKEN_ISSUER]);

        decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

/// Hash a password with the fixed work factor. Runs on the blocking pool
/// since bcrypt at this cost takes on the order of a second.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal("Failed to hash password")
        })?
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            ApiError::internal("Failed to hash password")
        })
}

/// Verify a password against a stored digest. A mismatch and a malformed
/// digest both come back as `false`; callers cannot tell them apart.
pub async fn verify_password(password: String, digest: String) -> bool {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &digest).unwrap_or(false))
        .await
        .unwrap_or(false)
}

/// Identity established by the auth middleware, read by handlers as an
/// extractor.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| ApiError::forbidden("Authorization required for this endpoint"))
    }
}

/// Bearer-token guard for protected routes.
///
/// Missing or malformed credentials are a 403; a present but invalid token
/// is a 401. Every rejection returns immediately; nothing downstream runs.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::forbidden("Authorization required for this endpoint"))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::forbidden("Authorization header must use the Bearer scheme"))?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!("Rejected access token: {}", e);
        ApiError::unauthorized("Access token invalid or expired")
    })?;

    // Subjects are stringified unsigned user ids.
    let user_id = claims
        .jti
        .parse::<u64>()
        .ok()
        .and_then(|id| i64::try_from(id).ok())
        .ok_or_else(|| ApiError::unauthorized("Access token invalid or expired"))?;

    request.extensions_mut().insert(AuthUser { id: user_id });
    Ok(next.run(request).await)
}

/// Login endpoint: verifies credentials and issues an access token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Every failure collapses into the same response; the caller never
    // learns whether the email or the password was wrong.
    let denied = || ApiError::unauthorized("Invalid email or password");

    let user = User::get_by_email(&state.db, &request.email)
        .await?
        .ok_or_else(denied)?;

    let user_id = user.id;
    if !verify_password(request.password, user.password_hash).await {
        return Err(denied());
    }

    let access_token = state.tokens.issue(user_id).map_err(|e| {
        tracing::error!("Failed to issue token: {}", e);
        denied()
    })?;

    Ok(Json(LoginResponse { access_token }))
}
