use axum::{extract::FromRequestParts, http::header};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{dto::auth::Claims, entity::Users, error::AppError, state::AppState};

/// Signing material for bearer tokens.
#[derive(Clone)]
pub struct AuthKeys {
    secret: String,
    ttl: Duration,
}

impl AuthKeys {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user_id: Uuid, username: &str, is_staff: bool) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            is_staff,
            exp: expiration.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, AppError> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized("Invalid or expired token.".into()))?;

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in token.".into()))?;

        Ok(AuthUser {
            user_id,
            username: decoded.claims.username,
            is_staff: decoded.claims.is_staff,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub is_staff: bool,
}

/// The party behind a request: a verified user, or nobody.
#[derive(Debug, Clone, Default)]
pub struct Caller(pub Option<AuthUser>);

impl Caller {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn authenticated(user: AuthUser) -> Self {
        Self(Some(user))
    }

    pub fn user(&self) -> Result<&AuthUser, AppError> {
        self.0.as_ref().ok_or_else(AppError::unauthenticated)
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Caller::anonymous());
        };

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header.".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme.".into()))?
            .trim();

        let claimed = state.auth.verify(token)?;

        // Staff status is read from the store so demotions apply before the token expires.
        let user = Users::find_by_id(claimed.user_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found.".into()))?;

        Ok(Caller::authenticated(AuthUser {
            user_id: user.id,
            username: user.username,
            is_staff: user.is_staff,
        }))
    }
}
