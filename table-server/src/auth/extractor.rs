//! Session Extractor
//!
//! Resolves the bearer token of a request to a [`CurrentUser`]

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, extract_from_header};
use crate::core::ServerState;
use crate::db::repository::session;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_from_header);

        let Some(token) = token else {
            tracing::warn!(uri = %parts.uri, "Missing bearer token");
            return Err(AppError::not_authenticated());
        };

        let user = session::find_user_by_token(&state.db.pool, token)
            .await?
            .map(CurrentUser::from)
            .ok_or_else(|| {
                tracing::warn!(uri = %parts.uri, "No session for bearer token");
                AppError::new(shared::error::ErrorCode::SessionInvalid)
            })?;

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
