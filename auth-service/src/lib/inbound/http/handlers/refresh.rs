use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::login::TokenResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::authentication::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserServicePort;

pub async fn refresh<AS, US>(
    State(state): State<AppState<AS, US>>,
    Json(body): Json<RefreshRequestBody>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError>
where
    AS: AuthServicePort,
    US: UserServicePort,
{
    state
        .auth_service
        .refresh(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|tokens| ApiSuccess::new(StatusCode::OK, tokens.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshRequestBody {
    refresh_token: String,
}
