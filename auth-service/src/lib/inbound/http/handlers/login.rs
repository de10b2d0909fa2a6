use auth::IssuedTokens;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::authentication::models::Credentials;
use crate::authentication::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserServicePort;

pub async fn login<AS, US>(
    State(state): State<AppState<AS, US>>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError>
where
    AS: AuthServicePort,
    US: UserServicePort,
{
    state
        .auth_service
        .login(Credentials::new(body.username, body.password))
        .await
        .map_err(ApiError::from)
        .map(|tokens| ApiSuccess::new(StatusCode::OK, tokens.into()))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

/// Token payload shared by login and refresh responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<IssuedTokens> for TokenResponseData {
    fn from(tokens: IssuedTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.expires_in,
        }
    }
}
