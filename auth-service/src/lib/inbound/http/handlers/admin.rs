use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::create_user::UserResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::authentication::ports::AuthServicePort;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

pub async fn list_users<AS, US>(
    State(state): State<AppState<AS, US>>,
) -> Result<ApiSuccess<Vec<UserResponseData>>, ApiError>
where
    AS: AuthServicePort,
    US: UserServicePort,
{
    state
        .user_service
        .list_users()
        .await
        .map_err(ApiError::from)
        .map(|users| {
            let data = users.iter().map(UserResponseData::from).collect::<Vec<_>>();
            ApiSuccess::new(StatusCode::OK, data)
        })
}

/// Enable or disable the account named in the path.
pub async fn set_user_enabled<AS, US>(
    State(state): State<AppState<AS, US>>,
    Path(username): Path<String>,
    Json(body): Json<SetEnabledRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError>
where
    AS: AuthServicePort,
    US: UserServicePort,
{
    let username = Username::new(username).map_err(UserError::from)?;

    state
        .user_service
        .set_user_enabled(&username, body.enabled)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetEnabledRequest {
    enabled: bool,
}
