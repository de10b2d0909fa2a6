use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::create_user::UserResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::authentication::models::SecurityContext;
use crate::authentication::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// Profile of the caller named by the request's security context.
pub async fn get_current_user<AS, US>(
    State(state): State<AppState<AS, US>>,
    Extension(context): Extension<SecurityContext>,
) -> Result<ApiSuccess<UserResponseData>, ApiError>
where
    AS: AuthServicePort,
    US: UserServicePort,
{
    let username = Username::new(context.principal.identity).map_err(UserError::from)?;

    state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

pub async fn delete_current_user<AS, US>(
    State(state): State<AppState<AS, US>>,
    Extension(context): Extension<SecurityContext>,
) -> Result<StatusCode, ApiError>
where
    AS: AuthServicePort,
    US: UserServicePort,
{
    let username = Username::new(context.principal.identity).map_err(UserError::from)?;

    state
        .user_service
        .delete_user(&username)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}

/// Change the caller's email and/or password.
pub async fn update_current_user<AS, US>(
    State(state): State<AppState<AS, US>>,
    Extension(context): Extension<SecurityContext>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserResponseData>, ApiError>
where
    AS: AuthServicePort,
    US: UserServicePort,
{
    let username = Username::new(context.principal.identity).map_err(UserError::from)?;

    state
        .user_service
        .update_user(&username, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// HTTP request body for a profile change; absent fields are left alone
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateUserRequest {
    email: Option<String>,
    password: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        Ok(UpdateUserCommand {
            email: self.email.map(EmailAddress::new).transpose()?,
            password: self.password.map(Password::new).transpose()?,
        })
    }
}
