use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::authentication::models::SecurityContext;
use crate::authentication::ports::AuthServicePort;
use crate::domain::user::models::Role;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserServicePort;

/// Middleware that resolves bearer tokens into a [`SecurityContext`].
///
/// Runs on every route and never rejects a request for a bad or missing
/// token; it only decides whether a context is attached. A principal store
/// failure is the one case answered directly (500).
pub async fn authenticate<AS, US>(
    State(state): State<AppState<AS, US>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    AS: AuthServicePort,
    US: UserServicePort,
{
    // Owned copy: the request is moved on after the lookup
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let context = state
        .auth_service
        .resolve_security_context(authorization.as_deref())
        .await?;

    if let Some(context) = context {
        tracing::debug!(identity = %context.principal.identity, "Request authenticated");
        req.extensions_mut().insert(context);
    }

    Ok(next.run(req).await)
}

/// Route layer for protected routes: requires an authenticated context.
pub async fn require_authentication(req: Request, next: Next) -> Result<Response, ApiError> {
    let authenticated = req
        .extensions()
        .get::<SecurityContext>()
        .is_some_and(|context| context.authenticated);

    if !authenticated {
        return Err(ApiError::Unauthorized("Unauthorized".to_string()));
    }

    Ok(next.run(req).await)
}

/// Route layer for administration routes: the caller must hold `ADMIN`.
///
/// Anonymous callers get 401, authenticated callers without the role get 403.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let context = req
        .extensions()
        .get::<SecurityContext>()
        .filter(|context| context.authenticated)
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    if !context.principal.has_authority(&Role::admin()) {
        tracing::debug!(identity = %context.principal.identity, "Administration denied");
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    Ok(next.run(req).await)
}
