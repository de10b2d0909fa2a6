use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin::list_users;
use super::handlers::admin::set_user_enabled;
use super::handlers::create_user::create_user;
use super::handlers::current_user::delete_current_user;
use super::handlers::current_user::get_current_user;
use super::handlers::current_user::update_current_user;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::refresh::refresh;
use super::middleware::authenticate;
use super::middleware::require_admin;
use super::middleware::require_authentication;
use crate::authentication::ports::AuthServicePort;
use crate::user::ports::UserServicePort;

pub struct AppState<AS, US>
where
    AS: AuthServicePort,
    US: UserServicePort,
{
    pub auth_service: Arc<AS>,
    pub user_service: Arc<US>,
}

impl<AS, US> Clone for AppState<AS, US>
where
    AS: AuthServicePort,
    US: UserServicePort,
{
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            user_service: Arc::clone(&self.user_service),
        }
    }
}

pub fn create_router<AS, US>(
    auth_service: Arc<AS>,
    user_service: Arc<US>,
    request_timeout: Duration,
) -> Router
where
    AS: AuthServicePort,
    US: UserServicePort,
{
    let state = AppState {
        auth_service,
        user_service,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login::<AS, US>))
        .route("/api/auth/refresh", post(refresh::<AS, US>))
        .route("/api/users", post(create_user::<AS, US>));

    let protected_routes = Router::new()
        .route(
            "/api/users/me",
            get(get_current_user::<AS, US>)
                .patch(update_current_user::<AS, US>)
                .delete(delete_current_user::<AS, US>),
        )
        .route_layer(middleware::from_fn(require_authentication));

    let admin_routes = Router::new()
        .route("/api/admin/users", get(list_users::<AS, US>))
        .route(
            "/api/admin/users/:username/enabled",
            put(set_user_enabled::<AS, US>),
        )
        .route_layer(middleware::from_fn(require_admin));

    // Headers are left out of the span: they carry bearer tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate::<AS, US>,
        ))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
