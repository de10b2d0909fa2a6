use std::sync::Arc;

use auth::Authenticator;
use auth_service::authentication::ports::CredentialStore;
use auth_service::authentication::ports::PrincipalLookup;
use auth_service::authentication::service::AuthService;
use auth_service::config::Config;
use auth_service::inbound::http::router::create_router;
use auth_service::repositories::InMemoryUserRepository;
use auth_service::repositories::PostgresUserRepository;
use auth_service::user::ports::UserRepository;
use auth_service::user::ports::UserServicePort;
use auth_service::user::service::UserService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let signing_key = config.jwt.signing_key()?;
    if config.jwt.access_token_ttl_secs < 1 || config.jwt.refresh_token_ttl_secs < 1 {
        anyhow::bail!("Token lifetimes must be at least one second");
    }

    let database = match config.database.url {
        Some(_) => "postgresql",
        None => "memory",
    };
    tracing::info!(
        http_port = config.server.http_port,
        request_timeout_secs = config.server.request_timeout_secs,
        access_token_ttl_secs = config.jwt.access_token_ttl_secs,
        refresh_token_ttl_secs = config.jwt.refresh_token_ttl_secs,
        refresh_enabled = config.jwt.refresh_enabled,
        database,
        "Configuration loaded"
    );

    let authenticator = Arc::new(
        Authenticator::new(&signing_key)
            .with_lifetimes(config.jwt.lifetimes())
            .with_refresh_enabled(config.jwt.refresh_enabled),
    );

    match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = 5,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            serve(
                Arc::new(PostgresUserRepository::new(pg_pool)),
                &config,
                authenticator,
            )
            .await
        }
        None => {
            tracing::warn!("No database configured, users are kept in memory");
            serve(Arc::new(InMemoryUserRepository::new()), &config, authenticator).await
        }
    }
}

async fn serve<R>(
    repository: Arc<R>,
    config: &Config,
    authenticator: Arc<Authenticator>,
) -> Result<(), anyhow::Error>
where
    R: UserRepository + PrincipalLookup + CredentialStore,
{
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&repository),
        Arc::clone(&repository),
        authenticator,
    ));
    let user_service = Arc::new(UserService::new(repository));

    if let Some(admin) = &config.admin {
        let admin = user_service.bootstrap_admin(admin.command()?).await?;
        tracing::info!(username = %admin.username, "Administrator account ready");
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application =
        create_router(auth_service, user_service, config.server.request_timeout());

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
