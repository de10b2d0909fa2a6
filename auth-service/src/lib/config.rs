use std::env;
use std::time::Duration;

use auth::KeyError;
use auth::SigningKey;
use auth::TokenLifetimes;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    /// Administrator account ensured at startup
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Postgres connection string; the in-memory store is used when unset
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub refresh_enabled: bool,
}

impl JwtConfig {
    /// Validate the configured secret.
    ///
    /// # Errors
    /// * `Missing` - No secret configured
    /// * `TooShort` - Secret shorter than 32 bytes
    pub fn signing_key(&self) -> Result<SigningKey, KeyError> {
        SigningKey::new(self.secret.as_bytes())
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes {
            access: chrono::Duration::seconds(self.access_token_ttl_secs),
            refresh: chrono::Duration::seconds(self.refresh_token_ttl_secs),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .field("refresh_enabled", &self.refresh_enabled)
            .finish()
    }
}

#[derive(Deserialize, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AdminConfig {
    pub fn command(&self) -> Result<CreateUserCommand, UserError> {
        Ok(CreateUserCommand::new(
            Username::new(self.username.clone())?,
            EmailAddress::new(self.email.clone())?,
            Password::new(self.password.clone())?,
        ))
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__JWT__SECRET, AUTH__SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::with_prefix("AUTH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        configuration.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        ConfigBuilder::builder()
            .set_default("server.http_port", 8080_i64)?
            .set_default("server.request_timeout_secs", 30_i64)?
            .set_default("jwt.access_token_ttl_secs", 900_i64)?
            .set_default("jwt.refresh_token_ttl_secs", 604_800_i64)?
            .set_default("jwt.refresh_enabled", true)
    }
}
