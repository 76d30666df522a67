use crate::mailer::Mailer;
use crate::schemas::AppState;
use anyhow::{Context, Result};
use moka::future::Cache;
use sea_orm::Database;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Runtime configuration, loaded once from the environment.
///
/// Secrets are injected, never defaulted: `JWT_SECRET` is required, and the
/// bulk importer refuses to create accounts unless `IMPORT_DEFAULT_PASSWORD`
/// is set.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HMAC secret for bearer tokens.
    pub jwt_secret: String,
    /// Initial password for accounts created by the bulk importer.
    pub import_default_password: Option<String>,
    /// Public base URL prefixed to stored upload paths in responses.
    pub base_url: String,
    /// Directory where uploaded files are written; served at `/uploads`.
    pub upload_dir: PathBuf,
    pub smtp: Option<SmtpConfig>,
}

/// SMTP relay settings for contact-message notifications.
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Sender mailbox, e.g. `Prarthi <noreply@example.org>`.
    pub from: String,
}

/// Load configuration from the environment (and `.env` if present).
pub fn load_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let jwt_secret = std::env::var("JWT_SECRET")
        .context("JWT_SECRET must be set (no built-in fallback secret)")?;

    let import_default_password = std::env::var("IMPORT_DEFAULT_PASSWORD").ok();
    if import_default_password.is_none() {
        warn!("IMPORT_DEFAULT_PASSWORD not set; bulk import will be rejected");
    }

    let base_url =
        std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let upload_dir: PathBuf = std::env::var("UPLOAD_DIR")
        .unwrap_or_else(|_| "uploads".to_string())
        .into();

    let smtp = match (
        std::env::var("SMTP_HOST"),
        std::env::var("SMTP_USER"),
        std::env::var("SMTP_PASS"),
    ) {
        (Ok(host), Ok(username), Ok(password)) => {
            let from = std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| format!("Prarthi <{}>", username));
            Some(SmtpConfig {
                host,
                username,
                password,
                from,
            })
        }
        _ => {
            warn!("SMTP not fully configured; contact notifications disabled");
            None
        }
    };

    Ok(AppConfig {
        jwt_secret,
        import_default_password,
        base_url,
        upload_dir,
        smtp,
    })
}

/// Initialize application configuration and state
pub async fn initialize_app_state(database_url: &str) -> Result<AppState> {
    let config = load_config()?;

    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    // Profile pages are read far more often than they change; cache the
    // rendered response per slug.
    let cache = Cache::builder()
        .max_capacity(1000)
        .time_to_live(Duration::from_secs(300)) // 5 minutes
        .build();

    let mailer = match &config.smtp {
        Some(smtp) => match Mailer::from_config(smtp) {
            Ok(mailer) => Some(Arc::new(mailer)),
            Err(e) => {
                warn!("Failed to initialize SMTP mailer: {}", e);
                None
            }
        },
        None => None,
    };

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {:?}", config.upload_dir))?;
    info!("Uploads stored under {:?}", config.upload_dir);

    Ok(AppState {
        db,
        cache,
        config,
        mailer,
    })
}

/// Get database URL from environment or use default
pub fn get_database_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://prarthi.db".to_string())
}

/// Get bind address from environment or use default
pub fn get_bind_address() -> String {
    std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}
