#[cfg(test)]
pub mod test_utils {
    use crate::cli::commands::seed::seed_reference_data;
    use crate::config::AppConfig;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use model::entities::user;
    use moka::future::Cache;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing, migrated and with
    /// the division/district reference set loaded.
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        seed_reference_data(&db)
            .await
            .expect("Failed to seed reference data");

        db
    }

    /// Configuration for tests: fixed secrets, temp upload dir, no SMTP.
    pub fn test_config() -> AppConfig {
        AppConfig {
            jwt_secret: "test-secret".to_string(),
            import_default_password: Some("Initial#1".to_string()),
            base_url: "http://localhost:3000".to_string(),
            upload_dir: std::env::temp_dir().join("prarthi-test-uploads"),
            smtp: None,
        }
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        let cache = Cache::new(100);

        AppState {
            db,
            cache,
            config: test_config(),
            mailer: None,
        }
    }

    /// Insert an admin account and return it with a valid bearer token.
    pub async fn create_admin(state: &AppState) -> (user::Model, String) {
        let password_hash =
            crate::auth::hash_password("Admin#123").expect("Failed to hash password");
        let admin = user::ActiveModel {
            username: Set("admin".to_string()),
            password_hash: Set(password_hash),
            role: Set(user::Role::Admin),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .expect("Failed to create admin user");

        let token = crate::auth::issue_token(&state.config.jwt_secret, &admin)
            .expect("Failed to issue admin token");
        (admin, token)
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let (router, _state) = setup_test_app_with_state().await;
        router
    }

    /// Create axum app for testing, returning the state for direct
    /// database access in assertions.
    pub async fn setup_test_app_with_state() -> (Router, AppState) {
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        let router = create_router(state.clone());
        (router, state)
    }
}
