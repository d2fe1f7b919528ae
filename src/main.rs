//! Portfolio Backend
//!
//! A REST backend for a personal portfolio/blog website: blog posts, case
//! studies, a profile with ordered sub-resources, contact submissions, admin
//! accounts, and an image processing pipeline over a pluggable object store.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod images;
mod models;
mod storage;
mod validation;

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use images::ImagePipeline;
use storage::ObjectStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub store: Arc<ObjectStore>,
    pub pipeline: Arc<ImagePipeline>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Portfolio Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if the token signing secret was not configured
    if config.jwt_secret == "dev-secret" {
        tracing::warn!("No PORTFOLIO_JWT_SECRET configured. Using the development signing secret!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Initialize object storage
    let store = Arc::new(match &config.storage_root {
        Some(root) => {
            tracing::info!("Object storage root: {:?}", root);
            ObjectStore::fs(root.clone())
        }
        None => {
            tracing::warn!(
                "No storage root configured (PORTFOLIO_STORAGE_ROOT). Using the in-memory object store!"
            );
            ObjectStore::memory()
        }
    });

    let pipeline = Arc::new(ImagePipeline::new(store.clone(), &config.public_url_base));

    // Create the initial super admin if the system is empty
    ensure_bootstrap_admin(&repo, &config).await?;

    // Create application state
    let state = AppState {
        repo,
        store,
        pipeline,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = match state.config.cors_origin.as_str() {
        "*" => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        origin => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(_) => {
                tracing::warn!("Invalid PORTFOLIO_CORS_ORIGIN {:?}; allowing any origin", origin);
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        },
    };

    // API routes
    let api_routes = Router::new()
        // Blog posts
        .route("/blog-posts", get(api::list_blog_posts))
        .route("/blog-posts", post(api::create_blog_post))
        .route("/blog-posts/{id}", get(api::get_blog_post))
        .route("/blog-posts/{id}", put(api::update_blog_post))
        .route("/blog-posts/{id}", delete(api::delete_blog_post))
        // Case studies
        .route("/case-studies", get(api::list_case_studies))
        .route("/case-studies", post(api::create_case_study))
        .route("/case-studies/{id}", get(api::get_case_study))
        .route("/case-studies/{id}", put(api::update_case_study))
        .route("/case-studies/{id}", delete(api::delete_case_study))
        .route("/case-studies/{id}/sections", get(api::list_case_study_sections))
        .route("/case-studies/{id}/sections", post(api::add_case_study_section))
        .route("/case-studies/{id}/metrics", get(api::list_case_study_metrics))
        .route("/case-studies/{id}/metrics", post(api::add_case_study_metric))
        // Profile
        .route("/profile", get(api::get_profile))
        .route("/profile", put(api::update_profile))
        .route("/profile/experience", post(api::add_work_experience))
        .route("/profile/education", post(api::add_education))
        .route("/profile/skills", post(api::add_skill))
        // Contact
        .route("/contact", post(api::submit_contact_form))
        .route("/contact", get(api::list_contact_submissions))
        .route("/contact/{id}/read", post(api::mark_contact_read))
        .route("/contact/{id}", delete(api::delete_contact_submission))
        // Admin accounts
        .route("/admin/login", post(api::login))
        .route("/admin/accounts", post(api::create_admin))
        .route("/admin/accounts/{uid}/role", put(api::update_admin_role))
        // Images
        .route("/images", get(api::list_images))
        .route("/images/upload", post(api::upload_image))
        .route("/images/process", post(api::process_image))
        .route("/images/auto", post(api::auto_process_image));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint; reports store connectivity.
async fn health_check(State(state): State<AppState>) -> api::ApiResult<serde_json::Value> {
    state.repo.ping().await?;
    api::success(serde_json::json!({ "status": "ok", "database": "connected" }))
}

/// Create the initial super admin when no accounts exist.
async fn ensure_bootstrap_admin(repo: &Repository, config: &Config) -> Result<(), errors::AppError> {
    if repo.count_admin_accounts().await? > 0 {
        return Ok(());
    }

    let (Some(email), Some(password)) = (
        &config.bootstrap_admin_email,
        &config.bootstrap_admin_password,
    ) else {
        tracing::warn!(
            "No admin accounts exist and no bootstrap credentials configured (PORTFOLIO_BOOTSTRAP_ADMIN_EMAIL / _PASSWORD)"
        );
        return Ok(());
    };

    let password_hash = auth::hash_password(password)?;
    let account = repo
        .create_admin_account(email, &password_hash, None, models::Role::SuperAdmin, None)
        .await?;
    tracing::info!("Created bootstrap super admin {}", account.email);

    Ok(())
}

#[cfg(test)]
mod tests;
