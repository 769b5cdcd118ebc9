// region:    --- Imports
use crate::database::DatabaseManager;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Modules
mod auction;
mod database;
mod error;
mod handlers;
mod query;

// endregion: --- Modules

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let db_manager = Arc::new(DatabaseManager::new().await);

    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> schema initialization failed: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> schema ready", "Main");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes_all = Router::new()
        .route("/", get(handlers::handle_index))
        .route("/register", post(handlers::handle_register_user))
        .route(
            "/create_listing",
            post(handlers::handle_create_listing_request),
        )
        .route(
            "/listing/:id",
            get(handlers::handle_listing_detail).post(handlers::handle_listing_action),
        )
        .route("/watchlist/:user_id", get(handlers::handle_watchlist))
        .route("/categories", get(handlers::handle_categories))
        .route("/categories/:id", get(handlers::handle_category_listings))
        .layer(cors)
        .with_state(db_manager);

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
