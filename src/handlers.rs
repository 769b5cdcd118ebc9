// region:    --- Imports
use crate::auction::commands::{
    handle_add_comment, handle_close_auction, handle_create_listing, handle_place_bid,
    handle_register, handle_toggle_watchlist, CreateListingCommand, ListingAction,
    ListingActionRequest, RegisterCommand,
};
use crate::database::DatabaseManager;
use crate::error::AuctionError;
use crate::query;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Command Handlers

/// Register a new user
pub async fn handle_register_user(
    State(db_manager): State<Arc<DatabaseManager>>,
    Json(cmd): Json<RegisterCommand>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> register request: {:?}", "Handler", cmd);
    let user = handle_register(cmd, &db_manager).await?;
    Ok(Json(serde_json::json!({
        "message": "Registration successful.",
        "user": user
    })))
}

/// Create a listing
pub async fn handle_create_listing_request(
    State(db_manager): State<Arc<DatabaseManager>>,
    Json(cmd): Json<CreateListingCommand>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> create listing request: {:?}", "Handler", cmd);
    let listing = handle_create_listing(cmd, &db_manager).await?;
    Ok(Json(serde_json::json!({
        "message": "Listing created.",
        "listing": listing
    })))
}

/// Detail-page actions: close_auction, place_bid, toggle_watchlist, add_comment
pub async fn handle_listing_action(
    State(db_manager): State<Arc<DatabaseManager>>,
    Path(listing_id): Path<i64>,
    Json(req): Json<ListingActionRequest>,
) -> Result<impl IntoResponse, AuctionError> {
    info!(
        "{:<12} --> action on listing id: {} request: {:?}",
        "Handler", listing_id, req
    );

    // Every action targets an existing listing.
    query::handlers::get_listing(&db_manager, listing_id)
        .await?
        .ok_or(AuctionError::NotFound("listing"))?;

    let response = match req.action {
        ListingAction::CloseAuction => {
            let listing = handle_close_auction(listing_id, req.user_id, &db_manager).await?;
            serde_json::json!({
                "message": "Auction closed.",
                "listing": listing
            })
        }
        ListingAction::PlaceBid { bid_amount } => {
            let bid = handle_place_bid(listing_id, req.user_id, bid_amount, &db_manager).await?;
            serde_json::json!({
                "message": "Bid placed.",
                "bid": bid,
                "current_price": bid.amount
            })
        }
        ListingAction::ToggleWatchlist => {
            let watching = handle_toggle_watchlist(listing_id, req.user_id, &db_manager).await?;
            serde_json::json!({
                "message": (if watching { "Added to watchlist." } else { "Removed from watchlist." }),
                "is_watching": watching
            })
        }
        ListingAction::AddComment { comment_content } => {
            let comment =
                handle_add_comment(listing_id, req.user_id, comment_content, &db_manager).await?;
            serde_json::json!({
                "message": "Comment added.",
                "comment": comment
            })
        }
    };

    Ok(Json(response))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// Index: all listings split into active and closed
pub async fn handle_index(
    State(db_manager): State<Arc<DatabaseManager>>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> index", "HandlerQuery");
    let active_listings = query::handlers::get_active_listings(&db_manager).await?;
    let closed_listings = query::handlers::get_closed_listings(&db_manager).await?;
    Ok(Json(serde_json::json!({
        "active_listings": active_listings,
        "closed_listings": closed_listings
    })))
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub viewer_id: Option<i64>,
}

/// Listing detail with bids, comments, watch state and win marker
pub async fn handle_listing_detail(
    State(db_manager): State<Arc<DatabaseManager>>,
    Path(listing_id): Path<i64>,
    Query(params): Query<DetailParams>,
) -> Result<impl IntoResponse, AuctionError> {
    info!(
        "{:<12} --> listing detail id: {} viewer: {:?}",
        "HandlerQuery", listing_id, params.viewer_id
    );
    let detail = query::handlers::get_listing_detail(&db_manager, listing_id, params.viewer_id)
        .await?
        .ok_or(AuctionError::NotFound("listing"))?;
    Ok(Json(detail))
}

/// A user's watchlist
pub async fn handle_watchlist(
    State(db_manager): State<Arc<DatabaseManager>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> watchlist user id: {}", "HandlerQuery", user_id);
    let listings = query::handlers::get_watchlist_listings(&db_manager, user_id).await?;
    Ok(Json(serde_json::json!({ "listings": listings })))
}

/// Category overview
pub async fn handle_categories(
    State(db_manager): State<Arc<DatabaseManager>>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> categories", "HandlerQuery");
    let categories = query::handlers::get_categories(&db_manager).await?;
    Ok(Json(serde_json::json!({ "categories": categories })))
}

/// Active listings within one category
pub async fn handle_category_listings(
    State(db_manager): State<Arc<DatabaseManager>>,
    Path(category_id): Path<i64>,
) -> Result<impl IntoResponse, AuctionError> {
    info!(
        "{:<12} --> category listings id: {}",
        "HandlerQuery", category_id
    );
    let category = query::handlers::get_category(&db_manager, category_id)
        .await?
        .ok_or(AuctionError::NotFound("category"))?;
    let listings = query::handlers::get_category_listings(&db_manager, category_id).await?;
    Ok(Json(serde_json::json!({
        "category": category,
        "listings": listings
    })))
}

// endregion: --- Query Handlers
