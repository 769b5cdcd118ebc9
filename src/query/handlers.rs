// region:    --- Imports
use super::queries;
use crate::auction::model::{self, Bid, Category, Comment, Listing, ListingDetail};
use crate::database::DatabaseManager;
use sqlx::Error as SqlxError;
use sqlx::Row;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// Active listings for the index page
pub async fn get_active_listings(db_manager: &DatabaseManager) -> Result<Vec<Listing>, SqlxError> {
    info!("{:<12} --> active listings", "Query");
    sqlx::query_as::<_, Listing>(queries::GET_ACTIVE_LISTINGS)
        .fetch_all(db_manager.pool())
        .await
}

/// Closed listings for the index page
pub async fn get_closed_listings(db_manager: &DatabaseManager) -> Result<Vec<Listing>, SqlxError> {
    info!("{:<12} --> closed listings", "Query");
    sqlx::query_as::<_, Listing>(queries::GET_CLOSED_LISTINGS)
        .fetch_all(db_manager.pool())
        .await
}

/// Single listing lookup
pub async fn get_listing(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Option<Listing>, SqlxError> {
    info!("{:<12} --> listing id: {}", "Query", listing_id);
    sqlx::query_as::<_, Listing>(queries::GET_LISTING)
        .bind(listing_id)
        .fetch_optional(db_manager.pool())
        .await
}

/// Bid history for a listing, most recent first
pub async fn get_listing_bids(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<Bid>, SqlxError> {
    info!("{:<12} --> bids for listing id: {}", "Query", listing_id);
    sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
        .bind(listing_id)
        .fetch_all(db_manager.pool())
        .await
}

/// Highest (most recent) bid for a listing, if any
pub async fn get_highest_bid(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Option<Bid>, SqlxError> {
    info!(
        "{:<12} --> highest bid for listing id: {}",
        "Query", listing_id
    );
    sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
        .bind(listing_id)
        .fetch_optional(db_manager.pool())
        .await
}

/// Comments for a listing, most recent first
pub async fn get_listing_comments(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<Comment>, SqlxError> {
    info!("{:<12} --> comments for listing id: {}", "Query", listing_id);
    sqlx::query_as::<_, Comment>(queries::GET_LISTING_COMMENTS)
        .bind(listing_id)
        .fetch_all(db_manager.pool())
        .await
}

/// Is the listing on this user's watchlist
pub async fn is_watching(
    db_manager: &DatabaseManager,
    user_id: i64,
    listing_id: i64,
) -> Result<bool, SqlxError> {
    let row = sqlx::query(queries::IS_WATCHING)
        .bind(user_id)
        .bind(listing_id)
        .fetch_one(db_manager.pool())
        .await?;
    Ok(row.get("watching"))
}

/// Listings on a user's watchlist
pub async fn get_watchlist_listings(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<Vec<Listing>, SqlxError> {
    info!("{:<12} --> watchlist for user id: {}", "Query", user_id);
    sqlx::query_as::<_, Listing>(queries::GET_WATCHLIST_LISTINGS)
        .bind(user_id)
        .fetch_all(db_manager.pool())
        .await
}

/// All categories
pub async fn get_categories(db_manager: &DatabaseManager) -> Result<Vec<Category>, SqlxError> {
    info!("{:<12} --> all categories", "Query");
    sqlx::query_as::<_, Category>(queries::GET_CATEGORIES)
        .fetch_all(db_manager.pool())
        .await
}

/// Single category lookup
pub async fn get_category(
    db_manager: &DatabaseManager,
    category_id: i64,
) -> Result<Option<Category>, SqlxError> {
    info!("{:<12} --> category id: {}", "Query", category_id);
    sqlx::query_as::<_, Category>(queries::GET_CATEGORY)
        .bind(category_id)
        .fetch_optional(db_manager.pool())
        .await
}

/// Active listings within a category
pub async fn get_category_listings(
    db_manager: &DatabaseManager,
    category_id: i64,
) -> Result<Vec<Listing>, SqlxError> {
    info!(
        "{:<12} --> listings for category id: {}",
        "Query", category_id
    );
    sqlx::query_as::<_, Listing>(queries::GET_CATEGORY_LISTINGS)
        .bind(category_id)
        .fetch_all(db_manager.pool())
        .await
}

/// Assemble the detail view: listing, bids, comments, watch state and the
/// derived win marker for an optional authenticated viewer.
pub async fn get_listing_detail(
    db_manager: &DatabaseManager,
    listing_id: i64,
    viewer_id: Option<i64>,
) -> Result<Option<ListingDetail>, SqlxError> {
    info!(
        "{:<12} --> detail for listing id: {} viewer: {:?}",
        "Query", listing_id, viewer_id
    );
    let Some(listing) = get_listing(db_manager, listing_id).await? else {
        return Ok(None);
    };

    let bids = get_listing_bids(db_manager, listing_id).await?;
    let comments = get_listing_comments(db_manager, listing_id).await?;

    let watching = match viewer_id {
        Some(user_id) => is_watching(db_manager, user_id, listing_id).await?,
        None => false,
    };

    let highest_bid = get_highest_bid(db_manager, listing_id).await?;
    let has_won = model::has_won(&listing, highest_bid.as_ref(), viewer_id);

    Ok(Some(ListingDetail {
        listing,
        bids,
        comments,
        is_watching: watching,
        has_won,
    }))
}

// endregion: --- Query Handlers
