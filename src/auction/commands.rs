/// Auction workflow commands:
/// 1. register a user
/// 2. create a listing
/// 3. place a bid
/// 4. close an auction
/// 5. toggle a watchlist entry
/// 6. post a comment
// region:    --- Imports
use crate::auction::model::{Bid, Comment, Listing, User};
use crate::database::DatabaseManager;
use crate::error::AuctionError;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
// endregion: --- Imports

// region:    --- Commands

/// New account. Credentials and sessions are handled upstream.
#[derive(Debug, Deserialize)]
pub struct RegisterCommand {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateListingCommand {
    pub title: String,
    pub description: String,
    pub starting_bid: Decimal,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub creator_id: i64,
}

/// Action selector for `POST /listing/:id`. The `action` field in the request
/// body picks the branch, mirroring the single detail-page form.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ListingAction {
    CloseAuction,
    PlaceBid { bid_amount: Decimal },
    ToggleWatchlist,
    AddComment { comment_content: String },
}

#[derive(Debug, Deserialize)]
pub struct ListingActionRequest {
    pub user_id: i64,
    #[serde(flatten)]
    pub action: ListingAction,
}

// endregion: --- Commands

// region:    --- Command Handlers

fn ensure_positive(amount: Decimal, message: &str) -> Result<(), AuctionError> {
    if amount <= Decimal::ZERO {
        return Err(AuctionError::Validation(message.to_string()));
    }
    Ok(())
}

/// 1. Register a user. A duplicate username surfaces as a conflict.
pub async fn handle_register(
    cmd: RegisterCommand,
    db_manager: &DatabaseManager,
) -> Result<User, AuctionError> {
    info!("{:<12} --> register user: {}", "Command", cmd.username);
    sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id, username, email, created_at",
    )
    .bind(&cmd.username)
    .bind(&cmd.email)
    .fetch_one(db_manager.pool())
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AuctionError::UsernameTaken,
        _ => AuctionError::from(e),
    })
}

/// 2. Create a listing. Rejects a non-positive starting bid; nothing is
/// persisted on rejection.
pub async fn handle_create_listing(
    cmd: CreateListingCommand,
    db_manager: &DatabaseManager,
) -> Result<Listing, AuctionError> {
    info!("{:<12} --> create listing: {:?}", "Command", cmd);
    ensure_positive(cmd.starting_bid, "Starting bid must be greater than zero.")?;

    // current_price deliberately starts at 0.00, not at starting_bid, so the
    // first bid is measured against 0. Source behavior, preserved as-is.
    sqlx::query_as::<_, Listing>(
        r#"
        INSERT INTO listings (title, description, starting_bid, current_price, image_url, category_id, creator_id, is_active)
        VALUES ($1, $2, $3, 0.00, $4, $5, $6, TRUE)
        RETURNING id, title, description, starting_bid, current_price, image_url, category_id, creator_id, is_active, created_at
        "#,
    )
    .bind(&cmd.title)
    .bind(&cmd.description)
    .bind(cmd.starting_bid)
    .bind(&cmd.image_url)
    .bind(cmd.category_id)
    .bind(cmd.creator_id)
    .fetch_one(db_manager.pool())
    .await
    .map_err(AuctionError::from)
}

/// 3. Place a bid.
///
/// The accept path is a single transaction around a guarded update: the
/// listing row only moves to the new price when it is still active and the
/// new amount strictly exceeds current_price. Two racing bids therefore
/// cannot both pass the threshold; the loser falls through to the diagnosis
/// branch and is told why.
pub async fn handle_place_bid(
    listing_id: i64,
    user_id: i64,
    bid_amount: Decimal,
    db_manager: &DatabaseManager,
) -> Result<Bid, AuctionError> {
    info!(
        "{:<12} --> bid {} on listing id: {} by user id: {}",
        "Command", bid_amount, listing_id, user_id
    );
    ensure_positive(bid_amount, "Bid amount must be greater than zero.")?;

    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let accepted = sqlx::query(
                    "UPDATE listings SET current_price = $1
                     WHERE id = $2 AND is_active = TRUE AND current_price < $1
                     RETURNING id",
                )
                .bind(bid_amount)
                .bind(listing_id)
                .fetch_optional(&mut **tx)
                .await?;

                if accepted.is_none() {
                    // Diagnose the rejection while still holding the transaction.
                    let listing = sqlx::query_as::<_, Listing>(
                        "SELECT id, title, description, starting_bid, current_price, image_url, category_id, creator_id, is_active, created_at FROM listings WHERE id = $1",
                    )
                    .bind(listing_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or(AuctionError::NotFound("listing"))?;

                    if !listing.is_active {
                        return Err(AuctionError::AuctionClosed);
                    }
                    return Err(AuctionError::BidTooLow {
                        current_price: listing.current_price,
                    });
                }

                let bid = sqlx::query_as::<_, Bid>(
                    "INSERT INTO bids (listing_id, user_id, amount)
                     VALUES ($1, $2, $3)
                     RETURNING id, listing_id, user_id, amount, bid_time",
                )
                .bind(listing_id)
                .bind(user_id)
                .bind(bid_amount)
                .fetch_one(&mut **tx)
                .await?;

                Ok(bid)
            })
        })
        .await
}

/// 4. Close an auction. Creator only; closing an already-closed listing
/// re-applies the closed state and still succeeds.
pub async fn handle_close_auction(
    listing_id: i64,
    user_id: i64,
    db_manager: &DatabaseManager,
) -> Result<Listing, AuctionError> {
    info!(
        "{:<12} --> close listing id: {} by user id: {}",
        "Command", listing_id, user_id
    );
    let closed = sqlx::query_as::<_, Listing>(
        "UPDATE listings SET is_active = FALSE
         WHERE id = $1 AND creator_id = $2
         RETURNING id, title, description, starting_bid, current_price, image_url, category_id, creator_id, is_active, created_at",
    )
    .bind(listing_id)
    .bind(user_id)
    .fetch_optional(db_manager.pool())
    .await?;

    match closed {
        Some(listing) => Ok(listing),
        None => {
            let exists = sqlx::query("SELECT 1 FROM listings WHERE id = $1")
                .bind(listing_id)
                .fetch_optional(db_manager.pool())
                .await?;
            if exists.is_none() {
                Err(AuctionError::NotFound("listing"))
            } else {
                Err(AuctionError::NotCreator)
            }
        }
    }
}

/// 5. Toggle watchlist membership. Returns whether the user is watching
/// after the toggle.
pub async fn handle_toggle_watchlist(
    listing_id: i64,
    user_id: i64,
    db_manager: &DatabaseManager,
) -> Result<bool, AuctionError> {
    info!(
        "{:<12} --> toggle watchlist listing id: {} user id: {}",
        "Command", listing_id, user_id
    );
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let removed =
                    sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND listing_id = $2")
                        .bind(user_id)
                        .bind(listing_id)
                        .execute(&mut **tx)
                        .await?;

                if removed.rows_affected() > 0 {
                    return Ok(false);
                }

                // The pair is the primary key, so a concurrent insert is absorbed.
                sqlx::query(
                    "INSERT INTO watchlist (user_id, listing_id) VALUES ($1, $2)
                     ON CONFLICT (user_id, listing_id) DO NOTHING",
                )
                .bind(user_id)
                .bind(listing_id)
                .execute(&mut **tx)
                .await?;

                Ok(true)
            })
        })
        .await
}

/// 6. Post a comment. Appended unconditionally; only field presence is
/// validated, by deserialization.
pub async fn handle_add_comment(
    listing_id: i64,
    user_id: i64,
    content: String,
    db_manager: &DatabaseManager,
) -> Result<Comment, AuctionError> {
    info!(
        "{:<12} --> comment on listing id: {} by user id: {}",
        "Command", listing_id, user_id
    );
    sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (listing_id, user_id, content)
         VALUES ($1, $2, $3)
         RETURNING id, listing_id, user_id, content, created_at",
    )
    .bind(listing_id)
    .bind(user_id)
    .bind(&content)
    .fetch_one(db_manager.pool())
    .await
    .map_err(AuctionError::from)
}

// endregion: --- Command Handlers

// endregion: --- Tests
