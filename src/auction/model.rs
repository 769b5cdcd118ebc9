use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Registered user. Passwords and sessions live outside this service.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// Static reference data for browsing.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

// An item up for auction.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub starting_bid: Decimal,
    pub current_price: Decimal,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub creator_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// A monetary offer against a listing. Immutable once accepted.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub bid_time: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Everything the detail page shows for one listing.
#[derive(Debug, Serialize)]
pub struct ListingDetail {
    pub listing: Listing,
    pub bids: Vec<Bid>,
    pub comments: Vec<Comment>,
    pub is_watching: bool,
    pub has_won: bool,
}

/// A viewer has won when the auction is closed and the highest bid is theirs.
/// There is no persisted winner field; this is derived on every read.
pub fn has_won(listing: &Listing, highest_bid: Option<&Bid>, viewer: Option<i64>) -> bool {
    match (highest_bid, viewer) {
        (Some(bid), Some(user_id)) => !listing.is_active && bid.user_id == user_id,
        _ => false,
    }
}

// endregion: --- Tests
