//! End-to-end tests against a running server (`cargo run`) and the database
//! named by `DATABASE_URL`. They are ignored by default; run them with
//! `cargo test -- --ignored` once both are up.

use chrono::Utc;
use commerce_auctions::auction::model::{Category, Listing, User};
use commerce_auctions::database::DatabaseManager;
use commerce_auctions::query;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

const BASE_URL: &str = "http://localhost:3000";

async fn setup() -> Arc<DatabaseManager> {
    Arc::new(DatabaseManager::new().await)
}

/// Insert a user directly; usernames get a nanosecond suffix to stay unique
/// across test runs.
async fn create_test_user(db_manager: &DatabaseManager, prefix: &str) -> User {
    let username = format!(
        "{}_{}",
        prefix,
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );
    sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id, username, email, created_at",
    )
    .bind(&username)
    .bind(format!("{username}@example.com"))
    .fetch_one(db_manager.pool())
    .await
    .unwrap()
}

/// Insert a listing directly, with an explicit current price so tests can
/// start mid-auction.
async fn create_test_listing(
    db_manager: &DatabaseManager,
    creator_id: i64,
    current_price: Decimal,
) -> Listing {
    sqlx::query_as::<_, Listing>(
        "INSERT INTO listings (title, description, starting_bid, current_price, creator_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, title, description, starting_bid, current_price, image_url, category_id, creator_id, is_active, created_at",
    )
    .bind("Test listing")
    .bind("A listing created for the integration tests.")
    .bind(dec!(10.00))
    .bind(current_price)
    .bind(creator_id)
    .fetch_one(db_manager.pool())
    .await
    .unwrap()
}

async fn create_test_category(db_manager: &DatabaseManager, name: &str) -> Category {
    sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
        .bind(name)
        .fetch_one(db_manager.pool())
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires a running server and DATABASE_URL"]
async fn test_place_bid() {
    let db_manager = setup().await;
    let client = Client::new();

    let seller = create_test_user(&db_manager, "seller").await;
    let bidder = create_test_user(&db_manager, "bidder").await;
    let listing = create_test_listing(&db_manager, seller.id, dec!(100.00)).await;

    let response = client
        .post(format!("{BASE_URL}/listing/{}", listing.id))
        .json(&json!({
            "user_id": bidder.id,
            "action": "place_bid",
            "bid_amount": "150.00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let updated = query::handlers::get_listing(&db_manager, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.current_price, dec!(150.00));

    let bids = query::handlers::get_listing_bids(&db_manager, listing.id)
        .await
        .unwrap();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].user_id, bidder.id);
}

#[tokio::test]
#[ignore = "requires a running server and DATABASE_URL"]
async fn test_bid_not_above_current_price_is_rejected() {
    let db_manager = setup().await;
    let client = Client::new();

    let seller = create_test_user(&db_manager, "seller").await;
    let bidder = create_test_user(&db_manager, "bidder").await;
    let listing = create_test_listing(&db_manager, seller.id, dec!(150.00)).await;

    let response = client
        .post(format!("{BASE_URL}/listing/{}", listing.id))
        .json(&json!({
            "user_id": bidder.id,
            "action": "place_bid",
            "bid_amount": "150.00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "LOW_BID");

    // Neither the price nor the bid list moved.
    let updated = query::handlers::get_listing(&db_manager, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.current_price, dec!(150.00));
    let bids = query::handlers::get_listing_bids(&db_manager, listing.id)
        .await
        .unwrap();
    assert!(bids.is_empty());
}

#[tokio::test]
#[ignore = "requires a running server and DATABASE_URL"]
async fn test_non_positive_amounts_are_rejected() {
    let db_manager = setup().await;
    let client = Client::new();

    let seller = create_test_user(&db_manager, "seller").await;

    let response = client
        .post(format!("{BASE_URL}/create_listing"))
        .json(&json!({
            "title": "Free lamp",
            "description": "Should not be accepted.",
            "starting_bid": "0.00",
            "creator_id": seller.id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let listing = create_test_listing(&db_manager, seller.id, dec!(0.00)).await;
    let response = client
        .post(format!("{BASE_URL}/listing/{}", listing.id))
        .json(&json!({
            "user_id": seller.id,
            "action": "place_bid",
            "bid_amount": "-5.00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running server and DATABASE_URL"]
async fn test_only_the_creator_can_close() {
    let db_manager = setup().await;
    let client = Client::new();

    let seller = create_test_user(&db_manager, "seller").await;
    let stranger = create_test_user(&db_manager, "stranger").await;
    let listing = create_test_listing(&db_manager, seller.id, dec!(0.00)).await;

    let response = client
        .post(format!("{BASE_URL}/listing/{}", listing.id))
        .json(&json!({"user_id": stranger.id, "action": "close_auction"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let unchanged = query::handlers::get_listing(&db_manager, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert!(unchanged.is_active);

    let response = client
        .post(format!("{BASE_URL}/listing/{}", listing.id))
        .json(&json!({"user_id": seller.id, "action": "close_auction"}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let closed = query::handlers::get_listing(&db_manager, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!closed.is_active);
}

#[tokio::test]
#[ignore = "requires a running server and DATABASE_URL"]
async fn test_bids_on_closed_listings_are_rejected() {
    let db_manager = setup().await;
    let client = Client::new();

    let seller = create_test_user(&db_manager, "seller").await;
    let bidder = create_test_user(&db_manager, "bidder").await;
    let listing = create_test_listing(&db_manager, seller.id, dec!(100.00)).await;

    client
        .post(format!("{BASE_URL}/listing/{}", listing.id))
        .json(&json!({"user_id": seller.id, "action": "close_auction"}))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .post(format!("{BASE_URL}/listing/{}", listing.id))
        .json(&json!({
            "user_id": bidder.id,
            "action": "place_bid",
            "bid_amount": "200.00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "ALREADY_CLOSED");
}

#[tokio::test]
#[ignore = "requires a running server and DATABASE_URL"]
async fn test_watchlist_double_toggle_restores_membership() {
    let db_manager = setup().await;
    let client = Client::new();

    let seller = create_test_user(&db_manager, "seller").await;
    let watcher = create_test_user(&db_manager, "watcher").await;
    let listing = create_test_listing(&db_manager, seller.id, dec!(0.00)).await;

    for expected in [true, false] {
        let response = client
            .post(format!("{BASE_URL}/listing/{}", listing.id))
            .json(&json!({"user_id": watcher.id, "action": "toggle_watchlist"}))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["is_watching"], expected);
    }

    let watching = query::handlers::is_watching(&db_manager, watcher.id, listing.id)
        .await
        .unwrap();
    assert!(!watching);
}

/// The full workflow: A outbids, B matches and is rejected, the creator
/// closes, and only A sees the win marker.
#[tokio::test]
#[ignore = "requires a running server and DATABASE_URL"]
async fn test_winner_scenario() {
    let db_manager = setup().await;
    let client = Client::new();

    let seller = create_test_user(&db_manager, "seller").await;
    let user_a = create_test_user(&db_manager, "user_a").await;
    let user_b = create_test_user(&db_manager, "user_b").await;
    let listing = create_test_listing(&db_manager, seller.id, dec!(100.00)).await;

    // A bids 150.
    let response = client
        .post(format!("{BASE_URL}/listing/{}", listing.id))
        .json(&json!({"user_id": user_a.id, "action": "place_bid", "bid_amount": "150.00"}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // B matches 150 and is rejected.
    let response = client
        .post(format!("{BASE_URL}/listing/{}", listing.id))
        .json(&json!({"user_id": user_b.id, "action": "place_bid", "bid_amount": "150.00"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let current = query::handlers::get_listing(&db_manager, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.current_price, dec!(150.00));

    // The creator closes.
    let response = client
        .post(format!("{BASE_URL}/listing/{}", listing.id))
        .json(&json!({"user_id": seller.id, "action": "close_auction"}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // A sees the win marker, B does not.
    let detail_a: Value = client
        .get(format!(
            "{BASE_URL}/listing/{}?viewer_id={}",
            listing.id, user_a.id
        ))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .unwrap();
    assert_eq!(detail_a["has_won"], true);

    let detail_b: Value = client
        .get(format!(
            "{BASE_URL}/listing/{}?viewer_id={}",
            listing.id, user_b.id
        ))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .unwrap();
    assert_eq!(detail_b["has_won"], false);
}

#[tokio::test]
#[ignore = "requires a running server and DATABASE_URL"]
async fn test_add_comment_creates_a_row() {
    let db_manager = setup().await;
    let client = Client::new();

    let seller = create_test_user(&db_manager, "seller").await;
    let commenter = create_test_user(&db_manager, "commenter").await;
    let listing = create_test_listing(&db_manager, seller.id, dec!(0.00)).await;

    let response = client
        .post(format!("{BASE_URL}/listing/{}", listing.id))
        .json(&json!({
            "user_id": commenter.id,
            "action": "add_comment",
            "comment_content": "Does it ship overseas?"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["comment"]["content"], "Does it ship overseas?");

    let comments = query::handlers::get_listing_comments(&db_manager, listing.id)
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].user_id, commenter.id);
    assert_eq!(comments[0].content, "Does it ship overseas?");
}

#[tokio::test]
#[ignore = "requires a running server and DATABASE_URL"]
async fn test_category_browse_shows_only_active_listings() {
    let db_manager = setup().await;
    let client = Client::new();

    let seller = create_test_user(&db_manager, "seller").await;
    let category = create_test_category(&db_manager, "Lighting").await;
    let active = create_test_listing(&db_manager, seller.id, dec!(0.00)).await;
    let closed = create_test_listing(&db_manager, seller.id, dec!(0.00)).await;

    sqlx::query("UPDATE listings SET category_id = $1 WHERE id = ANY($2)")
        .bind(category.id)
        .bind(vec![active.id, closed.id])
        .execute(db_manager.pool())
        .await
        .unwrap();

    client
        .post(format!("{BASE_URL}/listing/{}", closed.id))
        .json(&json!({"user_id": seller.id, "action": "close_auction"}))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = client
        .get(format!("{BASE_URL}/categories/{}", category.id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .unwrap();

    assert_eq!(body["category"]["name"], "Lighting");
    let listings = body["listings"].as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["id"], active.id);
}

#[tokio::test]
#[ignore = "requires a running server and DATABASE_URL"]
async fn test_duplicate_username_is_a_conflict() {
    let db_manager = setup().await;
    let client = Client::new();

    let existing = create_test_user(&db_manager, "taken").await;

    let response = client
        .post(format!("{BASE_URL}/register"))
        .json(&json!({"username": existing.username, "email": "other@example.com"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "USERNAME_TAKEN");
}
