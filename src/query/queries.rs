/// Active listings, newest first
pub const GET_ACTIVE_LISTINGS: &str =
    "SELECT id, title, description, starting_bid, current_price, image_url, category_id, creator_id, is_active, created_at FROM listings WHERE is_active = TRUE ORDER BY created_at DESC";

/// Closed listings, newest first
pub const GET_CLOSED_LISTINGS: &str =
    "SELECT id, title, description, starting_bid, current_price, image_url, category_id, creator_id, is_active, created_at FROM listings WHERE is_active = FALSE ORDER BY created_at DESC";

/// Single listing
pub const GET_LISTING: &str =
    "SELECT id, title, description, starting_bid, current_price, image_url, category_id, creator_id, is_active, created_at FROM listings WHERE id = $1";

/// Bids for a listing, most recent first
pub const GET_LISTING_BIDS: &str = r#"
    SELECT id, listing_id, user_id, amount, bid_time
    FROM bids
    WHERE listing_id = $1
    ORDER BY bid_time DESC, id DESC
"#;

/// Highest bid: the most recently accepted one (acceptance enforces strictly
/// increasing amounts, so most recent and largest coincide)
pub const GET_HIGHEST_BID: &str = r#"
    SELECT id, listing_id, user_id, amount, bid_time
    FROM bids
    WHERE listing_id = $1
    ORDER BY bid_time DESC, id DESC
    LIMIT 1
"#;

/// Comments for a listing, most recent first
pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT id, listing_id, user_id, content, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY created_at DESC, id DESC
"#;

/// Watchlist membership probe
pub const IS_WATCHING: &str =
    "SELECT EXISTS (SELECT 1 FROM watchlist WHERE user_id = $1 AND listing_id = $2) AS watching";

/// Listings on a user's watchlist, newest listing first
pub const GET_WATCHLIST_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.starting_bid, l.current_price, l.image_url, l.category_id, l.creator_id, l.is_active, l.created_at
    FROM listings l
    JOIN watchlist w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY l.created_at DESC
"#;

/// All categories
pub const GET_CATEGORIES: &str = "SELECT id, name FROM categories ORDER BY name";

/// Single category
pub const GET_CATEGORY: &str = "SELECT id, name FROM categories WHERE id = $1";

/// Active listings within a category
pub const GET_CATEGORY_LISTINGS: &str =
    "SELECT id, title, description, starting_bid, current_price, image_url, category_id, creator_id, is_active, created_at FROM listings WHERE category_id = $1 AND is_active = TRUE ORDER BY created_at DESC";
