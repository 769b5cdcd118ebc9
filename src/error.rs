// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use thiserror::Error;
// endregion: --- Imports

// region:    --- AuctionError

/// Every way a workflow request can fail, with the HTTP status and
/// machine-readable code it is reported under.
#[derive(Debug, Error)]
pub enum AuctionError {
    /// Field-level rejection (non-positive amount, etc.).
    #[error("{0}")]
    Validation(String),

    /// The bid did not beat the current price.
    #[error("Your bid needs to be higher than the current highest bid.")]
    BidTooLow { current_price: Decimal },

    /// Bid placed against a listing whose auction already ended.
    #[error("This auction is already closed.")]
    AuctionClosed,

    /// Close attempted by someone other than the listing's creator.
    #[error("Only the creator can close this auction.")]
    NotCreator,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Username already taken.")]
    UsernameTaken,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl AuctionError {
    pub fn code(&self) -> &'static str {
        match self {
            AuctionError::Validation(_) => "INVALID_FIELD",
            AuctionError::BidTooLow { .. } => "LOW_BID",
            AuctionError::AuctionClosed => "ALREADY_CLOSED",
            AuctionError::NotCreator => "NOT_CREATOR",
            AuctionError::NotFound(_) => "NOT_FOUND",
            AuctionError::UsernameTaken => "USERNAME_TAKEN",
            AuctionError::Database(_) => "DATABASE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuctionError::Validation(_)
            | AuctionError::BidTooLow { .. }
            | AuctionError::AuctionClosed => StatusCode::BAD_REQUEST,
            AuctionError::NotCreator => StatusCode::FORBIDDEN,
            AuctionError::NotFound(_) => StatusCode::NOT_FOUND,
            AuctionError::UsernameTaken => StatusCode::CONFLICT,
            AuctionError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        if let AuctionError::BidTooLow { current_price } = &self {
            body["current_price"] = serde_json::json!(current_price);
        }
        (self.status(), Json(body)).into_response()
    }
}

// endregion: --- AuctionError

// endregion: --- Tests
