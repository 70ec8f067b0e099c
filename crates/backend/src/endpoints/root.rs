//! # GET /

use axum::http::StatusCode;

/// GET / — 本文なしの200を返す。
pub async fn handle_root() -> StatusCode {
    StatusCode::OK
}
