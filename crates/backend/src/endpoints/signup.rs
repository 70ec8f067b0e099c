//! # POST /signup
//!
//! トークン化されたサインアップフォームを受け取り、セキュアリゾルバ経由でフォーム処理に渡す。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use lunasec_demo_types::{SecureFormData, SignupRequest};

use crate::config::BackendState;
use crate::error::BackendError;

/// POST /signup — セキュアフォームの処理。
///
/// - `ssnToken` が無い・空・文字列でない → 400
/// - フォーム処理が結果を返さない、またはリゾルバが失敗 → 500
pub async fn handle_signup(
    State(state): State<Arc<BackendState>>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<StatusCode, BackendError> {
    let Json(body) = body
        .map_err(|e| BackendError::BadRequest(format!("リクエストボディのパースに失敗: {e}")))?;

    let ssn_token = match body.ssn_token {
        Some(serde_json::Value::String(token)) if !token.trim().is_empty() => token,
        _ => {
            return Err(BackendError::BadRequest(
                "ssnTokenが設定されていません".to_string(),
            ))
        }
    };

    let plaintext = state
        .secure_process_form
        .call(SecureFormData { ssn_token })
        .await?
        .ok_or_else(|| BackendError::Internal("フォーム処理の呼び出しに失敗".to_string()))?;

    tracing::info!(bytes = plaintext.len(), "セキュアフォームを処理しました");
    Ok(StatusCode::OK)
}
