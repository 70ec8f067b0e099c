//! # GET /grant
//!
//! リクエストのセッションに対して、指定トークンへのアクセスグラントを発行する。

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use lunasec_demo_types::{GrantQuery, GrantResponse};

use crate::auth::auth_context;
use crate::config::BackendState;
use crate::error::BackendError;

/// GET /grant — トークングラント発行。
///
/// セッションIDは `id_token` Cookieに対応する記録済みセッションから決める。
/// 見つからない場合は設定されたフォールバックを使い、それも無ければ401。
pub async fn handle_grant(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    query: Result<Query<GrantQuery>, QueryRejection>,
) -> Result<Json<GrantResponse>, BackendError> {
    let Query(query) = query.map_err(|e| {
        BackendError::BadRequest(format!("クエリパラメータのパースに失敗: {e}"))
    })?;

    let Some(token_id) = query.token.filter(|t| !t.is_empty()) else {
        return Err(BackendError::BadRequest(
            "grantリクエストにtokenが指定されていないか、文字列ではありません".to_string(),
        ));
    };

    let session_id = state
        .session_for(auth_context(&headers).as_ref())
        .await
        .ok_or_else(|| {
            BackendError::Unauthorized("grant対象のセッションを特定できません".to_string())
        })?;

    let grant = state
        .token_service
        .authorize(&session_id, &token_id)
        .await?;

    tracing::info!(session_id = %session_id, "トークングラントを発行");
    Ok(Json(GrantResponse { grant }))
}
