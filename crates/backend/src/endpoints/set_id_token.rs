//! # GET /set-id-token
//!
//! 新しいセッションを認証し、発行されたIDトークンをCookieに設定してリファラへ戻す。

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use lunasec_demo_types::SessionId;

use crate::config::BackendState;
use crate::cookies::id_token_cookie;
use crate::error::BackendError;

/// GET /set-id-token — IDトークン発行 + リファラへのリダイレクト。
///
/// リファラが無い場合は `/` に戻す。
pub async fn handle_set_id_token(
    State(state): State<Arc<BackendState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Response, BackendError> {
    let session_id = SessionId::generate();
    let id_token = state.token_service.authenticate(&session_id).await?;

    let jar = jar.add(id_token_cookie(id_token.as_str()));

    tracing::info!(session_id = %session_id, "IDトークンを発行");
    state.remember_session(id_token, session_id).await;

    let location = headers
        .get(header::REFERER)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("/"));

    Ok((StatusCode::FOUND, jar, [(header::LOCATION, location)]).into_response())
}
