//! # 認証コンテキスト
//!
//! `id_token` Cookieから認証コンテキストを導出する。
//! JWTの検証・クレーム抽出は外部サービスの責務であり、ここではCookieの有無のみを見る。

use axum::http::HeaderMap;
use lunasec_demo_types::{AuthContext, IdToken};

use crate::cookies::{get_cookie, ID_TOKEN_COOKIE};

/// `id_token` Cookieがあれば認証コンテキストを返す。
pub fn auth_context(headers: &HeaderMap) -> Option<AuthContext> {
    get_cookie(headers, ID_TOKEN_COOKIE).map(|token| AuthContext {
        id_token: IdToken::new(token),
    })
}

/// 認証プラグインに渡すコールバック。Cookieが無い場合はエラーログを出す。
pub fn auth_context_callback(headers: &HeaderMap) -> Option<AuthContext> {
    let context = auth_context(headers);
    if context.is_none() {
        tracing::error!("id_tokenがリクエストに設定されていません");
    }
    context
}
