//! # Cookie ヘルパー

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar};

/// IDトークンを保持するCookie名。
pub const ID_TOKEN_COOKIE: &str = "id_token";

/// `Cookie` ヘッダから指定名の値を取り出す。空の値は無いものとして扱う。
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(name)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty())
}

/// サイト全体で送られるIDトークンCookie。
pub fn id_token_cookie(value: impl Into<String>) -> Cookie<'static> {
    Cookie::build((ID_TOKEN_COOKIE, value.into()))
        .path("/")
        .build()
}
