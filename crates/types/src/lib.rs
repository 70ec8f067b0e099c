//! # LunaSec デモバックエンド 共有型定義
//!
//! バックエンド・SDKクライアント間で共有するデータ構造を提供する。
//!
//! ## 取り扱い規則
//! - セッションID・IDトークン・グラントはすべて不透明な文字列として扱う
//! - フォームにはトークン（機密値への参照）のみを載せ、平文は載せない

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// セッション・IDトークン
// ---------------------------------------------------------------------------

/// 認証リクエストごとに生成される不透明なセッション識別子。
/// 一意性の検証や永続化は行わない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// 新しいセッションIDをランダムに生成する（UUID v4）。
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// トークンサービスが発行するIDトークン。
/// クライアント側では `id_token` Cookieとして保持される。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdToken(String);

impl IdToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 認証コンテキスト。
/// `id_token` Cookieが存在する場合にのみ構築される。
/// JWTのクレーム抽出は行わない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// リクエストに付与されていたIDトークン
    pub id_token: IdToken,
}

// ---------------------------------------------------------------------------
// セキュアフォーム
// ---------------------------------------------------------------------------

/// トークン化されたフォームデータ。
/// 機密値そのものではなく、機密値を参照するトークンのみを持つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureFormData {
    /// SSNを参照するトークン
    #[serde(rename = "ssnToken")]
    pub ssn_token: String,
}

/// トークンを平文に解決した後のフォームデータ。
/// `SecureFunction` の内部でのみ生成される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFormData {
    /// SSN（平文）
    pub ssn: String,
}

/// POST /signup リクエストボディ。
///
/// `ssnToken` の欠落・型不一致はハンドラ側で400として扱うため、
/// ここでは任意のJSON値として受け取る。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(rename = "ssnToken", default)]
    pub ssn_token: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// グラント
// ---------------------------------------------------------------------------

/// トークンサービスが返す不透明なグラント。
/// シリアライズ時は文字列そのものになる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenGrant(String);

impl TokenGrant {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// GET /grant クエリパラメータ。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrantQuery {
    /// グラント対象のトークンID
    #[serde(default)]
    pub token: Option<String>,
}

/// GET /grant レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantResponse {
    pub grant: TokenGrant,
}

/// GET /secure-frame クエリパラメータ。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecureFrameQuery {
    /// セキュアフレームから受け取ったstate値
    #[serde(default)]
    pub state: Option<String>,
}

// ---------------------------------------------------------------------------
// トークンサービス API
// ---------------------------------------------------------------------------

/// POST /session/authenticate リクエスト。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub session_id: SessionId,
}

/// POST /session/authenticate レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    /// 発行されたIDトークン
    pub token: IdToken,
}

/// POST /grant/set リクエスト。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    pub session_id: SessionId,
    pub token_id: String,
}

/// POST /grant/set レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeResponse {
    pub grant: TokenGrant,
}

/// POST /detokenize リクエスト。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetokenizeRequest {
    pub token_id: String,
}

/// POST /detokenize レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetokenizeResponse {
    /// 解決された平文。値が存在しない場合はnull。
    #[serde(default)]
    pub value: Option<String>,
}
