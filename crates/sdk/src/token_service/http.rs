//! # HTTP トークン認証サービス
//!
//! 外部トークンサービスのHTTP APIを呼び出す実装。
//!
//! ## API
//! - `POST /session/authenticate` — `{session_id}` → `{token}`
//! - `POST /grant/set` — `{session_id, token_id}` → `{grant}`

use lunasec_demo_types::{
    AuthenticateRequest, AuthenticateResponse, AuthorizeRequest, AuthorizeResponse, IdToken,
    SessionId, TokenGrant,
};

use super::TokenAuthService;
use crate::client::post_json;
use crate::error::SdkError;

/// 外部トークンサービスへのHTTPクライアント。
pub struct HttpTokenAuthService {
    /// トークンサービスのベースURL
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpTokenAuthService {
    pub fn new(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
        }
    }
}

#[async_trait::async_trait]
impl TokenAuthService for HttpTokenAuthService {
    async fn authenticate(&self, session_id: &SessionId) -> Result<IdToken, SdkError> {
        let request = AuthenticateRequest {
            session_id: session_id.clone(),
        };
        let response: AuthenticateResponse = post_json(
            &self.http_client,
            &self.base_url,
            "/session/authenticate",
            &request,
        )
        .await?;

        if response.token.as_str().is_empty() {
            return Err(SdkError::Decode(
                "トークンサービスが空のIDトークンを返しました".to_string(),
            ));
        }
        tracing::debug!(session_id = %session_id, "IDトークンを取得");
        Ok(response.token)
    }

    async fn authorize(
        &self,
        session_id: &SessionId,
        token_id: &str,
    ) -> Result<TokenGrant, SdkError> {
        let request = AuthorizeRequest {
            session_id: session_id.clone(),
            token_id: token_id.to_string(),
        };
        let response: AuthorizeResponse =
            post_json(&self.http_client, &self.base_url, "/grant/set", &request).await?;

        if response.grant.as_str().is_empty() {
            return Err(SdkError::Decode(
                "トークンサービスが空のグラントを返しました".to_string(),
            ));
        }
        Ok(response.grant)
    }
}
