//! # HTTP デトークナイザ
//!
//! 外部サービスの `POST /detokenize` でトークンを平文に解決する。
//! 404は「値が存在しない」として `None` を返す。

use lunasec_demo_types::{DetokenizeRequest, DetokenizeResponse};
use reqwest::StatusCode;

use super::Detokenizer;
use crate::client::post_json;
use crate::error::SdkError;

/// 外部デトークナイズAPIへのHTTPクライアント。
pub struct HttpDetokenizer {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpDetokenizer {
    pub fn new(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
        }
    }
}

#[async_trait::async_trait]
impl Detokenizer for HttpDetokenizer {
    async fn detokenize(&self, token_id: &str) -> Result<Option<String>, SdkError> {
        let request = DetokenizeRequest {
            token_id: token_id.to_string(),
        };
        let result: Result<DetokenizeResponse, SdkError> =
            post_json(&self.http_client, &self.base_url, "/detokenize", &request).await;

        match result {
            Ok(response) => Ok(response.value),
            Err(SdkError::Status { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }
}
