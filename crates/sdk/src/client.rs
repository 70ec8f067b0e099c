//! # 外部サービス用HTTPヘルパー
//!
//! トークンサービス・デトークナイザが共有するJSON POSTの送受信処理。

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SdkError;

/// `{base_url}{path}` にJSONをPOSTし、2xxレスポンスをデコードして返す。
///
/// 非2xxは本文付きで `SdkError::Status` になる。
pub async fn post_json<Req, Resp>(
    http_client: &reqwest::Client,
    base_url: &str,
    path: &str,
    body: &Req,
) -> Result<Resp, SdkError>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let url = format!("{}{}", base_url.trim_end_matches('/'), path);
    let response = http_client
        .post(&url)
        .json(body)
        .send()
        .await
        .map_err(|e| SdkError::Http(format!("送信失敗 ({url}): {e}")))?;

    let status = response.status();
    let response_body = response
        .text()
        .await
        .map_err(|e| SdkError::Http(format!("レスポンス読み取り失敗 ({url}): {e}")))?;

    if !status.is_success() {
        return Err(SdkError::Status {
            status,
            body: response_body,
        });
    }

    serde_json::from_str(&response_body)
        .map_err(|e| SdkError::Decode(format!("{url} のレスポンスのパースに失敗: {e}")))
}
