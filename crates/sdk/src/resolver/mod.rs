//! # セキュアリゾルバ
//!
//! トークン化されたフォームを平文に解決し、解決済みフォームを受け取る関数に渡す。
//!
//! ## デトークナイザ実装
//! - `HttpDetokenizer`: 外部サービスの `/detokenize` を呼び出す（本番用）
//! - `MockDetokenizer`: メモリ内のトークン表から解決する（開発・テスト用）

pub mod http;
pub mod mock;

pub use http::HttpDetokenizer;
pub use mock::MockDetokenizer;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use lunasec_demo_types::{ResolvedFormData, SecureFormData};

use crate::error::SdkError;

/// devステージで設定が省略された場合のセキュアフレームURL。
pub const DEV_SECURE_FRAME_URL: &str = "http://localhost:37766";

/// デプロイステージ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentStage {
    /// ローカル開発
    #[default]
    Dev,
    /// 本番
    Prod,
}

impl DeploymentStage {
    /// セキュアフレームURLを決定する。
    ///
    /// 明示的な設定があればそれを使う。devステージのみ既定値にフォールバックし、
    /// prodステージで未設定の場合はエラー。
    pub fn secure_frame_url(&self, configured: Option<String>) -> Result<String, SdkError> {
        match (configured, self) {
            (Some(url), _) if !url.trim().is_empty() => Ok(url),
            (_, DeploymentStage::Dev) => Ok(DEV_SECURE_FRAME_URL.to_string()),
            (_, DeploymentStage::Prod) => Err(SdkError::Config(
                "prodステージではセキュアフレームURLの設定が必須です".to_string(),
            )),
        }
    }
}

impl FromStr for DeploymentStage {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(DeploymentStage::Dev),
            "prod" => Ok(DeploymentStage::Prod),
            other => Err(SdkError::Config(format!("不明なデプロイステージ: {other}"))),
        }
    }
}

impl fmt::Display for DeploymentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentStage::Dev => f.write_str("dev"),
            DeploymentStage::Prod => f.write_str("prod"),
        }
    }
}

/// トークンを平文に解決するトレイト。
#[async_trait::async_trait]
pub trait Detokenizer: Send + Sync {
    /// トークンに対応する平文を返す。値が存在しない場合は `None`。
    async fn detokenize(&self, token_id: &str) -> Result<Option<String>, SdkError>;
}

/// セキュアリゾルバ。
/// `wrap` した関数は、トークンが解決された後のフォームだけを受け取る。
#[derive(Clone)]
pub struct SecureResolver {
    stage: DeploymentStage,
    detokenizer: Arc<dyn Detokenizer>,
}

impl SecureResolver {
    pub fn new(stage: DeploymentStage, detokenizer: Arc<dyn Detokenizer>) -> Self {
        Self { stage, detokenizer }
    }

    /// 解決済みフォームを受け取る関数を、トークン化フォームを受け取る関数に包む。
    pub fn wrap<F>(&self, f: F) -> SecureFunction<F>
    where
        F: Fn(ResolvedFormData) -> Option<String> + Send + Sync,
    {
        tracing::info!(stage = %self.stage, "フォーム処理関数をセキュアリゾルバで包みます");
        SecureFunction {
            detokenizer: Arc::clone(&self.detokenizer),
            f,
        }
    }
}

/// `SecureResolver::wrap` で包まれた関数。
pub struct SecureFunction<F> {
    detokenizer: Arc<dyn Detokenizer>,
    f: F,
}

impl<F> SecureFunction<F>
where
    F: Fn(ResolvedFormData) -> Option<String> + Send + Sync,
{
    /// フォーム内のトークンを解決し、包まれた関数を呼び出す。
    ///
    /// トークンが何も指していない場合は関数を呼ばずに `Ok(None)` を返す。
    pub async fn call(&self, form: SecureFormData) -> Result<Option<String>, SdkError> {
        if form.ssn_token.trim().is_empty() {
            return Err(SdkError::InvalidToken("ssnTokenが空です".to_string()));
        }

        let Some(ssn) = self.detokenizer.detokenize(&form.ssn_token).await? else {
            tracing::warn!("ssnTokenに対応する値が見つかりません");
            return Ok(None);
        };

        Ok((self.f)(ResolvedFormData { ssn }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_with(values: &[(&str, &str)]) -> SecureResolver {
        let detokenizer = MockDetokenizer::from_pairs(values.iter().copied());
        SecureResolver::new(DeploymentStage::Dev, Arc::new(detokenizer))
    }

    #[tokio::test]
    async fn test_wrapped_function_receives_plaintext() {
        let resolver = resolver_with(&[("tok-1", "123-45-6789")]);
        let wrapped = resolver.wrap(|form| Some(format!("processed:{}", form.ssn)));

        let result = wrapped
            .call(SecureFormData {
                ssn_token: "tok-1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("processed:123-45-6789"));
    }

    #[tokio::test]
    async fn test_unknown_token_skips_function() {
        let resolver = resolver_with(&[]);
        let wrapped = resolver.wrap(|_| -> Option<String> {
            panic!("must not be called for an unknown token")
        });

        let result = wrapped
            .call(SecureFormData {
                ssn_token: "missing".to_string(),
            })
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_empty_token_is_rejected() {
        let resolver = resolver_with(&[]);
        let wrapped = resolver.wrap(|form| Some(form.ssn));

        let err = wrapped
            .call(SecureFormData {
                ssn_token: "  ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_function_returning_none_is_passed_through() {
        let resolver = resolver_with(&[("tok-1", "value")]);
        let wrapped = resolver.wrap(|_| None);

        let result = wrapped
            .call(SecureFormData {
                ssn_token: "tok-1".to_string(),
            })
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_stage_parsing() {
        assert_eq!("dev".parse::<DeploymentStage>().unwrap(), DeploymentStage::Dev);
        assert_eq!("PROD".parse::<DeploymentStage>().unwrap(), DeploymentStage::Prod);
        assert!("staging".parse::<DeploymentStage>().is_err());
    }

    #[test]
    fn test_secure_frame_url_defaults_only_in_dev() {
        assert_eq!(
            DeploymentStage::Dev.secure_frame_url(None).unwrap(),
            DEV_SECURE_FRAME_URL
        );
        assert!(DeploymentStage::Prod.secure_frame_url(None).is_err());
        assert!(DeploymentStage::Prod
            .secure_frame_url(Some(" ".to_string()))
            .is_err());
        assert_eq!(
            DeploymentStage::Prod
                .secure_frame_url(Some("https://frame.example.com".to_string()))
                .unwrap(),
            "https://frame.example.com"
        );
    }
}
