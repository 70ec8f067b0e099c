//! # メモリ内デトークナイザ
//!
//! 開発・テスト用。トークン→平文の対応表から解決する。
//! パススルーモードではトークン文字列そのものを平文として返す。

use std::collections::HashMap;

use super::Detokenizer;
use crate::error::SdkError;

/// 対応表ベースのデトークナイザ。
#[derive(Debug, Default, Clone)]
pub struct MockDetokenizer {
    values: HashMap<String, String>,
    passthrough: bool,
}

impl MockDetokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 対応表にないトークンを、トークン文字列そのものとして解決する。
    pub fn passthrough() -> Self {
        Self {
            values: HashMap::new(),
            passthrough: true,
        }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(token, value)| (token.to_string(), value.to_string()))
                .collect(),
            passthrough: false,
        }
    }

    pub fn insert(&mut self, token_id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(token_id.into(), value.into());
    }
}

#[async_trait::async_trait]
impl Detokenizer for MockDetokenizer {
    async fn detokenize(&self, token_id: &str) -> Result<Option<String>, SdkError> {
        match self.values.get(token_id) {
            Some(value) => Ok(Some(value.clone())),
            None if self.passthrough => Ok(Some(token_id.to_string())),
            None => Ok(None),
        }
    }
}
