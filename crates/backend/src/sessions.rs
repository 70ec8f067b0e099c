//! # セッションテーブル
//!
//! `/set-id-token` で発行したIDトークンとセッションIDの対応表。
//! 容量を超えると最も古い登録から削除する。

use std::collections::{HashMap, VecDeque};

use lunasec_demo_types::{IdToken, SessionId};

/// 既定の最大登録数。
pub const DEFAULT_SESSION_CAPACITY: usize = 10_000;

/// 容量付きのIDトークン → セッションID表。
#[derive(Debug)]
pub struct SessionTable {
    capacity: usize,
    entries: HashMap<IdToken, SessionId>,
    /// 登録順（先頭が最古）
    order: VecDeque<IdToken>,
}

impl SessionTable {
    /// 容量0は1として扱う。
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// 対応を登録する。既存のIDトークンは値だけを更新し、登録順は変えない。
    pub fn insert(&mut self, id_token: IdToken, session_id: SessionId) {
        if let Some(existing) = self.entries.get_mut(&id_token) {
            *existing = session_id;
            return;
        }

        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            tracing::debug!(capacity = self.capacity, "セッション表が上限に達したため最古の登録を削除");
        }

        self.order.push_back(id_token.clone());
        self.entries.insert(id_token, session_id);
    }

    pub fn get(&self, id_token: &IdToken) -> Option<&SessionId> {
        self.entries.get(id_token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
