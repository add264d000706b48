// 解のキャッシュ（近似LRU）

use std::collections::VecDeque;
use std::sync::Mutex;

use dashmap::DashMap;

use crate::domain::board::Board;
use crate::domain::search::{SolveResult, SolverConfig};

/// 既定の上限件数
pub const DEFAULT_CACHE_LIMIT: usize = 4096;

/// 盤面 + 設定 → 解。上限の1.1倍を超えたら古い順にまとめて捨てる
pub struct ResultCache {
    limit: usize,
    map: DashMap<String, SolveResult>,
    q: Mutex<VecDeque<String>>,
}

impl ResultCache {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        let cap = (limit.saturating_mul(11) / 10).max(16);
        Self {
            limit,
            map: DashMap::with_capacity(cap),
            q: Mutex::new(VecDeque::with_capacity(cap)),
        }
    }

    /// キャッシュキー
    pub fn key(board: &Board, config: &SolverConfig) -> String {
        format!("{}|cfg:{}", board.serialize_key(), config.serialize_key())
    }

    pub fn get(&self, board: &Board, config: &SolverConfig) -> Option<SolveResult> {
        self.map.get(&Self::key(board, config)).map(|e| e.value().clone())
    }

    pub fn insert(&self, board: &Board, config: &SolverConfig, result: SolveResult) {
        let key = Self::key(board, config);
        if self.map.insert(key.clone(), result).is_some() {
            return;
        }
        // 他スレッドのパニックで汚れていても追い出しは続ける
        let mut q = match self.q.lock() {
            Ok(q) => q,
            Err(poisoned) => poisoned.into_inner(),
        };
        q.push_back(key);
        let cap = (self.limit as f64 * 1.1) as usize;
        if q.len() > cap {
            let to_delete = q.len() - self.limit;
            for _ in 0..to_delete {
                if let Some(old) = q.pop_front() {
                    self.map.remove(&old);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&self) {
        self.map.clear();
        match self.q.lock() {
            Ok(mut q) => q.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_LIMIT)
    }
}
