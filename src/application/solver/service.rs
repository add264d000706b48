// 経路探索サービス

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{unbounded, Receiver};
use rayon::prelude::*;

use crate::application::progress::{CancelToken, ProgressMessage, ProgressReporter};
use crate::domain::board::Board;
use crate::domain::search::{BeamSearch, SolveResult, SolverConfig};
use crate::error::SolveError;
use crate::infrastructure::cache::{ResultCache, DEFAULT_CACHE_LIMIT};

/// バックグラウンド探索のハンドル
pub struct SolveHandle {
    token: CancelToken,
    rx: Receiver<ProgressMessage>,
    join: JoinHandle<Result<SolveResult>>,
}

impl SolveHandle {
    /// 探索を中断
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 進捗メッセージの受信側
    pub fn progress(&self) -> &Receiver<ProgressMessage> {
        &self.rx
    }

    /// 完了を待って結果を受け取る
    pub fn join(self) -> Result<SolveResult> {
        self.join
            .join()
            .map_err(|_| anyhow!("探索スレッドがパニックしました"))?
    }
}

/// 経路探索を管理するサービス
pub struct SolverService {
    cache: Arc<ResultCache>,
    workers: usize,
}

impl SolverService {
    pub fn new() -> Self {
        Self::with_cache_limit(DEFAULT_CACHE_LIMIT)
    }

    pub fn with_cache_limit(limit: usize) -> Self {
        Self {
            cache: Arc::new(ResultCache::new(limit)),
            workers: num_cpus::get(),
        }
    }

    /// 一括探索のワーカー数
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// 入力の検証
    fn validate_inputs(board: &Board, config: &SolverConfig) -> Result<()> {
        config.validate().context("探索設定が不正です")?;
        board.validate_marks().context("盤面のマーク指定が不正です")?;
        Ok(())
    }

    /// 盤面を解く（キャッシュ優先）
    pub fn solve(&self, board: &Board, config: &SolverConfig) -> Result<SolveResult> {
        self.solve_with_token(board, config, &CancelToken::new())
    }

    /// 中断フラグ付きで解く。中断時のエラーは `SolveError::Cancelled` に downcast できる
    pub fn solve_with_token(
        &self,
        board: &Board,
        config: &SolverConfig,
        token: &CancelToken,
    ) -> Result<SolveResult> {
        let mut reporter = ProgressReporter::new(token.clone(), None);
        solve_cached(&self.cache, board, config, &mut reporter)
    }

    /// 複数の盤面を並列に解く（結果は入力順）
    pub fn solve_many(&self, boards: &[Board], config: &SolverConfig) -> Vec<Result<SolveResult>> {
        let run = || {
            boards
                .par_iter()
                .map(|board| self.solve(board, config))
                .collect::<Vec<_>>()
        };
        match rayon::ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                log::warn!("スレッドプールの作成に失敗、グローバルプールを使用: {}", e);
                run()
            }
        }
    }

    /// 別スレッドで探索を開始し、進捗をチャネルで通知する
    pub fn spawn(&self, board: Board, config: SolverConfig) -> SolveHandle {
        let token = CancelToken::new();
        let (tx, rx) = unbounded();
        let cache = Arc::clone(&self.cache);
        let worker_token = token.clone();

        let join = std::thread::spawn(move || {
            let mut reporter = ProgressReporter::new(worker_token, Some(tx));
            let started = Instant::now();
            let outcome = solve_cached(&cache, &board, &config, &mut reporter);

            let msg = match &outcome {
                Ok(result) => ProgressMessage::Completed {
                    result: Box::new(result.clone()),
                    elapsed: started.elapsed(),
                },
                Err(e) => match e.downcast_ref::<SolveError>() {
                    Some(SolveError::Cancelled { best }) => ProgressMessage::Aborted { best: best.clone() },
                    _ => ProgressMessage::Error {
                        message: format!("{:#}", e),
                    },
                },
            };
            reporter.send(msg);
            outcome
        });

        SolveHandle { token, rx, join }
    }
}

impl Default for SolverService {
    fn default() -> Self {
        Self::new()
    }
}

/// キャッシュを引き、なければ探索して登録する
fn solve_cached(
    cache: &ResultCache,
    board: &Board,
    config: &SolverConfig,
    reporter: &mut ProgressReporter,
) -> Result<SolveResult> {
    SolverService::validate_inputs(board, config).context("入力の検証に失敗しました")?;

    if let Some(hit) = cache.get(board, config) {
        log::debug!("キャッシュヒット: コンボ={} 手数={}", hit.total_clusters, hit.steps);
        reporter.send(ProgressMessage::CacheHit {
            result: Box::new(hit.clone()),
        });
        return Ok(hit);
    }

    let search = BeamSearch::new(board, config)?;
    reporter.send(ProgressMessage::Started {
        max_steps: config.max_steps,
        max_nodes: search.max_nodes(),
    });
    let result = search.run(&mut *reporter)?;
    cache.insert(board, config, result.clone());
    log::debug!(
        "探索完了: コンボ={} 手数={} nodes={} ({:.0} nodes/s)",
        result.total_clusters,
        result.steps,
        result.nodes_expanded,
        reporter.nodes_per_second()
    );
    Ok(result)
}
