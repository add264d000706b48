// 進捗管理と中断

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::domain::search::{SearchObserver, SolveResult, StepProgress};

/// 進捗メッセージの種類
#[derive(Clone, Debug)]
pub enum ProgressMessage {
    /// 探索開始
    Started { max_steps: u32, max_nodes: u64 },
    /// ステップ完了
    Step(StepProgress),
    /// 探索完了
    Completed {
        result: Box<SolveResult>,
        elapsed: Duration,
    },
    /// キャッシュから返した
    CacheHit { result: Box<SolveResult> },
    /// エラー発生
    Error { message: String },
    /// 中断（それまでの最良解）
    Aborted { best: Option<Box<SolveResult>> },
}

/// 共有の中断フラグ
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 探索を中断
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// 中断されたかチェック
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

/// 中断フラグを見て、ステップごとにチャネルへ進捗を送るオブザーバ
pub struct ProgressReporter {
    token: CancelToken,
    tx: Option<Sender<ProgressMessage>>,
    last: Option<StepProgress>,
    start_time: Instant,
}

impl ProgressReporter {
    pub fn new(token: CancelToken, tx: Option<Sender<ProgressMessage>>) -> Self {
        Self {
            token,
            tx,
            last: None,
            start_time: Instant::now(),
        }
    }

    /// 受信側が閉じていても探索は続ける
    pub fn send(&self, msg: ProgressMessage) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(msg);
        }
    }

    /// 直近のステップ進捗
    pub fn last(&self) -> Option<StepProgress> {
        self.last
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 探索速度（ノード/秒）
    pub fn nodes_per_second(&self) -> f64 {
        let nodes = self.last.map_or(0, |p| p.nodes_expanded) as f64;
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            nodes / elapsed
        } else {
            0.0
        }
    }
}

impl SearchObserver for ProgressReporter {
    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn on_step(&mut self, progress: &StepProgress) {
        self.last = Some(*progress);
        self.send(ProgressMessage::Step(*progress));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(step: u32) -> StepProgress {
        StepProgress {
            step,
            max_steps: 10,
            candidates: 5,
            nodes_expanded: 100,
            best_clusters: Some(1),
            best_score: Some(1.0),
        }
    }

    #[test]
    fn token_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
        other.reset();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn reporter_forwards_steps() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut reporter = ProgressReporter::new(CancelToken::new(), Some(tx));
        reporter.on_step(&progress(0));
        reporter.on_step(&progress(1));
        assert_eq!(reporter.last().map(|p| p.step), Some(1));

        let steps: Vec<u32> = rx
            .try_iter()
            .filter_map(|m| match m {
                ProgressMessage::Step(p) => Some(p.step),
                _ => None,
            })
            .collect();
        assert_eq!(steps, vec![0, 1]);
    }

    #[test]
    fn reporter_without_channel_still_tracks() {
        let token = CancelToken::new();
        let mut reporter = ProgressReporter::new(token.clone(), None);
        reporter.on_step(&progress(4));
        assert_eq!(reporter.last().map(|p| p.nodes_expanded), Some(100));
        assert!(!reporter.is_cancelled());
        token.cancel();
        assert!(reporter.is_cancelled());
    }

    #[test]
    fn reporter_survives_closed_receiver() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let mut reporter = ProgressReporter::new(CancelToken::new(), Some(tx));
        reporter.on_step(&progress(0));
        assert!(reporter.nodes_per_second() >= 0.0);
    }
}
