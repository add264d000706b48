// 探索結果の定義

use serde::{Deserialize, Serialize};

use crate::domain::board::Pos;
use crate::domain::chain::Evaluation;

/// ソルバの結果
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// なぞり経路（先頭が始点）
    pub path: Vec<Pos>,
    /// 合計コンボ数（初回 + 落ちコン）
    pub total_clusters: u32,
    /// 初回の消去で成立したコンボ数
    pub first_pass_clusters: u32,
    /// 落ちコンのみのコンボ数
    pub chain_clusters: u32,
    /// 消えたマス数
    pub cleared: u32,
    /// 手数（経路長 - 1）
    pub steps: u32,
    pub vertical_clusters: u32,
    pub horizontal_clusters: u32,

    // ---- メタデータ ----
    pub score: f64,
    pub target_reached: bool,
    /// 展開したノード数
    pub nodes_expanded: u64,
    /// 実行した探索ステップ数
    pub search_steps: u32,
    /// 手数/ノード上限で打ち切った（最適でない可能性あり）
    pub budget_exhausted: bool,
}

impl SolveResult {
    /// 採用候補が1つもなかった場合の結果
    pub fn empty() -> Self {
        Self {
            path: Vec::new(),
            total_clusters: 0,
            first_pass_clusters: 0,
            chain_clusters: 0,
            cleared: 0,
            steps: 0,
            vertical_clusters: 0,
            horizontal_clusters: 0,
            score: 0.0,
            target_reached: false,
            nodes_expanded: 0,
            search_steps: 0,
            budget_exhausted: false,
        }
    }

    pub fn from_evaluation(ev: &Evaluation, path: Vec<Pos>, score: f64, target: u32) -> Self {
        let steps = path.len().saturating_sub(1) as u32;
        Self {
            path,
            total_clusters: ev.clusters,
            first_pass_clusters: ev.first_pass_clusters,
            chain_clusters: ev.chain_clusters,
            cleared: ev.cleared,
            steps,
            vertical_clusters: ev.vertical,
            horizontal_clusters: ev.horizontal,
            score,
            target_reached: ev.clusters >= target,
            ..Self::empty()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_evaluation_counts_steps() {
        let ev = Evaluation {
            clusters: 2,
            first_pass_clusters: 1,
            chain_clusters: 1,
            cleared: 6,
            horizontal: 1,
            vertical: 1,
            passes: 2,
        };
        let path = vec![Pos::new(1, 1), Pos::new(1, 2), Pos::new(0, 2)];
        let result = SolveResult::from_evaluation(&ev, path, 10.0, 2);
        assert_eq!(result.steps, 2);
        assert_eq!(result.total_clusters, 2);
        assert_eq!(result.chain_clusters, 1);
        assert!(result.target_reached);
        assert!(!result.budget_exhausted);
    }

    #[test]
    fn empty_result_has_no_path() {
        let result = SolveResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.steps, 0);
    }
}
