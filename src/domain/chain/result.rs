// 盤面評価（連鎖込み）の結果定義

use serde::{Deserialize, Serialize};

use crate::domain::search::Axis;

/// 盤面評価の結果
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// 合計コンボ数（初回 + 落ちコン）
    pub clusters: u32,
    /// 初回の消去で成立したコンボ数
    pub first_pass_clusters: u32,
    /// 落ちコンのみのコンボ数
    pub chain_clusters: u32,
    /// 消えたマス数
    pub cleared: u32,
    /// 横並びを含むコンボ数
    pub horizontal: u32,
    /// 縦並びを含むコンボ数
    pub vertical: u32,
    /// 消去が起きた回数（連鎖なしなら 0 か 1）
    pub passes: u32,
}

impl Evaluation {
    /// 指定方向のコンボ数
    pub fn axis_clusters(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn meets(&self, target: u32) -> bool {
        self.clusters >= target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_clusters_picks_axis() {
        let ev = Evaluation {
            clusters: 3,
            horizontal: 2,
            vertical: 1,
            ..Evaluation::default()
        };
        assert_eq!(ev.axis_clusters(Axis::Horizontal), 2);
        assert_eq!(ev.axis_clusters(Axis::Vertical), 1);
        assert!(ev.meets(3));
        assert!(!ev.meets(4));
    }
}
