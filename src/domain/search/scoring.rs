// 盤面の評価値（ポテンシャルとスコア）

use super::config::{Axis, Priority, SolverConfig};
use crate::constants::{COLS, PLAY_ROW_START, ROWS};
use crate::domain::board::Board;
use crate::domain::chain::Evaluation;

const PREFERRED_AXIS_WEIGHT: f64 = 3.0;
const OTHER_AXIS_WEIGHT: f64 = 0.5;

const MET_BASE: f64 = 5_000_000.0;
const AXIS_CLUSTER_BONUS: f64 = 5_000_000.0;
const CLUSTER_WEIGHT: f64 = 1_000_000.0;
const OVERSHOOT_PENALTY: f64 = 600_000.0;
const MISS_PENALTY: f64 = 8_000.0;
const UNMET_STEP_COST: f64 = 20.0;

/// 手数優先時の係数
const MIN_STEPS_PENALTY_SCALE: f64 = 4.0;
const MIN_STEPS_CLEARED_DIVISOR: f64 = 5.0;

/// 3マス窓の「2つ揃い」パターン数
#[inline]
fn two_of_three(a: Option<u8>, b: Option<u8>, c: Option<u8>) -> u32 {
    if a.is_none() {
        return 0;
    }
    u32::from(a == b && a != c) + u32::from(b == c && a != b) + u32::from(a == c && a != b)
}

/// あと1個で揃いそうな形の多さ（未達盤面の誘導用）
pub fn potential(board: &Board, axis: Axis) -> f64 {
    let (h_weight, v_weight) = match axis {
        Axis::Horizontal => (PREFERRED_AXIS_WEIGHT, OTHER_AXIS_WEIGHT),
        Axis::Vertical => (OTHER_AXIS_WEIGHT, PREFERRED_AXIS_WEIGHT),
    };

    let mut h = 0u32;
    for r in PLAY_ROW_START..ROWS {
        for c in 0..COLS - 2 {
            h += two_of_three(board.kind_at(r, c), board.kind_at(r, c + 1), board.kind_at(r, c + 2));
        }
    }
    let mut v = 0u32;
    for c in 0..COLS {
        for r in PLAY_ROW_START..ROWS - 2 {
            v += two_of_three(board.kind_at(r, c), board.kind_at(r + 1, c), board.kind_at(r + 2, c));
        }
    }
    h as f64 * h_weight + v as f64 * v_weight
}

/// 評価結果と手数から比較用スコアを計算
///
/// 目標未達では距離の二乗で減点し、達成後は手数と超過分の二乗で減点する。
pub fn score(ev: &Evaluation, potential: f64, steps: u32, config: &SolverConfig) -> f64 {
    let target = config.target;
    let (step_penalty, cleared_weight) = match config.priority {
        Priority::MaxClusters => (config.step_penalty, config.cleared_weight),
        Priority::MinSteps => (
            config.step_penalty * MIN_STEPS_PENALTY_SCALE,
            config.cleared_weight / MIN_STEPS_CLEARED_DIVISOR,
        ),
    };
    let steps = steps as f64;
    let cleared = ev.cleared as f64 * cleared_weight;

    if ev.clusters >= target {
        let over = (ev.clusters - target) as f64;
        MET_BASE - steps * step_penalty - over * over * OVERSHOOT_PENALTY + cleared
    } else {
        let miss = (target - ev.clusters) as f64;
        let capped = ev.clusters.min(target) as f64;
        ev.axis_clusters(config.axis) as f64 * AXIS_CLUSTER_BONUS + capped * CLUSTER_WEIGHT
            - miss * miss * MISS_PENALTY
            + potential * config.potential_weight
            + cleared
            - steps * UNMET_STEP_COST
    }
}
