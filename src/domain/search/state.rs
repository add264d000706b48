// 探索状態と重複判定キー

use crate::constants::{COLS, ROWS};
use crate::domain::board::{Board, Cell, Pos};
use crate::domain::chain::Evaluation;

/// ビーム内の1状態。遷移ごとにコピーされ、共有されない
#[derive(Clone, Debug)]
pub struct SearchState {
    /// 穴を含む盤面（持ちドロップは盤外）
    pub board: Board,
    pub held: Cell,
    /// 待機列にいる間は None
    pub hole: Option<Pos>,
    pub pos: Pos,
    pub path: Vec<Pos>,
    /// 最後の一歩専用マスを踏んだ（以後展開しない）
    pub locked: bool,
    pub eval: Evaluation,
    pub potential: f64,
    pub score: f64,
}

impl SearchState {
    /// 評価前の状態。`eval` と `score` は呼び出し側で埋める
    pub fn unscored(board: Board, held: Cell, hole: Option<Pos>, path: Vec<Pos>, locked: bool) -> Self {
        let pos = path.last().copied().unwrap_or(Pos::new(0, 0));
        Self {
            board,
            held,
            hole,
            pos,
            path,
            locked,
            eval: Evaluation::default(),
            potential: 0.0,
            score: 0.0,
        }
    }

    #[inline]
    pub fn steps(&self) -> u32 {
        steps_of(&self.path)
    }

    /// 評価用の盤面（穴に持ちドロップを戻す）
    pub fn eval_board(&self) -> Board {
        filled_board(&self.board, self.hole, self.held)
    }

    /// 重複判定キー（盤面, 持ちドロップ, 位置, 穴, ロック）
    pub fn dedup_key(&self) -> u64 {
        dedup_key(&self.board, self.held, self.pos, self.hole, self.locked)
    }
}

#[inline]
pub fn steps_of(path: &[Pos]) -> u32 {
    path.len().saturating_sub(1) as u32
}

/// 穴に持ちドロップを埋めた盤面
pub fn filled_board(board: &Board, hole: Option<Pos>, held: Cell) -> Board {
    let mut b = *board;
    if let Some(h) = hole {
        b.set(h, held);
    }
    b
}

// FNV-1a 64bit
const FNV_OFFSET: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

#[inline(always)]
fn fnv_mix(h: u64, v: u64) -> u64 {
    (h ^ v).wrapping_mul(FNV_PRIME)
}

/// セルを 0..=511 程度の整数に詰める（-1 は 0 に寄せる）
#[inline(always)]
fn cell_word(cell: Cell) -> u64 {
    (cell.encode() + 1) as u64
}

pub fn dedup_key(board: &Board, held: Cell, pos: Pos, hole: Option<Pos>, locked: bool) -> u64 {
    let mut h = FNV_OFFSET;
    for r in 0..ROWS {
        for c in 0..COLS {
            h = fnv_mix(h, cell_word(board.at(r, c)));
        }
    }
    h = fnv_mix(h, cell_word(held));
    h = fnv_mix(h, (pos.row as u64) << 8 | pos.col as u64);
    let hole_word = match hole {
        Some(p) => 1 << 16 | (p.row as u64) << 8 | p.col as u64,
        None => 0,
    };
    h = fnv_mix(h, hole_word);
    fnv_mix(h, u64::from(locked))
}

/// 重複判定用に覚えておく最良値
#[derive(Clone, Copy, Debug)]
pub struct DedupRecord {
    pub axis_clusters: u32,
    pub clusters: u32,
    pub cleared: u32,
    pub potential: f64,
    pub steps: u32,
}

impl DedupRecord {
    /// 新しい到達が既存記録に対して改善していなければ true（捨てる）
    pub fn dominates(&self, other: &DedupRecord) -> bool {
        other.axis_clusters == self.axis_clusters
            && other.clusters == self.clusters
            && other.cleared <= self.cleared
            && other.potential <= self.potential
            && other.steps >= self.steps
    }
}
