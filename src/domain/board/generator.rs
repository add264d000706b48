// 盤面生成と理論上限コンボ数

use rand::Rng;

use super::board::Board;
use crate::constants::{COLS, MATCH_LEN, PIECE_KINDS, ROWS};

/// 既定の固定盤面（マークなし）
pub fn fixed_board() -> Board {
    Board::from_kinds(&[
        [0, 2, 3, 4, 5, 1],
        [2, 0, 0, 2, 4, 1],
        [0, 5, 2, 5, 0, 1],
        [2, 1, 2, 5, 1, 2],
        [5, 4, 1, 0, 3, 1],
        [1, 1, 4, 3, 5, 0],
    ])
}

/// 全36マスを一様乱数で埋めた盤面（マークなし）
pub fn random_board<R: Rng + ?Sized>(rng: &mut R) -> Board {
    let mut kinds = [[0u8; COLS]; ROWS];
    for row in kinds.iter_mut() {
        for k in row.iter_mut() {
            *k = rng.gen_range(0..PIECE_KINDS as u8);
        }
    }
    Board::from_kinds(&kinds)
}

/// 理論上の最大コンボ数（目標値の既定）
///
/// 種別ごとの個数 / 3 の合計。待機列のドロップを1個持ち込んだ場合も試す。
pub fn theoretical_max_clusters(board: &Board) -> u32 {
    let counts = board.count_pieces();
    let sum_with = |extra: Option<usize>| -> usize {
        counts
            .iter()
            .enumerate()
            .map(|(k, &n)| (n + usize::from(extra == Some(k))) / MATCH_LEN)
            .sum()
    };

    let mut best = sum_with(None);
    for cell in board.staging_row() {
        let extra = cell.piece.map(|p| p.index());
        best = best.max(sum_with(extra));
    }
    best as u32
}

/// 盤面から理論上限を目標にする（0 にはしない）
pub fn default_target(board: &Board) -> u32 {
    theoretical_max_clusters(board).max(1)
}
