// 落下処理（消去マスを抜いて列ごとに下詰め、補充なし）

use super::detector::ClearMask;
use crate::constants::{COLS, PLAY_ROW_START, ROWS};
use crate::domain::board::{Board, Cell, Pos};

/// 消去マスを取り除き、1..=5 行目を列ごとに下（行番号の大きい側）へ詰める
///
/// 0行目は対象外でマスクに関係なく動かない。
pub fn apply_gravity(board: &Board, mask: &ClearMask) -> Board {
    let mut next = *board;
    if mask.is_empty() {
        return next;
    }
    for c in 0..COLS {
        let mut write = ROWS;
        for r in (PLAY_ROW_START..ROWS).rev() {
            if !mask.is_set(r, c) {
                write -= 1;
                next.set(Pos::new(write, c), board.at(r, c));
            }
        }
        for r in PLAY_ROW_START..write {
            next.set(Pos::new(r, c), Cell::EMPTY);
        }
    }
    next
}
