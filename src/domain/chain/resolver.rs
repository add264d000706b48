// 連鎖解決（消去 → 落下 → 再判定 を成立がなくなるまで繰り返す）

use super::detector::find_matches;
use super::gravity::apply_gravity;
use super::result::Evaluation;
use crate::constants::{MATCH_LEN, PLAY_CELLS};
use crate::domain::board::Board;

/// 1回の消去で最低 MATCH_LEN マス減るので、反復回数はこれを超えない
const MAX_PASSES: u32 = (PLAY_CELLS / MATCH_LEN) as u32;

/// 穴のない盤面を評価する。`chain` が false なら初回のみ数える
pub fn evaluate(board: &Board, chain: bool) -> Evaluation {
    let first = find_matches(board);
    let mut ev = Evaluation {
        clusters: first.clusters,
        first_pass_clusters: first.clusters,
        chain_clusters: 0,
        cleared: first.cleared,
        horizontal: first.horizontal,
        vertical: first.vertical,
        passes: u32::from(first.clusters > 0),
    };
    if !chain {
        return ev;
    }

    let mut current = *board;
    let mut report = first;
    while report.clusters > 0 && ev.passes <= MAX_PASSES {
        current = apply_gravity(&current, &report.clear_mask);
        report = find_matches(&current);
        if report.clusters == 0 {
            break;
        }
        ev.clusters += report.clusters;
        ev.chain_clusters += report.clusters;
        ev.cleared += report.cleared;
        ev.horizontal += report.horizontal;
        ev.vertical += report.vertical;
        ev.passes += 1;
    }
    debug_assert!(ev.passes <= MAX_PASSES);
    ev
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2行目の横3連を消すと 0 列目に縦3連ができる盤面
    fn chain_board() -> Board {
        Board::from_kinds(&[
            [0, 0, 0, 0, 0, 0],
            [2, 4, 5, 0, 1, 3],
            [1, 1, 1, 3, 4, 5],
            [2, 5, 0, 1, 3, 4],
            [2, 3, 4, 5, 0, 1],
            [4, 0, 1, 3, 5, 0],
        ])
    }

    #[test]
    fn chain_disabled_counts_first_pass_only() {
        let ev = evaluate(&chain_board(), false);
        assert_eq!(ev.clusters, 1);
        assert_eq!(ev.chain_clusters, 0);
        assert_eq!(ev.cleared, 3);
        assert_eq!(ev.horizontal, 1);
        assert_eq!(ev.passes, 1);
    }

    #[test]
    fn chain_enabled_accumulates_followups() {
        let ev = evaluate(&chain_board(), true);
        assert_eq!(ev.first_pass_clusters, 1);
        assert_eq!(ev.chain_clusters, 1);
        assert_eq!(ev.clusters, 2);
        assert_eq!(ev.cleared, 6);
        assert_eq!(ev.horizontal, 1);
        assert_eq!(ev.vertical, 1);
        assert_eq!(ev.passes, 2);
    }

    #[test]
    fn terminates_on_full_single_kind_board() {
        let board = Board::from_kinds(&[[3; 6]; 6]);
        let ev = evaluate(&board, true);
        assert_eq!(ev.clusters, 1);
        assert_eq!(ev.cleared, 30);
        assert!(ev.passes as usize <= PLAY_CELLS);
    }

    #[test]
    fn no_match_board_evaluates_to_zero() {
        let board = Board::from_kinds(&[
            [0, 0, 0, 0, 0, 0],
            [0, 1, 2, 3, 4, 5],
            [1, 2, 3, 4, 5, 0],
            [0, 1, 2, 3, 4, 5],
            [1, 2, 3, 4, 5, 0],
            [0, 1, 2, 3, 4, 5],
        ]);
        assert_eq!(evaluate(&board, true), Evaluation::default());
    }
}
