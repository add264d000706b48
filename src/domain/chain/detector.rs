// 消去判定（3つ以上の縦横並び + 同色連結でコンボ化）

use std::collections::VecDeque;
use std::ops::BitOr;

use crate::constants::{COLS, MATCH_LEN, PLAY_ROW_START, ROWS};
use crate::domain::board::Board;

/// 消去対象マスのビットマスク（bit = r * COLS + c）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClearMask(u64);

impl ClearMask {
    #[inline]
    fn bit(r: usize, c: usize) -> u64 {
        1u64 << (r * COLS + c)
    }

    #[inline]
    pub fn is_set(&self, r: usize, c: usize) -> bool {
        self.0 & Self::bit(r, c) != 0
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize) {
        self.0 |= Self::bit(r, c);
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for ClearMask {
    type Output = ClearMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        ClearMask(self.0 | rhs.0)
    }
}

/// 1回分の消去判定結果
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchReport {
    /// コンボ数（連結成分の数）
    pub clusters: u32,
    /// 消えるマス数
    pub cleared: u32,
    /// 横並びを含むコンボ数
    pub horizontal: u32,
    /// 縦並びを含むコンボ数
    pub vertical: u32,
    pub clear_mask: ClearMask,
}

/// 横方向の3連以上（最大長の並び全体）をマーク
fn scan_rows(board: &Board) -> ClearMask {
    let mut mask = ClearMask::default();
    for r in PLAY_ROW_START..ROWS {
        let mut c = 0;
        while c < COLS {
            let Some(kind) = board.kind_at(r, c) else {
                c += 1;
                continue;
            };
            let mut end = c + 1;
            while end < COLS && board.kind_at(r, end) == Some(kind) {
                end += 1;
            }
            if end - c >= MATCH_LEN {
                (c..end).for_each(|k| mask.set(r, k));
            }
            c = end;
        }
    }
    mask
}

/// 縦方向の3連以上をマーク（0行目は対象外）
fn scan_cols(board: &Board) -> ClearMask {
    let mut mask = ClearMask::default();
    for c in 0..COLS {
        let mut r = PLAY_ROW_START;
        while r < ROWS {
            let Some(kind) = board.kind_at(r, c) else {
                r += 1;
                continue;
            };
            let mut end = r + 1;
            while end < ROWS && board.kind_at(end, c) == Some(kind) {
                end += 1;
            }
            if end - r >= MATCH_LEN {
                (r..end).for_each(|k| mask.set(k, c));
            }
            r = end;
        }
    }
    mask
}

/// 穴のない盤面でコンボを数える
pub fn find_matches(board: &Board) -> MatchReport {
    let h_mask = scan_rows(board);
    let v_mask = scan_cols(board);
    let clear_mask = h_mask | v_mask;

    let mut report = MatchReport {
        cleared: clear_mask.count(),
        clear_mask,
        ..MatchReport::default()
    };
    if clear_mask.is_empty() {
        return report;
    }

    // 同色連結（4方向）で1コンボにまとめる
    const DIRS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
    let mut visited = ClearMask::default();
    let mut q: VecDeque<(usize, usize)> = VecDeque::with_capacity(16);
    for r in PLAY_ROW_START..ROWS {
        for c in 0..COLS {
            if !clear_mask.is_set(r, c) || visited.is_set(r, c) {
                continue;
            }
            let kind = board.kind_at(r, c);
            let mut has_h = false;
            let mut has_v = false;
            visited.set(r, c);
            q.push_back((r, c));
            while let Some((cr, cc)) = q.pop_front() {
                has_h |= h_mask.is_set(cr, cc);
                has_v |= v_mask.is_set(cr, cc);
                for (dr, dc) in DIRS {
                    let nr = cr as isize + dr;
                    let nc = cc as isize + dc;
                    if nr < PLAY_ROW_START as isize || nr >= ROWS as isize || nc < 0 || nc >= COLS as isize {
                        continue;
                    }
                    let (nr, nc) = (nr as usize, nc as usize);
                    if clear_mask.is_set(nr, nc) && !visited.is_set(nr, nc) && board.kind_at(nr, nc) == kind {
                        visited.set(nr, nc);
                        q.push_back((nr, nc));
                    }
                }
            }
            report.clusters += 1;
            report.horizontal += u32::from(has_h);
            report.vertical += u32::from(has_v);
        }
    }
    report
}
