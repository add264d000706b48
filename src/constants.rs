// 盤面定数とユーティリティ型定義

use nohash_hasher::BuildNoHashHasher;

/// ====== 盤面定数 ======
pub const ROWS: usize = 6;
pub const COLS: usize = 6;
pub const CELLS: usize = ROWS * COLS;

/// 0 行目は待機列（なぞり開始/終了専用、探索中は不変）
pub const STAGING_ROW: usize = 0;
pub const PLAY_ROW_START: usize = 1;
pub const PLAY_ROWS: usize = ROWS - PLAY_ROW_START;
pub const PLAY_CELLS: usize = PLAY_ROWS * COLS;

/// ドロップの種類数（0..=5）
pub const PIECE_KINDS: usize = 6;

/// 成立に必要な連続数
pub const MATCH_LEN: usize = 3;

/// 移動方向（行差, 列差）。順序は探索結果に影響するので変更しないこと
pub const DIRS_4: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const DIRS_8: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

// u64 キー専用のノーハッシュ（高速化）
pub type U64Map<V> = std::collections::HashMap<u64, V, BuildNoHashHasher<u64>>;

#[inline]
pub fn in_range(r: isize, c: isize) -> bool {
    r >= 0 && (r as usize) < ROWS && c >= 0 && (c as usize) < COLS
}
