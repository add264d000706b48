// Board型 - 6×6の盤面を表現（0行目は待機列）

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cell::{Cell, Designation, Restriction};
use crate::constants::{in_range, CELLS, COLS, PIECE_KINDS, PLAY_ROW_START, ROWS, STAGING_ROW};
use crate::error::SolveError;

/// 盤面上の座標（行, 列）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < ROWS && col < COLS);
        Self {
            row: row as u8,
            col: col as u8,
        }
    }

    #[inline]
    pub fn r(self) -> usize {
        self.row as usize
    }

    #[inline]
    pub fn c(self) -> usize {
        self.col as usize
    }

    #[inline]
    pub fn is_staging(self) -> bool {
        self.r() == STAGING_ROW
    }

    /// 方向を足した座標（盤外なら None）
    pub fn offset(self, dr: i8, dc: i8) -> Option<Pos> {
        let nr = self.row as isize + dr as isize;
        let nc = self.col as isize + dc as isize;
        in_range(nr, nc).then(|| Pos::new(nr as usize, nc as usize))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// 始点/終点マークの位置
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Marks {
    pub start: Option<Pos>,
    pub end: Option<Pos>,
}

/// 6×6の盤面。転送形式は行優先の36個の整数コード
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// 新しい空の盤面を作成
    pub fn new() -> Self {
        Self {
            cells: [[Cell::EMPTY; COLS]; ROWS],
        }
    }

    /// 種別番号の配列から構築（マークなし）
    pub fn from_kinds(kinds: &[[u8; COLS]; ROWS]) -> Self {
        let mut board = Self::new();
        for (r, row) in kinds.iter().enumerate() {
            for (c, &k) in row.iter().enumerate() {
                board.cells[r][c] = Cell::of(k);
            }
        }
        board
    }

    #[inline]
    pub fn at(&self, r: usize, c: usize) -> Cell {
        self.cells[r][c]
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[pos.r()][pos.c()]
    }

    #[inline]
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        self.cells[pos.r()][pos.c()] = cell;
    }

    /// 種別のみ（空は None）
    #[inline]
    pub fn kind_at(&self, r: usize, c: usize) -> Option<u8> {
        self.cells[r][c].piece.map(|p| p.kind())
    }

    /// 転送コード列から構築
    pub fn from_codes(codes: &[i32]) -> Result<Self, SolveError> {
        if codes.len() != CELLS {
            return Err(SolveError::InvalidBoardSize {
                expected: CELLS,
                actual: codes.len(),
            });
        }
        let mut board = Self::new();
        for (i, &code) in codes.iter().enumerate() {
            let cell = Cell::try_decode(code).ok_or(SolveError::InvalidCellCode { index: i, code })?;
            board.cells[i / COLS][i % COLS] = cell;
        }
        Ok(board)
    }

    /// 転送コード列に変換
    pub fn to_codes(&self) -> Vec<i32> {
        self.cells.iter().flatten().map(|c| c.encode()).collect()
    }

    /// キャッシュキー用の直列化
    pub fn serialize_key(&self) -> String {
        self.to_codes()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// 始点/終点マークを取り出し、矛盾があればエラー
    pub fn validate_marks(&self) -> Result<Marks, SolveError> {
        let mut marks = Marks::default();
        for r in 0..ROWS {
            for c in 0..COLS {
                let cell = self.cells[r][c];
                let pos = Pos::new(r, c);
                let slot = match cell.designation {
                    Designation::None => continue,
                    Designation::Start => &mut marks.start,
                    Designation::End => &mut marks.end,
                };
                if let Some(prev) = slot {
                    return Err(SolveError::ConflictingMarks(format!(
                        "{:?} マークが複数あります: {} と {}",
                        cell.designation, prev, pos
                    )));
                }
                if cell.restriction == Restriction::Forbidden {
                    return Err(SolveError::ConflictingMarks(format!(
                        "{:?} マークが移動禁止セル {} に付いています",
                        cell.designation, pos
                    )));
                }
                *slot = Some(pos);
            }
        }
        Ok(marks)
    }

    /// 操作可能領域（1..=5行目）の種別ごとの個数
    pub fn count_pieces(&self) -> [usize; PIECE_KINDS] {
        let mut counts = [0usize; PIECE_KINDS];
        for row in &self.cells[PLAY_ROW_START..] {
            for cell in row {
                if let Some(p) = cell.piece {
                    counts[p.index()] += 1;
                }
            }
        }
        counts
    }

    /// 操作可能領域の空でないセル数
    pub fn occupied_count(&self) -> usize {
        self.count_pieces().iter().sum()
    }

    /// 0行目（待機列）の内容
    pub fn staging_row(&self) -> &[Cell; COLS] {
        &self.cells[STAGING_ROW]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<i32>> for Board {
    type Error = SolveError;

    fn try_from(codes: Vec<i32>) -> Result<Self, Self::Error> {
        Board::from_codes(&codes)
    }
}

impl From<Board> for Vec<i32> {
    fn from(board: Board) -> Self {
        board.to_codes()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            let line: String = row.iter().map(|c| c.label_char()).collect();
            if r == STAGING_ROW {
                writeln!(f, "{} |", line)?;
            } else {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.serialize_key())
    }
}
