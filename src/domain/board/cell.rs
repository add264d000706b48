// セル型定義（ドメイン層）

use serde::{Deserialize, Serialize};

use crate::constants::PIECE_KINDS;

/// 空セルの転送コード
pub const EMPTY_CODE: i32 = -1;

/// ドロップ種別（0..=5）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Piece(u8);

impl Piece {
    pub fn new(kind: u8) -> Option<Self> {
        ((kind as usize) < PIECE_KINDS).then_some(Self(kind))
    }

    pub fn kind(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// 移動制限マーク
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Restriction {
    #[default]
    None,
    /// 踏めない
    Forbidden,
    /// 踏めるが最後の一歩に限る
    TerminalOnly,
}

impl Restriction {
    fn from_code(v: i32) -> Option<Self> {
        match v {
            0 => Some(Restriction::None),
            1 => Some(Restriction::Forbidden),
            2 => Some(Restriction::TerminalOnly),
            _ => None,
        }
    }

    fn code(self) -> i32 {
        match self {
            Restriction::None => 0,
            Restriction::Forbidden => 1,
            Restriction::TerminalOnly => 2,
        }
    }
}

/// 始点/終点指定マーク
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Designation {
    #[default]
    None,
    Start,
    End,
}

impl Designation {
    fn from_code(v: i32) -> Option<Self> {
        match v {
            0 => Some(Designation::None),
            1 => Some(Designation::Start),
            2 => Some(Designation::End),
            _ => None,
        }
    }

    fn code(self) -> i32 {
        match self {
            Designation::None => 0,
            Designation::Start => 1,
            Designation::End => 2,
        }
    }
}

/// 盤面の1マス。マークはドロップと一緒に移動する
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub piece: Option<Piece>,
    pub restriction: Restriction,
    pub designation: Designation,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        piece: None,
        restriction: Restriction::None,
        designation: Designation::None,
    };

    /// マークなしのドロップ（kind は 0..=5 であること）
    pub fn of(kind: u8) -> Self {
        Self {
            piece: Piece::new(kind),
            ..Self::EMPTY
        }
    }

    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restriction = restriction;
        self
    }

    pub fn with_designation(mut self, designation: Designation) -> Self {
        self.designation = designation;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }

    /// 転送コードから変換。合法域外なら None
    ///
    /// コード体系: -1 = 空、それ以外は `種別 + 10×制限 + 100×指定`
    pub fn try_decode(code: i32) -> Option<Self> {
        if code == EMPTY_CODE {
            return Some(Self::EMPTY);
        }
        if code < 0 {
            return None;
        }
        let piece = Piece::new(u8::try_from(code % 10).ok()?)?;
        let restriction = Restriction::from_code((code / 10) % 10)?;
        let designation = Designation::from_code(code / 100)?;
        Some(Self {
            piece: Some(piece),
            restriction,
            designation,
        })
    }

    /// 合法域外のコードは呼び出し側の契約違反（デバッグビルドでは panic）
    pub fn decode(code: i32) -> Self {
        match Self::try_decode(code) {
            Some(cell) => cell,
            None => {
                debug_assert!(false, "合法域外のセルコード: {}", code);
                Self::EMPTY
            }
        }
    }

    pub fn encode(self) -> i32 {
        match self.piece {
            None => EMPTY_CODE,
            Some(p) => {
                p.kind() as i32 + self.restriction.code() * 10 + self.designation.code() * 100
            }
        }
    }

    /// ログ表示用の1文字
    pub fn label_char(self) -> char {
        match self.piece {
            None => '.',
            Some(p) => (b'0' + p.kind()) as char,
        }
    }
}

/// コードを (種別, 制限, 指定) に分解
pub fn decode(code: i32) -> (Option<Piece>, Restriction, Designation) {
    let cell = Cell::decode(code);
    (cell.piece, cell.restriction, cell.designation)
}

/// (種別, 制限, 指定) からコードを作る
pub fn encode(piece: Option<Piece>, restriction: Restriction, designation: Designation) -> i32 {
    Cell {
        piece,
        restriction,
        designation,
    }
    .encode()
}
