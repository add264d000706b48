// ソルバのエラー定義

use thiserror::Error;

use crate::domain::search::SolveResult;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("盤面サイズが不正: 期待{expected}、実際{actual}")]
    InvalidBoardSize { expected: usize, actual: usize },

    #[error("不正なセルコード: index={index} code={code}")]
    InvalidCellCode { index: usize, code: i32 },

    #[error("マーク指定が矛盾しています: {0}")]
    ConflictingMarks(String),

    #[error("探索設定が不正です: {0}")]
    InvalidConfig(String),

    /// 中断。それまでの最良解があれば保持する
    #[error("探索が中断されました")]
    Cancelled { best: Option<Box<SolveResult>> },
}

impl SolveError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SolveError::Cancelled { .. })
    }
}
