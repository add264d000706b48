// なぞり経路ソルバ - ライブラリモジュール

pub mod constants;
pub mod domain;         // ドメイン層
pub mod application;    // アプリケーション層
pub mod infrastructure; // インフラ層
pub mod error;
pub mod logging;

// 外部クレートの再エクスポート
pub use anyhow::{anyhow, Context, Result};

// 主要な型を再エクスポート
pub use application::{CancelToken, ProgressMessage, SolverService};
pub use constants::{COLS, ROWS};
pub use domain::board::{Board, Cell, Pos};
pub use domain::search::{solve, Axis, Priority, SolveResult, SolverConfig};
pub use error::SolveError;
