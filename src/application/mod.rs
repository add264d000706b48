// アプリケーション層 - ユースケースの実装

pub mod progress;
pub mod solver;

pub use progress::{CancelToken, ProgressMessage, ProgressReporter};
pub use solver::{SolveHandle, SolverService};
