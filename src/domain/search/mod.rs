// 経路探索のドメインモデル

pub mod beam;
pub mod config;
pub mod result;
pub mod scoring;
pub mod state;

pub use beam::{solve, BeamSearch, NoopObserver, SearchObserver, StepProgress};
pub use config::{Axis, Priority, SolverConfig};
pub use result::SolveResult;
