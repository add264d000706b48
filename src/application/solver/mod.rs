// 経路探索のユースケース

pub mod service;

pub use service::{SolveHandle, SolverService};
