// 消去判定と落下（落ちコン込みの盤面評価）

pub mod detector;
pub mod gravity;
pub mod resolver;
pub mod result;

pub use detector::{find_matches, ClearMask, MatchReport};
pub use gravity::apply_gravity;
pub use resolver::evaluate;
pub use result::Evaluation;
