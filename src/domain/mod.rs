// ドメイン層 - 盤面・消去判定・探索

pub mod board;
pub mod chain;
pub mod search;
