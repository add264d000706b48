// キャッシュ

pub mod lru;

pub use lru::{ResultCache, DEFAULT_CACHE_LIMIT};
