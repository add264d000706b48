// インフラ層 - キャッシュなど技術的実装

pub mod cache;

pub use cache::ResultCache;
