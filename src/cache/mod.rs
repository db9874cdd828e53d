//! 리포트 캐시
//!
//! - `file`: 파일 mtime 기반 캐시 (경로 하나당 하나)
//! - `boss`: (서버, 보스, 난이도) -> 경로별 캐시

pub mod boss;
pub mod file;

pub use boss::BossDataCache;
pub use file::{file_modified, CacheEntry, StaleFileCache};
