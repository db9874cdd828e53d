//! 보스별/특성별 DPS 퍼센타일 리포트
//!
//! - `specs`: 클래스/특성 메타데이터와 slug
//! - `table`: 보스 기록 테이블 로더
//! - `stats`: 특성별 퍼센타일 집계
//! - `cache`: 파일 mtime 기반 2단계 리포트 캐시

pub mod cache;
pub mod config;
pub mod specs;
pub mod stats;
pub mod table;


pub use cache::{BossDataCache, StaleFileCache};
pub use config::Config;
pub use specs::{SpecCatalog, SpecData, SpecMetadata};
pub use stats::{boss_report, BossReport, PercentileBucket, SpecBreakdown, TotalBucket};
pub use table::{FileTableLoader, LoadError, PerformanceRow, PerformanceTable, TableLoader};
