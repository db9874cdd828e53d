//! 보스별 기록 테이블 로더
//!
//! 외부 수집 파이프라인이 (서버, 보스, 난이도)마다 하나씩 남기는 컬럼형 테이블을 읽습니다.
//! 파일 형식은 컬럼 이름을 키로 하는 JSON 객체입니다:
//! `{"s": [특성 인덱스...], "u": [피해량...], "t": [전투 시간...]}`

use async_trait::async_trait;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// 한 번의 보스 기록
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceRow {
    pub spec_index: u32,
    pub damage_done: f64,
    /// 초 단위
    pub duration: f64,
}

impl PerformanceRow {
    pub fn dps(&self) -> f64 {
        self.damage_done / self.duration
    }

    /// 전투 시간이 0 이하이거나 값이 유한하지 않으면 집계에서 뺍니다.
    pub fn is_well_formed(&self) -> bool {
        self.duration > 0.0
            && self.duration.is_finite()
            && self.damage_done.is_finite()
            && self.dps().is_finite()
    }
}

/// (서버, 보스, 난이도) 하나에 대한 기록 모음. 비어 있으면 파일이 없다는 뜻입니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceTable {
    rows: Vec<PerformanceRow>,
}

impl PerformanceTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(rows: Vec<PerformanceRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PerformanceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<PerformanceRow> for PerformanceTable {
    fn from_iter<I: IntoIterator<Item = PerformanceRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("column length mismatch in {path}: s={specs}, u={damage}, t={duration}")]
    ColumnLength {
        path: PathBuf,
        specs: usize,
        damage: usize,
        duration: usize,
    },
}

/// 저장소에서 테이블을 읽어오는 쪽. 테스트에서는 호출 횟수를 세는 구현으로 바꿔 끼웁니다.
#[async_trait]
pub trait TableLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<PerformanceTable, LoadError>;
}

/// 디스크 상의 컬럼형 JSON 파일
#[derive(Debug, Deserialize)]
struct ColumnarTable {
    s: Vec<u32>,
    u: Vec<f64>,
    t: Vec<f64>,
}

impl ColumnarTable {
    fn into_table(self, path: &Path) -> Result<PerformanceTable, LoadError> {
        if self.s.len() != self.u.len() || self.s.len() != self.t.len() {
            return Err(LoadError::ColumnLength {
                path: path.to_path_buf(),
                specs: self.s.len(),
                damage: self.u.len(),
                duration: self.t.len(),
            });
        }

        Ok(self
            .s
            .into_iter()
            .zip(self.u)
            .zip(self.t)
            .map(|((spec_index, damage_done), duration)| PerformanceRow {
                spec_index,
                damage_done,
                duration,
            })
            .collect())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileTableLoader;

#[async_trait]
impl TableLoader for FileTableLoader {
    async fn load(&self, path: &Path) -> Result<PerformanceTable, LoadError> {
        let started = Instant::now();

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("{} not found, using empty table", path.display());
                return Ok(PerformanceTable::empty());
            }
            Err(source) => {
                return Err(LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let columns: ColumnarTable =
            serde_json::from_slice(&bytes).map_err(|source| LoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        let table = columns.into_table(path)?;

        tracing::debug!(
            "loaded {} rows from {} in {:?}",
            table.len(),
            path.display(),
            started.elapsed()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_row_metric() {
        let row = PerformanceRow { spec_index: 2, damage_done: 1_500_000.0, duration: 300.0 };
        assert_eq!(row.dps(), 5000.0);
        assert!(row.is_well_formed());
    }

    #[test]
    fn test_malformed_rows() {
        let zero = PerformanceRow { spec_index: 2, damage_done: 100.0, duration: 0.0 };
        let negative = PerformanceRow { spec_index: 2, damage_done: 100.0, duration: -3.0 };
        let nan = PerformanceRow { spec_index: 2, damage_done: f64::NAN, duration: 10.0 };
        let inf = PerformanceRow { spec_index: 2, damage_done: 100.0, duration: f64::INFINITY };
        assert!(!zero.is_well_formed());
        assert!(!negative.is_well_formed());
        assert!(!nan.is_well_formed());
        assert!(!inf.is_well_formed());
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let table = FileTableLoader
            .load(&dir.path().join("Lordaeron").join("Sindragosa 25H.json"))
            .await
            .unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_load_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.json");
        tokio::fs::write(&path, r#"{"s": [1, 2], "u": [1000.0, 500], "t": [10.0, 5.0], "i": ["a", "b"]}"#)
            .await
            .unwrap();

        let table = FileTableLoader.load(&path).await.unwrap();
        assert_eq!(
            table.rows(),
            &[
                PerformanceRow { spec_index: 1, damage_done: 1000.0, duration: 10.0 },
                PerformanceRow { spec_index: 2, damage_done: 500.0, duration: 5.0 },
            ]
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.json");
        tokio::fs::write(&path, b"\x28\xb5\x2f\xfd garbage").await.unwrap();

        let err = FileTableLoader.load(&path).await.unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_column_length_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.json");
        tokio::fs::write(&path, r#"{"s": [1, 2, 3], "u": [1.0, 2.0], "t": [1.0, 1.0, 1.0]}"#)
            .await
            .unwrap();

        match FileTableLoader.load(&path).await {
            Err(LoadError::ColumnLength { specs, damage, duration, .. }) => {
                assert_eq!((specs, damage, duration), (3, 2, 3));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = FileTableLoader.load(dir.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
