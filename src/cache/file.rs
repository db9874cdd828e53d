//! 파일 수정 시각 기반 캐시
//!
//! 파일의 mtime이 마지막 계산 때와 같으면 저장된 결과를 그대로 돌려주고,
//! 달라졌으면 한 번만 다시 계산합니다.

use anyhow::Context;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Mutex;

/// 마지막으로 계산한 결과
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// 계산 당시 파일의 수정 시각 (파일이 없었으면 None)
    pub modified: Option<SystemTime>,
    pub value: Arc<str>,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct StaleFileCache {
    path: PathBuf,
    entry: Mutex<Option<CacheEntry>>,
}

impl StaleFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 현재 저장된 항목 (테스트/진단용)
    pub async fn entry(&self) -> Option<CacheEntry> {
        self.entry.lock().await.clone()
    }

    /// 파일이 바뀌었을 때만 `produce`를 호출합니다.
    ///
    /// 경로별 락을 계산이 끝날 때까지 잡고 있으므로 같은 mtime에 대한 재계산은
    /// 동시에 호출돼도 한 번뿐입니다. `produce`가 실패하면 이전 항목을 유지합니다.
    pub async fn get_or_refresh<F, Fut>(&self, produce: F) -> anyhow::Result<Arc<str>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<String>>,
    {
        let mut entry = self.entry.lock().await;
        let modified = file_modified(&self.path).await?;

        if let Some(cached) = entry.as_ref() {
            if cached.modified == modified {
                tracing::debug!(
                    "cache hit for {} (computed {})",
                    self.path.display(),
                    cached.computed_at.to_rfc3339()
                );
                return Ok(Arc::clone(&cached.value));
            }
        }

        tracing::info!(
            "recomputing {} (modified {})",
            self.path.display(),
            format_modified(modified)
        );

        let value: Arc<str> = produce().await?.into();
        *entry = Some(CacheEntry {
            modified,
            value: Arc::clone(&value),
            computed_at: Utc::now(),
        });

        Ok(value)
    }
}

/// 파일의 수정 시각. 파일이 없으면 None, 그 밖의 오류는 그대로 올립니다.
pub async fn file_modified(path: &Path) -> anyhow::Result<Option<SystemTime>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => {
            let modified = meta
                .modified()
                .with_context(|| format!("could not read mtime of {}", path.display()))?;
            Ok(Some(modified))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("could not stat {}", path.display())),
    }
}

fn format_modified(modified: Option<SystemTime>) -> String {
    match modified {
        Some(time) => DateTime::<Utc>::from(time).to_rfc3339(),
        None => "never, file missing".to_string(),
    }
}
