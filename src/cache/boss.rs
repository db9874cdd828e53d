//! (서버, 보스, 난이도)별 리포트 캐시
//!
//! 같은 키는 프로세스(또는 이 객체)가 살아 있는 동안 항상 같은 `StaleFileCache`로 풀립니다.

use anyhow::Context;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::file::StaleFileCache;
use crate::config::{Config, QueryDefaults, Storage};
use crate::specs::SpecCatalog;
use crate::stats::boss_report;
use crate::table::TableLoader;

pub struct BossDataCache {
    storage: Storage,
    defaults: QueryDefaults,
    catalog: Arc<SpecCatalog>,
    loader: Arc<dyn TableLoader>,
    caches: RwLock<HashMap<PathBuf, Arc<StaleFileCache>>>,
}

impl BossDataCache {
    pub fn new(config: &Config, catalog: Arc<SpecCatalog>, loader: Arc<dyn TableLoader>) -> Self {
        Self {
            storage: config.storage.clone(),
            defaults: config.defaults.clone(),
            catalog,
            loader,
            caches: Default::default(),
        }
    }

    /// `<top_dir>/<server>/<boss> <mode>.<extension>`
    ///
    /// 빠졌거나 빈 값은 설정의 기본값으로 채웁니다.
    pub fn boss_top_file(&self, server: Option<&str>, boss: Option<&str>, mode: Option<&str>) -> PathBuf {
        let server = or_default(server, &self.defaults.server);
        let boss = or_default(boss, &self.defaults.boss);
        let mode = or_default(mode, &self.defaults.mode);

        self.storage
            .top_dir
            .join(server)
            .join(format!("{} {}.{}", boss, mode, self.storage.extension))
    }

    /// 키에 해당하는 캐시를 돌려주고, 처음 보는 키면 만들어 둡니다.
    pub async fn resolve(
        &self,
        server: Option<&str>,
        boss: Option<&str>,
        mode: Option<&str>,
    ) -> Arc<StaleFileCache> {
        let path = self.boss_top_file(server, boss, mode);

        if let Some(cache) = self.caches.read().await.get(&path) {
            return Arc::clone(cache);
        }

        // 쓰기 락을 잡은 뒤 다시 확인해야 동시에 들어온 첫 요청들이 같은 인스턴스를 받습니다.
        let mut caches = self.caches.write().await;
        let cache = caches.entry(path).or_insert_with_key(|path| {
            tracing::debug!("new report cache for {}", path.display());
            Arc::new(StaleFileCache::new(path.clone()))
        });
        Arc::clone(cache)
    }

    /// 직렬화된 보스 리포트. 파일이 그대로면 저장된 문자열을 그대로 돌려줍니다.
    pub async fn get_boss_data(
        &self,
        server: Option<&str>,
        boss: Option<&str>,
        mode: Option<&str>,
    ) -> anyhow::Result<Arc<str>> {
        let cache = self.resolve(server, boss, mode).await;
        let path = cache.path();

        cache
            .get_or_refresh(|| async {
                let table = self.loader.load(path).await?;
                let report = boss_report(&table, &self.catalog);
                report.to_json().context("could not serialize boss report")
            })
            .await
            .with_context(|| format!("could not build boss report for {}", path.display()))
    }

    /// 지금까지 만들어진 캐시 수
    pub async fn len(&self) -> usize {
        self.caches.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.caches.read().await.is_empty()
    }
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FileTableLoader;
    use std::path::Path;

    fn cache_at(top_dir: &Path) -> BossDataCache {
        let mut config = Config::default();
        config.storage.top_dir = top_dir.to_path_buf();
        BossDataCache::new(&config, Arc::new(SpecCatalog::new()), Arc::new(FileTableLoader))
    }

    #[test]
    fn test_boss_top_file_defaults() {
        let cache = cache_at(Path::new("/data/top"));
        assert_eq!(
            cache.boss_top_file(None, None, None),
            PathBuf::from("/data/top/Lordaeron/The Lich King 25H.json")
        );
        assert_eq!(
            cache.boss_top_file(Some(""), Some("Sindragosa"), Some("")),
            PathBuf::from("/data/top/Lordaeron/Sindragosa 25H.json")
        );
        assert_eq!(
            cache.boss_top_file(Some("Icecrown"), Some("Halion"), Some("10N")),
            PathBuf::from("/data/top/Icecrown/Halion 10N.json")
        );
    }

    #[tokio::test]
    async fn test_resolve_reuses_instance() {
        let cache = cache_at(Path::new("/data/top"));
        let a = cache.resolve(None, None, None).await;
        let b = cache.resolve(Some("Lordaeron"), Some("The Lich King"), Some("25H")).await;
        let c = cache.resolve(None, Some("Sindragosa"), None).await;

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len().await, 2);
    }
}
