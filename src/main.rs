use boss_percentiles::config::{get_config, Config};
use boss_percentiles::{BossDataCache, FileTableLoader, SpecCatalog};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::MakeWriterExt;

const USAGE: &str = "usage: boss-percentiles [--config <path>] report [server] [boss] [mode]
       boss-percentiles [--config <path>] specs";

#[tokio::main]
async fn main() {
    // 로깅 초기화: 콘솔 + 일별 로테이션 파일 (stdout은 결과 JSON 전용)
    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix("boss-percentiles")
        .filename_suffix("log")
        .build("logs")
        .expect("initializing rolling file appender failed");

    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .with_writer(std::io::stderr.and(non_blocking))
        .with_ansi(true)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = match args.iter().position(|arg| arg == "--config") {
        Some(i) if i + 1 < args.len() => {
            let path = args.remove(i + 1);
            args.remove(i);
            path
        }
        Some(_) => {
            eprintln!("{}", USAGE);
            return;
        }
        None => "./config.toml".to_string(),
    };

    let config = match load_config(&config_path).await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {:#}", e);
            return;
        }
    };

    let catalog = Arc::new(SpecCatalog::new());

    match args.first().map(String::as_str) {
        Some("report") => {
            let cache = BossDataCache::new(&config, Arc::clone(&catalog), Arc::new(FileTableLoader));
            let server = args.get(1).map(String::as_str);
            let boss = args.get(2).map(String::as_str);
            let mode = args.get(3).map(String::as_str);

            match cache.get_boss_data(server, boss, mode).await {
                Ok(report) => println!("{}", report),
                Err(e) => {
                    tracing::error!("Report error: {}", e);
                    tracing::error!("  {:?}", e);
                }
            }
        }
        Some("specs") => match serde_json::to_string(&catalog.specs_data()) {
            Ok(specs) => println!("{}", specs),
            Err(e) => tracing::error!("could not serialize specs: {}", e),
        },
        _ => eprintln!("{}", USAGE),
    }
}

/// 설정 파일이 없으면 기본값으로 진행합니다.
async fn load_config(path: &str) -> anyhow::Result<Config> {
    if !Path::new(path).exists() {
        tracing::info!("{} not found, using default config", path);
        return Ok(Config::default());
    }

    get_config(path).await
}
