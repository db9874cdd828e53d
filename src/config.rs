use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub defaults: QueryDefaults,
}

/// 보스별 기록 테이블이 저장된 위치
#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    #[serde(default = "default_top_dir")]
    pub top_dir: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            top_dir: default_top_dir(),
            extension: default_extension(),
        }
    }
}

/// 서버/보스/난이도가 빠졌을 때 쓰는 값
#[derive(Debug, Clone, Deserialize)]
pub struct QueryDefaults {
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default = "default_boss")]
    pub boss: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            server: default_server(),
            boss: default_boss(),
            mode: default_mode(),
        }
    }
}

fn default_top_dir() -> PathBuf {
    PathBuf::from("top")
}

fn default_extension() -> String {
    "json".to_string()
}

fn default_server() -> String {
    "Lordaeron".to_string()
}

fn default_boss() -> String {
    "The Lich King".to_string()
}

fn default_mode() -> String {
    "25H".to_string()
}

pub async fn get_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let mut f = File::open(path)
        .await
        .context("could not open config file")?;
    let mut toml = String::new();
    f.read_to_string(&mut toml)
        .await
        .context("could not read config file")?;
    let config = toml::from_str(&toml).context("could not parse config file")?;

    Ok(config)
}
