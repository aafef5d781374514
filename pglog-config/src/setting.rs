use std::path::Path;

use log::info;

use pglog_error::{PgLogError, Result};

use crate::dbconfig::DbConfig;
use crate::download::DownloadConfig;
use crate::loader::LoaderConfig;

const DB_CONFIG_FILE: &str = "db.yml";
const LOADER_CONFIG_FILE: &str = "loader.yml";
const DOWNLOAD_CONFIG_FILE: &str = "download.yml";

/// 통합 세팅 인스턴스
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub database: DbConfig,
    pub loader: LoaderConfig,
    pub download: DownloadConfig,
}

impl Settings {
    /// Setting 생성
    pub fn new() -> Result<Self> {
        Self::from_dir(".")
    }

    /// 지정 디렉토리의 yml 파일로 Setting 생성
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let database = load_or_default(&dir.join(DB_CONFIG_FILE), "DB", |p| DbConfig::from_file(p))?;
        let loader =
            load_or_default(&dir.join(LOADER_CONFIG_FILE), "적재", |p| LoaderConfig::from_file(p))?;
        let download = load_or_default(&dir.join(DOWNLOAD_CONFIG_FILE), "다운로드", |p| {
            DownloadConfig::from_file(p)
        })?;

        Ok(Self {
            database,
            loader,
            download,
        })
    }
}

/// yml 파일이 있으면 로드, 없으면 기본설정 사용
fn load_or_default<T, F>(path: &Path, kind: &str, load: F) -> Result<T>
where
    T: Default,
    F: Fn(&Path) -> Result<T>,
{
    if path.exists() {
        info!("{} 설정파일 로드: {}", kind, path.display());
        load(path).map_err(|e| PgLogError::Config(format!("{} 설정파일 로드 실패: {}", kind, e)))
    } else {
        info!("{} 기본설정 사용", kind);
        Ok(T::default())
    }
}
