use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use pglog_error::Result;

/// 로그 다운로드 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// AWS 리전 (없으면 기본 프로바이더 체인)
    pub region: Option<String>,
    /// RDS 인스턴스 식별자
    pub instance: Option<String>,
    /// 다운로드 디렉토리 (없으면 현재 디렉토리)
    pub output_dir: Option<String>,
}

impl DownloadConfig {
    /// 설정파일에서 설정 로드
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_yml::from_str(&contents)?;

        Ok(config)
    }
}
