use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use pglog_error::Result;

/// 로그 적재 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// 통합 테이블 스키마
    pub schema: String,
    /// 통합 테이블 이름
    pub table: String,
    /// csvlog 가 켜져 있으면 .csv 파일을 우선 사용
    pub prefer_structured: bool,
    /// log_fdw 외부 서버 이름
    pub log_server: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderConfig {
    /// 기본설정으로 생성
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: "logs".to_string(),
            table: "postgres_logs".to_string(),
            prefer_structured: true,
            log_server: "log_server".to_string(),
        }
    }

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
