use std::path::Path;
use std::fs::File;
use std::io::Read;

use serde::{Deserialize, Serialize};

use pglog_error::Result;

/// 데이터베이스 설정
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// 데이터베이스 연결 설정
    pub connection: ConnectionConfig,
    /// 연결 풀 설정
    pub pool: PoolConfig,
}

impl DbConfig {
    /// 설정파일에서 db 설정 로드
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_yaml(&contents)
    }

    /// yaml 문자열에서 db 설정 로드
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: DbConfig = serde_yml::from_str(contents)?;
        Ok(config)
    }
}

/// db 연결설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub sslmode: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            sslmode: "prefer".to_string(),
        }
    }
}

/// 데이터베이스 연결 풀 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// 최대 연결 수
    pub max_connections: usize,
    /// 연결 타임아웃(초)
    pub connection_timeout_seconds: u64,
    /// 연결 재사용 전 대기 시간(초)
    pub recycle_seconds: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            // 적재는 단일 연결로 순차 실행
            max_connections: 2,
            connection_timeout_seconds: 30,
            recycle_seconds: 21_600,
        }
    }
}
