use std::error::Error as StdError;
use std::fmt;
use std::io;

use chrono::ParseError as ChronoParseError;
use deadpool_postgres::PoolError;
use serde_yml::Error as YmlError;
use tokio_postgres::Error as PgError;

/// pglog 의 모든 에러 타입을 정의합니다.
#[derive(Debug)]
pub enum PgLogError {
    /// 설정 관련 에러
    Config(String),

    /// 파일 입출력 에러
    Io(io::Error),

    /// 데이터베이스 관련 에러
    Database(String),

    /// 로그 저장소(목록 조회, 다운로드) 에러
    Store(String),

    /// 파티션 컬럼 구조가 부모 테이블과 다름
    StructuralMismatch { partition: String, parent: String },

    /// 한 번의 적재에 다른 포맷의 로그 파일이 섞임
    MixedFormat { file: String, expected: String },
}

impl fmt::Display for PgLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgLogError::Config(msg) => write!(f, "설정 에러: {}", msg),
            PgLogError::Io(err) => write!(f, "I/O 에러: {}", err),
            PgLogError::Database(msg) => write!(f, "데이터베이스 에러: {}", msg),
            PgLogError::Store(msg) => write!(f, "로그 저장소 에러: {}", msg),
            PgLogError::StructuralMismatch { partition, parent } => write!(
                f,
                "컬럼 구조 불일치: 파티션 {} 의 컬럼이 부모 테이블 {} 과 다릅니다",
                partition, parent
            ),
            PgLogError::MixedFormat { file, expected } => write!(
                f,
                "로그 포맷 혼합: {} 는 {} 포맷이 아닙니다",
                file, expected
            ),
        }
    }
}

impl StdError for PgLogError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            PgLogError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl PgLogError {
    /// 적재 전체를 중단해야 하는 에러인지 여부
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(
            self,
            PgLogError::StructuralMismatch { .. } | PgLogError::MixedFormat { .. }
        )
    }
}

/// Result 타입 별칭 정의
pub type Result<T> = std::result::Result<T, PgLogError>;

/// From 트레이트 구현으로 다양한 에러 타입을 PgLogError로 변환
impl From<io::Error> for PgLogError {
    fn from(err: io::Error) -> Self {
        PgLogError::Io(err)
    }
}

impl From<PoolError> for PgLogError {
    fn from(err: PoolError) -> Self {
        PgLogError::Database(format!("DB 풀 에러: {}", err))
    }
}

impl From<PgError> for PgLogError {
    fn from(err: PgError) -> Self {
        PgLogError::Database(format!("PostgreSQL 에러: {}", err))
    }
}

impl From<ChronoParseError> for PgLogError {
    fn from(err: ChronoParseError) -> Self {
        PgLogError::Config(format!("날짜 파싱 에러: {}", err))
    }
}

impl From<YmlError> for PgLogError {
    fn from(err: YmlError) -> Self {
        PgLogError::Config(format!("YAML 파싱 에러: {}", err))
    }
}

/// 에러 처리 유틸리티 함수
pub fn config_err<E: fmt::Display>(err: E) -> PgLogError {
    PgLogError::Config(format!("{}", err))
}

pub fn db_err<E: fmt::Display>(err: E) -> PgLogError {
    PgLogError::Database(format!("{}", err))
}

pub fn store_err<E: fmt::Display>(err: E) -> PgLogError {
    PgLogError::Store(format!("{}", err))
}
