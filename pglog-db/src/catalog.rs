use std::fmt;

use async_trait::async_trait;

use pglog_error::Result;

use crate::filename::TimeRange;
use crate::sql::quote_ident;

/// 스키마로 한정된 테이블 이름
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// 같은 스키마의 다른 테이블
    pub fn sibling(&self, name: impl Into<String>) -> Self {
        Self::new(self.schema.clone(), name)
    }

    /// SQL 에 넣을 수 있는 인용된 이름
    pub fn quoted(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.name))
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// 컬럼 구조 한 줄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
}

impl ColumnDef {
    pub fn new(name: &str, data_type: &str, not_null: bool) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            not_null,
        }
    }
}

/// 파티션과 통합 테이블을 담는 카탈로그
///
/// 모든 호출은 한 적재 실행 안에서 순차적으로 이뤄집니다.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// 스키마가 없으면 생성
    async fn create_schema_if_absent(&self, schema: &str) -> Result<()>;

    /// 테이블(외부 테이블 포함) 존재여부
    async fn table_exists(&self, table: &TableRef) -> Result<bool>;

    /// 테이블과 그 자식 파티션 삭제
    async fn drop_table_cascade(&self, table: &TableRef) -> Result<()>;

    /// 로그 파일을 읽는 외부 서버 준비
    async fn ensure_log_server(&self) -> Result<()>;

    /// 로그 파일 하나를 읽는 파티션 생성. 컬럼 구조는 저장소가 정함
    async fn create_log_partition(&self, partition: &TableRef, file_name: &str) -> Result<()>;

    /// 템플릿의 구조(컬럼, 기본값, NOT NULL)만 복사한 테이블 생성
    async fn create_table_like(&self, table: &TableRef, template: &TableRef) -> Result<()>;

    /// 자식으로 연결
    async fn attach_as_child(&self, child: &TableRef, parent: &TableRef) -> Result<()>;

    /// `column` 값이 `[range.start, range.end)` 안에 있어야 한다는 제약조건 추가
    async fn add_range_constraint(
        &self,
        table: &TableRef,
        column: &str,
        range: &TimeRange,
    ) -> Result<()>;

    /// 컬럼 구조 (순서 포함)
    async fn column_shape(&self, table: &TableRef) -> Result<Vec<ColumnDef>>;
}

/// 로그 파일 목록을 제공하는 저장소
#[async_trait]
pub trait LogSource: Send + Sync {
    /// 사용 가능한 로그 파일 이름 전체
    async fn list_log_files(&self) -> Result<Vec<String>>;

    /// 현재 csvlog 출력이 켜져 있는지
    async fn structured_output_enabled(&self) -> Result<bool>;
}
