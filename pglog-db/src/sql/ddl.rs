use chrono::{DateTime, Utc};

use crate::catalog::TableRef;
use crate::filename::TimeRange;
use crate::sql::{quote_ident, quote_literal};

/// 스키마 생성 쿼리
pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema))
}

/// 테이블 삭제 쿼리 (자식 파티션 포함)
pub fn drop_table_cascade(table: &TableRef) -> String {
    format!("DROP TABLE IF EXISTS {} CASCADE", table.quoted())
}

/// 템플릿 테이블의 구조만 복사한 테이블 생성 쿼리
pub fn create_table_like(table: &TableRef, template: &TableRef) -> String {
    format!(
        "CREATE TABLE {} (LIKE {} INCLUDING DEFAULTS)",
        table.quoted(),
        template.quoted()
    )
}

/// 파티션을 부모 테이블의 자식으로 연결
pub fn attach_as_child(child: &TableRef, parent: &TableRef) -> String {
    format!(
        "ALTER FOREIGN TABLE {} INHERIT {}",
        child.quoted(),
        parent.quoted()
    )
}

/// 시간 범위 제약조건 이름
pub fn range_constraint_name(table: &TableRef, column: &str) -> String {
    format!("{}_{}_range", table.name, column)
}

/// `[start, end)` 시간 범위 CHECK 제약조건 추가
pub fn add_range_constraint(table: &TableRef, column: &str, range: &TimeRange) -> String {
    let constraint = quote_ident(&range_constraint_name(table, column));
    let column = quote_ident(column);
    format!(
        "ALTER FOREIGN TABLE {} ADD CONSTRAINT {} CHECK ({} >= {} AND {} < {})",
        table.quoted(),
        constraint,
        column,
        timestamp_literal(range.start),
        column,
        timestamp_literal(range.end),
    )
}

/// log_fdw 외부 서버 생성
pub fn create_log_server(server: &str) -> String {
    format!(
        "CREATE SERVER IF NOT EXISTS {} FOREIGN DATA WRAPPER log_fdw",
        quote_ident(server)
    )
}

/// 세션 search_path 를 대상 스키마로 고정
///
/// log_fdw 함수를 찾을 수 있도록 확장이 설치된 스키마를 뒤에 둡니다.
pub fn set_search_path(schema: &str, extension_schema: &str) -> String {
    format!(
        "SET search_path TO {}, {}",
        quote_ident(schema),
        quote_ident(extension_schema)
    )
}

/// UTC 타임스탬프 리터럴
fn timestamp_literal(ts: DateTime<Utc>) -> String {
    quote_literal(&ts.format("%Y-%m-%d %H:%M:%S+00").to_string())
}
