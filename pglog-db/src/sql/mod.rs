//! SQL 문장 템플릿과 식별자/리터럴 인용
//!
//! DDL 은 바인드 파라미터를 쓸 수 없으므로 파일명이나 파생된 테이블 이름이
//! 들어가는 모든 자리는 여기 인용 함수를 거쳐야 합니다.

pub mod ddl;
pub mod log_fdw;

/// PostgreSQL 식별자 최대 길이 (bytes). 넘으면 에러 없이 잘림
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// 식별자 인용 (항상 큰따옴표로 감싸고 내부 큰따옴표는 두 번 씀)
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// 문자열 리터럴 인용
pub fn quote_literal(value: &str) -> String {
    let escaped = value.replace('\'', "''");
    if escaped.contains('\\') {
        format!("E'{}'", escaped.replace('\\', "\\\\"))
    } else {
        format!("'{}'", escaped)
    }
}
