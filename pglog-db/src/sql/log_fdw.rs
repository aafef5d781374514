/// 확장 생성 쿼리
pub const CREATE_EXTENSION: &str = "CREATE EXTENSION IF NOT EXISTS log_fdw";

/// 로그 파일 목록 조회 쿼리
pub const LIST_LOG_FILES: &str = "
    SELECT file_name
    FROM list_postgres_log_files()
    ORDER BY file_name DESC
";

/// 현재 로그 출력 포맷 조회 쿼리
pub const SELECT_LOG_DESTINATION: &str = "SELECT current_setting('log_destination')";

/// 로그 파일을 외부 테이블로 생성 ($1 테이블, $2 서버, $3 파일)
pub const CREATE_FOREIGN_TABLE_FOR_LOG_FILE: &str =
    "SELECT create_foreign_table_for_log_file($1, $2, $3)";

/// log_fdw 확장이 설치된 스키마 조회 쿼리
pub const SELECT_EXTENSION_SCHEMA: &str = "
    SELECT n.nspname::text
    FROM pg_extension e
    JOIN pg_namespace n ON n.oid = e.extnamespace
    WHERE e.extname = 'log_fdw'
";

/// search_path 원복
pub const RESET_SEARCH_PATH: &str = "RESET search_path";

/// 테이블 존재여부 조회 쿼리 (외부 테이블 포함)
pub const TABLE_EXISTS: &str = "
    SELECT EXISTS (
        SELECT 1
        FROM information_schema.tables
        WHERE table_schema = $1
        AND table_name = $2
    )
";

/// 컬럼 구조 조회 쿼리
pub const SELECT_COLUMN_SHAPE: &str = "
    SELECT a.attname::text, format_type(a.atttypid, a.atttypmod), a.attnotnull
    FROM pg_attribute a
    JOIN pg_class c ON c.oid = a.attrelid
    JOIN pg_namespace n ON n.oid = c.relnamespace
    WHERE n.nspname = $1
    AND c.relname = $2
    AND a.attnum > 0
    AND NOT a.attisdropped
    ORDER BY a.attnum
";
