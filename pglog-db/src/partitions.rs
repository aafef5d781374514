use log::{debug, error, info, warn};

use pglog_error::{PgLogError, Result, config_err};

use crate::catalog::{Catalog, TableRef};
use crate::filename::{self, LogFile, LogFormat, TimeRange};
use crate::sql::MAX_IDENTIFIER_LEN;

/// csvlog 의 시간 컬럼
pub const LOG_TIME_COLUMN: &str = "log_time";

/// 로그 파일 하나에 대응하는 파티션
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub table: TableRef,
    pub file_name: String,
    pub range: TimeRange,
    /// csv 파일만 제약조건을 가짐
    pub constrained: bool,
}

/// 파일 하나의 등록 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered(Partition),
    /// 파일명을 인식할 수 없어 건너뜀
    Skipped,
}

/// 파티션 이름 뒤에 붙는 `_YYYYMMDD_HHMM` 길이
pub const PARTITION_SUFFIX_LEN: usize = "_YYYYMMDD_HHMM".len();

/// 파티션 이름: `부모_YYYYMMDD_HHMM` (파일 해상도와 무관하게 분 단위)
pub fn partition_name(parent: &str, range: &TimeRange) -> String {
    format!("{}_{}", parent, range.start.format("%Y%m%d_%H%M"))
}

/// 부모 테이블 이름 검사
///
/// 파티션 이름이 식별자 길이를 넘으면 PostgreSQL 이 잘라버려 같은 날의
/// 파티션끼리 이름이 겹치므로 미리 거부합니다.
pub fn check_parent_name(parent: &TableRef) -> Result<()> {
    if parent.schema.is_empty() || parent.name.is_empty() {
        return Err(config_err(format!("스키마와 테이블 이름이 필요합니다: {parent}")));
    }
    if parent.schema.len() > MAX_IDENTIFIER_LEN {
        return Err(config_err(format!(
            "스키마 이름이 {MAX_IDENTIFIER_LEN} bytes 를 넘습니다: {}",
            parent.schema
        )));
    }
    let limit = MAX_IDENTIFIER_LEN - PARTITION_SUFFIX_LEN;
    if parent.name.len() > limit {
        return Err(config_err(format!(
            "테이블 이름은 {limit} bytes 이하여야 합니다 ({} bytes): {}",
            parent.name.len(),
            parent.name
        )));
    }
    Ok(())
}

/// 로그 파일을 파티션으로 등록
///
/// `is_first` 이면 이 파티션의 구조로 부모 테이블을 만든 뒤 연결합니다.
/// 이후 파티션은 부모와 컬럼 구조가 같아야 하며, 다르면 적재를 중단합니다.
/// 파티션을 만든 뒤 어느 단계에서든 실패하면 파티션을 지우고 에러를 돌려줍니다.
pub async fn register_log_file<C: Catalog + ?Sized>(
    catalog: &C,
    file_name: &str,
    format: LogFormat,
    parent: &TableRef,
    is_first: bool,
) -> Result<RegisterOutcome> {
    let Some(file) = filename::parse(file_name) else {
        warn!("인식할 수 없는 로그 파일명, 건너뜀: {file_name}");
        return Ok(RegisterOutcome::Skipped);
    };

    if file.format != format {
        return Err(PgLogError::MixedFormat {
            file: file_name.to_string(),
            expected: format.to_string(),
        });
    }

    let table = parent.sibling(partition_name(&parent.name, &file.range));
    debug!("파티션 생성: {table} <- {file_name} {}", file.range);

    catalog.create_log_partition(&table, file_name).await?;

    let constrained = match link_partition(catalog, &file, &table, parent, is_first).await {
        Ok(constrained) => constrained,
        Err(e) => {
            discard_partition(catalog, &table).await;
            return Err(e);
        }
    };

    info!("파티션 등록 완료: {table} {}", file.range);
    Ok(RegisterOutcome::Registered(Partition {
        table,
        file_name: file.name,
        range: file.range,
        constrained,
    }))
}

/// 만들어진 파티션을 부모에 연결하고 제약조건 추가. 제약조건 여부 반환
async fn link_partition<C: Catalog + ?Sized>(
    catalog: &C,
    file: &LogFile,
    table: &TableRef,
    parent: &TableRef,
    is_first: bool,
) -> Result<bool> {
    if is_first {
        catalog.create_table_like(parent, table).await?;
        info!("통합 테이블 생성: {parent} (템플릿 {table})");
    } else {
        ensure_same_shape(catalog, table, parent).await?;
    }
    catalog.attach_as_child(table, parent).await?;

    let constrained = file.format == LogFormat::Structured;
    if constrained {
        catalog
            .add_range_constraint(table, LOG_TIME_COLUMN, &file.range)
            .await?;
    }
    Ok(constrained)
}

/// 컬럼 구조 비교
async fn ensure_same_shape<C: Catalog + ?Sized>(
    catalog: &C,
    partition: &TableRef,
    parent: &TableRef,
) -> Result<()> {
    let child_shape = catalog.column_shape(partition).await?;
    let parent_shape = catalog.column_shape(parent).await?;

    if child_shape == parent_shape {
        return Ok(());
    }

    warn!("컬럼 구조 불일치: {partition} != {parent}");
    Err(PgLogError::StructuralMismatch {
        partition: partition.to_string(),
        parent: parent.to_string(),
    })
}

/// 등록에 실패한 파티션 삭제. 삭제 실패는 기록만 함
async fn discard_partition<C: Catalog + ?Sized>(catalog: &C, table: &TableRef) {
    match catalog.drop_table_cascade(table).await {
        Ok(()) => debug!("등록 실패한 파티션 삭제: {table}"),
        Err(e) => error!("등록 실패한 파티션 삭제 실패: {table}: {e}"),
    }
}
