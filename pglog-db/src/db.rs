use log::{debug, error, info, warn};

use pglog_config::LoaderConfig;
use pglog_error::Result;

use crate::bootstrap::bootstrap;
use crate::catalog::{Catalog, LogSource, TableRef};
use crate::filename::LogFormat;
use crate::lister::list_log_files;
use crate::partitions::{Partition, RegisterOutcome, check_parent_name, register_log_file};
use crate::pg_catalog::PgCatalog;
use crate::pool::DatabasePool;

/// 적재 옵션
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub schema: String,
    pub table: String,
    pub prefer_structured: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            schema: "logs".to_string(),
            table: "postgres_logs".to_string(),
            prefer_structured: true,
        }
    }
}

impl From<&LoaderConfig> for LoadOptions {
    fn from(config: &LoaderConfig) -> Self {
        Self {
            schema: config.schema.clone(),
            table: config.table.clone(),
            prefer_structured: config.prefer_structured,
        }
    }
}

impl LoadOptions {
    pub fn parent(&self) -> TableRef {
        TableRef::new(self.schema.clone(), self.table.clone())
    }
}

/// 적재 결과
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub parent: TableRef,
    pub format: LogFormat,
    pub registered: Vec<Partition>,
    pub skipped: Vec<String>,
    /// 등록에 실패한 파일과 사유
    pub failed: Vec<(String, String)>,
    /// 적재가 끝났을 때 통합 테이블이 있는지
    pub parent_created: bool,
}

impl LoadReport {
    /// 운영자에게 돌려줄 확인 메시지
    pub fn confirmation(&self) -> String {
        if !self.registered.is_empty() {
            format!("Postgres logs loaded to table {}", self.parent)
        } else if self.parent_created {
            format!("No Postgres log files loaded; table {} is empty", self.parent)
        } else {
            format!(
                "No Postgres log files loaded; table {} was not created",
                self.parent
            )
        }
    }
}

/// 로그 파일 전체를 파티션으로 등록
///
/// 목록 조회 실패는 적재 전체를 중단합니다. 파일 하나의 등록 실패는 기록만
/// 하고 다음 파일로 넘어가며, 이미 등록된 파티션은 되돌리지 않습니다.
/// 컬럼 구조 불일치와 포맷 혼합은 즉시 중단합니다.
///
/// 부모 테이블은 아직 없을 때만 만듭니다. 첫 파일이 부모를 만든 뒤 실패해도
/// 다음 파일은 그 부모에 연결됩니다.
pub async fn load_log_partitions<C, S>(
    catalog: &C,
    source: &S,
    options: &LoadOptions,
) -> Result<LoadReport>
where
    C: Catalog + ?Sized,
    S: LogSource + ?Sized,
{
    let parent = options.parent();
    check_parent_name(&parent)?;

    bootstrap(catalog, &parent).await?;
    let (format, names) = list_log_files(source, options.prefer_structured).await?;

    let mut report = LoadReport {
        parent: parent.clone(),
        format,
        registered: Vec::new(),
        skipped: Vec::new(),
        failed: Vec::new(),
        parent_created: false,
    };

    for name in names {
        if !report.parent_created {
            match catalog.table_exists(&parent).await {
                Ok(exists) => report.parent_created = exists,
                Err(e) => {
                    warn!("통합 테이블 확인 실패, 건너뜀: {name}: {e}");
                    report.failed.push((name, e.to_string()));
                    continue;
                }
            }
        }

        let is_first = !report.parent_created;
        match register_log_file(catalog, &name, format, &parent, is_first).await {
            Ok(RegisterOutcome::Registered(partition)) => {
                report.parent_created = true;
                report.registered.push(partition);
            }
            Ok(RegisterOutcome::Skipped) => report.skipped.push(name),
            Err(e) if e.is_fatal_for_run() => {
                error!("로그 적재 중단: {e}");
                return Err(e);
            }
            Err(e) => {
                warn!("로그 파일 등록 실패, 건너뜀: {name}: {e}");
                report.failed.push((name, e.to_string()));
            }
        }
    }

    if !report.parent_created && !report.failed.is_empty() {
        // 마지막 파일이 부모를 만든 뒤 실패했을 수 있음
        report.parent_created = catalog.table_exists(&parent).await.unwrap_or_else(|e| {
            warn!("통합 테이블 확인 실패: {parent}: {e}");
            false
        });
    }

    info!(
        "로그 적재 완료: {} 등록 {}개, 건너뜀 {}개, 실패 {}개",
        parent,
        report.registered.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(report)
}

/// 로그 적재 후 확인 메시지 반환
pub async fn load_postgres_log_files<C, S>(
    catalog: &C,
    source: &S,
    options: &LoadOptions,
) -> Result<String>
where
    C: Catalog + ?Sized,
    S: LogSource + ?Sized,
{
    let report = load_log_partitions(catalog, source, options).await?;
    Ok(report.confirmation())
}

/// 풀에서 연결을 가져와 적재
pub async fn load_with_pool(pool: &DatabasePool, config: &LoaderConfig) -> Result<LoadReport> {
    debug!("로그 적재 연결 확보");
    let conn = pool.get_connection().await?;
    let catalog = PgCatalog::new(conn, config.log_server.clone());

    load_log_partitions(&catalog, &catalog, &LoadOptions::from(config)).await
}
