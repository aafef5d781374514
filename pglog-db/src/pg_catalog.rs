use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, warn};

use pglog_error::{PgLogError, Result};

use crate::catalog::{Catalog, ColumnDef, LogSource, TableRef};
use crate::filename::TimeRange;
use crate::sql::{ddl, log_fdw};

/// DDL 한 문장 실행 타임아웃
const STATEMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// log_fdw 로 로그 파일을 읽는 PostgreSQL 카탈로그
pub struct PgCatalog {
    conn: deadpool_postgres::Object,
    log_server: String,
}

impl PgCatalog {
    /// 풀에서 가져온 연결 하나로 생성
    pub fn new(conn: deadpool_postgres::Object, log_server: impl Into<String>) -> Self {
        Self {
            conn,
            log_server: log_server.into(),
        }
    }

    /// DDL 실행
    async fn execute(&self, sql: &str) -> Result<()> {
        debug!("DDL 실행: {sql}");

        match tokio::time::timeout(STATEMENT_TIMEOUT, self.conn.execute(sql, &[])).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => {
                error!("DDL 실행 실패: {e}");
                Err(e.into())
            }
            Err(_) => {
                error!("DDL 실행 타임아웃: {sql}");
                Err(PgLogError::Database(format!("DDL 실행 타임아웃: {sql}")))
            }
        }
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn create_schema_if_absent(&self, schema: &str) -> Result<()> {
        self.execute(&ddl::create_schema(schema)).await
    }

    async fn table_exists(&self, table: &TableRef) -> Result<bool> {
        let row = self
            .conn
            .query_one(log_fdw::TABLE_EXISTS, &[&table.schema, &table.name])
            .await?;
        Ok(row.try_get::<usize, bool>(0)?)
    }

    async fn drop_table_cascade(&self, table: &TableRef) -> Result<()> {
        self.execute(&ddl::drop_table_cascade(table)).await
    }

    async fn ensure_log_server(&self) -> Result<()> {
        self.execute(log_fdw::CREATE_EXTENSION).await?;
        self.execute(&ddl::create_log_server(&self.log_server)).await
    }

    async fn create_log_partition(&self, partition: &TableRef, file_name: &str) -> Result<()> {
        // create_foreign_table_for_log_file 은 search_path 의 첫 스키마에 테이블을 만듦
        let row = self
            .conn
            .query_one(log_fdw::SELECT_EXTENSION_SCHEMA, &[])
            .await?;
        let extension_schema: String = row.try_get(0)?;
        self.execute(&ddl::set_search_path(&partition.schema, &extension_schema))
            .await?;

        let created = self
            .conn
            .execute(
                log_fdw::CREATE_FOREIGN_TABLE_FOR_LOG_FILE,
                &[&partition.name, &self.log_server, &file_name],
            )
            .await;

        // 테이블이 만들어졌다면 원복 실패로 등록을 실패시키지 않음
        if let Err(e) = self.execute(log_fdw::RESET_SEARCH_PATH).await {
            warn!("search_path 원복 실패: {e}");
        }
        created?;
        Ok(())
    }

    async fn create_table_like(&self, table: &TableRef, template: &TableRef) -> Result<()> {
        self.execute(&ddl::create_table_like(table, template)).await
    }

    async fn attach_as_child(&self, child: &TableRef, parent: &TableRef) -> Result<()> {
        self.execute(&ddl::attach_as_child(child, parent)).await
    }

    async fn add_range_constraint(
        &self,
        table: &TableRef,
        column: &str,
        range: &TimeRange,
    ) -> Result<()> {
        self.execute(&ddl::add_range_constraint(table, column, range)).await
    }

    async fn column_shape(&self, table: &TableRef) -> Result<Vec<ColumnDef>> {
        let rows = self
            .conn
            .query(log_fdw::SELECT_COLUMN_SHAPE, &[&table.schema, &table.name])
            .await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            columns.push(ColumnDef {
                name: row.try_get(0)?,
                data_type: row.try_get(1)?,
                not_null: row.try_get(2)?,
            });
        }
        Ok(columns)
    }
}

#[async_trait]
impl LogSource for PgCatalog {
    async fn list_log_files(&self) -> Result<Vec<String>> {
        let rows = self
            .conn
            .query(log_fdw::LIST_LOG_FILES, &[])
            .await
            .map_err(|e| PgLogError::Store(format!("로그 파일 목록 조회 실패: {e}")))?;

        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            names.push(row.try_get::<usize, String>(0)?);
        }
        Ok(names)
    }

    async fn structured_output_enabled(&self) -> Result<bool> {
        let row = self.conn.query_one(log_fdw::SELECT_LOG_DESTINATION, &[]).await?;
        let destination: String = row.try_get(0)?;
        Ok(destination
            .split(',')
            .any(|dest| dest.trim().eq_ignore_ascii_case("csvlog")))
    }
}
