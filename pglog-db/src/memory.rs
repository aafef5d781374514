//! 테스트용 메모리 카탈로그

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use pglog_error::{PgLogError, Result, db_err};

use crate::catalog::{Catalog, ColumnDef, LogSource, TableRef};
use crate::filename::{LogFormat, TimeRange};

#[derive(Debug, Clone)]
struct MemTable {
    columns: Vec<ColumnDef>,
    parent: Option<TableRef>,
    constraint: Option<(String, TimeRange)>,
}

#[derive(Default)]
struct State {
    schemas: BTreeSet<String>,
    tables: BTreeMap<TableRef, MemTable>,
    server_ready: bool,
    calls: usize,
    /// 다음 한 번만 실패할 연산 이름
    fail_once: HashSet<&'static str>,
}

impl State {
    fn injected(&mut self, op: &'static str) -> Result<()> {
        if self.fail_once.remove(op) {
            return Err(db_err(format!("{op}: connection reset")));
        }
        Ok(())
    }
}

/// 카탈로그와 로그 저장소를 흉내내는 메모리 구현
#[derive(Default)]
pub struct MemoryCatalog {
    state: Mutex<State>,
    files: Vec<String>,
    csvlog: bool,
    listing_fails: bool,
    failing_files: HashSet<String>,
    columns_override: HashMap<String, Vec<ColumnDef>>,
}

pub fn csvlog_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("log_time", "timestamp(3) with time zone", false),
        ColumnDef::new("user_name", "text", false),
        ColumnDef::new("database_name", "text", false),
        ColumnDef::new("process_id", "integer", false),
        ColumnDef::new("connection_from", "text", false),
        ColumnDef::new("session_id", "text", false),
        ColumnDef::new("session_line_num", "bigint", false),
        ColumnDef::new("command_tag", "text", false),
        ColumnDef::new("session_start_time", "timestamp with time zone", false),
        ColumnDef::new("error_severity", "text", false),
        ColumnDef::new("message", "text", false),
    ]
}

pub fn plain_columns() -> Vec<ColumnDef> {
    vec![ColumnDef::new("log_entry", "text", false)]
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_csvlog(mut self, enabled: bool) -> Self {
        self.csvlog = enabled;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    /// 해당 파일의 파티션 생성이 실패하도록
    pub fn failing_file(mut self, file: &str) -> Self {
        self.failing_files.insert(file.to_string());
        self
    }

    /// 카탈로그 연산 `op` 의 다음 호출 한 번을 실패시킴
    pub fn fail_once(mut self, op: &'static str) -> Self {
        self.state
            .get_mut()
            .expect("memory catalog lock")
            .fail_once
            .insert(op);
        self
    }

    /// 해당 파일의 파티션 컬럼 구조를 바꿈
    pub fn with_columns_for(mut self, file: &str, columns: Vec<ColumnDef>) -> Self {
        self.columns_override.insert(file.to_string(), columns);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("memory catalog lock")
    }

    fn touch(&self) -> std::sync::MutexGuard<'_, State> {
        let mut state = self.lock();
        state.calls += 1;
        state
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls
    }

    pub fn has_schema(&self, schema: &str) -> bool {
        self.lock().schemas.contains(schema)
    }

    pub fn has_table(&self, table: &TableRef) -> bool {
        self.lock().tables.contains_key(table)
    }

    pub fn table_count(&self) -> usize {
        self.lock().tables.len()
    }

    pub fn children_of(&self, parent: &TableRef) -> Vec<TableRef> {
        self.lock()
            .tables
            .iter()
            .filter(|(_, t)| t.parent.as_ref() == Some(parent))
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn constraint_of(&self, table: &TableRef) -> Option<(String, TimeRange)> {
        self.lock().tables.get(table).and_then(|t| t.constraint.clone())
    }

    pub fn columns_of(&self, table: &TableRef) -> Option<Vec<ColumnDef>> {
        self.lock().tables.get(table).map(|t| t.columns.clone())
    }
}

fn missing(table: &TableRef) -> PgLogError {
    db_err(format!("relation \"{table}\" does not exist"))
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn create_schema_if_absent(&self, schema: &str) -> Result<()> {
        self.touch().schemas.insert(schema.to_string());
        Ok(())
    }

    async fn table_exists(&self, table: &TableRef) -> Result<bool> {
        let mut state = self.touch();
        state.injected("table_exists")?;
        Ok(state.tables.contains_key(table))
    }

    async fn drop_table_cascade(&self, table: &TableRef) -> Result<()> {
        let mut state = self.touch();
        state.injected("drop_table_cascade")?;
        let mut doomed = vec![table.clone()];
        while let Some(current) = doomed.pop() {
            state.tables.remove(&current);
            doomed.extend(
                state
                    .tables
                    .iter()
                    .filter(|(_, t)| t.parent.as_ref() == Some(&current))
                    .map(|(name, _)| name.clone()),
            );
        }
        Ok(())
    }

    async fn ensure_log_server(&self) -> Result<()> {
        self.touch().server_ready = true;
        Ok(())
    }

    async fn create_log_partition(&self, partition: &TableRef, file_name: &str) -> Result<()> {
        let mut state = self.touch();
        if !state.server_ready {
            return Err(db_err("server \"log_server\" does not exist"));
        }
        if !state.schemas.contains(&partition.schema) {
            return Err(db_err(format!("schema \"{}\" does not exist", partition.schema)));
        }
        if self.failing_files.contains(file_name) {
            return Err(PgLogError::Store(format!("could not open log file {file_name}")));
        }
        if state.tables.contains_key(partition) {
            return Err(db_err(format!("relation \"{partition}\" already exists")));
        }

        let columns = self
            .columns_override
            .get(file_name)
            .cloned()
            .unwrap_or_else(|| match LogFormat::of_name(file_name) {
                LogFormat::Structured => csvlog_columns(),
                LogFormat::Plain => plain_columns(),
            });
        state.tables.insert(
            partition.clone(),
            MemTable {
                columns,
                parent: None,
                constraint: None,
            },
        );
        Ok(())
    }

    async fn create_table_like(&self, table: &TableRef, template: &TableRef) -> Result<()> {
        let mut state = self.touch();
        state.injected("create_table_like")?;
        if state.tables.contains_key(table) {
            return Err(db_err(format!("relation \"{table}\" already exists")));
        }
        let columns = state
            .tables
            .get(template)
            .ok_or_else(|| missing(template))?
            .columns
            .clone();
        state.tables.insert(
            table.clone(),
            MemTable {
                columns,
                parent: None,
                constraint: None,
            },
        );
        Ok(())
    }

    async fn attach_as_child(&self, child: &TableRef, parent: &TableRef) -> Result<()> {
        let mut state = self.touch();
        state.injected("attach_as_child")?;
        if !state.tables.contains_key(parent) {
            return Err(missing(parent));
        }
        let child_table = state.tables.get_mut(child).ok_or_else(|| missing(child))?;
        child_table.parent = Some(parent.clone());
        Ok(())
    }

    async fn add_range_constraint(
        &self,
        table: &TableRef,
        column: &str,
        range: &TimeRange,
    ) -> Result<()> {
        let mut state = self.touch();
        state.injected("add_range_constraint")?;
        let target = state.tables.get_mut(table).ok_or_else(|| missing(table))?;
        target.constraint = Some((column.to_string(), *range));
        Ok(())
    }

    async fn column_shape(&self, table: &TableRef) -> Result<Vec<ColumnDef>> {
        let state = self.touch();
        state
            .tables
            .get(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| missing(table))
    }
}

#[async_trait]
impl LogSource for MemoryCatalog {
    async fn list_log_files(&self) -> Result<Vec<String>> {
        if self.listing_fails {
            return Err(PgLogError::Store("access denied".to_string()));
        }
        Ok(self.files.clone())
    }

    async fn structured_output_enabled(&self) -> Result<bool> {
        Ok(self.csvlog)
    }
}
