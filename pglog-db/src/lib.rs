pub mod bootstrap;
pub mod catalog;
pub mod db;
pub mod filename;
pub mod lister;
pub mod partitions;
pub mod pg_catalog;
pub mod pool;
pub mod sql;

#[cfg(test)]
pub(crate) mod memory;

pub use bootstrap::bootstrap;
pub use catalog::{Catalog, ColumnDef, LogSource, TableRef};
pub use db::{
    LoadOptions,
    LoadReport,
    load_log_partitions,
    load_postgres_log_files,
    load_with_pool,
};
pub use filename::{Granularity, LogFile, LogFormat, TimeRange};
pub use partitions::{Partition, RegisterOutcome, register_log_file};
pub use pg_catalog::PgCatalog;
pub use pool::DatabasePool;
