use std::time::Duration;

use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use log::info;
use tokio_postgres::NoTls;
use tokio_postgres::config::{Config, SslMode};

use pglog_config::DbConfig;
use pglog_error::{PgLogError, Result};

const APPLICATION_NAME: &str = "pglog";

/// 적재용 db 풀
///
/// 적재는 연결 하나로 끝나지만 설정의 `max_connections` 를 그대로 따릅니다.
#[derive(Clone)]
pub struct DatabasePool {
    pool: Pool,
}

impl DatabasePool {
    /// 풀을 만들고 `SELECT 1` 로 연결을 확인
    pub async fn connect(dbconfig: &DbConfig) -> Result<Self> {
        let manager = Manager::from_config(
            pg_config(dbconfig),
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );
        let pool = Pool::builder(manager)
            .max_size(dbconfig.pool.max_connections)
            .runtime(Runtime::Tokio1)
            .recycle_timeout(Some(Duration::from_secs(dbconfig.pool.recycle_seconds)))
            .build()
            .map_err(|e| PgLogError::Database(format!("db 풀 생성 실패: {e}")))?;

        let db_pool = Self { pool };
        db_pool
            .get_connection()
            .await?
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| PgLogError::Database(format!("데이터베이스 연결 확인 실패: {e}")))?;

        info!(
            "db 연결 확인: {}:{}/{}",
            dbconfig.connection.host, dbconfig.connection.port, dbconfig.connection.database
        );
        Ok(db_pool)
    }

    pub async fn get_connection(&self) -> Result<Object> {
        self.pool
            .get()
            .await
            .map_err(|e| PgLogError::Database(format!("연결 풀에서 연결 가져오기 실패: {e}")))
    }
}

fn pg_config(dbconfig: &DbConfig) -> Config {
    let conn = &dbconfig.connection;

    let mut config = Config::new();
    config
        .host(conn.host.as_str())
        .port(conn.port)
        .dbname(conn.database.as_str())
        .user(conn.user.as_str())
        .password(conn.password.as_str())
        .ssl_mode(ssl_mode(&conn.sslmode))
        .application_name(APPLICATION_NAME)
        .connect_timeout(Duration::from_secs(dbconfig.pool.connection_timeout_seconds));
    config
}

/// 알 수 없는 값은 prefer
fn ssl_mode(value: &str) -> SslMode {
    match value.to_ascii_lowercase().as_str() {
        "disable" => SslMode::Disable,
        "require" => SslMode::Require,
        _ => SslMode::Prefer,
    }
}
