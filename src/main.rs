use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Builder;
use log::{LevelFilter, info, warn};

use pglog_config::Settings;
use pglog_db::{DatabasePool, LogFormat, load_with_pool};
use pglog_download::{DownloadWindow, RdsLogStore, download_window};
use pglog_error::Result;

/// RDS PostgreSQL 로그 파일 적재/다운로드
#[derive(Parser, Debug)]
#[command(name = "pglog", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 로그 파일을 파티션으로 등록해 하나의 테이블로 조회
    Load {
        /// 통합 테이블 스키마
        #[arg(long)]
        schema: Option<String>,

        /// 통합 테이블 이름
        #[arg(long)]
        table: Option<String>,

        /// csvlog 가 켜져 있어도 텍스트 로그 사용
        #[arg(long)]
        plain: bool,
    },

    /// 구간에 속한 로그 파일을 로컬로 다운로드
    Download {
        /// AWS 리전
        #[arg(long, env = "AWS_REGION")]
        region: Option<String>,

        /// RDS 인스턴스 식별자
        #[arg(long, short = 'i')]
        instance: Option<String>,

        /// 로그 포맷
        #[arg(long, value_enum, default_value = "csv")]
        format: FormatArg,

        /// 시작 (YYYY-MM-DD 또는 YYYY-MM-DD-HH, 기본값 오늘)
        #[arg(long)]
        start: Option<String>,

        /// 끝 (YYYY-MM-DD 또는 YYYY-MM-DD-HH, 기본값 내일)
        #[arg(long)]
        end: Option<String>,

        /// 다운로드 디렉토리
        #[arg(long, short = 'o')]
        output_dir: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Csv,
    Plain,
}

impl From<FormatArg> for LogFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => LogFormat::Structured,
            FormatArg::Plain => LogFormat::Plain,
        }
    }
}

/// 로거 세팅
fn setup_logger() {
    #[cfg(debug_assertions)]
    {
        Builder::new()
            .filter(None, LevelFilter::Debug)
            .parse_default_env()
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{} {} {}:{}] {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    record.args()
                )
            })
            .init()
    }

    #[cfg(not(debug_assertions))]
    {
        Builder::new()
            .filter(None, LevelFilter::Info)
            .parse_default_env()
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 로거 세팅
    setup_logger();

    let cli = Cli::parse();

    // 통합 설정 로드
    let mut settings = Settings::new()?;

    match cli.command {
        Command::Load { schema, table, plain } => {
            if let Some(schema) = schema {
                settings.loader.schema = schema;
            }
            if let Some(table) = table {
                settings.loader.table = table;
            }
            if plain {
                settings.loader.prefer_structured = false;
            }

            // db 세팅
            let db_pool = DatabasePool::connect(&settings.database).await?;

            let report = load_with_pool(&db_pool, &settings.loader).await?;
            for (file, reason) in &report.failed {
                warn!("등록 실패: {file}: {reason}");
            }
            println!("{}", report.confirmation());
        }
        Command::Download {
            region,
            instance,
            format,
            start,
            end,
            output_dir,
        } => {
            if region.is_some() {
                settings.download.region = region;
            }
            if instance.is_some() {
                settings.download.instance = instance;
            }
            let dir = output_dir
                .or_else(|| settings.download.output_dir.as_ref().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));

            let window = DownloadWindow::from_args(start.as_deref(), end.as_deref())?;
            let store = RdsLogStore::from_config(&settings.download).await?;

            let report = download_window(&store, format.into(), &window, &dir).await?;
            info!(
                "다운로드 완료: {}개, 실패 {}개",
                report.downloaded.len(),
                report.failed.len()
            );
        }
    }

    Ok(())
}
