use std::path::{Component, Path, PathBuf};

use log::{debug, error, info};
use tokio::io::AsyncWriteExt;

use pglog_db::LogFormat;
use pglog_error::{Result, store_err};

use crate::store::LogStore;
use crate::window::DownloadWindow;

/// 다운로드 결과
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    pub downloaded: Vec<PathBuf>,
    /// 실패한 파일과 사유
    pub failed: Vec<(String, String)>,
}

/// 구간에 속하는 파일 선택
///
/// 오름차순으로 정렬한 뒤 `start` 를 포함하는 첫 파일부터 `end` 를 포함하는
/// 첫 파일까지 (그 파일 포함) 고릅니다. 경계는 실제 날짜 비교가 아니라
/// 파일명에 문자열이 들어있는지로만 판단합니다.
pub fn select_files<I>(names: I, format: LogFormat, window: &DownloadWindow) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut names: Vec<String> = names
        .into_iter()
        .filter(|name| LogFormat::of_name(name) == format)
        .collect();
    names.sort_unstable();

    let mut selected = Vec::new();
    let mut started = false;
    for name in names {
        if !started && name.contains(window.start.token()) {
            started = true;
        }
        if !started {
            continue;
        }

        let last = name.contains(window.end.token());
        selected.push(name);
        if last {
            break;
        }
    }
    selected
}

/// 파일들을 `dir` 아래 같은 이름으로 다운로드
///
/// 파일 하나의 실패는 기록하고 다음 파일로 넘어갑니다.
pub async fn download_files<S: LogStore + ?Sized>(
    store: &S,
    names: &[String],
    dir: &Path,
) -> DownloadReport {
    let mut report = DownloadReport::default();

    for name in names {
        let path = match local_path(dir, name) {
            Ok(path) => path,
            Err(e) => {
                error!("다운로드 거부: {name}: {e}");
                report.failed.push((name.clone(), e.to_string()));
                continue;
            }
        };
        match download_file(store, name, &path).await {
            Ok(bytes) => {
                info!("다운로드 완료: {} ({} bytes)", path.display(), bytes);
                report.downloaded.push(path);
            }
            Err(e) => {
                error!("다운로드 실패: {name}: {e}");
                report.failed.push((name.clone(), e.to_string()));
            }
        }
    }

    report
}

/// 목록 조회 후 구간에 속한 파일만 다운로드
pub async fn download_window<S: LogStore + ?Sized>(
    store: &S,
    format: LogFormat,
    window: &DownloadWindow,
    dir: &Path,
) -> Result<DownloadReport> {
    let names = store.list_files().await?;
    let selected = select_files(names, format, window);
    info!(
        "다운로드 대상 {}개 ({} ~ {}, {} 포맷)",
        selected.len(),
        window.start,
        window.end,
        format
    );

    Ok(download_files(store, &selected, dir).await)
}

/// 원격 파일명을 `dir` 아래 경로로 변환
///
/// 상대 경로의 일반 구성요소만 허용합니다. `..`, 루트, 접두사가 있으면 `dir`
/// 밖에 쓰게 되므로 거부합니다.
fn local_path(dir: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    let normal = relative.components().all(|c| matches!(c, Component::Normal(_)));
    if name.is_empty() || !normal {
        return Err(store_err(format!("허용되지 않는 파일 경로: {name}")));
    }
    Ok(dir.join(relative))
}

async fn download_file<S: LogStore + ?Sized>(store: &S, name: &str, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::File::create(path).await?;

    let mut written = 0;
    let mut marker: Option<String> = None;
    loop {
        let portion = store.fetch_portion(name, marker.as_deref()).await?;
        file.write_all(portion.data.as_bytes()).await?;
        written += portion.data.len();
        debug!("{name}: {} bytes 수신", portion.data.len());

        if !portion.pending {
            break;
        }
        if portion.marker.is_none() || portion.marker == marker {
            return Err(store_err(format!("다음 위치 없이 데이터가 남아 있습니다: {name}")));
        }
        marker = portion.marker;
    }

    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::store::LogPortion;
    use crate::window::WindowBound;
    use pglog_error::PgLogError;

    /// 조각 단위로 응답하는 메모리 저장소
    struct MemoryStore {
        files: HashMap<String, Vec<&'static str>>,
    }

    impl MemoryStore {
        fn new(files: &[(&str, Vec<&'static str>)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(name, chunks)| (name.to_string(), chunks.clone()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl LogStore for MemoryStore {
        async fn list_files(&self) -> Result<Vec<String>> {
            Ok(self.files.keys().cloned().collect())
        }

        async fn fetch_portion(&self, name: &str, marker: Option<&str>) -> Result<LogPortion> {
            let chunks = self
                .files
                .get(name)
                .ok_or_else(|| PgLogError::Store(format!("not found: {name}")))?;
            let idx: usize = marker.map_or(0, |m| m.parse().unwrap());
            Ok(LogPortion {
                data: chunks[idx].to_string(),
                marker: Some((idx + 1).to_string()),
                pending: idx + 1 < chunks.len(),
            })
        }
    }

    fn window(start: &str, end: &str) -> DownloadWindow {
        DownloadWindow::new(start.parse::<WindowBound>().unwrap(), end.parse::<WindowBound>().unwrap())
    }

    fn names() -> Vec<String> {
        [
            "error/postgresql.log.2024-01-03-01",
            "error/postgresql.log.2024-01-02-23",
            "error/postgresql.log.2024-01-01-12",
            "error/postgresql.log.2024-01-03-00",
            "error/postgresql.log.2024-01-02-00",
            "error/postgresql.log.2024-01-02-00.csv",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn day_window_selects_through_first_end_match() {
        let selected = select_files(names(), LogFormat::Plain, &window("2024-01-02", "2024-01-03"));
        assert_eq!(
            selected,
            vec![
                "error/postgresql.log.2024-01-02-00",
                "error/postgresql.log.2024-01-02-23",
                "error/postgresql.log.2024-01-03-00",
            ]
        );
    }

    #[test]
    fn hour_window_bounds() {
        let selected = select_files(names(), LogFormat::Plain, &window("2024-01-02-23", "2024-01-03-01"));
        assert_eq!(
            selected,
            vec![
                "error/postgresql.log.2024-01-02-23",
                "error/postgresql.log.2024-01-03-00",
                "error/postgresql.log.2024-01-03-01",
            ]
        );
    }

    #[test]
    fn nothing_selected_without_start_match() {
        assert!(select_files(names(), LogFormat::Plain, &window("2023-12-31", "2024-01-03")).is_empty());
    }

    #[test]
    fn missing_end_runs_to_last_file() {
        let selected = select_files(names(), LogFormat::Plain, &window("2024-01-03", "2024-01-05"));
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn format_filter_applies() {
        let selected = select_files(names(), LogFormat::Structured, &window("2024-01-02", "2024-01-03"));
        assert_eq!(selected, vec!["error/postgresql.log.2024-01-02-00.csv"]);
    }

    #[tokio::test]
    async fn downloads_all_portions_under_remote_name() {
        let store = MemoryStore::new(&[
            ("error/postgresql.log.2024-01-02-00", vec!["line 1\n", "line 2\n", "line 3\n"]),
            ("error/postgresql.log.2024-01-02-01", vec!["only\n"]),
        ]);
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();

        let report = download_window(&store, LogFormat::Plain, &window("2024-01-02", "2024-01-03"), dir)
            .await
            .unwrap();

        assert_eq!(report.downloaded.len(), 2);
        assert!(report.failed.is_empty());
        let body = std::fs::read_to_string(dir.join("error/postgresql.log.2024-01-02-00")).unwrap();
        assert_eq!(body, "line 1\nline 2\nline 3\n");
    }

    #[tokio::test]
    async fn one_failed_file_does_not_stop_the_rest() {
        let store = MemoryStore::new(&[("postgresql.log.2024-01-02-01", vec!["ok\n"])]);
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let names = vec![
            "postgresql.log.2024-01-02-00".to_string(),
            "postgresql.log.2024-01-02-01".to_string(),
        ];

        let report = download_files(&store, &names, dir).await;

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "postgresql.log.2024-01-02-00");
        assert_eq!(report.downloaded, vec![dir.join("postgresql.log.2024-01-02-01")]);
    }

    #[tokio::test]
    async fn names_escaping_the_output_dir_are_rejected() {
        let store = MemoryStore::new(&[
            ("../postgresql.log.2024-01-02-00", vec!["escaped\n"]),
            ("/tmp/postgresql.log.2024-01-02-00", vec!["absolute\n"]),
            ("error/../../postgresql.log.2024-01-02-00", vec!["nested\n"]),
            ("error/postgresql.log.2024-01-02-01", vec!["ok\n"]),
        ]);
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out");
        let mut names: Vec<String> = store.files.keys().cloned().collect();
        names.sort();

        let report = download_files(&store, &names, &dir).await;

        assert_eq!(report.downloaded, vec![dir.join("error/postgresql.log.2024-01-02-01")]);
        assert_eq!(report.failed.len(), 3);
        assert!(!tmp.path().join("postgresql.log.2024-01-02-00").exists());
        for (name, reason) in &report.failed {
            assert!(reason.contains(name.as_str()), "{reason}");
        }
    }

    #[test]
    fn plain_relative_names_map_under_dir() {
        let dir = Path::new("/data/logs");
        assert_eq!(
            local_path(dir, "error/postgresql.log.2024-01-02-01").unwrap(),
            dir.join("error/postgresql.log.2024-01-02-01")
        );
        assert!(local_path(dir, "").is_err());
        assert!(local_path(dir, "./postgresql.log.2024-01-02-01").is_err());
    }
}
