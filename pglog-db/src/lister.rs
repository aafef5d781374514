use log::{debug, info};

use pglog_error::Result;

use crate::catalog::LogSource;
use crate::filename::LogFormat;

/// 이번 적재에 사용할 로그 포맷 결정
///
/// csv 선호이고 저장소의 csvlog 출력이 켜져 있을 때만 `Structured`.
/// 두 포맷을 섞어서 적재하지 않습니다.
pub async fn resolve_format<S: LogSource + ?Sized>(
    source: &S,
    prefer_structured: bool,
) -> Result<LogFormat> {
    if prefer_structured && source.structured_output_enabled().await? {
        Ok(LogFormat::Structured)
    } else {
        Ok(LogFormat::Plain)
    }
}

/// 포맷이 같은 이름만 남기고 내림차순 정렬
pub fn filter_names<I>(names: I, format: LogFormat) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut names: Vec<String> = names
        .into_iter()
        .filter(|name| LogFormat::of_name(name) == format)
        .collect();
    names.sort_unstable_by(|a, b| b.cmp(a));
    names
}

/// 적재 대상 로그 파일 목록
pub async fn list_log_files<S: LogSource + ?Sized>(
    source: &S,
    prefer_structured: bool,
) -> Result<(LogFormat, Vec<String>)> {
    let format = resolve_format(source, prefer_structured).await?;
    let all = source.list_log_files().await?;
    let total = all.len();

    let names = filter_names(all, format);
    info!(
        "로그 파일 목록 조회 완료: {} 포맷 {}개 (전체 {}개)",
        format,
        names.len(),
        total
    );
    debug!("대상 파일: {:?}", names);

    Ok((format, names))
}
