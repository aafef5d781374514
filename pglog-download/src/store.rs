use async_trait::async_trait;

use pglog_error::Result;

/// 로그 파일 조각 하나
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPortion {
    pub data: String,
    /// 다음 조각을 요청할 때 넘길 위치
    pub marker: Option<String>,
    /// 남은 데이터가 있는지
    pub pending: bool,
}

/// 원격 로그 저장소
#[async_trait]
pub trait LogStore: Send + Sync {
    /// 로그 파일 이름 전체 (페이지를 모두 넘긴 결과)
    async fn list_files(&self) -> Result<Vec<String>>;

    /// `marker` 위치부터 파일 조각 하나 가져오기
    async fn fetch_portion(&self, name: &str, marker: Option<&str>) -> Result<LogPortion>;
}
