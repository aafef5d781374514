use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_rds::Client;
use log::debug;

use pglog_config::DownloadConfig;
use pglog_error::{Result, config_err, store_err};

use crate::store::{LogPortion, LogStore};

/// RDS API 로 로그 파일을 조회/다운로드하는 저장소
pub struct RdsLogStore {
    client: Client,
    instance: String,
}

impl RdsLogStore {
    pub fn new(client: Client, instance: impl Into<String>) -> Self {
        Self {
            client,
            instance: instance.into(),
        }
    }

    /// 다운로드 설정으로 클라이언트 생성
    ///
    /// 자격 증명은 AWS 기본 프로바이더 체인을 따릅니다.
    pub async fn from_config(config: &DownloadConfig) -> Result<Self> {
        let instance = config
            .instance
            .clone()
            .ok_or_else(|| config_err("RDS 인스턴스 식별자가 없습니다"))?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let aws_config = loader.load().await;

        Ok(Self::new(Client::new(&aws_config), instance))
    }
}

#[async_trait]
impl LogStore for RdsLogStore {
    async fn list_files(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let mut req = self
                .client
                .describe_db_log_files()
                .db_instance_identifier(&self.instance);
            if let Some(ref m) = marker {
                req = req.marker(m);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| store_err(format!("로그 파일 목록 조회 실패: {e}")))?;

            if let Some(files) = resp.describe_db_log_files {
                names.extend(files.into_iter().filter_map(|f| f.log_file_name));
            }

            marker = resp.marker;
            if marker.is_none() {
                break;
            }
        }

        debug!("{} 로그 파일 {}개 조회", self.instance, names.len());
        Ok(names)
    }

    async fn fetch_portion(&self, name: &str, marker: Option<&str>) -> Result<LogPortion> {
        let mut req = self
            .client
            .download_db_log_file_portion()
            .db_instance_identifier(&self.instance)
            .log_file_name(name);
        if let Some(m) = marker {
            req = req.marker(m);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| store_err(format!("로그 파일 다운로드 실패 {name}: {e}")))?;

        Ok(LogPortion {
            data: resp.log_file_data.unwrap_or_default(),
            marker: resp.marker,
            pending: resp.additional_data_pending.unwrap_or(false),
        })
    }
}
