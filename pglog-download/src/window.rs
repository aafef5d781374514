use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, TimeDelta, Utc};

use pglog_error::{PgLogError, Result};

/// 다운로드 구간 경계 (`YYYY-MM-DD` 또는 `YYYY-MM-DD-HH`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowBound {
    token: String,
}

impl WindowBound {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            token: date.format("%Y-%m-%d").to_string(),
        }
    }

    /// 파일명에서 찾을 문자열
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl FromStr for WindowBound {
    type Err = PgLogError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (day, hour) = match s.len() {
            _ if !s.is_ascii() => {
                return Err(PgLogError::Config(format!("날짜 형식이 올바르지 않습니다: {s}")));
            }
            10 => (s, None),
            13 if s.as_bytes()[10] == b'-' => (&s[..10], Some(&s[11..])),
            _ => {
                return Err(PgLogError::Config(format!(
                    "날짜 형식이 올바르지 않습니다 (YYYY-MM-DD 또는 YYYY-MM-DD-HH): {s}"
                )));
            }
        };

        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")?;
        match hour {
            None => Ok(Self::day(date)),
            Some(hour) => {
                let valid = hour.bytes().all(|b| b.is_ascii_digit())
                    && hour.parse::<u32>().is_ok_and(|h| h < 24);
                if !valid {
                    return Err(PgLogError::Config(format!("시간이 올바르지 않습니다: {s}")));
                }
                Ok(Self {
                    token: format!("{}-{}", date.format("%Y-%m-%d"), hour),
                })
            }
        }
    }
}

impl fmt::Display for WindowBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// 다운로드 구간 `[start, end]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadWindow {
    pub start: WindowBound,
    pub end: WindowBound,
}

impl DownloadWindow {
    pub fn new(start: WindowBound, end: WindowBound) -> Self {
        Self { start, end }
    }

    /// 오늘부터 내일까지 (UTC)
    pub fn today() -> Self {
        let today = Utc::now().date_naive();
        Self::new(WindowBound::day(today), WindowBound::day(today + TimeDelta::days(1)))
    }

    /// 지정되지 않은 경계는 오늘/내일로 채움
    pub fn from_args(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let default = Self::today();
        let start = start.map(str::parse::<WindowBound>).transpose()?.unwrap_or(default.start);
        let end = end.map(str::parse::<WindowBound>).transpose()?.unwrap_or(default.end);
        Ok(Self::new(start, end))
    }
}
