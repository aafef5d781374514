//! 로그 파일명 해석
//!
//! RDS 로그 파일명(`postgresql.log.YYYY-MM-DD[-HH[MI]][.csv]`)에서 파일의 행이
//! 반드시 속하는 UTC 반개구간 `[start, end)` 을 구합니다. 분, 시, 일 순서로
//! 시도해 처음 맞는 모양을 사용하고 어느 것도 맞지 않으면 `None` 입니다.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// 구조화(csvlog) 파일 접미사
pub const STRUCTURED_SUFFIX: &str = ".csv";

static MINUTE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^postgresql\.log\.(\d{4})-(\d{2})-(\d{2})-(\d{2})(\d{2})(\.csv)?$")
        .expect("minute shape regex")
});

static HOUR_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^postgresql\.log\.(\d{4})-(\d{2})-(\d{2})-(\d{2})(\.csv)?$")
        .expect("hour shape regex")
});

static DAY_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^postgresql\.log\.(\d{4})-(\d{2})-(\d{2})(\.csv)?$").expect("day shape regex")
});

/// 로그 파일 포맷
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogFormat {
    /// csvlog (고정 컬럼)
    Structured,
    /// stderr 텍스트
    Plain,
}

impl LogFormat {
    /// 파일명 접미사로 포맷 판별
    pub fn of_name(name: &str) -> Self {
        if name.ends_with(STRUCTURED_SUFFIX) {
            LogFormat::Structured
        } else {
            LogFormat::Plain
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LogFormat::Structured => "csv",
            LogFormat::Plain => "plain",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 파일명에 들어있는 시간 해상도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Minute,
    Hour,
    Day,
}

impl Granularity {
    /// 해상도 한 칸의 길이
    pub fn span(self) -> TimeDelta {
        match self {
            Granularity::Minute => TimeDelta::minutes(1),
            Granularity::Hour => TimeDelta::hours(1),
            Granularity::Day => TimeDelta::days(1),
        }
    }

    fn shape(self) -> &'static Regex {
        match self {
            Granularity::Minute => &*MINUTE_SHAPE,
            Granularity::Hour => &*HOUR_SHAPE,
            Granularity::Day => &*DAY_SHAPE,
        }
    }
}

/// 시도 순서: 가장 세밀한 모양부터
const SHAPES: [Granularity; 3] = [Granularity::Minute, Granularity::Hour, Granularity::Day];

/// UTC 반개구간 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.format("%Y-%m-%dT%H:%M"),
            self.end.format("%Y-%m-%dT%H:%M")
        )
    }
}

/// 해석된 로그 파일
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub name: String,
    pub format: LogFormat,
    pub granularity: Granularity,
    pub range: TimeRange,
}

/// 파일명 해석. 인식할 수 없으면 `None`
pub fn parse(name: &str) -> Option<LogFile> {
    // error/postgresql.log... 처럼 디렉토리가 붙어 있을 수 있음
    let base = name.rsplit('/').next().unwrap_or(name);

    SHAPES.iter().find_map(|&granularity| {
        let caps = granularity.shape().captures(base)?;
        let start = start_of(&caps, granularity)?;
        let end = start.checked_add_signed(granularity.span())?;
        Some(LogFile {
            name: name.to_string(),
            format: LogFormat::of_name(base),
            granularity,
            range: TimeRange { start, end },
        })
    })
}

/// 지정 포맷일 때만 해석 결과 반환
pub fn parse_as(name: &str, format: LogFormat) -> Option<LogFile> {
    parse(name).filter(|file| file.format == format)
}

fn start_of(caps: &Captures<'_>, granularity: Granularity) -> Option<DateTime<Utc>> {
    let field = |idx: usize| caps.get(idx)?.as_str().parse::<u32>().ok();

    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?;
    let (hour, minute) = match granularity {
        Granularity::Minute => (field(4)?, field(5)?),
        Granularity::Hour => (field(4)?, 0),
        Granularity::Day => (0, 0),
    };

    Some(date.and_hms_opt(hour, minute, 0)?.and_utc())
}
