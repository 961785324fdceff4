//! 日志严重级别与级别过滤器
//!
//! `SeverityFilter` 由宿主程序与 `SqliteLogger` 共享，通过组合注入而非继承。

use crate::constants::LOG_LEVELS;
use crate::database_error;
use crate::error::Result;
use log::{Level, LevelFilter};
use std::fmt;
use std::str::FromStr;

/// 日志严重级别（全序：trace < debug < info < warn < error < fatal）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    /// 存储用的小写名称
    pub fn as_str(self) -> &'static str {
        LOG_LEVELS[self as usize]
    }

    /// 解析级别名称（大小写不敏感，`warning` 视为 `warn`）
    pub fn parse(name: &str) -> Result<Self> {
        let lower = name.trim().to_lowercase();
        let lower = if lower == "warning" { "warn" } else { lower.as_str() };
        LOG_LEVELS
            .iter()
            .position(|l| *l == lower)
            .map(|idx| Self::ALL[idx])
            .ok_or_else(|| {
                database_error!(InvalidArgument {
                    name: "level".to_string(),
                    value: name.to_string(),
                    reason: format!("valid values: {}", LOG_LEVELS.join(", ")),
                })
            })
    }

    /// 转换为 `log` 门面的级别；`fatal` 没有对应级别，归入 `error`
    pub fn to_log_level(self) -> Level {
        match self {
            Severity::Trace => Level::Trace,
            Severity::Debug => Level::Debug,
            Severity::Info => Level::Info,
            Severity::Warn => Level::Warn,
            Severity::Error | Severity::Fatal => Level::Error,
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => Severity::Trace,
            Level::Debug => Severity::Debug,
            Level::Info => Severity::Info,
            Level::Warn => Severity::Warn,
            Level::Error => Severity::Error,
        }
    }
}

impl FromStr for Severity {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 最低级别过滤器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityFilter {
    minimum: Severity,
}

impl SeverityFilter {
    pub fn new(minimum: Severity) -> Self {
        Self { minimum }
    }

    pub fn minimum(&self) -> Severity {
        self.minimum
    }

    /// 级别是否达到最低门槛
    pub fn accepts(&self, level: Severity) -> bool {
        level >= self.minimum
    }

    /// 转换为 `log::LevelFilter`，供 `log::set_max_level` 使用
    pub fn to_level_filter(&self) -> LevelFilter {
        self.minimum.to_log_level().to_level_filter()
    }
}

impl Default for SeverityFilter {
    fn default() -> Self {
        Self::new(Severity::Info)
    }
}
