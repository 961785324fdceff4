//! 把 `SqliteLogger` 接入 `log` 门面
//!
//! 宿主程序调用 [`init_logging`] 后，`log::info!` 等宏产生的记录会写入数据库。

use crate::config::LoggerConfig;
use crate::config_error;
use crate::error::Result;
use crate::level::{Severity, SeverityFilter};
use crate::logger::SqliteLogger;
use crate::record::CallSite;
use log::{Metadata, Record};
use std::sync::Mutex;

/// `log::Log` 实现：每条通过过滤的记录同步插入一行
#[derive(Debug)]
pub struct SqliteLog {
    logger: Mutex<SqliteLogger>,
    filter: SeverityFilter,
}

impl SqliteLog {
    pub fn new(logger: SqliteLogger) -> Self {
        let filter = logger.filter();
        Self {
            logger: Mutex::new(logger),
            filter,
        }
    }

    pub fn filter(&self) -> SeverityFilter {
        self.filter
    }

    /// 取回内部日志器
    pub fn into_inner(self) -> SqliteLogger {
        self.logger
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl log::Log for SqliteLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.accepts(Severity::from(metadata.level()))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let call_site = CallSite {
            package: record.module_path().map(ToString::to_string),
            line: record.line(),
        };
        let message = record.args().to_string();

        // `log::Log::log` 无法返回错误，失败写到 stderr
        let logger = self
            .logger
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = logger.log_at(Severity::from(record.level()), call_site, [message]) {
            eprintln!("sqlitelog: failed to persist log record: {e}");
        }
    }

    fn flush(&self) {}
}

/// 打开日志器并注册为全局 logger
///
/// 全局 logger 在进程结束前不会被 drop，临时库文件无法删除，
/// 因此 `ephemeral = true` 的配置在这里被拒绝，需要直接持有 [`SqliteLogger`]。
pub fn init_logging(config: &LoggerConfig) -> Result<()> {
    if config.ephemeral {
        return Err(config_error!(InvalidValue {
            field: "logger.ephemeral".to_string(),
            value: "true".to_string(),
            reason: "the global logger is never dropped, so an ephemeral database would outlive the process; own a SqliteLogger instead".to_string(),
        }));
    }

    let logger = SqliteLogger::open(config)?;
    let sink = SqliteLog::new(logger);
    let max_level = sink.filter().to_level_filter();

    log::set_boxed_logger(Box::new(sink))?;
    log::set_max_level(max_level);

    log::info!(
        "SQLite logging initialized - level: {}, database: {}, namespace: {}",
        config.minimum_level,
        config.path,
        config.namespace
    );

    Ok(())
}
