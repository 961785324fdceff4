use log::debug;

use sqlitelog::call_site;
use sqlitelog::config::Config;
use sqlitelog::error::Result;
use sqlitelog::level::Severity;
use sqlitelog::logger::SqliteLogger;

/// 写入一条日志
pub fn handle_write(cfg: &Config, level: &str, message: &[String]) -> Result<()> {
    let level = Severity::parse(level)?;
    let logger = SqliteLogger::open(&cfg.logger)?;

    if !logger.filter().accepts(level) {
        debug!(
            "Level {level} is below minimum {}, nothing written",
            logger.filter().minimum()
        );
    }
    logger.log_at(level, call_site!(), message)?;
    logger.close()
}
