use log::info;

use sqlitelog::config::Config;
use sqlitelog::error::Result;
use sqlitelog::logger::SqliteLogger;

/// 按天数清理日志
pub fn handle_clear(cfg: &Config, days: &str) -> Result<()> {
    let logger = SqliteLogger::open(&cfg.logger)?;
    let before = logger.count()?;
    let after = logger.clear_str(days)?.count()?;
    info!(
        "Removed {} record(s) from {}, {after} remaining",
        before.saturating_sub(after),
        logger.table_name()
    );
    logger.close()
}

/// 删除临时存储中的日志表
pub fn handle_prune(cfg: &Config) -> Result<()> {
    let logger = SqliteLogger::open(&cfg.logger)?;
    logger.prune()?;
    logger.close()
}
