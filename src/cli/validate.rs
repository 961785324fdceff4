use log::info;

use sqlitelog::config::Config;
use sqlitelog::error::Result;

/// 验证配置文件
pub fn handle_validate(cfg: &Config) -> Result<()> {
    let logger = &cfg.logger;

    info!("Database path: {}", logger.path);
    info!("Namespace: {} (table {}_log)", logger.namespace, logger.namespace);
    info!("Minimum level: {}", logger.minimum_level()?);
    info!(
        "Mode: {}{}",
        if logger.readonly { "read-only" } else { "read-write" },
        if logger.ephemeral { ", ephemeral" } else { "" }
    );
    if let Some(version) = logger.schema_version {
        info!("Schema version: {version}");
    }
    if let Some(dir) = &logger.generated_code_cache_dir {
        info!("Statement cache directory: {dir}");
    }
    info!("Console log level: {}", cfg.logging.level());

    Ok(())
}
