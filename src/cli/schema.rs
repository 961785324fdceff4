use sqlitelog::config::Config;
use sqlitelog::error::Result;
use sqlitelog::schema::schema_definition;

/// 打印日志表 DDL
pub fn handle_schema(cfg: &Config) -> Result<()> {
    print!("{}", schema_definition(cfg.logger.namespace())?);
    Ok(())
}
