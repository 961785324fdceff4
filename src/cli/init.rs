use log::{debug, error, info, warn};

use sqlitelog::error::Result;
use sqlitelog::file_error;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# sqlitelog 配置文件

[logger]
# 数据库文件路径（可与应用的其它表共用同一个文件）
path = "logs/sqlitelog.db"
# 最低持久化级别: trace, debug, info, warn, error, fatal
minimum_level = "info"
# 命名空间，日志表名为 <namespace>_log
namespace = "app"
# 日志器释放时删除数据库文件（测试场景使用）
ephemeral = false
# 只读打开，写入操作会直接报错
readonly = false
# 写入 PRAGMA user_version 的版本号，不一致时拒绝打开
# schema_version = 1
# 语句缓存目录
# generated_code_cache_dir = ".sqlitelog-cache"

[logging]
# 命令行工具自身的日志级别
level = "info"
"#;

/// 生成默认配置文件
pub fn handle_init(output_path: &str, force: bool) -> Result<()> {
    let path = Path::new(output_path);

    info!("Generating configuration file: {output_path}");

    // 检查文件是否已存在
    if path.exists() && !force {
        error!("Configuration file already exists: {output_path}");
        info!("Tip: use --force to overwrite");
        return Err(file_error!(AlreadyExists {
            path: path.to_path_buf(),
        }));
    }

    if path.exists() && force {
        warn!("Overwriting existing configuration file");
    }

    // 创建目录（如果需要）
    if let Some(parent) = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty() && !p.exists())
    {
        info!("Creating directory: {}", parent.display());
        fs::create_dir_all(parent).map_err(|e| {
            file_error!(CreateDirectoryFailed {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })
        })?;
    }

    debug!("Writing configuration file...");
    fs::write(path, DEFAULT_CONFIG).map_err(|e| {
        file_error!(WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    })?;

    info!("Configuration file written: {output_path}");
    info!("Next steps:");
    info!("  1. Edit the configuration: {output_path}");
    info!("  2. Validate it: sqlitelog validate -c {output_path}");
    info!("  3. Write a record: sqlitelog write -c {output_path} -l warn \"hello\"");

    Ok(())
}
