use crate::constants::{DEFAULT_DB_PATH, DEFAULT_NAMESPACE, LOG_LEVELS};
use crate::config_error;
use crate::error::{ConfigError, Error, Result};
use crate::level::{Severity, SeverityFilter};
use crate::schema::validate_namespace;
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_minimum_level() -> String {
    "info".to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub logger: LoggerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::Config(ConfigError::NotFound(path.to_path_buf())))?;
        Self::from_str(&content, path.to_path_buf())
    }

    /// 从字符串解析配置
    pub fn from_str(content: &str, path: PathBuf) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| {
            config_error!(ParseFailed {
                path,
                reason: e.to_string(),
            })
        })?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        self.logger.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// 数据库日志器配置
#[derive(Debug, Deserialize, Clone)]
pub struct LoggerConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,
    /// 最低持久化级别
    #[serde(default = "default_minimum_level")]
    pub minimum_level: String,
    /// 命名空间，决定表名 `<namespace>_log`
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// 日志器释放时删除数据库文件
    #[serde(default)]
    pub ephemeral: bool,
    /// 以只读方式打开
    #[serde(default)]
    pub readonly: bool,
    /// 写入 `PRAGMA user_version` 的版本号
    #[serde(default)]
    pub schema_version: Option<i32>,
    /// 语句缓存目录
    #[serde(default)]
    pub generated_code_cache_dir: Option<String>,
}

impl LoggerConfig {
    /// 以默认值创建指向给定路径的配置
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.path)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// 解析最低级别
    pub fn minimum_level(&self) -> Result<Severity> {
        Severity::parse(&self.minimum_level).map_err(|_| {
            config_error!(InvalidLogLevel {
                level: self.minimum_level.clone(),
                valid_levels: LOG_LEVELS.iter().map(ToString::to_string).collect(),
            })
        })
    }

    pub fn filter(&self) -> Result<SeverityFilter> {
        Ok(SeverityFilter::new(self.minimum_level()?))
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(config_error!(InvalidValue {
                field: "logger.path".to_string(),
                value: self.path.clone(),
                reason: "Database path cannot be empty".to_string(),
            }));
        }

        self.minimum_level()?;

        validate_namespace(&self.namespace).map_err(|e| {
            config_error!(InvalidValue {
                field: "logger.namespace".to_string(),
                value: self.namespace.clone(),
                reason: e.to_string(),
            })
        })?;

        if self.readonly && self.ephemeral {
            return Err(config_error!(InvalidValue {
                field: "logger.ephemeral".to_string(),
                value: "true".to_string(),
                reason: "A read-only logger cannot delete its database".to_string(),
            }));
        }

        if let Some(dir) = &self.generated_code_cache_dir
            && dir.trim().is_empty()
        {
            return Err(config_error!(InvalidValue {
                field: "logger.generated_code_cache_dir".to_string(),
                value: dir.clone(),
                reason: "Cache directory cannot be empty when set".to_string(),
            }));
        }

        Ok(())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            minimum_level: default_minimum_level(),
            namespace: default_namespace(),
            ephemeral: false,
            readonly: false,
            schema_version: None,
            generated_code_cache_dir: None,
        }
    }
}

/// 命令行工具自身的控制台日志配置
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_minimum_level")]
    pub level: String,
}

impl LoggingConfig {
    /// 获取日志级别
    pub fn level(&self) -> &str {
        &self.level
    }

    /// 验证日志级别是否有效
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS
            .iter()
            .any(|&l| l.eq_ignore_ascii_case(self.level.as_str()))
        {
            return Err(config_error!(InvalidLogLevel {
                level: self.level.clone(),
                valid_levels: LOG_LEVELS.iter().map(ToString::to_string).collect(),
            }));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
