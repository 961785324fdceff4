use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration related error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File operation error
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// Database operation error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Global logger already installed
    #[error("Failed to install logger: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Configuration file parse failed
    #[error("Failed to parse configuration file {path}: {reason}")]
    ParseFailed { path: PathBuf, reason: String },

    /// Invalid log level
    #[error("Invalid log level '{level}', valid values: {}", valid_levels.join(", "))]
    InvalidLogLevel {
        level: String,
        valid_levels: Vec<String>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value {field} = '{value}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// File already exists
    #[error("File already exists: {path} (use --force to replace)")]
    AlreadyExists { path: PathBuf },

    /// File write failed
    #[error("Failed to write file {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// Create directory failed
    #[error("Failed to create directory {path}: {reason}")]
    CreateDirectoryFailed { path: PathBuf, reason: String },
}

/// 数据库错误
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Malformed input to a logger operation
    #[error("Invalid argument {name} = '{value}': {reason}")]
    InvalidArgument {
        name: String,
        value: String,
        reason: String,
    },

    /// Table definition or DDL failure
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Insert or delete statement failed
    #[error("Write to {table_name} failed: {reason}")]
    Write { table_name: String, reason: String },

    /// Read statement failed
    #[error("Read from {table_name} failed: {reason}")]
    Read { table_name: String, reason: String },

    /// Write attempted on a logger opened read-only
    #[error("Logger for {path} is read-only: cannot {operation}")]
    ReadOnly { path: PathBuf, operation: String },

    /// Backing database file could not be opened or created
    #[error("Failed to open database {path}: {reason}")]
    Connection { path: PathBuf, reason: String },
}

/// 表结构错误
#[derive(Debug, Error)]
pub enum SchemaError {
    /// DDL execution failed
    #[error("DDL for {table_name} failed: {reason}")]
    DdlFailed { table_name: String, reason: String },

    /// Existing table has a different column list
    #[error("Table {table_name} has columns [{}], expected [{}]", found.join(", "), expected.join(", "))]
    IncompatibleColumns {
        table_name: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Database version marker differs from the configured one
    #[error("Schema version mismatch: database has {found}, expected {expected}")]
    VersionMismatch { expected: i32, found: i32 },
}

impl Error {
    /// 是否为参数错误
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::Database(DatabaseError::InvalidArgument { .. }))
    }

    /// 是否为只读错误
    pub fn is_read_only(&self) -> bool {
        matches!(self, Error::Database(DatabaseError::ReadOnly { .. }))
    }
}

/// 应用程序 Result 类型别名
pub type Result<T> = std::result::Result<T, Error>;

// 辅助宏，用于快速创建错误（字段支持简写）
#[macro_export]
macro_rules! config_error {
    ($variant:ident { $($field:ident $(: $value:expr)?),+ $(,)? }) => {
        $crate::error::Error::Config($crate::error::ConfigError::$variant {
            $($field $(: $value)?),+
        })
    };
}

#[macro_export]
macro_rules! file_error {
    ($variant:ident { $($field:ident $(: $value:expr)?),+ $(,)? }) => {
        $crate::error::Error::File($crate::error::FileError::$variant {
            $($field $(: $value)?),+
        })
    };
}

#[macro_export]
macro_rules! database_error {
    ($variant:ident { $($field:ident $(: $value:expr)?),+ $(,)? }) => {
        $crate::error::Error::Database($crate::error::DatabaseError::$variant {
            $($field $(: $value)?),+
        })
    };
}

#[macro_export]
macro_rules! schema_error {
    ($variant:ident { $($field:ident $(: $value:expr)?),+ $(,)? }) => {
        $crate::error::Error::Database($crate::error::DatabaseError::Schema(
            $crate::error::SchemaError::$variant {
                $($field $(: $value)?),+
            },
        ))
    };
}
