//! 公共常量与复用函数
//! 提供：
//! - 合法日志级别常量 LOG_LEVELS
//! - 日志表结构与 SQL 语句模板

/// 合法的日志级别（统一来源，按严重程度升序）
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "fatal"];

/// 默认数据库文件路径
pub const DEFAULT_DB_PATH: &str = "logs/sqlitelog.db";

/// 默认命名空间
pub const DEFAULT_NAMESPACE: &str = "app";

/// 连接忙等待超时（毫秒）
pub const BUSY_TIMEOUT_MS: u64 = 5_000;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// 日志表列名（按定义顺序）
pub const LOG_COLUMNS: &[&str] = &[
    "id",
    "caller_package",
    "caller_line",
    "message",
    "timestamp",
    "level",
    "context",
];

/// 由命名空间得到表名
pub fn table_name(namespace: &str) -> String {
    format!("{namespace}_log")
}

/// 生成 CREATE TABLE SQL 语句
pub fn create_table_sql(table_name: &str) -> String {
    format!(
        "CREATE TABLE {table_name} (id INTEGER PRIMARY KEY AUTOINCREMENT, caller_package, \
         caller_line, message, timestamp INTEGER NOT NULL, level, context);"
    )
}

/// 生成时间戳索引 SQL 语句
pub fn create_timestamp_index_sql(table_name: &str) -> String {
    format!("CREATE INDEX IF NOT EXISTS {table_name}_timestamp_idx ON {table_name} (timestamp);")
}

/// 生成 (level, caller_package) 组合索引 SQL 语句
pub fn create_level_index_sql(table_name: &str) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {table_name}_level_caller_package_idx \
         ON {table_name} (level, caller_package);"
    )
}

/// 生成 DROP TABLE SQL 语句
pub fn drop_table_sql(table_name: &str) -> String {
    format!("DROP TABLE IF EXISTS {table_name};")
}

/// 生成 INSERT SQL 语句
pub fn insert_sql(table_name: &str) -> String {
    format!(
        "INSERT INTO {table_name} (caller_package, caller_line, message, timestamp, level, context) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);"
    )
}

/// 生成全表删除 SQL 语句
pub fn delete_all_sql(table_name: &str) -> String {
    format!("DELETE FROM {table_name};")
}

/// 生成按时间删除 SQL 语句
pub fn delete_before_sql(table_name: &str) -> String {
    format!("DELETE FROM {table_name} WHERE timestamp < ?1;")
}

/// 生成查询 SQL 语句（按 id 升序）
pub fn select_all_sql(table_name: &str) -> String {
    format!(
        "SELECT id, caller_package, caller_line, message, timestamp, level, context \
         FROM {table_name} ORDER BY id ASC;"
    )
}

/// 生成查询最新 N 条记录的 SQL 语句（结果仍按 id 升序）
pub fn select_tail_sql(table_name: &str) -> String {
    format!(
        "SELECT id, caller_package, caller_line, message, timestamp, level, context FROM \
         (SELECT * FROM {table_name} ORDER BY id DESC LIMIT ?1) ORDER BY id ASC;"
    )
}

pub fn count_sql(table_name: &str) -> String {
    format!("SELECT COUNT(*) FROM {table_name};")
}
