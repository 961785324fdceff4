//! SQLite 日志器：写入、保留清理与查询
//!
//! 每个日志器持有一个连接，所有操作在调用线程上同步执行，
//! 失败直接返回给调用方，不重试、不缓冲。

use crate::config::LoggerConfig;
use crate::constants::{
    BUSY_TIMEOUT_MS, SECONDS_PER_DAY, count_sql, delete_all_sql, delete_before_sql, insert_sql,
    select_all_sql, select_tail_sql, table_name,
};
use crate::database_error;
use crate::error::Result;
use crate::level::{Severity, SeverityFilter};
use crate::record::{CallSite, Fragment, LogRecord, join_fragments};
use crate::schema::{check_schema_version, drop_schema, ensure_schema, schema_definition};
use chrono::Utc;
use log::{debug, info, warn};
use rusqlite::{Connection, OpenFlags, params};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MEMORY_PATH: &str = ":memory:";

/// 基于 SQLite 的日志器
#[derive(Debug)]
pub struct SqliteLogger {
    conn: Option<Connection>,
    path: PathBuf,
    namespace: String,
    table_name: String,
    filter: SeverityFilter,
    ephemeral: bool,
    readonly: bool,
}

impl SqliteLogger {
    /// 按配置打开日志器，级别过滤器取自 `minimum_level`
    pub fn open(config: &LoggerConfig) -> Result<Self> {
        let filter = config.filter()?;
        Self::open_with_filter(config, filter)
    }

    /// 按配置打开日志器，使用调用方提供的级别过滤器
    pub fn open_with_filter(config: &LoggerConfig, filter: SeverityFilter) -> Result<Self> {
        config.validate()?;

        let path = config.path().to_path_buf();
        let mut conn = open_connection(&path, config.readonly)?;

        if let Some(version) = config.schema_version {
            check_schema_version(&conn, version, !config.readonly)?;
        }

        if !config.readonly {
            ensure_schema(&mut conn, config.namespace())?;
        }

        let logger = Self {
            conn: Some(conn),
            path,
            namespace: config.namespace().to_string(),
            table_name: table_name(config.namespace()),
            filter,
            ephemeral: config.ephemeral,
            readonly: config.readonly,
        };

        if let Some(dir) = &config.generated_code_cache_dir {
            logger.write_statement_cache(Path::new(dir));
        }

        info!(
            "SQLite logger opened: path={}, table={}, minimum_level={}, readonly={}, ephemeral={}",
            logger.path.display(),
            logger.table_name,
            logger.filter.minimum(),
            logger.readonly,
            logger.ephemeral
        );

        Ok(logger)
    }

    /// 打开内存数据库，关闭后不留痕迹
    pub fn in_memory(namespace: &str, filter: SeverityFilter) -> Result<Self> {
        let config = LoggerConfig {
            path: MEMORY_PATH.to_string(),
            namespace: namespace.to_string(),
            ..LoggerConfig::default()
        };
        Self::open_with_filter(&config, filter)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn filter(&self) -> SeverityFilter {
        self.filter
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// 本日志器命名空间的 DDL
    pub fn schema_definition(&self) -> Result<String> {
        schema_definition(&self.namespace)
    }

    /// 底层连接，供宿主程序直接查询
    pub fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or_else(|| {
            database_error!(Connection {
                path: self.path.clone(),
                reason: "Connection already closed".to_string(),
            })
        })
    }

    /// 以给定级别写入一条日志，调用位置取自调用者
    ///
    /// `caller_package` 记录调用者的源文件路径；需要模块路径时改用
    /// `log_at(level, call_site!(), ...)`。
    #[track_caller]
    pub fn log<'a, I, F>(&self, level: Severity, fragments: I) -> Result<&Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment<'a>>,
    {
        self.log_at(level, CallSite::caller(), fragments)
    }

    /// 级别以字符串给出，先转小写再解析
    #[track_caller]
    pub fn log_str<'a, I, F>(&self, level: &str, fragments: I) -> Result<&Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment<'a>>,
    {
        let level = Severity::parse(&level.to_lowercase())?;
        self.log_at(level, CallSite::caller(), fragments)
    }

    /// 使用显式调用位置写入一条日志
    ///
    /// 低于最低级别的调用直接返回，不产生任何副作用。
    pub fn log_at<'a, I, F>(&self, level: Severity, call_site: CallSite, fragments: I) -> Result<&Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment<'a>>,
    {
        // No `log` macros on this path: the logger may itself be the global sink.
        self.ensure_writable("log")?;
        if !self.filter.accepts(level) {
            return Ok(self);
        }

        let message = join_fragments(fragments);
        let timestamp = Utc::now().timestamp();
        let context = std::process::id().to_string();

        let conn = self.connection()?;
        let mut stmt = conn
            .prepare_cached(&insert_sql(&self.table_name))
            .map_err(|e| self.write_error("prepare insert", &e))?;
        stmt.execute(params![
            call_site.package,
            call_site.line,
            message,
            timestamp,
            level.as_str(),
            context
        ])
        .map_err(|e| self.write_error("insert", &e))?;

        Ok(self)
    }

    #[track_caller]
    pub fn trace<'a, I, F>(&self, fragments: I) -> Result<&Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment<'a>>,
    {
        self.log_at(Severity::Trace, CallSite::caller(), fragments)
    }

    #[track_caller]
    pub fn debug<'a, I, F>(&self, fragments: I) -> Result<&Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment<'a>>,
    {
        self.log_at(Severity::Debug, CallSite::caller(), fragments)
    }

    #[track_caller]
    pub fn info<'a, I, F>(&self, fragments: I) -> Result<&Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment<'a>>,
    {
        self.log_at(Severity::Info, CallSite::caller(), fragments)
    }

    #[track_caller]
    pub fn warn<'a, I, F>(&self, fragments: I) -> Result<&Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment<'a>>,
    {
        self.log_at(Severity::Warn, CallSite::caller(), fragments)
    }

    #[track_caller]
    pub fn error<'a, I, F>(&self, fragments: I) -> Result<&Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment<'a>>,
    {
        self.log_at(Severity::Error, CallSite::caller(), fragments)
    }

    #[track_caller]
    pub fn fatal<'a, I, F>(&self, fragments: I) -> Result<&Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment<'a>>,
    {
        self.log_at(Severity::Fatal, CallSite::caller(), fragments)
    }

    /// 删除早于 `num_days` 天的记录；`0` 清空整张表
    pub fn clear(&self, num_days: i64) -> Result<&Self> {
        let threshold_secs = validate_days(num_days)?;
        self.ensure_writable("clear")?;

        let conn = self.connection()?;
        let removed = if num_days == 0 {
            conn.execute(&delete_all_sql(&self.table_name), [])
        } else {
            let threshold = Utc::now().timestamp() - threshold_secs;
            conn.execute(&delete_before_sql(&self.table_name), [threshold])
        }
        .map_err(|e| self.write_error("delete", &e))?;

        debug!(
            "Cleared {removed} record(s) from {} (num_days={num_days})",
            self.table_name
        );
        Ok(self)
    }

    /// 解析文本形式的天数后调用 [`SqliteLogger::clear`]
    ///
    /// 非数字、小数、负数均在访问数据库之前被拒绝。
    pub fn clear_str(&self, num_days: &str) -> Result<&Self> {
        let days = num_days.trim().parse::<i64>().map_err(|_| {
            database_error!(InvalidArgument {
                name: "num_days".to_string(),
                value: num_days.to_string(),
                reason: "must be a non-negative integer".to_string(),
            })
        })?;
        self.clear(days)
    }

    /// 删除日志表并 VACUUM（仅限临时存储）
    pub fn prune(&self) -> Result<()> {
        if !self.ephemeral {
            return Err(database_error!(InvalidArgument {
                name: "ephemeral".to_string(),
                value: "false".to_string(),
                reason: "prune is only allowed on ephemeral storage".to_string(),
            }));
        }
        self.ensure_writable("prune")?;

        let conn = self.connection()?;
        drop_schema(conn, &self.namespace)?;
        conn.execute_batch("VACUUM;")
            .map_err(|e| self.write_error("vacuum", &e))?;
        info!("Pruned log storage: {}", self.path.display());
        Ok(())
    }

    /// 全部记录，按 id 升序
    pub fn records(&self) -> Result<Vec<LogRecord>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare_cached(&select_all_sql(&self.table_name))
            .map_err(|e| self.read_error(&e))?;
        stmt.query_map([], LogRecord::from_row)
            .map_err(|e| self.read_error(&e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| self.read_error(&e))
    }

    /// 最新的 `limit` 条记录，按 id 升序
    pub fn tail(&self, limit: usize) -> Result<Vec<LogRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare_cached(&select_tail_sql(&self.table_name))
            .map_err(|e| self.read_error(&e))?;
        stmt.query_map([limit], LogRecord::from_row)
            .map_err(|e| self.read_error(&e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| self.read_error(&e))
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.connection()?;
        let count: i64 = conn
            .query_row(&count_sql(&self.table_name), [], |row| row.get(0))
            .map_err(|e| self.read_error(&e))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// 显式关闭连接，返回关闭错误
    pub fn close(mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| {
                database_error!(Connection {
                    path: self.path.clone(),
                    reason: format!("Failed to close: {e}"),
                })
            })?;
        }
        Ok(())
    }

    fn ensure_writable(&self, operation: &str) -> Result<()> {
        if self.readonly {
            return Err(database_error!(ReadOnly {
                path: self.path.clone(),
                operation: operation.to_string(),
            }));
        }
        Ok(())
    }

    fn write_error(&self, action: &str, e: &rusqlite::Error) -> crate::error::Error {
        database_error!(Write {
            table_name: self.table_name.clone(),
            reason: format!("{action}: {e}"),
        })
    }

    fn read_error(&self, e: &rusqlite::Error) -> crate::error::Error {
        database_error!(Read {
            table_name: self.table_name.clone(),
            reason: e.to_string(),
        })
    }

    /// 把 DDL 与语句集写入缓存目录；失败只记警告
    fn write_statement_cache(&self, dir: &Path) {
        let Ok(ddl) = self.schema_definition() else {
            return;
        };
        let content = format!(
            "{ddl}{}\n{}\n{}\n{}\n{}\n{}\n",
            insert_sql(&self.table_name),
            delete_all_sql(&self.table_name),
            delete_before_sql(&self.table_name),
            select_all_sql(&self.table_name),
            select_tail_sql(&self.table_name),
            count_sql(&self.table_name),
        );
        let file = dir.join(format!("{}.sql", self.namespace));

        if fs::read_to_string(&file).is_ok_and(|existing| existing == content) {
            debug!("Statement cache up to date: {}", file.display());
            return;
        }
        let result = fs::create_dir_all(dir).and_then(|()| fs::write(&file, &content));
        match result {
            Ok(()) => debug!("Statement cache written: {}", file.display()),
            Err(e) => warn!("Failed to write statement cache {}: {e}", file.display()),
        }
    }

    fn remove_backing_files(&self) {
        if is_memory_path(&self.path) {
            return;
        }
        let base = self.path.as_os_str().to_owned();
        let mut targets = vec![self.path.clone()];
        for suffix in ["-journal", "-wal", "-shm"] {
            let mut sibling = base.clone();
            sibling.push(suffix);
            targets.push(PathBuf::from(sibling));
        }
        for target in targets.iter().filter(|p| p.exists()) {
            if let Err(e) = fs::remove_file(target) {
                warn!("Failed to remove ephemeral file {}: {e}", target.display());
            }
        }
        debug!("Removed ephemeral log storage: {}", self.path.display());
    }
}

impl Drop for SqliteLogger {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take()
            && let Err((_, e)) = conn.close()
        {
            warn!("Failed to close SQLite logger {}: {e}", self.path.display());
        }
        if self.ephemeral {
            self.remove_backing_files();
        }
    }
}

/// 校验天数并换算为秒
fn validate_days(num_days: i64) -> Result<i64> {
    if num_days < 0 {
        return Err(database_error!(InvalidArgument {
            name: "num_days".to_string(),
            value: num_days.to_string(),
            reason: "must be a non-negative integer".to_string(),
        }));
    }
    num_days.checked_mul(SECONDS_PER_DAY).ok_or_else(|| {
        database_error!(InvalidArgument {
            name: "num_days".to_string(),
            value: num_days.to_string(),
            reason: "too large".to_string(),
        })
    })
}

fn is_memory_path(path: &Path) -> bool {
    path.as_os_str() == MEMORY_PATH
}

fn open_connection(path: &Path, readonly: bool) -> Result<Connection> {
    let connection_error = |reason: String| {
        database_error!(Connection {
            path: path.to_path_buf(),
            reason,
        })
    };

    let conn = if readonly {
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    } else {
        if !is_memory_path(path)
            && let Some(parent) = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty() && !p.exists())
        {
            fs::create_dir_all(parent).map_err(|e| {
                connection_error(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        Connection::open(path)
    }
    .map_err(|e| connection_error(e.to_string()))?;

    conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))
        .map_err(|e| connection_error(format!("Failed to set busy timeout: {e}")))?;

    Ok(conn)
}
