//! 日志表结构管理
//!
//! 日志表可以与宿主程序的其它表共存于同一个数据库文件。
//! `ensure_schema` 只在表不存在时建表，索引使用 `IF NOT EXISTS`。

use crate::constants::{
    LOG_COLUMNS, create_level_index_sql, create_table_sql, create_timestamp_index_sql,
    drop_table_sql, table_name,
};
use crate::error::Result;
use crate::{database_error, schema_error};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};

/// 校验命名空间是否为合法的 SQL 标识符
///
/// 命名空间与表名一样不区分大小写：只差大小写的两个命名空间共用一张表。
pub fn validate_namespace(namespace: &str) -> Result<()> {
    let mut chars = namespace.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(database_error!(InvalidArgument {
            name: "namespace".to_string(),
            value: namespace.to_string(),
            reason: "must match [A-Za-z_][A-Za-z0-9_]*".to_string(),
        }))
    }
}

/// 完整 DDL（建表 + 两个索引），供宿主程序预先建表
pub fn schema_definition(namespace: &str) -> Result<String> {
    validate_namespace(namespace)?;
    let table = table_name(namespace);
    Ok(format!(
        "{}\n{}\n{}\n",
        create_table_sql(&table),
        create_timestamp_index_sql(&table),
        create_level_index_sql(&table)
    ))
}

/// 表是否存在
///
/// SQLite 表名不区分大小写，`APP` 与 `app` 指向同一张 `app_log`。
pub fn table_exists(conn: &Connection, namespace: &str) -> Result<bool> {
    let table = table_name(namespace);
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            [&table],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| {
            schema_error!(DdlFailed {
                table_name: table.clone(),
                reason: format!("Failed to inspect sqlite_master: {e}"),
            })
        })?;
    Ok(found.is_some())
}

/// 读取表的列名（按定义顺序）
pub fn table_columns(conn: &Connection, namespace: &str) -> Result<Vec<String>> {
    validate_namespace(namespace)?;
    let table = table_name(namespace);
    let ddl_error = |e: rusqlite::Error| {
        schema_error!(DdlFailed {
            table_name: table.clone(),
            reason: format!("Failed to read table_info: {e}"),
        })
    };

    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .map_err(ddl_error)?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(ddl_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(ddl_error)?;
    Ok(columns)
}

/// 确保日志表及索引存在（幂等）
pub fn ensure_schema(conn: &mut Connection, namespace: &str) -> Result<()> {
    validate_namespace(namespace)?;
    let table = table_name(namespace);
    let ddl_error = |e: rusqlite::Error| {
        schema_error!(DdlFailed {
            table_name: table.clone(),
            reason: e.to_string(),
        })
    };

    if table_exists(conn, namespace)? {
        let found = table_columns(conn, namespace)?;
        if found.iter().map(String::as_str).ne(LOG_COLUMNS.iter().copied()) {
            return Err(schema_error!(IncompatibleColumns {
                table_name: table.clone(),
                expected: LOG_COLUMNS.iter().map(ToString::to_string).collect(),
                found,
            }));
        }
        debug!("Log table {table} already exists");
    }

    let tx = conn.transaction().map_err(ddl_error)?;
    if !table_exists(&tx, namespace)? {
        tx.execute(&create_table_sql(&table), []).map_err(ddl_error)?;
        info!("Created log table: {table}");
    }
    tx.execute(&create_timestamp_index_sql(&table), [])
        .map_err(ddl_error)?;
    tx.execute(&create_level_index_sql(&table), [])
        .map_err(ddl_error)?;
    tx.commit().map_err(ddl_error)?;

    Ok(())
}

/// 删除日志表（索引随表删除）
pub fn drop_schema(conn: &Connection, namespace: &str) -> Result<()> {
    validate_namespace(namespace)?;
    let table = table_name(namespace);
    conn.execute(&drop_table_sql(&table), []).map_err(|e| {
        schema_error!(DdlFailed {
            table_name: table.clone(),
            reason: e.to_string(),
        })
    })?;
    info!("Dropped log table: {table}");
    Ok(())
}

/// 校验或写入 `PRAGMA user_version`
///
/// 数据库版本为 0 时写入期望版本；其它不一致的值视为不匹配。
pub fn check_schema_version(conn: &Connection, expected: i32, writable: bool) -> Result<()> {
    let version_error = |e: rusqlite::Error| {
        schema_error!(DdlFailed {
            table_name: "user_version".to_string(),
            reason: e.to_string(),
        })
    };

    let found: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(version_error)?;

    if found == expected {
        return Ok(());
    }
    if found == 0 && writable {
        conn.pragma_update(None, "user_version", expected)
            .map_err(version_error)?;
        debug!("Stamped schema version {expected}");
        return Ok(());
    }
    Err(schema_error!(VersionMismatch { expected, found }))
}
