/// SqliteLogger 集成测试（文件型数据库）
use sqlitelog::config::LoggerConfig;
use sqlitelog::constants::LOG_COLUMNS;
use sqlitelog::error::{DatabaseError, Error, SchemaError};
use sqlitelog::schema::{schema_definition, table_columns};
use sqlitelog::{CallSite, Severity, SeverityFilter, SqliteLogger};
use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

fn config_in(dir: &TempDir, file: &str) -> LoggerConfig {
    LoggerConfig::with_path(dir.path().join(file).to_str().unwrap())
}

fn messages(logger: &SqliteLogger) -> Vec<String> {
    logger
        .records()
        .unwrap()
        .into_iter()
        .filter_map(|r| r.message)
        .collect()
}

// ==================== Writer ====================

#[test]
fn test_minimum_level_warn_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir, "app.db");
    config.minimum_level = "warn".to_string();
    let logger = SqliteLogger::open(&config).unwrap();

    logger.log_str("info", ["x"]).unwrap();
    assert_eq!(logger.count().unwrap(), 0);

    logger.log_str("warn", ["y"]).unwrap();
    let records = logger.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level.as_deref(), Some("warn"));
    assert_eq!(records[0].message.as_deref(), Some("y"));
}

#[test]
fn test_two_errors_keep_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let logger = SqliteLogger::open(&config_in(&dir, "app.db")).unwrap();

    logger.error(["a"]).unwrap().error(["b"]).unwrap();

    let records = logger.records().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].id < records[1].id);
    assert_eq!(messages(&logger), vec!["a", "b"]);
}

#[test]
fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "app.db");
    {
        let logger = SqliteLogger::open(&config).unwrap();
        logger.info(["persisted"]).unwrap();
        logger.close().unwrap();
    }
    let logger = SqliteLogger::open(&config).unwrap();
    assert_eq!(messages(&logger), vec!["persisted"]);
}

#[test]
fn test_injected_filter_overrides_config_level() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "app.db");
    let logger =
        SqliteLogger::open_with_filter(&config, SeverityFilter::new(Severity::Fatal)).unwrap();

    logger.error(["dropped"]).unwrap();
    logger.fatal(["kept"]).unwrap();
    assert_eq!(messages(&logger), vec!["kept"]);
}

#[test]
fn test_call_site_points_at_test_code() {
    let dir = tempfile::tempdir().unwrap();
    let logger = SqliteLogger::open(&config_in(&dir, "app.db")).unwrap();

    logger.warn(["here"]).unwrap();
    let line = line!() - 1;
    logger
        .log_at(Severity::Warn, sqlitelog::call_site!(), ["macro"])
        .unwrap();
    logger
        .log_at(Severity::Warn, CallSite::new("svc", 7), ["explicit"])
        .unwrap();

    let records = logger.records().unwrap();
    assert_eq!(records[0].caller_package.as_deref(), Some(file!()));
    assert_eq!(records[0].caller_line, Some(i64::from(line)));
    assert_eq!(records[1].caller_package.as_deref(), Some(module_path!()));
    assert_eq!(records[2].caller_package.as_deref(), Some("svc"));
    assert_eq!(records[2].caller_line, Some(7));
}

// ==================== Retention ====================

#[test]
fn test_clear_by_age_on_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let logger = SqliteLogger::open(&config_in(&dir, "app.db")).unwrap();
    let now = chrono::Utc::now().timestamp();
    let conn = logger.connection().unwrap();
    for (age_days, message) in [(30, "month"), (8, "week+"), (6, "week-"), (0, "now")] {
        conn.execute(
            "INSERT INTO app_log (message, timestamp, level) VALUES (?1, ?2, 'info')",
            rusqlite::params![message, now - age_days * 86_400],
        )
        .unwrap();
    }

    logger.clear(7).unwrap();
    assert_eq!(messages(&logger), vec!["week-", "now"]);

    logger.clear(7).unwrap();
    assert_eq!(messages(&logger), vec!["week-", "now"]);

    logger.clear(0).unwrap();
    assert_eq!(logger.count().unwrap(), 0);
}

#[test]
fn test_invalid_clear_leaves_table_unmodified() {
    let dir = tempfile::tempdir().unwrap();
    let logger = SqliteLogger::open(&config_in(&dir, "app.db")).unwrap();
    logger.info(["one"]).unwrap();

    for bad in ["-1", "abc", "1.5", ""] {
        let err = logger.clear_str(bad).unwrap_err();
        assert!(err.is_invalid_argument(), "{bad} should be rejected");
    }
    assert_eq!(logger.count().unwrap(), 1);
}

#[test]
fn test_ids_keep_increasing_after_truncation() {
    let dir = tempfile::tempdir().unwrap();
    let logger = SqliteLogger::open(&config_in(&dir, "app.db")).unwrap();
    logger.info(["first"]).unwrap();
    let first_id = logger.records().unwrap()[0].id;

    logger.clear(0).unwrap();
    logger.info(["second"]).unwrap();
    assert!(logger.records().unwrap()[0].id > first_id);
}

// ==================== Schema ====================

#[test]
fn test_schema_round_trip_on_fresh_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "fresh.db");
    let logger = SqliteLogger::open(&config).unwrap();

    let columns = table_columns(logger.connection().unwrap(), "app").unwrap();
    assert_eq!(columns, LOG_COLUMNS);
    assert_eq!(
        logger.schema_definition().unwrap(),
        schema_definition("app").unwrap()
    );
}

#[test]
fn test_shares_file_with_application_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "shared.db");
    {
        let conn = Connection::open(config.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE orders (id INTEGER PRIMARY KEY, total REAL);
             INSERT INTO orders (total) VALUES (9.5);",
        )
        .unwrap();
    }

    let logger = SqliteLogger::open(&config).unwrap();
    logger.info(["order placed"]).unwrap();

    let orders: i64 = logger
        .connection()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))
        .unwrap();
    assert_eq!(orders, 1);
}

#[test]
fn test_rows_written_by_host_tools_are_readable() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "host.db");
    let logger = SqliteLogger::open(&config).unwrap();
    logger.info(["own row"]).unwrap();

    {
        let conn = Connection::open(config.path()).unwrap();
        conn.execute(
            "INSERT INTO app_log (caller_package, caller_line, message, timestamp, level, context) \
             VALUES ('Foo::Bar', '42', 'host row', 1, 'info', 4242)",
            [],
        )
        .unwrap();
    }

    let records = logger.records().unwrap();
    assert_eq!(records.len(), 2);
    let host = &records[1];
    assert_eq!(host.caller_package.as_deref(), Some("Foo::Bar"));
    assert_eq!(host.caller_line, Some(42));
    assert_eq!(host.message.as_deref(), Some("host row"));
    assert_eq!(host.context.as_deref(), Some("4242"));

    let tail = logger.tail(5).unwrap();
    assert_eq!(tail, records);
}

#[test]
fn test_preprovisioned_table_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "pre.db");
    {
        let conn = Connection::open(config.path()).unwrap();
        conn.execute_batch(&schema_definition("app").unwrap()).unwrap();
    }
    let logger = SqliteLogger::open(&config).unwrap();
    logger.info(["ok"]).unwrap();
    assert_eq!(logger.count().unwrap(), 1);
}

#[test]
fn test_incompatible_table_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "clash.db");
    {
        let conn = Connection::open(config.path()).unwrap();
        conn.execute_batch("CREATE TABLE app_log (id INTEGER PRIMARY KEY, body TEXT);")
            .unwrap();
    }
    let err = SqliteLogger::open(&config).unwrap_err();
    assert!(matches!(
        err,
        Error::Database(DatabaseError::Schema(SchemaError::IncompatibleColumns { .. }))
    ));
}

#[test]
fn test_namespaces_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let mut billing = config_in(&dir, "multi.db");
    billing.namespace = "billing".to_string();
    let mut audit = config_in(&dir, "multi.db");
    audit.namespace = "audit".to_string();

    let billing_logger = SqliteLogger::open(&billing).unwrap();
    let audit_logger = SqliteLogger::open(&audit).unwrap();
    billing_logger.info(["invoice"]).unwrap();
    audit_logger.info(["login"]).unwrap();
    audit_logger.info(["logout"]).unwrap();
    billing_logger.clear(0).unwrap();

    assert_eq!(billing_logger.table_name(), "billing_log");
    assert_eq!(billing_logger.count().unwrap(), 0);
    assert_eq!(audit_logger.count().unwrap(), 2);
}

#[test]
fn test_namespace_case_variants_reopen_same_table() {
    let dir = tempfile::tempdir().unwrap();
    let lower = config_in(&dir, "case.db");
    let mut upper = config_in(&dir, "case.db");
    upper.namespace = "APP".to_string();

    {
        let logger = SqliteLogger::open(&lower).unwrap();
        logger.info(["from app"]).unwrap();
    }

    let logger = SqliteLogger::open(&upper).unwrap();
    logger.info(["from APP"]).unwrap();
    assert_eq!(messages(&logger), vec!["from app", "from APP"]);
}

#[test]
fn test_schema_version_mismatch_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir, "versioned.db");
    config.schema_version = Some(1);
    SqliteLogger::open(&config).unwrap().close().unwrap();

    config.schema_version = Some(2);
    let err = SqliteLogger::open(&config).unwrap_err();
    assert!(matches!(
        err,
        Error::Database(DatabaseError::Schema(SchemaError::VersionMismatch {
            expected: 2,
            found: 1
        }))
    ));
}

#[test]
fn test_statement_cache_written() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir, "cached.db");
    let cache = dir.path().join("cache");
    config.generated_code_cache_dir = Some(cache.to_str().unwrap().to_string());

    let logger = SqliteLogger::open(&config).unwrap();
    let content = std::fs::read_to_string(cache.join("app.sql")).unwrap();
    assert!(content.starts_with(&schema_definition("app").unwrap()));
    assert!(content.contains("INSERT INTO app_log"));
    logger.info(["still works"]).unwrap();
}

// ==================== Modes ====================

#[test]
fn test_readonly_logger_rejects_writes() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "ro.db");
    {
        let writer = SqliteLogger::open(&config).unwrap();
        writer.info(["written before"]).unwrap();
    }

    let mut readonly = config.clone();
    readonly.readonly = true;
    let reader = SqliteLogger::open(&readonly).unwrap();

    assert!(reader.info(["nope"]).unwrap_err().is_read_only());
    assert!(reader.trace(["filtered but still refused"]).unwrap_err().is_read_only());
    assert!(reader.clear(0).unwrap_err().is_read_only());
    assert_eq!(messages(&reader), vec!["written before"]);
}

#[test]
fn test_readonly_missing_file_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir, "missing.db");
    config.readonly = true;
    let err = SqliteLogger::open(&config).unwrap_err();
    assert!(matches!(
        err,
        Error::Database(DatabaseError::Connection { .. })
    ));
    assert!(!config.path().exists());
}

#[test]
fn test_missing_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "nested/deeper/app.db");
    let logger = SqliteLogger::open(&config).unwrap();
    logger.info(["hello"]).unwrap();
    assert!(config.path().exists());
}

#[test]
fn test_unopenable_path_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let config = LoggerConfig::with_path(blocker.join("app.db").to_str().unwrap());

    let err = SqliteLogger::open(&config).unwrap_err();
    assert!(matches!(
        err,
        Error::Database(DatabaseError::Connection { .. })
    ));
}

#[test]
fn test_ephemeral_file_removed_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir, "scratch.db");
    config.ephemeral = true;
    let path = config.path().to_path_buf();

    {
        let logger = SqliteLogger::open(&config).unwrap();
        logger.info(["temporary"]).unwrap();
        assert!(path.exists());
    }
    assert!(!path.exists());
}

#[test]
fn test_prune_drops_table_of_ephemeral_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir, "prune.db");
    config.ephemeral = true;

    let logger = SqliteLogger::open(&config).unwrap();
    logger.info(["gone soon"]).unwrap();
    logger.prune().unwrap();

    assert!(!sqlitelog::schema::table_exists(logger.connection().unwrap(), "app").unwrap());
    assert!(logger.count().is_err());
    logger.close().unwrap();
    assert!(!Path::new(&config.path).exists());
}
