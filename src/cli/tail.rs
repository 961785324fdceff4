use chrono::DateTime;

use super::opts::TailFormat;
use sqlitelog::config::Config;
use sqlitelog::error::Result;
use sqlitelog::logger::SqliteLogger;
use sqlitelog::record::LogRecord;

/// 打印最新的日志记录
pub fn handle_tail(cfg: &Config, lines: usize, format: TailFormat) -> Result<()> {
    let logger = SqliteLogger::open(&cfg.logger)?;
    for record in logger.tail(lines)? {
        println!("{}", render(&record, format));
    }
    Ok(())
}

fn render(record: &LogRecord, format: TailFormat) -> String {
    match format {
        TailFormat::Text => render_text(record),
        #[cfg(feature = "jsonl")]
        TailFormat::Jsonl => serde_json::to_string(record).unwrap_or_else(|_| render_text(record)),
    }
}

fn render_text(record: &LogRecord) -> String {
    let time = DateTime::from_timestamp(record.timestamp, 0).map_or_else(
        || record.timestamp.to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    let location = match (&record.caller_package, record.caller_line) {
        (Some(package), Some(line)) => format!("{package}:{line}"),
        (Some(package), None) => package.clone(),
        _ => "-".to_string(),
    };
    format!(
        "#{} {} [{}] {} pid={} - {}",
        record.id,
        time,
        record.level.as_deref().unwrap_or("-").to_uppercase(),
        location,
        record.context.as_deref().unwrap_or("-"),
        record.message.as_deref().unwrap_or_default()
    )
}
