//! 日志记录、调用位置与消息片段

use rusqlite::types::ValueRef;
use serde::Serialize;
use std::borrow::Cow;
use std::panic::Location;

/// 日志表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub id: i64,
    pub caller_package: Option<String>,
    pub caller_line: Option<i64>,
    pub message: Option<String>,
    pub timestamp: i64,
    pub level: Option<String>,
    pub context: Option<String>,
}

impl LogRecord {
    /// 从查询行构造记录
    ///
    /// 除 `id` 与 `timestamp` 外的列没有声明类型，宿主工具可能写入任意存储类：
    /// 文本列统一转成字符串，`caller_line` 接受整数、整数值的实数或可解析的文本。
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            caller_package: text_column(row.get_ref(1)?),
            caller_line: line_column(row.get_ref(2)?),
            message: text_column(row.get_ref(3)?),
            timestamp: row.get(4)?,
            level: text_column(row.get_ref(5)?),
            context: text_column(row.get_ref(6)?),
        })
    }
}

fn text_column(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn line_column(value: ValueRef<'_>) -> Option<i64> {
    match value {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Some(f as i64),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok()?.trim().parse().ok(),
        _ => None,
    }
}

/// 调用位置
///
/// 由调用方显式捕获：便捷方法带 `#[track_caller]`，记录的总是应用代码的位置。
///
/// `package` 的取值取决于捕获方式，同一列里两种形式并存：
/// - [`CallSite::caller`]（以及 `SqliteLogger::info` 等便捷方法）写入源文件路径，如 `src/jobs/sync.rs`；
/// - [`call_site!`] 与 `log` 门面桥接写入模块路径，如 `my_app::jobs::sync`。
///
/// `Location` 只提供文件路径，无法可靠还原模块路径，需要模块路径时使用 `call_site!()`。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSite {
    pub package: Option<String>,
    pub line: Option<u32>,
}

impl CallSite {
    pub fn new(package: impl Into<String>, line: u32) -> Self {
        Self {
            package: Some(package.into()),
            line: Some(line),
        }
    }

    /// 调用者的源文件路径与行号（`package` 为文件路径而非模块路径）
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// 未知调用位置
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// 以 `module_path!()` 和 `line!()` 构造当前位置
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::record::CallSite::new(module_path!(), line!())
    };
}

/// 消息片段：文本或原始字节
#[derive(Debug, Clone)]
pub enum Fragment<'a> {
    Text(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
}

impl Fragment<'_> {
    /// 字节按 UTF-8 宽松解码，非法序列替换为 U+FFFD
    pub fn decode(&self) -> Cow<'_, str> {
        match self {
            Fragment::Text(text) => Cow::Borrowed(text.as_ref()),
            Fragment::Bytes(bytes) => String::from_utf8_lossy(bytes),
        }
    }
}

impl<'a> From<&'a str> for Fragment<'a> {
    fn from(value: &'a str) -> Self {
        Fragment::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Fragment<'a> {
    fn from(value: &'a String) -> Self {
        Fragment::Text(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for Fragment<'_> {
    fn from(value: String) -> Self {
        Fragment::Text(Cow::Owned(value))
    }
}

impl<'a> From<&'a [u8]> for Fragment<'a> {
    fn from(value: &'a [u8]) -> Self {
        Fragment::Bytes(Cow::Borrowed(value))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Fragment<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Fragment::Bytes(Cow::Borrowed(value.as_slice()))
    }
}

impl From<Vec<u8>> for Fragment<'_> {
    fn from(value: Vec<u8>) -> Self {
        Fragment::Bytes(Cow::Owned(value))
    }
}

/// 用换行符拼接所有片段
pub fn join_fragments<'a, I, F>(fragments: I) -> String
where
    I: IntoIterator<Item = F>,
    F: Into<Fragment<'a>>,
{
    let mut message = String::new();
    for (idx, fragment) in fragments.into_iter().enumerate() {
        if idx > 0 {
            message.push('\n');
        }
        let fragment: Fragment<'a> = fragment.into();
        message.push_str(&fragment.decode());
    }
    message
}
