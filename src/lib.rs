// Library entry point
pub mod config;
pub mod constants;
pub mod error;
pub mod level;
pub mod logger;
pub mod logging;
pub mod record;
pub mod schema;

pub use error::{Error, Result};
pub use level::{Severity, SeverityFilter};
pub use logger::SqliteLogger;
pub use record::{CallSite, Fragment, LogRecord};
