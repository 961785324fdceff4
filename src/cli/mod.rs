pub mod clear;
pub mod init;
pub mod opts;
pub mod schema;
pub mod tail;
pub mod validate;
pub mod write;
