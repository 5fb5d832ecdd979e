//! Core database infrastructure
//!
//! - `DatabaseConn`: Core SQLite connection wrapper with configuration

mod connection;

pub use connection::DatabaseConn;
