//! Database module
//!
//! This module provides all database functionality for sqlquiz, organized into:
//!
//! - **core**: SQLite connection wrapper
//! - **gateway**: query execution and introspection on behalf of the learner
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/           # Foundation
//! │   └── connection  # SQLite DatabaseConn wrapper
//! │
//! └── gateway         # Learner queries, rendered tables, .tables/.schema
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use sqlquiz::database::{QueryGateway, QueryOutcome};
//!
//! let gateway = QueryGateway::connect("database.db", 20)?;
//! match gateway.execute("SELECT name FROM melons") {
//!     QueryOutcome::Rows(table) => println!("{}", table),
//!     QueryOutcome::Failed { message } => eprintln!("{}", message),
//! }
//! ```

pub mod core;
pub mod gateway;

pub use core::DatabaseConn;
pub use gateway::{QueryGateway, QueryOutcome, RenderedTable, SchemaLookup};
