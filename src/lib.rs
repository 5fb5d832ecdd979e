#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! sqlquiz - An interactive SQL exercise runner
//!
//! sqlquiz poses a sequence of SQL problems to a learner, runs each submitted
//! query against a local SQLite database, and compares the rendered result
//! against a precomputed fingerprint. Solved problems are recorded in a plain
//! text answers file so progress survives between sessions.
//!
//! # Architecture
//!
//! - **[`database`]**: SQLite access
//!   - `core`: connection wrapper (`DatabaseConn`)
//!   - `gateway`: query execution, result rendering, table introspection
//!
//! - **[`quiz`]**: The exercise itself
//!   - `problem`: problem records and result fingerprints
//!   - `catalog`: the ordered problem bundle
//!   - `ledger`: solved answers and the answers file format
//!   - `builder`: offline problem bundle generation
//!   - `controller`: the interactive session loop
//!   - `view`: all learner-facing text
//!
//! - **[`config`]**: Configuration management
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sqlquiz::{Catalog, LedgerStore, QueryGateway, QuizConfig, QuizController, ScriptedInput};
//!
//! let config = QuizConfig::new(&None)?;
//! let gateway = QueryGateway::connect(&config.database_path, config.row_limit)?;
//! let catalog = Catalog::load(&config.problems_path)?;
//! let store = LedgerStore::new(&config.answers_path);
//! let ledger = store.load()?;
//!
//! let input = ScriptedInput::new([".tables", "SELECT * FROM melons;", ".quit"]);
//! let mut quiz = QuizController::new(gateway, catalog, ledger, store, input, std::io::stdout());
//! quiz.run()?;
//! ```

pub mod config;
pub mod database;
pub mod quiz;

// =============================================================================
// Configuration
// =============================================================================

pub use config::QuizConfig;

// =============================================================================
// Database
// =============================================================================

pub use database::{DatabaseConn, QueryGateway, QueryOutcome, RenderedTable, SchemaLookup};

// =============================================================================
// Quiz
// =============================================================================

pub use quiz::{
    fingerprint, Catalog, Command, ContentBuilder, Ledger, LedgerStore, LineSource, Problem,
    ProblemDefinition, QuizController, RejectedRecord, ScriptedInput, SolvedAnswer, Step,
};
