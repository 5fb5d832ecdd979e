//! Quiz module
//!
//! ```text
//! quiz/
//! ├── problem     # Problem records and result fingerprints
//! ├── catalog     # Ordered problem bundle (JSON)
//! ├── ledger      # Solved answers and the answers file format
//! ├── builder     # Offline bundle generation from solution queries
//! ├── controller  # Interactive session state machine
//! └── view        # Learner-facing text
//! ```

pub mod builder;
pub mod catalog;
pub mod controller;
pub mod ledger;
pub mod problem;
pub mod view;

pub use builder::{ContentBuilder, ProblemDefinition};
pub use catalog::Catalog;
pub use controller::{Command, LineSource, QuizController, ScriptedInput, Step};
pub use ledger::{Ledger, LedgerStore, RejectedRecord, SolvedAnswer};
pub use problem::{fingerprint, Problem};
