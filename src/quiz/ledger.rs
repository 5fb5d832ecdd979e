//! Progress ledger
//!
//! Solved problems are recorded in a plain text answers file so learners can
//! read back what they wrote. The format separates records with
//! [`RECORD_SEPARATOR`] and the three fields of a record (number, task,
//! solution) with [`FIELD_SEPARATOR`]:
//!
//! ```text
//! 1
//!
//! -----
//!
//! List all melons.
//!
//! -----
//!
//! SELECT * FROM melons;
//!
//!
//! ==========
//! 2
//! ...
//! ```
//!
//! The pieces are kept apart: [`Ledger`] is a plain in-memory map,
//! [`serialize_ledger`] / [`parse_ledger`] are the codec, and [`LedgerStore`]
//! owns the file.

use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Separator between records in the answers file
pub const RECORD_SEPARATOR: &str = "\n\n\n==========\n";

/// Separator between fields of one record
pub const FIELD_SEPARATOR: &str = "\n\n-----\n\n";

/// A problem the learner solved, with the accepted query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedAnswer {
    pub number: u32,
    /// Copy of the problem task, for reading the answers file
    pub task: String,
    pub solution: String,
}

impl SolvedAnswer {
    pub fn new(number: u32, task: impl Into<String>, solution: impl Into<String>) -> Self {
        SolvedAnswer {
            number,
            task: task.into(),
            solution: solution.into(),
        }
    }

    fn to_record(&self) -> String {
        let number = self.number.to_string();
        [number.as_str(), self.task.as_str(), self.solution.as_str()].join(FIELD_SEPARATOR)
    }

    fn from_record(record: &str) -> Result<Self> {
        let fields: Vec<&str> = record.split(FIELD_SEPARATOR).collect();
        let [number, task, solution] = fields.as_slice() else {
            return Err(anyhow!("expected 3 fields, found {}", fields.len()));
        };
        let number = number
            .trim()
            .parse::<u32>()
            .map_err(|e| anyhow!("invalid problem number '{}': {}", number.trim(), e))?;
        Ok(SolvedAnswer::new(number, *task, *solution))
    }
}

/// Solved answers keyed by problem number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    answers: BTreeMap<u32, SolvedAnswer>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an answer, replacing any earlier answer for the same problem
    pub fn insert(&mut self, answer: SolvedAnswer) -> Option<SolvedAnswer> {
        self.answers.insert(answer.number, answer)
    }

    pub fn get(&self, number: u32) -> Option<&SolvedAnswer> {
        self.answers.get(&number)
    }

    pub fn contains(&self, number: u32) -> bool {
        self.answers.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Answers in ascending problem number order
    pub fn iter(&self) -> impl Iterator<Item = &SolvedAnswer> {
        self.answers.values()
    }
}

/// A record that could not be parsed and was left out of the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// 1-based position of the record in the file
    pub position: usize,
    pub reason: String,
}

/// Serialize a ledger in ascending number order
pub fn serialize_ledger(ledger: &Ledger) -> String {
    ledger
        .iter()
        .map(SolvedAnswer::to_record)
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR)
}

/// Parse an answers file
///
/// Empty chunks are ignored. Records with the wrong number of fields or a
/// non-numeric problem number are returned as rejected instead of failing
/// the whole load. A later record for the same number replaces an earlier one.
pub fn parse_ledger(content: &str) -> (Ledger, Vec<RejectedRecord>) {
    let mut ledger = Ledger::new();
    let mut rejected = Vec::new();

    for (idx, record) in content.split(RECORD_SEPARATOR).enumerate() {
        if record.is_empty() {
            continue;
        }
        match SolvedAnswer::from_record(record) {
            Ok(answer) => {
                ledger.insert(answer);
            }
            Err(e) => rejected.push(RejectedRecord {
                position: idx + 1,
                reason: e.to_string(),
            }),
        }
    }

    (ledger, rejected)
}

/// Reads and writes the answers file
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        LedgerStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger; a missing file is an empty ledger
    pub fn load(&self) -> Result<Ledger> {
        self.load_with_rejections().map(|(ledger, _)| ledger)
    }

    /// Load the ledger and report records that could not be parsed
    ///
    /// When any record is rejected the file is first copied to
    /// [`LedgerStore::backup_path`], since the next save rewrites the answers
    /// file without those records.
    pub fn load_with_rejections(&self) -> Result<(Ledger, Vec<RejectedRecord>)> {
        if !self.path.is_file() {
            return Ok((Ledger::new(), Vec::new()));
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            anyhow!(
                "Failed to read answers file '{}': {}",
                self.path.display(),
                e
            )
        })?;

        let (ledger, rejected) = parse_ledger(&content);
        if !rejected.is_empty() {
            let backup = self.backup_path();
            fs::copy(&self.path, &backup).map_err(|e| {
                anyhow!(
                    "Failed to back up answers file to '{}': {}",
                    backup.display(),
                    e
                )
            })?;
            for record in &rejected {
                warn!(
                    "Skipping malformed record #{} in {}: {}",
                    record.position,
                    self.path.display(),
                    record.reason
                );
            }
        }

        info!("Read {} answers", ledger.len());
        Ok((ledger, rejected))
    }

    /// Copy of the answers file kept when malformed records are found
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Rewrite the whole answers file
    ///
    /// The content goes to a temporary file in the same directory which then
    /// replaces the answers file, so a failed write leaves the old file intact.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| anyhow!("Failed to create temporary answers file: {}", e))?;
        tmp.write_all(serialize_ledger(ledger).as_bytes())
            .map_err(|e| anyhow!("Failed to write answers: {}", e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| anyhow!("Failed to flush answers: {}", e))?;
        tmp.persist(&self.path).map_err(|e| {
            anyhow!(
                "Failed to replace answers file '{}': {}",
                self.path.display(),
                e.error
            )
        })?;

        info!("Saved {} answers", ledger.len());
        Ok(())
    }

    /// Record a solved problem and persist the full ledger
    pub fn mark_solved(
        &self,
        ledger: &mut Ledger,
        number: u32,
        task: &str,
        solution: &str,
    ) -> Result<()> {
        ledger.insert(SolvedAnswer::new(number, task, solution));
        self.save(ledger)
    }
}
