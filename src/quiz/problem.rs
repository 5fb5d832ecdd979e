//! Problem records and result fingerprints

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::database::RenderedTable;

/// A single exercise as shipped in the problem bundle
///
/// The solution query itself is not part of the record; only the
/// fingerprint of its rendered result is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub number: u32,
    pub instruction: String,
    pub task: String,
    pub hint: String,
    pub expected_fingerprint: String,
}

impl Problem {
    /// Check whether a rendered result matches this problem's solution
    pub fn is_solved_by(&self, result: &RenderedTable) -> bool {
        fingerprint(result.as_str()) == self.expected_fingerprint
    }
}

/// SHA-256 hex digest of a rendered table
pub fn fingerprint(rendered: &str) -> String {
    format!("{:x}", Sha256::digest(rendered.as_bytes()))
}
