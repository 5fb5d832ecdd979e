//! Problem catalog
//!
//! The catalog is read once per session from a JSON bundle and never changes
//! afterwards. Problems are kept in ascending number order.

use anyhow::{anyhow, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::quiz::ledger::Ledger;
use crate::quiz::problem::Problem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    problems: Vec<Problem>,
}

impl Catalog {
    /// Build a catalog, sorting by number and rejecting zero or duplicate numbers
    pub fn new(mut problems: Vec<Problem>) -> Result<Self> {
        let mut seen = HashSet::new();
        for problem in &problems {
            if problem.number == 0 {
                return Err(anyhow!("Problem numbers must start at 1"));
            }
            if !seen.insert(problem.number) {
                return Err(anyhow!("Duplicate problem number {}", problem.number));
            }
        }
        problems.sort_by_key(|p| p.number);
        Ok(Catalog { problems })
    }

    /// Load the problem bundle
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow!(
                "Failed to read problem bundle '{}': {}",
                path.display(),
                e
            )
        })?;
        let problems: Vec<Problem> = serde_json::from_str(&content).map_err(|e| {
            anyhow!(
                "Failed to parse problem bundle '{}': {}",
                path.display(),
                e
            )
        })?;

        let catalog = Self::new(problems)?;
        info!("Loaded {} problems from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Write the bundle as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.problems)
            .map_err(|e| anyhow!("Failed to serialize problems: {}", e))?;
        fs::write(path, json).map_err(|e| {
            anyhow!(
                "Failed to write problem bundle '{}': {}",
                path.display(),
                e
            )
        })?;
        info!("Saved {} problems to {}", self.len(), path.display());
        Ok(())
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn get(&self, number: u32) -> Option<&Problem> {
        self.problems.iter().find(|p| p.number == number)
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// True when every problem in the catalog has a ledger entry
    ///
    /// Ledger entries for numbers outside the catalog do not count.
    pub fn is_complete(&self, ledger: &Ledger) -> bool {
        self.problems.iter().all(|p| ledger.contains(p.number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::ledger::SolvedAnswer;

    fn problem(number: u32) -> Problem {
        Problem {
            number,
            instruction: format!("Instruction {}", number),
            task: format!("Task {}", number),
            hint: format!("Hint {}", number),
            expected_fingerprint: crate::quiz::fingerprint(&number.to_string()),
        }
    }

    #[test]
    fn test_new_sorts_by_number() {
        let catalog = Catalog::new(vec![problem(3), problem(1), problem(2)]).unwrap();
        let numbers: Vec<u32> = catalog.problems().iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(catalog.get(2).unwrap().task, "Task 2");
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn test_new_rejects_bad_numbers() {
        assert!(Catalog::new(vec![problem(1), problem(1)]).is_err());
        assert!(Catalog::new(vec![problem(0)]).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problem_set.json");

        let catalog = Catalog::new(vec![problem(1), problem(2)]).unwrap();
        catalog.save(&path).unwrap();

        let loaded = Catalog::load(&path).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_load_missing_or_invalid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Catalog::load(dir.path().join("nope.json")).is_err());

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Catalog::load(&path).is_err());
    }

    #[test]
    fn test_is_complete() {
        let catalog = Catalog::new(vec![problem(1), problem(2)]).unwrap();
        let mut ledger = Ledger::new();
        assert!(!catalog.is_complete(&ledger));

        ledger.insert(SolvedAnswer::new(1, "Task 1", "SELECT 1"));
        ledger.insert(SolvedAnswer::new(7, "Task 7", "SELECT 7"));
        assert!(!catalog.is_complete(&ledger));

        ledger.insert(SolvedAnswer::new(2, "Task 2", "SELECT 2"));
        assert!(catalog.is_complete(&ledger));
    }
}
