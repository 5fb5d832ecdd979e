//! Offline problem bundle generation
//!
//! Authors write problems with their literal solution queries. The builder
//! runs each solution once, keeps only the fingerprint of its rendered result
//! and drops the query, so the shipped bundle does not give the answers away.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::database::{QueryGateway, QueryOutcome};
use crate::quiz::catalog::Catalog;
use crate::quiz::problem::{fingerprint, Problem};

/// A problem as written by an author, solution included
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProblemDefinition {
    pub instruction: String,
    pub task: String,
    pub hint: String,
    pub solution: String,
}

impl ProblemDefinition {
    /// Read a JSON array of definitions
    pub fn load_all<P: AsRef<Path>>(path: P) -> Result<Vec<ProblemDefinition>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow!(
                "Failed to read problem definitions '{}': {}",
                path.display(),
                e
            )
        })?;
        serde_json::from_str(&content).map_err(|e| {
            anyhow!(
                "Failed to parse problem definitions '{}': {}",
                path.display(),
                e
            )
        })
    }
}

/// Turns problem definitions into a catalog
pub struct ContentBuilder<'a> {
    gateway: &'a QueryGateway,
}

impl<'a> ContentBuilder<'a> {
    pub fn new(gateway: &'a QueryGateway) -> Self {
        ContentBuilder { gateway }
    }

    /// Number the definitions from 1 and fingerprint each solution
    pub fn build(&self, definitions: Vec<ProblemDefinition>) -> Result<Catalog> {
        let mut problems = Vec::with_capacity(definitions.len());

        for (idx, definition) in definitions.into_iter().enumerate() {
            let number = u32::try_from(idx + 1)
                .map_err(|_| anyhow!("Too many problem definitions"))?;
            let table = match self.gateway.execute(&definition.solution) {
                QueryOutcome::Rows(table) => table,
                QueryOutcome::Failed { message } => {
                    return Err(anyhow!(
                        "Solution for problem {} failed to run: {}",
                        number,
                        message
                    ));
                }
            };

            problems.push(Problem {
                number,
                instruction: definition.instruction,
                task: definition.task,
                hint: definition.hint,
                expected_fingerprint: fingerprint(table.as_str()),
            });
        }

        Catalog::new(problems)
    }

    /// Build a bundle from a definitions file and write it to `bundle_path`
    pub fn rebuild<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        definitions_path: P,
        bundle_path: Q,
    ) -> Result<Catalog> {
        let definitions = ProblemDefinition::load_all(definitions_path)?;
        info!("Building {} problems", definitions.len());
        let catalog = self.build(definitions)?;
        catalog.save(bundle_path)?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConn;

    fn gateway() -> QueryGateway {
        let db = DatabaseConn::open_in_memory().unwrap();
        db.execute_batch(
            r#"
            CREATE TABLE melons (id INTEGER PRIMARY KEY, name TEXT);
            INSERT INTO melons VALUES (1, 'Crenshaw'), (2, 'Casaba');
            "#,
        )
        .unwrap();
        QueryGateway::from_conn(db, 20).unwrap()
    }

    fn definition(task: &str, solution: &str) -> ProblemDefinition {
        ProblemDefinition {
            instruction: "Melon queries".to_string(),
            task: task.to_string(),
            hint: "Use SELECT".to_string(),
            solution: solution.to_string(),
        }
    }

    #[test]
    fn test_build_numbers_and_fingerprints() {
        let gateway = gateway();
        let builder = ContentBuilder::new(&gateway);
        let catalog = builder
            .build(vec![
                definition("All names", "SELECT name FROM melons ORDER BY id"),
                definition("Count", "SELECT COUNT(*) FROM melons"),
            ])
            .unwrap();

        assert_eq!(catalog.len(), 2);
        let first = catalog.get(1).unwrap();
        assert_eq!(first.task, "All names");
        assert_eq!(first.expected_fingerprint, fingerprint("Crenshaw\nCasaba"));
        assert_eq!(
            catalog.get(2).unwrap().expected_fingerprint,
            fingerprint("2")
        );
    }

    #[test]
    fn test_build_fails_on_broken_solution() {
        let gateway = gateway();
        let builder = ContentBuilder::new(&gateway);
        let err = builder
            .build(vec![
                definition("Fine", "SELECT 1"),
                definition("Broken", "SELECT FROM"),
            ])
            .unwrap_err();
        assert!(err.to_string().contains("problem 2"));
    }

    #[test]
    fn test_rebuild_writes_bundle_without_solutions() {
        let dir = tempfile::tempdir().unwrap();
        let definitions_path = dir.path().join("problems.json");
        let bundle_path = dir.path().join("problem_set.json");
        std::fs::write(
            &definitions_path,
            r#"[{"instruction": "Melons", "task": "List names", "hint": "SELECT", "solution": "SELECT name FROM melons ORDER BY name"}]"#,
        )
        .unwrap();

        let gateway = gateway();
        let catalog = ContentBuilder::new(&gateway)
            .rebuild(&definitions_path, &bundle_path)
            .unwrap();

        let bundle = std::fs::read_to_string(&bundle_path).unwrap();
        assert!(!bundle.contains("ORDER BY name"));
        assert_eq!(Catalog::load(&bundle_path).unwrap(), catalog);
    }
}
