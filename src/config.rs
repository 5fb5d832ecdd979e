use anyhow::{anyhow, Result};
use config::Config;
use std::collections::HashMap;
use std::path::Path;

/// Default SQLite database holding the exercise tables
pub const DEFAULT_DATABASE_PATH: &str = "database.db";

/// Default problem bundle produced by `--rebuild`
pub const DEFAULT_PROBLEMS_PATH: &str = "problem_set.json";

/// Default answers file
pub const DEFAULT_ANSWERS_PATH: &str = "answers.sql";

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sqlquiz.toml";

/// Only the first rows of a result are rendered and fingerprinted
pub const DEFAULT_ROW_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Path to the SQLite database the learner queries
    pub database_path: String,

    /// Path to the problem bundle
    pub problems_path: String,

    /// Path to the answers file recording solved problems
    pub answers_path: String,

    /// Maximum number of rows rendered per query
    pub row_limit: usize,
}

const EMPTY_CONFIG: &str = r#"### sqlquiz configuration file

### SQLite database with the exercise tables
# database_path = "database.db"

### problem bundle built with --rebuild
# problems_path = "problem_set.json"

### file recording solved problems
# answers_path = "answers.sql"

### rows rendered (and checked) per query
# row_limit = 20
"#;

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            problems_path: DEFAULT_PROBLEMS_PATH.to_string(),
            answers_path: DEFAULT_ANSWERS_PATH.to_string(),
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }
}

impl QuizConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<QuizConfig> {
        let mut builder = Config::builder();

        // Add in toml configuration file
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                // The working directory file is optional and never created
                if Path::new(DEFAULT_CONFIG_FILE).exists() {
                    builder = builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE));
                }
            }
        }

        // Add in settings from the environment (with a prefix of SQLQUIZ)
        // E.g., `SQLQUIZ_ANSWERS_PATH=mine.sql ./sqlquiz` would set the answers file
        builder = builder.add_source(config::Environment::with_prefix("SQLQUIZ"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    fn from_map(config: &HashMap<String, String>) -> Result<QuizConfig> {
        let defaults = QuizConfig::default();

        let row_limit = match config.get("row_limit") {
            Some(s) => s
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| anyhow!("Invalid row_limit '{}': expected a positive integer", s))?,
            None => defaults.row_limit,
        };

        Ok(QuizConfig {
            database_path: config
                .get("database_path")
                .cloned()
                .unwrap_or(defaults.database_path),
            problems_path: config
                .get("problems_path")
                .cloned()
                .unwrap_or(defaults.problems_path),
            answers_path: config
                .get("answers_path")
                .cloned()
                .unwrap_or(defaults.answers_path),
            row_limit,
        })
    }

    /// Apply command-line path overrides on top of file and environment settings
    pub fn with_overrides(
        mut self,
        database_path: Option<String>,
        problems_path: Option<String>,
        answers_path: Option<String>,
    ) -> Self {
        if let Some(p) = database_path {
            self.database_path = p;
        }
        if let Some(p) = problems_path {
            self.problems_path = p;
        }
        if let Some(p) = answers_path {
            self.answers_path = p;
        }
        self
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let lines = [
            format!("Database:       {}", self.database_path),
            format!("Problem Bundle: {}", self.problems_path),
            format!("Answers File:   {}", self.answers_path),
            format!("Row Limit:      {}", self.row_limit),
        ];
        lines.join("\n")
    }
}
