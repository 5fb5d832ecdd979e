//! Learner-facing text
//!
//! Every message the session prints is produced here; the controller only
//! decides which one to write.

use crate::database::SchemaLookup;
use crate::quiz::ledger::RejectedRecord;
use crate::quiz::problem::Problem;

pub const INTRO: &str = r#"

SQL Exercises
-------------

You will write a series of SQL queries accomplishing different tasks.
Each problem explains the concepts it needs and then states a task.

Type '.help' without quotes for a list of the available commands.

It will be helpful to refer to the list of tables, found by typing in '.tables',
or viewing the schema of a given table, (ex: .schema orders) while formulating
your queries. If you get very stuck each problem includes a hint on how to
formulate your query, accessed by typing '.hint'.
"#;

pub const HELP: &str = r#"
The following commands are available:

    .help    - Display this message
    .hint    - Show a hint about how to formulate the query
    .next    - Skip the current problem
    .problem - Show the current problem statement
    .quit    - Quit the program
    .schema <table_name> - Show the schema used to define a given table
    .tables  - Show all the tables available in the database

Any other commands will be interpreted as a SQL query and executed against the
problem set database."#;

pub fn prompt(number: u32) -> String {
    format!("SQL [{}]> ", number)
}

pub fn problem(problem: &Problem) -> String {
    format!(
        "\nProblem {:2}\n----------\n\n{}\n\nTask: {}",
        problem.number, problem.instruction, problem.task
    )
}

pub fn already_answered(number: u32) -> String {
    format!("Already answered question {}", number)
}

pub fn skipping(number: u32) -> String {
    format!("Skipping problem {}", number)
}

pub fn correct(query: &str) -> String {
    format!("\n\tCorrect!\n\t{}\n\tMoving on...\n", query)
}

pub fn syntax_error(message: &str) -> String {
    format!(
        "There was a problem with your SQL syntax:\n\n\t{}\n",
        message
    )
}

pub fn tables(names: &[String]) -> String {
    let mut out = String::from("Tables:");
    for name in names {
        out.push('\n');
        out.push_str(name);
    }
    out
}

pub fn schema(lookup: &SchemaLookup) -> String {
    match lookup {
        SchemaLookup::Found(sql) => sql.clone(),
        SchemaLookup::NoSuchTable(name) => format!("No such table: {}", name),
        SchemaLookup::MissingName => {
            "Please indicate a table name, like '.schema melons'".to_string()
        }
    }
}

pub fn already_complete(answers_path: &str) -> String {
    format!(
        "You've already answered all the questions. Remove {} to redo the exercise.",
        answers_path
    )
}

/// Notice for answers-file records that could not be read
pub fn skipped_records(
    answers_path: &str,
    backup_path: &str,
    rejected: &[RejectedRecord],
) -> String {
    let mut out = format!(
        "Warning: {} record(s) in {} could not be read and will not be kept.\nThe original file was copied to {}.",
        rejected.len(),
        answers_path,
        backup_path
    );
    for record in rejected {
        out.push_str(&format!("\n    record #{}: {}", record.position, record.reason));
    }
    out
}

pub const QUITTING: &str = "Quitting.";

pub const FINISHED: &str = "That was the last problem.";

pub fn farewell(message: &str) -> String {
    format!("{}\nGoodbye.\n", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_header() {
        let p = Problem {
            number: 3,
            instruction: "Joins combine tables.".to_string(),
            task: "List orders with customer emails.".to_string(),
            hint: "JOIN".to_string(),
            expected_fingerprint: String::new(),
        };
        assert_eq!(
            problem(&p),
            "\nProblem  3\n----------\n\nJoins combine tables.\n\nTask: List orders with customer emails."
        );
    }

    #[test]
    fn test_schema_messages() {
        assert_eq!(
            schema(&SchemaLookup::NoSuchTable("x".to_string())),
            "No such table: x"
        );
        assert!(schema(&SchemaLookup::MissingName).starts_with("Please indicate"));
    }

    #[test]
    fn test_skipped_records_notice() {
        let rejected = vec![RejectedRecord {
            position: 2,
            reason: "expected 3 fields, found 2".to_string(),
        }];
        let notice = skipped_records("answers.sql", "answers.sql.bak", &rejected);
        assert!(notice.starts_with("Warning: 1 record(s) in answers.sql"));
        assert!(notice.contains("answers.sql.bak"));
        assert!(notice.contains("record #2: expected 3 fields, found 2"));
    }

    #[test]
    fn test_tables() {
        assert_eq!(tables(&[]), "Tables:");
        assert_eq!(
            tables(&["melons".to_string(), "orders".to_string()]),
            "Tables:\nmelons\norders"
        );
    }
}
