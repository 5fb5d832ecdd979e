use sqlquiz::{ContentBuilder, QueryGateway, QuizConfig};
use std::path::Path;

/// Regenerate the problem bundle from a definitions file
pub fn run(config: &QuizConfig, definitions: &Path) {
    let gateway = match QueryGateway::connect(&config.database_path, config.row_limit) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    match ContentBuilder::new(&gateway).rebuild(definitions, &config.problems_path) {
        Ok(catalog) => println!(
            "Wrote {} problems to {}",
            catalog.len(),
            config.problems_path
        ),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}
