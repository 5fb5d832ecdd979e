use sqlquiz::QuizConfig;
use std::path::Path;

pub fn run(config: &QuizConfig) {
    println!("{}", config.summary());

    let files = [
        ("Database", config.database_path.as_str()),
        ("Problem Bundle", config.problems_path.as_str()),
        ("Answers File", config.answers_path.as_str()),
    ];
    println!();
    for (name, path) in files {
        let status = match std::fs::metadata(Path::new(path)) {
            Ok(meta) => format!("present ({} bytes)", meta.len()),
            Err(_) => "missing".to_string(),
        };
        println!("{:<16}{}", format!("{}:", name), status);
    }
}
