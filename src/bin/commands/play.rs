use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sqlquiz::quiz::view;
use sqlquiz::{Catalog, LedgerStore, LineSource, QueryGateway, QuizConfig, QuizController};
use std::path::PathBuf;
use tracing::{info, warn};

/// Line input backed by rustyline, with history kept in the home directory
struct ReadlineInput {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl ReadlineInput {
    fn new() -> Result<Self> {
        let mut editor = DefaultEditor::new()?;
        let history_path = dirs::home_dir().map(|home| home.join(".sqlquiz_history"));
        if let Some(path) = &history_path {
            match editor.load_history(path) {
                Ok(()) => {}
                Err(ReadlineError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to load history from {}: {}", path.display(), e),
            }
        }
        Ok(ReadlineInput {
            editor,
            history_path,
        })
    }

    fn save_history(&mut self) {
        if let Some(path) = &self.history_path {
            if let Err(e) = self.editor.save_history(path) {
                warn!("Failed to save history to {}: {}", path.display(), e);
            }
        }
    }
}

impl LineSource for ReadlineInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        self.editor.add_history_entry(line.as_str())?;
                    }
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Play the quiz on stdin/stdout
pub fn run(config: &QuizConfig) {
    if let Err(e) = play(config) {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn play(config: &QuizConfig) -> Result<()> {
    let gateway = QueryGateway::connect(&config.database_path, config.row_limit)?;
    let catalog = Catalog::load(&config.problems_path)?;
    let store = LedgerStore::new(&config.answers_path);
    let (ledger, rejected) = store.load_with_rejections()?;
    if !rejected.is_empty() {
        eprintln!(
            "{}",
            view::skipped_records(
                &config.answers_path,
                &store.backup_path().display().to_string(),
                &rejected
            )
        );
    }

    let input = ReadlineInput::new()?;
    let mut quiz = QuizController::new(gateway, catalog, ledger, store, input, std::io::stdout());
    let outcome = quiz.run();

    quiz.input_mut().save_history();
    let step = outcome?;
    info!("Session ended: {:?}", step);
    Ok(())
}
