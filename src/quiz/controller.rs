//! Interactive quiz session
//!
//! The controller walks the catalog in order, skipping problems already in
//! the ledger, and loops on each remaining problem until the learner solves
//! it, skips it, or quits. Lines starting with a command word (optionally
//! prefixed with `.`) are meta-commands; anything else is run as SQL.
//!
//! The controller never exits the process. [`QuizController::run`] returns
//! [`Step::Quit`] or [`Step::Completed`] and the caller decides what to do.

use anyhow::Result;
use std::collections::VecDeque;
use std::io::Write;
use tracing::{debug, info};

use crate::database::{QueryGateway, QueryOutcome};
use crate::quiz::catalog::Catalog;
use crate::quiz::ledger::{Ledger, LedgerStore};
use crate::quiz::problem::Problem;
use crate::quiz::view;

/// Source of learner input, one line at a time
pub trait LineSource {
    /// Read the next line, or `None` once input is exhausted
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Fixed list of input lines, for tests and non-interactive runs
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

/// Meta-commands understood inside a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Hint,
    Next,
    Problem,
    Quit,
    Schema(Option<String>),
    Tables,
}

impl Command {
    /// Parse a line as a meta-command
    ///
    /// The first whitespace-separated token, with leading `.` removed, is
    /// matched case-sensitively. Returns `None` for anything else, which the
    /// session treats as SQL.
    pub fn parse(line: &str) -> Option<Command> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?.trim_start_matches('.');

        let command = match name {
            "help" | "h" | "?" => Command::Help,
            "hint" => Command::Hint,
            "next" | "skip" => Command::Next,
            "problem" | "p" => Command::Problem,
            "quit" | "exit" | "q" => Command::Quit,
            "schema" => Command::Schema(tokens.next().map(str::to_string)),
            "tables" | "table" => Command::Tables,
            _ => return None,
        };
        Some(command)
    }
}

/// What happened after handling input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Stay on the current problem
    Continue,
    /// The current problem was solved
    AdvancedProblem,
    /// The current problem was skipped unsolved
    Skipped,
    /// The learner quit or input ended
    Quit,
    /// Every problem has been visited
    Completed,
}

/// Drives a quiz session
pub struct QuizController<I, W> {
    gateway: QueryGateway,
    catalog: Catalog,
    ledger: Ledger,
    store: LedgerStore,
    input: I,
    out: W,
}

impl<I: LineSource, W: Write> QuizController<I, W> {
    pub fn new(
        gateway: QueryGateway,
        catalog: Catalog,
        ledger: Ledger,
        store: LedgerStore,
        input: I,
        out: W,
    ) -> Self {
        QuizController {
            gateway,
            catalog,
            ledger,
            store,
            input,
            out,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run the whole session
    pub fn run(&mut self) -> Result<Step> {
        if self.catalog.is_complete(&self.ledger) {
            let message = view::already_complete(&self.store.path().display().to_string());
            self.say(&view::farewell(&message))?;
            return Ok(Step::Completed);
        }

        self.say(view::INTRO)?;

        let problems = self.catalog.problems().to_vec();
        for problem in &problems {
            if self.ledger.contains(problem.number) {
                self.say(&view::already_answered(problem.number))?;
                continue;
            }

            self.say(&view::problem(problem))?;
            if self.attempt(problem)? == Step::Quit {
                self.say(&view::farewell(view::QUITTING))?;
                return Ok(Step::Quit);
            }
        }

        self.say(&view::farewell(view::FINISHED))?;
        Ok(Step::Completed)
    }

    /// Prompt on one problem until it is solved, skipped, or the session ends
    fn attempt(&mut self, problem: &Problem) -> Result<Step> {
        let prompt = view::prompt(problem.number);
        loop {
            self.say("")?;
            self.out.flush()?;

            let Some(line) = self.input.read_line(&prompt)? else {
                debug!("End of input on problem {}", problem.number);
                return Ok(Step::Quit);
            };

            match self.handle_line(problem, &line)? {
                Step::Continue => continue,
                step => return Ok(step),
            }
        }
    }

    /// Handle a single line of input for `problem`
    pub fn handle_line(&mut self, problem: &Problem, line: &str) -> Result<Step> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Step::Continue);
        }

        match Command::parse(line) {
            Some(command) => self.dispatch(problem, command),
            None => self.submit(problem, line),
        }
    }

    fn dispatch(&mut self, problem: &Problem, command: Command) -> Result<Step> {
        debug!("Command {:?} on problem {}", command, problem.number);
        match command {
            Command::Help => self.say(view::HELP)?,
            Command::Hint => self.say(&problem.hint)?,
            Command::Problem => self.say(&view::problem(problem))?,
            Command::Tables => {
                let names = self.gateway.list_tables()?;
                self.say(&view::tables(&names))?;
            }
            Command::Schema(name) => {
                let lookup = self.gateway.show_schema(name.as_deref())?;
                self.say(&view::schema(&lookup))?;
            }
            Command::Next => {
                self.say(&view::skipping(problem.number))?;
                return Ok(Step::Skipped);
            }
            Command::Quit => return Ok(Step::Quit),
        }
        Ok(Step::Continue)
    }

    fn submit(&mut self, problem: &Problem, query: &str) -> Result<Step> {
        let table = match self.gateway.execute(query) {
            QueryOutcome::Rows(table) => table,
            QueryOutcome::Failed { message } => {
                self.say(&view::syntax_error(&message))?;
                return Ok(Step::Continue);
            }
        };

        debug!("Query returned {} rows", table.row_count());
        self.say(table.as_str())?;
        if !problem.is_solved_by(&table) {
            return Ok(Step::Continue);
        }

        self.say(&view::correct(query))?;
        self.store
            .mark_solved(&mut self.ledger, problem.number, &problem.task, query)?;
        info!("Problem {} solved", problem.number);
        Ok(Step::AdvancedProblem)
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }
}
