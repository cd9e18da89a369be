//! Line editor for the dashboard prompt: command completion, file-name
//! completion after `export`, and a persistent history.

use std::borrow::Cow;
use std::path::PathBuf;

use colored::Colorize;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, Helper};

/// Command that takes a file path argument
const PATH_COMMAND: &str = "export";

pub struct DashboardHelper {
    commands: Vec<String>,
    files: FilenameCompleter,
    hinter: HistoryHinter,
}

impl DashboardHelper {
    pub fn new(commands: &[&str]) -> Self {
        Self {
            commands: commands.iter().map(|c| c.to_string()).collect(),
            files: FilenameCompleter::new(),
            hinter: HistoryHinter::default(),
        }
    }

    /// Command names starting with `prefix`, keeping a typed leading slash
    fn complete_command(&self, prefix: &str) -> Vec<Pair> {
        let (slash, word) = match prefix.strip_prefix('/') {
            Some(rest) => ("/", rest),
            None => ("", prefix),
        };
        let word = word.to_lowercase();

        let mut matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|command| command.starts_with(&word))
            .map(|command| {
                let replacement = format!("{}{} ", slash, command);
                Pair {
                    display: command.clone(),
                    replacement,
                }
            })
            .collect();
        matches.sort_by(|a, b| a.replacement.cmp(&b.replacement));
        matches.dedup_by(|a, b| a.replacement == b.replacement);
        matches
    }
}

impl Helper for DashboardHelper {}
impl Validator for DashboardHelper {}

impl Highlighter for DashboardHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.bright_black().to_string())
    }
}

impl Hinter for DashboardHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Completer for DashboardHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let leading = before.len() - before.trim_start().len();

        match before.trim_start().split_once(char::is_whitespace) {
            None => Ok((leading, self.complete_command(before.trim_start()))),
            Some((command, _)) if command.trim_start_matches('/').eq_ignore_ascii_case(PATH_COMMAND) => {
                self.files.complete_path(line, pos)
            }
            Some(_) => Ok((pos, Vec::new())),
        }
    }
}

/// `<config home>/finreport/history`, or `.finreport_history` in the working directory
pub fn default_history_path() -> PathBuf {
    dir_spec::config_home()
        .map(|dir| dir.join("finreport").join("history"))
        .unwrap_or_else(|| PathBuf::from(".finreport_history"))
}

/// `rustyline::Editor` with the dashboard helper and an on-disk history
pub struct Readline {
    editor: Editor<DashboardHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Readline {
    pub fn new(commands: &[&str], history_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .auto_add_history(false)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(DashboardHelper::new(commands)));

        let history_path = history_path.unwrap_or_else(default_history_path);
        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        // First run has no history file yet
        let _ = editor.load_history(&history_path);

        Ok(Self {
            editor,
            history_path,
        })
    }

    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        let line = self.editor.readline(prompt)?;
        if !line.trim().is_empty() {
            let _ = self.editor.add_history_entry(line.as_str());
            let _ = self.editor.append_history(&self.history_path);
        }
        Ok(line)
    }

    /// Completion start and replacements for `line` with the cursor at its end
    pub fn completions(&self, line: &str) -> (usize, Vec<String>) {
        let Some(helper) = self.editor.helper() else {
            return (0, Vec::new());
        };
        let ctx = Context::new(self.editor.history());
        match helper.complete(line, line.len(), &ctx) {
            Ok((start, pairs)) => (start, pairs.into_iter().map(|p| p.replacement).collect()),
            Err(_) => (0, Vec::new()),
        }
    }
}
