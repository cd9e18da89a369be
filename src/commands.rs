//! Command parsing for the interactive dashboard
//!
//! Parses readline input into a `Command`. Commands may be typed with or
//! without a leading slash (`income` or `/income`).

use crate::cli::formatters::Section;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print one section: `summary`, `income`, `balance`, `analysis`
    Show(Section),
    /// Print every section: `all`
    ShowAll,
    /// Re-fetch from the data source: `reload`
    Reload,
    /// Write the static HTML report: `export [path]`
    Export { path: Option<String> },
    /// Show help
    Help,
    /// Exit/quit
    Exit,
}

/// Error type for command parsing
#[derive(Debug, Clone)]
pub struct CommandParseError {
    pub message: String,
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandParseError {}

/// Parse a command string into a Command enum
///
/// Examples:
/// - `summary` or `/summary`
/// - `export report.html`
/// - `q`
pub fn parse_command(input: &str) -> Result<Command, CommandParseError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(CommandParseError {
            message: "Empty command. Type `/help` for commands.".to_string(),
        });
    }

    // Remove leading slash if present
    let input = input.strip_prefix('/').unwrap_or(input);

    let mut parts = input.split_whitespace();
    let cmd = parts.next().ok_or_else(|| CommandParseError {
        message: "No command provided".to_string(),
    })?;

    let lowered = cmd.to_lowercase();
    if let Some(section) = Section::parse(&lowered) {
        return Ok(Command::Show(section));
    }

    match lowered.as_str() {
        "all" | "dashboard" => Ok(Command::ShowAll),
        "reload" | "refresh" => Ok(Command::Reload),
        "export" => Ok(Command::Export {
            path: parts.next().map(str::to_string),
        }),
        "help" | "h" | "?" => Ok(Command::Help),
        "exit" | "quit" | "q" => Ok(Command::Exit),
        _ => Err(CommandParseError {
            message: format!("Unknown command: {}. Type `/help` for commands.", cmd),
        }),
    }
}
