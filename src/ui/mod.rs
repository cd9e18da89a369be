//! Interactive dashboard
//!
//! A readline loop over one data source. Views are rendered from the report
//! built at startup; `reload` fetches the source again.

pub mod progress;
pub mod readline;

use crate::commands::{parse_command, Command};
use crate::dispatcher::{dispatch_command, Session};
use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;

/// Completion candidates for the prompt
const COMMANDS: &[&str] = &[
    "summary", "income", "balance", "analysis", "all", "reload", "export", "help", "exit", "quit",
];

const PROMPT: &str = "finreport> ";

/// Whether the loop keeps running after a line
enum Flow {
    Continue,
    Stop,
}

async fn handle_line(session: &mut Session, line: &str, json_output: bool) -> Flow {
    match parse_command(line) {
        Ok(Command::Exit) => Flow::Stop,
        Ok(command) => {
            if let Err(e) = dispatch_command(session, command, json_output).await {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            }
            Flow::Continue
        }
        Err(e) => {
            eprintln!("{} {}", "Parse error:".yellow().bold(), e.message);
            Flow::Continue
        }
    }
}

/// Launch the interactive dashboard REPL.
pub async fn launch_dashboard(mut session: Session, json_output: bool) -> Result<()> {
    println!("{}", format!("{} - Interactive Dashboard", session.title()).bold());
    println!("Data: {}", session.source_description().bright_black());
    println!("Type {} for help, {} to exit\n", "/help".cyan(), "/exit".cyan());

    if let Err(e) = dispatch_command(&mut session, Command::ShowAll, json_output).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
    }

    let mut rl = readline::Readline::new(COMMANDS, None)?;
    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            // Ctrl+C clears the line
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{} {}", "Error:".red().bold(), err);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        if let Flow::Stop = handle_line(&mut session, &line, json_output).await {
            break;
        }
    }

    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::importers::SampleSource;
    use crate::reports::BuildOptions;

    #[test]
    fn test_every_command_parses() {
        for command in COMMANDS {
            assert!(parse_command(command).is_ok(), "{} does not parse", command);
        }
    }

    #[tokio::test]
    async fn test_handle_line_flow() {
        let mut session = Session::open(
            Box::new(SampleSource),
            AppConfig::default(),
            BuildOptions::default(),
            true,
        )
        .await
        .unwrap();

        assert!(matches!(handle_line(&mut session, "/summary", true).await, Flow::Continue));
        assert!(matches!(handle_line(&mut session, "bogus", true).await, Flow::Continue));
        assert!(matches!(handle_line(&mut session, "q", true).await, Flow::Stop));
    }
}
