//! Interactive loop: one session and one set of views for many commands.

use clap::Parser;
use console::{style, Term};
use thiserror::Error;

use crate::commands::App;
use crate::setup::{Command, ShellLine};

const PROMPT: &str = "libris> ";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SplitError {
    #[error("unterminated {0} quote")]
    Unterminated(char),
    #[error("trailing backslash")]
    TrailingEscape,
}

/// Split a command line into words. Single and double quotes group words,
/// a backslash escapes the next character outside single quotes.
pub fn split_line(line: &str) -> Result<Vec<String>, SplitError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                in_word = true;
                let quote = c;
                loop {
                    match chars.next() {
                        Some(c) if c == quote => break,
                        Some('\\') if quote == '"' => {
                            current.push(chars.next().ok_or(SplitError::TrailingEscape)?);
                        }
                        Some(c) => current.push(c),
                        None => return Err(SplitError::Unterminated(quote)),
                    }
                }
            }
            '\\' => {
                in_word = true;
                current.push(chars.next().ok_or(SplitError::TrailingEscape)?);
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

pub async fn run(app: &mut App) -> anyhow::Result<()> {
    let term = Term::stdout();
    term.write_line(&style("libris shell. Type `help` for commands, `exit` to leave.").dim().to_string())?;

    // stdin is locked per line only: password and confirmation prompts read from it too
    let mut line = String::new();
    loop {
        term.write_str(PROMPT)?;
        term.flush()?;
        line.clear();
        if std::io::stdin().read_line(&mut line)? == 0 {
            term.write_line("")?;
            break;
        }

        let words = match split_line(&line) {
            Ok(words) => words,
            Err(err) => {
                term.write_line(&style(err.to_string()).red().to_string())?;
                continue;
            }
        };
        match words.first().map(String::as_str) {
            None => continue,
            Some("exit" | "quit") => break,
            Some(_) => {}
        }

        let parsed = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(err) => {
                term.write_str(&err.to_string())?;
                continue;
            }
        };
        if matches!(parsed.command, Command::Shell) {
            term.write_line("Already in the shell.")?;
            continue;
        }
        if let Err(err) = app.dispatch(parsed.command).await {
            tracing::debug!(error = ?err, "shell command failed");
            crate::report(&Term::stderr(), &err);
        }
    }
    app.leave();
    Ok(())
}
