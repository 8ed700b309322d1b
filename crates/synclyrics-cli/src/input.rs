//! Terminal input parsing
//!
//! Each line typed during `synclyrics run` is one command. Key-like
//! commands become `KeyPress`es so they go through the same bindings as a
//! graphical front end; the rest map straight to session actions.

use std::path::PathBuf;

use synclyrics_lib::{Key, KeyPress, SessionAction};
use thiserror::Error;

/// Errors for a line that could not be understood
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Unknown command: {0} (type ? for help)")]
    Unknown(String),

    #[error("Missing argument for {0}")]
    MissingArgument(String),

    #[error("Invalid number for {command}: {value}")]
    InvalidNumber { command: String, value: String },

    #[error("Line numbers start at 1")]
    ZeroLine,
}

/// A parsed terminal command
#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    /// Goes through the key bindings
    Key(KeyPress),
    /// Bypasses the key bindings
    Action(SessionAction),
    /// Replace caption texts with the lines of a file
    Edit(PathBuf),
    /// Write the export to the output directory
    Write,
    List,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands (press Enter after each):
  <Enter> | s | down      sync: start the next line now
  p | space               play / pause
  left | right            seek back / forward
  u | ctrl+z              undo
  r | ctrl+shift+z        redo
  + | -                   nudge the active line's start
  j <n>                   jump to line n
  t <seconds>             seek to an absolute time
  e <file>                replace the lyrics text from a file
  l                       list lines with their times
  w                       write the SRT export
  ? | help                show this help
  q | quit                write nothing and exit";

/// Parses one input line. A blank line is a sync tap.
pub fn parse_command(line: &str, nudge_step: f64) -> Result<InputCommand, InputError> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(InputCommand::Key(KeyPress::plain(Key::ArrowDown)));
    };
    let argument = parts.next();

    let parsed = match command.to_ascii_lowercase().as_str() {
        "s" | "sync" => InputCommand::Key(KeyPress::plain(Key::Char('s'))),
        "down" => InputCommand::Key(KeyPress::plain(Key::ArrowDown)),
        "p" | "space" | "play" | "pause" => InputCommand::Key(KeyPress::plain(Key::Space)),
        "left" => InputCommand::Key(KeyPress::plain(Key::ArrowLeft)),
        "right" => InputCommand::Key(KeyPress::plain(Key::ArrowRight)),
        "u" | "undo" | "ctrl+z" | "cmd+z" => {
            InputCommand::Key(KeyPress::plain(Key::Char('z')).with_ctrl())
        }
        "r" | "redo" | "ctrl+shift+z" | "cmd+shift+z" => {
            InputCommand::Key(KeyPress::plain(Key::Char('z')).with_ctrl().with_shift())
        }
        "+" => InputCommand::Action(SessionAction::NudgeActive(nudge_step)),
        "-" => InputCommand::Action(SessionAction::NudgeActive(-nudge_step)),
        "j" | "jump" => {
            let line_number: usize = parse_argument(command, argument)?;
            if line_number == 0 {
                return Err(InputError::ZeroLine);
            }
            InputCommand::Action(SessionAction::JumpTo(line_number - 1))
        }
        "t" | "seek" => InputCommand::Action(SessionAction::Scrub(parse_argument(command, argument)?)),
        "e" | "edit" => {
            let path = argument.ok_or_else(|| InputError::MissingArgument(command.to_string()))?;
            InputCommand::Edit(PathBuf::from(path))
        }
        "l" | "list" => InputCommand::List,
        "w" | "write" => InputCommand::Write,
        "?" | "h" | "help" => InputCommand::Help,
        "q" | "quit" | "exit" => InputCommand::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(parsed)
}

fn parse_argument<T: std::str::FromStr>(command: &str, argument: Option<&str>) -> Result<T, InputError> {
    let value = argument.ok_or_else(|| InputError::MissingArgument(command.to_string()))?;
    value.parse().map_err(|_| InputError::InvalidNumber {
        command: command.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<InputCommand, InputError> {
        parse_command(line, 0.1)
    }

    #[test]
    fn test_blank_line_is_a_tap() {
        assert_eq!(parse("").unwrap(), InputCommand::Key(KeyPress::plain(Key::ArrowDown)));
        assert_eq!(parse("   ").unwrap(), InputCommand::Key(KeyPress::plain(Key::ArrowDown)));
    }

    #[test]
    fn test_key_commands() {
        assert_eq!(parse("S").unwrap(), InputCommand::Key(KeyPress::plain(Key::Char('s'))));
        assert_eq!(parse("space").unwrap(), InputCommand::Key(KeyPress::plain(Key::Space)));
        assert_eq!(
            parse("ctrl+shift+z").unwrap(),
            InputCommand::Key(KeyPress::plain(Key::Char('z')).with_ctrl().with_shift())
        );
        assert_eq!(
            parse("u").unwrap(),
            InputCommand::Key(KeyPress::plain(Key::Char('z')).with_ctrl())
        );
    }

    #[test]
    fn test_action_commands() {
        assert_eq!(parse("+").unwrap(), InputCommand::Action(SessionAction::NudgeActive(0.1)));
        assert_eq!(parse("-").unwrap(), InputCommand::Action(SessionAction::NudgeActive(-0.1)));
        assert_eq!(parse("j 3").unwrap(), InputCommand::Action(SessionAction::JumpTo(2)));
        assert_eq!(parse("t 12.5").unwrap(), InputCommand::Action(SessionAction::Scrub(12.5)));
        assert_eq!(parse("e new.txt").unwrap(), InputCommand::Edit(PathBuf::from("new.txt")));
    }

    #[test]
    fn test_bad_input() {
        assert_eq!(parse("j"), Err(InputError::MissingArgument("j".to_string())));
        assert_eq!(parse("j 0"), Err(InputError::ZeroLine));
        assert_eq!(
            parse("t soon"),
            Err(InputError::InvalidNumber {
                command: "t".to_string(),
                value: "soon".to_string()
            })
        );
        assert_eq!(parse("dance"), Err(InputError::Unknown("dance".to_string())));
    }
}
