use std::{
    error::Error,
    fmt,
    num::{ParseFloatError, ParseIntError},
};

use glam::Vec2;
use origin_defence_core::{CellCoord, PlayerInput};

/// Usage summary printed by the `help` command.
pub(crate) const HELP: &str = "\
commands:
  start          start a new game
  place X Y      place a tower on grid cell (X, Y)
  click PX PY    place a tower under screen position (PX, PY)
  attack         switch to the attack phase
  help           show this summary
  quit           leave the game";

/// Line typed by the player on the console.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ConsoleCommand {
    /// Input forwarded to the session unchanged.
    Input(PlayerInput),
    /// Screen position that still has to be resolved into a grid cell.
    Pointer(Vec2),
    /// Request for the usage summary.
    Help,
}

impl ConsoleCommand {
    /// Parses a single console line.
    pub(crate) fn parse(line: &str) -> Result<Self, ConsoleCommandError> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(ConsoleCommandError::Empty);
        };

        let parsed = match command.to_ascii_lowercase().as_str() {
            "start" | "new" => Self::Input(PlayerInput::StartGame),
            "attack" | "switch" => Self::Input(PlayerInput::SwitchPhase),
            "quit" | "exit" => Self::Input(PlayerInput::Quit),
            "help" | "?" => Self::Help,
            "place" => {
                let column = parse_int(next_argument(&mut words, "place", "X")?)?;
                let row = parse_int(next_argument(&mut words, "place", "Y")?)?;
                Self::Input(PlayerInput::Click {
                    cell: CellCoord::new(column, row),
                })
            }
            "click" => {
                let x = parse_float(next_argument(&mut words, "click", "PX")?)?;
                let y = parse_float(next_argument(&mut words, "click", "PY")?)?;
                Self::Pointer(Vec2::new(x, y))
            }
            other => return Err(ConsoleCommandError::UnknownCommand(other.to_owned())),
        };

        match words.next() {
            Some(extra) => Err(ConsoleCommandError::UnexpectedArgument(extra.to_owned())),
            None => Ok(parsed),
        }
    }
}

fn next_argument<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ConsoleCommandError> {
    words
        .next()
        .ok_or(ConsoleCommandError::MissingArgument { command, argument })
}

fn parse_int(value: &str) -> Result<i32, ConsoleCommandError> {
    value
        .parse()
        .map_err(|error| ConsoleCommandError::InvalidCell(value.to_owned(), error))
}

fn parse_float(value: &str) -> Result<f32, ConsoleCommandError> {
    value
        .parse()
        .map_err(|error| ConsoleCommandError::InvalidPosition(value.to_owned(), error))
}

/// Errors that can occur while parsing a console line.
#[derive(Debug, PartialEq)]
pub(crate) enum ConsoleCommandError {
    /// The line contained only whitespace.
    Empty,
    /// The first word is not a known command.
    UnknownCommand(String),
    /// A required argument was not provided.
    MissingArgument {
        /// Command that expected the argument.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },
    /// Trailing input followed a complete command.
    UnexpectedArgument(String),
    /// A grid coordinate was not an integer.
    InvalidCell(String, ParseIntError),
    /// A screen coordinate was not a number.
    InvalidPosition(String, ParseFloatError),
}

impl fmt::Display for ConsoleCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no command entered"),
            Self::UnknownCommand(command) => {
                write!(f, "unknown command '{command}' (type 'help' for a list)")
            }
            Self::MissingArgument { command, argument } => {
                write!(f, "'{command}' is missing the {argument} argument")
            }
            Self::UnexpectedArgument(argument) => {
                write!(f, "unexpected argument '{argument}'")
            }
            Self::InvalidCell(value, error) => {
                write!(f, "could not parse grid coordinate '{value}': {error}")
            }
            Self::InvalidPosition(value, error) => {
                write!(f, "could not parse screen coordinate '{value}': {error}")
            }
        }
    }
}

impl Error for ConsoleCommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCell(_, error) => Some(error),
            Self::InvalidPosition(_, error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_phase_commands_case_insensitively() {
        assert_eq!(
            ConsoleCommand::parse("  START "),
            Ok(ConsoleCommand::Input(PlayerInput::StartGame))
        );
        assert_eq!(
            ConsoleCommand::parse("attack"),
            Ok(ConsoleCommand::Input(PlayerInput::SwitchPhase))
        );
        assert_eq!(
            ConsoleCommand::parse("exit"),
            Ok(ConsoleCommand::Input(PlayerInput::Quit))
        );
        assert_eq!(ConsoleCommand::parse("?"), Ok(ConsoleCommand::Help));
    }

    #[test]
    fn parses_grid_and_screen_placements() {
        assert_eq!(
            ConsoleCommand::parse("place 3 -1"),
            Ok(ConsoleCommand::Input(PlayerInput::Click {
                cell: CellCoord::new(3, -1)
            }))
        );
        assert_eq!(
            ConsoleCommand::parse("click 40.5 12"),
            Ok(ConsoleCommand::Pointer(Vec2::new(40.5, 12.0)))
        );
    }

    #[test]
    fn reports_malformed_lines() {
        assert_eq!(ConsoleCommand::parse("   "), Err(ConsoleCommandError::Empty));
        assert_eq!(
            ConsoleCommand::parse("place 3"),
            Err(ConsoleCommandError::MissingArgument {
                command: "place",
                argument: "Y"
            })
        );
        assert_eq!(
            ConsoleCommand::parse("start now"),
            Err(ConsoleCommandError::UnexpectedArgument("now".to_owned()))
        );
        assert!(matches!(
            ConsoleCommand::parse("place x 1"),
            Err(ConsoleCommandError::InvalidCell(value, _)) if value == "x"
        ));
        assert!(matches!(
            ConsoleCommand::parse("dance"),
            Err(ConsoleCommandError::UnknownCommand(command)) if command == "dance"
        ));
    }

    #[test]
    fn invalid_numbers_expose_their_source() {
        let error = ConsoleCommand::parse("click a 1").expect_err("not a number");
        assert!(error.source().is_some());
        assert_eq!(
            error.to_string(),
            "could not parse screen coordinate 'a': invalid float literal"
        );
    }
}
