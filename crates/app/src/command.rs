use std::fmt;

use services::{QuizIntent, SessionPhase, SessionSnapshot};
use trivia_core::model::{CategoryChoice, Difficulty};

/// A line of user input, resolved against the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(QuizIntent),
    Start,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    MissingValue { command: &'static str },
    InvalidValue { command: &'static str, raw: String },
    NoSuchAnswer(usize),
    Unknown(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::MissingValue { command } => write!(f, "{command} requires a value"),
            CommandError::InvalidValue { command, raw } => {
                write!(f, "invalid value for {command}: {raw}")
            }
            CommandError::NoSuchAnswer(n) => write!(f, "there is no answer {n}"),
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw} (try `help`)"),
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    /// Parse one input line for the screen described by `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` when the line matches nothing valid on this screen.
    pub fn parse(line: &str, snapshot: &SessionSnapshot) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            // Bare enter confirms while answering, like pressing "Next".
            return match snapshot.phase {
                SessionPhase::Answering => Ok(Self::Intent(QuizIntent::Confirm)),
                _ => Err(CommandError::Unknown(String::new())),
            };
        };
        let rest = words.collect::<Vec<_>>().join(" ");
        let head = head.to_ascii_lowercase();

        match head.as_str() {
            "q" | "quit" | "exit" => return Ok(Self::Quit),
            "h" | "help" | "?" => return Ok(Self::Help),
            "r" | "restart" => return Ok(Self::Intent(QuizIntent::Restart)),
            _ => {}
        }

        match snapshot.phase {
            SessionPhase::Configuring => parse_configuring(&head, &rest),
            SessionPhase::Answering => parse_answering(&head, snapshot),
            SessionPhase::Finished => Err(CommandError::Unknown(head)),
        }
    }
}

fn parse_configuring(head: &str, rest: &str) -> Result<Command, CommandError> {
    match head {
        "s" | "start" => Ok(Command::Start),
        "c" | "category" => {
            let raw = require_value(rest, "category")?;
            raw.parse::<CategoryChoice>()
                .map(|choice| Command::Intent(QuizIntent::SetCategory(choice)))
                .map_err(|_| CommandError::InvalidValue {
                    command: "category",
                    raw: raw.to_owned(),
                })
        }
        "n" | "amount" => {
            let raw = require_value(rest, "amount")?;
            raw.parse::<u32>()
                .map(|amount| Command::Intent(QuizIntent::SetAmount(amount)))
                .map_err(|_| CommandError::InvalidValue {
                    command: "amount",
                    raw: raw.to_owned(),
                })
        }
        "d" | "difficulty" => {
            let raw = require_value(rest, "difficulty")?;
            raw.parse::<Difficulty>()
                .map(|level| Command::Intent(QuizIntent::SetDifficulty(level)))
                .map_err(|_| CommandError::InvalidValue {
                    command: "difficulty",
                    raw: raw.to_owned(),
                })
        }
        _ => Err(CommandError::Unknown(head.to_owned())),
    }
}

fn parse_answering(head: &str, snapshot: &SessionSnapshot) -> Result<Command, CommandError> {
    if matches!(head, "next" | "ok" | "confirm") {
        return Ok(Command::Intent(QuizIntent::Confirm));
    }
    let Ok(number) = head.parse::<usize>() else {
        return Err(CommandError::Unknown(head.to_owned()));
    };
    let answer = snapshot
        .current_question
        .as_ref()
        .and_then(|question| question.answers().get(number.checked_sub(1)?))
        .ok_or(CommandError::NoSuchAnswer(number))?;
    Ok(Command::Intent(QuizIntent::SelectAnswer(answer.clone())))
}

fn require_value<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, CommandError> {
    let value = rest.trim();
    if value.is_empty() {
        return Err(CommandError::MissingValue { command });
    }
    Ok(value)
}
