use thiserror::Error;

use crate::types::Field;

/// One line typed at the panel prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Update a text field without sending anything
    Set(Field, String),
    /// Update the zoom field and fire the zoom change
    Zoom(String),
    Submit,
    Lock(bool),
    Autoload(bool),
    Singleshot,
    Refresh,
    Status,
    Help,
    Quit,
}

pub const USAGE: &str = "\
commands:
  exposure <value>    set exposure time
  gain <value>        set analog gain
  pid <value>         set timelapse process id
  zoom <value>        set zoom and send it
  submit              send exposure settings
  lock on|off         lock or unlock settings
  autoload on|off     toggle automatic image refresh
  singleshot          request a single capture
  refresh             load the latest image
  status              show panel state
  help                show this text
  quit                exit";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs a value")]
    MissingValue(&'static str),
    #[error("expected on/off, got '{0}'")]
    BadToggle(String),
}

/// Parse a prompt line. Field values are taken as typed, minus the
/// surrounding whitespace the prompt itself adds.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let value = |cmd: &'static str| -> Result<String, ParseError> {
        if rest.is_empty() {
            Err(ParseError::MissingValue(cmd))
        } else {
            Ok(rest.to_string())
        }
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "exposure" | "exp" => Ok(Command::Set(Field::ExposureTime, value("exposure")?)),
        "gain" => Ok(Command::Set(Field::Gain, value("gain")?)),
        "pid" => Ok(Command::Set(Field::Pid, value("pid")?)),
        "zoom" => Ok(Command::Zoom(value("zoom")?)),
        "submit" => Ok(Command::Submit),
        "lock" => Ok(Command::Lock(toggle(&value("lock")?)?)),
        "autoload" => Ok(Command::Autoload(toggle(&value("autoload")?)?)),
        "singleshot" | "shot" => Ok(Command::Singleshot),
        "refresh" => Ok(Command::Refresh),
        "status" => Ok(Command::Status),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(ParseError::Unknown(word.to_string())),
    }
}

fn toggle(value: &str) -> Result<bool, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" => Ok(false),
        _ => Err(ParseError::BadToggle(value.to_string())),
    }
}
