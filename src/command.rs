//! The line protocol understood by the [`Interpreter`](crate::Interpreter).
//!
//! Tokens are separated by exactly one space. Keys are an optional sign
//! followed by ASCII digits and must fit in an `i64`. Values are any run of
//! non-whitespace characters, possibly empty.

use std::str::FromStr;

use crate::error::CommandError;
use crate::splay_tree::Key;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { key: Key, value: String },
    Set { key: Key, value: String },
    Delete { key: Key },
    Search { key: Key },
    Min,
    Max,
    Print,
}

fn parse_key(s: &str) -> Option<Key> {
    let digits = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_key_value(s: &str) -> Option<(Key, String)> {
    let (key, value) = s.split_once(' ')?;
    if value.contains(char::is_whitespace) {
        return None;
    }
    Some((parse_key(key)?, value.to_owned()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || CommandError::Malformed(line.to_owned());
        let command = match line.split_once(' ') {
            None => match line {
                "min" => Command::Min,
                "max" => Command::Max,
                "print" => Command::Print,
                _ => return Err(malformed()),
            },
            Some(("add", rest)) => {
                let (key, value) = parse_key_value(rest).ok_or_else(malformed)?;
                Command::Add { key, value }
            }
            Some(("set", rest)) => {
                let (key, value) = parse_key_value(rest).ok_or_else(malformed)?;
                Command::Set { key, value }
            }
            Some(("delete", rest)) => Command::Delete {
                key: parse_key(rest).ok_or_else(malformed)?,
            },
            Some(("search", rest)) => Command::Search {
                key: parse_key(rest).ok_or_else(malformed)?,
            },
            Some(_) => return Err(malformed()),
        };
        Ok(command)
    }
}
