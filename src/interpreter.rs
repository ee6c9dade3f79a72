use std::fmt::{self, Display, Formatter};
use std::io::{self, BufRead, Write};

use crate::command::Command;
use crate::error::CommandError;
use crate::splay_tree::{print::LevelOrder, Key, SplayTree};

/// What a successful command prints.
enum Reply<'a> {
    Nothing,
    Found(&'a str),
    Missing,
    Entry(Key, &'a str),
    Dump(LevelOrder<'a>),
}

impl Display for Reply<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Nothing => Ok(()),
            Reply::Found(value) => write!(f, "1 {value}"),
            Reply::Missing => write!(f, "0"),
            Reply::Entry(key, value) => write!(f, "{key} {value}"),
            Reply::Dump(dump) => write!(f, "{dump}"),
        }
    }
}

fn apply(tree: &mut SplayTree, command: Command) -> Result<Reply<'_>, CommandError> {
    let reply = match command {
        Command::Add { key, value } => {
            tree.add(key, value)?;
            Reply::Nothing
        }
        Command::Set { key, value } => {
            tree.set(key, value)?;
            Reply::Nothing
        }
        Command::Delete { key } => {
            tree.delete(key)?;
            Reply::Nothing
        }
        Command::Search { key } => tree.search(key).map_or(Reply::Missing, Reply::Found),
        Command::Min => {
            let (key, value) = tree.min()?;
            Reply::Entry(key, value)
        }
        Command::Max => {
            let (key, value) = tree.max()?;
            Reply::Entry(key, value)
        }
        Command::Print => Reply::Dump(tree.level_order()),
    };
    Ok(reply)
}

/// Runs commands against a single tree and writes their replies to `out`.
/// Rejected commands print `error`; only I/O failures stop it.
pub struct Interpreter<W: Write> {
    tree: SplayTree,
    out: W,
    executed: usize,
    rejected: usize,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self {
            tree: SplayTree::new(),
            out,
            executed: 0,
            rejected: 0,
        }
    }

    pub fn tree(&self) -> &SplayTree {
        &self.tree
    }

    /// Commands run so far, rejected ones included.
    pub fn executed(&self) -> usize {
        self.executed
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Executes every line of `input` until end of stream, then flushes.
    pub fn run(&mut self, input: impl BufRead) -> io::Result<()> {
        for line in input.split(b'\n') {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            match std::str::from_utf8(&line) {
                Ok(line) => self.execute_line(line)?,
                Err(e) => {
                    log::debug!("rejecting non UTF-8 line: {e}");
                    self.executed += 1;
                    self.rejected += 1;
                    writeln!(self.out, "error")?;
                }
            }
        }
        self.out.flush()
    }

    /// Executes one line. Empty lines are skipped.
    pub fn execute_line(&mut self, line: &str) -> io::Result<()> {
        if line.is_empty() {
            return Ok(());
        }
        log::trace!("> {line}");
        self.executed += 1;
        let reply = line
            .parse::<Command>()
            .and_then(|command| apply(&mut self.tree, command));
        match reply {
            Ok(Reply::Nothing) => Ok(()),
            Ok(reply) => writeln!(self.out, "{reply}"),
            Err(e) => {
                log::debug!("{line:?}: {e}");
                self.rejected += 1;
                writeln!(self.out, "error")
            }
        }
    }
}
