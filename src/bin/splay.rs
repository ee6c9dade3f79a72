use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use anyhow::Context;
use clap::Parser;
use flexi_logger::{DeferredNow, Logger, LoggerHandle};
use log::Record;
use splay_tree::{config::Config, Interpreter};

fn log_format(w: &mut dyn Write, now: &mut DeferredNow, record: &Record) -> io::Result<()> {
    let style = flexi_logger::style(record.level());
    write!(
        w,
        "{} {pref}[{}] {}{suf}",
        now.format("%H:%M:%S"),
        &record.level().as_str()[0..1],
        record.args(),
        pref = style.prefix(),
        suf = style.suffix(),
    )
}

fn init_logger(spec: &str) -> anyhow::Result<LoggerHandle> {
    // stdout carries the replies, so logs go to stderr.
    let handle = Logger::try_with_str(spec)
        .with_context(|| format!("invalid log specification {spec:?}"))?
        .log_to_stderr()
        .set_palette("196;208;3;7;8".to_owned())
        .format(log_format)
        .start()?;
    Ok(handle)
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let _logger = init_logger(&config.log)?;
    let mut interpreter = Interpreter::new(BufWriter::new(io::stdout().lock()));
    match &config.input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            interpreter.run(BufReader::new(file))?;
        }
        None => interpreter.run(io::stdin().lock())?,
    }
    log::info!(
        "ran {} commands, {} rejected, {} keys left",
        interpreter.executed(),
        interpreter.rejected(),
        interpreter.tree().len()
    );
    Ok(())
}
