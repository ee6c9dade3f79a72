use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Runs splay tree commands read line by line", long_about = None)]
pub struct Config {
    #[arg(short, long, help = "Read commands from this file instead of standard input")]
    pub input: Option<PathBuf>,

    #[arg(
        long,
        env = "RUST_LOG",
        default_value = "warn",
        help = "Log specification, e.g. `debug` or `splay_tree::splay_tree=trace`. Logs go to stderr"
    )]
    pub log: String,
}
