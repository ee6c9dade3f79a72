pub mod command;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod splay_tree;
pub use interpreter::Interpreter;
pub use splay_tree::SplayTree;
