use thiserror::Error;

use crate::splay_tree::Key;

pub type Result<T> = std::result::Result<T, TreeError>;

/// Failures of a single tree operation. None of them leave the tree in a bad state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("key {0} is already in the tree")]
    DuplicateKey(Key),

    #[error("key {0} is not in the tree")]
    KeyNotFound(Key),

    #[error("tree is empty")]
    EmptyTree,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("malformed command {0:?}")]
    Malformed(String),

    #[error(transparent)]
    Tree(#[from] TreeError),
}
