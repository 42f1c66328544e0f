//! Model lookup errors.

use thiserror::Error;

/// A malformed reference into the build model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown tool `{0}`")]
    UnknownTool(String),

    #[error("unknown tool-chain `{0}`")]
    UnknownToolChain(String),

    #[error("unknown configuration `{0}`")]
    UnknownConfiguration(String),

    #[error("configuration `{configuration}` has no resource info for `{path}`")]
    UnknownResource { configuration: String, path: String },

    #[error("resource `{0}` is not a folder")]
    NotAFolder(String),

    #[error("configuration `{0}` has no root folder")]
    MissingRootFolder(String),

    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
}
