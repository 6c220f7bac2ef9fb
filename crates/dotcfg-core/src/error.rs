use std::path::PathBuf;

use thiserror::Error;

use crate::model::NodeKind;

/// Every failure a config operation can report. Nothing is retried or recovered
/// internally; the caller always sees the first error hit.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing key")]
    MissingKey,

    #[error("no field with name {0:?}")]
    NoFieldWithName(String),

    #[error("no entry found with key: {0:?}")]
    NoEntryFound(String),

    #[error("index ({0}) is out of range")]
    IndexOutOfRange(String),

    #[error("can't step into a {kind} via {segment:?}")]
    CannotStepInto { kind: NodeKind, segment: String },

    #[error("unsupported type: {0}")]
    UnsupportedType(NodeKind),

    #[error("error converting {input:?} to an int: {source}")]
    Parse {
        input: String,
        source: std::num::ParseIntError,
    },

    #[error("no file defined")]
    NoFileBound,

    #[error("error reading file({path}): {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error writing file({path}): {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("missing file")]
    MissingFile,

    #[error("invalid config data at {location}: {message}")]
    StructuralParse { location: String, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
