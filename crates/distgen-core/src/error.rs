//! Error taxonomy for a generation run.
//!
//! Every error is fatal: the run aborts before any further target is
//! touched, because downstream compilation assumes full cross-file
//! consistency. There is no warning tier and no retry path.

use std::path::PathBuf;

/// Malformed or inconsistent schema input, reported with the offending key.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to parse schema manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("method key '{0}' must be of the form 'owner.name'")]
    BadMethodKey(String),

    #[error("duplicate method key '{0}'")]
    DuplicateMethod(String),

    #[error("duplicate handle '{0}'")]
    DuplicateHandle(String),

    #[error("duplicate statistic '{key}' in handle '{handle}'")]
    DuplicateStat { handle: String, key: String },

    #[error("duplicate flag '{flag}' in context '{context}'")]
    DuplicateFlag { context: String, flag: String },

    #[error("method '{key}' references undeclared flag context '{context}'")]
    UnknownFlagContext { key: String, context: String },

    #[error("duplicate config option '{name}' in method '{key}'")]
    DuplicateConfig { key: String, name: String },

    #[error("unknown tag '{tag}' on '{key}'")]
    UnknownTag { key: String, tag: String },

    #[error("method '{0}' must carry exactly one of 'returns-status' or 'returns-void'")]
    ReturnTagConflict(String),

    #[error("method '{0}' may not be both a getter and a setter")]
    AccessorTagConflict(String),

    #[error("argument '{arg}' of '{key}': declaration must contain '@S' exactly once")]
    BadPlaceholder { key: String, arg: String },

    #[error("flag context '{context}' declares {count} flags, exceeding the 32-bit flag word")]
    FlagBitOverflow { context: String, count: usize },

    #[error("target '{path}' must declare marker regions or whole-file sections, not both")]
    AmbiguousTarget { path: String },

    #[error("target '{path}': unknown section '{section}'")]
    UnknownSection { path: String, section: String },

    #[error("target '{path}': section '{section}' requires an owner")]
    MissingOwner { path: String, section: String },

    #[error("target '{path}': section '{section}' references unknown owner '{owner}'")]
    UnknownOwner {
        path: String,
        section: String,
        owner: String,
    },

    #[error("target '{path}': BEGIN and END markers must differ")]
    IdenticalMarkers { path: String },
}

/// A target file's marker pair is missing or malformed, reported with the
/// file path. Never guessed around.
#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    #[error("{path}: target file does not exist")]
    MissingTarget { path: PathBuf },

    #[error("{path}: BEGIN marker '{marker}' not found")]
    MissingBegin { path: PathBuf, marker: String },

    #[error("{path}: END marker '{marker}' not found")]
    MissingEnd { path: PathBuf, marker: String },

    #[error("{path}: marker '{marker}' appears more than once")]
    DuplicateMarker { path: PathBuf, marker: String },

    #[error("{path}: END marker '{end}' does not follow BEGIN marker '{begin}'")]
    MisorderedMarkers {
        path: PathBuf,
        begin: String,
        end: String,
    },
}

/// A formatting invariant cannot be satisfied.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("define '{name}' is too long to reach the value column")]
    DefineTooLong { name: String },
}

/// Top-level error for a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Marker(#[from] MarkerError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
