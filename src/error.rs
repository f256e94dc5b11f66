use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing input file {0}")]
    MissingInput(PathBuf),

    #[error("no event table named {name:?} (available: {available})")]
    UnknownEventTable { name: String, available: String },

    #[error("empire period {index}: {reason}")]
    InvalidPeriod { index: usize, reason: String },

    #[error("no coordinates for code {0}")]
    UnknownCode(String),

    #[error("cannot read {0:?} as a \"lat,long\" pair")]
    BadCoordinate(String),

    #[error("no event with id or title {0:?}")]
    UnknownEvent(String),

    #[error("cannot serialise output: {0}")]
    Output(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
