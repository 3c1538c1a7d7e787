use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("{role} path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf, role: &'static str },

    #[error("file does not match group pattern `{pattern}`: {}", path.display())]
    GroupMatch { path: PathBuf, pattern: String },

    #[error("groups {first} and {second} would both be written to {}", path.display())]
    OutputCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("malformed CoNLL-U in {} at line {line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Regex error: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SampleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SampleError>;
