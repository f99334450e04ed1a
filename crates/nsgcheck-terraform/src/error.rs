use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{binary} output exited with code {code}: {stderr}")]
    CommandFailed {
        binary: String,
        code: i32,
        stderr: String,
    },

    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse terraform output json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("output '{key}' missing from terraform output")]
    MissingKey { key: String },

    #[error("output '{key}' is not a {expected}")]
    WrongShape { key: String, expected: &'static str },
}
