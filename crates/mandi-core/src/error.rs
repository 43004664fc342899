use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read snapshot file {path}: {source}")]
    SnapshotIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot file {path}: {reason}")]
    SnapshotParse { path: String, reason: String },

    #[error("invalid location reference \"{0}\"")]
    InvalidLocationRef(String),

    #[error("invalid sort key \"{0}\"")]
    InvalidSortKey(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
