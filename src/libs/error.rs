use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Sequence data found before the first `>` header
    #[error("Malformed sequence record in {path}: {message}")]
    Format { path: String, message: String },

    #[error("Could not open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} not found in PATH. Please install it first.")]
    AlignerNotFound(String),

    #[error("Failed to launch {program}: {source}")]
    AlignerLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    AlignerFailed {
        program: String,
        status: std::process::ExitStatus,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
