use std::path::PathBuf;
use thiserror::Error;

/// Failures the shell knows how to recover from. None of them stops the process.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("window state store at {} is unavailable: {reason}", path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    #[error("cannot parse navigation target {url:?}: {reason}")]
    MalformedNavigationTarget { url: String, reason: String },

    #[error("no displays reported")]
    NoDisplaysReported,

    #[error("window operation failed: {0}")]
    Window(String),
}

impl ShellError {
    pub fn store(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StoreUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
