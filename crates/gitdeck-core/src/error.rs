//! Error types for gitdeck-core.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitdeck-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend could not be reached or answered with an error.
    #[error("{}", .0.message())]
    Remote(#[from] gitdeck_remote::Error),

    /// A response carried a status tag outside the documented set.
    #[error("unexpected {operation} status: {status}")]
    UnknownStatus {
        /// Operation family that produced the tag.
        operation: &'static str,
        /// The raw tag.
        status: String,
    },

    /// A failed response carried no status tag at all.
    #[error("{operation} failed without a status")]
    MissingStatus { operation: &'static str },

    /// The status endpoint reported a file state outside the documented set.
    #[error("unknown file state '{state}' for {path}")]
    UnknownFileState { path: String, state: String },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
