use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the particle field and its hosts.
///
/// The stepping core is infallible; these variants cover precondition checks at
/// construction time, configuration loading and frame output.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Configuration text could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Propagated I/O errors (config files, frame output).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(e.to_string())
    }
}
