use std::fmt;

#[derive(Debug)]
pub enum HelperError {
    KvStore(String),
    Serialization(String),
    IO(String),
    Transport(String),
    NotLoggedIn,
}

impl fmt::Display for HelperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelperError::KvStore(e) => write!(f, "KV store error: {}", e),
            HelperError::Serialization(e) => write!(f, "Serialization error: {}", e),
            HelperError::IO(e) => write!(f, "IO error: {}", e),
            HelperError::Transport(e) => write!(f, "Transport error: {}", e),
            HelperError::NotLoggedIn => write!(f, "Not logged in"),
        }
    }
}

impl std::error::Error for HelperError {}

impl From<std::io::Error> for HelperError {
    fn from(error: std::io::Error) -> Self {
        HelperError::IO(error.to_string())
    }
}

impl From<serde_json::Error> for HelperError {
    fn from(error: serde_json::Error) -> Self {
        HelperError::Serialization(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HelperError>;
