use thiserror::Error;

pub type Result<T> = std::result::Result<T, GhstatsError>;

#[derive(Error, Debug)]
pub enum GhstatsError {
    #[error("GitHub authentication failed")]
    MissingToken,
    #[error("{0}")]
    Auth(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("GitHub API rate limit exceeded (resets at {reset})")]
    RateLimited { reset: i64 },
    #[error("GitHub API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid repository pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl GhstatsError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GhstatsError::Api { status, .. } => Some(*status),
            GhstatsError::Auth(_) => Some(401),
            GhstatsError::RateLimited { .. } => Some(403),
            GhstatsError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
