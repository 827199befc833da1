use thiserror::Error;

/// Failures talking to the exam portal.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Portal request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid credentials or captcha")]
    InvalidCredentials,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid portal URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, PortalError>;
