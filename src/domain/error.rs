use std::path::PathBuf;
use thiserror::Error;

/// splist unified error type
#[derive(Error, Debug)]
pub enum ListerError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Authentication error: {message}")]
    Auth { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Rate limited while calling {endpoint}{}", retry_hint(.retry_after))]
    RateLimit {
        endpoint: String,
        retry_after: Option<u64>,
    },

    #[error("API error{}: {body}", status_hint(.status))]
    Api { status: Option<u16>, body: String },

    #[error("I/O error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!(" (retry after {}s)", secs),
        None => String::new(),
    }
}

fn status_hint(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl ListerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Short category name printed alongside the message on stderr
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Auth { .. } => "auth",
            Self::NotFound { .. } => "not-found",
            Self::RateLimit { .. } => "rate-limit",
            Self::Api { .. } => "api",
            Self::Io { .. } => "io",
        }
    }

    /// Process exit status for this error category
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Auth { .. } => 3,
            Self::NotFound { .. } => 4,
            Self::RateLimit { .. } => 5,
            Self::Api { .. } => 6,
            Self::Io { .. } => 7,
        }
    }
}

pub type ListerResult<T> = Result<T, ListerError>;
