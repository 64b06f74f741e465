use std::any::Any;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while setting up or running a scenario.
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("failed to spawn thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("thread '{name}' panicked: {message}")]
    Panicked { name: String, message: String },

    #[error("failed to read config file {path:?}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl DemoError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DemoError>;

/// Best-effort text of a panic payload as returned by `JoinHandle::join`.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_from_str_and_string() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*payload), "boom");

        let payload: Box<dyn Any + Send> = Box::new(format!("code {}", 7));
        assert_eq!(panic_message(&*payload), "code 7");

        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(&*payload), "non-string panic payload");
    }

    #[test]
    fn test_error_display() {
        let err = DemoError::Panicked {
            name: "ticker".into(),
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "thread 'ticker' panicked: boom");

        let err = DemoError::invalid_config("counter.ticker.iterations", "must be at least 1");
        assert!(err.to_string().contains("counter.ticker.iterations"));
    }
}
