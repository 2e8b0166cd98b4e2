#![forbid(unsafe_code)]

use std::path::PathBuf;

use pdeck_runtime::ConfigError;
use thiserror::Error;

use crate::prop::PropError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid proposition: {0}")]
    Prop(#[from] PropError),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("script {path}:{line}: {message}")]
    Script {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("step {step}: {what} is not on screen")]
    NotOnScreen { step: usize, what: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Prop(_) | Self::InvalidArgument { .. } | Self::Script { .. } => 2,
            Self::Io(_) | Self::NotOnScreen { .. } => 1,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_exit_with_two() {
        assert_eq!(CliError::invalid("bad --hyp").exit_code(), 2);
        let err = CliError::Config(ConfigError::Validation(vec!["x".into()]));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn runtime_errors_exit_with_one() {
        let err = CliError::NotOnScreen {
            step: 3,
            what: "hypothesis H".into(),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "step 3: hypothesis H is not on screen");
    }
}
