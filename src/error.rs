
use thiserror::Error;

use crate::assembler::Issue;

#[derive(Error, Debug)]
pub enum LpformError {
    #[error("Invalid model: {}", summary(.issues))]
    InvalidModel { issues: Vec<Issue> },
    #[error("A submission is already in flight")]
    Busy,
    #[error("Solver unreachable: {0}")]
    Transport(String),
    #[error("Solver answered {status}: {message}")]
    SolverStatus { status: u16, message: String },
    #[error("Unexpected solver response: {0}")]
    MalformedResponse(String),
    #[error("Solver reported: {0}")]
    Solver(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LpformError>;

fn summary(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl LpformError {
    /// Problems with the submitted text, as opposed to the round trip to the solver.
    pub fn is_invalid_model(&self) -> bool {
        matches!(self, Self::InvalidModel { .. })
    }

    /// Whether the failure happened on the way to or from the solver.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::SolverStatus { .. } | Self::MalformedResponse(_) | Self::Solver(_)
        )
    }

    /// The one-line message shown to a user in place of a result.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidModel { .. } => "invalid model",
            Self::Busy => "A problem is already being solved.",
            _ if self.is_transport() => "An error occurred while solving the problem.",
            _ => "Internal error.",
        }
    }
}

// Helper conversions
impl From<reqwest::Error> for LpformError {
    fn from(e: reqwest::Error) -> Self { Self::Transport(e.to_string()) }
}
impl From<config::ConfigError> for LpformError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
