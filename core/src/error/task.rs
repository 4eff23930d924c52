use thiserror::Error;

/// Failure raised from inside a task body. The runner turns it into a
/// failed leaf carrying the error as its exception.
#[derive(Error, Debug, Clone)]
pub enum TaskError {
    #[error("missing argument '{0}'")]
    MissingArgument(String),

    #[error("invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    #[error("command failed: {0}")]
    Command(String),

    #[error("{0}")]
    Other(String),
}

impl TaskError {
    /// Short type label shown in the rendered exception block.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingArgument(_) => "MissingArgument",
            Self::InvalidArgument { .. } => "InvalidArgument",
            Self::Command(_) => "CommandError",
            Self::Other(_) => "TaskError",
        }
    }
}

impl From<std::io::Error> for TaskError {
    fn from(err: std::io::Error) -> Self {
        Self::Command(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("failed to read plan {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse plan {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("unknown task module '{0}'")]
    UnknownModule(String),

    #[error("invalid task argument '{0}' (expected key=value)")]
    InvalidArgument(String),

    #[error("plan has no tasks")]
    Empty,
}
