use std::fmt;

pub type Result<T> = std::result::Result<T, MotifError>;

#[derive(Debug)]
pub enum MotifError {
    /// Malformed sequence input, reported with the 1-based line number
    InputFormat { line: usize, msg: String },
    /// Parameters that cannot be used with the given sequences
    Configuration(String),
    Io(std::io::Error),
    /// A broken sampler invariant
    Internal(String),
}

impl MotifError {
    pub fn input_format(line: usize, msg: impl Into<String>) -> Self {
        MotifError::InputFormat {
            line,
            msg: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        MotifError::Configuration(msg.into())
    }
}

impl fmt::Display for MotifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotifError::InputFormat { line, msg } => {
                write!(f, "Invalid sequence input at line {}: {}", line, msg)
            }
            MotifError::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            MotifError::Io(e) => write!(f, "I/O error: {}", e),
            MotifError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for MotifError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MotifError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MotifError {
    fn from(err: std::io::Error) -> Self {
        MotifError::Io(err)
    }
}

pub fn handle_error_and_exit(err: MotifError) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
