use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty source name, duplicate names, etc.).
    ConfigValidation(String),
    /// A source file could not be opened or parsed.
    SourceLoad { source: String, message: String },
    /// Required column not found in a source.
    MissingColumn { source: String, column: String, available: Vec<String> },
    /// IO error (file read/write).
    Io(String),
}

impl ReconError {
    pub fn source_load(source: &str, message: impl Into<String>) -> Self {
        Self::SourceLoad { source: source.into(), message: message.into() }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::SourceLoad { source, message } => {
                write!(f, "source '{source}': cannot load: {message}")
            }
            Self::MissingColumn { source, column, available } => {
                write!(f, "source '{source}': missing column '{column}'")?;
                if !available.is_empty() {
                    write!(f, " (available: {})", available.join(", "))?;
                }
                Ok(())
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
