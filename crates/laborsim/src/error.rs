/// Errors raised while reading configurations or writing datasets
#[derive(Debug)]
pub enum DataError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Io(msg) => write!(f, "IO error: {}", msg),
            DataError::Parse(msg) => write!(f, "Parse error: {}", msg),
            DataError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for DataError {}
