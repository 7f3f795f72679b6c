use std::fmt;

/// Errors raised while reading a track or writing its summaries
#[derive(Debug)]
pub enum TrackError {
    /// I/O errors
    Io(std::io::Error),
    /// Malformed JSON input or output
    #[cfg(feature = "json")]
    Json(serde_json::Error),
    /// CSV writer errors
    #[cfg(feature = "csv")]
    Csv(csv::Error),
    /// FIT data the decoder rejected
    Fit(String),
    /// A required data stream is absent from the input
    MissingStream(String),
    /// Input file type has no point source
    UnsupportedFormat(String),
    /// Rejected configuration value
    InvalidConfig(String),
    /// Export format error
    Export(String),
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackError::Io(err) => write!(f, "I/O error: {}", err),
            #[cfg(feature = "json")]
            TrackError::Json(err) => write!(f, "JSON error: {}", err),
            #[cfg(feature = "csv")]
            TrackError::Csv(err) => write!(f, "CSV error: {}", err),
            TrackError::Fit(msg) => write!(f, "FIT decoding error: {}", msg),
            TrackError::MissingStream(name) => write!(f, "Missing '{}' stream", name),
            TrackError::UnsupportedFormat(ext) => write!(f, "Unsupported input format: {}", ext),
            TrackError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            TrackError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for TrackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackError::Io(err) => Some(err),
            #[cfg(feature = "json")]
            TrackError::Json(err) => Some(err),
            #[cfg(feature = "csv")]
            TrackError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TrackError {
    fn from(err: std::io::Error) -> Self {
        TrackError::Io(err)
    }
}

impl From<fitparser::Error> for TrackError {
    fn from(err: fitparser::Error) -> Self {
        TrackError::Fit(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for TrackError {
    fn from(err: serde_json::Error) -> Self {
        TrackError::Json(err)
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for TrackError {
    fn from(err: csv::Error) -> Self {
        TrackError::Csv(err)
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
