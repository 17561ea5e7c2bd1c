//! Error types for the deckwright library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deckwright operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while inspecting, editing, or verifying a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not an Office Open XML package.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The package is a valid OOXML file but not a presentation.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading or writing the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the document.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// A slide index outside the presentation was requested.
    #[error("Slide index {index} out of range; total slides: {count}")]
    SlideOutOfRange {
        /// Requested index (0-based)
        index: usize,
        /// Number of slides in the presentation
        count: usize,
    },

    /// A shape reference did not match any shape on the slide.
    #[error("Shape {shape} not found on slide {slide}")]
    ShapeNotFound {
        /// Slide number (1-based, as shown in summaries)
        slide: usize,
        /// Shape id or label
        shape: String,
    },

    /// An image could not be read or is in an unsupported format.
    #[error("Image error: {0}")]
    Image(String),

    /// The application lock marker for the document exists.
    #[error(
        "the presentation appears to be open in PowerPoint (lock file {}); close it and retry",
        .0.display()
    )]
    Locked(PathBuf),

    /// The document cannot be opened for writing.
    #[error("the presentation is in use by another program: {}", .0.display())]
    InUse(PathBuf),

    /// A conversion engine could not render the document.
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A model request failed at the HTTP or API level.
    #[error("Model request failed: {message}")]
    Model {
        /// Error description
        message: String,
        /// HTTP status, when the server answered
        status: Option<u16>,
    },

    /// The edit-generation request failed.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The generated edit plan could not be parsed, validated, or applied.
    #[error("Edit plan rejected: {0}")]
    Plan(String),

    /// The verification request failed.
    #[error("Verification failed: {0}")]
    Verification(String),
}

impl Error {
    /// Returns true when the error leaves the CLI loop usable.
    ///
    /// Only configuration errors are fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Config(_))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Plan(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        Error::Model { message, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(err.to_string(), "Unknown file format");

        let err = Error::SlideOutOfRange { index: 5, count: 2 };
        assert_eq!(err.to_string(), "Slide index 5 out of range; total slides: 2");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_only_config_is_fatal() {
        assert!(!Error::Config("GOOGLE_API_KEY".into()).is_recoverable());
        assert!(Error::Plan("bad json".into()).is_recoverable());
        assert!(Error::Locked(PathBuf::from("~$deck.pptx")).is_recoverable());
    }
}
