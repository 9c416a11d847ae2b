// Error types shared by the library modules.
//
// Only two things can go wrong once a request is on its way: the transport
// fails (or the server answers with a non-2xx status) or the body is not
// JSON. Both carry the raw text so the UI can show it verbatim.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single prediction request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PredictError {
    /// Connection refused, DNS failure, non-2xx status...
    #[error("prediction request failed: {0}")]
    Network(String),
    /// The service answered 2xx but the body is not valid JSON. Holds the body.
    #[error("prediction response is not JSON: {0}")]
    Decode(String),
}

/// Failure to turn a path on disk into an upload.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Raised when the menu asks for a submission the session cannot make.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("no file has been chosen yet")]
    NoAsset,
    #[error("the chosen file was rejected, choose a .wav file")]
    NotValidated,
}
