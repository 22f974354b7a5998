// core/src/error.rs
//
// Typed error taxonomy for the transliteration core.
//
// "Not a syllable" and "no synthesis rule" are deliberately not variants:
// both are typed `None` results from the codec. A `None` from `synthesize`
// inside the enumerated 19x21x28 domain would indicate a defect in the
// static tables and is logged by callers, never raised.

use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// Caller-correctable validation failure (e.g. empty hangul/kana on an
    /// exception addition). Surfaces to the caller.
    InvalidArgument(String),
    /// The external phonological normalizer errored or returned unusable
    /// output. Swallowed at the pipeline boundary.
    NormalizerFailure(String),
    /// Durable store access failed.
    Io(std::io::Error),
    /// Durable store contents could not be parsed.
    Parse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::NormalizerFailure(msg) => write!(f, "normalizer failure: {}", msg),
            Error::Io(err) => write!(f, "io error: {}", err),
            Error::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
