use thiserror::Error;
use std::io; // Import std::io

/// Unified error type for the crayxc-log library.
///
/// End-of-stream is not an error: decode paths return `Ok(None)` for an
/// absent module, a version-0 stream, or a short read.
#[derive(Error, Debug)]
pub enum Error {
    /// The stream declares a format version this codec cannot decode.
    #[error("Unsupported Version: format version {version} (current is {current})")]
    UnsupportedVersion { version: u32, current: u32 },

    /// The container reported a hard read or write failure.
    #[error("IO Error: {0}")]
    IoError(#[source] io::Error),

    /// A record buffer of the given size could not be reserved.
    #[error("Allocation Error: could not reserve {0} bytes for a record buffer")]
    AllocationError(usize),

    /// Error related to record encoding/decoding.
    #[error("Codec Error: {0}")]
    CodecError(String),

    /// Error related to the module registry.
    #[error("Module Error: {0}")]
    ModuleError(String),
}

impl Error {
    /// Whether the error should abort a report run.
    ///
    /// An unsupported version only drops the module's data from the report.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::UnsupportedVersion { .. })
    }
}

/// A specialized `Result` type for crayxc-log operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IoError(err)
    }
}
