//! Common error types for network operations

/// A common error type for network operations.
///
/// This enum defines the ways a response read can fail. It is designed to be
/// simple and portable for `no_std` environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Nothing at all was received before the status line timed out.
    NoResponse,
    /// The body ended before the declared `Content-Length` was reached.
    Truncated,
    /// No `Content-Length` was declared and no body byte arrived.
    EmptyBody,
    /// The response did not fit in the caller's buffer.
    BufferFull,
    /// A connection attempt was refused.
    ConnectionRefused,
    /// An error occurred during a write operation.
    WriteError,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::NoResponse => "no response received",
            Error::Truncated => "body shorter than declared content length",
            Error::EmptyBody => "empty body",
            Error::BufferFull => "response exceeds buffer capacity",
            Error::ConnectionRefused => "connection refused",
            Error::WriteError => "write error",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NoResponse => defmt::write!(f, "NoResponse"),
            Error::Truncated => defmt::write!(f, "Truncated"),
            Error::EmptyBody => defmt::write!(f, "EmptyBody"),
            Error::BufferFull => defmt::write!(f, "BufferFull"),
            Error::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            Error::WriteError => defmt::write!(f, "WriteError"),
        }
    }
}
