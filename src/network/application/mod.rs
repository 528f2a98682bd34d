//! # Application Layer Protocols
//!
//! Readers for application layer (OSI Layer 7) protocols that run on top of a
//! [`Connection`](crate::network::Connection).
//!
//! ## Available Protocols
//!
//! - **[`http`]**: deadline-bounded HTTP/1.x response reader
//!
//! ## Design Principles
//!
//! - **Connection Agnostic**: Work with any type implementing [`Connection`](crate::network::Connection)
//! - **No-std Compatible**: Designed for embedded systems without heap allocation
//! - **Resource Conscious**: Fixed-size buffers and bounded waits
//! - **Non-faulting**: Timeouts and short reads are reported, never panicked on

/// HTTP response reader.
///
/// Reads a status line, scans headers for `Content-Length` and collects the
/// body, each phase under its own deadline.
pub mod http;
