//! A network abstraction layer for polled byte connections
//!
//! Many embedded network stacks (Wi-Fi co-processors, TLS offload modules,
//! UART modems) expose a socket as three primitives: "is a byte ready",
//! "read one byte" and "is the peer still there". This module models exactly
//! that, so the readers in [`application`] never block inside the stack and can
//! bound every wait with a deadline.
//!

#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Application layer protocol readers
pub mod application;

/// Adapter for `std::net::TcpStream`
#[cfg(feature = "std")]
pub mod tcp;

/// Re-exports of common traits
pub mod prelude {
    pub use super::Connection;
}

/// A byte-oriented, non-blocking connection.
///
/// Readers borrow a connection for the duration of a single call and never
/// open, close or retain it.
pub trait Connection {
    /// Returns `true` if at least one byte can be read without blocking.
    fn available(&mut self) -> bool;

    /// Reads one byte. Returns `None` if no byte is currently available.
    fn read_byte(&mut self) -> Option<u8>;

    /// Returns `true` while the underlying transport is open.
    ///
    /// A closed connection may still have buffered bytes; those remain
    /// reachable through [`available`](Connection::available).
    fn is_connected(&mut self) -> bool;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn available(&mut self) -> bool {
        (**self).available()
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn is_connected(&mut self) -> bool {
        (**self).is_connected()
    }
}
