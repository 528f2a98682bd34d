//! HTTP/1.x response reading for polled, non-blocking connections.
//!
//! This module reads the response to a request the caller has already sent.
//! It is built for single-threaded firmware where the network stack hands out
//! bytes one at a time and a stalled peer must never hang the device:
//!
//! - Every wait is bounded by a [`Deadline`](crate::time::Deadline), checked on
//!   every iteration.
//! - Waiting yields through [`Clock::delay_ms`](crate::time::Clock::delay_ms)
//!   instead of spinning.
//! - Line and body buffers have fixed capacities.
//!
//! Two framings are supported: an explicit `Content-Length`, or a body that
//! runs until the peer closes the connection. Chunked transfer encoding,
//! status code interpretation and connection reuse are out of scope.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pollhttp::network::application::http::{Options, read_response_body};
//! # use pollhttp::network::Connection;
//! # use pollhttp::time::Clock;
//! # struct Socket;
//! # impl Connection for Socket {
//! #     fn available(&mut self) -> bool { false }
//! #     fn read_byte(&mut self) -> Option<u8> { None }
//! #     fn is_connected(&mut self) -> bool { false }
//! # }
//! # struct Board;
//! # impl Clock for Board {
//! #     fn now_ms(&self) -> u64 { 0 }
//! #     fn delay_ms(&mut self, _ms: u32) {}
//! # }
//!
//! let mut socket = Socket;
//! let mut board = Board;
//!
//! let response = read_response_body::<512, _, _>(&mut socket, &mut board, &Options::default());
//! if response.is_success() {
//!     // use response.as_bytes()
//! }
//! ```

/// Content-length header recognition.
pub mod header;

/// Deadline-bounded line reading.
pub mod line;

/// Deadline-bounded response body reading.
pub mod response;

#[cfg(feature = "async")]
pub use line::read_line_async;
pub use line::{
    DEFAULT_LINE_TIMEOUT_MS, DEFAULT_MAX_LINE_LEN, DEFAULT_POLL_INTERVAL_MS, Line, LineReader,
    MAX_BYTES_PER_POLL, read_line,
};
#[cfg(feature = "async")]
pub use response::read_response_body_async;
pub use response::{
    DEFAULT_MAX_BODY_LEN, DEFAULT_RESPONSE_TIMEOUT_MS, Options, Outcome, ResponseBody,
    ResponseReader, read_response_body,
};
