//! Deadline-bounded line reading.

use core::task::Poll;

use heapless::Vec;

use crate::fmt::trace;
use crate::network::Connection;
#[cfg(feature = "async")]
use crate::time::AsyncClock;
use crate::time::{Clock, Deadline};

/// Default timeout for a standalone [`read_line`] call.
pub const DEFAULT_LINE_TIMEOUT_MS: u32 = 100;

/// Default pause between polls when no byte is available.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1;

/// Default capacity of a single line.
pub const DEFAULT_MAX_LINE_LEN: usize = 256;

/// Most bytes a single [`LineReader::poll`] consumes before handing control
/// back, so that a peer which never stops sending cannot keep the caller from
/// reading its clock.
pub const MAX_BYTES_PER_POLL: usize = 64;

const LF: u8 = b'\n';
const CR: u8 = b'\r';

/// A line read from a connection.
///
/// A line is either complete (it ends with `\n`), cut short because the
/// deadline expired, or empty because nothing arrived at all.
///
/// At most `N` bytes are kept. If a longer line arrives, the reader keeps
/// consuming it up to the terminator but drops the excess, and the line is
/// marked as truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line<const N: usize> {
    bytes: Vec<u8, N>,
    terminated: bool,
    truncated: bool,
}

impl<const N: usize> Line<N> {
    /// Creates an empty line.
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            terminated: false,
            truncated: false,
        }
    }

    /// The raw bytes, including the terminator if one was seen.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The line as UTF-8, if it is valid.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    /// Number of bytes kept.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if no byte was received.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns `true` if the line ends with `\n`.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Returns `true` if bytes were dropped because the line exceeded `N`.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Returns `true` for a bare terminator, `"\n"` or `"\r\n"`.
    ///
    /// In an HTTP response this separates the headers from the body.
    pub fn is_blank(&self) -> bool {
        matches!(self.as_bytes(), [LF] | [CR, LF])
    }

    /// The line without its trailing `\r\n` or `\n`.
    pub fn trimmed(&self) -> &[u8] {
        let mut bytes = self.as_bytes();
        if let [rest @ .., LF] = bytes {
            bytes = rest;
        }
        if let [rest @ .., CR] = bytes {
            bytes = rest;
        }
        bytes
    }

    fn push(&mut self, byte: u8) {
        if byte == LF {
            self.terminated = true;
            if self.bytes.is_full() {
                // Keep the terminator so a truncated line still reads as complete.
                self.bytes.pop();
                self.truncated = true;
            }
        }
        if self.bytes.push(byte).is_err() {
            self.truncated = true;
        }
    }
}

/// Incremental line reader.
///
/// Each call to [`poll`](LineReader::poll) consumes whatever bytes the
/// connection has ready and returns without waiting. Drive it with
/// [`read_line`], or step it from your own event loop.
#[derive(Debug)]
pub struct LineReader<const N: usize> {
    line: Line<N>,
    deadline: Deadline,
}

impl<const N: usize> LineReader<N> {
    /// Starts reading a line that must arrive within `timeout_ms` of `now`.
    pub const fn new(now: u64, timeout_ms: u32) -> Self {
        Self {
            line: Line::new(),
            deadline: Deadline::new(now, timeout_ms),
        }
    }

    /// Advances the read.
    ///
    /// Returns `Poll::Ready` as soon as a `\n` has been consumed, or with
    /// whatever was accumulated once the deadline has expired. Bytes past the
    /// terminator are left in the connection.
    ///
    /// At most [`MAX_BYTES_PER_POLL`] bytes are consumed per call; `Pending`
    /// is returned once that many have been read without a terminator, even
    /// if more are available.
    pub fn poll<C: Connection>(&mut self, connection: &mut C, now: u64) -> Poll<Line<N>> {
        if self.deadline.has_expired(now) {
            trace!("line deadline expired after {} bytes", self.line.len());
            return Poll::Ready(core::mem::take(&mut self.line));
        }

        for _ in 0..MAX_BYTES_PER_POLL {
            if !connection.available() {
                break;
            }
            let Some(byte) = connection.read_byte() else {
                break;
            };
            self.line.push(byte);
            if byte == LF {
                return Poll::Ready(core::mem::take(&mut self.line));
            }
        }

        Poll::Pending
    }
}

/// Reads one line from `connection`, giving up after `timeout_ms`.
///
/// The returned line may be empty (nothing arrived), unterminated (the
/// deadline hit mid-line) or complete. Timeouts are not errors; inspect
/// [`Line::is_empty`] and [`Line::is_terminated`].
///
/// While waiting, the clock's [`delay_ms`](Clock::delay_ms) is called with
/// [`DEFAULT_POLL_INTERVAL_MS`].
pub fn read_line<const N: usize, C, K>(connection: &mut C, clock: &mut K, timeout_ms: u32) -> Line<N>
where
    C: Connection,
    K: Clock,
{
    let mut reader = LineReader::<N>::new(clock.now_ms(), timeout_ms);
    loop {
        match reader.poll(connection, clock.now_ms()) {
            Poll::Ready(line) => return line,
            Poll::Pending => clock.delay_ms(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// Asynchronous version of [`read_line`].
#[cfg(feature = "async")]
pub async fn read_line_async<const N: usize, C, K>(
    connection: &mut C,
    clock: &mut K,
    timeout_ms: u32,
) -> Line<N>
where
    C: Connection,
    K: AsyncClock,
{
    let mut reader = LineReader::<N>::new(clock.now_ms(), timeout_ms);
    loop {
        match reader.poll(connection, clock.now_ms()) {
            Poll::Ready(line) => return line,
            Poll::Pending => clock.delay_ms(DEFAULT_POLL_INTERVAL_MS).await,
        }
    }
}
