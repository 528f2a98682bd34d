//! Deadline-bounded HTTP/1.x response body reading.
//!
//! The reader walks a response in a single pass:
//!
//! 1. **Status line.** Read with the status timeout, then discarded. If not a
//!    single byte arrives, the read fails with [`Outcome::NoResponse`].
//! 2. **Headers.** An outer deadline of `header_timeout_ms` starts when the
//!    status line is done. Each header line is then read with its own fresh
//!    `line_timeout_ms`, and the outer deadline is only checked between lines.
//!    Worst-case time spent in this phase is therefore
//!    `header_timeout_ms + line_timeout_ms`. The phase ends at a blank line, an
//!    empty read, or the outer deadline; none of these is an error.
//! 3. **Body.** A fresh `body_timeout_ms` deadline. With a `Content-Length`,
//!    exactly that many bytes are read; without one, bytes are read until the
//!    peer closes and nothing is left buffered.
//!
//! Failures never interrupt the caller. They come back as an [`Outcome`]
//! alongside whatever part of the body was received.

use core::task::Poll;

use heapless::Vec;

use super::header;
use super::line::{DEFAULT_MAX_LINE_LEN, DEFAULT_POLL_INTERVAL_MS, Line, LineReader};
use crate::fmt::{debug, trace, warning};
use crate::network::Connection;
use crate::network::error::Error;
#[cfg(feature = "async")]
use crate::time::AsyncClock;
use crate::time::{Clock, Deadline};

/// Default timeout for every phase of [`read_response_body`].
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u32 = 500;

/// Default body capacity.
pub const DEFAULT_MAX_BODY_LEN: usize = 2048;

/// Timeouts for a response read.
///
/// Each phase gets its own deadline, computed when the phase starts. Time
/// spent in an earlier phase is not deducted from a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Time allowed for the status line.
    pub status_timeout_ms: u32,
    /// Time allowed for each individual header line.
    pub line_timeout_ms: u32,
    /// Time after which no new header line is started.
    pub header_timeout_ms: u32,
    /// Time allowed for the whole body.
    pub body_timeout_ms: u32,
    /// Pause between polls while no byte is available.
    pub poll_interval_ms: u32,
}

impl Options {
    /// Uses `timeout_ms` for every phase.
    pub const fn uniform(timeout_ms: u32) -> Self {
        Self {
            status_timeout_ms: timeout_ms,
            line_timeout_ms: timeout_ms,
            header_timeout_ms: timeout_ms,
            body_timeout_ms: timeout_ms,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::uniform(DEFAULT_RESPONSE_TIMEOUT_MS)
    }
}

/// How a response read ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The body is complete: the declared length was reached, or the peer
    /// closed after sending at least one byte.
    Complete,
    /// Nothing was received before the status line timed out.
    NoResponse,
    /// The deadline passed before the declared length was reached.
    Truncated {
        /// The declared `Content-Length`.
        declared: usize,
        /// Bytes actually received.
        received: usize,
    },
    /// No length was declared and no body byte arrived before the peer closed
    /// or the deadline passed.
    Empty,
    /// The body did not fit in the buffer. The buffer holds the first
    /// `capacity` bytes.
    Overflow {
        /// The buffer capacity.
        capacity: usize,
    },
}

impl Outcome {
    /// Returns `true` only for [`Outcome::Complete`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Complete)
    }

    /// The network error corresponding to a failed read.
    pub fn error(&self) -> Option<Error> {
        match self {
            Outcome::Complete => None,
            Outcome::NoResponse => Some(Error::NoResponse),
            Outcome::Truncated { .. } => Some(Error::Truncated),
            Outcome::Empty => Some(Error::EmptyBody),
            Outcome::Overflow { .. } => Some(Error::BufferFull),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Outcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Outcome::Complete => defmt::write!(f, "Complete"),
            Outcome::NoResponse => defmt::write!(f, "NoResponse"),
            Outcome::Truncated { declared, received } => {
                defmt::write!(f, "Truncated({=usize}/{=usize})", received, declared)
            }
            Outcome::Empty => defmt::write!(f, "Empty"),
            Outcome::Overflow { capacity } => defmt::write!(f, "Overflow({=usize})", capacity),
        }
    }
}

/// The result of a response read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody<const N: usize> {
    /// The body bytes received, possibly partial.
    pub body: Vec<u8, N>,
    /// How the read ended.
    pub outcome: Outcome,
    /// The last `Content-Length` successfully parsed from the headers.
    pub content_length: Option<usize>,
}

impl<const N: usize> ResponseBody<N> {
    /// Returns `true` if the body is complete.
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// The body bytes received.
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    /// The body as UTF-8, if it is valid.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.body).ok()
    }

    /// Converts into a `Result`, dropping partial data on failure.
    pub fn into_result(self) -> Result<Vec<u8, N>, Error> {
        match self.outcome.error() {
            None => Ok(self.body),
            Some(err) => Err(err),
        }
    }
}

#[derive(Debug)]
enum Phase<const L: usize> {
    StatusLine(LineReader<L>),
    Headers {
        deadline: Deadline,
        line: Option<LineReader<L>>,
    },
    Body(Deadline),
    Done(Outcome),
}

/// Incremental response reader.
///
/// `L` bounds a single status or header line and `N` bounds the body. Each
/// call to [`poll`](ResponseReader::poll) does a bounded amount of work and
/// returns without waiting: at most one header line is consumed per call.
#[derive(Debug)]
pub struct ResponseReader<const L: usize, const N: usize> {
    options: Options,
    phase: Phase<L>,
    content_length: Option<usize>,
    body: Vec<u8, N>,
}

impl<const L: usize, const N: usize> ResponseReader<L, N> {
    /// Starts reading a response at `now`.
    pub fn new(options: Options, now: u64) -> Self {
        Self {
            options,
            phase: Phase::StatusLine(LineReader::new(now, options.status_timeout_ms)),
            content_length: None,
            body: Vec::new(),
        }
    }

    /// The options this reader was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Advances the read.
    ///
    /// Returns `Poll::Pending` when the reader is waiting for more bytes; the
    /// caller should yield for [`Options::poll_interval_ms`] and poll again.
    /// Once `Poll::Ready` has been returned, further polls return the same
    /// outcome with an empty body.
    pub fn poll<C: Connection>(&mut self, connection: &mut C, now: u64) -> Poll<ResponseBody<N>> {
        loop {
            match &mut self.phase {
                Phase::StatusLine(reader) => {
                    let Poll::Ready(line) = reader.poll(connection, now) else {
                        return Poll::Pending;
                    };
                    if line.is_empty() {
                        warning!("no status line received");
                        return Poll::Ready(self.finish(Outcome::NoResponse));
                    }
                    debug!("status line received ({} bytes)", line.len());
                    self.phase = Phase::Headers {
                        deadline: Deadline::new(now, self.options.header_timeout_ms),
                        line: None,
                    };
                }
                Phase::Headers { deadline, line } => {
                    if line.is_none() && deadline.has_expired(now) {
                        debug!("header deadline expired before blank line");
                        self.enter_body(now);
                        continue;
                    }
                    let line_timeout_ms = self.options.line_timeout_ms;
                    let reader = line.get_or_insert_with(|| LineReader::new(now, line_timeout_ms));
                    let Poll::Ready(header_line) = reader.poll(connection, now) else {
                        return Poll::Pending;
                    };
                    *line = None;
                    if header_line.is_empty() || header_line.is_blank() {
                        debug!("header scan finished with {} ms to spare", deadline.remaining(now));
                        self.enter_body(now);
                        continue;
                    }
                    self.inspect_header(&header_line);
                    // Hand back after every header so the caller samples the clock again.
                    return Poll::Pending;
                }
                Phase::Body(deadline) => {
                    let deadline = *deadline;
                    return match self.content_length {
                        Some(declared) => self.poll_sized_body(connection, now, deadline, declared),
                        None => self.poll_body_until_close(connection, now, deadline),
                    };
                }
                Phase::Done(outcome) => {
                    return Poll::Ready(ResponseBody {
                        body: Vec::new(),
                        outcome: *outcome,
                        content_length: self.content_length,
                    });
                }
            }
        }
    }

    fn inspect_header(&mut self, line: &Line<L>) {
        trace!("header line ({} bytes)", line.len());
        if let Some(length) = header::content_length(line.trimmed()) {
            debug!("content length {}", length);
            self.content_length = Some(length);
        }
    }

    fn enter_body(&mut self, now: u64) {
        if let Some(length) = self.content_length {
            if length > N {
                warning!("declared length {} exceeds body capacity {}", length, N);
            }
        }
        self.phase = Phase::Body(Deadline::new(now, self.options.body_timeout_ms));
    }

    fn poll_sized_body<C: Connection>(
        &mut self,
        connection: &mut C,
        now: u64,
        deadline: Deadline,
        declared: usize,
    ) -> Poll<ResponseBody<N>> {
        if self.body.len() >= declared {
            return Poll::Ready(self.finish(Outcome::Complete));
        }
        if deadline.has_expired(now) {
            let received = self.body.len();
            warning!("body truncated: {} of {} bytes", received, declared);
            return Poll::Ready(self.finish(Outcome::Truncated { declared, received }));
        }

        while self.body.len() < declared && connection.available() {
            let Some(byte) = connection.read_byte() else {
                break;
            };
            if self.body.push(byte).is_err() {
                return Poll::Ready(self.overflow());
            }
        }

        if self.body.len() >= declared {
            Poll::Ready(self.finish(Outcome::Complete))
        } else {
            Poll::Pending
        }
    }

    fn poll_body_until_close<C: Connection>(
        &mut self,
        connection: &mut C,
        now: u64,
        deadline: Deadline,
    ) -> Poll<ResponseBody<N>> {
        let open = connection.is_connected() || connection.available();
        if !open || deadline.has_expired(now) {
            let outcome = if self.body.is_empty() {
                warning!("no body received");
                Outcome::Empty
            } else {
                Outcome::Complete
            };
            return Poll::Ready(self.finish(outcome));
        }

        while connection.available() {
            let Some(byte) = connection.read_byte() else {
                break;
            };
            if self.body.push(byte).is_err() {
                return Poll::Ready(self.overflow());
            }
        }

        Poll::Pending
    }

    fn overflow(&mut self) -> ResponseBody<N> {
        warning!("body exceeds capacity of {} bytes", N);
        self.finish(Outcome::Overflow { capacity: N })
    }

    fn finish(&mut self, outcome: Outcome) -> ResponseBody<N> {
        debug!("response read finished with {} body bytes", self.body.len());
        self.phase = Phase::Done(outcome);
        ResponseBody {
            body: core::mem::take(&mut self.body),
            outcome,
            content_length: self.content_length,
        }
    }
}

/// Reads an HTTP response from `connection` and returns its body.
///
/// Lines are bounded by [`DEFAULT_MAX_LINE_LEN`] and the body by `N`. Between
/// polls the clock's [`delay_ms`](Clock::delay_ms) is called with
/// [`Options::poll_interval_ms`]. Exactly one pass is made; retrying is up to
/// the caller.
///
/// ```rust
/// use pollhttp::network::Connection;
/// use pollhttp::network::application::http::{Options, read_response_body};
/// use pollhttp::time::Clock;
///
/// struct Canned(&'static [u8]);
///
/// impl Connection for Canned {
///     fn available(&mut self) -> bool { !self.0.is_empty() }
///     fn read_byte(&mut self) -> Option<u8> {
///         let (&first, rest) = self.0.split_first()?;
///         self.0 = rest;
///         Some(first)
///     }
///     fn is_connected(&mut self) -> bool { false }
/// }
///
/// struct Ticks(u64);
///
/// impl Clock for Ticks {
///     fn now_ms(&self) -> u64 { self.0 }
///     fn delay_ms(&mut self, ms: u32) { self.0 += u64::from(ms); }
/// }
///
/// let mut conn = Canned(b"HTTP/1.1 200 OK\nContent-Length: 5\n\nHello");
/// let response = read_response_body::<64, _, _>(&mut conn, &mut Ticks(0), &Options::default());
/// assert!(response.is_success());
/// assert_eq!(response.as_str(), Some("Hello"));
/// ```
pub fn read_response_body<const N: usize, C, K>(
    connection: &mut C,
    clock: &mut K,
    options: &Options,
) -> ResponseBody<N>
where
    C: Connection,
    K: Clock,
{
    let mut reader = ResponseReader::<DEFAULT_MAX_LINE_LEN, N>::new(*options, clock.now_ms());
    loop {
        match reader.poll(connection, clock.now_ms()) {
            Poll::Ready(response) => return response,
            Poll::Pending => clock.delay_ms(reader.options().poll_interval_ms),
        }
    }
}

/// Asynchronous version of [`read_response_body`].
#[cfg(feature = "async")]
pub async fn read_response_body_async<const N: usize, C, K>(
    connection: &mut C,
    clock: &mut K,
    options: &Options,
) -> ResponseBody<N>
where
    C: Connection,
    K: AsyncClock,
{
    let mut reader = ResponseReader::<DEFAULT_MAX_LINE_LEN, N>::new(*options, clock.now_ms());
    loop {
        match reader.poll(connection, clock.now_ms()) {
            Poll::Ready(response) => return response,
            Poll::Pending => clock.delay_ms(reader.options().poll_interval_ms).await,
        }
    }
}
