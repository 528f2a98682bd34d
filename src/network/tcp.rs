//! [`Connection`] over a non-blocking `std::net::TcpStream`.

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use super::Connection;
use super::error::Error;
use crate::fmt::warning;

const READ_AHEAD: usize = 512;

/// A TCP stream exposed as a polled byte connection.
///
/// Bytes are fetched in chunks into a small read-ahead buffer. End of stream
/// or a hard I/O error marks the connection as closed; bytes already buffered
/// stay readable.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
    buf: [u8; READ_AHEAD],
    pos: usize,
    len: usize,
    closed: bool,
}

impl TcpConnection {
    /// Wraps `stream`, switching it to non-blocking mode.
    pub fn new(stream: TcpStream) -> std::io::Result<Self> {
        stream.set_nonblocking(true)?;
        Ok(Self {
            stream,
            buf: [0; READ_AHEAD],
            pos: 0,
            len: 0,
            closed: false,
        })
    }

    /// Connects to `addr`.
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, Error> {
        let stream = TcpStream::connect(addr).map_err(|_| Error::ConnectionRefused)?;
        Self::new(stream).map_err(|_| Error::ConnectionRefused)
    }

    /// Writes `bytes` in full, blocking until they are handed to the OS.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.stream
            .set_nonblocking(false)
            .map_err(|_| Error::WriteError)?;
        let written = self
            .stream
            .write_all(bytes)
            .and_then(|()| self.stream.flush());
        self.stream
            .set_nonblocking(true)
            .map_err(|_| Error::WriteError)?;
        written.map_err(|_| Error::WriteError)
    }

    /// The wrapped stream.
    pub fn get_ref(&self) -> &TcpStream {
        &self.stream
    }

    fn fill(&mut self) {
        if self.pos < self.len || self.closed {
            return;
        }
        match self.stream.read(&mut self.buf) {
            Ok(0) => self.closed = true,
            Ok(n) => {
                self.pos = 0;
                self.len = n;
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {}
            Err(_) => {
                warning!("tcp read failed, treating connection as closed");
                self.closed = true;
            }
        }
    }
}

impl Connection for TcpConnection {
    fn available(&mut self) -> bool {
        self.fill();
        self.pos < self.len
    }

    fn read_byte(&mut self) -> Option<u8> {
        if !self.available() {
            return None;
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        Some(byte)
    }

    fn is_connected(&mut self) -> bool {
        self.fill();
        !self.closed
    }
}
