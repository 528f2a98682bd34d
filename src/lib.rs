//! # pollhttp - deadline-bounded HTTP for polled connections
//!
//! A small SDK for devices that fetch data over HTTP through a network stack
//! that only offers "is a byte ready / read a byte / still connected"
//! primitives (Wi-Fi co-processors, TLS offload modules, AT-command modems).
//! Nothing here blocks indefinitely: every wait is bounded by a deadline, and
//! waiting yields to the platform so other cooperative work keeps running.
//!
//! ## Features
//!
//! ### Network
//! - **Connection abstraction**: a three-method [`network::Connection`] trait
//! - **Line reader**: bounded, deadline-aware line reads
//! - **Response reader**: status line, `Content-Length` scan, and body read
//!   by declared length or until the peer closes
//!
//! ### Application helpers
//! - **Glucose readings**: decode the companion server's plain-text body
//! - **Display icons**: Wi-Fi status frames for a 12×8 LED matrix
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! pollhttp = "0.1.0"
//! ```
//!
//! ### Reading a Response
//!
//! ```rust,no_run
//! use pollhttp::network::application::http::{Options, read_response_body};
//! use pollhttp::reading;
//! # use pollhttp::network::Connection;
//! # use pollhttp::time::Clock;
//! # struct WifiClient;
//! # impl Connection for WifiClient {
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
//! let mut client = WifiClient;
//! let mut board = Board;
//!
//! // The request has already been written to `client`.
//! let response = read_response_body::<256, _, _>(&mut client, &mut board, &Options::default());
//! if response.is_success() {
//!     if let Ok(reading) = reading::parse(response.as_bytes()) {
//!         let _ = reading.trend.arrow();
//!     }
//! }
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based devices, with the `std` feature
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: `StdClock` and a `TcpStream` connection adapter (default: disabled)
//! - `async`: async drivers for the line and response readers
//! - `defmt`: log through `defmt` and implement `defmt::Format` for public enums
//! - `log`: log through the `log` crate

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(async_fn_in_trait)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

mod fmt;

/// Time source, cooperative delay and deadlines.
pub mod time;

/// Network abstraction layer and protocol readers.
///
/// Contains the [`Connection`](network::Connection) trait and the HTTP response
/// reader built on it.
pub mod network;

/// Decoding of glucose reading response bodies.
pub mod reading;

/// Static display assets.
pub mod display;
