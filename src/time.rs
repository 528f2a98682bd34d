//! Wall-clock abstraction for deadline-bounded reads.
//!
//! The readers in this crate never block on the connection. Instead they poll,
//! and between polls they hand control back to the platform through
//! [`Clock::delay_ms`], so other cooperative work (a watchdog, a display refresh,
//! network stack housekeeping) keeps running.
//!
//! Timestamps are plain millisecond counters. They are compared with wrapping
//! arithmetic, so a free-running tick counter that overflows is handled the same
//! way as a monotonic one.

/// A source of time and a way to yield while waiting.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin.
    fn now_ms(&self) -> u64;

    /// Cede control for roughly `ms` milliseconds.
    ///
    /// On a bare-metal target this is typically a busy delay that still services
    /// interrupts; on a hosted target a thread sleep.
    fn delay_ms(&mut self, ms: u32);
}

/// Asynchronous counterpart of [`Clock`].
#[cfg(feature = "async")]
pub trait AsyncClock {
    /// Milliseconds since an arbitrary, fixed origin.
    fn now_ms(&self) -> u64;

    /// Suspend the current task for roughly `ms` milliseconds.
    async fn delay_ms(&mut self, ms: u32);
}

/// An instant after which a read phase gives up.
///
/// A deadline is fixed when it is created and never extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    start: u64,
    timeout: u64,
}

impl Deadline {
    /// Creates a deadline `timeout_ms` milliseconds after `now`.
    ///
    /// A zero timeout produces a deadline that has already expired.
    pub const fn new(now: u64, timeout_ms: u32) -> Self {
        Self {
            start: now,
            timeout: timeout_ms as u64,
        }
    }

    /// Milliseconds elapsed since the deadline was created.
    pub const fn elapsed(&self, now: u64) -> u64 {
        now.wrapping_sub(self.start)
    }

    /// Returns `true` once at least the full timeout has elapsed.
    pub const fn has_expired(&self, now: u64) -> bool {
        self.elapsed(now) >= self.timeout
    }

    /// Milliseconds left before expiry, zero once expired.
    pub const fn remaining(&self, now: u64) -> u64 {
        self.timeout.saturating_sub(self.elapsed(now))
    }
}

/// A [`Clock`] backed by [`std::time::Instant`] and [`std::thread::sleep`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Creates a clock whose origin is the current instant.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
