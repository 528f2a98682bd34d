//! Glucose reading payloads.
//!
//! The companion server answers `GET /` with a plain text body: either the
//! literal `No Data`, or three newline-separated fields
//!
//! ```text
//! <value mg/dL>
//! <trend description>
//! <timestamp>
//! ```
//!
//! Any field may be empty when the sensor did not report it. This module
//! turns such a body into a [`Reading`], and can re-encode it as compact JSON
//! for forwarding.

use heapless::String;
use serde::Serialize;

/// Body sent by the server when it has nothing to report.
pub const NO_DATA: &str = "No Data";

/// Maximum timestamp length kept.
pub const MAX_TIMESTAMP_LEN: usize = 40;

/// Errors produced while decoding or encoding a reading.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The server reported that no reading is available.
    NoData,
    /// The body is not UTF-8, has too few fields, or the value is not a number.
    Malformed,
    /// The timestamp is longer than [`MAX_TIMESTAMP_LEN`].
    FieldTooLong,
    /// The JSON output buffer is too small.
    Serialize,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NoData => defmt::write!(f, "NoData"),
            Error::Malformed => defmt::write!(f, "Malformed"),
            Error::FieldTooLong => defmt::write!(f, "FieldTooLong"),
            Error::Serialize => defmt::write!(f, "Serialize"),
        }
    }
}

/// Direction and rate of change of the glucose level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// No trend reported.
    None,
    /// Rising quickly.
    DoubleUp,
    /// Rising.
    SingleUp,
    /// Rising slightly.
    FortyFiveUp,
    /// Steady.
    Flat,
    /// Falling slightly.
    FortyFiveDown,
    /// Falling.
    SingleDown,
    /// Falling quickly.
    DoubleDown,
    /// The sensor could not determine a trend.
    NotComputable,
    /// The rate of change is out of range.
    RateOutOfRange,
    /// A description this crate does not know.
    Unknown,
}

impl Trend {
    /// Maps a human-readable trend description to a [`Trend`].
    ///
    /// Matching ignores ASCII case and surrounding whitespace.
    pub fn from_description(description: &str) -> Self {
        const TABLE: [(&str, Trend); 10] = [
            ("", Trend::None),
            ("rising quickly", Trend::DoubleUp),
            ("rising", Trend::SingleUp),
            ("rising slightly", Trend::FortyFiveUp),
            ("steady", Trend::Flat),
            ("falling slightly", Trend::FortyFiveDown),
            ("falling", Trend::SingleDown),
            ("falling quickly", Trend::DoubleDown),
            ("unable to determine trend", Trend::NotComputable),
            ("trend unavailable", Trend::RateOutOfRange),
        ];

        let description = description.trim();
        TABLE
            .iter()
            .find(|(text, _)| text.eq_ignore_ascii_case(description))
            .map_or(Trend::Unknown, |&(_, trend)| trend)
    }

    /// A single-character arrow for small displays.
    pub fn arrow(&self) -> char {
        match self {
            Trend::DoubleUp => '⇈',
            Trend::SingleUp => '↑',
            Trend::FortyFiveUp => '↗',
            Trend::Flat => '→',
            Trend::FortyFiveDown => '↘',
            Trend::SingleDown => '↓',
            Trend::DoubleDown => '⇊',
            Trend::None | Trend::NotComputable | Trend::RateOutOfRange | Trend::Unknown => '?',
        }
    }
}

/// A decoded glucose reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    /// Glucose value in mg/dL, if reported.
    pub value: Option<u16>,
    /// Trend, [`Trend::None`] if not reported.
    pub trend: Trend,
    /// Timestamp exactly as sent by the server, empty if not reported.
    pub timestamp: String<MAX_TIMESTAMP_LEN>,
}

impl Reading {
    /// Encodes the reading as JSON into `buf`, returning the number of bytes
    /// written.
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, Error> {
        serde_json_core::to_slice(self, buf).map_err(|_| Error::Serialize)
    }
}

/// Decodes a response body into a [`Reading`].
pub fn parse(body: &[u8]) -> Result<Reading, Error> {
    let text = core::str::from_utf8(body).map_err(|_| Error::Malformed)?;
    if text.trim() == NO_DATA {
        return Err(Error::NoData);
    }

    let mut fields = text.split('\n').map(|field| field.trim_end_matches('\r'));
    let (Some(value), Some(trend), Some(timestamp)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::Malformed);
    };

    let value = match value.trim() {
        "" => None,
        digits => Some(digits.parse::<u16>().map_err(|_| Error::Malformed)?),
    };
    let trend = Trend::from_description(trend);
    let timestamp = String::try_from(timestamp.trim()).map_err(|_| Error::FieldTooLong)?;

    if value.is_none() && trend == Trend::None && timestamp.is_empty() {
        return Err(Error::NoData);
    }

    Ok(Reading {
        value,
        trend,
        timestamp,
    })
}
