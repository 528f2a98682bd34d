//! Display assets.
//!
//! Static frames for the 12×8 LED matrix used as a status display.

/// Connection status icons.
pub mod icons;
