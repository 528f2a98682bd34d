//! Wi-Fi status icons for a 12×8 LED matrix.
//!
//! A frame packs 96 pixels row-major into three 32-bit words, most significant
//! bit first: pixel `(0, 0)` is bit 31 of word 0 and pixel `(7, 11)` is bit 0 of
//! word 2.

/// Matrix width in pixels.
pub const COLUMNS: usize = 12;

/// Matrix height in pixels.
pub const ROWS: usize = 8;

/// One packed matrix frame.
pub type Frame = [u32; 3];

/// Crossed-out antenna.
pub const NO_WIFI: Frame = [0x0f43_0841, 0x20e0_1480, 0x8016_0260];

/// Antenna with a check mark.
pub const WIFI_GOOD: Frame = [0x0f03_0c40, 0x20f0_1080, 0x0106_a064];

/// Full signal.
pub const WIFI: Frame = [0x0f03_0c40, 0x20f0_1080, 0x0006_0060];

/// Connecting, first animation step.
pub const WIFI_1: Frame = [0x0f03_0c40, 0x2000_0f01, 0x0806_0060];

/// Connecting, second animation step.
pub const WIFI_2: Frame = [0x0000_f030, 0xc402_0f01, 0x0806_0060];

/// Connecting, third animation step.
pub const WIFI_3: Frame = [0x0000_f030, 0xc4f2_1080, 0x0006_0060];

/// Named icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// No network.
    NoWifi,
    /// Connected and the last fetch succeeded.
    WifiGood,
    /// Connected.
    Wifi,
    /// Connecting, step 1.
    Wifi1,
    /// Connecting, step 2.
    Wifi2,
    /// Connecting, step 3.
    Wifi3,
}

impl Icon {
    /// The connecting animation, in order.
    pub const CONNECTING: [Icon; 3] = [Icon::Wifi1, Icon::Wifi2, Icon::Wifi3];

    /// The packed frame for this icon.
    pub const fn frame(&self) -> &'static Frame {
        match self {
            Icon::NoWifi => &NO_WIFI,
            Icon::WifiGood => &WIFI_GOOD,
            Icon::Wifi => &WIFI,
            Icon::Wifi1 => &WIFI_1,
            Icon::Wifi2 => &WIFI_2,
            Icon::Wifi3 => &WIFI_3,
        }
    }
}

/// Returns `true` if the pixel at `row`, `col` is lit. Out-of-range
/// coordinates are never lit.
pub const fn is_lit(frame: &Frame, row: usize, col: usize) -> bool {
    if row >= ROWS || col >= COLUMNS {
        return false;
    }
    let index = row * COLUMNS + col;
    frame[index / 32] & (1 << (31 - index % 32)) != 0
}
