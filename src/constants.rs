//! Reference parameters of the demonstration circuit and helper conversions.
//!
//! These are the values `LoopConfig::default()` is built from. The convention throughout
//! is that one coulomb is one charge, so currents read as charges per second.

use std::f64::consts::PI;
use std::time::Duration;

/// Integration time step in seconds.
pub const TIME_STEP: f64 = 1.0e-4;
/// Simulated interval in seconds.
pub const DURATION: f64 = 4.0;
/// Peak current of the AC source (charges per second).
pub const DRIVE_AMPLITUDE: f64 = 100.0;
/// Drive frequency in hertz (ω = 20π rad/s).
pub const DRIVE_FREQUENCY_HZ: f64 = 10.0;
/// Series resistance in ohms.
pub const RESISTANCE: f64 = 25.0;
/// Series inductance in henries.
pub const INDUCTANCE: f64 = 2.0e-2;
/// Series capacitance in farads.
pub const CAPACITANCE: f64 = 5.0e-7;
/// Half-width of the loop, measured from the vertical centre axis.
pub const CIRCUIT_LENGTH: f64 = 500.0;
/// Half-height of the loop, measured from the horizontal centre axis.
pub const CIRCUIT_HEIGHT: f64 = 300.0;
/// Spacing between consecutive charge markers along the loop.
pub const SEPARATION_DISTANCE: f64 = 50.0;
/// Every `DATA_INCREMENT`-th simulation step is kept for replay.
pub const DATA_INCREMENT: usize = 20;
/// Real-time delay between replayed frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(10);

/// Returns the angular frequency corresponding to a linear frequency `hz`.
#[inline]
#[must_use]
pub fn angular_frequency(hz: f64) -> f64 {
    2.0 * PI * hz
}
