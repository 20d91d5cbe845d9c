#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Reference circuit parameters and unit conversions.
pub mod constants;
/// Shared scalar and vector aliases plus small numeric helpers.
pub mod math;
/// The single configuration value shared by simulation and replay.
pub mod config;
/// Circuit components and the driven series loop model.
pub mod circuits;
/// Fixed-step integration of the loop current.
pub mod simulation;
/// Charge marker motion driven by the loop current.
pub mod transport;
/// Loop position to 2-D coordinate mapping.
pub mod geometry;
/// Subsampled position tables and their text form.
pub mod samples;
/// Static scene geometry for render surfaces.
pub mod scene;
/// Replay cursor, frames and the fixed-cadence playback loop.
pub mod animation;
/// Error types shared between modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
