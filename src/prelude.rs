//! Convenience re-exports for running and replaying a charge loop.

pub use crate::animation::{
    AnimationCursor, Animator, Frame, Playback, PlaybackOutcome, PlaybackReport, PlaybackState,
    RenderSurface, StopSignal,
};
pub use crate::circuits::{Capacitor, CircuitModel, Component, Inductor, Resistor};
pub use crate::config::LoopConfig;
pub use crate::constants::angular_frequency;
pub use crate::errors::RlcLoopError;
pub use crate::geometry::{LoopGeometry, LoopSide};
pub use crate::math::{sinusoid_rms, CScalar, Scalar, R2};
pub use crate::samples::{read_sample_table, write_sample_table, SampleError, SampleStore};
pub use crate::scene::{ComponentKind, ComponentMarker, SceneLayout, Segment};
pub use crate::simulation::{
    checked_step_count, integrate_current, rk4_step, write_current_csv, CurrentSolver,
    SimulationEngine, SimulationError, TimeSeries,
};
pub use crate::transport::{cyclic_distance, ChargeTransport, MarkerTrajectories};
