//! The single configuration value shared by the producing and replaying stages.

use std::time::Duration;

use crate::constants;
use crate::math::Scalar;
use crate::simulation::{checked_step_count, SimulationError};

/// Parameters of one simulation-and-replay run.
///
/// Build it once, validate it once, and hand the same value to the solver, the
/// transport pass, the sampler and the animator.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// Integration time step `dt` in seconds.
    pub time_step: Scalar,
    /// Simulated interval `Tmax` in seconds.
    pub duration: Scalar,
    /// Peak current of the driving source.
    pub drive_amplitude: Scalar,
    /// Angular frequency ω of the source in rad/s.
    pub angular_frequency: Scalar,
    /// Series resistance in ohms.
    pub resistance: Scalar,
    /// Series inductance in henries.
    pub inductance: Scalar,
    /// Series capacitance in farads.
    pub capacitance: Scalar,
    /// Half-width of the loop; the drawn loop is `2 * circuit_length` wide.
    pub circuit_length: Scalar,
    /// Half-height of the loop; the drawn loop is `2 * circuit_height` tall.
    pub circuit_height: Scalar,
    /// Initial spacing between consecutive markers, also the velocity scale factor.
    pub separation_distance: Scalar,
    /// Sampling stride between simulation steps and stored samples.
    pub data_increment: usize,
    /// Real-time delay between replayed frames.
    pub frame_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            time_step: constants::TIME_STEP,
            duration: constants::DURATION,
            drive_amplitude: constants::DRIVE_AMPLITUDE,
            angular_frequency: constants::angular_frequency(constants::DRIVE_FREQUENCY_HZ),
            resistance: constants::RESISTANCE,
            inductance: constants::INDUCTANCE,
            capacitance: constants::CAPACITANCE,
            circuit_length: constants::CIRCUIT_LENGTH,
            circuit_height: constants::CIRCUIT_HEIGHT,
            separation_distance: constants::SEPARATION_DISTANCE,
            data_increment: constants::DATA_INCREMENT,
            frame_interval: constants::FRAME_INTERVAL,
        }
    }
}

impl LoopConfig {
    /// Overrides the integration step and simulated interval.
    #[must_use]
    pub fn with_timing(mut self, time_step: Scalar, duration: Scalar) -> Self {
        self.time_step = time_step;
        self.duration = duration;
        self
    }

    /// Overrides the drive amplitude and angular frequency.
    #[must_use]
    pub fn with_drive(mut self, amplitude: Scalar, angular_frequency: Scalar) -> Self {
        self.drive_amplitude = amplitude;
        self.angular_frequency = angular_frequency;
        self
    }

    /// Overrides the series element values.
    #[must_use]
    pub fn with_rlc(mut self, resistance: Scalar, inductance: Scalar, capacitance: Scalar) -> Self {
        self.resistance = resistance;
        self.inductance = inductance;
        self.capacitance = capacitance;
        self
    }

    /// Overrides the loop half-extents.
    #[must_use]
    pub fn with_loop(mut self, circuit_length: Scalar, circuit_height: Scalar) -> Self {
        self.circuit_length = circuit_length;
        self.circuit_height = circuit_height;
        self
    }

    /// Overrides the marker spacing.
    #[must_use]
    pub fn with_separation(mut self, separation_distance: Scalar) -> Self {
        self.separation_distance = separation_distance;
        self
    }

    /// Overrides the sampling stride.
    #[must_use]
    pub fn with_data_increment(mut self, data_increment: usize) -> Self {
        self.data_increment = data_increment;
        self
    }

    /// Overrides the replay cadence.
    #[must_use]
    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    /// Total path length around the loop.
    #[must_use]
    pub fn perimeter(&self) -> Scalar {
        2.0 * (2.0 * self.circuit_length + 2.0 * self.circuit_height)
    }

    /// Number of simulation steps, `ceil(duration / time_step)`.
    #[must_use]
    pub fn step_count(&self) -> usize {
        (self.duration / self.time_step).ceil() as usize
    }

    /// Number of charge markers that fit around the loop at the configured spacing.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        (self.perimeter() / self.separation_distance).floor() as usize
    }

    /// Number of samples kept per marker.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.step_count().div_ceil(self.data_increment.max(1))
    }

    /// Checks every invariant the solver, transport and replay stages rely on.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let finite = [
            ("time_step", self.time_step),
            ("duration", self.duration),
            ("drive_amplitude", self.drive_amplitude),
            ("angular_frequency", self.angular_frequency),
            ("resistance", self.resistance),
            ("inductance", self.inductance),
            ("capacitance", self.capacitance),
            ("circuit_length", self.circuit_length),
            ("circuit_height", self.circuit_height),
            ("separation_distance", self.separation_distance),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimulationError::InvalidConfig(format!("{name} must be finite")));
            }
        }
        if self.time_step <= 0.0 {
            return Err(SimulationError::InvalidConfig("time_step must be > 0".into()));
        }
        if self.duration <= 0.0 {
            return Err(SimulationError::InvalidConfig("duration must be > 0".into()));
        }
        if self.resistance <= 0.0 {
            return Err(SimulationError::InvalidConfig("resistance must be > 0".into()));
        }
        if self.angular_frequency * self.capacitance == 0.0 {
            return Err(SimulationError::InvalidConfig(
                "angular_frequency * capacitance must be non-zero".into(),
            ));
        }
        if self.circuit_length <= 0.0 || self.circuit_height <= 0.0 {
            return Err(SimulationError::InvalidConfig(
                "circuit_length and circuit_height must be > 0".into(),
            ));
        }
        if self.separation_distance <= 0.0 {
            return Err(SimulationError::InvalidConfig("separation_distance must be > 0".into()));
        }
        // A marker may cross the wrap point at most once per step.
        let max_displacement =
            self.separation_distance * self.drive_amplitude.abs() * self.time_step;
        if max_displacement >= self.perimeter() {
            return Err(SimulationError::InvalidConfig(format!(
                "per-step displacement {max_displacement} must stay below the loop perimeter {}",
                self.perimeter()
            )));
        }
        checked_step_count(self.time_step, self.duration)?;
        if self.data_increment == 0 {
            return Err(SimulationError::InvalidConfig("data_increment must be >= 1".into()));
        }
        Ok(())
    }
}
