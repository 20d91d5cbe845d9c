use crate::config::LoopConfig;
use crate::math::{sinusoid_rms, CScalar, Scalar};
use crate::simulation::SimulationError;

use super::component::{Capacitor, Component, Inductor, Resistor};

/// Series R-L-C loop driven by a sinusoidal current source.
///
/// The source prescribes `I(t) = Imax·sin(ωt − φ)`; the elements enter only through the
/// phase angle φ, which is fixed at construction.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitModel {
    drive_amplitude: Scalar,
    angular_frequency: Scalar,
    resistor: Resistor,
    inductor: Inductor,
    capacitor: Capacitor,
    perimeter: Scalar,
    phase_angle: Scalar,
}

impl CircuitModel {
    /// Builds the model from a validated configuration.
    pub fn from_config(config: &LoopConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let resistor = Resistor::new(config.resistance);
        let inductor = Inductor::new(config.inductance);
        let capacitor = Capacitor::new(config.capacitance);
        let mut model = Self {
            drive_amplitude: config.drive_amplitude,
            angular_frequency: config.angular_frequency,
            resistor,
            inductor,
            capacitor,
            perimeter: config.perimeter(),
            phase_angle: 0.0,
        };
        let z = model.impedance();
        model.phase_angle = (z.im / z.re).atan();
        if !model.phase_angle.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "phase angle is not finite for impedance {z}"
            )));
        }
        tracing::debug!(
            phase_angle = model.phase_angle,
            impedance_re = z.re,
            impedance_im = z.im,
            "circuit model built"
        );
        Ok(model)
    }

    /// Complex series impedance `R + j(ωL − 1/(ωC))` at the drive frequency.
    #[must_use]
    pub fn impedance(&self) -> CScalar {
        let omega = self.angular_frequency;
        let members: [&dyn Component; 3] = [&self.resistor, &self.inductor, &self.capacitor];
        let mut total = CScalar::default();
        for component in members {
            total += component.impedance(omega);
        }
        total
    }

    /// Phase lag φ between the driving current and the circuit response.
    #[must_use]
    pub fn phase_angle(&self) -> Scalar {
        self.phase_angle
    }

    /// Peak drive current.
    #[must_use]
    pub fn drive_amplitude(&self) -> Scalar {
        self.drive_amplitude
    }

    /// Drive angular frequency in rad/s.
    #[must_use]
    pub fn angular_frequency(&self) -> Scalar {
        self.angular_frequency
    }

    /// Loop perimeter the charges travel around.
    #[must_use]
    pub fn perimeter(&self) -> Scalar {
        self.perimeter
    }

    /// Current at `t = 0`, `Imax·sin(−φ)`.
    #[must_use]
    pub fn initial_current(&self) -> Scalar {
        self.drive_amplitude * (-self.phase_angle).sin()
    }

    /// Time derivative of the prescribed current, `ω·Imax·cos(ωt − φ)`.
    #[must_use]
    pub fn current_derivative(&self, time: Scalar) -> Scalar {
        let theta = self.angular_frequency * time - self.phase_angle;
        self.angular_frequency * self.drive_amplitude * theta.cos()
    }

    /// Closed-form current `Imax·sin(ωt − φ)`.
    #[must_use]
    pub fn analytic_current(&self, time: Scalar) -> Scalar {
        self.drive_amplitude * (self.angular_frequency * time - self.phase_angle).sin()
    }

    /// RMS value of the drive current.
    #[must_use]
    pub fn rms_current(&self) -> Scalar {
        sinusoid_rms(self.drive_amplitude)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn phase_angle_matches_phasor_geometry() {
        let config = LoopConfig::default();
        let model = CircuitModel::from_config(&config).expect("valid config");
        let omega = config.angular_frequency;
        let reactance = omega * config.inductance - 1.0 / (omega * config.capacitance);
        let expected = (reactance / config.resistance).atan();
        assert_eq!(model.phase_angle(), expected);
        // strongly capacitive at 10 Hz
        let phi = model.phase_angle();
        assert!(phi < -1.57 && phi > -std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn impedance_sums_series_elements() {
        let model = CircuitModel::from_config(&LoopConfig::default()).expect("valid config");
        let z = model.impedance();
        assert_eq!(z.re, 25.0);
        let omega = model.angular_frequency();
        let reactance = omega * 2.0e-2 - 1.0 / (omega * 5.0e-7);
        assert_relative_eq!(z.im, reactance, max_relative = 1.0e-15);
    }

    #[test]
    fn initial_current_uses_negative_phase() {
        let model = CircuitModel::from_config(&LoopConfig::default()).expect("valid config");
        assert_eq!(model.initial_current(), 100.0 * (-model.phase_angle()).sin());
        assert_relative_eq!(
            model.initial_current(),
            model.analytic_current(0.0),
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn invalid_config_is_reported_before_use() {
        let config = LoopConfig::default().with_rlc(0.0, 2.0e-2, 5.0e-7);
        assert!(matches!(
            CircuitModel::from_config(&config),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn resonant_circuit_has_zero_phase() {
        // ω = 1/sqrt(LC) = 1000 rad/s
        let config = LoopConfig::default().with_drive(10.0, 1000.0).with_rlc(5.0, 1.0e-3, 1.0e-3);
        let model = CircuitModel::from_config(&config).expect("valid config");
        assert_relative_eq!(model.phase_angle(), 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(model.rms_current(), 10.0 / 2f64.sqrt(), epsilon = 1.0e-12);
    }
}
