use nalgebra::{Matrix2, RowVector2, Vector2};

use crate::constants::{DEFAULT_MEASUREMENT_NOISE, DEFAULT_PROCESS_NOISE, EPSILON};

/// Scalar Kalman stabilizer smoothing one noisy measurement per frame
#[derive(Debug, Clone)]
pub struct Stabilizer {
    // State: [value, rate]
    state: Vector2<f64>,
    // State covariance
    covariance: Matrix2<f64>,
    // Process noise
    process_noise: Matrix2<f64>,
    // Measurement noise
    measurement_noise: f64,
    // State transition matrix, unit time step
    transition: Matrix2<f64>,
    // Measurement matrix (we only measure the value)
    measurement: RowVector2<f64>,
}

impl Stabilizer {
    /// Create a stabilizer with process noise `q * I` and measurement noise `r`
    ///
    /// # Panics
    ///
    /// Panics if either noise is negative or not finite
    #[must_use]
    pub fn new(process_noise: f64, measurement_noise: f64) -> Self {
        assert!(
            process_noise.is_finite() && process_noise >= 0.0,
            "Process noise must be finite and non-negative"
        );
        assert!(
            measurement_noise.is_finite() && measurement_noise >= 0.0,
            "Measurement noise must be finite and non-negative"
        );

        Self {
            state: Vector2::zeros(),
            covariance: Matrix2::identity(),
            process_noise: Matrix2::identity() * process_noise,
            measurement_noise,
            transition: Matrix2::new(
                1.0, 1.0,
                0.0, 1.0,
            ),
            measurement: RowVector2::new(1.0, 0.0),
        }
    }

    fn predict(&mut self) {
        // Predict state
        self.state = self.transition * self.state;

        // Predict covariance
        self.covariance = self.transition * self.covariance * self.transition.transpose() + self.process_noise;
    }

    fn correct(&mut self, measurement: f64) {
        // Innovation
        let innovation = measurement - (self.measurement * self.state)[0];

        // Innovation covariance
        let innovation_cov = (self.measurement * self.covariance * self.measurement.transpose())[0] + self.measurement_noise;

        // Kalman gain, pseudo-inverse of a vanishing innovation covariance is zero
        let gain = if innovation_cov.abs() > EPSILON {
            self.covariance * self.measurement.transpose() / innovation_cov
        } else {
            Vector2::zeros()
        };

        // Update state
        self.state += gain * innovation;

        // Update covariance
        self.covariance = (Matrix2::identity() - gain * self.measurement) * self.covariance;
    }

    /// Feed one measurement and return the corrected value
    pub fn update(&mut self, measurement: f64) -> f64 {
        self.predict();
        self.correct(measurement);
        self.state[0]
    }

    /// Current corrected value
    #[must_use]
    pub fn value(&self) -> f64 {
        self.state[0]
    }

    /// Current estimated rate of change per frame
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.state[1]
    }

    /// Return to zero state and identity covariance
    pub fn reset(&mut self) {
        self.state = Vector2::zeros();
        self.covariance = Matrix2::identity();
    }
}

impl Default for Stabilizer {
    fn default() -> Self {
        Self::new(DEFAULT_PROCESS_NOISE, DEFAULT_MEASUREMENT_NOISE)
    }
}
