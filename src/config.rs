//! Configuration management for the face tracking pipeline

use crate::{
    constants::{DEFAULT_ENDPOINT, DEFAULT_EVENT_NAME, DEFAULT_MEASUREMENT_NOISE, DEFAULT_PROCESS_NOISE},
    expression::ExpressionConfig,
    filters::FaceLossPolicy,
    pose_estimation::{PoseModel, SolverParams},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Application configuration, fixed at process start
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Landmark source configuration
    pub source: SourceConfig,

    /// Pose solver configuration
    pub pose: PoseConfig,

    /// Stabilizer configuration
    pub stabilizer: StabilizerConfig,

    /// Expression mapping configuration
    pub expression: ExpressionConfig,

    /// Outbound transport configuration
    pub transport: TransportConfig,

    /// Debug output configuration
    pub debug: DebugConfig,
}

/// Landmark source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// JSON lines file with one frame per line, `-` for stdin
    pub input: String,
}

/// Pose solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Optional reference head file (`index x y z` per line); built-in model when unset
    pub model_file: Option<PathBuf>,

    /// Maximum Levenberg-Marquardt iterations per frame
    pub max_iterations: usize,
}

/// Stabilizer configuration shared by every channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Process noise `q`, covariance `q * I`
    pub process_noise: f64,

    /// Measurement noise `r`
    pub measurement_noise: f64,

    /// Behaviour of the stabilizers while no face is visible
    pub face_loss_policy: FaceLossPolicy,
}

/// Outbound transport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Send records over the network instead of logging them
    pub enabled: bool,

    /// Renderer address, `host:port`
    pub endpoint: String,

    /// Event name wrapped around every record
    pub event: String,
}

/// Debug output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log per-frame pose and feature details
    pub enabled: bool,

    /// Frames between FPS log lines
    pub fps_interval: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { input: "-".to_string() }
    }
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            model_file: None,
            max_iterations: SolverParams::default().max_iterations,
        }
    }
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            process_noise: DEFAULT_PROCESS_NOISE,
            measurement_noise: DEFAULT_MEASUREMENT_NOISE,
            face_loss_policy: FaceLossPolicy::default(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            event: DEFAULT_EVENT_NAME.to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            fps_interval: 30,
        }
    }
}

impl PoseConfig {
    /// Load the configured reference head, or the built-in one
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the model file cannot be loaded
    pub fn load_model(&self) -> Result<PoseModel> {
        match &self.model_file {
            Some(path) => PoseModel::from_file(path)
                .map_err(|e| Error::ConfigError(format!("Cannot load pose model {}: {}", path.display(), e))),
            None => Ok(PoseModel::canonical()),
        }
    }

    /// Solver parameters derived from this configuration
    #[must_use]
    pub fn solver_params(&self) -> SolverParams {
        SolverParams::default().with_max_iterations(self.max_iterations)
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        // Validate source
        if self.source.input.trim().is_empty() {
            return Err(Error::ConfigError("Input must be a file path or '-'".to_string()));
        }

        // Validate solver
        if self.pose.max_iterations == 0 {
            return Err(Error::ConfigError(
                "Max iterations must be greater than 0".to_string(),
            ));
        }

        // Validate stabilizer noise
        if !(self.stabilizer.process_noise.is_finite() && self.stabilizer.process_noise >= 0.0) {
            return Err(Error::ConfigError(
                "Process noise must be finite and non-negative".to_string(),
            ));
        }
        if !(self.stabilizer.measurement_noise.is_finite() && self.stabilizer.measurement_noise >= 0.0) {
            return Err(Error::ConfigError(
                "Measurement noise must be finite and non-negative".to_string(),
            ));
        }

        self.expression.validate()?;

        // Validate transport
        if self.transport.enabled && self.transport.endpoint.parse::<SocketAddr>().is_err() {
            return Err(Error::ConfigError(format!(
                "Endpoint is not a socket address: {}",
                self.transport.endpoint
            )));
        }
        if self.transport.event.is_empty() {
            return Err(Error::ConfigError("Event name must not be empty".to_string()));
        }

        // Validate debug settings
        if self.debug.fps_interval == 0 {
            return Err(Error::ConfigError("FPS interval must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face tracking avatar configuration

# Landmark input: JSON lines file, or "-" for stdin
source:
  input: "-"

# Pose solver
pose:
  # model_file: "assets/model.txt"
  max_iterations: 50

# Kalman stabilizers, one per channel
stabilizer:
  process_noise: 0.1
  measurement_noise: 0.1
  # hold_last, decay_to_neutral or reset
  face_loss_policy: hold_last

# Expression mapping
expression:
  roll: { clamp_deg: 30.0, scale: 2.0, offset_deg: 0.0 }
  pitch: { clamp_deg: 90.0, scale: 3.0, offset_deg: 0.0 }
  yaw: { clamp_deg: 30.0, scale: 1.0, offset_deg: 3.0 }
  pitch_reference_deg: 177.0
  eye_open_scale: 6.0
  eye_open_offset: -2.0
  mouth_open_scale: 1.5
  mouth_form_band: { low: 45.0, high: 50.0 }
  eye_ball_x_band: { low: -0.05, high: 0.07 }
  # raw or stabilized
  feature_source: raw

# Outbound transport
transport:
  enabled: false
  endpoint: "127.0.0.1:5252"
  event: "msg"

# Debug output
debug:
  enabled: false
  fps_interval: 30
"#;
