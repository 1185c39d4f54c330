//! Face tracking library driving an avatar renderer from facial landmarks.
//!
//! This library turns the per-frame output of a face-mesh detector into a
//! small set of renderer parameters:
//! - Head pose by solving the perspective-n-point problem against a fixed reference head
//! - One Kalman stabilizer per tracked signal to remove jitter
//! - Eye, iris and mouth ratios computed from the landmark geometry
//! - Clamped, scaled head angles and thresholded expression classes
//!
//! The estimation pipeline consists of:
//! 1. Reading 478 landmarks (or "no face") from a [`source::LandmarkSource`]
//! 2. Pose estimation with a weak-perspective initialisation refined by Levenberg-Marquardt
//! 3. Stabilizing the six pose components and the feature channels
//! 4. Mapping the result to a [`expression::ParameterRecord`] and handing it to a [`transport::Transport`]
//!
//! # Examples
//!
//! ## Single Frame
//!
//! ```no_run
//! use facetrack_avatar::{
//!     config::Config,
//!     landmarks::{ImageSize, LandmarkSet, SourceFrame},
//!     pipeline::Pipeline,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pipeline = Pipeline::from_config(&Config::default())?;
//!
//! // Landmarks as delivered by the face-mesh detector
//! let pairs: Vec<[f64; 2]> = vec![[320.0, 240.0]; 478];
//! let frame = SourceFrame::with_face(ImageSize::new(640, 480)?, LandmarkSet::from_pairs(&pairs)?);
//!
//! if let Some(record) = pipeline.process(&frame) {
//!     println!("{}", serde_json::to_string(&record)?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Stabilizing a Signal
//!
//! ```
//! use facetrack_avatar::filters::{Channel, StabilizerBank};
//!
//! let mut bank = StabilizerBank::new(0.1, 0.1);
//! for _ in 0..100 {
//!     bank.update(Channel::MouthDistance, 47.0);
//! }
//! assert!((bank.value(Channel::MouthDistance) - 47.0).abs() < 1e-6);
//! ```

/// Landmark sets, image sizes and source frames
pub mod landmarks;

/// Head pose estimation module using `PnP` algorithm
pub mod pose_estimation;

/// Signal stabilization filters
pub mod filters;

/// Eye, iris and mouth ratios
pub mod features;

/// Expression mapping and the outbound parameter record
pub mod expression;

/// Per-frame processing pipeline
pub mod pipeline;

/// Landmark sources
pub mod source;

/// Outbound transports
pub mod transport;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
