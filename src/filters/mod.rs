//! Signal stabilization for pose and feature measurements.
//!
//! Every tracked scalar gets its own constant-velocity Kalman filter so that
//! jitter in one signal never leaks into another.

/// Scalar position/velocity Kalman stabilizer
pub mod kalman;

/// One stabilizer per named channel, plus the face-loss policy
pub mod bank;

pub use bank::{Channel, FaceLossPolicy, StabilizerBank};
pub use kalman::Stabilizer;
