//! Named stabilizer channels, one Kalman filter per tracked signal.

use super::kalman::Stabilizer;
use crate::{
    constants::{MOUTH_FORM_HIGH_PX, MOUTH_FORM_LOW_PX, NEUTRAL_EYE_ASPECT_RATIO, NOMINAL_FACE_DEPTH},
    features::FeatureRatios,
    pose_estimation::PoseEstimate,
};
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Number of stabilized channels
pub const CHANNEL_COUNT: usize = 13;

/// Every signal that gets its own stabilizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    RotationX,
    RotationY,
    RotationZ,
    TranslationX,
    TranslationY,
    TranslationZ,
    EyeLeftOpenness,
    EyeRightOpenness,
    IrisLeftX,
    IrisLeftY,
    IrisRightX,
    IrisRightY,
    MouthDistance,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Self::RotationX,
        Self::RotationY,
        Self::RotationZ,
        Self::TranslationX,
        Self::TranslationY,
        Self::TranslationZ,
        Self::EyeLeftOpenness,
        Self::EyeRightOpenness,
        Self::IrisLeftX,
        Self::IrisLeftY,
        Self::IrisRightX,
        Self::IrisRightY,
        Self::MouthDistance,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RotationX => "rotation_x",
            Self::RotationY => "rotation_y",
            Self::RotationZ => "rotation_z",
            Self::TranslationX => "translation_x",
            Self::TranslationY => "translation_y",
            Self::TranslationZ => "translation_z",
            Self::EyeLeftOpenness => "eye_left_openness",
            Self::EyeRightOpenness => "eye_right_openness",
            Self::IrisLeftX => "iris_left_x",
            Self::IrisLeftY => "iris_left_y",
            Self::IrisRightX => "iris_right_x",
            Self::IrisRightY => "iris_right_y",
            Self::MouthDistance => "mouth_distance",
        }
    }

    /// Measurement that maps to a neutral, camera-facing avatar
    #[must_use]
    pub fn neutral_value(&self) -> f64 {
        match self {
            Self::RotationX => PI,
            Self::TranslationZ => NOMINAL_FACE_DEPTH,
            Self::EyeLeftOpenness | Self::EyeRightOpenness => NEUTRAL_EYE_ASPECT_RATIO,
            Self::MouthDistance => (MOUTH_FORM_LOW_PX + MOUTH_FORM_HIGH_PX) / 2.0,
            _ => 0.0,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the stabilizers do while no face is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceLossPolicy {
    /// Leave every stabilizer untouched until the face returns
    #[default]
    HoldLast,
    /// Feed every channel its neutral value once per lost frame
    DecayToNeutral,
    /// Return every channel to its initial state
    Reset,
}

/// One [`Stabilizer`] per [`Channel`], never shared between channels
#[derive(Debug, Clone)]
pub struct StabilizerBank {
    stabilizers: [Stabilizer; CHANNEL_COUNT],
}

impl StabilizerBank {
    /// Create a bank where every channel uses the same noise parameters
    #[must_use]
    pub fn new(process_noise: f64, measurement_noise: f64) -> Self {
        Self {
            stabilizers: std::array::from_fn(|_| Stabilizer::new(process_noise, measurement_noise)),
        }
    }

    /// Feed one measurement to `channel` and return its stabilized value
    pub fn update(&mut self, channel: Channel, measurement: f64) -> f64 {
        self.stabilizers[channel.slot()].update(measurement)
    }

    /// Current stabilized value of `channel`
    #[must_use]
    pub fn value(&self, channel: Channel) -> f64 {
        self.stabilizers[channel.slot()].value()
    }

    /// The stabilizer behind `channel`
    #[must_use]
    pub fn stabilizer(&self, channel: Channel) -> &Stabilizer {
        &self.stabilizers[channel.slot()]
    }

    /// Stabilize the six pose components
    pub fn update_pose(&mut self, pose: &PoseEstimate) -> PoseEstimate {
        let rotation = Vector3::new(
            self.update(Channel::RotationX, pose.rotation.x),
            self.update(Channel::RotationY, pose.rotation.y),
            self.update(Channel::RotationZ, pose.rotation.z),
        );
        let translation = Vector3::new(
            self.update(Channel::TranslationX, pose.translation.x),
            self.update(Channel::TranslationY, pose.translation.y),
            self.update(Channel::TranslationZ, pose.translation.z),
        );
        PoseEstimate {
            rotation,
            translation,
            reprojection_rmse: pose.reprojection_rmse,
        }
    }

    /// Stabilize the eye, iris and mouth distance channels.
    ///
    /// The mouth aspect ratio has no channel and passes through unchanged.
    pub fn update_features(&mut self, features: &FeatureRatios) -> FeatureRatios {
        FeatureRatios {
            eye_left: self.update(Channel::EyeLeftOpenness, features.eye_left),
            eye_right: self.update(Channel::EyeRightOpenness, features.eye_right),
            iris_left: (
                self.update(Channel::IrisLeftX, features.iris_left.0),
                self.update(Channel::IrisLeftY, features.iris_left.1),
            ),
            iris_right: (
                self.update(Channel::IrisRightX, features.iris_right.0),
                self.update(Channel::IrisRightY, features.iris_right.1),
            ),
            mouth_aspect_ratio: features.mouth_aspect_ratio,
            mouth_distance: self.update(Channel::MouthDistance, features.mouth_distance),
        }
    }

    /// Apply `policy` for one frame without a face
    pub fn on_face_lost(&mut self, policy: FaceLossPolicy) {
        match policy {
            FaceLossPolicy::HoldLast => {}
            FaceLossPolicy::DecayToNeutral => {
                for channel in Channel::ALL {
                    self.update(channel, channel.neutral_value());
                }
            }
            FaceLossPolicy::Reset => {
                debug!("Resetting all stabilizer channels");
                self.reset();
            }
        }
    }

    /// Return every channel to its initial state
    pub fn reset(&mut self) {
        for stabilizer in &mut self.stabilizers {
            stabilizer.reset();
        }
    }
}

impl Default for StabilizerBank {
    fn default() -> Self {
        Self {
            stabilizers: std::array::from_fn(|_| Stabilizer::default()),
        }
    }
}
