//! Maps a stabilized head pose and facial feature ratios to renderer parameters.

use crate::{
    constants::{
        EYE_BALL_X_HIGH, EYE_BALL_X_LOW, EYE_OPEN_OFFSET, EYE_OPEN_SCALE, MOUTH_FORM_HIGH_PX, MOUTH_FORM_LOW_PX,
        MOUTH_OPEN_SCALE, PITCH_CLAMP_DEG, PITCH_OFFSET_DEG, PITCH_REFERENCE_DEG, PITCH_SCALE, ROLL_CLAMP_DEG,
        ROLL_OFFSET_DEG, ROLL_SCALE, YAW_CLAMP_DEG, YAW_OFFSET_DEG, YAW_SCALE,
    },
    features::FeatureRatios,
    Error, Result,
};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Three-way band classification: 1 above `high`, -1 below `low`, 0 inside the inclusive band.
///
/// NaN compares false against both bounds and lands in the band.
#[must_use]
pub fn threshold(value: f64, low: f64, high: f64) -> i32 {
    if value > high {
        1
    } else if value < low {
        -1
    } else {
        0
    }
}

/// Clamp, scale and offset applied to one head angle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMapping {
    /// Symmetric clamp in degrees applied before scaling
    pub clamp_deg: f64,
    pub scale: f64,
    pub offset_deg: f64,
}

impl AxisMapping {
    #[must_use]
    pub const fn new(clamp_deg: f64, scale: f64, offset_deg: f64) -> Self {
        Self {
            clamp_deg,
            scale,
            offset_deg,
        }
    }

    /// Clamp `degrees` into `[-clamp_deg, clamp_deg]`
    #[must_use]
    pub fn clamp(&self, degrees: f64) -> f64 {
        degrees.clamp(-self.clamp_deg, self.clamp_deg)
    }

    /// Scale and offset an already clamped angle
    #[must_use]
    pub fn apply(&self, clamped_deg: f64) -> f64 {
        clamped_deg * self.scale + self.offset_deg
    }
}

/// Inclusive band used with [`threshold`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    #[must_use]
    pub fn classify(&self, value: f64) -> i32 {
        threshold(value, self.low, self.high)
    }
}

/// Which feature ratios drive the expression fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSource {
    /// This frame's unfiltered ratios
    #[default]
    Raw,
    /// Ratios passed through the stabilizer bank
    Stabilized,
}

/// Tuning of the expression mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    pub roll: AxisMapping,
    pub pitch: AxisMapping,
    pub yaw: AxisMapping,
    /// |rotation-x| in degrees that maps to zero pitch
    pub pitch_reference_deg: f64,
    pub eye_open_scale: f64,
    pub eye_open_offset: f64,
    pub mouth_open_scale: f64,
    /// Mouth corner distance band in pixels
    pub mouth_form_band: Band,
    /// Mean centred iris x ratio band
    pub eye_ball_x_band: Band,
    pub feature_source: FeatureSource,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            roll: AxisMapping::new(ROLL_CLAMP_DEG, ROLL_SCALE, ROLL_OFFSET_DEG),
            pitch: AxisMapping::new(PITCH_CLAMP_DEG, PITCH_SCALE, PITCH_OFFSET_DEG),
            yaw: AxisMapping::new(YAW_CLAMP_DEG, YAW_SCALE, YAW_OFFSET_DEG),
            pitch_reference_deg: PITCH_REFERENCE_DEG,
            eye_open_scale: EYE_OPEN_SCALE,
            eye_open_offset: EYE_OPEN_OFFSET,
            mouth_open_scale: MOUTH_OPEN_SCALE,
            mouth_form_band: Band::new(MOUTH_FORM_LOW_PX, MOUTH_FORM_HIGH_PX),
            eye_ball_x_band: Band::new(EYE_BALL_X_LOW, EYE_BALL_X_HIGH),
            feature_source: FeatureSource::Raw,
        }
    }
}

impl ExpressionConfig {
    /// Check clamp ranges and band ordering
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the first invalid field
    pub fn validate(&self) -> Result<()> {
        for (name, axis) in [("roll", &self.roll), ("pitch", &self.pitch), ("yaw", &self.yaw)] {
            if !(axis.clamp_deg.is_finite() && axis.clamp_deg > 0.0) {
                return Err(Error::ConfigError(format!("{name} clamp must be positive")));
            }
            if !axis.scale.is_finite() || !axis.offset_deg.is_finite() {
                return Err(Error::ConfigError(format!("{name} scale and offset must be finite")));
            }
        }
        for (name, band) in [("mouth_form_band", &self.mouth_form_band), ("eye_ball_x_band", &self.eye_ball_x_band)] {
            if !(band.low <= band.high) {
                return Err(Error::ConfigError(format!(
                    "{name} low ({}) must not exceed high ({})",
                    band.low, band.high
                )));
            }
        }
        Ok(())
    }
}

/// Head angles in degrees after clamping, before scale and offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadAngles {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Parameters streamed to the avatar renderer for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRecord {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub eye_l_open: f64,
    pub eye_r_open: f64,
    pub mouth_open: f64,
    pub mouth_form: i32,
    pub eye_ball_x: i32,
    pub eye_ball_y: i32,
}

impl ParameterRecord {
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.roll, self.pitch, self.yaw, self.eye_l_open, self.eye_r_open, self.mouth_open]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Turns pose and features into a [`ParameterRecord`]
#[derive(Debug, Clone, Default)]
pub struct ExpressionMapper {
    config: ExpressionConfig,
}

impl ExpressionMapper {
    #[must_use]
    pub fn new(config: ExpressionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ExpressionConfig {
        &self.config
    }

    /// Clamped head angles from a rotation vector.
    ///
    /// The x component is sign-normalised first, so the two rotation vectors
    /// of a frontal face (±π about x) give the same pitch.
    #[must_use]
    pub fn head_angles(&self, rotation: &Vector3<f64>) -> HeadAngles {
        let rx = rotation.x.abs().to_degrees();
        HeadAngles {
            roll: self.config.roll.clamp(rotation.y.to_degrees()),
            pitch: self.config.pitch.clamp(self.config.pitch_reference_deg - rx),
            yaw: self.config.yaw.clamp(rotation.z.to_degrees()),
        }
    }

    /// Build the outbound record
    #[must_use]
    pub fn map(&self, rotation: &Vector3<f64>, features: &FeatureRatios) -> ParameterRecord {
        let angles = self.head_angles(rotation);
        let c = &self.config;

        ParameterRecord {
            roll: c.roll.apply(angles.roll),
            pitch: c.pitch.apply(angles.pitch),
            yaw: c.yaw.apply(angles.yaw),
            eye_l_open: features.eye_left * c.eye_open_scale + c.eye_open_offset,
            eye_r_open: features.eye_right * c.eye_open_scale + c.eye_open_offset,
            mouth_open: features.mouth_aspect_ratio * c.mouth_open_scale,
            mouth_form: c.mouth_form_band.classify(features.mouth_distance) - 1,
            eye_ball_x: c.eye_ball_x_band.classify(features.mean_iris_x()),
            eye_ball_y: 0,
        }
    }
}
