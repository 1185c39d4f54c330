//! Per-frame pipeline: pose, stabilization, features and expression mapping.

use crate::{
    config::Config,
    expression::{ExpressionConfig, ExpressionMapper, FeatureSource, HeadAngles, ParameterRecord},
    features::FeatureRatios,
    filters::{Channel, FaceLossPolicy, StabilizerBank},
    landmarks::SourceFrame,
    pose_estimation::{PoseEstimate, PoseEstimator},
    Result,
};
use log::{debug, warn};
use nalgebra::Vector3;
use std::f64::consts::{FRAC_PI_2, PI};

/// Intermediate values of the last frame that produced a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub pose: PoseEstimate,
    pub stabilized_pose: PoseEstimate,
    pub features: FeatureRatios,
    pub stabilized_features: FeatureRatios,
    pub head_angles: HeadAngles,
}

/// Pick the rotation vector equivalent to `rotation` that is closest to `reference`.
///
/// A rotation by angle θ about axis n equals a rotation by θ − 2π about n, so
/// near a half turn the solver can hand back either sign from frame to frame.
/// Feeding the stabilizers the representation nearest their current state
/// keeps them from averaging +π and −π into zero.
#[must_use]
pub fn unwrap_rotation(rotation: &Vector3<f64>, reference: &Vector3<f64>) -> Vector3<f64> {
    let angle = rotation.norm();
    if angle < FRAC_PI_2 {
        return *rotation;
    }
    let alternative = rotation - rotation * (2.0 * PI / angle);
    if (alternative - reference).norm() < (rotation - reference).norm() {
        alternative
    } else {
        *rotation
    }
}

/// Owns the pose estimator, the stabilizer bank and the expression mapper
pub struct Pipeline {
    estimator: PoseEstimator,
    bank: StabilizerBank,
    mapper: ExpressionMapper,
    face_loss_policy: FaceLossPolicy,
    last_report: Option<FrameReport>,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        estimator: PoseEstimator,
        bank: StabilizerBank,
        expression: ExpressionConfig,
        face_loss_policy: FaceLossPolicy,
    ) -> Self {
        Self {
            estimator,
            bank,
            mapper: ExpressionMapper::new(expression),
            face_loss_policy,
            last_report: None,
        }
    }

    /// Build a pipeline from the application configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured pose model cannot be loaded
    pub fn from_config(config: &Config) -> Result<Self> {
        let model = config.pose.load_model()?;
        let estimator = PoseEstimator::new(model).with_params(config.pose.solver_params());
        let bank = StabilizerBank::new(config.stabilizer.process_noise, config.stabilizer.measurement_noise);
        Ok(Self::new(
            estimator,
            bank,
            config.expression.clone(),
            config.stabilizer.face_loss_policy,
        ))
    }

    /// Run one frame through the pipeline.
    ///
    /// Returns `None` when the frame has no face, the pose cannot be solved or
    /// the resulting record is not finite.
    pub fn process(&mut self, frame: &SourceFrame) -> Option<ParameterRecord> {
        let Some(landmarks) = &frame.landmarks else {
            debug!("No face in {} frame", frame.image_size);
            self.estimator.reset(frame.image_size);
            self.bank.on_face_lost(self.face_loss_policy);
            self.last_report = None;
            return None;
        };

        let pose = match self.estimator.estimate(landmarks, frame.image_size) {
            Ok(pose) => pose,
            Err(e) => {
                debug!("Skipping frame: {e}");
                return None;
            }
        };

        let reference = Vector3::new(
            self.bank.value(Channel::RotationX),
            self.bank.value(Channel::RotationY),
            self.bank.value(Channel::RotationZ),
        );
        let unwrapped = PoseEstimate {
            rotation: unwrap_rotation(&pose.rotation, &reference),
            ..pose
        };
        let stabilized_pose = self.bank.update_pose(&unwrapped);

        let features = FeatureRatios::extract(landmarks);
        let stabilized_features = self.bank.update_features(&features);
        let used = match self.mapper.config().feature_source {
            FeatureSource::Raw => &features,
            FeatureSource::Stabilized => &stabilized_features,
        };

        let record = self.mapper.map(&stabilized_pose.rotation, used);
        if !record.is_finite() {
            warn!("Dropping non-finite record: {record:?}");
            return None;
        }

        let head_angles = self.mapper.head_angles(&stabilized_pose.rotation);
        debug!(
            "rvec ({:.3}, {:.3}, {:.3}) rmse {:.2}px roll {:.1} pitch {:.1} yaw {:.1}",
            pose.rotation.x,
            pose.rotation.y,
            pose.rotation.z,
            pose.reprojection_rmse,
            head_angles.roll,
            head_angles.pitch,
            head_angles.yaw
        );
        self.last_report = Some(FrameReport {
            pose,
            stabilized_pose,
            features,
            stabilized_features,
            head_angles,
        });

        Some(record)
    }

    /// Details of the last frame that produced a record
    #[must_use]
    pub fn last_report(&self) -> Option<&FrameReport> {
        self.last_report.as_ref()
    }

    #[must_use]
    pub fn estimator(&self) -> &PoseEstimator {
        &self.estimator
    }

    #[must_use]
    pub fn stabilizers(&self) -> &StabilizerBank {
        &self.bank
    }
}
