use crate::{
    constants::{CAMERA_CENTER_FACTOR, EPSILON, NUM_LANDMARKS},
    landmarks::{ImageSize, LandmarkSet},
    Error, Result,
};
use log::debug;
use nalgebra::{
    DMatrix, DVector, Matrix2x3, Matrix3, Matrix3x6, Matrix6, Point2, Point3, Rotation3, UnitQuaternion, Vector2,
    Vector3, Vector6,
};
use std::fs;
use std::path::Path;

/// Minimum number of model points the solver accepts
pub const MIN_MODEL_POINTS: usize = 6;

const MIN_LAMBDA: f64 = 1e-12;
const MAX_LAMBDA: f64 = 1e12;

/// Reference head: face-mesh landmark index and 3D position.
///
/// X points to image right, Y up, Z out of the face towards the camera,
/// nose tip at the origin. A face looking straight into the camera is
/// rotated by π about X relative to the camera frame.
const CANONICAL_MODEL: [(usize, [f64; 3]); 12] = [
    (1, [0.0, 0.0, 0.0]),         // nose tip
    (2, [0.0, -75.0, -45.0]),     // subnasale
    (168, [0.0, 165.0, -95.0]),   // nasion
    (152, [0.0, -330.0, -65.0]),  // chin
    (33, [-225.0, 170.0, -135.0]), // left eye outer corner
    (133, [-85.0, 165.0, -120.0]), // left eye inner corner
    (263, [225.0, 170.0, -135.0]), // right eye outer corner
    (362, [85.0, 165.0, -120.0]),  // right eye inner corner
    (61, [-150.0, -150.0, -125.0]), // left mouth corner
    (291, [150.0, -150.0, -125.0]), // right mouth corner
    (234, [-380.0, 60.0, -330.0]), // left cheek contour
    (454, [380.0, 60.0, -330.0]),  // right cheek contour
];

/// Fixed 3D reference points tied to landmark indices
#[derive(Debug, Clone, PartialEq)]
pub struct PoseModel {
    landmarks: Vec<usize>,
    points: Vec<Point3<f64>>,
}

impl PoseModel {
    /// Build a model from landmark indices and matching 3D points
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The two sequences differ in length
    /// - Fewer than [`MIN_MODEL_POINTS`] points are given
    /// - An index is out of the landmark range or repeated
    pub fn new(landmarks: Vec<usize>, points: Vec<Point3<f64>>) -> Result<Self> {
        if landmarks.len() != points.len() {
            return Err(Error::InvalidInput(format!(
                "Model has {} indices but {} points",
                landmarks.len(),
                points.len()
            )));
        }
        if points.len() < MIN_MODEL_POINTS {
            return Err(Error::InvalidInput(format!(
                "Model needs at least {MIN_MODEL_POINTS} points, got {}",
                points.len()
            )));
        }
        for (pos, &idx) in landmarks.iter().enumerate() {
            if idx >= NUM_LANDMARKS {
                return Err(Error::InvalidInput(format!("Model landmark index {idx} out of range")));
            }
            if landmarks[..pos].contains(&idx) {
                return Err(Error::InvalidInput(format!("Model landmark index {idx} repeated")));
            }
        }
        Ok(Self { landmarks, points })
    }

    /// The built-in reference head
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            landmarks: CANONICAL_MODEL.iter().map(|(idx, _)| *idx).collect(),
            points: CANONICAL_MODEL
                .iter()
                .map(|(_, [x, y, z])| Point3::new(*x, *y, *z))
                .collect(),
        }
    }

    /// Load a model from a text file, one `index x y z` line per point
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse `index x y z` lines; blank lines and `#` comments are skipped
    fn parse(content: &str) -> Result<Self> {
        let mut landmarks = Vec::new();
        let mut points = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 4 {
                return Err(Error::InvalidInput(format!(
                    "Model line {}: expected 4 fields, got {}",
                    line_no + 1,
                    fields.len()
                )));
            }
            let idx = fields[0]
                .parse::<usize>()
                .map_err(|e| Error::InvalidInput(format!("Model line {}: {e}", line_no + 1)))?;
            let mut coords = [0.0; 3];
            for (slot, field) in coords.iter_mut().zip(&fields[1..]) {
                *slot = field
                    .parse::<f64>()
                    .map_err(|e| Error::InvalidInput(format!("Model line {}: {e}", line_no + 1)))?;
            }
            landmarks.push(idx);
            points.push(Point3::new(coords[0], coords[1], coords[2]));
        }
        Self::new(landmarks, points)
    }

    /// Landmark index of every model point
    #[must_use]
    pub fn landmark_indices(&self) -> &[usize] {
        &self.landmarks
    }

    /// The 3D reference points
    #[must_use]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Number of model points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed model
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for PoseModel {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Pinhole camera assumed from the image size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraModel {
    /// Focal length along x in pixels
    pub fx: f64,
    /// Focal length along y in pixels
    pub fy: f64,
    /// Principal point x
    pub cx: f64,
    /// Principal point y
    pub cy: f64,
    /// Image size this camera was built for
    pub image_size: ImageSize,
}

impl CameraModel {
    /// Focal length equal to the image width, principal point at the centre
    #[must_use]
    pub fn from_image_size(image_size: ImageSize) -> Self {
        let focal_length = f64::from(image_size.width);
        Self {
            fx: focal_length,
            fy: focal_length,
            cx: f64::from(image_size.width) / CAMERA_CENTER_FACTOR,
            cy: f64::from(image_size.height) / CAMERA_CENTER_FACTOR,
            image_size,
        }
    }

    /// Project a camera-frame point, `None` if it is not in front of the camera
    #[must_use]
    pub fn project(&self, point: &Vector3<f64>) -> Option<Point2<f64>> {
        if point.z <= EPSILON {
            return None;
        }
        Some(Point2::new(
            self.fx * point.x / point.z + self.cx,
            self.fy * point.y / point.z + self.cy,
        ))
    }

    /// Project model points through a rotation vector and translation
    #[must_use]
    pub fn project_points(
        &self,
        rotation: &Vector3<f64>,
        translation: &Vector3<f64>,
        points: &[Point3<f64>],
    ) -> Vec<Option<Point2<f64>>> {
        let rot = Rotation3::new(*rotation);
        points
            .iter()
            .map(|p| self.project(&(rot * p.coords + translation)))
            .collect()
    }

    fn normalize(&self, pixel: &Point2<f64>) -> Vector2<f64> {
        Vector2::new((pixel.x - self.cx) / self.fx, (pixel.y - self.cy) / self.fy)
    }
}

/// Rotation and translation of the reference head in camera coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseEstimate {
    /// Axis-angle rotation vector, radians
    pub rotation: Vector3<f64>,
    /// Translation in model units
    pub translation: Vector3<f64>,
    /// Root-mean-square reprojection error in pixels
    pub reprojection_rmse: f64,
}

impl PoseEstimate {
    /// Rotation matrix of this estimate
    #[must_use]
    pub fn rotation_matrix(&self) -> Rotation3<f64> {
        Rotation3::new(self.rotation)
    }

    /// All components finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.rotation.iter().chain(self.translation.iter()).all(|v| v.is_finite())
    }
}

/// Rotation vector of a rotation, angle in `[0, π]`
#[must_use]
pub fn rotation_to_vector(rotation: &Rotation3<f64>) -> Vector3<f64> {
    UnitQuaternion::from_rotation_matrix(rotation).scaled_axis()
}

/// Parameters of the Levenberg-Marquardt refinement
#[derive(Debug, Clone)]
pub struct SolverParams {
    /// Maximum number of LM iterations
    pub max_iterations: usize,
    /// Initial damping factor
    pub initial_lambda: f64,
    /// Stop when the relative cost decrease falls below this
    pub cost_tolerance: f64,
    /// Stop when the largest gradient component falls below this
    pub gradient_tolerance: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            initial_lambda: 1e-3,
            cost_tolerance: 1e-12,
            gradient_tolerance: 1e-9,
        }
    }
}

impl SolverParams {
    /// Set maximum iterations
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set initial damping
    #[must_use]
    pub fn with_initial_lambda(mut self, lambda: f64) -> Self {
        self.initial_lambda = lambda;
        self
    }
}

/// Head pose estimator solving the perspective-n-point problem against a
/// fixed reference head.
///
/// The only state is the camera model, built from the image size of the
/// first frame and rebuilt on [`PoseEstimator::reset`] or when the image
/// size changes.
pub struct PoseEstimator {
    model: PoseModel,
    camera: Option<CameraModel>,
    params: SolverParams,
}

impl PoseEstimator {
    /// Create an estimator with no camera yet
    #[must_use]
    pub fn new(model: PoseModel) -> Self {
        log::info!("Initializing PoseEstimator with {} model points", model.len());
        Self {
            model,
            camera: None,
            params: SolverParams::default(),
        }
    }

    /// Replace the solver parameters
    #[must_use]
    pub fn with_params(mut self, params: SolverParams) -> Self {
        self.params = params;
        self
    }

    /// The reference model
    #[must_use]
    pub fn model(&self) -> &PoseModel {
        &self.model
    }

    /// Currently cached camera, if any
    #[must_use]
    pub fn camera(&self) -> Option<&CameraModel> {
        self.camera.as_ref()
    }

    /// Drop the cached camera and rebuild it for `image_size`
    pub fn reset(&mut self, image_size: ImageSize) {
        debug!("Resetting pose estimator camera for {image_size}");
        self.camera = Some(CameraModel::from_image_size(image_size));
    }

    /// Estimate the head pose from a full landmark set
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPose`] if the solver cannot recover a pose for this frame
    pub fn estimate(&mut self, landmarks: &LandmarkSet, image_size: ImageSize) -> Result<PoseEstimate> {
        let camera = match self.camera {
            Some(camera) if camera.image_size == image_size => camera,
            _ => {
                debug!("Building camera model for {image_size}");
                let camera = CameraModel::from_image_size(image_size);
                self.camera = Some(camera);
                camera
            }
        };
        let image_points = landmarks.select(self.model.landmark_indices());
        self.solve(&camera, &image_points)
    }

    /// Solve for the pose given the model-ordered image points
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPose`] if:
    /// - The number of image points does not match the model
    /// - The linear initialisation is degenerate
    /// - A model point ends up behind the camera
    /// - The result is not finite
    pub fn solve(&self, camera: &CameraModel, image_points: &[Point2<f64>]) -> Result<PoseEstimate> {
        if image_points.len() != self.model.len() {
            return Err(Error::NoPose(format!(
                "Expected {} pose landmarks, got {}",
                self.model.len(),
                image_points.len()
            )));
        }

        let (rotation, translation) = self.weak_perspective_init(camera, image_points)?;
        let (rotation, translation, cost) = self.refine(camera, image_points, rotation, translation)?;

        #[allow(clippy::cast_precision_loss)]
        let estimate = PoseEstimate {
            rotation: rotation_to_vector(&rotation),
            translation,
            reprojection_rmse: (cost / image_points.len() as f64).sqrt(),
        };
        if !estimate.is_finite() {
            return Err(Error::NoPose("Solver produced non-finite pose".to_string()));
        }
        Ok(estimate)
    }

    /// Pose from orthography and scaling: linear solve under weak perspective
    fn weak_perspective_init(
        &self,
        camera: &CameraModel,
        image_points: &[Point2<f64>],
    ) -> Result<(Rotation3<f64>, Vector3<f64>)> {
        let points = self.model.points();
        let origin = points[0];
        let obs0 = camera.normalize(&image_points[0]);

        let rows = points.len() - 1;
        let mut a = DMatrix::<f64>::zeros(rows, 3);
        let mut bx = DVector::<f64>::zeros(rows);
        let mut by = DVector::<f64>::zeros(rows);
        for (row, (point, pixel)) in points.iter().zip(image_points).skip(1).enumerate() {
            let d = point - origin;
            a[(row, 0)] = d.x;
            a[(row, 1)] = d.y;
            a[(row, 2)] = d.z;
            let obs = camera.normalize(pixel);
            bx[row] = obs.x - obs0.x;
            by[row] = obs.y - obs0.y;
        }

        let svd = a.svd(true, true);
        let i = svd.solve(&bx, EPSILON).map_err(|e| Error::NoPose(e.to_string()))?;
        let j = svd.solve(&by, EPSILON).map_err(|e| Error::NoPose(e.to_string()))?;
        let i = Vector3::new(i[0], i[1], i[2]);
        let j = Vector3::new(j[0], j[1], j[2]);

        let (norm_i, norm_j) = (i.norm(), j.norm());
        if norm_i < EPSILON || norm_j < EPSILON {
            return Err(Error::NoPose("Degenerate weak-perspective solution".to_string()));
        }
        let r1 = i / norm_i;
        let r2 = j / norm_j;
        let r3 = r1.cross(&r2);
        if r3.norm() < EPSILON {
            return Err(Error::NoPose("Collinear weak-perspective axes".to_string()));
        }

        let rotation = nearest_rotation(&Matrix3::from_rows(&[r1.transpose(), r2.transpose(), r3.transpose()]))?;
        let depth = 2.0 / (norm_i + norm_j);
        let origin_cam = Vector3::new(obs0.x * depth, obs0.y * depth, depth);
        let translation = origin_cam - rotation * origin.coords;
        Ok((rotation, translation))
    }

    /// Levenberg-Marquardt on SO(3) x R^3, left-multiplied rotation updates
    fn refine(
        &self,
        camera: &CameraModel,
        image_points: &[Point2<f64>],
        mut rotation: Rotation3<f64>,
        mut translation: Vector3<f64>,
    ) -> Result<(Rotation3<f64>, Vector3<f64>, f64)> {
        let mut cost = self.reprojection_cost(camera, image_points, &rotation, &translation)?;
        let mut lambda = self.params.initial_lambda;

        for iteration in 0..self.params.max_iterations {
            let (h, g) = self.normal_equations(camera, image_points, &rotation, &translation)?;
            if g.amax() < self.params.gradient_tolerance {
                debug!("LM converged on gradient after {iteration} iterations");
                break;
            }

            let mut improvement = None;
            while lambda < MAX_LAMBDA {
                let mut damped = h;
                for k in 0..6 {
                    damped[(k, k)] += lambda * h[(k, k)].max(EPSILON);
                }
                let Some(cholesky) = damped.cholesky() else {
                    lambda *= 10.0;
                    continue;
                };
                let delta = cholesky.solve(&(-g));
                let candidate_rotation = Rotation3::new(Vector3::new(delta[0], delta[1], delta[2])) * rotation;
                let candidate_translation = translation + Vector3::new(delta[3], delta[4], delta[5]);
                match self.reprojection_cost(camera, image_points, &candidate_rotation, &candidate_translation) {
                    Ok(candidate_cost) if candidate_cost < cost => {
                        improvement = Some(cost - candidate_cost);
                        rotation = candidate_rotation;
                        translation = candidate_translation;
                        cost = candidate_cost;
                        lambda = (lambda * 0.1).max(MIN_LAMBDA);
                        break;
                    }
                    _ => lambda *= 10.0,
                }
            }

            match improvement {
                Some(delta_cost) if delta_cost > self.params.cost_tolerance * (cost + delta_cost) => {}
                _ => {
                    debug!("LM stopped after {} iterations, cost {cost:.3e}", iteration + 1);
                    break;
                }
            }
        }

        Ok((rotation, translation, cost))
    }

    fn reprojection_cost(
        &self,
        camera: &CameraModel,
        image_points: &[Point2<f64>],
        rotation: &Rotation3<f64>,
        translation: &Vector3<f64>,
    ) -> Result<f64> {
        let mut cost = 0.0;
        for (point, observed) in self.model.points().iter().zip(image_points) {
            let projected = camera
                .project(&(rotation * point.coords + translation))
                .ok_or_else(|| Error::NoPose("Model point behind camera".to_string()))?;
            cost += (projected - observed).norm_squared();
        }
        Ok(cost)
    }

    /// Gauss-Newton normal equations `(JᵀJ, Jᵀr)` of the reprojection residuals
    fn normal_equations(
        &self,
        camera: &CameraModel,
        image_points: &[Point2<f64>],
        rotation: &Rotation3<f64>,
        translation: &Vector3<f64>,
    ) -> Result<(Matrix6<f64>, Vector6<f64>)> {
        let mut h = Matrix6::zeros();
        let mut g = Vector6::zeros();
        for (point, observed) in self.model.points().iter().zip(image_points) {
            let rotated = rotation * point.coords;
            let p = rotated + translation;
            if p.z <= EPSILON {
                return Err(Error::NoPose("Model point behind camera".to_string()));
            }
            let inv_z = 1.0 / p.z;
            let residual = Vector2::new(
                camera.fx * p.x * inv_z + camera.cx - observed.x,
                camera.fy * p.y * inv_z + camera.cy - observed.y,
            );
            let d_proj = Matrix2x3::new(
                camera.fx * inv_z,
                0.0,
                -camera.fx * p.x * inv_z * inv_z,
                0.0,
                camera.fy * inv_z,
                -camera.fy * p.y * inv_z * inv_z,
            );
            let mut d_pose = Matrix3x6::zeros();
            d_pose.fixed_view_mut::<3, 3>(0, 0).copy_from(&(-rotated.cross_matrix()));
            d_pose.fixed_view_mut::<3, 3>(0, 3).copy_from(&Matrix3::identity());
            let jacobian = d_proj * d_pose;
            h += jacobian.transpose() * jacobian;
            g += jacobian.transpose() * residual;
        }
        Ok((h, g))
    }
}

/// Closest rotation to `m` in the Frobenius sense
fn nearest_rotation(m: &Matrix3<f64>) -> Result<Rotation3<f64>> {
    let svd = m.svd(true, true);
    let (Some(mut u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Err(Error::NoPose("SVD failed during orthonormalization".to_string()));
    };
    if (u * v_t).determinant() < 0.0 {
        u.column_mut(2).neg_mut();
    }
    Ok(Rotation3::from_matrix_unchecked(u * v_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn camera() -> CameraModel {
        CameraModel::from_image_size(ImageSize::new(640, 480).unwrap())
    }

    /// Head facing the camera, then turned by the given angles in degrees
    fn facing_pose(yaw: f64, pitch: f64, roll: f64) -> Rotation3<f64> {
        Rotation3::from_euler_angles(pitch.to_radians(), yaw.to_radians(), roll.to_radians())
            * Rotation3::from_axis_angle(&Vector3::x_axis(), PI)
    }

    fn observe(estimator: &PoseEstimator, rotation: &Rotation3<f64>, translation: &Vector3<f64>) -> Vec<Point2<f64>> {
        camera()
            .project_points(&rotation_to_vector(rotation), translation, estimator.model().points())
            .into_iter()
            .map(|p| p.unwrap())
            .collect()
    }

    #[test]
    fn test_camera_from_image_size() {
        let cam = camera();
        assert_eq!(cam.fx, 640.0);
        assert_eq!(cam.fy, 640.0);
        assert_eq!(cam.cx, 320.0);
        assert_eq!(cam.cy, 240.0);
        assert!(cam.project(&Vector3::new(0.0, 0.0, -1.0)).is_none());
    }

    #[test]
    fn test_rotation_vector_at_half_turn() {
        let rot = Rotation3::from_axis_angle(&Vector3::x_axis(), PI);
        let v = rotation_to_vector(&rot);
        assert_relative_eq!(v.x.abs(), PI, epsilon = 1e-9);
        assert!(v.y.abs() < 1e-9 && v.z.abs() < 1e-9);
    }

    #[test]
    fn test_recovers_frontal_pose() {
        let estimator = PoseEstimator::new(PoseModel::canonical());
        let rotation = facing_pose(0.0, 0.0, 0.0);
        let translation = Vector3::new(0.0, 0.0, 3000.0);
        let observed = observe(&estimator, &rotation, &translation);

        let estimate = estimator.solve(&camera(), &observed).unwrap();
        let error = (estimate.rotation_matrix().inverse() * rotation).angle();
        assert!(error < 1e-6, "rotation error {error}");
        assert_relative_eq!(estimate.translation, translation, epsilon = 1e-3);
        assert!(estimate.reprojection_rmse < 1e-6);
    }

    #[test]
    fn test_recovers_turned_pose() {
        let estimator = PoseEstimator::new(PoseModel::canonical());
        for &(yaw, pitch, roll) in &[(20.0, 0.0, 0.0), (-15.0, 10.0, 5.0), (0.0, -12.0, -8.0)] {
            let rotation = facing_pose(yaw, pitch, roll);
            let translation = Vector3::new(-120.0, 80.0, 2600.0);
            let observed = observe(&estimator, &rotation, &translation);

            let estimate = estimator.solve(&camera(), &observed).unwrap();
            let error = (estimate.rotation_matrix().inverse() * rotation).angle();
            assert!(error < 1e-6, "rotation error {error} for ({yaw}, {pitch}, {roll})");
            assert_relative_eq!(estimate.translation, translation, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_wrong_point_count_is_no_pose() {
        let estimator = PoseEstimator::new(PoseModel::canonical());
        let points = vec![Point2::new(1.0, 2.0); 3];
        assert!(matches!(estimator.solve(&camera(), &points), Err(Error::NoPose(_))));
    }

    #[test]
    fn test_collapsed_points_are_no_pose() {
        let estimator = PoseEstimator::new(PoseModel::canonical());
        let points = vec![Point2::new(320.0, 240.0); estimator.model().len()];
        assert!(matches!(estimator.solve(&camera(), &points), Err(Error::NoPose(_))));
    }

    #[test]
    fn test_reset_rebuilds_camera() {
        let mut estimator = PoseEstimator::new(PoseModel::canonical());
        assert!(estimator.camera().is_none());
        estimator.reset(ImageSize::new(1280, 720).unwrap());
        let cam = estimator.camera().unwrap();
        assert_eq!(cam.cx, 640.0);
        assert_eq!(cam.cy, 360.0);
        assert_eq!(cam.fx, 1280.0);
    }

    #[test]
    fn test_parse_model_points() {
        let content = "# index x y z\n1 0 0 0\n152 0 -330 -65\n33 -225 170 -135\n263 225 170 -135\n\n61 -150 -150 -125\n291 150 -150 -125\n";
        let model = PoseModel::parse(content).unwrap();
        assert_eq!(model.len(), 6);
        assert_eq!(model.landmark_indices()[1], 152);
        assert_eq!(model.points()[2], Point3::new(-225.0, 170.0, -135.0));
    }

    #[test]
    fn test_parse_model_points_invalid() {
        // Too few points
        assert!(PoseModel::parse("1 0 0 0\n2 1 1 1").is_err());
        // Bad number
        assert!(PoseModel::parse("1 0 0 abc").is_err());
        // Wrong field count
        assert!(PoseModel::parse("1 0 0").is_err());
        // Out of range index
        let content = (0..6).map(|i| format!("{} 0 0 {i}", 500 + i)).collect::<Vec<_>>().join("\n");
        assert!(PoseModel::parse(&content).is_err());
        // Repeated index
        let content = (0..6).map(|i| format!("7 {i} 0 0")).collect::<Vec<_>>().join("\n");
        assert!(PoseModel::parse(&content).is_err());
    }

    #[test]
    fn test_canonical_model_is_valid() {
        let model = PoseModel::canonical();
        assert!(PoseModel::new(model.landmark_indices().to_vec(), model.points().to_vec()).is_ok());
    }
}
