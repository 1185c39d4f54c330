//! Constants used throughout the pipeline

/// Number of face-mesh landmarks including the refined iris points
pub const NUM_LANDMARKS: usize = 478;

/// First index of the iris refinement sub-range
pub const IRIS_LANDMARK_START: usize = 468;

/// Number of iris refinement points (5 per eye)
pub const NUM_IRIS_LANDMARKS: usize = 10;

/// Iris centre landmark of the left eye (image left)
pub const LEFT_IRIS_CENTER: usize = 468;

/// Iris centre landmark of the right eye (image right)
pub const RIGHT_IRIS_CENTER: usize = 473;

/// Camera matrix center factor
pub const CAMERA_CENTER_FACTOR: f64 = 2.0;

/// Default Kalman process noise for every channel
pub const DEFAULT_PROCESS_NOISE: f64 = 0.1;

/// Default Kalman measurement noise for every channel
pub const DEFAULT_MEASUREMENT_NOISE: f64 = 0.1;

/// Nominal face distance from the camera in model units, neutral for `TranslationZ`
pub const NOMINAL_FACE_DEPTH: f64 = 3000.0;

/// Eye aspect ratio of a relaxed open eye, neutral for the eye openness channels
pub const NEUTRAL_EYE_ASPECT_RATIO: f64 = 0.5;

/// Head angle clamps, degrees
pub const ROLL_CLAMP_DEG: f64 = 30.0;
pub const PITCH_CLAMP_DEG: f64 = 90.0;
pub const YAW_CLAMP_DEG: f64 = 30.0;

/// |rotation-x| in degrees that maps to zero pitch
pub const PITCH_REFERENCE_DEG: f64 = 177.0;

/// Renderer scale factors and offsets, output degrees per input degree
pub const ROLL_SCALE: f64 = 2.0;
pub const PITCH_SCALE: f64 = 3.0;
pub const YAW_SCALE: f64 = 1.0;
pub const ROLL_OFFSET_DEG: f64 = 0.0;
pub const PITCH_OFFSET_DEG: f64 = 0.0;
pub const YAW_OFFSET_DEG: f64 = 3.0;

/// Eye openness = EAR * scale + offset
pub const EYE_OPEN_SCALE: f64 = 6.0;
pub const EYE_OPEN_OFFSET: f64 = -2.0;

/// Mouth openness = MAR * scale
pub const MOUTH_OPEN_SCALE: f64 = 1.5;

/// Mouth distance band in pixels for the mouth form class
pub const MOUTH_FORM_LOW_PX: f64 = 45.0;
pub const MOUTH_FORM_HIGH_PX: f64 = 50.0;

/// Centred iris x ratio band for the eye ball direction class
pub const EYE_BALL_X_LOW: f64 = -0.05;
pub const EYE_BALL_X_HIGH: f64 = 0.07;

/// Default renderer endpoint
pub const DEFAULT_ENDPOINT: &str = "127.0.0.1:5252";

/// Event name carried by every outbound message
pub const DEFAULT_EVENT_NAME: &str = "msg";

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
