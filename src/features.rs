//! Geometric facial feature ratios computed from a landmark set.
//!
//! Every function here is pure: the same landmarks always give the same
//! ratios, and degenerate geometry yields 0 (or a neutral factor) instead of
//! dividing by zero.

use crate::{
    constants::{EPSILON, LEFT_IRIS_CENTER, RIGHT_IRIS_CENTER},
    landmarks::LandmarkSet,
};
use nalgebra::{distance, Point2};

/// Lower lid contour followed by upper lid contour of the left (image left) eye
pub const LEFT_EYE_CONTOUR: [usize; 16] = [
    33, 7, 163, 144, 145, 153, 154, 155, 133, 246, 161, 160, 159, 158, 157, 173,
];

/// Lower lid contour followed by upper lid contour of the right (image right) eye
pub const RIGHT_EYE_CONTOUR: [usize; 16] = [
    263, 249, 390, 373, 374, 380, 381, 382, 362, 466, 388, 387, 386, 385, 384, 398,
];

/// Brow landmark above the left eye
pub const LEFT_BROW: usize = 105;

/// Brow landmark above the right eye
pub const RIGHT_BROW: usize = 334;

/// Nose landmarks spanning the fixed face scale of the brow lift factor
pub const NOSE_BASE: usize = 2;
pub const NOSE_BRIDGE: usize = 6;

/// Mouth corners
pub const MOUTH_LEFT_CORNER: usize = 78;
pub const MOUTH_RIGHT_CORNER: usize = 308;

/// Vertical lip pairs, outer left, centre, outer right
pub const MOUTH_VERTICAL_PAIRS: [(usize, usize); 3] = [(81, 178), (13, 14), (311, 402)];

// Positions inside an eye contour
const CORNER_START: usize = 0;
const CORNER_END: usize = 8;
const LOWER_LID_CENTER: usize = 4;
const UPPER_LID_CENTER: usize = 12;

/// Which eye a feature is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// The 16 contour landmark indices of this eye
    #[must_use]
    pub fn contour(self) -> &'static [usize; 16] {
        match self {
            Self::Left => &LEFT_EYE_CONTOUR,
            Self::Right => &RIGHT_EYE_CONTOUR,
        }
    }

    #[must_use]
    pub fn brow(self) -> usize {
        match self {
            Self::Left => LEFT_BROW,
            Self::Right => RIGHT_BROW,
        }
    }

    #[must_use]
    pub fn iris_center(self) -> usize {
        match self {
            Self::Left => LEFT_IRIS_CENTER,
            Self::Right => RIGHT_IRIS_CENTER,
        }
    }
}

fn midpoint(a: Point2<f64>, b: Point2<f64>) -> Point2<f64> {
    nalgebra::center(&a, &b)
}

/// Eye aspect ratio scaled by the brow lift factor.
///
/// The factor is the brow to nose base distance over the nose length, so it
/// grows with a raised brow but does not depend on the lids. Returns 0 when
/// the eye has no width.
#[must_use]
pub fn eye_aspect_ratio(landmarks: &LandmarkSet, eye: Eye) -> f64 {
    let k = landmarks.select(eye.contour());

    let p1 = k[CORNER_START];
    let p4 = k[CORNER_END];
    let p2 = midpoint(k[10], k[11]);
    let p3 = midpoint(k[13], k[14]);
    let p6 = midpoint(k[2], k[3]);
    let p5 = midpoint(k[5], k[6]);

    let width = distance(&p1, &p4);
    if width < EPSILON {
        return 0.0;
    }
    let ratio = (distance(&p2, &p6) + distance(&p3, &p5)) / (2.0 * width);

    ratio * brow_factor(landmarks, eye)
}

fn brow_factor(landmarks: &LandmarkSet, eye: Eye) -> f64 {
    let base = landmarks.point(NOSE_BASE);
    let scale = distance(&landmarks.point(NOSE_BRIDGE), &base);
    if scale < EPSILON {
        return 1.0;
    }
    distance(&landmarks.point(eye.brow()), &base) / scale
}

/// Mouth aspect ratio, 0 when the mouth has no width
#[must_use]
pub fn mouth_aspect_ratio(landmarks: &LandmarkSet) -> f64 {
    let width = mouth_distance(landmarks);
    if width < EPSILON {
        return 0.0;
    }
    let vertical: f64 = MOUTH_VERTICAL_PAIRS
        .iter()
        .map(|&(top, bottom)| distance(&landmarks.point(top), &landmarks.point(bottom)))
        .sum();
    vertical / (2.0 * width)
}

/// Distance between the mouth corners in pixels
#[must_use]
pub fn mouth_distance(landmarks: &LandmarkSet) -> f64 {
    distance(
        &landmarks.point(MOUTH_LEFT_CORNER),
        &landmarks.point(MOUTH_RIGHT_CORNER),
    )
}

/// Iris position inside the eye as `(x, y)`, both centred so a straight gaze is near `(0, 0)`.
///
/// `x` runs along the corner-to-corner axis, mirrored for the right eye so
/// both eyes grow toward image right and a shared gaze gives the same sign.
/// `y` runs from the upper lid centre to the lower lid centre. A degenerate
/// axis gives 0 for that component.
#[must_use]
pub fn iris_ratio(landmarks: &LandmarkSet, eye: Eye) -> (f64, f64) {
    let k = landmarks.select(eye.contour());
    let iris = landmarks.point(eye.iris_center());

    let (from, to) = match eye {
        Eye::Left => (CORNER_START, CORNER_END),
        Eye::Right => (CORNER_END, CORNER_START),
    };
    let x = axis_ratio(k[from], k[to], iris);
    let y = axis_ratio(k[UPPER_LID_CENTER], k[LOWER_LID_CENTER], iris);
    (x, y)
}

// Scalar projection of `p - start` onto `end - start`, normalised by the squared axis length, minus 0.5
fn axis_ratio(start: Point2<f64>, end: Point2<f64>, p: Point2<f64>) -> f64 {
    let axis = end - start;
    let len_sq = axis.norm_squared();
    if len_sq < EPSILON {
        return 0.0;
    }
    (p - start).dot(&axis) / len_sq - 0.5
}

/// All per-frame feature ratios of one face
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureRatios {
    pub eye_left: f64,
    pub eye_right: f64,
    pub iris_left: (f64, f64),
    pub iris_right: (f64, f64),
    pub mouth_aspect_ratio: f64,
    /// Mouth corner distance in pixels
    pub mouth_distance: f64,
}

impl FeatureRatios {
    /// Compute every ratio from one landmark set
    #[must_use]
    pub fn extract(landmarks: &LandmarkSet) -> Self {
        Self {
            eye_left: eye_aspect_ratio(landmarks, Eye::Left),
            eye_right: eye_aspect_ratio(landmarks, Eye::Right),
            iris_left: iris_ratio(landmarks, Eye::Left),
            iris_right: iris_ratio(landmarks, Eye::Right),
            mouth_aspect_ratio: mouth_aspect_ratio(landmarks),
            mouth_distance: mouth_distance(landmarks),
        }
    }

    /// Mean of the two centred iris x ratios
    #[must_use]
    pub fn mean_iris_x(&self) -> f64 {
        (self.iris_left.0 + self.iris_right.0) / 2.0
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        [
            self.eye_left,
            self.eye_right,
            self.iris_left.0,
            self.iris_left.1,
            self.iris_right.0,
            self.iris_right.1,
            self.mouth_aspect_ratio,
            self.mouth_distance,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
