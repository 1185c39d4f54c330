//! Landmark sets and image geometry handed over by the face-mesh detector.

use crate::{
    constants::{IRIS_LANDMARK_START, NUM_IRIS_LANDMARKS, NUM_LANDMARKS},
    Error, Result,
};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of the image the landmarks were detected in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageSize {
    /// Create an image size, rejecting empty dimensions
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!("Image size must be non-empty, got {width}x{height}")));
        }
        Ok(Self { width, height })
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One face's full landmark set in pixel coordinates.
///
/// Always exactly [`NUM_LANDMARKS`] points with finite coordinates; the
/// last [`NUM_IRIS_LANDMARKS`] points are the refined iris landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Point2<f64>>,
}

impl LandmarkSet {
    /// Validate and wrap a landmark sequence
    ///
    /// # Errors
    ///
    /// Returns an error if the point count is not [`NUM_LANDMARKS`] or any
    /// coordinate is NaN or infinite
    pub fn new(points: Vec<Point2<f64>>) -> Result<Self> {
        if points.len() != NUM_LANDMARKS {
            return Err(Error::InvalidLandmarks(format!(
                "Expected {} landmarks, got {}",
                NUM_LANDMARKS,
                points.len()
            )));
        }
        if let Some(idx) = points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(Error::InvalidLandmarks(format!("Non-finite coordinate at landmark {idx}")));
        }
        Ok(Self { points })
    }

    /// Build a landmark set from `(x, y)` pairs
    ///
    /// # Errors
    ///
    /// Same conditions as [`LandmarkSet::new`]
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Result<Self> {
        Self::new(pairs.iter().map(|&[x, y]| Point2::new(x, y)).collect())
    }

    /// Landmark at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= NUM_LANDMARKS`; every index used by the pipeline is a constant below that bound
    #[must_use]
    pub fn point(&self, index: usize) -> Point2<f64> {
        self.points[index]
    }

    /// All landmarks
    #[must_use]
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// The refined iris landmarks (indices 468..478)
    #[must_use]
    pub fn iris_points(&self) -> &[Point2<f64>] {
        &self.points[IRIS_LANDMARK_START..IRIS_LANDMARK_START + NUM_IRIS_LANDMARKS]
    }

    /// Gather the landmarks at `indices`, in order
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Vec<Point2<f64>> {
        indices.iter().map(|&i| self.points[i]).collect()
    }

    /// Copy of this set with every landmark shifted by `(dx, dy)`
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            points: self.points.iter().map(|p| Point2::new(p.x + dx, p.y + dy)).collect(),
        }
    }
}

/// One frame as delivered by a landmark source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFrame {
    /// Size of the image the frame came from
    pub image_size: ImageSize,
    /// Landmarks of the first detected face, `None` when no face was found
    pub landmarks: Option<LandmarkSet>,
}

impl SourceFrame {
    /// Frame with a detected face
    #[must_use]
    pub fn with_face(image_size: ImageSize, landmarks: LandmarkSet) -> Self {
        Self {
            image_size,
            landmarks: Some(landmarks),
        }
    }

    /// Frame without a face
    #[must_use]
    pub fn without_face(image_size: ImageSize) -> Self {
        Self {
            image_size,
            landmarks: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Point2<f64>> {
        (0..NUM_LANDMARKS)
            .map(|i| Point2::new((i % 20) as f64, (i / 20) as f64))
            .collect()
    }

    #[test]
    fn test_landmark_set_validation() {
        assert!(LandmarkSet::new(grid()).is_ok());

        let mut short = grid();
        short.pop();
        assert!(matches!(LandmarkSet::new(short), Err(Error::InvalidLandmarks(_))));

        let mut bad = grid();
        bad[100] = Point2::new(f64::NAN, 1.0);
        assert!(matches!(LandmarkSet::new(bad), Err(Error::InvalidLandmarks(_))));

        let mut inf = grid();
        inf[477] = Point2::new(1.0, f64::INFINITY);
        assert!(LandmarkSet::new(inf).is_err());
    }

    #[test]
    fn test_iris_points_range() {
        let set = LandmarkSet::new(grid()).unwrap();
        let iris = set.iris_points();
        assert_eq!(iris.len(), NUM_IRIS_LANDMARKS);
        assert_eq!(iris[0], set.point(468));
        assert_eq!(iris[9], set.point(477));
    }

    #[test]
    fn test_select_and_translate() {
        let set = LandmarkSet::new(grid()).unwrap();
        let picked = set.select(&[21, 0]);
        assert_eq!(picked, vec![Point2::new(1.0, 1.0), Point2::new(0.0, 0.0)]);

        let moved = set.translated(5.0, -2.0);
        assert_eq!(moved.point(21), Point2::new(6.0, -1.0));
    }

    #[test]
    fn test_image_size() {
        assert!(ImageSize::new(0, 480).is_err());
        let size = ImageSize::new(640, 480).unwrap();
        assert_eq!(size.to_string(), "640x480");
    }
}
