//! Error handling tests for all modules


use facetrack_avatar::{
    config::Config,
    error::{Error, Result},
    landmarks::{ImageSize, LandmarkSet},
    pipeline::Pipeline,
    pose_estimation::{PoseEstimator, PoseModel},
    source::{parse_frame_line, JsonLinesSource, LandmarkSource},
};
use nalgebra::Point2;
use std::io::Cursor;
use test_helpers::FaceFixture;

#[test]
fn test_landmark_errors() {
    // Wrong count
    let result = LandmarkSet::from_pairs(&[[1.0, 2.0]; 10]);
    match result {
        Err(Error::InvalidLandmarks(msg)) => assert!(msg.contains("478")),
        _ => panic!("Expected InvalidLandmarks"),
    }

    // Non-finite coordinate
    let mut points = FaceFixture::neutral().points();
    points[200] = Point2::new(f64::NAN, 0.0);
    assert!(matches!(LandmarkSet::new(points), Err(Error::InvalidLandmarks(_))));
}

#[test]
fn test_collapsed_face_is_no_pose() {
    let points = vec![Point2::new(320.0, 240.0); 478];
    let landmarks = LandmarkSet::new(points).unwrap();
    let mut estimator = PoseEstimator::new(PoseModel::canonical());
    let size = ImageSize::new(640, 480).unwrap();

    let err = estimator.estimate(&landmarks, size).unwrap_err();
    assert!(matches!(err, Error::NoPose(_)));
    assert!(err.is_recoverable());
}

#[test]
fn test_pipeline_skips_collapsed_face() {
    let mut pipeline = Pipeline::from_config(&Config::default()).unwrap();
    let size = ImageSize::new(640, 480).unwrap();
    let landmarks = LandmarkSet::new(vec![Point2::new(1.0, 1.0); 478]).unwrap();
    let frame = facetrack_avatar::landmarks::SourceFrame::with_face(size, landmarks);
    assert!(pipeline.process(&frame).is_none());

    // A good frame still works afterwards
    assert!(pipeline.process(&FaceFixture::neutral().frame()).is_some());
}

#[test]
fn test_frame_line_errors() {
    assert!(matches!(parse_frame_line("{"), Err(Error::FrameAcquisition(_))));
    assert!(matches!(
        parse_frame_line("{\"width\":640}"),
        Err(Error::FrameAcquisition(_))
    ));
    assert!(matches!(
        parse_frame_line("{\"width\":640,\"height\":0,\"landmarks\":null}"),
        Err(Error::FrameAcquisition(_))
    ));
    assert!(parse_frame_line("{\"width\":640,\"height\":480}").unwrap().landmarks.is_none());
}

#[test]
fn test_source_keeps_going_after_errors() -> Result<()> {
    let input = format!("oops\n{}\n", FaceFixture::neutral().json_line());
    let mut source = JsonLinesSource::from_reader(Cursor::new(input));

    let err = source.next_frame().unwrap_err();
    assert!(err.to_string().contains("line 1"));
    assert!(err.is_recoverable());

    assert!(source.next_frame()?.is_some());
    assert!(source.next_frame()?.is_none());
    Ok(())
}

#[test]
fn test_fatal_errors_are_not_recoverable() {
    assert!(!Error::SourceUnavailable("gone".to_string()).is_recoverable());
    assert!(!Error::ConfigError("bad".to_string()).is_recoverable());
    assert!(Error::Transport("refused".to_string()).is_recoverable());
}

#[test]
fn test_config_errors() {
    let mut config = Config::default();
    config.expression.eye_ball_x_band.low = 1.0;
    config.expression.eye_ball_x_band.high = -1.0;
    match config.validate() {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("eye_ball_x_band")),
        _ => panic!("Expected ConfigError"),
    }

    let mut config = Config::default();
    config.debug.fps_interval = 0;
    assert!(config.validate().is_err());

    assert!(matches!(
        Config::from_file("/nonexistent/config.yaml"),
        Err(Error::Io(_))
    ));
}
