//! Integration tests for the face tracking pipeline


use facetrack_avatar::{
    app::TrackerApp,
    config::Config,
    expression::{FeatureSource, ParameterRecord},
    features::{LEFT_BROW, RIGHT_BROW},
    filters::{Channel, FaceLossPolicy},
    pipeline::Pipeline,
    source::{JsonLinesSource, ReplaySource},
    transport::Transport,
    Result,
};
use std::io::Write;
use std::net::UdpSocket;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::NamedTempFile;
use test_helpers::{no_face_frame, FaceFixture};

/// Transport collecting every record it is handed
#[derive(Clone, Default)]
struct CollectingTransport {
    records: Arc<Mutex<Vec<ParameterRecord>>>,
    closed: Arc<Mutex<bool>>,
}

impl Transport for CollectingTransport {
    fn send(&mut self, record: &ParameterRecord) -> Result<()> {
        self.records.lock().unwrap().push(*record);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}

fn pipeline() -> Pipeline {
    Pipeline::from_config(&Config::default()).expect("default pipeline")
}

/// Test the neutral frontal face end to end
#[test]
fn test_neutral_face_settles() {
    let mut pipeline = pipeline();
    let frame = FaceFixture::neutral().frame();

    let mut last = None;
    for _ in 0..40 {
        last = pipeline.process(&frame);
        assert!(last.is_some(), "every face frame produces a record");
    }

    let record = last.unwrap();
    assert!(record.is_finite());
    assert_eq!(record.mouth_form, -1);
    assert_eq!(record.eye_ball_x, 0);
    assert_eq!(record.eye_ball_y, 0);

    let angles = pipeline.last_report().unwrap().head_angles;
    assert!(angles.roll.abs() <= 5.0, "roll {}", angles.roll);
    assert!(angles.pitch.abs() <= 5.0, "pitch {}", angles.pitch);
    assert!(angles.yaw.abs() <= 5.0, "yaw {}", angles.yaw);
}

/// Test that the raw pose of the fixture is recovered almost exactly
#[test]
fn test_fixture_pose_recovered() {
    let mut pipeline = pipeline();
    pipeline.process(&FaceFixture::neutral().frame()).unwrap();

    let report = pipeline.last_report().unwrap();
    assert!(report.pose.reprojection_rmse < 1e-3);
    assert!((report.pose.rotation.x.abs() - std::f64::consts::PI).abs() < 1e-4);
    assert!((report.pose.translation.z - 3000.0).abs() < 1.0);
}

/// Test that a lost face produces no record and the camera follows the new image size
#[test]
fn test_no_face_then_new_image_size() {
    let mut pipeline = pipeline();
    let small = FaceFixture::neutral().frame();
    for _ in 0..5 {
        assert!(pipeline.process(&small).is_some());
    }
    assert_eq!(pipeline.estimator().camera().unwrap().cx, 320.0);

    assert!(pipeline.process(&no_face_frame(1280, 720)).is_none());
    assert!(pipeline.last_report().is_none());
    let camera = pipeline.estimator().camera().unwrap();
    assert_eq!(camera.cx, 640.0);
    assert_eq!(camera.cy, 360.0);
    assert_eq!(camera.fx, 1280.0);

    let large = FaceFixture::neutral().with_image_size(1280, 720).frame();
    let record = pipeline.process(&large);
    assert!(record.is_some());
    assert_eq!(pipeline.estimator().camera().unwrap().cx, 640.0);
}

/// Test the default face-loss policy leaves the stabilizers alone
#[test]
fn test_hold_last_on_face_loss() {
    let mut pipeline = pipeline();
    for _ in 0..10 {
        pipeline.process(&FaceFixture::neutral().frame());
    }
    let before = pipeline.stabilizers().value(Channel::TranslationZ);
    pipeline.process(&no_face_frame(640, 480));
    assert_eq!(pipeline.stabilizers().value(Channel::TranslationZ), before);
}

/// Test the reset face-loss policy
#[test]
fn test_reset_on_face_loss() {
    let mut config = Config::default();
    config.stabilizer.face_loss_policy = FaceLossPolicy::Reset;
    let mut pipeline = Pipeline::from_config(&config).unwrap();
    for _ in 0..10 {
        pipeline.process(&FaceFixture::neutral().frame());
    }
    pipeline.process(&no_face_frame(640, 480));
    for channel in Channel::ALL {
        assert_eq!(pipeline.stabilizers().value(channel), 0.0);
    }
}

/// Test the discrete expression classes
#[test]
fn test_expression_classes() {
    let mut pipeline = pipeline();
    let wide = pipeline
        .process(&FaceFixture::neutral().with_mouth_width(60.0).frame())
        .unwrap();
    assert_eq!(wide.mouth_form, 0);

    let narrow = pipeline
        .process(&FaceFixture::neutral().with_mouth_width(30.0).frame())
        .unwrap();
    assert_eq!(narrow.mouth_form, -2);

    let looking = pipeline
        .process(&FaceFixture::neutral().with_iris_shift(0.2).frame())
        .unwrap();
    assert_eq!(looking.eye_ball_x, 1);

    let other_way = pipeline
        .process(&FaceFixture::neutral().with_iris_shift(-0.2).frame())
        .unwrap();
    assert_eq!(other_way.eye_ball_x, -1);
}

/// Test that wider open eyes give larger openness
#[test]
fn test_eye_openness_grows() {
    let mut pipeline = pipeline();
    let narrow = pipeline
        .process(&FaceFixture::neutral().with_eye_open(2.0).frame())
        .unwrap();
    let wide = pipeline
        .process(&FaceFixture::neutral().with_eye_open(6.0).frame())
        .unwrap();
    assert!(wide.eye_l_open > narrow.eye_l_open);
    assert!(wide.eye_r_open > narrow.eye_r_open);
}

/// Test that both eyes looking the same way move eyeBallX instead of cancelling
#[test]
fn test_shared_gaze_moves_eye_ball_x() {
    for (shift, expected) in [(0.2, 1), (-0.2, -1)] {
        let mut pipeline = pipeline();
        let record = pipeline
            .process(&FaceFixture::neutral().with_iris_shift(shift).frame())
            .unwrap();
        assert_eq!(record.eye_ball_x, expected, "shift {shift}");

        let features = pipeline.last_report().unwrap().features;
        assert!(features.iris_left.0 * shift > 0.0, "left {:?}", features.iris_left);
        assert!(features.iris_right.0 * shift > 0.0, "right {:?}", features.iris_right);
        assert!((features.iris_left.0 - features.iris_right.0).abs() < 0.02);
    }
}

/// Test that closing the lids under a still brow lowers the openness
#[test]
fn test_closing_eyes_lowers_openness() {
    let open = FaceFixture::neutral().with_eye_open(5.0);
    let nearly_closed = FaceFixture::neutral().with_eye_open(1.0);
    assert_eq!(open.points()[LEFT_BROW], nearly_closed.points()[LEFT_BROW]);
    assert_eq!(open.points()[RIGHT_BROW], nearly_closed.points()[RIGHT_BROW]);

    let open = pipeline().process(&open.frame()).unwrap();
    let nearly_closed = pipeline().process(&nearly_closed.frame()).unwrap();
    assert!(nearly_closed.eye_l_open < open.eye_l_open);
    assert!(nearly_closed.eye_r_open < open.eye_r_open);
}

/// Test raw against stabilized feature source on the first frame
#[test]
fn test_feature_source() {
    let frame = FaceFixture::neutral().with_mouth_width(52.0).frame();

    let raw = pipeline().process(&frame).unwrap();
    assert_eq!(raw.mouth_form, 0);

    let mut config = Config::default();
    config.expression.feature_source = FeatureSource::Stabilized;
    // First stabilized mouth distance is 52 * 2.1 / 2.2, inside the band
    let stabilized = Pipeline::from_config(&config).unwrap().process(&frame).unwrap();
    assert_eq!(stabilized.mouth_form, -1);
}

/// Test the application loop over a JSON lines file
#[test]
fn test_app_over_json_lines() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", FaceFixture::neutral().json_line()).unwrap();
    writeln!(file, "{{\"width\":640,\"height\":480,\"landmarks\":null}}").unwrap();
    writeln!(file, "garbage").unwrap();
    writeln!(file, "{}", FaceFixture::neutral().json_line()).unwrap();
    file.flush().unwrap();

    let transport = CollectingTransport::default();
    let source = JsonLinesSource::from_path(file.path()).unwrap();
    let mut app = TrackerApp::with_parts(Config::default(), Box::new(source), Box::new(transport.clone())).unwrap();

    let stop = AtomicBool::new(false);
    let stats = app.run(&stop).unwrap();

    assert_eq!(stats.frames, 3);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.records, 2);
    assert_eq!(transport.records.lock().unwrap().len(), 2);
    assert!(*transport.closed.lock().unwrap());
}

/// Test records arrive at a UDP endpoint
#[test]
fn test_app_sends_udp() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver.set_read_timeout(Some(Duration::from_secs(2))).unwrap();

    let mut file = NamedTempFile::new().unwrap();
    for _ in 0..3 {
        writeln!(file, "{}", FaceFixture::neutral().json_line()).unwrap();
    }
    file.flush().unwrap();

    let mut config = Config::default();
    config.source.input = file.path().display().to_string();
    config.transport.enabled = true;
    config.transport.endpoint = receiver.local_addr().unwrap().to_string();

    let mut app = TrackerApp::new(config).unwrap();
    let stats = app.run(&AtomicBool::new(false)).unwrap();
    assert_eq!(stats.records, 3);

    let mut buf = [0u8; 2048];
    for _ in 0..3 {
        let len = receiver.recv(&mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf[..len]).unwrap();
        assert_eq!(value["event"], "msg");
        assert_eq!(value["data"]["mouthForm"], -1);
        assert_eq!(value["data"]["eyeBallY"], 0);
    }
}

/// Test replaying the same frames twice gives identical records
#[test]
fn test_replay_is_deterministic() {
    let frames = vec![
        FaceFixture::neutral().frame(),
        no_face_frame(640, 480),
        FaceFixture::neutral().with_iris_shift(0.1).frame(),
    ];

    let run = || {
        let transport = CollectingTransport::default();
        let mut app = TrackerApp::with_parts(
            Config::default(),
            Box::new(ReplaySource::new(frames.clone())),
            Box::new(transport.clone()),
        )
        .unwrap();
        app.run(&AtomicBool::new(false)).unwrap();
        let records = transport.records.lock().unwrap().clone();
        records
    };

    let first = run();
    assert_eq!(first.len(), 2);
    assert_eq!(first, run());
}
