use std::collections::VecDeque;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use reportero::{
    artifact::ImageMime,
    capture::{
        negotiator::{CameraNegotiator, CameraState, CaptureError},
        port::{CameraError, CameraPort, CameraStream, ConstraintProfile, Frame},
    },
};

fn rgb_frame(width: u32, height: u32) -> Frame {
    Frame {
        width,
        height,
        pixels: vec![128; (width * height * 3) as usize],
    }
}

enum StreamScript {
    Frames(Frame),
    NeverFrames,
    AbortsBeforeFirstFrame,
}

struct FakeStream {
    script: StreamScript,
    stopped: Arc<AtomicBool>,
}

impl CameraStream for FakeStream {
    async fn first_frame(&mut self) -> Result<(), CameraError> {
        match self.script {
            StreamScript::Frames(_) => Ok(()),
            StreamScript::NeverFrames => {
                std::future::pending::<()>().await;
                Ok(())
            }
            StreamScript::AbortsBeforeFirstFrame => Err(CameraError::StreamAborted),
        }
    }

    fn frame(&self) -> Option<Frame> {
        match &self.script {
            StreamScript::Frames(frame) => Some(frame.clone()),
            _ => None,
        }
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Scripted camera hardware: one planned outcome per acquisition attempt,
/// `NoDevice` once the script runs out.
struct ScriptedPort {
    outcomes: VecDeque<Result<FakeStream, CameraError>>,
}

impl ScriptedPort {
    fn new(outcomes: Vec<Result<FakeStream, CameraError>>) -> Self {
        Self {
            outcomes: outcomes.into(),
        }
    }
}

impl CameraPort for ScriptedPort {
    type Stream = FakeStream;

    async fn acquire(
        &mut self,
        _profile: &ConstraintProfile,
    ) -> Result<FakeStream, CameraError> {
        self.outcomes
            .pop_front()
            .unwrap_or(Err(CameraError::NoDevice))
    }
}

fn framing(frame: Frame, stopped: &Arc<AtomicBool>) -> FakeStream {
    FakeStream {
        script: StreamScript::Frames(frame),
        stopped: Arc::clone(stopped),
    }
}

#[tokio::test]
async fn ladder_reaches_ready_when_only_last_profile_succeeds() {
    let stopped = Arc::new(AtomicBool::new(false));
    let port = ScriptedPort::new(vec![
        Err(CameraError::NoDevice),
        Err(CameraError::NoDevice),
        Err(CameraError::DeviceBusy),
        Ok(framing(rgb_frame(640, 480), &stopped)),
    ]);

    let mut negotiator = CameraNegotiator::new(port);
    assert_eq!(negotiator.state(), CameraState::Idle);
    negotiator.negotiate().await.expect("negotiate");
    assert_eq!(negotiator.state(), CameraState::Ready);

    let artifact = negotiator.capture().expect("capture");
    assert_eq!(artifact.mime(), ImageMime::Jpeg);
    assert_eq!(negotiator.state(), CameraState::Ready);

    negotiator.close();
    assert!(stopped.load(Ordering::SeqCst));
    assert_eq!(negotiator.state(), CameraState::Closed);
}

#[tokio::test]
async fn exhausted_ladder_fails_with_last_classification() {
    let port = ScriptedPort::new(vec![
        Err(CameraError::NoDevice),
        Err(CameraError::NoDevice),
        Err(CameraError::DeviceBusy),
        Err(CameraError::PermissionDenied),
    ]);

    let mut negotiator = CameraNegotiator::new(port);
    let err = negotiator.negotiate().await.expect_err("must fail");
    assert_eq!(err, CameraError::PermissionDenied);
    assert_eq!(
        negotiator.state(),
        CameraState::Failed(CameraError::PermissionDenied)
    );

    // Restart is allowed from Failed; the exhausted script now yields NoDevice.
    let err = negotiator.negotiate().await.expect_err("must fail again");
    assert_eq!(err, CameraError::NoDevice);

    negotiator.close();
    assert_eq!(negotiator.state(), CameraState::Closed);
}

#[tokio::test]
async fn capture_downscales_longest_dimension_to_ceiling() {
    let stopped = Arc::new(AtomicBool::new(false));
    let port = ScriptedPort::new(vec![Ok(framing(rgb_frame(2560, 1440), &stopped))]);

    let mut negotiator = CameraNegotiator::new(port);
    negotiator.negotiate().await.expect("negotiate");

    let artifact = negotiator.capture().expect("capture");
    let bytes = artifact.decode_bytes().expect("base64");
    let decoded = image::load_from_memory(&bytes).expect("jpeg");
    assert_eq!((decoded.width(), decoded.height()), (1280, 720));

    negotiator.close();
}

#[tokio::test]
async fn capture_is_rejected_outside_ready() {
    let port = ScriptedPort::new(vec![]);
    let mut negotiator = CameraNegotiator::new(port);
    assert_eq!(negotiator.capture(), Err(CaptureError::NotReady));

    let _ = negotiator.negotiate().await;
    assert_eq!(negotiator.capture(), Err(CaptureError::NotReady));

    negotiator.close();
    assert_eq!(negotiator.capture(), Err(CaptureError::NotReady));
}

#[tokio::test]
async fn close_is_idempotent_from_every_state() {
    let stopped = Arc::new(AtomicBool::new(false));
    let port = ScriptedPort::new(vec![Ok(framing(rgb_frame(64, 48), &stopped))]);

    let mut negotiator = CameraNegotiator::new(port);
    negotiator.close();
    assert_eq!(negotiator.state(), CameraState::Closed);
    negotiator.close();
    assert_eq!(negotiator.state(), CameraState::Closed);

    // A closed negotiator does not renegotiate.
    assert!(negotiator.negotiate().await.is_err());
    assert_eq!(negotiator.state(), CameraState::Closed);
}

#[tokio::test]
async fn never_framing_stream_stays_negotiating_until_closed() {
    let stopped = Arc::new(AtomicBool::new(false));
    let port = ScriptedPort::new(vec![Ok(FakeStream {
        script: StreamScript::NeverFrames,
        stopped: Arc::clone(&stopped),
    })]);

    let mut negotiator = CameraNegotiator::new(port);
    let outcome = tokio::time::timeout(Duration::from_millis(50), negotiator.negotiate()).await;
    assert!(outcome.is_err(), "negotiation must still be pending");
    assert_eq!(negotiator.state(), CameraState::Negotiating);

    // close() is the only cancel path and must release the stream.
    negotiator.close();
    assert!(stopped.load(Ordering::SeqCst));
    assert_eq!(negotiator.state(), CameraState::Closed);
}

#[tokio::test]
async fn stream_abort_before_first_frame_fails_and_releases() {
    let stopped = Arc::new(AtomicBool::new(false));
    let port = ScriptedPort::new(vec![Ok(FakeStream {
        script: StreamScript::AbortsBeforeFirstFrame,
        stopped: Arc::clone(&stopped),
    })]);

    let mut negotiator = CameraNegotiator::new(port);
    let err = negotiator.negotiate().await.expect_err("must fail");
    assert_eq!(err, CameraError::StreamAborted);
    assert_eq!(
        negotiator.state(),
        CameraState::Failed(CameraError::StreamAborted)
    );
    assert!(stopped.load(Ordering::SeqCst));
}
