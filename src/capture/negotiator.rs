//! Camera negotiation state machine and frame rasterization.

use image::codecs::jpeg::JpegEncoder;
use tracing::{debug, warn};

use crate::artifact::ImageArtifact;

use super::port::{
    CONSTRAINT_LADDER, CameraError, CameraPort, CameraStream, ConstraintProfile, Frame,
};

/// Ceiling on the longest dimension of a captured photo, in pixels.
pub const MAX_CAPTURE_DIM: u32 = 1280;
/// JPEG quality factor, chosen to bound artifact size rather than chase
/// visual fidelity.
pub const JPEG_QUALITY: u8 = 70;

/// Negotiator lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    /// Created, not yet negotiating.
    Idle,
    /// Walking the constraint ladder or waiting on the first frame.
    Negotiating,
    /// Live stream bound and first frame decoded; capture is valid.
    Ready,
    /// A capture is rasterizing; concurrent captures are rejected.
    Capturing,
    /// Every profile failed; carries the last error's classification.
    Failed(CameraError),
    /// Stream released; terminal.
    Closed,
}

/// Why a capture call was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Another capture is in flight; the call is rejected, not queued.
    Busy,
    /// The negotiator is not in [`CameraState::Ready`].
    NotReady,
    /// The frame could not be encoded.
    Encode(String),
}

/// Acquires a live camera stream under the constraint ladder and rasterizes
/// frames to lossy image artifacts on demand.
///
/// The stream is an exclusive hardware resource owned by the negotiator;
/// [`close`](Self::close) releases it on every exit path.
pub struct CameraNegotiator<P: CameraPort> {
    port: P,
    stream: Option<P::Stream>,
    state: CameraState,
    ladder: Vec<ConstraintProfile>,
}

impl<P: CameraPort> CameraNegotiator<P> {
    /// Creates an idle negotiator over `port` using [`CONSTRAINT_LADDER`].
    pub fn new(port: P) -> Self {
        Self::with_ladder(port, CONSTRAINT_LADDER.to_vec())
    }

    /// Creates an idle negotiator with a custom profile ladder.
    pub fn with_ladder(port: P, ladder: Vec<ConstraintProfile>) -> Self {
        Self {
            port,
            stream: None,
            state: CameraState::Idle,
            ladder,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Walks the profile ladder until one acquisition succeeds, then waits
    /// for the first decodable frame before entering `Ready`.
    ///
    /// Valid from `Idle` and, as a restart, from `Failed`. Already-`Ready`
    /// negotiators return immediately. No timeout is imposed: a stream that
    /// never frames leaves this future pending and the negotiator in
    /// `Negotiating`; cancel by dropping the future and calling
    /// [`close`](Self::close). A closed negotiator does not renegotiate.
    pub async fn negotiate(&mut self) -> Result<(), CameraError> {
        match self.state {
            CameraState::Idle | CameraState::Failed(_) => {}
            CameraState::Ready | CameraState::Negotiating | CameraState::Capturing => {
                return Ok(());
            }
            CameraState::Closed => return Err(CameraError::StreamAborted),
        }

        self.state = CameraState::Negotiating;
        let mut last_err = CameraError::NoDevice;

        for idx in 0..self.ladder.len() {
            let profile = self.ladder[idx];
            debug!(profile = ?profile, "attempting camera acquisition");
            match self.port.acquire(&profile).await {
                Ok(stream) => {
                    self.stream = Some(stream);
                    return self.await_first_frame().await;
                }
                Err(err) => {
                    warn!(profile = ?profile, err = ?err, "constraint profile failed");
                    last_err = err;
                }
            }
        }

        self.state = CameraState::Failed(last_err);
        Err(last_err)
    }

    /// Rasterizes the current frame to a JPEG artifact.
    ///
    /// Valid only in `Ready`. The frame is downsized so its longest dimension
    /// does not exceed [`MAX_CAPTURE_DIM`], preserving aspect ratio.
    /// Synchronous and non-suspending; a concurrent call while one is in
    /// flight is rejected with [`CaptureError::Busy`].
    pub fn capture(&mut self) -> Result<ImageArtifact, CaptureError> {
        match self.state {
            CameraState::Capturing => return Err(CaptureError::Busy),
            CameraState::Ready => {}
            _ => return Err(CaptureError::NotReady),
        }

        self.state = CameraState::Capturing;
        let result = self
            .stream
            .as_ref()
            .and_then(|stream| stream.frame())
            .ok_or(CaptureError::NotReady)
            .and_then(|frame| encode_jpeg(&frame));
        self.state = CameraState::Ready;
        result
    }

    /// Releases the stream and enters `Closed`.
    ///
    /// Valid from every state and idempotent; the hardware lock is dropped
    /// deterministically. Must be invoked on every exit path, including
    /// failure, before the negotiator is discarded.
    pub fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
        self.state = CameraState::Closed;
    }

    async fn await_first_frame(&mut self) -> Result<(), CameraError> {
        let Some(stream) = self.stream.as_mut() else {
            self.state = CameraState::Failed(CameraError::StreamAborted);
            return Err(CameraError::StreamAborted);
        };
        match stream.first_frame().await {
            Ok(()) => {
                self.state = CameraState::Ready;
                Ok(())
            }
            Err(err) => {
                warn!(err = ?err, "stream ended before the first frame");
                if let Some(mut stream) = self.stream.take() {
                    stream.stop();
                }
                self.state = CameraState::Failed(err);
                Err(err)
            }
        }
    }
}

fn encode_jpeg(frame: &Frame) -> Result<ImageArtifact, CaptureError> {
    let image = image::RgbImage::from_raw(frame.width, frame.height, frame.pixels.clone())
        .ok_or_else(|| CaptureError::Encode("frame buffer size mismatch".to_string()))?;

    let longest = frame.width.max(frame.height);
    let image = if longest > MAX_CAPTURE_DIM {
        let scale = MAX_CAPTURE_DIM as f32 / longest as f32;
        let width = ((frame.width as f32 * scale).round() as u32).max(1);
        let height = ((frame.height as f32 * scale).round() as u32).max(1);
        image::imageops::resize(&image, width, height, image::imageops::FilterType::Triangle)
    } else {
        image
    };

    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY)
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|err| CaptureError::Encode(err.to_string()))?;
    Ok(ImageArtifact::jpeg(&encoded))
}
