//! Constraint profiles, frames, and the camera hardware seam.

/// Physical camera orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear ("environment") camera.
    Rear,
    /// Front ("user") camera.
    Front,
}

/// How strongly a profile binds the camera facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingRequirement {
    /// Acquisition must fail when no camera with this facing exists.
    Exact(FacingMode),
    /// Prefer this facing but accept any camera.
    Prefer(FacingMode),
    /// Any camera.
    Any,
}

/// One acquisition attempt: a facing requirement plus an optional ideal
/// resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintProfile {
    /// Facing requirement.
    pub facing: FacingRequirement,
    /// Ideal width in pixels, if any.
    pub width: Option<u32>,
    /// Ideal height in pixels, if any.
    pub height: Option<u32>,
}

/// Acquisition profiles tried in order, most to least specific. The first
/// profile the hardware accepts wins and negotiation stops.
pub const CONSTRAINT_LADDER: [ConstraintProfile; 4] = [
    ConstraintProfile {
        facing: FacingRequirement::Exact(FacingMode::Rear),
        width: Some(1280),
        height: Some(720),
    },
    ConstraintProfile {
        facing: FacingRequirement::Prefer(FacingMode::Rear),
        width: Some(1024),
        height: None,
    },
    ConstraintProfile {
        facing: FacingRequirement::Any,
        width: Some(640),
        height: Some(480),
    },
    ConstraintProfile {
        facing: FacingRequirement::Any,
        width: None,
        height: None,
    },
];

/// One decoded video frame, tightly packed row-major RGB8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

/// Why an acquisition attempt, or a live stream, failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraError {
    /// The operator or platform denied camera access.
    PermissionDenied,
    /// No device matches the requested profile.
    NoDevice,
    /// A matching device exists but is held elsewhere.
    DeviceBusy,
    /// The stream ended underneath us, e.g. hardware disconnected.
    StreamAborted,
}

/// Live video stream produced by a successful acquisition.
///
/// The negotiator is the stream's sole owner; all other code treats the
/// stream as opaque and commands it only through the negotiator.
#[allow(async_fn_in_trait)]
pub trait CameraStream {
    /// Resolves once the first frame is decodable.
    ///
    /// A stream the hardware accepted but that never produces a frame leaves
    /// this future pending; no timeout is imposed and the caller cancels by
    /// dropping the future and closing the negotiator.
    async fn first_frame(&mut self) -> Result<(), CameraError>;

    /// The current frame, `None` before the first frame has decoded.
    fn frame(&self) -> Option<Frame>;

    /// Releases the underlying hardware resource. Idempotent.
    fn stop(&mut self);
}

/// Acquires camera streams under a constraint profile.
#[allow(async_fn_in_trait)]
pub trait CameraPort {
    /// Stream type produced on success.
    type Stream: CameraStream;

    /// Attempts acquisition under `profile`. Suspends while the platform
    /// waits on a permission grant; unbounded.
    async fn acquire(&mut self, profile: &ConstraintProfile) -> Result<Self::Stream, CameraError>;
}
