//! Platform capture capabilities.
//!
//! The capture pipeline never talks to a device API directly. Everything it
//! needs from the host platform is expressed through the traits in this
//! module: device enumeration, stream acquisition, and a preview surface that
//! can serve the current frame as raw pixels. The real backend lives in
//! [`native`]; [`testing`] provides a scripted backend for offline tests.

use std::fmt;

use crate::capture::types::{DeviceDescriptor, FacingMode, Resolution};

#[cfg(feature = "native")]
pub mod native;
pub mod testing;

/// Error signature for a denied permission prompt.
pub const NOT_ALLOWED: &str = "NotAllowedError";
/// Error signature for no matching device at acquisition time.
pub const NOT_FOUND: &str = "NotFoundError";
/// Error signature for a device that is busy or already in use.
pub const NOT_READABLE: &str = "NotReadableError";
/// Error signature for unsupported constraints.
pub const OVERCONSTRAINED: &str = "OverconstrainedError";
/// Error signature for a policy block.
pub const SECURITY: &str = "SecurityError";
/// Error signature for an acquisition aborted mid-flight.
pub const ABORT: &str = "AbortError";

/// Raw, unclassified error surfaced by a platform backend.
///
/// The `name` field carries the platform's error signature (one of the
/// constants above, or anything else for unrecognized failures). Backends
/// produce these; the classifier in [`crate::capture::classify`] turns them
/// into a closed category exactly once at the boundary, so the rest of the
/// pipeline never inspects raw error shapes.
#[derive(Debug, Clone)]
pub struct PlatformError {
    pub name: String,
    pub message: String,
}

impl PlatformError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::new(NOT_ALLOWED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(NOT_FOUND, message)
    }

    pub fn not_readable(message: impl Into<String>) -> Self {
        Self::new(NOT_READABLE, message)
    }

    pub fn overconstrained(message: impl Into<String>) -> Self {
        Self::new(OVERCONSTRAINED, message)
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self::new(SECURITY, message)
    }

    pub fn abort(message: impl Into<String>) -> Self {
        Self::new(ABORT, message)
    }

    /// An error with no recognized signature.
    pub fn other(message: impl Into<String>) -> Self {
        Self::new("UnknownError", message)
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for PlatformError {}

/// Outcome of asking a platform to enumerate devices.
#[derive(Debug)]
pub enum EnumerationError {
    /// The platform exposes no enumeration capability at all.
    Unsupported,
    /// Enumeration exists but the call itself failed.
    Failed(PlatformError),
}

/// One constraint set handed to the platform for a single acquisition
/// attempt. Built by the session manager's strategy ladder; a request with no
/// bounds and no facing preference means "any video stream".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    /// Preferred resolution; the platform may deliver something close.
    pub ideal: Option<Resolution>,
    /// Upper bound the platform should not exceed.
    pub max: Option<Resolution>,
    /// Preferred camera facing. Backends without a facing concept ignore it.
    pub facing: Option<FacingMode>,
    /// Audio track requested alongside video. Always false in this pipeline.
    pub audio: bool,
}

impl StreamRequest {
    /// A bare video request with no constraints (maximum compatibility).
    pub fn bare_video() -> Self {
        Self {
            ideal: None,
            max: None,
            facing: None,
            audio: false,
        }
    }
}

/// Readiness of a preview surface, weakest to strongest.
///
/// Mirrors media-element readiness levels. `CurrentFrame` is the minimum the
/// frame capturer accepts: the surface has a decodable current frame, even if
/// it could not play through without buffering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    Nothing,
    Metadata,
    CurrentFrame,
    FutureData,
    EnoughData,
}

/// A single live device track. Stopping must be idempotent.
pub trait MediaTrack {
    fn label(&self) -> &str;
    fn stop(&mut self);
    fn is_stopped(&self) -> bool;
}

/// A live media stream: a bundle of tracks plus a ready-to-use preview
/// surface. Returned fully live by [`CapturePlatform::acquire_stream`]; there
/// is no separate "preview ready" signal to wait for.
pub trait MediaStream {
    fn tracks_mut(&mut self) -> &mut [Box<dyn MediaTrack>];
    fn preview(&self) -> &dyn PreviewHandle;
}

/// A live preview surface the frame capturer can rasterize from.
pub trait PreviewHandle {
    fn ready_state(&self) -> ReadyState;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// The current frame as packed RGB bytes, row-major, 3 bytes per pixel.
    /// Returns `None` if no frame is decodable right now.
    fn current_frame(&self) -> Option<Vec<u8>>;
}

/// The platform capabilities the capture pipeline consumes.
pub trait CapturePlatform {
    /// List input devices without acquiring any of them. Some platforms
    /// under-report devices until a permission is granted, which is why the
    /// prober treats this as advisory.
    fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, EnumerationError>;

    /// Acquire a live stream matching `request`, or fail with a raw error.
    /// May block indefinitely on a permission prompt; that UX belongs to the
    /// platform.
    fn acquire_stream(&mut self, request: &StreamRequest)
        -> Result<Box<dyn MediaStream>, PlatformError>;
}
