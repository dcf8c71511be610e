//! Error classification and fallback advice.
//!
//! Raw platform errors cross the boundary exactly once, here. Everything the
//! embedding application sees is a [`CaptureFailure`]: a closed category, a
//! ready-to-display message, and the fallback actions worth offering. No raw
//! error is ever dropped; anything unrecognized maps to
//! [`FailureCategory::Unknown`].

use crate::platform::{self, PlatformError};

/// Closed taxonomy of capture failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// The platform exposes no device-enumeration capability.
    NoEnumerationApi,
    /// Enumeration succeeded but found zero video-input devices.
    NoCameraDevices,
    /// Enumeration itself failed.
    EnumerationFailed,
    /// Permission explicitly denied by the user or platform.
    NotAllowed,
    /// No matching device at acquisition time.
    NotFound,
    /// Device busy or already in use by another consumer.
    NotReadable,
    /// Requested constraints unsupported by any device.
    Overconstrained,
    /// Platform blocks camera access by policy.
    Security,
    /// Acquisition aborted mid-flight.
    Aborted,
    /// Anything without a recognized signature.
    Unknown,
    /// The preview surface has no decodable frame yet.
    CaptureNotReady,
    /// Frame encoding produced no usable payload.
    CaptureEncodingFailed,
}

impl FailureCategory {
    /// Stable machine-readable code for this category.
    pub fn code(&self) -> &'static str {
        match self {
            FailureCategory::NoEnumerationApi => "NO_ENUMERATION_API",
            FailureCategory::NoCameraDevices => "NO_CAMERA_DEVICES",
            FailureCategory::EnumerationFailed => "ENUMERATION_FAILED",
            FailureCategory::NotAllowed => "NotAllowedError",
            FailureCategory::NotFound => "NotFoundError",
            FailureCategory::NotReadable => "NotReadableError",
            FailureCategory::Overconstrained => "OverconstrainedError",
            FailureCategory::Security => "SecurityError",
            FailureCategory::Aborted => "AbortError",
            FailureCategory::Unknown => "UNKNOWN_ERROR",
            FailureCategory::CaptureNotReady => "CAPTURE_NOT_READY",
            FailureCategory::CaptureEncodingFailed => "CAPTURE_ENCODING_FAILED",
        }
    }
}

/// What a suggested fallback action asks the user to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTag {
    /// Try the same acquisition again.
    Retry,
    /// Ask the platform for permission again.
    ReRequestPermission,
    /// Close other applications holding the device, then retry.
    CloseOtherConsumers,
    /// Retry with relaxed constraints. Normally handled by the session
    /// manager's strategy ladder before a failure ever surfaces.
    RelaxConstraints,
    /// Switch to a non-camera input method (e.g. file upload).
    AlternateInput,
}

/// A single suggested fallback, ready for UI display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackAction {
    pub tag: FallbackTag,
    pub label: &'static str,
    pub description: &'static str,
}

impl FallbackAction {
    pub fn retry() -> Self {
        Self {
            tag: FallbackTag::Retry,
            label: "Try again",
            description: "Retry opening the camera",
        }
    }

    pub fn re_request_permission() -> Self {
        Self {
            tag: FallbackTag::ReRequestPermission,
            label: "Allow camera access",
            description: "Grant camera permission and try again",
        }
    }

    pub fn close_other_consumers() -> Self {
        Self {
            tag: FallbackTag::CloseOtherConsumers,
            label: "Close other apps",
            description: "Close other applications using the camera, then retry",
        }
    }

    pub fn relax_constraints() -> Self {
        Self {
            tag: FallbackTag::RelaxConstraints,
            label: "Lower the quality",
            description: "Retry with relaxed resolution constraints",
        }
    }

    pub fn alternate_input() -> Self {
        Self {
            tag: FallbackTag::AlternateInput,
            label: "Use another method",
            description: "Switch to a non-camera input, such as uploading a photo",
        }
    }
}

/// A classified capture failure: category, display message, and fallbacks.
/// Never retried automatically by this crate; the embedding UI decides.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct CaptureFailure {
    pub category: FailureCategory,
    pub message: String,
    pub fallbacks: Vec<FallbackAction>,
}

impl CaptureFailure {
    pub fn no_enumeration_api() -> Self {
        Self {
            category: FailureCategory::NoEnumerationApi,
            message: "This platform cannot list camera devices".to_string(),
            fallbacks: Vec::new(),
        }
    }

    pub fn no_camera_devices() -> Self {
        Self {
            category: FailureCategory::NoCameraDevices,
            message: "No camera was found on this device".to_string(),
            fallbacks: vec![FallbackAction::retry(), FallbackAction::alternate_input()],
        }
    }

    pub fn enumeration_failed(raw: &PlatformError) -> Self {
        Self {
            category: FailureCategory::EnumerationFailed,
            message: format!("Could not list camera devices: {}", raw.message),
            fallbacks: vec![FallbackAction::retry(), FallbackAction::alternate_input()],
        }
    }

    pub fn not_ready(detail: impl Into<String>) -> Self {
        Self {
            category: FailureCategory::CaptureNotReady,
            message: format!("The camera preview is not ready yet: {}", detail.into()),
            fallbacks: vec![FallbackAction::retry()],
        }
    }

    pub fn encoding_failed(detail: impl Into<String>) -> Self {
        Self {
            category: FailureCategory::CaptureEncodingFailed,
            message: format!("Could not encode the captured frame: {}", detail.into()),
            fallbacks: vec![FallbackAction::retry(), FallbackAction::alternate_input()],
        }
    }
}

/// Map a raw acquisition error to a classified failure.
///
/// The mapping is exhaustive over the error-name signatures the platform
/// traits can produce; unrecognized names become [`FailureCategory::Unknown`]
/// rather than being swallowed.
pub fn classify(raw: &PlatformError) -> CaptureFailure {
    match raw.name.as_str() {
        platform::NOT_ALLOWED => CaptureFailure {
            category: FailureCategory::NotAllowed,
            message: "Camera access was denied".to_string(),
            fallbacks: vec![
                FallbackAction::re_request_permission(),
                FallbackAction::alternate_input(),
            ],
        },
        platform::NOT_FOUND => CaptureFailure {
            category: FailureCategory::NotFound,
            message: "No camera matched the request".to_string(),
            fallbacks: vec![FallbackAction::retry(), FallbackAction::alternate_input()],
        },
        platform::NOT_READABLE => CaptureFailure {
            category: FailureCategory::NotReadable,
            message: "The camera is in use by another application".to_string(),
            fallbacks: vec![
                FallbackAction::close_other_consumers(),
                FallbackAction::alternate_input(),
            ],
        },
        platform::OVERCONSTRAINED => CaptureFailure {
            category: FailureCategory::Overconstrained,
            message: "The camera does not support the requested settings".to_string(),
            fallbacks: vec![FallbackAction::relax_constraints()],
        },
        platform::SECURITY => CaptureFailure {
            category: FailureCategory::Security,
            message: "Camera access is blocked by a security policy".to_string(),
            fallbacks: vec![FallbackAction::alternate_input()],
        },
        platform::ABORT => CaptureFailure {
            category: FailureCategory::Aborted,
            message: "Opening the camera was interrupted".to_string(),
            fallbacks: vec![FallbackAction::retry()],
        },
        _ => CaptureFailure {
            category: FailureCategory::Unknown,
            message: format!("Unexpected camera error: {}", raw.message),
            fallbacks: vec![FallbackAction::retry(), FallbackAction::alternate_input()],
        },
    }
}
