//! Camera acquisition and capture pipeline.
//!
//! This module provides the four pieces of the capture core:
//! - Availability probing via [`probe_availability`]
//! - Session lifecycle via [`SessionManager`]
//! - Still-frame capture via [`capture_frame`]
//! - Error classification via [`classify`]

pub mod classify;
pub mod frame;
pub mod probe;
pub mod session;
pub mod types;

pub use classify::{classify, CaptureFailure, FailureCategory, FallbackAction, FallbackTag};
pub use frame::capture_frame;
pub use probe::{probe_availability, AvailabilityReport};
pub use session::{CaptureSession, SessionManager, StrategyKind};
pub use types::{
    CaptureConstraints, CaptureOptions, CapturedImage, DeviceDescriptor, DeviceKind, FacingMode,
    Resolution, SessionState, DEFAULT_QUALITY,
};
