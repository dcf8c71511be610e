//! Capture types and data structures.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

/// Default JPEG quality used when the caller does not supply one.
pub const DEFAULT_QUALITY: f32 = 0.8;

/// A pixel resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Low resolution (320x240)
    pub const LOW: Resolution = Resolution {
        width: 320,
        height: 240,
    };

    /// Medium resolution (640x480) - the preferred acquisition target
    pub const MEDIUM: Resolution = Resolution {
        width: 640,
        height: 480,
    };

    /// High resolution (1280x720) - the acquisition upper bound
    pub const HIGH: Resolution = Resolution {
        width: 1280,
        height: 720,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which way the requested camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Toward the operator (selfie / check-in camera).
    #[default]
    User,
    /// Away from the operator.
    Environment,
}

impl FromStr for FacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(FacingMode::User),
            "environment" => Ok(FacingMode::Environment),
            other => Err(format!(
                "Unknown facing mode '{}'. Use 'user' or 'environment'",
                other
            )),
        }
    }
}

/// Immutable input to acquisition: the caller's desired stream shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Resolution the platform should aim for.
    pub ideal: Resolution,
    /// Resolution the platform should not exceed.
    pub max: Resolution,
    /// Preferred camera facing.
    pub facing: FacingMode,
    /// Whether an audio track is wanted. Always false for photo capture.
    pub audio: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            ideal: Resolution::MEDIUM,
            max: Resolution::HIGH,
            facing: FacingMode::User,
            audio: false,
        }
    }
}

/// Kind of an enumerated input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    VideoInput,
    AudioInput,
}

/// Information about an available input device.
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    /// Backend-specific identifier used for selection
    pub id: String,
    /// Human-readable device name
    pub label: String,
    /// Input kind
    pub kind: DeviceKind,
}

impl DeviceDescriptor {
    pub fn video(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: DeviceKind::VideoInput,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == DeviceKind::VideoInput
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DeviceKind::VideoInput => "video",
            DeviceKind::AudioInput => "audio",
        };
        write!(f, "[{}] {} ({})", self.id, self.label, kind)
    }
}

/// Options for a single frame capture.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// JPEG quality, 0.0-1.0. Values outside the range are clamped.
    pub quality: f32,
    /// Opaque association tag carried into the artifact (e.g. the business
    /// entity the photo belongs to).
    pub tag: Option<String>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            tag: None,
        }
    }
}

impl CaptureOptions {
    pub fn with_quality(quality: f32) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// An immutable captured still image. Created only by the frame capturer.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// Encoded JPEG payload. Never empty.
    pub bytes: Vec<u8>,
    /// Data-URI representation of the payload.
    pub data_uri: String,
    /// Pixel width of the captured frame
    pub width: u32,
    /// Pixel height of the captured frame
    pub height: u32,
    /// When the frame was captured
    pub created_at: SystemTime,
    /// Opaque association tag supplied at capture time
    pub tag: Option<String>,
}

/// Lifecycle state of a capture session context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session held.
    Idle,
    /// An acquisition is in flight.
    Acquiring,
    /// A live session is held.
    Active,
    /// The session has been stopped.
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Acquiring => "acquiring",
            SessionState::Active => "active",
            SessionState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_constants() {
        assert_eq!(Resolution::LOW.width, 320);
        assert_eq!(Resolution::LOW.height, 240);
        assert_eq!(Resolution::MEDIUM.width, 640);
        assert_eq!(Resolution::MEDIUM.height, 480);
        assert_eq!(Resolution::HIGH.width, 1280);
        assert_eq!(Resolution::HIGH.height, 720);
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(format!("{}", Resolution::new(1920, 1080)), "1920x1080");
    }

    #[test]
    fn test_default_constraints() {
        let c = CaptureConstraints::default();
        assert_eq!(c.ideal, Resolution::MEDIUM);
        assert_eq!(c.max, Resolution::HIGH);
        assert_eq!(c.facing, FacingMode::User);
        assert!(!c.audio);
    }

    #[test]
    fn test_facing_mode_from_str() {
        assert_eq!("user".parse::<FacingMode>().unwrap(), FacingMode::User);
        assert_eq!(
            "Environment".parse::<FacingMode>().unwrap(),
            FacingMode::Environment
        );
        assert!("rear".parse::<FacingMode>().is_err());
    }

    #[test]
    fn test_device_descriptor_display() {
        let d = DeviceDescriptor::video("0", "Integrated Webcam");
        assert_eq!(format!("{}", d), "[0] Integrated Webcam (video)");
        assert!(d.is_video());
    }

    #[test]
    fn test_capture_options_default_quality() {
        let opts = CaptureOptions::default();
        assert!((opts.quality - 0.8).abs() < f32::EPSILON);
        assert!(opts.tag.is_none());
    }

    #[test]
    fn test_capture_options_tagged() {
        let opts = CaptureOptions::with_quality(0.5).tagged("lead-42");
        assert_eq!(opts.tag.as_deref(), Some("lead-42"));
        assert!((opts.quality - 0.5).abs() < f32::EPSILON);
    }
}
