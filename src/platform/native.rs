//! Native camera backend built on nokhwa.
//!
//! Maps the platform traits onto real devices: enumeration via nokhwa's
//! query, acquisition via `Camera` with a format derived from the stream
//! request, and a preview that decodes the camera's native format (MJPEG,
//! YUYV, NV12, ...) to RGB on demand.
//!
//! Facing mode has no analog in the native device APIs and is ignored here;
//! device selection is by index.

use std::cell::RefCell;
use std::rc::Rc;

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution as NokhwaResolution,
};
use nokhwa::{query, Camera};

use crate::capture::types::DeviceDescriptor;
use crate::platform::{
    CapturePlatform, EnumerationError, MediaStream, MediaTrack, PlatformError, PreviewHandle,
    ReadyState, StreamRequest,
};

const FRAME_RATE: u32 = 30;

/// Platform backend for a physical camera, selected by device index.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePlatform {
    device_index: u32,
}

impl NativePlatform {
    pub fn new(device_index: u32) -> Self {
        Self { device_index }
    }
}

impl CapturePlatform for NativePlatform {
    fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, EnumerationError> {
        let devices = query(ApiBackend::Auto)
            .map_err(|e| EnumerationError::Failed(PlatformError::other(e.to_string())))?;

        Ok(devices
            .into_iter()
            .map(|d| {
                DeviceDescriptor::video(
                    d.index().as_index().unwrap_or(0).to_string(),
                    d.human_name(),
                )
            })
            .collect())
    }

    fn acquire_stream(
        &mut self,
        request: &StreamRequest,
    ) -> Result<Box<dyn MediaStream>, PlatformError> {
        // Soft existence check; enumeration failure is not fatal here because
        // some backends under-report until the device is opened.
        if let Ok(devices) = query(ApiBackend::Auto) {
            let exists = devices
                .iter()
                .any(|d| d.index().as_index().unwrap_or(0) == self.device_index);
            if !exists {
                return Err(PlatformError::not_found(format!(
                    "camera device {} does not exist",
                    self.device_index
                )));
            }
        }

        let requested = RequestedFormat::new::<RgbFormat>(requested_format(request));
        let index = CameraIndex::Index(self.device_index);

        let mut camera = Camera::new(index, requested)
            .map_err(|e| classify_native_message(&e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| classify_native_message(&e.to_string()))?;

        let resolution = camera.resolution();
        log::info!(
            "opened camera {} at {}x{} ({} fps)",
            self.device_index,
            resolution.width(),
            resolution.height(),
            camera.frame_rate()
        );

        Ok(Box::new(NativeStream::new(camera)))
    }
}

/// Map a stream request to a nokhwa format preference. A bounded request
/// asks for the closest MJPEG match; an unconstrained one lets the camera
/// pick whatever it does best.
fn requested_format(request: &StreamRequest) -> RequestedFormatType {
    match request.ideal {
        Some(ideal) => RequestedFormatType::Closest(CameraFormat::new(
            NokhwaResolution::new(ideal.width, ideal.height),
            FrameFormat::MJPEG,
            FRAME_RATE,
        )),
        None => RequestedFormatType::AbsoluteHighestResolution,
    }
}

/// Derive an error signature from a backend message. The native APIs report
/// failures as strings, so this sniffs the usual phrasings the way the
/// backends emit them.
fn classify_native_message(message: &str) -> PlatformError {
    let lower = message.to_lowercase();
    if lower.contains("permission")
        || lower.contains("denied")
        || lower.contains("authorization")
        || lower.contains("access")
    {
        PlatformError::not_allowed(message)
    } else if lower.contains("busy") || lower.contains("in use") || lower.contains("ebusy") {
        PlatformError::not_readable(message)
    } else if lower.contains("not found") || lower.contains("no such") || lower.contains("enoent") {
        PlatformError::not_found(message)
    } else if lower.contains("unsupported") || lower.contains("constraint") {
        PlatformError::overconstrained(message)
    } else {
        PlatformError::other(message)
    }
}

struct NativeTrack {
    label: String,
    camera: Rc<RefCell<Camera>>,
    stopped: bool,
}

impl MediaTrack for NativeTrack {
    fn label(&self) -> &str {
        &self.label
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Err(e) = self.camera.borrow_mut().stop_stream() {
            log::warn!("failed to stop camera stream: {}", e);
        }
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }
}

/// A live native stream with one video track. The stream itself is the
/// preview surface.
pub struct NativeStream {
    camera: Rc<RefCell<Camera>>,
    tracks: Vec<Box<dyn MediaTrack>>,
}

impl NativeStream {
    fn new(camera: Camera) -> Self {
        let camera = Rc::new(RefCell::new(camera));
        let track = NativeTrack {
            label: "native video".to_string(),
            camera: Rc::clone(&camera),
            stopped: false,
        };
        Self {
            camera,
            tracks: vec![Box::new(track)],
        }
    }

    fn is_live(&self) -> bool {
        self.tracks.iter().all(|t| !t.is_stopped())
    }
}

impl MediaStream for NativeStream {
    fn tracks_mut(&mut self) -> &mut [Box<dyn MediaTrack>] {
        &mut self.tracks
    }

    fn preview(&self) -> &dyn PreviewHandle {
        self
    }
}

impl PreviewHandle for NativeStream {
    fn ready_state(&self) -> ReadyState {
        if self.is_live() {
            // An open stream serves frames on demand
            ReadyState::EnoughData
        } else {
            ReadyState::Nothing
        }
    }

    fn width(&self) -> u32 {
        self.camera.borrow().resolution().width()
    }

    fn height(&self) -> u32 {
        self.camera.borrow().resolution().height()
    }

    fn current_frame(&self) -> Option<Vec<u8>> {
        if !self.is_live() {
            return None;
        }
        let buffer = self.camera.borrow_mut().frame().ok()?;
        let decoded = buffer.decode_image::<RgbFormat>().ok()?;
        Some(decoded.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::Resolution;
    use crate::platform::{NOT_ALLOWED, NOT_FOUND, NOT_READABLE, OVERCONSTRAINED};

    #[test]
    fn test_message_classification() {
        assert_eq!(
            classify_native_message("Permission denied by user").name,
            NOT_ALLOWED
        );
        assert_eq!(
            classify_native_message("Device or resource busy").name,
            NOT_READABLE
        );
        assert_eq!(
            classify_native_message("No such file or directory").name,
            NOT_FOUND
        );
        assert_eq!(
            classify_native_message("unsupported pixel format").name,
            OVERCONSTRAINED
        );
        assert_eq!(classify_native_message("something odd").name, "UnknownError");
    }

    #[test]
    fn test_requested_format_bounded_vs_bare() {
        let bare = StreamRequest::bare_video();
        assert!(matches!(
            requested_format(&bare),
            RequestedFormatType::AbsoluteHighestResolution
        ));

        let bounded = StreamRequest {
            ideal: Some(Resolution::MEDIUM),
            max: Some(Resolution::HIGH),
            facing: None,
            audio: false,
        };
        assert!(matches!(
            requested_format(&bounded),
            RequestedFormatType::Closest(_)
        ));
    }
}
