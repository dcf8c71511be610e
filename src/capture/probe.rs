//! Device availability probing.

use crate::capture::classify::FailureCategory;
use crate::capture::types::DeviceDescriptor;
use crate::platform::{CapturePlatform, EnumerationError, PlatformError};

/// Result of an availability probe.
#[derive(Debug)]
pub struct AvailabilityReport {
    /// Whether a usable video-input device appears to exist.
    pub available: bool,
    /// Why not, when `available` is false.
    pub reason: Option<FailureCategory>,
    /// Every device the platform reported, video or not.
    pub devices: Vec<DeviceDescriptor>,
    /// Underlying enumeration error, for diagnostics only.
    pub error: Option<PlatformError>,
}

/// Ask the platform whether capture looks possible, without acquiring any
/// device.
///
/// This is advisory only. Some platforms under-report devices until a
/// permission is granted, so a false `available` must not be treated as a
/// hard veto on attempting acquisition.
pub fn probe_availability<P: CapturePlatform>(platform: &P) -> AvailabilityReport {
    match platform.enumerate_devices() {
        Err(EnumerationError::Unsupported) => AvailabilityReport {
            available: false,
            reason: Some(FailureCategory::NoEnumerationApi),
            devices: Vec::new(),
            error: None,
        },
        Err(EnumerationError::Failed(raw)) => {
            log::warn!("device enumeration failed: {}", raw);
            AvailabilityReport {
                available: false,
                reason: Some(FailureCategory::EnumerationFailed),
                devices: Vec::new(),
                error: Some(raw),
            }
        }
        Ok(devices) => {
            let cameras = devices.iter().filter(|d| d.is_video()).count();
            log::debug!(
                "enumerated {} device(s), {} video input(s)",
                devices.len(),
                cameras
            );
            if cameras == 0 {
                AvailabilityReport {
                    available: false,
                    reason: Some(FailureCategory::NoCameraDevices),
                    devices,
                    error: None,
                }
            } else {
                AvailabilityReport {
                    available: true,
                    reason: None,
                    devices,
                    error: None,
                }
            }
        }
    }
}
