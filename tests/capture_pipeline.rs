//! End-to-end tests for the capture pipeline against the synthetic platform.
//!
//! These cover the acceptance properties of the pipeline: one live session
//! or one classified failure per acquisition, no leaked device handles,
//! idempotent release, and capture preconditions.

use checkcam::capture::{
    capture_frame, classify, probe_availability, CaptureConstraints, CaptureOptions,
    DeviceDescriptor, FacingMode, FailureCategory, FallbackTag, Resolution, SessionManager,
    SessionState, StrategyKind,
};
use checkcam::platform::testing::{EnumerationScript, ScriptedPlatform, SyntheticPreview};
use checkcam::platform::{PlatformError, StreamRequest};

fn empty_platform() -> ScriptedPlatform {
    ScriptedPlatform::new(EnumerationScript::Devices(Vec::new()))
}

#[test]
fn acquire_returns_one_session_or_one_failure() {
    // Success: exactly one live session, no failure
    let mut p = empty_platform();
    p.script_success(640, 480);
    let mut manager = SessionManager::new(p);
    let session = manager.acquire(None).expect("should acquire");
    assert!(session.is_active());
    assert_eq!(manager.state(), SessionState::Active);

    // Failure: no session remains held
    let mut p = empty_platform();
    p.script_failure(PlatformError::abort("a"));
    p.script_failure(PlatformError::abort("b"));
    p.script_failure(PlatformError::abort("c"));
    let mut manager = SessionManager::new(p);
    let failure = manager.acquire(None).expect_err("should fail");
    assert_eq!(failure.category, FailureCategory::Aborted);
    assert!(manager.session().is_none());
    assert_eq!(manager.state(), SessionState::Idle);
}

#[test]
fn second_acquisition_releases_the_first_session() {
    let mut p = empty_platform();
    p.script_success(640, 480);
    p.script_success(640, 480);
    let mut manager = SessionManager::new(p);

    manager.acquire(None).expect("first");
    let first_stops = manager.platform().stop_counters()[0].clone();
    manager.acquire(None).expect("second");

    assert_eq!(first_stops.get(), 1, "first session must be stopped");
    let second_stops = manager.platform().stop_counters()[1].clone();
    assert_eq!(second_stops.get(), 0, "second session must still be live");
}

#[test]
fn release_is_idempotent_and_null_safe() {
    let mut manager = SessionManager::new(empty_platform());
    // Nothing held: releasing is a no-op, not an error
    manager.release();
    manager.release();

    let mut p = empty_platform();
    p.script_success(640, 480);
    let mut manager = SessionManager::new(p);
    manager.acquire(None).expect("acquire");
    let stops = manager.platform().stop_counters()[0].clone();
    manager.release();
    manager.release();
    assert_eq!(stops.get(), 1, "no double-stop beyond the first release");
}

#[test]
fn capture_on_zero_dimension_preview_fails_not_ready() {
    let preview = SyntheticPreview::new(0, 0);
    let failure = capture_frame(&preview, &CaptureOptions::default()).expect_err("zero-sized");
    assert_eq!(failure.category, FailureCategory::CaptureNotReady);
}

#[test]
fn captured_payload_is_never_empty() {
    // A buffer that cannot be rasterized is a hard encoding failure
    let preview = SyntheticPreview::new(320, 240).with_frame_override(Vec::new());
    let failure = capture_frame(&preview, &CaptureOptions::default()).expect_err("empty buffer");
    assert_eq!(failure.category, FailureCategory::CaptureEncodingFailed);

    // And a successful capture always carries bytes
    let preview = SyntheticPreview::new(320, 240);
    let image = capture_frame(&preview, &CaptureOptions::default()).expect("capture");
    assert!(!image.bytes.is_empty());
}

#[test]
fn probe_reports_no_camera_devices() {
    let platform = ScriptedPlatform::new(EnumerationScript::Devices(Vec::new()));
    let report = probe_availability(&platform);
    assert!(!report.available);
    assert_eq!(report.reason, Some(FailureCategory::NoCameraDevices));
    assert_eq!(report.reason.unwrap().code(), "NO_CAMERA_DEVICES");
}

#[test]
fn probe_does_not_acquire_any_device() {
    let platform = ScriptedPlatform::new(EnumerationScript::Devices(vec![
        DeviceDescriptor::video("0", "Front Camera"),
    ]));
    let report = probe_availability(&platform);
    assert!(report.available);
    assert!(platform.requests().is_empty(), "probe must be side-effect free");
}

#[test]
fn overconstrained_first_strategy_falls_back_silently() {
    let mut p = empty_platform();
    p.script_failure(PlatformError::overconstrained("no free-form mode"));
    p.script_success(640, 480);
    let mut manager = SessionManager::new(p);

    let session = manager.acquire(None).expect("no failure surfaces");
    assert_eq!(session.strategy(), StrategyKind::PreferredBounds);

    let requests = manager.platform().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], StreamRequest::bare_video());
    assert_eq!(requests[1].ideal, Some(Resolution::MEDIUM));
    assert_eq!(requests[1].max, Some(Resolution::HIGH));
}

#[test]
fn exhausted_strategies_surface_the_last_error() {
    let mut p = empty_platform();
    p.script_failure(PlatformError::overconstrained("first"));
    p.script_failure(PlatformError::not_found("second"));
    p.script_failure(PlatformError::not_readable("device is busy"));
    let mut manager = SessionManager::new(p);

    let failure = manager.acquire(None).expect_err("all strategies fail");
    assert_eq!(failure.category, FailureCategory::NotReadable);
    assert_eq!(manager.platform().requests().len(), 3);
}

#[test]
fn capture_hd_frame_at_default_quality() {
    let preview = SyntheticPreview::new(1280, 720);
    let image = capture_frame(&preview, &CaptureOptions::with_quality(0.8)).expect("capture");
    assert_eq!(image.width, 1280);
    assert_eq!(image.height, 720);
    assert!(!image.bytes.is_empty());
    assert!(image.data_uri.starts_with("data:image/jpeg;base64,"));
}

#[test]
fn classify_permission_denial_offers_alternate_input() {
    let failure = classify(&PlatformError::new("NotAllowedError", "denied"));
    assert_eq!(failure.category, FailureCategory::NotAllowed);
    assert!(failure
        .fallbacks
        .iter()
        .any(|f| f.tag == FallbackTag::AlternateInput));
    assert!(!failure.message.is_empty());
}

#[test]
fn caller_constraints_reach_the_platform_verbatim() {
    let constraints = CaptureConstraints {
        ideal: Resolution::new(1920, 1080),
        max: Resolution::new(3840, 2160),
        facing: FacingMode::Environment,
        audio: false,
    };

    let mut p = empty_platform();
    p.script_failure(PlatformError::overconstrained("a"));
    p.script_failure(PlatformError::overconstrained("b"));
    p.script_success(1920, 1080);
    let mut manager = SessionManager::new(p);

    let strategy = manager
        .acquire(Some(&constraints))
        .expect("third strategy wins")
        .strategy();
    assert_eq!(strategy, StrategyKind::CallerSupplied);

    let requests = manager.platform().requests();
    assert_eq!(requests[2].ideal, Some(Resolution::new(1920, 1080)));
    assert_eq!(requests[2].max, Some(Resolution::new(3840, 2160)));
    assert_eq!(requests[2].facing, Some(FacingMode::Environment));
    assert!(!requests[2].audio);
}

#[test]
fn full_pipeline_acquire_capture_release() {
    let mut p = ScriptedPlatform::new(EnumerationScript::Devices(vec![
        DeviceDescriptor::video("0", "Front Camera"),
    ]));
    p.script_success(640, 480);
    let mut manager = SessionManager::new(p);

    let report = probe_availability(manager.platform());
    assert!(report.available);

    let options = CaptureOptions::default().tagged("checkin-1234");
    let image = {
        let session = manager.acquire(None).expect("acquire");
        capture_frame(session.preview(), &options).expect("capture")
    };
    assert_eq!(image.tag.as_deref(), Some("checkin-1234"));
    assert_eq!((image.width, image.height), (640, 480));

    manager.release();
    let stops = manager.platform().stop_counters()[0].clone();
    assert_eq!(stops.get(), 1);
    assert_eq!(manager.state(), SessionState::Idle);
}
