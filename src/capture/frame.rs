//! Still-frame capture from a live preview surface.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::time::SystemTime;

use crate::capture::classify::CaptureFailure;
use crate::capture::types::{CaptureOptions, CapturedImage};
use crate::platform::{PreviewHandle, ReadyState};

/// Capture the current frame of a live preview as a JPEG artifact.
///
/// Preconditions are checked in order, each with its own failure detail:
/// the preview must report at least [`ReadyState::CurrentFrame`] (stricter
/// readiness checks wrongly reject valid captures on some platforms), and it
/// must report non-zero pixel dimensions. The raster is sized exactly to the
/// preview's dimensions; an empty encoding is a hard failure, never a
/// degraded success.
///
/// Has no side effects on the underlying session and may be called
/// repeatedly against the same preview.
pub fn capture_frame(
    preview: &dyn PreviewHandle,
    options: &CaptureOptions,
) -> Result<CapturedImage, CaptureFailure> {
    let ready = preview.ready_state();
    if ready < ReadyState::CurrentFrame {
        return Err(CaptureFailure::not_ready(format!(
            "no decodable frame yet (ready state {:?})",
            ready
        )));
    }

    let (width, height) = (preview.width(), preview.height());
    if width == 0 || height == 0 {
        return Err(CaptureFailure::not_ready(format!(
            "preview reports a zero-sized frame ({}x{})",
            width, height
        )));
    }

    let pixels = preview
        .current_frame()
        .ok_or_else(|| CaptureFailure::not_ready("preview returned no frame data"))?;

    let image = RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
        CaptureFailure::encoding_failed("frame buffer does not match the reported dimensions")
    })?;

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality_to_jpeg(options.quality))
        .encode_image(&image)
        .map_err(|e| CaptureFailure::encoding_failed(e.to_string()))?;

    if bytes.is_empty() {
        return Err(CaptureFailure::encoding_failed(
            "encoder produced an empty payload",
        ));
    }

    let data_uri = format!("data:image/jpeg;base64,{}", BASE64.encode(&bytes));
    log::debug!(
        "captured {}x{} frame, {} byte(s) encoded",
        width,
        height,
        bytes.len()
    );

    Ok(CapturedImage {
        bytes,
        data_uri,
        width,
        height,
        created_at: SystemTime::now(),
        tag: options.tag.clone(),
    })
}

/// Map a 0.0-1.0 quality to the encoder's 1-100 scale, clamping out-of-range
/// input instead of failing.
fn quality_to_jpeg(quality: f32) -> u8 {
    let clamped = if quality.is_finite() {
        quality.clamp(0.0, 1.0)
    } else {
        1.0
    };
    ((clamped * 100.0).round() as u8).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::classify::FailureCategory;
    use crate::platform::testing::SyntheticPreview;

    #[test]
    fn test_capture_from_ready_preview() {
        let preview = SyntheticPreview::new(1280, 720);
        let image = capture_frame(&preview, &CaptureOptions::default()).expect("capture");
        assert_eq!(image.width, 1280);
        assert_eq!(image.height, 720);
        assert!(!image.bytes.is_empty());
        assert!(image.data_uri.starts_with("data:image/jpeg;base64,"));
        // JPEG SOI marker
        assert_eq!(&image.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_capture_carries_tag() {
        let preview = SyntheticPreview::new(64, 48);
        let options = CaptureOptions::default().tagged("lead-7");
        let image = capture_frame(&preview, &options).expect("capture");
        assert_eq!(image.tag.as_deref(), Some("lead-7"));
    }

    #[test]
    fn test_capture_not_ready_below_current_frame() {
        let preview = SyntheticPreview::new(640, 480).with_ready_state(ReadyState::Metadata);
        let failure = capture_frame(&preview, &CaptureOptions::default()).expect_err("not ready");
        assert_eq!(failure.category, FailureCategory::CaptureNotReady);
    }

    #[test]
    fn test_current_frame_readiness_is_sufficient() {
        // "Has current frame data" is enough; do not require play-through
        let preview = SyntheticPreview::new(640, 480).with_ready_state(ReadyState::CurrentFrame);
        assert!(capture_frame(&preview, &CaptureOptions::default()).is_ok());
    }

    #[test]
    fn test_capture_zero_dimensions_fails_not_ready() {
        let preview = SyntheticPreview::new(0, 480);
        let failure = capture_frame(&preview, &CaptureOptions::default()).expect_err("zero width");
        assert_eq!(failure.category, FailureCategory::CaptureNotReady);
    }

    #[test]
    fn test_capture_mismatched_buffer_fails_encoding() {
        let preview = SyntheticPreview::new(640, 480).with_frame_override(vec![0u8; 16]);
        let failure = capture_frame(&preview, &CaptureOptions::default()).expect_err("mismatch");
        assert_eq!(failure.category, FailureCategory::CaptureEncodingFailed);
    }

    #[test]
    fn test_capture_is_repeatable() {
        let preview = SyntheticPreview::new(320, 240);
        let first = capture_frame(&preview, &CaptureOptions::default()).expect("first");
        let second = capture_frame(&preview, &CaptureOptions::default()).expect("second");
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn test_quality_mapping() {
        assert_eq!(quality_to_jpeg(0.8), 80);
        assert_eq!(quality_to_jpeg(1.0), 100);
        // Clamped rather than rejected
        assert_eq!(quality_to_jpeg(-0.5), 1);
        assert_eq!(quality_to_jpeg(2.0), 100);
        assert_eq!(quality_to_jpeg(f32::NAN), 100);
    }

    #[test]
    fn test_lower_quality_produces_smaller_payload() {
        let preview = SyntheticPreview::new(320, 240);
        let high = capture_frame(&preview, &CaptureOptions::with_quality(0.95)).expect("high");
        let low = capture_frame(&preview, &CaptureOptions::with_quality(0.1)).expect("low");
        assert!(low.bytes.len() < high.bytes.len());
    }
}
