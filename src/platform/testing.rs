//! Synthetic platform for offline tests.
//!
//! No hardware, no permissions: enumeration results and acquisition outcomes
//! are scripted per attempt, previews serve a deterministic gradient frame,
//! and tracks count how often they were stopped so leak and idempotence
//! properties can be asserted.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::capture::types::{DeviceDescriptor, Resolution};
use crate::platform::{
    CapturePlatform, EnumerationError, MediaStream, MediaTrack, PlatformError, PreviewHandle,
    ReadyState, StreamRequest,
};

/// What enumeration should report, for every call.
#[derive(Debug, Clone)]
pub enum EnumerationScript {
    Unsupported,
    Fails(PlatformError),
    Devices(Vec<DeviceDescriptor>),
}

/// A track that records how many times it was stopped.
pub struct RecordingTrack {
    label: String,
    stopped: bool,
    stops: Rc<Cell<u32>>,
}

impl RecordingTrack {
    pub fn new(label: impl Into<String>, stops: Rc<Cell<u32>>) -> Self {
        Self {
            label: label.into(),
            stopped: false,
            stops,
        }
    }
}

impl MediaTrack for RecordingTrack {
    fn label(&self) -> &str {
        &self.label
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.stops.set(self.stops.get() + 1);
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }
}

/// A preview surface serving a deterministic gradient frame.
pub struct SyntheticPreview {
    width: u32,
    height: u32,
    ready: ReadyState,
    frame_override: Option<Vec<u8>>,
}

impl SyntheticPreview {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ready: ReadyState::EnoughData,
            frame_override: None,
        }
    }

    pub fn with_ready_state(mut self, ready: ReadyState) -> Self {
        self.ready = ready;
        self
    }

    /// Serve these exact bytes instead of the gradient. Lets tests feed the
    /// capturer a buffer that does not match the reported dimensions.
    pub fn with_frame_override(mut self, frame: Vec<u8>) -> Self {
        self.frame_override = Some(frame);
        self
    }

    fn gradient(&self) -> Vec<u8> {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut data = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                data.push((x * 255 / w.max(1)) as u8);
                data.push((y * 255 / h.max(1)) as u8);
                data.push(128);
            }
        }
        data
    }
}

impl PreviewHandle for SyntheticPreview {
    fn ready_state(&self) -> ReadyState {
        self.ready
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn current_frame(&self) -> Option<Vec<u8>> {
        if self.ready < ReadyState::CurrentFrame || self.width == 0 || self.height == 0 {
            return None;
        }
        match &self.frame_override {
            Some(frame) => Some(frame.clone()),
            None => Some(self.gradient()),
        }
    }
}

/// A scripted live stream with a single video track.
pub struct SyntheticStream {
    tracks: Vec<Box<dyn MediaTrack>>,
    preview: SyntheticPreview,
}

impl SyntheticStream {
    pub fn new(resolution: Resolution, stops: Rc<Cell<u32>>) -> Self {
        Self {
            tracks: vec![Box::new(RecordingTrack::new("synthetic video", stops))],
            preview: SyntheticPreview::new(resolution.width, resolution.height),
        }
    }
}

impl MediaStream for SyntheticStream {
    fn tracks_mut(&mut self) -> &mut [Box<dyn MediaTrack>] {
        &mut self.tracks
    }

    fn preview(&self) -> &dyn PreviewHandle {
        &self.preview
    }
}

/// A platform whose behavior is fully scripted by the test.
///
/// Acquisition outcomes are consumed in order, one per attempt, and every
/// request the pipeline makes is recorded for inspection.
pub struct ScriptedPlatform {
    enumeration: EnumerationScript,
    outcomes: VecDeque<Result<Resolution, PlatformError>>,
    requests: Vec<StreamRequest>,
    counters: Vec<Rc<Cell<u32>>>,
}

impl ScriptedPlatform {
    pub fn new(enumeration: EnumerationScript) -> Self {
        Self {
            enumeration,
            outcomes: VecDeque::new(),
            requests: Vec::new(),
            counters: Vec::new(),
        }
    }

    /// Queue a successful acquisition delivering a stream of this size.
    pub fn script_success(&mut self, width: u32, height: u32) {
        self.outcomes.push_back(Ok(Resolution::new(width, height)));
    }

    /// Queue a failed acquisition attempt.
    pub fn script_failure(&mut self, error: PlatformError) {
        self.outcomes.push_back(Err(error));
    }

    /// Every stream request made so far, in order.
    pub fn requests(&self) -> &[StreamRequest] {
        &self.requests
    }

    /// One stop counter per successfully acquired stream, in order.
    pub fn stop_counters(&self) -> &[Rc<Cell<u32>>] {
        &self.counters
    }
}

impl CapturePlatform for ScriptedPlatform {
    fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, EnumerationError> {
        match &self.enumeration {
            EnumerationScript::Unsupported => Err(EnumerationError::Unsupported),
            EnumerationScript::Fails(err) => Err(EnumerationError::Failed(err.clone())),
            EnumerationScript::Devices(devices) => Ok(devices.clone()),
        }
    }

    fn acquire_stream(
        &mut self,
        request: &StreamRequest,
    ) -> Result<Box<dyn MediaStream>, PlatformError> {
        self.requests.push(request.clone());
        match self.outcomes.pop_front() {
            Some(Ok(resolution)) => {
                let stops = Rc::new(Cell::new(0));
                self.counters.push(Rc::clone(&stops));
                Ok(Box::new(SyntheticStream::new(resolution, stops)))
            }
            Some(Err(error)) => Err(error),
            None => Err(PlatformError::other("acquisition script exhausted")),
        }
    }
}
