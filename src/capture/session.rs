//! Capture session lifecycle management.
//!
//! The session manager owns the platform and at most one live session. It is
//! the only place a device handle is held, so "open camera" pressed twice can
//! never leak a stream: any held session is released before a new acquisition
//! starts. Acquisition walks an ordered ladder of constraint strategies and
//! returns either a fully live session or a single classified failure.

use crate::capture::classify::{classify, CaptureFailure};
use crate::capture::types::{CaptureConstraints, SessionState};
use crate::platform::{CapturePlatform, MediaStream, PlatformError, PreviewHandle, StreamRequest};

/// Which rung of the strategy ladder produced a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Plain video request with no constraints (maximum compatibility).
    BareVideo,
    /// Built-in preferred bounds: ideal 640x480, max 1280x720, audio off.
    PreferredBounds,
    /// The caller's constraints, verbatim.
    CallerSupplied,
}

/// Build the ordered acquisition ladder for a given set of caller
/// constraints. Strategies are tried in order; the first success wins.
/// Without caller constraints the last rung repeats the preferred bounds.
fn constraint_ladder(
    constraints: Option<&CaptureConstraints>,
) -> Vec<(StrategyKind, StreamRequest)> {
    let preferred = request_from(&CaptureConstraints::default());
    let last = match constraints {
        Some(c) => request_from(c),
        None => preferred.clone(),
    };
    vec![
        (StrategyKind::BareVideo, StreamRequest::bare_video()),
        (StrategyKind::PreferredBounds, preferred),
        (StrategyKind::CallerSupplied, last),
    ]
}

fn request_from(constraints: &CaptureConstraints) -> StreamRequest {
    StreamRequest {
        ideal: Some(constraints.ideal),
        max: Some(constraints.max),
        facing: Some(constraints.facing),
        audio: constraints.audio,
    }
}

/// A live capture session: the acquired stream plus its lifecycle state.
/// Exists only in the `Active` or `Stopped` states; acquisition never
/// returns a partial session.
pub struct CaptureSession {
    stream: Box<dyn MediaStream>,
    state: SessionState,
    strategy: StrategyKind,
}

impl CaptureSession {
    fn new(stream: Box<dyn MediaStream>, strategy: StrategyKind) -> Self {
        Self {
            stream,
            state: SessionState::Active,
            strategy,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// The strategy rung that produced this session.
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// The live preview surface, ready to rasterize from as soon as
    /// acquisition returns.
    pub fn preview(&self) -> &dyn PreviewHandle {
        self.stream.preview()
    }

    /// Stop every underlying track. Idempotent: a stopped session stays
    /// stopped and tracks are not stopped twice.
    pub fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            return;
        }
        for track in self.stream.tracks_mut() {
            log::debug!("stopping track '{}'", track.label());
            track.stop();
        }
        self.state = SessionState::Stopped;
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("state", &self.state)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// Owns the platform and at most one live [`CaptureSession`].
///
/// `acquire` and `release` take `&mut self`, so overlapping calls for the
/// same logical context are rejected at compile time rather than handled as
/// a race.
pub struct SessionManager<P: CapturePlatform> {
    platform: P,
    active: Option<CaptureSession>,
    state: SessionState,
}

impl<P: CapturePlatform> SessionManager<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            active: None,
            state: SessionState::Idle,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Current lifecycle state of this capture context.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The currently held session, if any.
    pub fn session(&self) -> Option<&CaptureSession> {
        self.active.as_ref()
    }

    /// Acquire a live session, walking the strategy ladder in order.
    ///
    /// Any session already held is released first. The first strategy to
    /// succeed wins and no further strategies are attempted. If every
    /// strategy fails, the **last** error is classified and returned; later
    /// failures are more specific than the generic first rung's.
    pub fn acquire(
        &mut self,
        constraints: Option<&CaptureConstraints>,
    ) -> Result<&CaptureSession, CaptureFailure> {
        self.release();
        self.state = SessionState::Acquiring;

        let mut last_error: Option<PlatformError> = None;
        for (strategy, request) in constraint_ladder(constraints) {
            log::debug!("acquisition attempt via {:?}: {:?}", strategy, request);
            match self.platform.acquire_stream(&request) {
                Ok(stream) => {
                    log::info!("acquired stream via {:?}", strategy);
                    self.state = SessionState::Active;
                    let session = self.active.insert(CaptureSession::new(stream, strategy));
                    return Ok(session);
                }
                Err(raw) => {
                    log::debug!("{:?} failed: {}", strategy, raw);
                    last_error = Some(raw);
                }
            }
        }

        self.state = SessionState::Idle;
        // The ladder always has three rungs, so last_error is set here.
        let raw = last_error
            .unwrap_or_else(|| PlatformError::other("no acquisition strategy was attempted"));
        log::warn!("all acquisition strategies failed, last error: {}", raw);
        Err(classify(&raw))
    }

    /// Release the held session, stopping all of its tracks. Idempotent:
    /// releasing with nothing held is a no-op, not an error.
    pub fn release(&mut self) {
        if let Some(mut session) = self.active.take() {
            log::debug!("releasing session acquired via {:?}", session.strategy());
            session.stop();
        }
        self.state = SessionState::Idle;
    }
}

impl<P: CapturePlatform> Drop for SessionManager<P> {
    fn drop(&mut self) {
        self.release();
    }
}
