//! Draw session state and the per-pixel target guard.
//!
//! Automated clicks must stop as soon as the target window loses focus or
//! someone else moves the pointer. The guard is polled before every pixel
//! the planner examines, so at most the stroke already in flight lands
//! after the condition becomes true.

use std::fmt;

use crate::platform::InputPlatform;
use crate::types::Point;

/// State owned by one draw pass.
#[derive(Debug, Clone)]
pub struct DrawSession {
    owner: u32,
    last: Option<Point>,
}

impl DrawSession {
    /// Records `owner` as the target process. No stroke has been made yet.
    pub fn new(owner: u32) -> Self {
        Self { owner, last: None }
    }

    /// Starts a session against whatever window has focus right now.
    pub fn begin<P: InputPlatform + ?Sized>(platform: &P) -> crate::error::Result<Self> {
        let owner = platform.foreground_owner()?;
        tracing::debug!(owner, "draw session started");
        Ok(Self::new(owner))
    }

    pub fn owner(&self) -> u32 {
        self.owner
    }

    /// Where the last executed stroke ended, if any.
    pub fn last_position(&self) -> Option<Point> {
        self.last
    }

    pub(crate) fn record_end(&mut self, at: Point) {
        self.last = Some(at);
    }
}

/// Live platform state the guard compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub pointer: Point,
    pub owner: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    PointerMoved { expected: Point, actual: Point },
    FocusChanged { expected: u32, actual: u32 },
    PlatformUnavailable(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::PointerMoved { expected, actual } => write!(
                f,
                "pointer moved externally: expected ({}, {}), found ({}, {})",
                expected.x, expected.y, actual.x, actual.y
            ),
            AbortReason::FocusChanged { expected, actual } => {
                write!(f, "foreground window changed owner: pid {expected} -> {actual}")
            }
            AbortReason::PlatformUnavailable(why) => write!(f, "cannot verify target: {why}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Abort(AbortReason),
}

/// Pure decision over a session and a live snapshot.
pub fn check(session: &DrawSession, live: Snapshot) -> Verdict {
    if let Some(expected) = session.last {
        if expected != live.pointer {
            return Verdict::Abort(AbortReason::PointerMoved { expected, actual: live.pointer });
        }
    }
    if live.owner != session.owner {
        return Verdict::Abort(AbortReason::FocusChanged { expected: session.owner, actual: live.owner });
    }
    Verdict::Continue
}

/// Read the platform and decide. An unreadable platform aborts.
pub fn poll<P: InputPlatform + ?Sized>(session: &DrawSession, platform: &P) -> Verdict {
    let snapshot = platform
        .pointer()
        .and_then(|pointer| Ok(Snapshot { pointer, owner: platform.foreground_owner()? }));
    match snapshot {
        Ok(live) => check(session, live),
        Err(e) => Verdict::Abort(AbortReason::PlatformUnavailable(e.to_string())),
    }
}
