// Turns one planned stroke into press / drag / release on the platform.

use crate::error::Result;
use crate::guard::DrawSession;
use crate::platform::{InputPlatform, PlatformResult};
use crate::types::Stroke;

/// What to do when a platform call reports failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and carry on; the platform gives no completion signal to retry against.
    #[default]
    Ignore,
    /// Surface the first failure and end the pass.
    Stop,
}

/// Move to start, press, move to end, release, then remember the end point.
/// The settle delay belongs to the caller.
pub fn execute<P: InputPlatform + ?Sized>(
    stroke: Stroke,
    session: &mut DrawSession,
    platform: &mut P,
    policy: FailurePolicy,
) -> Result<()> {
    outcome("move to start", platform.set_pointer(stroke.start), policy)?;
    outcome("press", platform.press(), policy)?;
    outcome("move to end", platform.set_pointer(stroke.end), policy)?;
    outcome("release", platform.release(), policy)?;

    session.record_end(stroke.end);
    tracing::debug!(
        from = ?(stroke.start.x, stroke.start.y),
        to = ?(stroke.end.x, stroke.end.y),
        "stroke"
    );
    Ok(())
}

fn outcome(step: &str, result: PlatformResult<()>, policy: FailurePolicy) -> Result<()> {
    match (result, policy) {
        (Ok(()), _) => Ok(()),
        (Err(e), FailurePolicy::Ignore) => {
            tracing::warn!(step, error = %e, "platform call failed; ignoring");
            Ok(())
        }
        (Err(e), FailurePolicy::Stop) => Err(e.into()),
    }
}
