//! Loops that pump a [`TileGenerator`] to completion.

use super::{
    GenerationError, GenerationObserver, GenerationOutcome, GenerationState, StepOutcome,
    TileGenerator,
};
use crate::render::MapRenderer;

/// Steps `generator` until it finishes, on the current thread.
///
/// Starts the generator if it is still idle. Cancellation comes from the
/// generator's [`cancel_token`](TileGenerator::cancel_token), typically
/// triggered from another thread.
pub fn run_blocking<R, O>(
    generator: &mut TileGenerator<R, O>,
) -> Result<GenerationOutcome, GenerationError>
where
    R: MapRenderer,
    O: GenerationObserver,
{
    if generator.state() == GenerationState::Idle {
        generator.start()?;
    }
    loop {
        if let StepOutcome::Finished(outcome) = generator.step()? {
            return Ok(outcome);
        }
    }
}

/// Steps `generator` until it finishes, yielding to the tokio scheduler
/// after every tile.
///
/// Other tasks on the same runtime (signal handlers, progress UIs) run
/// between tiles, so a cancellation they request is seen before the next
/// tile begins.
pub async fn run<R, O>(
    generator: &mut TileGenerator<R, O>,
) -> Result<GenerationOutcome, GenerationError>
where
    R: MapRenderer,
    O: GenerationObserver,
{
    if generator.state() == GenerationState::Idle {
        generator.start()?;
    }
    loop {
        if let StepOutcome::Finished(outcome) = generator.step()? {
            return Ok(outcome);
        }
        tokio::task::yield_now().await;
    }
}
