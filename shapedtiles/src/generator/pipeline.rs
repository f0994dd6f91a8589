//! The step-driven generation state machine.

use std::fmt;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{
    GenerationError, GenerationObserver, GenerationProgress, GenerationSettings, ProgressUpdate,
};
use crate::coord::TileIndex;
use crate::encode::{ImageTileEncoder, TileEncoder};
use crate::mbtiles::{MbtilesError, MbtilesWriter};
use crate::render::{MapRenderer, ShapedTileRenderer};

/// Lifecycle of a [`TileGenerator`].
///
/// ```text
/// Idle ──start──► Running ──last tile──► Completed
///   │                │
///   │                ├──cancel──► Cancelled
///   └──cancel────────┼───────────► Cancelled
///                    └──error───► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl GenerationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GenerationState::Completed | GenerationState::Cancelled | GenerationState::Failed
        )
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationState::Idle => "idle",
            GenerationState::Running => "running",
            GenerationState::Completed => "completed",
            GenerationState::Cancelled => "cancelled",
            GenerationState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Final report of a run, handed to the observer exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// Always a terminal state
    pub state: GenerationState,
    pub tiles_written: usize,
    pub total_tiles: usize,
    pub elapsed: Duration,
    pub message: String,
    /// Tile being processed when the run failed
    pub failed_tile: Option<TileIndex>,
}

impl GenerationOutcome {
    pub fn success(&self) -> bool {
        self.state == GenerationState::Completed
    }
}

/// Result of one [`TileGenerator::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A tile was written and more remain
    Progress(ProgressUpdate),
    /// The run is over; further steps return the same outcome
    Finished(GenerationOutcome),
}

/// Renders, encodes and stores every tile of a [`GenerationSettings`], one
/// tile per [`step`](Self::step).
///
/// The generator never loops on its own. A driver (see
/// [`run_blocking`](super::run_blocking) and [`run`](super::run)) calls
/// `step` repeatedly and may do other work in between; a cancellation
/// requested between two steps is seen before the next tile starts.
///
/// Every way a run can end goes through the same path: the archive is
/// closed (its error logged, never propagated past the observer), then the
/// observer's `on_finished` is called once.
pub struct TileGenerator<R, O> {
    settings: GenerationSettings,
    renderer: ShapedTileRenderer<R>,
    encoder: ImageTileEncoder,
    observer: O,
    writer: Option<MbtilesWriter>,
    state: GenerationState,
    next: usize,
    progress: GenerationProgress,
    cancel_token: CancellationToken,
    outcome: Option<GenerationOutcome>,
    error: Option<GenerationError>,
}

impl<R: MapRenderer, O: GenerationObserver> TileGenerator<R, O> {
    pub fn new(settings: GenerationSettings, renderer: R, observer: O) -> Self {
        let encoder = settings.encoder().clone();
        let renderer =
            ShapedTileRenderer::new(settings.shape(), renderer, settings.render_options().clone());
        let progress = GenerationProgress::new(settings.total_tiles());

        Self {
            settings,
            renderer,
            encoder,
            observer,
            writer: None,
            state: GenerationState::Idle,
            next: 0,
            progress,
            cancel_token: CancellationToken::new(),
            outcome: None,
            error: None,
        }
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn progress(&self) -> &GenerationProgress {
        &self.progress
    }

    /// Set once the run reaches a terminal state.
    pub fn outcome(&self) -> Option<&GenerationOutcome> {
        self.outcome.as_ref()
    }

    /// The error that ended a failed run.
    pub fn error(&self) -> Option<&GenerationError> {
        self.error.as_ref()
    }

    pub fn renderer(&self) -> &R {
        self.renderer.renderer()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Token that cancels the run when triggered from anywhere.
    ///
    /// Checked at the start of every step.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Opens the archive and moves to `Running`.
    ///
    /// If the archive cannot be opened the run ends as `Failed` (the
    /// observer is notified) and the error is also returned.
    pub fn start(&mut self) -> Result<(), GenerationError> {
        if self.state != GenerationState::Idle {
            return Err(GenerationError::InvalidState {
                expected: GenerationState::Idle,
                actual: self.state,
            });
        }

        self.progress.start(Instant::now());
        self.state = GenerationState::Running;
        info!(
            tiles = self.settings.total_tiles(),
            min_zoom = self.settings.zooms().min(),
            max_zoom = self.settings.zooms().max(),
            output = %self.settings.output().display(),
            renderer = self.renderer.renderer().name(),
            encoder = self.encoder.name(),
            "Starting tile generation"
        );

        match MbtilesWriter::open(self.settings.output(), &self.settings.metadata()) {
            Ok(writer) => {
                self.writer = Some(writer);
                Ok(())
            }
            Err(e) => {
                let message = format!("Error opening archive: {}", e);
                self.finish(GenerationState::Failed, message, None);
                Err(e.into())
            }
        }
    }

    /// Processes the next tile.
    ///
    /// Per-tile failures end the run and are reported as
    /// [`StepOutcome::Finished`]; `Err` is only returned when called before
    /// [`start`](Self::start).
    pub fn step(&mut self) -> Result<StepOutcome, GenerationError> {
        match self.state {
            GenerationState::Idle => {
                return Err(GenerationError::InvalidState {
                    expected: GenerationState::Running,
                    actual: GenerationState::Idle,
                })
            }
            GenerationState::Running => {}
            _ => return Ok(StepOutcome::Finished(self.finished_outcome())),
        }

        if self.cancel_token.is_cancelled() {
            self.cancel();
            return Ok(StepOutcome::Finished(self.finished_outcome()));
        }

        let Some(tile) = self.settings.tiles().get(self.next) else {
            return Ok(StepOutcome::Finished(self.complete()));
        };

        if let Err(e) = self.process_tile(tile) {
            let message = format!("Error at tile {}: {}", tile, failure_detail(&e));
            self.error = Some(e);
            let outcome = self.finish(GenerationState::Failed, message, Some(tile));
            return Ok(StepOutcome::Finished(outcome));
        }

        self.next += 1;
        self.progress.record();
        let update = self.progress.update(tile);
        self.observer.on_progress(&update);

        if self.next >= self.settings.total_tiles() {
            return Ok(StepOutcome::Finished(self.complete()));
        }
        Ok(StepOutcome::Progress(update))
    }

    /// Requests cancellation.
    ///
    /// Ends an idle or running generation as `Cancelled`; does nothing once
    /// the run has finished.
    pub fn cancel(&mut self) {
        self.cancel_token.cancel();
        if self.state.is_terminal() {
            return;
        }
        self.finish(
            GenerationState::Cancelled,
            "Generation cancelled by user".to_string(),
            None,
        );
    }

    fn process_tile(&mut self, tile: TileIndex) -> Result<(), GenerationError> {
        let rendered = self
            .renderer
            .render_tile(tile)
            .map_err(|source| GenerationError::Render { tile, source })?;
        let bytes = self
            .encoder
            .encode(&rendered.image)
            .map_err(|source| GenerationError::Encode { tile, source })?;

        let writer = self.writer.as_mut().ok_or(MbtilesError::Closed)?;
        writer.write_tile(tile, &bytes)?;
        if (self.next + 1) % self.settings.commit_interval() == 0 {
            writer.commit()?;
        }

        debug!(tile = %tile, clip = ?rendered.clip, bytes = bytes.len(), "Processed tile");
        Ok(())
    }

    fn complete(&mut self) -> GenerationOutcome {
        let message = format!("Generated {} tiles", self.progress.completed());
        self.finish(GenerationState::Completed, message, None)
    }

    /// Closes the archive and notifies the observer. The single exit path
    /// for every terminal state.
    fn finish(
        &mut self,
        state: GenerationState,
        message: String,
        failed_tile: Option<TileIndex>,
    ) -> GenerationOutcome {
        if self.state.is_terminal() {
            return self.finished_outcome();
        }

        let mut state = state;
        let mut message = message;
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.close() {
                warn!(
                    path = %writer.path().display(),
                    error = %e,
                    "Failed to close archive"
                );
                if state == GenerationState::Completed {
                    state = GenerationState::Failed;
                    message = format!("Error closing archive: {}", e);
                    self.error = Some(e.into());
                }
            }
        }

        self.state = state;
        let outcome = GenerationOutcome {
            state,
            tiles_written: self.progress.completed(),
            total_tiles: self.progress.total(),
            elapsed: self.progress.elapsed(),
            message,
            failed_tile,
        };
        self.outcome = Some(outcome.clone());
        self.observer.on_finished(&outcome);
        outcome
    }

    fn finished_outcome(&self) -> GenerationOutcome {
        self.outcome.clone().unwrap_or_else(|| GenerationOutcome {
            state: self.state,
            tiles_written: self.progress.completed(),
            total_tiles: self.progress.total(),
            elapsed: self.progress.elapsed(),
            message: String::new(),
            failed_tile: None,
        })
    }
}

/// The underlying cause, without the tile prefix the error's own
/// `Display` adds.
fn failure_detail(error: &GenerationError) -> String {
    match error {
        GenerationError::Render { source, .. } => source.to_string(),
        GenerationError::Encode { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}
