//! Drawing context - the state API shape-drawing code talks to

use strata_core::{ClipRegion, Matrix, Rect};

use crate::backend::BackendAdapter;
use crate::clip::ClipController;
use crate::config::SurfaceConfig;
use crate::coords::PaintMode;
use crate::error::Result;
use crate::replay::{InvalidationFlag, ReplayCoordinator, SurfaceProvider};
use crate::transform::TransformStack;

/// Save/restore transform and clip state over a native backend
///
/// Every call first handles a pending invalidation, then updates the logical
/// state and forwards the change to the native session. Logical state is
/// independent of the backend: the same calls produce the same
/// [`current_transform`](Self::current_transform) and
/// [`clip_bounds`](Self::clip_bounds) whichever adapter is used.
pub struct DrawingContext<A, P>
where
    A: BackendAdapter,
    P: SurfaceProvider<Session = A::Session>,
{
    transforms: TransformStack,
    clip: ClipController,
    replay: ReplayCoordinator<A, P>,
}

impl<A, P> DrawingContext<A, P>
where
    A: BackendAdapter,
    P: SurfaceProvider<Session = A::Session>,
{
    /// Acquire a session from `provider` and set it up for `config`
    pub fn new(adapter: A, provider: P, config: SurfaceConfig) -> Self {
        tracing::debug!(
            origin = ?config.origin,
            scale_factor = config.scale_factor,
            "drawing context created"
        );
        Self {
            transforms: TransformStack::new(),
            clip: ClipController::new(),
            replay: ReplayCoordinator::new(adapter, provider, config),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transform operations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn translate_transform(&mut self, dx: f64, dy: f64) {
        self.sync();
        self.transforms.translate(&mut self.replay.backend(), dx, dy);
    }

    /// Rotate by `degrees`, clockwise in a top-left coordinate system
    pub fn rotate_transform(&mut self, degrees: f64) {
        self.sync();
        self.transforms
            .rotate(&mut self.replay.backend(), degrees.to_radians());
    }

    pub fn scale_transform(&mut self, sx: f64, sy: f64) {
        self.sync();
        self.transforms.scale(&mut self.replay.backend(), sx, sy);
    }

    /// Apply `matrix` in the current local space
    pub fn multiply_transform(&mut self, matrix: &Matrix) {
        self.sync();
        self.transforms.multiply(&mut self.replay.backend(), *matrix);
    }

    /// Composed local transform, excluding the device setup
    pub fn current_transform(&self) -> Matrix {
        self.transforms.current()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Save / restore
    // ─────────────────────────────────────────────────────────────────────────

    /// Open a save frame for the current transform and clip
    pub fn save_transform(&mut self) {
        self.sync();
        self.transforms.save(self.clip.current());
    }

    /// Close the innermost save frame
    ///
    /// Returns [`PaintError::UnbalancedRestore`](crate::PaintError::UnbalancedRestore)
    /// with nothing changed when no frame is open.
    pub fn restore_transform(&mut self) -> Result<()> {
        self.sync();
        let frame = self.transforms.restore(&mut self.replay.backend())?;
        self.clip.restore(&frame);
        Ok(())
    }

    /// Number of open save frames
    pub fn save_depth(&self) -> usize {
        self.transforms.depth()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clipping
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the clip set in the innermost frame
    ///
    /// Accepts a [`Rect`], a [`ClipPath`](strata_core::ClipPath) or a
    /// [`ClipRegion`], in the current local space. The effective clip never
    /// extends past the clip inherited from enclosing frames.
    pub fn set_clip(&mut self, region: impl Into<ClipRegion>) {
        self.sync();
        self.clip.set_clip(
            &mut self.transforms,
            &mut self.replay.backend(),
            region.into(),
        );
    }

    /// Drop the clip set in the innermost frame
    pub fn reset_clip(&mut self) {
        self.sync();
        self.clip
            .reset_clip(&mut self.transforms, &mut self.replay.backend());
    }

    /// Bounds of the current clip in local coordinates, `None` when unclipped
    pub fn clip_bounds(&self) -> Result<Option<Rect>> {
        self.clip.clip_bounds(&self.transforms)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Invalidation
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle a host report that the native surface is stale
    pub fn invalidate(&mut self) {
        self.replay.invalidation_flag().take();
        self.replay.invalidate(&mut self.transforms);
    }

    /// Flag the host can raise from its own callbacks
    pub fn invalidation_flag(&self) -> InvalidationFlag {
        self.replay.invalidation_flag()
    }

    /// Number of full-state replays performed so far
    pub fn replay_count(&self) -> u64 {
        self.replay.replay_count()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Coordinates
    // ─────────────────────────────────────────────────────────────────────────

    /// Logical-to-device transform for a paint operation, pixel offset included
    ///
    /// Follows the surface bounds of the current session, so a replay after a
    /// resize moves the flip axis.
    pub fn transform_for(&self, mode: PaintMode) -> Matrix {
        self.replay
            .coords()
            .paint_transform(&self.transforms.current(), mode)
    }

    /// Logical-to-device transform without pixel offset
    pub fn device_transform(&self) -> Matrix {
        self.replay
            .coords()
            .initial_transform()
            .multiply(&self.transforms.current())
    }

    pub fn config(&self) -> &SurfaceConfig {
        self.replay.config()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Native session
    // ─────────────────────────────────────────────────────────────────────────

    /// Current native session, for inspection
    pub fn session(&self) -> &A::Session {
        self.replay.session()
    }

    /// Native pushes currently outstanding on the adapter
    pub fn native_depth(&self) -> usize {
        self.replay.adapter().depth()
    }

    /// Unwind every native push and hand the session back
    pub fn finish(self) -> A::Session {
        let open = self.transforms.depth();
        if open > 0 {
            tracing::warn!(open, "finishing with unrestored save frames");
        }
        self.replay.finish(&self.transforms)
    }

    fn sync(&mut self) {
        self.replay.sync(&mut self.transforms);
    }
}
