//! Backend adapter seam
//!
//! Native 2D libraries disagree on how transform and clip state nests. The
//! [`BackendAdapter`] trait hides that difference behind four operations so
//! the transform stack, the clip controller and replay stay backend-agnostic.
//!
//! ```text
//! TransformStack / ClipController
//!          │  push_transform / push_clip / pop_native
//!          ▼
//! ┌──────────────────┐
//! │  Backend<'_, A>  │  ← adapter + current session, borrowed per call
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  BackendAdapter  │  ← BalancedStackAdapter | PopCountedAdapter
//! └────────┬─────────┘
//!          ▼
//!   ImmediateSurface | DisplayListSurface  (native library calls)
//! ```

use strata_core::{ClipRegion, Matrix};

/// Per-backend strategy for mapping logical state pushes onto native calls
///
/// Every push reports how many native pushes it issued; callers must later
/// pop exactly that many. Popping past the native depth corrupts the native
/// state, so implementations abort instead of returning an error.
pub trait BackendAdapter {
    /// Live native drawing handle (device context, display-list writer...)
    type Session;

    /// Prepare a freshly acquired session, applying the device-space initial transform
    fn begin(&mut self, session: &mut Self::Session, initial: &Matrix);

    /// Undo whatever `begin` pushed; the adapter must be at native depth zero
    fn end(&mut self, session: &mut Self::Session);

    /// Concatenate `matrix` onto the native transform
    fn push_transform(&mut self, session: &mut Self::Session, matrix: &Matrix) -> usize;

    /// Narrow the native clip by `region`, given in the current local space
    fn push_clip(&mut self, session: &mut Self::Session, region: &ClipRegion) -> usize;

    /// Pop `count` native pushes
    fn pop_native(&mut self, session: &mut Self::Session, count: usize);

    /// Whether external invalidation makes the session itself stale
    fn requires_full_context_on_invalidate(&self) -> bool;

    /// Native pushes outstanding since `begin`
    fn depth(&self) -> usize;
}

/// Adapter bound to the current session for the duration of one call
///
/// Never stored: the session may be replaced by a replay between calls.
pub struct Backend<'a, A: BackendAdapter> {
    adapter: &'a mut A,
    session: &'a mut A::Session,
}

impl<'a, A: BackendAdapter> Backend<'a, A> {
    pub fn new(adapter: &'a mut A, session: &'a mut A::Session) -> Self {
        Self { adapter, session }
    }

    pub fn push_transform(&mut self, matrix: &Matrix) -> usize {
        self.adapter.push_transform(self.session, matrix)
    }

    pub fn push_clip(&mut self, region: &ClipRegion) -> usize {
        self.adapter.push_clip(self.session, region)
    }

    pub fn pop_native(&mut self, count: usize) {
        if count > 0 {
            self.adapter.pop_native(self.session, count);
        }
    }

    pub fn depth(&self) -> usize {
        self.adapter.depth()
    }
}

/// Immediate-mode native context with a balanced graphics-state stack
///
/// Modeled on CoreGraphics: `save_state`/`restore_state` bracket transform
/// and clip changes.
pub trait ImmediateSurface {
    fn save_state(&mut self);
    fn restore_state(&mut self);
    fn concat_transform(&mut self, matrix: &Matrix);
    fn clip(&mut self, region: &ClipRegion);
}

/// Retained-mode display-list builder
///
/// Every push must be matched by exactly one `pop`, in strict LIFO order.
pub trait DisplayListSurface {
    fn push_transform(&mut self, matrix: &Matrix);
    fn push_clip(&mut self, region: &ClipRegion);
    fn pop(&mut self);
}

/// Abort on a native pop-count mismatch
#[track_caller]
pub(crate) fn native_underflow(backend: &str, requested: usize, depth: usize) -> ! {
    tracing::error!(
        backend,
        requested,
        depth,
        "native pop count exceeds outstanding pushes"
    );
    panic!("{backend}: popping {requested} native states with only {depth} outstanding");
}

/// Abort when a session is ended with native pushes still outstanding
#[track_caller]
pub(crate) fn native_unbalanced_end(backend: &str, depth: usize) -> ! {
    tracing::error!(backend, depth, "session ended with outstanding native pushes");
    panic!("{backend}: session ended with {depth} native states still pushed");
}
