//! Balanced-stack adapter for immediate-mode backends

use std::marker::PhantomData;

use strata_core::{ClipRegion, Matrix};

use crate::backend::{native_unbalanced_end, native_underflow, BackendAdapter, ImmediateSurface};

/// Adapter for immediate-mode contexts with a native save/restore stack
///
/// Each logical push is exactly one native push: the graphics state is saved
/// and then the transform is concatenated or the clip narrowed. Pops restore
/// the saved state. The device context handle goes stale when the host view
/// changes, so invalidation always needs a fresh session.
#[derive(Debug)]
pub struct BalancedStackAdapter<S> {
    depth: usize,
    began: bool,
    _surface: PhantomData<fn(&mut S)>,
}

impl<S> BalancedStackAdapter<S> {
    pub fn new() -> Self {
        Self {
            depth: 0,
            began: false,
            _surface: PhantomData,
        }
    }
}

impl<S> Default for BalancedStackAdapter<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ImmediateSurface> BackendAdapter for BalancedStackAdapter<S> {
    type Session = S;

    fn begin(&mut self, session: &mut S, initial: &Matrix) {
        self.depth = 0;
        // Base state, restored by `end`
        session.save_state();
        session.concat_transform(initial);
        self.began = true;
    }

    fn end(&mut self, session: &mut S) {
        if self.depth != 0 {
            native_unbalanced_end("balanced-stack", self.depth);
        }
        if self.began {
            session.restore_state();
            self.began = false;
        }
    }

    fn push_transform(&mut self, session: &mut S, matrix: &Matrix) -> usize {
        session.save_state();
        session.concat_transform(matrix);
        self.depth += 1;
        tracing::trace!(depth = self.depth, "balanced push transform");
        1
    }

    fn push_clip(&mut self, session: &mut S, region: &ClipRegion) -> usize {
        session.save_state();
        session.clip(region);
        self.depth += 1;
        tracing::trace!(depth = self.depth, "balanced push clip");
        1
    }

    fn pop_native(&mut self, session: &mut S, count: usize) {
        if count > self.depth {
            native_underflow("balanced-stack", count, self.depth);
        }
        for _ in 0..count {
            session.restore_state();
        }
        self.depth -= count;
        tracing::trace!(count, depth = self.depth, "balanced pop");
    }

    fn requires_full_context_on_invalidate(&self) -> bool {
        true
    }

    fn depth(&self) -> usize {
        self.depth
    }
}
