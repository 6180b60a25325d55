//! Pop-counted adapter for retained-mode display lists

use std::marker::PhantomData;

use strata_core::{ClipRegion, Matrix};

use crate::backend::{native_unbalanced_end, native_underflow, BackendAdapter, DisplayListSurface};

/// Adapter for display-list builders that only accept strictly nested push/pop pairs
///
/// Pushes that would not change the recorded state (identity transforms,
/// unbounded clips) are deferred and report zero native pushes, so the caller
/// must pop exactly the counts returned. The display list belongs to the
/// caller and does not go stale on host invalidation.
#[derive(Debug)]
pub struct PopCountedAdapter<S> {
    depth: usize,
    base_pushes: usize,
    _surface: PhantomData<fn(&mut S)>,
}

impl<S> PopCountedAdapter<S> {
    pub fn new() -> Self {
        Self {
            depth: 0,
            base_pushes: 0,
            _surface: PhantomData,
        }
    }
}

impl<S> Default for PopCountedAdapter<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DisplayListSurface> BackendAdapter for PopCountedAdapter<S> {
    type Session = S;

    fn begin(&mut self, session: &mut S, initial: &Matrix) {
        self.depth = 0;
        self.base_pushes = 0;
        if !initial.is_identity() {
            session.push_transform(initial);
            self.base_pushes = 1;
        }
    }

    fn end(&mut self, session: &mut S) {
        if self.depth != 0 {
            native_unbalanced_end("pop-counted", self.depth);
        }
        for _ in 0..self.base_pushes {
            session.pop();
        }
        self.base_pushes = 0;
    }

    fn push_transform(&mut self, session: &mut S, matrix: &Matrix) -> usize {
        if matrix.is_identity() {
            tracing::trace!("pop-counted: identity transform deferred");
            return 0;
        }
        session.push_transform(matrix);
        self.depth += 1;
        tracing::trace!(depth = self.depth, "pop-counted push transform");
        1
    }

    /// Zero-area clips are pushed: they suppress painting, unlike `None`
    fn push_clip(&mut self, session: &mut S, region: &ClipRegion) -> usize {
        if region.is_none() {
            tracing::trace!("pop-counted: unbounded clip deferred");
            return 0;
        }
        session.push_clip(region);
        self.depth += 1;
        tracing::trace!(depth = self.depth, "pop-counted push clip");
        1
    }

    fn pop_native(&mut self, session: &mut S, count: usize) {
        if count > self.depth {
            native_underflow("pop-counted", count, self.depth);
        }
        for _ in 0..count {
            session.pop();
        }
        self.depth -= count;
        tracing::trace!(count, depth = self.depth, "pop-counted pop");
    }

    fn requires_full_context_on_invalidate(&self) -> bool {
        false
    }

    fn depth(&self) -> usize {
        self.depth
    }
}
