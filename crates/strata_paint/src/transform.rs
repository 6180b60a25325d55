//! Transform stack
//!
//! Tracks the composed transform and the stack of open save frames. Every
//! operation is forwarded to the backend immediately; the frame records it
//! along with the number of native pushes it cost, so a restore can undo the
//! frame with exactly that many native pops whatever the backend.
//!
//! The un-framed base layer is a permanent frame at the bottom of the stack,
//! which lets replay walk every live operation uniformly.

use strata_core::{ClipRegion, Matrix};

use crate::backend::{Backend, BackendAdapter};
use crate::error::{PaintError, Result};
use crate::frame::{StateFrame, StateOp};

/// Composed transform plus the explicit save-frame stack
#[derive(Clone, Debug)]
pub struct TransformStack {
    current: Matrix,
    /// Never empty: index 0 is the base layer
    frames: Vec<StateFrame>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            current: Matrix::IDENTITY,
            frames: vec![StateFrame::open(Matrix::IDENTITY, ClipRegion::None)],
        }
    }

    /// Composition of every live transform operation
    pub fn current(&self) -> Matrix {
        self.current
    }

    /// Number of open save frames
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// All frames, base layer first
    pub fn frames(&self) -> &[StateFrame] {
        &self.frames
    }

    /// Innermost frame (the base layer when nothing is saved)
    pub fn top(&self) -> &StateFrame {
        &self.frames[self.frames.len() - 1]
    }

    /// Native pushes outstanding across all frames
    pub fn native_depth(&self) -> usize {
        self.frames.iter().map(StateFrame::native_pop_count).sum()
    }

    pub fn translate<A: BackendAdapter>(&mut self, backend: &mut Backend<'_, A>, dx: f64, dy: f64) {
        self.multiply(backend, Matrix::translate(dx, dy));
    }

    /// Rotate by `angle` radians
    pub fn rotate<A: BackendAdapter>(&mut self, backend: &mut Backend<'_, A>, angle: f64) {
        self.multiply(backend, Matrix::rotate(angle));
    }

    pub fn scale<A: BackendAdapter>(&mut self, backend: &mut Backend<'_, A>, sx: f64, sy: f64) {
        self.multiply(backend, Matrix::scale(sx, sy));
    }

    /// Prepend `matrix` to the current transform and push it natively
    pub fn multiply<A: BackendAdapter>(&mut self, backend: &mut Backend<'_, A>, matrix: Matrix) {
        self.current = self.current.multiply(&matrix);
        self.push_op(backend, StateOp::Transform(matrix));
    }

    /// Open a save frame capturing the current transform and `clip`
    pub fn save(&mut self, clip: &ClipRegion) {
        self.frames
            .push(StateFrame::open(self.current, clip.clone()));
        tracing::debug!(depth = self.depth(), "save frame opened");
    }

    /// Close the innermost save frame
    ///
    /// Issues the frame's native pop count and resets the transform to the
    /// value captured at save time. Fails without touching any state when no
    /// frame is open.
    pub fn restore<A: BackendAdapter>(&mut self, backend: &mut Backend<'_, A>) -> Result<StateFrame> {
        let open = self.depth();
        if open == 0 {
            tracing::warn!("restore without a matching save");
            return Err(PaintError::UnbalancedRestore);
        }
        let frame = self.frames.remove(open);
        backend.pop_native(frame.native_pop_count());
        self.current = frame.saved_transform();
        tracing::debug!(
            depth = self.depth(),
            pops = frame.native_pop_count(),
            "save frame restored"
        );
        Ok(frame)
    }

    /// Push `op` natively and record it in the innermost frame
    pub(crate) fn push_op<A: BackendAdapter>(&mut self, backend: &mut Backend<'_, A>, op: StateOp) {
        let pushes = apply_op(backend, &op);
        self.top_mut().record(op, pushes);
    }

    /// Unwind the innermost frame natively, keep only the ops matching `keep`, and re-push them
    pub(crate) fn rebuild_top<A: BackendAdapter>(
        &mut self,
        backend: &mut Backend<'_, A>,
        keep: impl FnMut(&StateOp) -> bool,
    ) {
        let top = self.top_mut();
        backend.pop_native(top.native_pop_count());
        top.retain_ops(keep);
        let pushes = top.ops().iter().map(|op| apply_op(backend, op)).sum();
        top.set_native_pop_count(pushes);
    }

    /// Re-push every live operation onto a fresh session, base layer first
    ///
    /// Pop counts are recomputed from what the new session reports, exactly as
    /// if the operations had been issued against it from the start.
    pub(crate) fn replay<A: BackendAdapter>(&mut self, backend: &mut Backend<'_, A>) {
        for frame in &mut self.frames {
            let pushes = frame.ops().iter().map(|op| apply_op(backend, op)).sum();
            frame.set_native_pop_count(pushes);
        }
    }

    fn top_mut(&mut self) -> &mut StateFrame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

fn apply_op<A: BackendAdapter>(backend: &mut Backend<'_, A>, op: &StateOp) -> usize {
    match op {
        StateOp::Transform(m) => backend.push_transform(m),
        StateOp::Clip(region) => backend.push_clip(region),
    }
}
