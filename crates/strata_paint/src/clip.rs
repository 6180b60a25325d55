//! Clip controller
//!
//! Native clips can only be narrowed, so replacing or resetting a clip is done
//! by unwinding the innermost frame natively and re-pushing its transform
//! operations without the clip. The tracked region is kept in base space
//! (the space of the un-framed layer) so it survives later transforms.

use strata_core::{ClipRegion, Rect};

use crate::backend::{Backend, BackendAdapter};
use crate::error::Result;
use crate::frame::{StateFrame, StateOp};
use crate::transform::TransformStack;

/// Current clip region, narrowed per save frame
#[derive(Clone, Debug, Default)]
pub struct ClipController {
    /// Base space
    current: ClipRegion,
}

impl ClipController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clip in base space
    pub fn current(&self) -> &ClipRegion {
        &self.current
    }

    /// Replace the clip set in the innermost frame
    ///
    /// `region` is given in the current local space. The result is its
    /// intersection with the clip inherited by the innermost frame, so a clip
    /// never widens past what an outer frame allows.
    pub fn set_clip<A: BackendAdapter>(
        &mut self,
        stack: &mut TransformStack,
        backend: &mut Backend<'_, A>,
        region: ClipRegion,
    ) {
        if region.is_none() {
            self.reset_clip(stack, backend);
            return;
        }
        if stack.top().has_clip() {
            tracing::debug!(depth = stack.depth(), "replacing clip set in this frame");
            stack.rebuild_top(backend, |op| !op.is_clip());
        }
        let base = region.transform(&stack.current());
        self.current = stack.top().saved_clip().intersect(&base);
        stack.push_op(backend, StateOp::Clip(region));
    }

    /// Undo the clip narrowing of the innermost frame, keeping inherited clips
    pub fn reset_clip<A: BackendAdapter>(
        &mut self,
        stack: &mut TransformStack,
        backend: &mut Backend<'_, A>,
    ) {
        if stack.top().has_clip() {
            tracing::debug!(depth = stack.depth(), "resetting clip for this frame");
            stack.rebuild_top(backend, |op| !op.is_clip());
        }
        self.current = stack.top().saved_clip().clone();
    }

    /// Revert to the clip captured by a closed frame
    pub fn restore(&mut self, frame: &StateFrame) {
        self.current = frame.saved_clip().clone();
    }

    /// Clip bounds in the caller's local space
    ///
    /// `Ok(None)` when nothing is clipped. Under rotation the result is the
    /// axis-aligned bounding box of the clip. Fails when the current transform
    /// cannot be inverted.
    pub fn clip_bounds(&self, stack: &TransformStack) -> Result<Option<Rect>> {
        let Some(bounds) = self.current.bounds() else {
            return Ok(None);
        };
        let inverse = stack.current().invert()?;
        Ok(Some(inverse.transform_rect(&bounds)))
    }
}
