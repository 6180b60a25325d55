//! Save frames
//!
//! A [`StateFrame`] is opened by every save point and records what is needed
//! to undo it (the transform and clip active when it opened, and how many
//! native pushes were issued since) and to replay it (the operations
//! themselves, in order).

use smallvec::SmallVec;
use strata_core::{ClipRegion, Matrix};

/// A state change recorded inside a frame
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Matrix composed into the current transform
    Transform(Matrix),
    /// Clip region, in the local space active when it was set
    Clip(ClipRegion),
}

impl StateOp {
    pub fn is_clip(&self) -> bool {
        matches!(self, StateOp::Clip(_))
    }
}

/// One save point on the state stack
#[derive(Clone, Debug)]
pub struct StateFrame {
    ops: SmallVec<[StateOp; 4]>,
    saved_transform: Matrix,
    saved_clip: ClipRegion,
    native_pop_count: usize,
}

impl StateFrame {
    pub(crate) fn open(saved_transform: Matrix, saved_clip: ClipRegion) -> Self {
        Self {
            ops: SmallVec::new(),
            saved_transform,
            saved_clip,
            native_pop_count: 0,
        }
    }

    /// Operations pushed since the frame opened
    pub fn ops(&self) -> &[StateOp] {
        &self.ops
    }

    /// Transform active when the frame opened
    pub fn saved_transform(&self) -> Matrix {
        self.saved_transform
    }

    /// Clip active when the frame opened, base space
    pub fn saved_clip(&self) -> &ClipRegion {
        &self.saved_clip
    }

    /// Native pushes issued since the frame opened
    pub fn native_pop_count(&self) -> usize {
        self.native_pop_count
    }

    pub fn has_clip(&self) -> bool {
        self.ops.iter().any(StateOp::is_clip)
    }

    pub(crate) fn record(&mut self, op: StateOp, pushes: usize) {
        self.ops.push(op);
        self.native_pop_count += pushes;
    }

    pub(crate) fn retain_ops(&mut self, mut keep: impl FnMut(&StateOp) -> bool) {
        self.ops.retain(|op| keep(&*op));
    }

    pub(crate) fn set_native_pop_count(&mut self, count: usize) {
        self.native_pop_count = count;
    }
}
