//! Software immediate-mode context

use strata_core::{ClipRegion, Matrix, Rect};

use crate::backend::{native_underflow, ImmediateSurface};
use crate::replay::SurfaceProvider;

#[derive(Clone, Debug, Default, PartialEq)]
struct GraphicsState {
    ctm: Matrix,
    /// Device-space clip
    clip: ClipRegion,
}

/// Immediate-mode context with a native graphics-state stack
///
/// Tracks the current transformation matrix and the device-space clip the way
/// CoreGraphics does. Restoring with nothing saved is fatal.
#[derive(Clone, Debug)]
pub struct SoftwareContext {
    id: u64,
    bounds: Rect,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl SoftwareContext {
    /// Create a context for a device surface; `id` distinguishes reacquired sessions
    pub fn new(id: u64, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            state: GraphicsState::default(),
            saved: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Current transformation matrix, device space
    pub fn ctm(&self) -> Matrix {
        self.state.ctm
    }

    /// Current clip, device space
    pub fn device_clip(&self) -> &ClipRegion {
        &self.state.clip
    }

    /// Number of saved graphics states
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

impl ImmediateSurface for SoftwareContext {
    fn save_state(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore_state(&mut self) {
        match self.saved.pop() {
            Some(state) => self.state = state,
            None => native_underflow("software context", 1, 0),
        }
    }

    fn concat_transform(&mut self, matrix: &Matrix) {
        self.state.ctm = self.state.ctm.multiply(matrix);
    }

    fn clip(&mut self, region: &ClipRegion) {
        let device = region.transform(&self.state.ctm);
        self.state.clip = self.state.clip.intersect(&device);
    }
}

/// Hands out a fresh [`SoftwareContext`] per acquisition
#[derive(Clone, Debug)]
pub struct SoftwareProvider {
    bounds: Rect,
    next_id: u64,
    released: Vec<u64>,
}

impl SoftwareProvider {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            next_id: 1,
            released: Vec::new(),
        }
    }

    /// Ids of the contexts handed back so far
    pub fn released(&self) -> &[u64] {
        &self.released
    }
}

impl SurfaceProvider for SoftwareProvider {
    type Session = SoftwareContext;

    fn acquire(&mut self) -> SoftwareContext {
        let id = self.next_id;
        self.next_id += 1;
        SoftwareContext::new(id, self.bounds)
    }

    fn release(&mut self, session: SoftwareContext) {
        self.released.push(session.id());
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
